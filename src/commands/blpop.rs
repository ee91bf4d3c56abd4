use bytes::Bytes;

use crate::clock;
use crate::connection::ClientHandle;
use crate::key_value_store::Object;
use crate::resp::RespValue;
use crate::server::Engine;
use crate::state::ListWaiter;

use super::dispatcher::DispatchResult;
use super::{parse_f64, CommandError};

/// Parsed arguments for BLPOP.
pub struct BlpopArguments {
    pub key: Bytes,
    /// Blocking duration in seconds; fractions allowed, 0 blocks forever.
    pub timeout_secs: f64,
}

impl BlpopArguments {
    pub fn parse(args: &[&[u8]]) -> Result<Self, CommandError> {
        if args.len() != 3 {
            return Err(CommandError::WrongNumberOfArguments("BLPOP"));
        }

        let timeout_secs = parse_f64(args[2]).ok_or(CommandError::InvalidTimeout)?;
        // also rejects NaN
        if !(timeout_secs >= 0.0) {
            return Err(CommandError::InvalidTimeout);
        }

        Ok(BlpopArguments {
            key: Bytes::copy_from_slice(args[1]),
            timeout_secs,
        })
    }
}

/// Handles BLPOP.
///
/// With data available the head is popped and the reply `[key, value]` is
/// immediate. Otherwise the client is parked at the tail of the key's FIFO
/// and nothing is written: a later push from another client or the
/// deadline sweep produces the reply. The key not existing yet is not an
/// error; the push that creates it wakes the waiter.
pub fn blpop(
    engine: &mut Engine,
    client: ClientHandle,
    args: &[&[u8]],
) -> Result<DispatchResult, CommandError> {
    let arguments = BlpopArguments::parse(args)?;

    if let Some(Object::List(list)) = engine.store.get_object(arguments.key.as_ref()) {
        if let Some(value) = list.pop_front() {
            let reply = RespValue::key_value_array(arguments.key, value).encode();
            return Ok(DispatchResult::Reply(reply));
        }
    }

    let deadline_ms = if arguments.timeout_secs == 0.0 {
        0
    } else {
        clock::monotonic_now_ms().saturating_add((arguments.timeout_secs * 1000.0).round() as u64)
    };

    engine.state.enroll_list_waiter(
        arguments.key,
        ListWaiter {
            client,
            deadline_ms,
        },
    );

    Ok(DispatchResult::Deferred)
}
