use bytes::Bytes;

use crate::clock;
use crate::connection::ClientHandle;
use crate::key_value_store::Object;
use crate::resp::RespValue;
use crate::server::Engine;
use crate::state::StreamWaiter;
use crate::stream::{StreamEntry, StreamId};

use super::dispatcher::DispatchResult;
use super::{parse_u64, stream_reply, CommandError};

/// Parsed arguments for XREAD.
pub struct XreadArguments {
    /// `Some(ms)` when BLOCK was given; 0 blocks forever.
    pub block_ms: Option<u64>,
    /// `(key, cursor)` pairs in request order; cursors are raw bytes and
    /// may be `$`.
    pub pairs: Vec<(Bytes, Bytes)>,
}

impl XreadArguments {
    /// Accepts `XREAD [BLOCK ms] STREAMS key... id...`.
    ///
    /// The tail after STREAMS must split evenly into keys and IDs.
    pub fn parse(args: &[&[u8]]) -> Result<Self, CommandError> {
        if args.len() < 4 {
            return Err(CommandError::WrongNumberOfArguments("XREAD"));
        }

        let (block_ms, streams_index) = if args[1].eq_ignore_ascii_case(b"BLOCK") {
            let ms = parse_u64(args[2]).ok_or(CommandError::InvalidTimeout)?;
            (Some(ms), 3)
        } else {
            (None, 1)
        };

        if streams_index >= args.len() || !args[streams_index].eq_ignore_ascii_case(b"STREAMS") {
            return Err(CommandError::SyntaxError);
        }

        let tail = &args[streams_index + 1..];
        if tail.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("XREAD"));
        }
        if tail.len() % 2 != 0 {
            return Err(CommandError::XreadUnbalancedStreams);
        }

        let half = tail.len() / 2;
        let pairs = (0..half)
            .map(|i| {
                (
                    Bytes::copy_from_slice(tail[i]),
                    Bytes::copy_from_slice(tail[half + i]),
                )
            })
            .collect();

        Ok(XreadArguments { block_ms, pairs })
    }
}

/// Handles XREAD.
///
/// Cursors are exclusive: each stream contributes the entries strictly
/// after the client's ID. `$` resolves to the stream's current top, so a
/// blocking read sees only entries appended after the call. Streams with
/// nothing new are skipped from the reply; when no stream contributes, the
/// reply is a null bulk, or the client parks (one waiter per stream) when
/// BLOCK was given.
pub fn xread(
    engine: &mut Engine,
    client: ClientHandle,
    args: &[&[u8]],
) -> Result<DispatchResult, CommandError> {
    let arguments = XreadArguments::parse(args)?;

    let mut cursors: Vec<(Bytes, StreamId)> = Vec::with_capacity(arguments.pairs.len());
    for (key, raw_id) in &arguments.pairs {
        let cursor = if raw_id.as_ref() == b"$" {
            match engine.store.get_object(key.as_ref()) {
                Some(Object::Stream(stream)) => stream.last_id().unwrap_or(StreamId::MIN),
                _ => StreamId::MIN,
            }
        } else {
            StreamId::parse(raw_id).ok_or(CommandError::SyntaxError)?
        };
        cursors.push((key.clone(), cursor));
    }

    let mut blocks: Vec<(Bytes, Vec<StreamEntry>)> = Vec::new();
    for (key, cursor) in &cursors {
        if let Some(Object::Stream(stream)) = engine.store.get_object(key.as_ref()) {
            let entries = stream.from_id_to_end(cursor.next());
            if !entries.is_empty() {
                blocks.push((key.clone(), entries.to_vec()));
            }
        }
    }

    if !blocks.is_empty() {
        let borrowed: Vec<(Bytes, &[StreamEntry])> = blocks
            .iter()
            .map(|(key, entries)| (key.clone(), entries.as_slice()))
            .collect();
        return Ok(DispatchResult::Reply(
            stream_reply::xread_reply(&borrowed).encode(),
        ));
    }

    let Some(block_ms) = arguments.block_ms else {
        return Ok(DispatchResult::Reply(RespValue::NullBulkString.encode()));
    };

    let deadline_ms = if block_ms == 0 {
        0
    } else {
        clock::monotonic_now_ms().saturating_add(block_ms)
    };

    for (key, cursor) in cursors {
        engine.state.enroll_stream_waiter(StreamWaiter {
            client,
            deadline_ms,
            stream_key: key,
            last_id: cursor.render(),
        });
    }

    Ok(DispatchResult::Deferred)
}
