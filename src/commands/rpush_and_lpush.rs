use bytes::Bytes;

use crate::resp::RespValue;
use crate::server::Engine;

use super::CommandError;

/// Handles RPUSH: appends the values to the tail, creating the list when
/// needed, then serves any blocked BLPOP clients.
pub fn rpush(engine: &mut Engine, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    push(engine, args, false, "RPUSH")
}

/// Handles LPUSH: inserts each value at the head, so the final order
/// reverses the argument order, then serves any blocked BLPOP clients.
pub fn lpush(engine: &mut Engine, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    push(engine, args, true, "LPUSH")
}

/// Shared push path. All values land in the list before any waiter is
/// woken, so waiters observe the final state of this push.
fn push(
    engine: &mut Engine,
    args: &[&[u8]],
    prepend: bool,
    name: &'static str,
) -> Result<Vec<u8>, CommandError> {
    if args.len() < 3 {
        return Err(CommandError::WrongNumberOfArguments(name));
    }

    let key = args[1];
    let list = engine.store.get_or_create_list(key);

    for value in &args[2..] {
        let value = Bytes::copy_from_slice(value);
        if prepend {
            list.push_front(value);
        } else {
            list.push_back(value);
        }
    }
    let new_len = list.len();

    engine.wake_list_waiters(key);

    Ok(RespValue::Integer(new_len as i64).encode())
}
