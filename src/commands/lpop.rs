use crate::key_value_store::{KeyValueStore, Object};
use crate::resp::RespValue;

use super::{parse_u64, CommandError};

/// Handles LPOP in both forms.
///
/// `LPOP key` pops the head and replies with it as a bulk string, or a
/// null bulk when there is nothing to pop. `LPOP key n` pops up to `n`
/// elements: a null bulk when the list is missing or empty, otherwise an
/// array of what was actually popped.
pub fn lpop(store: &mut KeyValueStore, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    let count = match args.len() {
        2 => None,
        3 => Some(parse_u64(args[2]).ok_or(CommandError::SyntaxError)?),
        _ => return Err(CommandError::WrongNumberOfArguments("LPOP")),
    };

    let Some(Object::List(list)) = store.get_object(args[1]) else {
        return Ok(RespValue::NullBulkString.encode());
    };

    match count {
        None => {
            let reply = match list.pop_front() {
                Some(value) => RespValue::BulkString(value),
                None => RespValue::NullBulkString,
            };
            Ok(reply.encode())
        }
        Some(count) => {
            if list.is_empty() {
                return Ok(RespValue::NullBulkString.encode());
            }
            let mut popped = Vec::new();
            for _ in 0..count {
                match list.pop_front() {
                    Some(value) => popped.push(RespValue::BulkString(value)),
                    None => break,
                }
            }
            Ok(RespValue::Array(popped).encode())
        }
    }
}
