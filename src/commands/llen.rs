use crate::key_value_store::{KeyValueStore, Object};
use crate::resp::RespValue;

use super::CommandError;

/// Handles LLEN: the list length, or 0 when the key is missing or holds a
/// non-list value.
pub fn llen(store: &mut KeyValueStore, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    if args.len() != 2 {
        return Err(CommandError::WrongNumberOfArguments("LLEN"));
    }

    let len = match store.get_object(args[1]) {
        Some(Object::List(list)) => list.len(),
        _ => 0,
    };

    Ok(RespValue::Integer(len as i64).encode())
}
