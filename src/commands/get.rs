use crate::key_value_store::KeyValueStore;
use crate::resp::RespValue;

use super::CommandError;

/// Handles GET: the stored string, or a null bulk when the key is absent,
/// expired, or holds a non-string value.
pub fn get(store: &mut KeyValueStore, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    if args.len() != 2 {
        return Err(CommandError::WrongNumberOfArguments("GET"));
    }

    let reply = match store.get_string(args[1]) {
        Some(value) => RespValue::BulkString(value),
        None => RespValue::NullBulkString,
    };

    Ok(reply.encode())
}
