use bytes::Bytes;

use crate::key_value_store::KeyValueStore;
use crate::resp::RespValue;

use super::{parse_u64, CommandError};

/// Parsed arguments for SET.
///
/// Supports the plain `SET key value` form and `SET key value PX <ms>` for
/// a millisecond TTL. Any other modifier is a syntax error.
pub struct SetArguments {
    pub key: Bytes,
    pub value: Bytes,
    pub ttl_ms: Option<u64>,
}

impl SetArguments {
    pub fn parse(args: &[&[u8]]) -> Result<Self, CommandError> {
        let ttl_ms = match args.len() {
            3 => None,
            5 => {
                if !args[3].eq_ignore_ascii_case(b"PX") {
                    return Err(CommandError::SyntaxError);
                }
                Some(parse_u64(args[4]).ok_or(CommandError::SyntaxError)?)
            }
            _ => return Err(CommandError::WrongNumberOfArguments("SET")),
        };

        Ok(SetArguments {
            key: Bytes::copy_from_slice(args[1]),
            value: Bytes::copy_from_slice(args[2]),
            ttl_ms,
        })
    }
}

/// Handles SET: stores a string, replacing any previous value and TTL.
pub fn set(store: &mut KeyValueStore, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    let arguments = SetArguments::parse(args)?;

    match arguments.ttl_ms {
        Some(ttl_ms) => store.set_string_px(arguments.key, arguments.value, ttl_ms),
        None => store.set_string(arguments.key, arguments.value),
    }

    Ok(RespValue::simple("OK").encode())
}
