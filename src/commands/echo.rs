use bytes::Bytes;

use crate::resp::RespValue;

use super::CommandError;

/// Handles ECHO: replies with its single argument as a bulk string.
pub fn echo(args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    if args.len() != 2 {
        return Err(CommandError::WrongNumberOfArguments("ECHO"));
    }

    Ok(RespValue::BulkString(Bytes::copy_from_slice(args[1])).encode())
}
