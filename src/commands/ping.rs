use crate::resp::RespValue;

use super::CommandError;

/// Handles PING. Always pongs, whatever the arity.
pub fn ping(_args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    Ok(RespValue::simple("PONG").encode())
}
