//! Command handlers, one module per command, plus the dispatcher that
//! routes parsed requests to them.

pub mod blpop;
pub mod command_error;
pub mod dispatcher;
pub mod echo;
pub mod get;
pub mod llen;
pub mod lpop;
pub mod lrange;
pub mod ping;
pub mod rpush_and_lpush;
pub mod set;
pub mod stream_reply;
pub mod type_command;
pub mod xadd;
pub mod xrange;
pub mod xread;

pub use command_error::CommandError;
pub use dispatcher::{CommandDispatcher, DispatchResult};

/// Strict decimal parse for argument integers: ASCII digits only.
pub(crate) fn parse_u64(raw: &[u8]) -> Option<u64> {
    if raw.is_empty() || !raw.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    std::str::from_utf8(raw).ok()?.parse().ok()
}

/// Signed decimal parse for index arguments (LRANGE).
pub(crate) fn parse_i64(raw: &[u8]) -> Option<i64> {
    let digits = raw.strip_prefix(b"-").unwrap_or(raw);
    if digits.is_empty() || !digits.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    std::str::from_utf8(raw).ok()?.parse().ok()
}

/// Float parse for the BLPOP timeout, which Redis takes in seconds.
pub(crate) fn parse_f64(raw: &[u8]) -> Option<f64> {
    std::str::from_utf8(raw).ok()?.parse().ok()
}
