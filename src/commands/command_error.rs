use thiserror::Error;

use crate::stream::StreamError;

/// Everything a command handler can reject a request with.
///
/// The rendered messages are part of the wire contract; tests assert on
/// the exact bytes, so variants must not be reworded casually.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    EmptyCommand,
    #[error("unknown command")]
    UnknownCommand,
    #[error("wrong number of arguments for '{0}'")]
    WrongNumberOfArguments(&'static str),
    #[error("syntax error")]
    SyntaxError,
    #[error("invalid timeout")]
    InvalidTimeout,
    #[error("XREAD requires equal number of streams and IDs")]
    XreadUnbalancedStreams,
    #[error("XADD requires field-value pairs")]
    XaddMissingFields,
    #[error("XADD field-value pairs are incomplete")]
    XaddIncompleteFields,
    #[error("XADD fields cannot be empty")]
    XaddEmptyField,
    /// Typed operation against a key holding a different variant, for the
    /// commands that surface it (XRANGE, XADD).
    #[error("Key is not a stream")]
    WrongType,
    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl CommandError {
    /// The exact RESP error line for this failure.
    pub fn as_bytes(&self) -> Vec<u8> {
        match self {
            CommandError::WrongType => b"-WRONGTYPE Key is not a stream\r\n".to_vec(),
            other => format!("-ERR {other}\r\n").into_bytes(),
        }
    }
}
