use crate::key_value_store::{KeyValueStore, Object};
use crate::resp::RespValue;
use crate::stream::{StreamError, StreamId};

use super::stream_reply;
use super::CommandError;

/// Handles XRANGE: all entries with `start <= id <= end`, both ends
/// inclusive. `-` as the start and `+` as the end stand for the ends of
/// the stream. A missing key yields an empty array; a key of another type
/// is a `-WRONGTYPE` error.
pub fn xrange(store: &mut KeyValueStore, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    if args.len() != 4 {
        return Err(CommandError::WrongNumberOfArguments("XRANGE"));
    }

    let start = match args[2] {
        b"-" => StreamId::MIN,
        raw => StreamId::parse(raw).ok_or(StreamError::InvalidRangeStart)?,
    };
    let end = match args[3] {
        b"+" => StreamId::MAX,
        raw => StreamId::parse(raw).ok_or(StreamError::InvalidRangeEnd)?,
    };

    match store.get_object(args[1]) {
        Some(Object::Stream(stream)) => {
            Ok(stream_reply::entries_array(stream.range(start, end)).encode())
        }
        Some(_) => Err(CommandError::WrongType),
        None => Ok(RespValue::Array(Vec::new()).encode()),
    }
}
