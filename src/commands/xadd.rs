use bytes::Bytes;

use crate::clock;
use crate::key_value_store::Object;
use crate::resp::RespValue;
use crate::server::Engine;
use crate::stream::{self, StreamValue};

use super::CommandError;

/// Handles XADD.
///
/// The ID argument may be explicit (`5-1`), auto-sequence (`5-*`), or
/// fully auto-generated (`*`); resolution and monotonicity checks live in
/// the stream engine. The whole request is validated before the store is
/// touched, so a rejected XADD neither creates the key nor appends.
///
/// A key holding a non-stream value is rejected with `-WRONGTYPE` and
/// left intact.
pub fn xadd(engine: &mut Engine, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    if args.len() < 5 {
        return Err(CommandError::WrongNumberOfArguments("XADD"));
    }
    let key = args[1];

    let spec = stream::classify(args[2]);
    let wall_now_ms = clock::wall_clock_ms();

    let id = match engine.store.get_object(key) {
        Some(Object::Stream(stream)) => stream.resolve_id(spec, wall_now_ms)?,
        Some(_) => return Err(CommandError::WrongType),
        None => StreamValue::new().resolve_id(spec, wall_now_ms)?,
    };

    let fields = collect_fields(&args[3..])?;

    let rendered = engine.store.get_or_create_stream(key).append(id, fields);
    engine.wake_stream_waiters(key);

    Ok(RespValue::BulkString(rendered).encode())
}

/// Validates and copies the field-value tail of an XADD: at least one
/// pair, an even count, and no empty names or values.
fn collect_fields(raw: &[&[u8]]) -> Result<Vec<(Bytes, Bytes)>, CommandError> {
    if raw.len() < 2 {
        return Err(CommandError::XaddMissingFields);
    }
    if raw.len() % 2 != 0 {
        return Err(CommandError::XaddIncompleteFields);
    }

    let mut fields = Vec::with_capacity(raw.len() / 2);
    for pair in raw.chunks(2) {
        if pair[0].is_empty() || pair[1].is_empty() {
            return Err(CommandError::XaddEmptyField);
        }
        fields.push((
            Bytes::copy_from_slice(pair[0]),
            Bytes::copy_from_slice(pair[1]),
        ));
    }

    Ok(fields)
}
