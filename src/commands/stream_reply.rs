//! RESP shapes shared by XRANGE, XREAD, and the stream wake-up path.

use bytes::Bytes;

use crate::resp::RespValue;
use crate::stream::StreamEntry;

/// Encodes entries as the XRANGE reply shape: each entry is a 2-element
/// array of the ID and the flattened `[field, value, ...]` list, in
/// insertion order.
pub fn entries_array(entries: &[StreamEntry]) -> RespValue {
    let items = entries
        .iter()
        .map(|entry| {
            let mut flat = Vec::with_capacity(entry.fields.len() * 2);
            for (name, value) in &entry.fields {
                flat.push(RespValue::BulkString(name.clone()));
                flat.push(RespValue::BulkString(value.clone()));
            }
            RespValue::Array(vec![
                RespValue::BulkString(entry.id.clone()),
                RespValue::Array(flat),
            ])
        })
        .collect();

    RespValue::Array(items)
}

/// Encodes the XREAD outer shape: one `[key, entries]` block per stream
/// that contributed entries.
pub fn xread_reply(blocks: &[(Bytes, &[StreamEntry])]) -> RespValue {
    let items = blocks
        .iter()
        .map(|(key, entries)| {
            RespValue::Array(vec![
                RespValue::BulkString(key.clone()),
                entries_array(entries),
            ])
        })
        .collect();

    RespValue::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{StreamId, StreamValue};

    fn sample_stream() -> StreamValue {
        let mut stream = StreamValue::new();
        stream.append(
            StreamId::new(1, 0),
            vec![(Bytes::from("field"), Bytes::from("value"))],
        );
        stream
    }

    #[test]
    fn test_entries_array_encoding() {
        let stream = sample_stream();
        let entries = stream.from_id_to_end(StreamId::MIN);

        assert_eq!(
            entries_array(entries).encode(),
            b"*1\r\n*2\r\n$3\r\n1-0\r\n*2\r\n$5\r\nfield\r\n$5\r\nvalue\r\n".to_vec()
        );
    }

    #[test]
    fn test_field_order_is_preserved() {
        let mut stream = StreamValue::new();
        stream.append(
            StreamId::new(1, 0),
            vec![
                (Bytes::from("b"), Bytes::from("2")),
                (Bytes::from("a"), Bytes::from("1")),
            ],
        );
        let entries = stream.from_id_to_end(StreamId::MIN);

        // insertion order, not sorted order
        assert_eq!(
            entries_array(entries).encode(),
            b"*1\r\n*2\r\n$3\r\n1-0\r\n*4\r\n$1\r\nb\r\n$1\r\n2\r\n$1\r\na\r\n$1\r\n1\r\n"
                .to_vec()
        );
    }

    #[test]
    fn test_xread_reply_encoding() {
        let stream = sample_stream();
        let entries = stream.from_id_to_end(StreamId::MIN);
        let blocks = vec![(Bytes::from("mystream"), entries)];

        assert_eq!(
            xread_reply(&blocks).encode(),
            b"*1\r\n*2\r\n$8\r\nmystream\r\n*1\r\n*2\r\n$3\r\n1-0\r\n*2\r\n$5\r\nfield\r\n$5\r\nvalue\r\n"
                .to_vec()
        );
    }
}
