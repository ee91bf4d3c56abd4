use crate::key_value_store::KeyValueStore;
use crate::resp::RespValue;

use super::CommandError;

/// Handles TYPE: the tag name of the value at the key, `+none` when absent.
pub fn type_command(store: &mut KeyValueStore, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    if args.len() != 2 {
        return Err(CommandError::WrongNumberOfArguments("TYPE"));
    }

    Ok(RespValue::simple(store.type_name(args[1])).encode())
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn test_type_tags() {
        let mut store = KeyValueStore::new();
        store.set_string(Bytes::from("alpha"), Bytes::from("1"));
        store.get_or_create_list(b"queue").push_back(Bytes::from("item"));
        store.get_or_create_stream(b"events");

        let test_cases: Vec<(&[u8], &[u8])> = vec![
            (b"alpha", b"+string\r\n"),
            (b"queue", b"+list\r\n"),
            (b"events", b"+stream\r\n"),
            (b"missing", b"+none\r\n"),
        ];

        for (key, expected) in test_cases {
            assert_eq!(
                type_command(&mut store, &[b"TYPE", key]),
                Ok(expected.to_vec()),
                "TYPE {:?}",
                String::from_utf8_lossy(key)
            );
        }
    }
}
