use crate::key_value_store::{KeyValueStore, Object};
use crate::resp::RespValue;

use super::{parse_i64, CommandError};

/// Handles LRANGE: an inclusive slice of the list with negative indexes
/// resolved from the tail. Missing keys and non-list values yield an empty
/// array.
pub fn lrange(store: &mut KeyValueStore, args: &[&[u8]]) -> Result<Vec<u8>, CommandError> {
    if args.len() != 4 {
        return Err(CommandError::WrongNumberOfArguments("LRANGE"));
    }

    let start = parse_i64(args[2]).ok_or(CommandError::SyntaxError)?;
    let end = parse_i64(args[3]).ok_or(CommandError::SyntaxError)?;

    let values = match store.get_object(args[1]) {
        Some(Object::List(list)) => list.range(start, end),
        _ => Vec::new(),
    };

    let items = values.into_iter().map(RespValue::BulkString).collect();
    Ok(RespValue::Array(items).encode())
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn store_with_numbers() -> KeyValueStore {
        let mut store = KeyValueStore::new();
        let list = store.get_or_create_list(b"numbers");
        for value in ["one", "two", "three"] {
            list.push_back(Bytes::copy_from_slice(value.as_bytes()));
        }
        store
    }

    #[test]
    fn test_lrange_full_list() {
        let mut store = store_with_numbers();
        assert_eq!(
            lrange(&mut store, &[b"LRANGE", b"numbers", b"0", b"-1"]),
            Ok(b"*3\r\n$3\r\none\r\n$3\r\ntwo\r\n$5\r\nthree\r\n".to_vec())
        );
    }

    #[test]
    fn test_lrange_empty_cases() {
        let mut store = store_with_numbers();
        // start > end after resolution
        assert_eq!(
            lrange(&mut store, &[b"LRANGE", b"numbers", b"2", b"1"]),
            Ok(b"*0\r\n".to_vec())
        );
        assert_eq!(
            lrange(&mut store, &[b"LRANGE", b"missing", b"0", b"-1"]),
            Ok(b"*0\r\n".to_vec())
        );
    }

    #[test]
    fn test_lrange_rejects_bad_indexes() {
        let mut store = store_with_numbers();
        assert_eq!(
            lrange(&mut store, &[b"LRANGE", b"numbers", b"a", b"1"]),
            Err(CommandError::SyntaxError)
        );
        assert_eq!(
            lrange(&mut store, &[b"LRANGE", b"numbers", b"0"]),
            Err(CommandError::WrongNumberOfArguments("LRANGE"))
        );
    }

    #[test]
    fn test_lrange_on_string_key_is_empty() {
        let mut store = KeyValueStore::new();
        store.set_string(Bytes::from("k"), Bytes::from("v"));
        assert_eq!(
            lrange(&mut store, &[b"LRANGE", b"k", b"0", b"-1"]),
            Ok(b"*0\r\n".to_vec())
        );
    }
}
