//! The typed, TTL-aware object store.
//!
//! One dictionary maps keys to tagged objects (string, list, or stream); a
//! parallel map holds absolute expiration deadlines on the monotonic clock.
//! A key absent from the deadline map never expires. Only strings carry a
//! TTL: creating a list or stream under a key clears any deadline left over
//! from a previous string.
//!
//! Expiry is evaluated lazily on access. There is no background expirer;
//! the periodic sweep in the server covers *waiter* deadlines only.

use std::collections::HashMap;

use bytes::Bytes;

use crate::clock;
use crate::list::ListValue;
use crate::stream::StreamValue;

/// A stored value, tagged by type.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    String(Bytes),
    List(ListValue),
    Stream(StreamValue),
}

impl Object {
    /// The name TYPE reports for this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::String(_) => "string",
            Object::List(_) => "list",
            Object::Stream(_) => "stream",
        }
    }
}

#[derive(Debug, Default)]
pub struct KeyValueStore {
    objects: HashMap<Bytes, Object>,
    expirations: HashMap<Bytes, u64>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        KeyValueStore::default()
    }

    /// `SET key value`: stores a string and clears any previous TTL.
    pub fn set_string(&mut self, key: Bytes, value: Bytes) {
        self.expirations.remove(&key);
        self.objects.insert(key, Object::String(value));
    }

    /// `SET key value PX ttl`: stores a string expiring `ttl_ms` from now.
    pub fn set_string_px(&mut self, key: Bytes, value: Bytes, ttl_ms: u64) {
        let deadline = clock::monotonic_now_ms().saturating_add(ttl_ms);
        self.expirations.insert(key.clone(), deadline);
        self.objects.insert(key, Object::String(value));
    }

    /// `GET key`: the stored string, or `None` when the key is absent,
    /// expired (evicted here), or holds a non-string value.
    pub fn get_string(&mut self, key: &[u8]) -> Option<Bytes> {
        if !self.ensure_not_expired(key) {
            return None;
        }
        match self.objects.get(key) {
            Some(Object::String(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// A mutable handle to the list at `key`, replacing any value of a
    /// different type with an empty list. Clears any leftover TTL.
    pub fn get_or_create_list(&mut self, key: &[u8]) -> &mut ListValue {
        self.expirations.remove(key);
        let slot = self
            .objects
            .entry(Bytes::copy_from_slice(key))
            .or_insert_with(|| Object::List(ListValue::new()));
        if !matches!(slot, Object::List(_)) {
            *slot = Object::List(ListValue::new());
        }
        match slot {
            Object::List(list) => list,
            _ => unreachable!(),
        }
    }

    /// A mutable handle to the stream at `key`; symmetric with
    /// [`get_or_create_list`].
    pub fn get_or_create_stream(&mut self, key: &[u8]) -> &mut StreamValue {
        self.expirations.remove(key);
        let slot = self
            .objects
            .entry(Bytes::copy_from_slice(key))
            .or_insert_with(|| Object::Stream(StreamValue::new()));
        if !matches!(slot, Object::Stream(_)) {
            *slot = Object::Stream(StreamValue::new());
        }
        match slot {
            Object::Stream(stream) => stream,
            _ => unreachable!(),
        }
    }

    /// Raw access to the object at `key`, or `None` when absent or expired
    /// (evicted here). Callers that need a specific variant check the tag.
    pub fn get_object(&mut self, key: &[u8]) -> Option<&mut Object> {
        if !self.ensure_not_expired(key) {
            return None;
        }
        self.objects.get_mut(key)
    }

    /// Removes any variant and any TTL. Returns whether a key was removed.
    pub fn del(&mut self, key: &[u8]) -> bool {
        self.expirations.remove(key);
        self.objects.remove(key).is_some()
    }

    /// The name TYPE reports for `key`, after lazy expiry.
    pub fn type_name(&mut self, key: &[u8]) -> &'static str {
        match self.get_object(key) {
            Some(object) => object.type_name(),
            None => "none",
        }
    }

    /// Checks the TTL for `key` and evicts it when past due. Returns
    /// whether the key is still valid.
    fn ensure_not_expired(&mut self, key: &[u8]) -> bool {
        let Some(&deadline) = self.expirations.get(key) else {
            return true;
        };
        if deadline <= clock::monotonic_now_ms() {
            self.objects.remove(key);
            self.expirations.remove(key);
            return false;
        }
        true
    }
}
