//! Registries for clients whose reply is deferred.
//!
//! Blocking commands never hold a connection object; they enroll a
//! [`ClientHandle`] here and return without writing. A later push, stream
//! append, or deadline sweep produces the reply. Waiters survive the key
//! they reference being absent: BLPOP on a list that does not exist yet is
//! woken by the push that creates it.

use std::collections::{HashMap, VecDeque};

use bytes::Bytes;

use crate::connection::ClientHandle;

/// A client parked by BLPOP. `deadline_ms == 0` means "block forever".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListWaiter {
    pub client: ClientHandle,
    pub deadline_ms: u64,
}

/// A client parked by a blocking XREAD, one per `(key, cursor)` pair.
///
/// `last_id` is the raw cursor the client sent; wake-up delivers entries
/// strictly after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamWaiter {
    pub client: ClientHandle,
    pub deadline_ms: u64,
    pub stream_key: Bytes,
    pub last_id: Bytes,
}

#[derive(Debug, Default)]
pub struct State {
    /// list key -> FIFO of blocked BLPOP clients, in registration order.
    pub list_waiters: HashMap<Bytes, VecDeque<ListWaiter>>,
    /// Flat list of blocked XREAD clients, scanned on append and on sweep.
    pub stream_waiters: Vec<StreamWaiter>,
}

impl State {
    pub fn new() -> Self {
        State::default()
    }

    /// Parks a BLPOP client at the tail of the key's FIFO.
    pub fn enroll_list_waiter(&mut self, key: Bytes, waiter: ListWaiter) {
        self.list_waiters.entry(key).or_default().push_back(waiter);
    }

    pub fn enroll_stream_waiter(&mut self, waiter: StreamWaiter) {
        self.stream_waiters.push(waiter);
    }

    /// Drops an empty FIFO entry so the map does not accumulate dead keys.
    pub fn purge_list_queue_if_empty(&mut self, key: &[u8]) {
        if self
            .list_waiters
            .get(key)
            .is_some_and(|queue| queue.is_empty())
        {
            self.list_waiters.remove(key);
        }
    }
}
