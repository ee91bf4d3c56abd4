//! The engine and the serving loop.
//!
//! [`Engine`] owns everything the dispatcher mutates: the object store, the
//! waiter registries, and the client write registry. It lives behind a
//! single mutex, so each command runs to completion as an atomic
//! transformation and wake-ups are applied before the next command runs —
//! the same guarantee a single-threaded event loop gives, re-established
//! here by serializing dispatch.
//!
//! [`run`] binds the listener, spawns a connection task per client, and
//! drives the waiter-deadline sweep every 50 ms.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time;
use tracing::{debug, info};

use crate::clock;
use crate::commands::dispatcher::CommandDispatcher;
use crate::commands::stream_reply;
use crate::config::ServerConfig;
use crate::connection::{self, ClientRegistry};
use crate::key_value_store::{KeyValueStore, Object};
use crate::resp::RespValue;
use crate::state::State;
use crate::stream::StreamId;

/// How often waiter deadlines are swept.
const SWEEP_INTERVAL_MS: u64 = 50;

/// Everything a command execution may touch, behind one lock.
#[derive(Debug, Default)]
pub struct Engine {
    pub store: KeyValueStore,
    pub state: State,
    pub clients: ClientRegistry,
}

impl Engine {
    pub fn new() -> Self {
        Engine::default()
    }

    /// Serves parked BLPOP clients after a push to `key`.
    ///
    /// Waiters are served first-come first-served against the head of the
    /// list, until either side runs out. A waiter whose client has gone
    /// away is dropped and its value goes to the next one.
    pub fn wake_list_waiters(&mut self, key: &[u8]) {
        let Engine {
            store,
            state,
            clients,
        } = self;

        let Some(queue) = state.list_waiters.get_mut(key) else {
            return;
        };
        let Some(Object::List(list)) = store.get_object(key) else {
            return;
        };

        while !list.is_empty() {
            let Some(waiter) = queue.pop_front() else {
                break;
            };
            let Some(value) = list.pop_front() else {
                break;
            };

            let reply =
                RespValue::key_value_array(Bytes::copy_from_slice(key), value.clone()).encode();
            if !clients.write(waiter.client, reply) {
                list.push_front(value);
            }
        }

        if queue.is_empty() {
            state.list_waiters.remove(key);
        }
    }

    /// Serves parked XREAD clients after an append to `key`.
    ///
    /// Each matching waiter gets the entries strictly after its stored
    /// cursor, encoded as a one-block XREAD reply, and is removed. Waiters
    /// on other keys, or whose cursor is still at the top, stay parked.
    pub fn wake_stream_waiters(&mut self, key: &[u8]) {
        let Engine {
            store,
            state,
            clients,
        } = self;

        let Some(Object::Stream(stream)) = store.get_object(key) else {
            return;
        };

        let mut index = 0;
        while index < state.stream_waiters.len() {
            let waiter = &state.stream_waiters[index];
            if waiter.stream_key.as_ref() != key {
                index += 1;
                continue;
            }
            let Some(cursor) = StreamId::parse(&waiter.last_id) else {
                index += 1;
                continue;
            };

            let entries = stream.from_id_to_end(cursor.next());
            if entries.is_empty() {
                index += 1;
                continue;
            }

            let reply =
                stream_reply::xread_reply(&[(waiter.stream_key.clone(), entries)]).encode();
            let waiter = state.stream_waiters.remove(index);
            let _ = clients.write(waiter.client, reply);
        }
    }

    /// Expires parked clients whose deadline has passed, writing `*-1\r\n`
    /// to each.
    ///
    /// Every waiter in every list FIFO is checked, not just the head:
    /// registration order and deadline order diverge as soon as clients mix
    /// timeouts. Survivors keep their relative order.
    pub fn check_timeouts(&mut self) {
        let now = clock::monotonic_now_ms();
        let Engine {
            state, clients, ..
        } = self;

        state.list_waiters.retain(|_, queue| {
            queue.retain(|waiter| {
                if waiter.deadline_ms != 0 && waiter.deadline_ms <= now {
                    let _ = clients.write(waiter.client, RespValue::NullArray.encode());
                    false
                } else {
                    true
                }
            });
            !queue.is_empty()
        });

        state.stream_waiters.retain(|waiter| {
            if waiter.deadline_ms != 0 && waiter.deadline_ms <= now {
                let _ = clients.write(waiter.client, RespValue::NullArray.encode());
                false
            } else {
                true
            }
        });
    }
}

/// Binds the listener and serves until ctrl-c.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    let listener = TcpListener::bind((config.bind.as_str(), config.port)).await?;
    info!("listening on {}:{}", config.bind, config.port);

    let engine = Arc::new(Mutex::new(Engine::new()));
    let dispatcher = Arc::new(CommandDispatcher::new());

    let sweeper = Arc::clone(&engine);
    tokio::spawn(async move {
        let mut ticker = time::interval(Duration::from_millis(SWEEP_INTERVAL_MS));
        loop {
            ticker.tick().await;
            sweeper.lock().await.check_timeouts();
        }
    });

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                debug!(%peer, "new connection");

                let engine = Arc::clone(&engine);
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move {
                    connection::handle_connection(stream, engine, dispatcher).await;
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                return Ok(());
            }
        }
    }
}
