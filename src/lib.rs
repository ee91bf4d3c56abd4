//! An in-memory key-value server speaking the Redis wire protocol.
//!
//! coraldb implements a byte-exact RESP2 subset over TCP:
//!
//! - String keys with millisecond TTL (GET, SET, SET ... PX)
//! - Lists with blocking consumers (RPUSH, LPUSH, LRANGE, LLEN, LPOP, BLPOP)
//! - Append-only streams with strictly monotonic entry IDs and
//!   range/blocking reads (XADD, XRANGE, XREAD)
//! - PING, ECHO, TYPE
//!
//! Commands execute serially against a single engine, so every command is
//! an atomic transformation of the store and the blocking registries.
//! Blocking commands defer their reply; a later push or append from another
//! client, or a deadline sweep, writes it.

pub mod clock;
pub mod commands;
pub mod config;
pub mod connection;
pub mod key_value_store;
pub mod list;
pub mod resp;
pub mod server;
pub mod state;
pub mod stream;
