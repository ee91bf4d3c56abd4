//! The per-connection side of the reactor.
//!
//! Each accepted socket gets a task running [`handle_connection`]. The task
//! frames complete RESP arrays out of its read buffer, dispatches them
//! against the shared [`Engine`](crate::server::Engine), and drains an
//! outbox channel to the socket.
//!
//! Every byte a client receives goes through its outbox: immediate replies,
//! wake-ups triggered by other clients, and timeout nulls. The dispatcher
//! only ever sees a [`ClientHandle`]; the registry maps handles to outbox
//! senders, so blocking state never holds a connection object.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::commands::dispatcher::{CommandDispatcher, DispatchResult};
use crate::resp::{self, Frame};
use crate::server::Engine;

/// Opaque identifier the dispatcher uses to address a client.
pub type ClientHandle = u64;

/// Maps client handles to their outbox senders.
///
/// This is the write primitive injected into the dispatcher: queuing bytes
/// here is the only way any part of the server reaches a socket.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    next_handle: ClientHandle,
    outboxes: HashMap<ClientHandle, mpsc::UnboundedSender<Vec<u8>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        ClientRegistry::default()
    }

    /// Registers a connection's outbox and issues its handle.
    pub fn register(&mut self, outbox: mpsc::UnboundedSender<Vec<u8>>) -> ClientHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.outboxes.insert(handle, outbox);
        handle
    }

    pub fn unregister(&mut self, handle: ClientHandle) {
        self.outboxes.remove(&handle);
    }

    /// Queues bytes for a client. Returns false when the client is gone;
    /// callers treat that as "drop the waiter and move on".
    pub fn write(&self, handle: ClientHandle, bytes: Vec<u8>) -> bool {
        match self.outboxes.get(&handle) {
            Some(outbox) => outbox.send(bytes).is_ok(),
            None => false,
        }
    }
}

/// Serves one client connection until it closes.
pub async fn handle_connection(
    stream: TcpStream,
    engine: Arc<Mutex<Engine>>,
    dispatcher: Arc<CommandDispatcher>,
) {
    let (mut reader, mut writer) = stream.into_split();
    let (outbox, mut inbox) = mpsc::unbounded_channel::<Vec<u8>>();

    let handle = {
        let mut engine = engine.lock().await;
        engine.clients.register(outbox.clone())
    };

    let mut buf = BytesMut::with_capacity(4096);

    loop {
        // Drain every complete frame already buffered before reading again.
        loop {
            match resp::frame_command(&buf) {
                Frame::Complete(len) => {
                    let frame = buf.split_to(len);
                    let args = resp::parse_command(&frame);
                    if args.is_empty() {
                        // malformed command: dropped silently
                        continue;
                    }

                    let result = {
                        let mut engine = engine.lock().await;
                        dispatcher.dispatch(&mut engine, handle, &args)
                    };

                    match result {
                        DispatchResult::Reply(bytes) => {
                            // own outbox; only fails if we are shutting down
                            let _ = outbox.send(bytes);
                        }
                        DispatchResult::Deferred => {}
                    }
                }
                Frame::Incomplete => break,
                Frame::Corrupt => {
                    warn!(client = handle, "dropping corrupt protocol input");
                    buf.clear();
                    break;
                }
            }
        }

        tokio::select! {
            read = reader.read_buf(&mut buf) => {
                match read {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(error) => {
                        debug!(client = handle, %error, "read failed");
                        break;
                    }
                }
            }
            queued = inbox.recv() => {
                // recv is None only after unregister, which happens below
                let Some(bytes) = queued else { break };
                if let Err(error) = writer.write_all(&bytes).await {
                    debug!(client = handle, %error, "write failed");
                    break;
                }
            }
        }
    }

    {
        let mut engine = engine.lock().await;
        engine.clients.unregister(handle);
    }

    // Flush whatever was queued before the connection went away.
    while let Ok(bytes) = inbox.try_recv() {
        if writer.write_all(&bytes).await.is_err() {
            break;
        }
    }
    debug!(client = handle, "connection closed");
}
