//! Common test utilities for the bubbles integration tests

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Notify};
use tokio_tungstenite::tungstenite::Message;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Hash of the transaction returned for `ping_tx`
pub const LATEST_TX_HASH: &str = "latest0000";

/// `utx` frame with one output per entry of `outputs` (satoshis)
pub fn utx_frame(hash: &str, outputs: &[u64]) -> String {
    let out: Vec<String> = outputs
        .iter()
        .enumerate()
        .map(|(n, value)| format!(r#"{{"value":{},"n":{},"addr":"bc1qtest"}}"#, value, n))
        .collect();
    format!(
        r#"{{"op":"utx","x":{{"hash":"{}","size":225,"inputs":[],"out":[{}]}}}}"#,
        hash,
        out.join(",")
    )
}

/// A local stand-in for the blockchain.info push feed
///
/// Understands `unconfirmed_sub`, `unconfirmed_unsub`, `ping` and
/// `ping_tx`. Frames given to [`publish`](Self::publish) reach only
/// connections that are currently subscribed.
pub struct MockFeedServer {
    pub addr: SocketAddr,
    commands: Arc<Mutex<Vec<String>>>,
    publisher: broadcast::Sender<String>,
    shutdown: Arc<Notify>,
}

impl MockFeedServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let commands = Arc::new(Mutex::new(Vec::new()));
        let (publisher, _) = broadcast::channel(256);
        let shutdown = Arc::new(Notify::new());

        let accept_commands = Arc::clone(&commands);
        let accept_publisher = publisher.clone();
        let accept_shutdown = Arc::clone(&shutdown);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                let commands = Arc::clone(&accept_commands);
                                let frames = accept_publisher.subscribe();
                                let shutdown = Arc::clone(&accept_shutdown);
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, commands, frames, shutdown).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = accept_shutdown.notified() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            commands,
            publisher,
            shutdown,
        }
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        commands: Arc<Mutex<Vec<String>>>,
        mut frames: broadcast::Receiver<String>,
        shutdown: Arc<Notify>,
    ) {
        let ws_stream = match tokio_tungstenite::accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();
        let mut subscribed = false;

        loop {
            tokio::select! {
                msg = read.next() => {
                    let text = match msg {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                        Some(Ok(_)) => continue,
                    };
                    verbose_println!("  server <- {}", text);
                    commands.lock().unwrap().push(text.clone());

                    let reply = match text.as_str() {
                        r#"{"op":"unconfirmed_sub"}"# => {
                            subscribed = true;
                            None
                        }
                        r#"{"op":"unconfirmed_unsub"}"# => {
                            subscribed = false;
                            None
                        }
                        r#"{"op":"ping"}"# => Some(r#"{"op":"pong"}"#.to_string()),
                        r#"{"op":"ping_tx"}"# => Some(utx_frame(LATEST_TX_HASH, &[42_000_000])),
                        _ => None,
                    };

                    if let Some(reply) = reply {
                        if write.send(Message::Text(reply)).await.is_err() {
                            break;
                        }
                    }
                }
                frame = frames.recv() => {
                    match frame {
                        Ok(frame) if subscribed => {
                            if write.send(Message::Text(frame)).await.is_err() {
                                break;
                            }
                        }
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = shutdown.notified() => {
                    break;
                }
            }
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Push a frame to every subscribed connection
    pub fn publish(&self, frame: impl Into<String>) {
        let _ = self.publisher.send(frame.into());
    }

    /// Every text frame received so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Poll until `command` has been received `count` times
    pub async fn wait_for_command(&self, command: &str, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.commands().iter().filter(|c| c.as_str() == command).count() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockFeedServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
