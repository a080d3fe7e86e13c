//! # HyperSockets core
//!
//! ## Example
//!
//! ```rust,ignore
//! let client = hypersockets::builder()
//!     .url("wss://ws.blockchain.info/inv")
//!     .router(FeedRouter, |routing| {
//!         routing.handler(FeedRoute::Transactions, ForwardingHandler::new(tx))
//!     })
//!     .heartbeat(Duration::from_secs(30), WsMessage::text("{\"op\":\"ping\"}"))
//!     .reconnect_strategy(ExponentialBackoff::new(
//!         Duration::from_secs(1),
//!         Duration::from_secs(60),
//!         Some(5),
//!     ))
//!     .build()
//!     .await?;
//!
//! client.send(WsMessage::text("{\"op\":\"unconfirmed_sub\"}"))?;
//!
//! while let Some(event) = client.try_recv_event() {
//!     println!("Event: {:?}", event);
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connection_state;
pub mod heartbeat;

// Re-export main types
pub use builder::{states, RoutingBuilder, WebSocketClientBuilder};
pub use client::{ClientEvent, Metrics, WebSocketClient};
pub use config::ClientConfig;
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};

// Re-export traits for convenience
pub use crate::traits::*;

/// Create a new WebSocket client builder
pub fn builder() -> WebSocketClientBuilder<
    builder::states::NoUrl,
    builder::states::NoRouter,
    (),
> {
    WebSocketClientBuilder::new()
}
