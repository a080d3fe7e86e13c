//! # HyperSockets
//!
//! A small, modular WebSocket client for push-style feeds.
//!
//! ## Features
//!
//! - **Type-state builder**: URL and router must be set before `build()` compiles
//! - **In-order parsing**: frames are parsed inline, in the order the server sent them
//! - **Routed handlers**: each route key is served by its own handler thread
//! - **Pluggable reconnection**: exponential backoff, fixed delay or never
//! - **Heartbeat**: optional periodic application-level ping

pub mod traits;
pub mod core;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use self::core::{
    builder, client, config, connection_state, heartbeat,
    builder::{states, RoutingBuilder, WebSocketClientBuilder},
    client::{ClientEvent, Metrics, WebSocketClient},
    config::ClientConfig,
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState},
};

// Convenience function
pub use self::core::builder as client_builder;

/// Type alias for Result with HyperSocketError
pub type Result<T> = std::result::Result<T, traits::HyperSocketError>;
