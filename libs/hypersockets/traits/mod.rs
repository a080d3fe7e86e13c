//! # HyperSockets Traits
//!
//! Core traits and types shared by the client:
//!
//! - **WsMessage**: transport-agnostic text/binary frame
//! - **MessageRouter**: parse a frame and pick the handler route
//! - **MessageHandler**: consume parsed messages sequentially
//! - **ReconnectionStrategy**: control reconnection behavior

pub mod error;
pub mod message;
pub mod reconnect;
pub mod router;

// Re-export commonly used types
pub use error::{HyperSocketError, Result};
pub use message::WsMessage;
pub use reconnect::{ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectionStrategy};
pub use router::{MessageHandler, MessageRouter};
