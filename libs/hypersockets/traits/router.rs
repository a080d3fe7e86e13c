//! Message Routing
//!
//! ```text
//! WebSocket → Router::parse (inline, in arrival order) → Route Key → Channel → Handler Thread
//! ```
//!
//! # Ordering Guarantees
//!
//! Frames are parsed on the socket task in the order the server delivered
//! them, so every handler observes its messages in arrival order.

use crate::{Result, WsMessage};
use async_trait::async_trait;
use std::fmt::Debug;
use std::hash::Hash;

/// Message router that parses WebSocket messages and determines routing
///
/// # Example
///
/// ```ignore
/// struct FeedRouter;
///
/// #[async_trait]
/// impl MessageRouter for FeedRouter {
///     type Message = FeedMessage;
///     type RouteKey = FeedRoute;
///
///     async fn parse(&self, message: WsMessage) -> Result<Self::Message> {
///         // Parse JSON and return typed message
///     }
///
///     fn route_key(&self, _message: &Self::Message) -> Self::RouteKey {
///         FeedRoute::Transactions
///     }
/// }
/// ```
#[async_trait]
pub trait MessageRouter: Send + Sync + 'static {
    /// The parsed message type
    type Message: Send + Debug + 'static;

    /// The route key type (determines which handler processes the message)
    type RouteKey: Hash + Eq + Clone + Send + Sync + Debug + 'static;

    /// Parse a raw WebSocket message into a typed message
    ///
    /// Returning `Err` drops the frame; the error is logged by the client.
    async fn parse(&self, message: WsMessage) -> Result<Self::Message>;

    /// Extract the route key from a parsed message
    fn route_key(&self, message: &Self::Message) -> Self::RouteKey;
}

/// Message handler that processes typed messages sequentially
///
/// Each handler runs on its own OS thread, not in an async context.
/// Errors are logged and the thread keeps going.
pub trait MessageHandler<M>: Send + 'static
where
    M: Send + Debug + 'static,
{
    fn handle(&mut self, message: M) -> Result<()>;
}
