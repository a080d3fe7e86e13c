use crate::traits::*;
use crossbeam_channel::Sender;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Per-route handler channels
pub type RouteSenders<R> =
    HashMap<<R as MessageRouter>::RouteKey, Sender<<R as MessageRouter>::Message>>;

/// Configuration for WebSocketClient
///
/// Produced by the type-state builder and shared with the socket task.
pub struct ClientConfig<R>
where
    R: MessageRouter,
{
    /// WebSocket URL (wss:// or ws://)
    pub(crate) url: String,

    /// Message router for parsing and routing messages
    pub(crate) router: Arc<R>,

    /// Channel senders mapped by route key
    pub(crate) route_senders: RouteSenders<R>,

    /// Optional heartbeat configuration (interval, payload)
    pub(crate) heartbeat: Option<(Duration, WsMessage)>,

    /// Reconnection strategy
    pub(crate) reconnect_strategy: Box<dyn ReconnectionStrategy>,

    /// Messages sent after every successful connect
    pub(crate) subscriptions: Vec<WsMessage>,

    /// `false` stops the client and prevents reconnection
    pub(crate) shutdown_flag: Arc<AtomicBool>,
}
