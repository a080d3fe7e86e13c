//! Connection controller: owns the WebSocket client and exposes the
//! subscribe / unsubscribe / latest-tx commands

use super::router::{ControlHandler, FeedCounters, FeedRoute, FeedRouter, FeedStats, ForwardingHandler};
use super::types::FeedCommand;
use crate::config::FeedConfig;
use crate::domain::TransactionRecord;
use crossbeam_channel::Sender;
use hypersockets::{
    ClientEvent, ConnectionState, ExponentialBackoff, Metrics, NeverReconnect, Result,
    WebSocketClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Upper bound for the exponential reconnect delay
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);

/// Status shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Connecting,
    Connected,
}

impl FeedStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FeedStatus::Connecting => "Connecting...",
            FeedStatus::Connected => "Connected",
        }
    }
}

impl From<ConnectionState> for FeedStatus {
    fn from(state: ConnectionState) -> Self {
        match state {
            ConnectionState::Connected => FeedStatus::Connected,
            _ => FeedStatus::Connecting,
        }
    }
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Handle to the live feed
///
/// Dropping the controller stops the socket task; [`shutdown`](Self::shutdown)
/// additionally waits for it.
pub struct FeedController {
    client: WebSocketClient<FeedRouter>,
    stats: Arc<FeedStats>,
}

impl FeedController {
    /// Open the feed; accepted transactions are sent to `records`
    ///
    /// Must be called inside a tokio runtime. The connection is made in the
    /// background, watch [`status`](Self::status) for it to come up.
    pub async fn connect(config: &FeedConfig, records: Sender<TransactionRecord>) -> Result<Self> {
        let stats = Arc::new(FeedStats::new());

        let forwarding = ForwardingHandler::new(records, Arc::clone(&stats));
        let control = ControlHandler::new(Arc::clone(&stats));

        let mut builder = hypersockets::builder()
            .url(config.url.as_str())
            .router(FeedRouter, |routing| {
                routing
                    .handler(FeedRoute::Transactions, forwarding)
                    .handler(FeedRoute::Control, control)
            });

        builder = if config.max_reconnect_attempts == 0 {
            builder.reconnect_strategy(NeverReconnect)
        } else {
            builder.reconnect_strategy(ExponentialBackoff::new(
                config.reconnect_initial_delay(),
                MAX_RECONNECT_DELAY,
                Some(config.max_reconnect_attempts),
            ))
        };

        if let Some(interval) = config.heartbeat_interval() {
            builder = builder.heartbeat(interval, FeedCommand::Ping.to_message());
        }

        if config.subscribe_on_connect {
            builder = builder.subscription(FeedCommand::Subscribe.to_message());
        }

        let client = builder.build().await?;
        info!("[Feed] Connecting to {}", config.url);

        Ok(Self { client, stats })
    }

    /// Subscribe to unconfirmed transactions
    pub fn start(&self) -> bool {
        self.send_command(FeedCommand::Subscribe)
    }

    /// Unsubscribe from unconfirmed transactions
    pub fn stop(&self) -> bool {
        self.send_command(FeedCommand::Unsubscribe)
    }

    /// Ask the server for its latest transaction
    pub fn request_latest(&self) -> bool {
        self.send_command(FeedCommand::LatestTransaction)
    }

    /// Returns `false` without sending when the socket is not open
    fn send_command(&self, command: FeedCommand) -> bool {
        if !self.client.is_connected() {
            warn!("[Feed] Not connected, dropping {} command", command);
            return false;
        }

        match self.client.send(command.to_message()) {
            Ok(()) => {
                info!("[Feed] Sent {} command", command);
                true
            }
            Err(e) => {
                warn!("[Feed] Failed to send {} command: {}", command, e);
                false
            }
        }
    }

    pub fn status(&self) -> FeedStatus {
        self.client.connection_state().into()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.client.connection_state()
    }

    /// Transport counters
    pub fn metrics(&self) -> Metrics {
        self.client.metrics()
    }

    /// Per-kind frame counters
    pub fn counters(&self) -> FeedCounters {
        self.stats.snapshot()
    }

    /// Next pending lifecycle event, if any
    pub fn try_recv_event(&self) -> Option<ClientEvent> {
        self.client.try_recv_event()
    }

    /// Close the connection and wait for the socket task and handlers
    pub async fn shutdown(self) -> Result<()> {
        info!("[Feed] Shutting down");
        self.client.shutdown().await
    }
}
