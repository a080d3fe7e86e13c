//! Routing of parsed feed frames to handler threads

use super::parser::parse_feed_message;
use super::types::FeedMessage;
use crate::domain::TransactionRecord;
use async_trait::async_trait;
use crossbeam_channel::Sender;
use hypersockets::{HyperSocketError, MessageHandler, MessageRouter, Result, WsMessage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Route keys of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedRoute {
    /// `utx` frames
    Transactions,
    /// Everything else: pongs, other ops, malformed frames
    Control,
}

/// Parses text frames; binary frames are treated as malformed
pub struct FeedRouter;

#[async_trait]
impl MessageRouter for FeedRouter {
    type Message = FeedMessage;
    type RouteKey = FeedRoute;

    async fn parse(&self, message: WsMessage) -> Result<Self::Message> {
        match message {
            WsMessage::Text(text) => Ok(parse_feed_message(&text)),
            WsMessage::Binary(data) => Ok(FeedMessage::Malformed(format!(
                "unexpected binary frame ({} bytes)",
                data.len()
            ))),
        }
    }

    fn route_key(&self, message: &Self::Message) -> Self::RouteKey {
        match message {
            FeedMessage::Transaction(_) => FeedRoute::Transactions,
            _ => FeedRoute::Control,
        }
    }
}

/// Frame counters shared between the handler threads and the UI
#[derive(Debug, Default)]
pub struct FeedStats {
    transactions: AtomicU64,
    pongs: AtomicU64,
    ignored: AtomicU64,
    malformed: AtomicU64,
}

/// Point-in-time copy of [`FeedStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedCounters {
    pub transactions: u64,
    pub pongs: u64,
    pub ignored: u64,
    pub malformed: u64,
}

impl FeedStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> FeedCounters {
        FeedCounters {
            transactions: self.transactions.load(Ordering::Relaxed),
            pongs: self.pongs.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
        }
    }

    fn record(&self, message: &FeedMessage) {
        let counter = match message {
            FeedMessage::Transaction(_) => &self.transactions,
            FeedMessage::Pong => &self.pongs,
            FeedMessage::Ignored(_) => &self.ignored,
            FeedMessage::Malformed(_) => &self.malformed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Forwards every transaction record to the UI channel
pub struct ForwardingHandler {
    records: Sender<TransactionRecord>,
    stats: Arc<FeedStats>,
}

impl ForwardingHandler {
    pub fn new(records: Sender<TransactionRecord>, stats: Arc<FeedStats>) -> Self {
        Self { records, stats }
    }
}

impl MessageHandler<FeedMessage> for ForwardingHandler {
    fn handle(&mut self, message: FeedMessage) -> Result<()> {
        self.stats.record(&message);

        if let FeedMessage::Transaction(record) = message {
            debug!("[Feed] tx {} value={:.8}", record.short_id(12), record.value);
            self.records
                .send(record)
                .map_err(|e| HyperSocketError::ChannelSend(e.to_string()))?;
        }
        Ok(())
    }
}

/// Counts and logs non-transaction frames
pub struct ControlHandler {
    stats: Arc<FeedStats>,
}

impl ControlHandler {
    pub fn new(stats: Arc<FeedStats>) -> Self {
        Self { stats }
    }
}

impl MessageHandler<FeedMessage> for ControlHandler {
    fn handle(&mut self, message: FeedMessage) -> Result<()> {
        self.stats.record(&message);

        match message {
            FeedMessage::Pong => debug!("[Feed] pong"),
            FeedMessage::Ignored(op) => info!("[Feed] Ignoring op '{}'", op),
            FeedMessage::Malformed(reason) => debug!("[Feed] Dropped malformed frame: {}", reason),
            FeedMessage::Transaction(record) => {
                debug!("[Feed] Transaction {} on control route", record.id)
            }
        }
        Ok(())
    }
}
