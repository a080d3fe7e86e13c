//! Main application state and logic for the visualizer

use anyhow::Result;
use crossbeam_channel::Receiver;
use hypersockets::ClientEvent;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

use crate::config::BubblesConfig;
use crate::domain::TransactionRecord;
use crate::feed::{FeedController, FeedStatus};

use super::state::{FeedSummary, VisualizerState};

/// Main application state
pub struct App {
    /// Buffer, bubbles and layout
    pub state: VisualizerState,
    /// Live feed connection
    controller: FeedController,
    /// Records forwarded by the feed handler
    records: Receiver<TransactionRecord>,
    /// Tokio runtime handle
    runtime: Handle,
    /// Whether to quit
    pub should_quit: bool,
    /// Status message to show in footer
    pub status_message: Option<String>,
}

impl App {
    /// Open the feed and set up an empty scene
    pub async fn initialize(runtime: Handle, config: &BubblesConfig) -> Result<Self> {
        let (records_tx, records) = crossbeam_channel::unbounded();

        info!("[Bubbles] Opening feed {}", config.feed.url);
        let controller = FeedController::connect(&config.feed, records_tx).await?;

        Ok(Self {
            state: VisualizerState::new(config.view.clone()),
            controller,
            records,
            runtime,
            should_quit: false,
            status_message: None,
        })
    }

    /// Drain queued records and connection events
    pub fn update(&mut self) {
        self.state.drain(&self.records);

        while let Some(event) = self.controller.try_recv_event() {
            match event {
                ClientEvent::Connected => {
                    info!("[Bubbles] Feed connected");
                    self.status_message = Some("Connected. Press s to start".to_string());
                }
                ClientEvent::Disconnected => {
                    warn!("[Bubbles] Feed disconnected");
                    self.status_message = Some("Disconnected".to_string());
                }
                ClientEvent::Reconnecting(attempt) => {
                    self.status_message = Some(format!("Reconnecting (attempt {})", attempt));
                }
                ClientEvent::Error(e) => {
                    error!("[Bubbles] Feed error: {}", e);
                    self.status_message = Some(format!("Error: {}", e));
                }
            }
        }
    }

    /// Advance the layout one tick
    pub fn tick(&mut self) {
        self.state.tick();
    }

    /// Subscribe to unconfirmed transactions
    pub fn start(&mut self) {
        self.status_message = Some(if self.controller.start() {
            "Subscribed".to_string()
        } else {
            "Not connected, start ignored".to_string()
        });
    }

    /// Unsubscribe; bubbles already on screen stay
    pub fn stop(&mut self) {
        self.status_message = Some(if self.controller.stop() {
            "Unsubscribed".to_string()
        } else {
            "Not connected, stop ignored".to_string()
        });
    }

    /// Ask the server for its latest transaction
    pub fn request_latest(&mut self) {
        self.status_message = Some(if self.controller.request_latest() {
            "Requested latest transaction".to_string()
        } else {
            "Not connected, request ignored".to_string()
        });
    }

    pub fn status(&self) -> FeedStatus {
        self.controller.status()
    }

    pub fn feed_summary(&self) -> FeedSummary {
        FeedSummary {
            status: self.status(),
            frames_received: self.controller.metrics().messages_received,
            status_message: self.status_message.clone(),
        }
    }

    /// Close the feed and wait for its tasks
    pub fn shutdown(self) {
        info!("[Bubbles] Shutting down...");
        let App {
            controller, runtime, ..
        } = self;

        if let Err(e) = runtime.block_on(controller.shutdown()) {
            warn!("[Bubbles] Feed shutdown failed: {}", e);
        }
    }
}
