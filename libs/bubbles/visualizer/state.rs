//! State management for the visualizer
//!
//! Single owner of the buffer, the scene and the layout. Lives on the UI
//! thread; records reach it over a channel.

use crossbeam_channel::Receiver;
use tracing::debug;

use crate::config::ViewConfig;
use crate::domain::{TransactionBuffer, TransactionRecord};
use crate::feed::FeedStatus;
use crate::layout::{ForceSimulation, LayoutStepper};
use crate::scene::{BindStats, BubbleScene};

/// Buffer + scene + layout
pub struct VisualizerState {
    view: ViewConfig,
    buffer: TransactionBuffer,
    scene: BubbleScene,
    layout: Box<dyn LayoutStepper + Send>,
    accepted: u64,
    evictions: u64,
}

impl VisualizerState {
    pub fn new(view: ViewConfig) -> Self {
        Self::with_layout(view, Box::new(ForceSimulation::default()))
    }

    pub fn with_layout(view: ViewConfig, layout: Box<dyn LayoutStepper + Send>) -> Self {
        Self {
            buffer: TransactionBuffer::new(view.max_records),
            view,
            scene: BubbleScene::new(),
            layout,
            accepted: 0,
            evictions: 0,
        }
    }

    /// Append one record, rebind the scene and restart the layout
    pub fn ingest(&mut self, record: TransactionRecord) -> BindStats {
        self.accepted += 1;
        if let Some(evicted) = self.buffer.append(record) {
            self.evictions += 1;
            debug!("[Bubbles] Evicted {}", evicted.short_id(12));
        }

        let stats = self.scene.bind(self.buffer.snapshot(), self.view.shape_size);
        self.layout.restart();
        stats
    }

    /// Ingest everything currently queued on `records`
    ///
    /// Returns how many records were taken.
    pub fn drain(&mut self, records: &Receiver<TransactionRecord>) -> usize {
        let mut taken = 0;
        while let Ok(record) = records.try_recv() {
            self.ingest(record);
            taken += 1;
        }
        taken
    }

    /// Advance the layout one tick
    pub fn tick(&mut self) {
        self.layout.step(self.scene.bubbles_mut());
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn buffer(&self) -> &TransactionBuffer {
        &self.buffer
    }

    pub fn scene(&self) -> &BubbleScene {
        &self.scene
    }

    pub fn latest(&self) -> Option<&TransactionRecord> {
        self.buffer.latest()
    }

    pub fn alpha(&self) -> f64 {
        self.layout.alpha()
    }

    /// Records accepted since start
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }
}

/// What the header and footer show about the feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSummary {
    pub status: FeedStatus,
    /// Frames read off the socket
    pub frames_received: u64,
    pub status_message: Option<String>,
}

impl Default for FeedSummary {
    fn default() -> Self {
        Self {
            status: FeedStatus::Connecting,
            frames_received: 0,
            status_message: None,
        }
    }
}
