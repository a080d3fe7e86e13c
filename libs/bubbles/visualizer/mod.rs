//! Bubbles visualizer
//!
//! Terminal UI that shows every unconfirmed transaction on the feed as a
//! bubble in a force-directed layout.

pub mod app;
pub mod state;
pub mod ui;

pub use app::App;
pub use state::{FeedSummary, VisualizerState};
