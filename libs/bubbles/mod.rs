//! Mempool Bubbles
//!
//! Live force-directed bubble view of unconfirmed Bitcoin transactions.
//!
//! ## Architecture
//!
//! - **feed**: blockchain.info wire types, frame parser, router and the
//!   connection controller (on top of `hypersockets`)
//! - **domain**: transaction records and the bounded FIFO buffer
//! - **scene**: bubbles, colours and keyed reconciliation against the buffer
//! - **layout**: force simulation that moves the bubbles every tick
//! - **visualizer**: terminal UI (ratatui) tying it all together
//! - **config** / **logging**: YAML configuration and tracing setup

pub mod config;
pub mod domain;
pub mod feed;
pub mod layout;
pub mod logging;
pub mod scene;
pub mod visualizer;

pub use config::{BubblesConfig, ConfigError, FeedConfig, ViewConfig};
pub use domain::{TransactionBuffer, TransactionRecord};
pub use feed::{FeedController, FeedMessage, FeedStatus};
pub use layout::{ForceSimulation, LayoutStepper};
pub use scene::{BubbleScene, Reconciliation};
