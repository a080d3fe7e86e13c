//! Mempool Bubbles - Main Library
//!
//! Live bubble view of unconfirmed Bitcoin transactions.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, config)
//! - **bubbles**: Feed, buffer, scene, layout and UI (re-exported from workspace)
//! - **hypersockets**: WebSocket library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use mempool_bubbles::bin_common::{load_config, ConfigType};
//! use mempool_bubbles::bubbles::visualizer::App;
//! ```

// Re-export workspace libraries for convenience
pub use bubbles;
pub use hypersockets;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config, load_config_from_env, parse_args, ConfigType};
}
