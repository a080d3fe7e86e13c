//! blockchain.info feed: wire types, parsing, routing and connection control

pub mod controller;
pub mod parser;
pub mod router;
pub mod types;

pub use controller::{FeedController, FeedStatus};
pub use parser::parse_feed_message;
pub use router::{ControlHandler, FeedCounters, FeedRoute, FeedRouter, FeedStats, ForwardingHandler};
pub use types::{FeedCommand, FeedMessage, UtxOutput, UtxPayload};
