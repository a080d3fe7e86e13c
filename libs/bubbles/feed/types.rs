//! blockchain.info WebSocket message types
//!
//! Every frame is a JSON object with an `op` discriminant. Unconfirmed
//! transactions arrive as:
//!
//! ```json
//! {
//!     "op": "utx",
//!     "x": {
//!         "hash": "f2c6...",
//!         "size": 225,
//!         "inputs": [ ... ],
//!         "out": [ { "value": 1250000, "addr": "bc1q...", "n": 0 } ]
//!     }
//! }
//! ```

use crate::domain::TransactionRecord;
use hypersockets::WsMessage;
use serde::Deserialize;

/// `op` of an unconfirmed transaction frame
pub const OP_UNCONFIRMED_TX: &str = "utx";

/// `op` of the reply to a heartbeat ping
pub const OP_PONG: &str = "pong";

// =============================================================================
// Inbound
// =============================================================================

/// Discriminant-only view of any frame
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEnvelope {
    pub op: String,
}

/// Full `utx` frame
#[derive(Debug, Clone, Deserialize)]
pub struct UtxFrame {
    pub x: UtxPayload,
}

/// Transaction body of a `utx` frame; fields we don't use are skipped
#[derive(Debug, Clone, Deserialize)]
pub struct UtxPayload {
    pub hash: String,
    pub out: Vec<UtxOutput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UtxOutput {
    /// Amount in satoshis
    #[serde(default)]
    pub value: u64,
}

impl UtxPayload {
    pub fn into_record(self) -> TransactionRecord {
        TransactionRecord::from_outputs(self.hash, self.out.into_iter().map(|o| o.value))
    }
}

/// A parsed feed frame
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// `utx` frame normalized into a record
    Transaction(TransactionRecord),
    /// Heartbeat reply
    Pong,
    /// Any other `op`; not an error
    Ignored(String),
    /// Unparsable frame; dropped
    Malformed(String),
}

// =============================================================================
// Outbound
// =============================================================================

/// Commands understood by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    /// Start receiving unconfirmed transactions
    Subscribe,
    /// Stop receiving unconfirmed transactions
    Unsubscribe,
    /// Ask for the latest transaction, delivered as a `utx` frame
    LatestTransaction,
    /// Keep-alive; answered with `pong`
    Ping,
}

impl FeedCommand {
    pub fn as_json(&self) -> &'static str {
        match self {
            FeedCommand::Subscribe => r#"{"op":"unconfirmed_sub"}"#,
            FeedCommand::Unsubscribe => r#"{"op":"unconfirmed_unsub"}"#,
            FeedCommand::LatestTransaction => r#"{"op":"ping_tx"}"#,
            FeedCommand::Ping => r#"{"op":"ping"}"#,
        }
    }

    pub fn to_message(self) -> WsMessage {
        WsMessage::text(self.as_json())
    }
}

impl std::fmt::Display for FeedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FeedCommand::Subscribe => "subscribe",
            FeedCommand::Unsubscribe => "unsubscribe",
            FeedCommand::LatestTransaction => "latest-tx",
            FeedCommand::Ping => "ping",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_payloads() {
        assert_eq!(FeedCommand::Subscribe.as_json(), "{\"op\":\"unconfirmed_sub\"}");
        assert_eq!(FeedCommand::Unsubscribe.as_json(), "{\"op\":\"unconfirmed_unsub\"}");
        assert_eq!(FeedCommand::LatestTransaction.as_json(), "{\"op\":\"ping_tx\"}");
        assert_eq!(FeedCommand::Ping.as_json(), "{\"op\":\"ping\"}");
    }

    #[test]
    fn test_commands_are_valid_json() {
        for cmd in [
            FeedCommand::Subscribe,
            FeedCommand::Unsubscribe,
            FeedCommand::LatestTransaction,
            FeedCommand::Ping,
        ] {
            let envelope: FeedEnvelope = serde_json::from_str(cmd.as_json()).unwrap();
            assert!(!envelope.op.is_empty());
        }
    }
}
