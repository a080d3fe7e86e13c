//! Frame parser: raw text → [`FeedMessage`]

use super::types::{FeedEnvelope, FeedMessage, UtxFrame, OP_PONG, OP_UNCONFIRMED_TX};
use tracing::debug;

/// Parse one text frame from the feed
///
/// Only `utx` frames produce a record. Malformed input never errors; it
/// comes back as [`FeedMessage::Malformed`] for the caller to drop.
pub fn parse_feed_message(text: &str) -> FeedMessage {
    let envelope = match serde_json::from_str::<FeedEnvelope>(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!("[Feed] Unparsable frame: {}", e);
            return FeedMessage::Malformed(e.to_string());
        }
    };

    match envelope.op.as_str() {
        OP_UNCONFIRMED_TX => match serde_json::from_str::<UtxFrame>(text) {
            Ok(frame) => FeedMessage::Transaction(frame.x.into_record()),
            Err(e) => {
                debug!("[Feed] Malformed utx frame: {}", e);
                FeedMessage::Malformed(e.to_string())
            }
        },
        OP_PONG => FeedMessage::Pong,
        _ => FeedMessage::Ignored(envelope.op),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MIN_SCALED_VALUE;

    fn expect_record(text: &str) -> crate::domain::TransactionRecord {
        match parse_feed_message(text) {
            FeedMessage::Transaction(record) => record,
            other => panic!("expected transaction, got {:?}", other),
        }
    }

    #[test]
    fn test_single_output_of_one_btc() {
        let record = expect_record(r#"{"op":"utx","x":{"hash":"abc","out":[{"value":100000000}]}}"#);
        assert_eq!(record.id, "abc");
        assert_eq!(record.value, 1.0);
        assert!((record.scaled_value - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_outputs_are_summed() {
        let record = expect_record(
            r#"{"op":"utx","x":{"hash":"h","out":[{"value":30000000,"n":0},{"value":20000000,"n":1}]}}"#,
        );
        assert!((record.value - 0.5).abs() < 1e-12);
        assert!((record.scaled_value - (5.0 + 0.5f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_empty_outputs_give_zero_value_and_floor_scale() {
        let record = expect_record(r#"{"op":"utx","x":{"hash":"empty","out":[]}}"#);
        assert_eq!(record.value, 0.0);
        assert_eq!(record.scaled_value, MIN_SCALED_VALUE);
    }

    #[test]
    fn test_output_without_value_counts_as_zero() {
        let record = expect_record(
            r#"{"op":"utx","x":{"hash":"h","out":[{"addr":"x"},{"value":100000000}]}}"#,
        );
        assert_eq!(record.value, 1.0);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let record = expect_record(
            r#"{"op":"utx","x":{"lock_time":0,"ver":2,"size":225,"inputs":[],"time":1700000000,
                "tx_index":0,"hash":"full","relayed_by":"0.0.0.0",
                "out":[{"spent":false,"type":0,"addr":"bc1q","value":250000000,"n":0,"script":"00"}]}}"#,
        );
        assert_eq!(record.id, "full");
        assert_eq!(record.value, 2.5);
    }

    #[test]
    fn test_other_ops_are_ignored() {
        assert_eq!(
            parse_feed_message(r#"{"op":"block","x":{"height":1}}"#),
            FeedMessage::Ignored("block".to_string())
        );
        assert_eq!(parse_feed_message(r#"{"op":"pong"}"#), FeedMessage::Pong);
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(parse_feed_message("not json"), FeedMessage::Malformed(_)));
        assert!(matches!(parse_feed_message(r#"{"x":{}}"#), FeedMessage::Malformed(_)));
        assert!(matches!(
            parse_feed_message(r#"{"op":"utx","x":{"out":[]}}"#),
            FeedMessage::Malformed(_)
        ));
        assert!(matches!(
            parse_feed_message(r#"{"op":"utx","x":{"hash":"h","out":[{"value":-5}]}}"#),
            FeedMessage::Malformed(_)
        ));
    }
}
