//! Normalized transaction record

use chrono::{DateTime, Utc};

/// Base units per whole coin
pub const SATOSHIS_PER_BTC: f64 = 100_000_000.0;

/// Offset added to `ln(value)` so that a 1 BTC transaction scales to 5
pub const SCALED_VALUE_OFFSET: f64 = 5.0;

/// Floor for the display scale
///
/// `ln(0)` is `-inf` and dust values below ~0.0067 BTC go negative, both of
/// which would give a degenerate radius.
pub const MIN_SCALED_VALUE: f64 = 1.0;

/// One unconfirmed transaction as seen on the feed
///
/// Never mutated once it enters the buffer; `(id, seq)` correlates it with
/// its bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Transaction hash
    pub id: String,
    /// Sum of all outputs, in BTC
    pub value: f64,
    /// `5 + ln(value)`, floored at [`MIN_SCALED_VALUE`]; display only
    pub scaled_value: f64,
    pub received_at: DateTime<Utc>,
    /// Arrival number, stamped by [`TransactionBuffer::append`](super::TransactionBuffer::append)
    pub seq: u64,
}

impl TransactionRecord {
    /// Build a record from a value already expressed in BTC
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            scaled_value: scaled_value(value),
            received_at: Utc::now(),
            seq: 0,
        }
    }

    /// Build a record from output amounts in satoshis
    pub fn from_outputs(id: impl Into<String>, outputs: impl IntoIterator<Item = u64>) -> Self {
        let total = outputs
            .into_iter()
            .fold(0u64, |acc, sats| acc.saturating_add(sats));
        Self::new(id, total as f64 / SATOSHIS_PER_BTC)
    }

    /// First `len` characters of the hash, for compact display
    pub fn short_id(&self, len: usize) -> &str {
        match self.id.char_indices().nth(len) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

/// Log-scale a BTC value for display
pub fn scaled_value(value: f64) -> f64 {
    let scaled = SCALED_VALUE_OFFSET + value.ln();
    if scaled.is_nan() {
        MIN_SCALED_VALUE
    } else {
        scaled.max(MIN_SCALED_VALUE)
    }
}
