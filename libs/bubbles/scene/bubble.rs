use crate::domain::TransactionRecord;
use ratatui::style::Color;

use super::color::bubble_color;

/// Identity of a bubble across rebinds
///
/// The same hash can appear more than once in the buffer; `seq` is the
/// record's arrival number, so each copy keeps its own bubble until that
/// exact copy is evicted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BubbleKey {
    pub id: String,
    pub seq: u64,
}

impl BubbleKey {
    pub fn new(id: impl Into<String>, seq: u64) -> Self {
        Self { id: id.into(), seq }
    }

    pub fn of(record: &TransactionRecord) -> Self {
        Self::new(record.id.as_str(), record.seq)
    }
}

/// One circle in the simulation
///
/// Coordinates are simulation space (origin at the centre); see
/// [`screen_position`](super::screen_position).
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub key: BubbleKey,
    pub value: f64,
    pub radius: f64,
    pub color: Color,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Bubble {
    /// Create an entering bubble at rest at `(x, y)`
    pub fn new(key: BubbleKey, record: &TransactionRecord, shape_size: f64, (x, y): (f64, f64)) -> Self {
        Self {
            key,
            value: record.value,
            radius: record.scaled_value * shape_size,
            color: bubble_color(record.value),
            x,
            y,
            vx: 0.0,
            vy: 0.0,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}
