//! Transaction records and the bounded buffer that holds the visible set

pub mod buffer;
pub mod record;

pub use buffer::{TransactionBuffer, DEFAULT_MAX_RECORDS};
pub use record::{scaled_value, TransactionRecord, MIN_SCALED_VALUE, SATOSHIS_PER_BTC};
