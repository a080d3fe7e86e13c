//! Bounded, insertion-ordered transaction buffer

use super::record::TransactionRecord;
use std::collections::VecDeque;

/// Default number of transactions kept on screen
pub const DEFAULT_MAX_RECORDS: usize = 400;

/// Fixed-capacity FIFO of the most recent transactions, oldest first
///
/// Every append past capacity evicts exactly one record from the head.
/// Records with the same `id` are not deduplicated; each append gets the next
/// `seq`, so duplicates stay distinguishable.
#[derive(Debug, Clone)]
pub struct TransactionBuffer {
    records: VecDeque<TransactionRecord>,
    capacity: usize,
    next_seq: u64,
}

impl TransactionBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity + 1),
            capacity,
            next_seq: 0,
        }
    }

    /// Stamp `record` with the next arrival number and insert it at the tail
    ///
    /// Returns the evicted head record, if any.
    pub fn append(&mut self, mut record: TransactionRecord) -> Option<TransactionRecord> {
        record.seq = self.next_seq;
        self.next_seq += 1;
        self.records.push_back(record);
        if self.records.len() > self.capacity {
            self.records.pop_front()
        } else {
            None
        }
    }

    /// Current contents, oldest first
    pub fn snapshot(&self) -> &VecDeque<TransactionRecord> {
        &self.records
    }

    /// Most recently appended record
    pub fn latest(&self) -> Option<&TransactionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TransactionBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORDS)
    }
}
