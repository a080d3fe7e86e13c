//! Keyed join between the previous bubble set and the current buffer
//!
//! Pure data: no rendering or layout involved.

use super::bubble::BubbleKey;
use crate::domain::TransactionRecord;
use std::collections::HashSet;

/// Result of joining previous keys against the current keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Previous keys that are gone
    pub to_remove: Vec<BubbleKey>,
    /// `(snapshot index, key)` of records that need a new bubble
    pub to_create: Vec<(usize, BubbleKey)>,
    /// `(snapshot index, key)` of records whose bubble survives
    pub to_keep: Vec<(usize, BubbleKey)>,
}

impl Reconciliation {
    /// True when the join changes nothing
    pub fn is_noop(&self) -> bool {
        self.to_remove.is_empty() && self.to_create.is_empty()
    }
}

/// Key every record by `(id, seq)`, in order
pub fn keys_for<'a, I>(records: I) -> Vec<BubbleKey>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    records.into_iter().map(BubbleKey::of).collect()
}

/// Join `previous` keys against `current` keys
///
/// `to_create` and `to_keep` follow `current` order, `to_remove` follows
/// `previous` order.
pub fn reconcile(previous: &[BubbleKey], current: &[BubbleKey]) -> Reconciliation {
    let previous_set: HashSet<&BubbleKey> = previous.iter().collect();
    let current_set: HashSet<&BubbleKey> = current.iter().collect();

    let to_remove = previous
        .iter()
        .filter(|key| !current_set.contains(key))
        .cloned()
        .collect();

    let mut to_create = Vec::new();
    let mut to_keep = Vec::new();
    for (index, key) in current.iter().enumerate() {
        if previous_set.contains(key) {
            to_keep.push((index, key.clone()));
        } else {
            to_create.push((index, key.clone()));
        }
    }

    Reconciliation {
        to_remove,
        to_create,
        to_keep,
    }
}
