use super::bubble::{Bubble, BubbleKey};
use super::reconcile::{keys_for, reconcile};
use crate::domain::TransactionRecord;
use crate::layout::phyllotaxis_position;
use std::collections::HashMap;
use tracing::debug;

/// Outcome of one [`BubbleScene::bind`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindStats {
    pub entered: usize,
    pub exited: usize,
    pub kept: usize,
}

impl BindStats {
    pub fn changed(&self) -> bool {
        self.entered > 0 || self.exited > 0
    }
}

/// The current bubble set, in buffer order
#[derive(Debug, Default)]
pub struct BubbleScene {
    bubbles: Vec<Bubble>,
}

impl BubbleScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind the scene to `snapshot`
    ///
    /// Bubbles whose key left the snapshot are removed, new records get a
    /// bubble seeded on the phyllotaxis spiral at their snapshot index, and
    /// surviving bubbles keep their position and velocity.
    pub fn bind<'a, I>(&mut self, snapshot: I, shape_size: f64) -> BindStats
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let records: Vec<&TransactionRecord> = snapshot.into_iter().collect();
        let current = keys_for(records.iter().copied());
        let previous: Vec<BubbleKey> = self.bubbles.iter().map(|b| b.key.clone()).collect();
        let join = reconcile(&previous, &current);

        let mut existing: HashMap<BubbleKey, Bubble> = self
            .bubbles
            .drain(..)
            .map(|bubble| (bubble.key.clone(), bubble))
            .collect();

        // Exit
        for key in &join.to_remove {
            existing.remove(key);
        }

        let mut slots: Vec<Option<Bubble>> = std::iter::repeat_with(|| None).take(records.len()).collect();

        // Update
        for (index, key) in &join.to_keep {
            slots[*index] = existing.remove(key);
        }

        // Enter
        for (index, key) in &join.to_create {
            slots[*index] = Some(Bubble::new(
                key.clone(),
                records[*index],
                shape_size,
                phyllotaxis_position(*index),
            ));
        }

        self.bubbles = slots.into_iter().flatten().collect();

        let stats = BindStats {
            entered: join.to_create.len(),
            exited: join.to_remove.len(),
            kept: join.to_keep.len(),
        };
        debug!(
            "[Bubbles] bind: +{} -{} ={} (total {})",
            stats.entered,
            stats.exited,
            stats.kept,
            self.bubbles.len()
        );
        stats
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Mutable access for the layout stepper
    pub fn bubbles_mut(&mut self) -> &mut [Bubble] {
        &mut self.bubbles
    }

    pub fn keys(&self) -> Vec<BubbleKey> {
        self.bubbles.iter().map(|b| b.key.clone()).collect()
    }

    pub fn get(&self, key: &BubbleKey) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| &b.key == key)
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}

/// Canvas position of a bubble: simulation coordinates plus the centre offset
pub fn screen_position(bubble: &Bubble, center: (f64, f64)) -> (f64, f64) {
    (bubble.x + center.0, bubble.y + center.1)
}
