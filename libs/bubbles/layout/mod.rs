//! Layout stepping for the bubble scene

pub mod force;

pub use force::{phyllotaxis_position, ForceSimulation, SimulationParams};

use crate::scene::Bubble;

/// Moves bubbles one tick at a time
///
/// The scene owns the bubbles; a stepper only borrows them for one tick.
pub trait LayoutStepper {
    /// Re-energize the layout after the bubble set changed
    fn restart(&mut self);

    /// Advance one tick
    fn step(&mut self, nodes: &mut [Bubble]);

    /// Current energy
    fn alpha(&self) -> f64;
}
