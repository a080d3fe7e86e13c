//! Bubbles bound to the buffer contents

pub mod binding;
pub mod bubble;
pub mod color;
pub mod reconcile;

pub use binding::{screen_position, BindStats, BubbleScene};
pub use bubble::{Bubble, BubbleKey};
pub use color::{bubble_color, hsl_to_rgb};
pub use reconcile::{keys_for, reconcile, Reconciliation};
