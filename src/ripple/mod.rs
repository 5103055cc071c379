//! Ripple events: bounded pool, lifecycle, and collision debouncing.

mod contact;
mod pool;

pub use contact::{ContactTracker, HitRecord};
pub use pool::{RippleEvent, RipplePool, MAX_RIPPLES};
