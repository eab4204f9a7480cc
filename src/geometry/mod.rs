//! Acceleration data structures for collision detection.

pub use self::hgrid::{DeterministicState, HGrid};

mod hgrid;
