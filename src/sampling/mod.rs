//! Sampling of body surfaces with Lagrangian markers.

pub use self::sphere_sampling::{coulomb_relaxation, sphere_marker_count, sphere_markers, SphereDesc};

mod sphere_sampling;
