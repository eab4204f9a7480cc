//! Two-way coupling between the markers and the lattice fluid.

pub use self::field_coupling::FieldCoupling;
pub use self::interpolation_spread::InterpolationSpread;

mod field_coupling;
mod interpolation_spread;
