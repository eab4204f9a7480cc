#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::lattice::FluidField;
use crate::math::Real;
use crate::object::MarkerSet;
use crate::params::IbmParams;

/// Applies the spread forces to the fluid.
#[derive(Copy, Clone, Debug)]
pub struct FieldCoupling {
    forcing_fraction: Real,
}

impl FieldCoupling {
    /// Creates the coupling with the forcing fraction of `params`.
    pub fn new(params: &IbmParams) -> Self {
        Self {
            forcing_fraction: params.forcing_fraction,
        }
    }

    /// Clears the lattice force buffers and the force of every marker.
    pub fn reset(&self, field: &mut FluidField, markers: &mut MarkerSet) {
        field.reset_forces();
        par_iter_mut!(markers.forces).for_each(|f| f.fill(0.0));
    }

    /// Folds the spread buffer into the fluid.
    ///
    /// Each node velocity is corrected by `α dt F / ρ`, then `F` is added to the force buffer read
    /// by the fluid solver and the spread buffer is cleared for the next pass.
    pub fn fold(&self, field: &mut FluidField, dt: Real) {
        let scale = self.forcing_fraction * dt;
        let (densities, velocities, forces, spread) = field.fold_parts_mut();

        par_iter_mut!(velocities)
            .zip(forces)
            .zip(spread)
            .zip(densities)
            .for_each(|(((velocity, force), spread), density)| {
                if *density > 0.0 {
                    *velocity += *spread * (scale / *density);
                }

                *force += *spread;
                spread.fill(0.0);
            });
    }
}
