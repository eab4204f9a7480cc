#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::kernel::{DeltaKernel, PeskinKernel};
use crate::lattice::{FluidField, LatticeDomain};
use crate::math::Real;
use crate::object::MarkerSet;
use crate::params::IbmParams;

/// Transfers quantities between the lattice and the markers using the delta kernel `K`.
///
/// Interpolation reads the fluid velocity around every marker and derives the force needed to
/// enforce the no-slip condition. Spreading distributes that force back onto the lattice with
/// the same stencil weights, so the total momentum given to the fluid is exactly the opposite
/// of the total momentum given to the markers.
#[derive(Clone, Debug)]
pub struct InterpolationSpread<K: DeltaKernel = PeskinKernel> {
    params: IbmParams,
    phantom: PhantomData<K>,
}

impl<K: DeltaKernel> InterpolationSpread<K> {
    /// Creates the engine after validating its parameters.
    pub fn new(params: IbmParams) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            params,
            phantom: PhantomData,
        })
    }

    /// The parameters of this engine.
    pub fn params(&self) -> &IbmParams {
        &self.params
    }

    /// The number of lattice nodes covered by a stencil along each axis.
    pub fn stencil_width(&self) -> usize {
        K::WIDTH
    }

    /// Recomputes the stencil of every marker from its current position.
    ///
    /// Fails if a marker position is not finite or if its stencil does not fit in `domain`.
    /// Nothing but the cached stencils is modified, even on success.
    pub fn update_stencils(&self, domain: &LatticeDomain, markers: &mut MarkerSet) -> Result<()> {
        let positions = &markers.positions;
        let bodies = &markers.bodies;

        par_iter_mut!(markers.samples)
            .enumerate()
            .try_for_each(|(i, sample)| {
                let position = &positions[i];

                if !position.iter().all(|x| x.is_finite()) {
                    return Err(Error::NonFinitePosition {
                        body: bodies[i],
                        marker: i,
                    });
                }

                sample.stencil =
                    domain
                        .stencil::<K>(position)
                        .ok_or(Error::StencilOutOfBounds {
                            body: bodies[i],
                            marker: i,
                            position: *position,
                        })?;
                Ok(())
            })
    }

    /// Interpolates the fluid at every marker and computes the corrective force of each marker.
    ///
    /// The force given to the fluid is `ρ (U - u) A / (α dt)` where `U` is the marker velocity,
    /// `u` and `ρ` the interpolated fluid velocity and density, `A` the marker area and `α` the
    /// forcing fraction. Its opposite is accumulated into the marker force. The fluid is only read.
    pub fn interpolate(&self, field: &FluidField, markers: &mut MarkerSet, dt: Real) {
        let coeff = 1.0 / (self.params.forcing_fraction * dt);
        let velocities = &markers.velocities;
        let areas = &markers.areas;

        par_iter_mut!(markers.samples)
            .zip(&mut markers.forces)
            .enumerate()
            .for_each(|(i, (sample, force))| {
                let (density, velocity) = field.interpolate(&sample.stencil);
                let spread_force = (velocities[i] - velocity) * (density * coeff * areas[i]);

                sample.density = density;
                sample.velocity = velocity;
                sample.spread_force = spread_force;
                *force -= spread_force;
            });
    }

    /// Adds the force computed by the last interpolation pass of every marker to the spread
    /// buffer of `field`.
    ///
    /// Markers are processed sequentially, in index order, so the result does not depend on the
    /// number of threads. Returns the number of lattice nodes written to.
    pub fn spread(&self, field: &mut FluidField, markers: &MarkerSet) -> usize {
        let domain = *field.domain();
        let mut nnodes = 0;

        for sample in &markers.samples {
            for (node, w) in sample.stencil.nodes() {
                field.spread[domain.index(node)] += sample.spread_force * w;
            }

            nnodes += sample.stencil.len();
        }

        nnodes
    }
}
