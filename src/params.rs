use crate::error::{Error, Result};
use crate::math::{Real, Vector};

/// Parameters of the interpolation/spread passes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct IbmParams {
    /// Number of velocity-correction iterations (multi-direct forcing) per step.
    pub iterations: usize,
    /// Fraction of the force-induced velocity change folded into the macroscopic velocity.
    ///
    /// Schemes with a Guo-style forcing term, where the macroscopic velocity already contains half
    /// of the force contribution, use `0.5`.
    pub forcing_fraction: Real,
}

impl Default for IbmParams {
    fn default() -> Self {
        Self {
            iterations: 1,
            forcing_fraction: 0.5,
        }
    }
}

impl IbmParams {
    /// Checks that these parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::invalid("iterations", "at least one iteration is required"));
        }

        if !(self.forcing_fraction > 0.0 && self.forcing_fraction <= 1.0) {
            return Err(Error::invalid(
                "forcing_fraction",
                format!("must be in ]0, 1], got {}", self.forcing_fraction),
            ));
        }

        Ok(())
    }
}

/// Parameters of the rigid-body time integration.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicsParams {
    /// The time step length, in lattice units.
    pub dt: Real,
    /// The gravity acceleration applied to every movable body.
    pub gravity: Vector<Real>,
    /// The density of the surrounding fluid, used for buoyancy.
    pub fluid_density: Real,
    /// Maximum displacement of a body per step, in lattice cells, before a stability warning is logged.
    pub max_displacement_per_step: Real,
}

impl Default for KinematicsParams {
    fn default() -> Self {
        Self {
            dt: 1.0,
            gravity: Vector::zeros(),
            fluid_density: 1.0,
            max_displacement_per_step: 0.1,
        }
    }
}

impl KinematicsParams {
    /// Checks that these parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(Error::invalid("dt", format!("must be > 0, got {}", self.dt)));
        }

        if !(self.fluid_density > 0.0 && self.fluid_density.is_finite()) {
            return Err(Error::invalid(
                "fluid_density",
                format!("must be > 0, got {}", self.fluid_density),
            ));
        }

        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(Error::invalid("gravity", "must be finite"));
        }

        if !(self.max_displacement_per_step > 0.0) {
            return Err(Error::invalid(
                "max_displacement_per_step",
                "must be > 0",
            ));
        }

        Ok(())
    }
}

/// Parameters of the soft-collision model.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionParams {
    /// Surface separation below which a repulsive force is applied.
    pub threshold: Real,
    /// Force magnitude between two bodies when their surfaces touch.
    pub pair_stiffness: Real,
    /// Force magnitude between a body and a wall when they touch.
    pub wall_stiffness: Real,
    /// For each axis, whether the two lattice faces orthogonal to it are solid walls.
    pub walls: [bool; 3],
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            threshold: 2.0,
            pair_stiffness: 1.0e-3,
            wall_stiffness: 1.0e-3,
            walls: [true; 3],
        }
    }
}

impl CollisionParams {
    /// Checks that these parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0) {
            return Err(Error::invalid("threshold", "must be > 0"));
        }

        if !(self.pair_stiffness >= 0.0 && self.wall_stiffness >= 0.0) {
            return Err(Error::invalid("stiffness", "must be >= 0"));
        }

        Ok(())
    }
}

/// Maximum number of bodies and markers a world accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Capacity {
    /// Maximum number of bodies.
    pub max_bodies: usize,
    /// Maximum number of markers, summed over all bodies.
    pub max_markers: usize,
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            max_bodies: 1024,
            max_markers: 1 << 22,
        }
    }
}

impl Capacity {
    pub(crate) fn check(&self, nbodies: usize, nmarkers: usize) -> Result<()> {
        if nbodies > self.max_bodies {
            return Err(Error::CapacityExceeded {
                what: "bodies",
                requested: nbodies,
                capacity: self.max_bodies,
            });
        }

        if nmarkers > self.max_markers {
            return Err(Error::CapacityExceeded {
                what: "markers",
                requested: nmarkers,
                capacity: self.max_markers,
            });
        }

        Ok(())
    }
}

/// All the parameters of an immersed world.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldParams {
    /// Parameters of the interpolation/spread passes.
    pub ibm: IbmParams,
    /// Parameters of the rigid-body time integration.
    pub kinematics: KinematicsParams,
    /// Parameters of the soft-collision model.
    pub collisions: CollisionParams,
    /// Maximum number of bodies and markers.
    pub capacity: Capacity,
}

impl WorldParams {
    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        self.ibm.validate()?;
        self.kinematics.validate()?;
        self.collisions.validate()
    }
}
