/*!
**immersa** couples rigid bodies to a fluid simulated on a fixed 3-dimensional lattice using the
Immersed Boundary Method (IBM). It uses [nalgebra](https://nalgebra.org) for vector/matrix math.

The fluid solver itself (typically a lattice-Boltzmann scheme) is an external collaborator: it
exposes its macroscopic density and velocity through a [`lattice::FluidField`] and consumes the
momentum source written by this crate. Each call to [`ImmersedWorld::step`]:

1. interpolates the fluid velocity at every Lagrangian marker of every body,
2. computes the no-slip corrective force at each marker,
3. spreads that force back onto the lattice and folds it into the macroscopic velocity,
4. resolves soft collisions between bodies and against the domain walls,
5. integrates the rigid-body motion and moves the markers accordingly.

## Features
- **Delta kernels:** linear, Roma 3-point and Peskin 4-point kernels.
- **Multi-direct forcing:** the velocity correction can be iterated several times per step.
- **Soft collisions:** penalty forces between bodies and against the lattice walls.
- **Sphere sampling:** latitude/longitude marker tiling with optional Coulomb relaxation.
- Optional **parallel** execution with rayon.
*/
#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_qualifications)]
#![warn(missing_docs)]
#![deny(unused_results)]
#![allow(type_alias_bounds)]
#![allow(missing_copy_implementations)]

extern crate nalgebra as na;
extern crate num_traits as num;

macro_rules! par_iter_mut {
    ($t: expr) => {{
        #[cfg(not(feature = "parallel"))]
        let it = $t.iter_mut();

        #[cfg(feature = "parallel")]
        let it = $t.par_iter_mut();
        it
    }};
}

pub mod counters;
pub mod coupling;
mod error;
pub mod geometry;
mod immersed_world;
pub mod kernel;
pub mod lattice;
pub mod object;
mod params;
pub mod sampling;
pub mod scenario;
pub mod solver;
mod timestep_manager;
pub(crate) mod z_order;

pub use crate::error::{Error, Result};
pub use crate::immersed_world::ImmersedWorld;
pub use crate::params::{Capacity, CollisionParams, IbmParams, KinematicsParams, WorldParams};
pub use crate::timestep_manager::TimestepManager;

/// Compilation flags dependent aliases for mathematical types.
#[cfg(feature = "dim3")]
pub mod math {
    use na::{Isometry3, Matrix3, Point3, UnitQuaternion, Vector3};

    /// The maximum number of possible translations of a rigid body.
    pub const DIM: usize = 3;

    /// The scalar type.
    pub type Real = f32;

    /// The point type.
    pub type Point<Real> = Point3<Real>;

    /// The angular vector type.
    pub type AngularVector<Real> = Vector3<Real>;

    /// The vector type.
    pub type Vector<Real> = Vector3<Real>;

    /// The transformation matrix type.
    pub type Isometry<Real> = Isometry3<Real>;

    /// The rotation type.
    pub type Rotation<Real> = UnitQuaternion<Real>;

    /// The inertia tensor type.
    pub type AngularInertia<Real> = Matrix3<Real>;
}
