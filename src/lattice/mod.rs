//! The fixed Eulerian lattice and the macroscopic fluid fields living on it.

pub use self::domain::LatticeDomain;
pub use self::fluid_field::FluidField;
pub use self::fluid_solver::FluidSolver;
pub use self::populations::{Populations, Q};

mod domain;
mod fluid_field;
mod fluid_solver;
mod populations;
