use crate::error::Result;
use crate::lattice::FluidField;

/// Trait implemented by the fluid solver driving the lattice.
///
/// The immersed world calls `update_macroscopics` at the beginning of each step, once the force
/// buffer has been cleared, and `transmit_forces` once the step's momentum source is final.
pub trait FluidSolver {
    /// Updates the macroscopic density and velocity of `field` from the solver's own state.
    fn update_macroscopics(&mut self, field: &mut FluidField) -> Result<()>;

    /// Hands the step's momentum source over to the solver, e.g., for its next collision step.
    fn transmit_forces(&mut self, _field: &FluidField) {}
}

/// A solver that keeps the macroscopic fields as they are.
///
/// Use this when the caller writes the density and velocity of the field directly.
impl FluidSolver for () {
    fn update_macroscopics(&mut self, _: &mut FluidField) -> Result<()> {
        Ok(())
    }
}
