use crate::math::{Real, Vector};

/// The widest stencil, in lattice nodes per axis, of all the kernels of this crate.
pub const MAX_STENCIL_WIDTH: usize = 4;

/// A discretized Dirac delta function on a lattice with unit spacing.
///
/// The 3D kernel is the tensor product of the 1D kernel along each axis. Implementors must be
/// non-zero only for `|r| < WIDTH / 2` and satisfy the discrete partition of unity:
/// for any `x`, the sum of `scalar_apply(x - i)` over all integers `i` equals one.
pub trait DeltaKernel: Send + Sync {
    /// Number of lattice nodes covered by the kernel support along each axis.
    const WIDTH: usize;

    /// Evaluates the 1D kernel at the signed distance `r`, in lattice units.
    fn scalar_apply(r: Real) -> Real;

    /// Half the width of the kernel support, in lattice units.
    fn half_width() -> Real {
        Self::WIDTH as Real / 2.0
    }

    /// Evaluates the 3D kernel for the given vector.
    fn apply(v: &Vector<Real>) -> Real {
        Self::scalar_apply(v.x) * Self::scalar_apply(v.y) * Self::scalar_apply(v.z)
    }
}
