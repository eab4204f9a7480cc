use crate::kernel::DeltaKernel;
use crate::math::Real;

/// The three-point kernel.
///
/// Refer to "An Adaptive Version of the Immersed Boundary Method", Roma et al. 1999.
#[derive(Copy, Clone, Debug)]
pub struct RomaKernel;

impl DeltaKernel for RomaKernel {
    const WIDTH: usize = 3;

    fn scalar_apply(r: Real) -> Real {
        let r = r.abs();

        if r <= 0.5 {
            (1.0 + (1.0 - 3.0 * r * r).sqrt()) / 3.0
        } else if r <= 1.5 {
            let one_r = 1.0 - r;
            (5.0 - 3.0 * r - (1.0 - 3.0 * one_r * one_r).sqrt()) / 6.0
        } else {
            0.0
        }
    }
}
