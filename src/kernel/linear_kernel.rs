use crate::kernel::DeltaKernel;
use crate::math::Real;

/// The two-point hat kernel, equivalent to trilinear interpolation.
#[derive(Copy, Clone, Debug)]
pub struct LinearKernel;

impl DeltaKernel for LinearKernel {
    const WIDTH: usize = 2;

    fn scalar_apply(r: Real) -> Real {
        let r = r.abs();

        if r < 1.0 {
            1.0 - r
        } else {
            0.0
        }
    }
}
