use crate::kernel::DeltaKernel;
use crate::math::Real;

/// The four-point kernel.
///
/// Refer to "The immersed boundary method", Peskin 2002. Unlike its cosine approximation, this
/// form satisfies the discrete partition of unity exactly.
#[derive(Copy, Clone, Debug)]
pub struct PeskinKernel;

impl DeltaKernel for PeskinKernel {
    const WIDTH: usize = 4;

    fn scalar_apply(r: Real) -> Real {
        let r = r.abs();

        if r <= 1.0 {
            (3.0 - 2.0 * r + (1.0 + 4.0 * r - 4.0 * r * r).sqrt()) / 8.0
        } else if r <= 2.0 {
            // The radicand is >= 1 on [1, 2], up to rounding at the bounds.
            (5.0 - 2.0 * r - (-7.0 + 12.0 * r - 4.0 * r * r).max(0.0).sqrt()) / 8.0
        } else {
            0.0
        }
    }
}
