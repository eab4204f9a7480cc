use crate::kernel::{DeltaKernel, MAX_STENCIL_WIDTH};
use crate::math::{Point, Real, DIM};

/// The lattice nodes covered by a kernel centered at a point, together with their weights.
///
/// The same stencil is used to interpolate a field at the point and to spread a quantity from
/// the point, which makes both operations adjoint of each other.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stencil {
    /// Lattice coordinates of the first covered node along each axis.
    pub origin: [usize; DIM],
    /// Number of covered nodes along each axis.
    pub width: usize,
    /// Kernel weights along each axis. Only the first `width` entries are meaningful.
    pub weights: [[Real; MAX_STENCIL_WIDTH]; DIM],
}

impl Default for Stencil {
    fn default() -> Self {
        Self {
            origin: [0; DIM],
            width: 0,
            weights: [[0.0; MAX_STENCIL_WIDTH]; DIM],
        }
    }
}

impl Stencil {
    /// Computes the stencil of the kernel `K` centered at `point`.
    ///
    /// Returns `None` if `point` is not finite, or if any covered node lies outside of a lattice
    /// with the given `extents`. Stencils are never clamped to the lattice.
    pub fn new<K: DeltaKernel>(point: &Point<Real>, extents: [usize; DIM]) -> Option<Self> {
        debug_assert!(K::WIDTH <= MAX_STENCIL_WIDTH);

        let half_width = K::half_width();
        let mut origin = [0; DIM];
        let mut weights = [[0.0; MAX_STENCIL_WIDTH]; DIM];

        for i in 0..DIM {
            let x = point[i];

            if !x.is_finite() {
                return None;
            }

            // Bounds are tested before any integer conversion.
            let first = (x - half_width).floor() + 1.0;
            let last = first + (K::WIDTH - 1) as Real;

            if first < 0.0 || last >= extents[i] as Real {
                return None;
            }

            origin[i] = first as usize;

            for (k, w) in weights[i].iter_mut().take(K::WIDTH).enumerate() {
                *w = K::scalar_apply(x - (origin[i] + k) as Real);
            }
        }

        Some(Self {
            origin,
            width: K::WIDTH,
            weights,
        })
    }

    /// The number of lattice nodes covered by this stencil.
    pub fn len(&self) -> usize {
        self.width * self.width * self.width
    }

    /// Is this stencil empty?
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Iterates through the lattice coordinates of the covered nodes and their 3D weights.
    ///
    /// Nodes are yielded with the `x` coordinate varying fastest, matching the lattice memory layout.
    pub fn nodes(&self) -> impl Iterator<Item = ([usize; DIM], Real)> + '_ {
        let w = self.width;

        (0..w).flat_map(move |k| {
            (0..w).flat_map(move |j| {
                (0..w).map(move |i| {
                    (
                        [self.origin[0] + i, self.origin[1] + j, self.origin[2] + k],
                        self.weights[0][i] * self.weights[1][j] * self.weights[2][k],
                    )
                })
            })
        })
    }
}

#[cfg(test)]
mod test {
    use super::Stencil;
    use crate::kernel::{DeltaKernel, LinearKernel, PeskinKernel, RomaKernel};
    use crate::math::{Point, Real};
    use approx::assert_relative_eq;

    const EXTENTS: [usize; 3] = [16, 16, 16];

    fn check_partition_of_unity<K: DeltaKernel>() {
        for i in 0..=20 {
            let frac = i as Real / 20.0;
            let x = 7.0 + frac;

            let axis_sum: Real = (-4..=4)
                .map(|node| K::scalar_apply(x - (7 + node) as Real))
                .sum();
            assert_relative_eq!(axis_sum, 1.0, epsilon = 1.0e-5);

            let pt = Point::new(x, 8.0 - frac * 0.5, 6.5 + frac * 0.3);
            let stencil = Stencil::new::<K>(&pt, EXTENTS).unwrap();
            let sum: Real = stencil.nodes().map(|(_, w)| w).sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1.0e-5);
        }
    }

    #[test]
    fn linear_kernel_partition_of_unity() {
        check_partition_of_unity::<LinearKernel>();
    }

    #[test]
    fn roma_kernel_partition_of_unity() {
        check_partition_of_unity::<RomaKernel>();
    }

    #[test]
    fn peskin_kernel_partition_of_unity() {
        check_partition_of_unity::<PeskinKernel>();
    }

    #[test]
    fn kernels_vanish_outside_their_support() {
        assert_eq!(LinearKernel::scalar_apply(1.0), 0.0);
        assert_eq!(RomaKernel::scalar_apply(1.6), 0.0);
        assert_eq!(PeskinKernel::scalar_apply(2.0), 0.0);
        assert_eq!(PeskinKernel::scalar_apply(-2.5), 0.0);
    }

    #[test]
    fn kernels_are_symmetric() {
        for r in [0.1, 0.4, 0.9, 1.3, 1.8] {
            assert_eq!(PeskinKernel::scalar_apply(r), PeskinKernel::scalar_apply(-r));
            assert_eq!(RomaKernel::scalar_apply(r), RomaKernel::scalar_apply(-r));
        }
    }

    #[test]
    fn stencil_covers_expected_nodes() {
        let stencil = Stencil::new::<PeskinKernel>(&Point::new(5.2, 5.2, 5.2), EXTENTS).unwrap();
        assert_eq!(stencil.origin, [4, 4, 4]);
        assert_eq!(stencil.len(), 64);
        assert_eq!(stencil.nodes().count(), 64);

        let stencil = Stencil::new::<RomaKernel>(&Point::new(5.2, 5.5, 5.0), EXTENTS).unwrap();
        assert_eq!(stencil.origin, [4, 5, 4]);
        assert_eq!(stencil.len(), 27);
    }

    #[test]
    fn stencil_outside_the_lattice_is_rejected() {
        assert!(Stencil::new::<PeskinKernel>(&Point::new(0.5, 8.0, 8.0), EXTENTS).is_none());
        assert!(Stencil::new::<PeskinKernel>(&Point::new(8.0, 14.0, 8.0), EXTENTS).is_none());
        assert!(Stencil::new::<PeskinKernel>(&Point::new(1.0, 8.0, 8.0), EXTENTS).is_some());
        assert!(Stencil::new::<PeskinKernel>(&Point::new(8.0, Real::NAN, 8.0), EXTENTS).is_none());
    }

    #[test]
    fn far_away_points_are_rejected_without_overflow() {
        assert!(Stencil::new::<PeskinKernel>(&Point::new(1.0e19, 8.0, 8.0), EXTENTS).is_none());
        assert!(Stencil::new::<LinearKernel>(&Point::new(8.0, -1.0e19, 8.0), EXTENTS).is_none());
        assert!(Stencil::new::<RomaKernel>(&Point::new(8.0, 8.0, Real::MAX), EXTENTS).is_none());
    }
}
