use crate::error::{Error, Result};
use crate::kernel::{DeltaKernel, Stencil};
use crate::math::{Point, Real, DIM};

/// The extents of a lattice with unit spacing.
///
/// Node `(x, y, z)` sits at the point `(x, y, z)` and is stored at index `x + nx * (y + ny * z)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeDomain {
    /// Number of nodes along `x`.
    pub nx: usize,
    /// Number of nodes along `y`.
    pub ny: usize,
    /// Number of nodes along `z`.
    pub nz: usize,
}

impl LatticeDomain {
    /// Creates a new lattice domain with the given number of nodes along each axis.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(Error::invalid(
                "lattice extents",
                format!("every extent must be > 0, got {}x{}x{}", nx, ny, nz),
            ));
        }

        Ok(Self { nx, ny, nz })
    }

    /// The number of nodes along each axis.
    pub fn extents(&self) -> [usize; DIM] {
        [self.nx, self.ny, self.nz]
    }

    /// The total number of lattice nodes.
    pub fn num_nodes(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// The linear index of the given node.
    #[inline]
    pub fn index(&self, node: [usize; DIM]) -> usize {
        node[0] + self.nx * (node[1] + self.ny * node[2])
    }

    /// The coordinates of the node with the given linear index.
    #[inline]
    pub fn node(&self, index: usize) -> [usize; DIM] {
        let x = index % self.nx;
        let y = (index / self.nx) % self.ny;
        let z = index / (self.nx * self.ny);
        [x, y, z]
    }

    /// The position of the last node, i.e., the upper corner of the domain.
    pub fn upper_corner(&self) -> Point<Real> {
        Point::new(
            (self.nx - 1) as Real,
            (self.ny - 1) as Real,
            (self.nz - 1) as Real,
        )
    }

    /// Computes the stencil of the kernel `K` at `point`, or `None` if it leaves this lattice.
    pub fn stencil<K: DeltaKernel>(&self, point: &Point<Real>) -> Option<Stencil> {
        Stencil::new::<K>(point, self.extents())
    }
}

#[cfg(test)]
mod test {
    use super::LatticeDomain;

    #[test]
    fn index_round_trip_on_corners() {
        let domain = LatticeDomain::new(4, 5, 6).unwrap();
        assert_eq!(domain.num_nodes(), 120);
        assert_eq!(domain.index([0, 0, 0]), 0);
        assert_eq!(domain.index([1, 0, 0]), 1);
        assert_eq!(domain.index([0, 1, 0]), 4);
        assert_eq!(domain.index([0, 0, 1]), 20);
        assert_eq!(domain.node(domain.index([3, 4, 5])), [3, 4, 5]);
    }

    #[test]
    fn empty_domain_is_rejected() {
        assert!(LatticeDomain::new(4, 0, 6).is_err());
    }
}
