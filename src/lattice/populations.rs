#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::lattice::{FluidField, FluidSolver, LatticeDomain};
use crate::math::{Real, Vector};

/// Number of discrete velocities of the D3Q19 lattice.
pub const Q: usize = 19;

/// D3Q19 discrete velocities: 1 rest, 6 face-centered, 12 edge-centered.
const E: [[i32; 3]; Q] = [
    [0, 0, 0],
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
    [1, 1, 0],
    [-1, -1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [1, 0, 1],
    [-1, 0, -1],
    [1, 0, -1],
    [-1, 0, 1],
    [0, 1, 1],
    [0, -1, -1],
    [0, 1, -1],
    [0, -1, 1],
];

const W0: Real = 1.0 / 3.0;
const W1: Real = 1.0 / 18.0;
const W2: Real = 1.0 / 36.0;

/// D3Q19 weights.
const W: [Real; Q] = [
    W0, W1, W1, W1, W1, W1, W1, W2, W2, W2, W2, W2, W2, W2, W2, W2, W2, W2, W2,
];

/// The post-collision particle distributions of a D3Q19 lattice-Boltzmann solver.
///
/// Only the macroscopic reconstruction lives here: streaming and collision belong to the fluid
/// solver. Distributions are stored node by node, `Q` consecutive values per node.
#[derive(Clone, Debug)]
pub struct Populations {
    domain: LatticeDomain,
    f: Vec<Real>,
}

impl Populations {
    /// Populations with every distribution set to zero.
    pub fn new(domain: LatticeDomain) -> Self {
        Self {
            domain,
            f: vec![0.0; domain.num_nodes() * Q],
        }
    }

    /// Populations at equilibrium with a uniform density and velocity.
    pub fn at_equilibrium(domain: LatticeDomain, density: Real, velocity: &Vector<Real>) -> Self {
        let mut result = Self::new(domain);

        for node in result.f.chunks_exact_mut(Q) {
            for (q, f) in node.iter_mut().enumerate() {
                *f = Self::equilibrium(q, density, velocity);
            }
        }

        result
    }

    /// The second-order equilibrium distribution along the direction `q`.
    pub fn equilibrium(q: usize, density: Real, velocity: &Vector<Real>) -> Real {
        let e = Vector::new(E[q][0] as Real, E[q][1] as Real, E[q][2] as Real);
        let eu = e.dot(velocity);
        let uu = velocity.norm_squared();
        W[q] * density * (1.0 + 3.0 * eu + 4.5 * eu * eu - 1.5 * uu)
    }

    /// The lattice these populations are defined on.
    pub fn domain(&self) -> &LatticeDomain {
        &self.domain
    }

    /// The `Q` distributions of the node with the given linear index.
    pub fn node(&self, index: usize) -> &[Real] {
        &self.f[index * Q..(index + 1) * Q]
    }

    /// The `Q` distributions of the node with the given linear index.
    pub fn node_mut(&mut self, index: usize) -> &mut [Real] {
        &mut self.f[index * Q..(index + 1) * Q]
    }

    /// Sets the distributions of the given node to the equilibrium of `density` and `velocity`.
    pub fn set_equilibrium(&mut self, index: usize, density: Real, velocity: &Vector<Real>) {
        for (q, f) in self.node_mut(index).iter_mut().enumerate() {
            *f = Self::equilibrium(q, density, velocity);
        }
    }

    fn moments(node: &[Real]) -> (Real, Vector<Real>) {
        let mut density = 0.0;
        let mut momentum = Vector::zeros();

        for (f, e) in node.iter().zip(E.iter()) {
            density += *f;
            momentum += Vector::new(e[0] as Real, e[1] as Real, e[2] as Real) * *f;
        }

        (density, momentum)
    }

    /// Computes the macroscopic density and velocity of every node of `field`.
    ///
    /// The force buffer is not taken into account: it is empty when this is called at the
    /// beginning of a step, and the coupling folds the force contribution into the velocity itself.
    pub fn reconstruct(&self, field: &mut FluidField) -> Result<()> {
        if *field.domain() != self.domain {
            return Err(Error::LatticeMismatch {
                expected: self.domain.num_nodes(),
                found: field.domain().num_nodes(),
            });
        }

        let f = &self.f;
        let (densities, velocities) = field.macroscopics_mut();

        par_iter_mut!(densities)
            .zip(velocities)
            .enumerate()
            .for_each(|(i, (density, velocity))| {
                let (rho, momentum) = Self::moments(&f[i * Q..(i + 1) * Q]);
                *density = rho;
                *velocity = if rho > 0.0 {
                    momentum / rho
                } else {
                    Vector::zeros()
                };
            });

        Ok(())
    }
}

impl FluidSolver for Populations {
    fn update_macroscopics(&mut self, field: &mut FluidField) -> Result<()> {
        self.reconstruct(field)
    }
}
