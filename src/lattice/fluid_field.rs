use crate::error::{Error, Result};
use crate::kernel::Stencil;
use crate::lattice::LatticeDomain;
use crate::math::{Real, Vector};

/// The macroscopic fields of the fluid on every lattice node.
///
/// The density and velocity are owned by the fluid solver: the coupling reads the velocity for
/// interpolation and adds the force-induced velocity changes to it. The force buffer holds the
/// momentum source accumulated during the current step. It is cleared at the beginning of each
/// step and can only be read from outside this crate.
#[derive(Clone, Debug)]
pub struct FluidField {
    domain: LatticeDomain,
    densities: Vec<Real>,
    velocities: Vec<Vector<Real>>,
    forces: Vec<Vector<Real>>,
    pub(crate) spread: Vec<Vector<Real>>,
}

impl FluidField {
    /// A fluid at rest with the uniform density `density`.
    pub fn new(domain: LatticeDomain, density: Real) -> Self {
        let num_nodes = domain.num_nodes();

        Self {
            domain,
            densities: vec![density; num_nodes],
            velocities: vec![Vector::zeros(); num_nodes],
            forces: vec![Vector::zeros(); num_nodes],
            spread: vec![Vector::zeros(); num_nodes],
        }
    }

    /// Builds a fluid field from existing density and velocity buffers.
    pub fn from_parts(
        domain: LatticeDomain,
        densities: Vec<Real>,
        velocities: Vec<Vector<Real>>,
    ) -> Result<Self> {
        let num_nodes = domain.num_nodes();

        for found in [densities.len(), velocities.len()] {
            if found != num_nodes {
                return Err(Error::LatticeMismatch {
                    expected: num_nodes,
                    found,
                });
            }
        }

        Ok(Self {
            domain,
            densities,
            velocities,
            forces: vec![Vector::zeros(); num_nodes],
            spread: vec![Vector::zeros(); num_nodes],
        })
    }

    /// The lattice this field is defined on.
    pub fn domain(&self) -> &LatticeDomain {
        &self.domain
    }

    /// The macroscopic density of each node.
    pub fn densities(&self) -> &[Real] {
        &self.densities
    }

    /// Mutable access to the macroscopic density of each node.
    pub fn densities_mut(&mut self) -> &mut [Real] {
        &mut self.densities
    }

    /// The macroscopic velocity of each node.
    pub fn velocities(&self) -> &[Vector<Real>] {
        &self.velocities
    }

    /// Mutable access to the macroscopic velocity of each node.
    pub fn velocities_mut(&mut self) -> &mut [Vector<Real>] {
        &mut self.velocities
    }

    /// Mutable access to the density and the velocity of each node at the same time.
    pub fn macroscopics_mut(&mut self) -> (&mut [Real], &mut [Vector<Real>]) {
        (&mut self.densities, &mut self.velocities)
    }

    /// The momentum source accumulated on each node during the last step.
    pub fn forces(&self) -> &[Vector<Real>] {
        &self.forces
    }

    /// The momentum source accumulated on the given node during the last step.
    pub fn force_at(&self, node: [usize; 3]) -> Vector<Real> {
        self.forces[self.domain.index(node)]
    }

    /// The velocity of the given node.
    pub fn velocity_at(&self, node: [usize; 3]) -> Vector<Real> {
        self.velocities[self.domain.index(node)]
    }

    /// The sum of the momentum source over the whole lattice.
    pub fn total_force(&self) -> Vector<Real> {
        self.forces.iter().fold(Vector::zeros(), |acc, f| acc + f)
    }

    /// Sets every velocity to `velocity` and every density to `density`.
    pub fn fill(&mut self, density: Real, velocity: Vector<Real>) {
        self.densities.iter_mut().for_each(|rho| *rho = density);
        self.velocities.iter_mut().for_each(|v| *v = velocity);
    }

    /// Interpolates the density and velocity at the center of `stencil`.
    pub fn interpolate(&self, stencil: &Stencil) -> (Real, Vector<Real>) {
        let mut density = 0.0;
        let mut velocity = Vector::zeros();

        for (node, w) in stencil.nodes() {
            let i = self.domain.index(node);
            density += self.densities[i] * w;
            velocity += self.velocities[i] * w;
        }

        (density, velocity)
    }

    /// Clears the force buffer and the spread scratch buffer.
    pub(crate) fn reset_forces(&mut self) {
        self.forces.iter_mut().for_each(|f| f.fill(0.0));
        self.spread.iter_mut().for_each(|f| f.fill(0.0));
    }

    /// Splits this field into the parts mutated when folding the spread forces.
    pub(crate) fn fold_parts_mut(
        &mut self,
    ) -> (
        &[Real],
        &mut [Vector<Real>],
        &mut [Vector<Real>],
        &mut [Vector<Real>],
    ) {
        (
            &self.densities,
            &mut self.velocities,
            &mut self.forces,
            &mut self.spread,
        )
    }
}

#[cfg(test)]
mod test {
    use super::FluidField;
    use crate::kernel::PeskinKernel;
    use crate::lattice::LatticeDomain;
    use crate::math::{Point, Vector};
    use approx::assert_relative_eq;

    #[test]
    fn mismatched_buffers_are_rejected() {
        let domain = LatticeDomain::new(4, 4, 4).unwrap();
        let res = FluidField::from_parts(domain, vec![1.0; 64], vec![Vector::zeros(); 63]);
        assert!(res.is_err());
    }

    #[test]
    fn macroscopic_buffers_keep_the_lattice_size() {
        let domain = LatticeDomain::new(4, 4, 4).unwrap();
        let mut field =
            FluidField::from_parts(domain, vec![1.0; 64], vec![Vector::zeros(); 64]).unwrap();

        let (densities, velocities) = field.macroscopics_mut();
        densities[63] = 2.0;
        velocities[63] = Vector::x();
        field.densities_mut()[0] = 0.5;

        assert_eq!(field.densities().len(), domain.num_nodes());
        assert_eq!(field.velocities().len(), domain.num_nodes());
        assert_eq!(field.densities()[0], 0.5);
        assert_eq!(field.densities()[63], 2.0);
        assert_eq!(field.velocity_at([3, 3, 3]), Vector::x());
    }

    #[test]
    fn interpolating_a_uniform_field_is_exact() {
        let domain = LatticeDomain::new(12, 12, 12).unwrap();
        let mut field = FluidField::new(domain, 1.5);
        field.fill(1.5, Vector::new(0.01, -0.02, 0.03));

        let stencil = domain
            .stencil::<PeskinKernel>(&Point::new(5.3, 6.7, 4.1))
            .unwrap();
        let (rho, vel) = field.interpolate(&stencil);

        assert_relative_eq!(rho, 1.5, epsilon = 1.0e-5);
        assert_relative_eq!(vel, Vector::new(0.01, -0.02, 0.03), epsilon = 1.0e-6);
    }

    #[test]
    fn interpolating_a_linear_field_is_exact() {
        let domain = LatticeDomain::new(12, 12, 12).unwrap();
        let mut field = FluidField::new(domain, 1.0);

        for i in 0..domain.num_nodes() {
            let [x, _, _] = domain.node(i);
            field.velocities_mut()[i] = Vector::new(0.001 * x as f32, 0.0, 0.0);
        }

        let stencil = domain
            .stencil::<PeskinKernel>(&Point::new(5.3, 6.7, 4.1))
            .unwrap();
        let (_, vel) = field.interpolate(&stencil);
        assert_relative_eq!(vel.x, 0.0053, epsilon = 1.0e-6);
    }
}
