use crate::counters::Counters;
use crate::coupling::{FieldCoupling, InterpolationSpread};
use crate::error::{Error, Result};
use crate::kernel::{DeltaKernel, PeskinKernel};
use crate::lattice::{FluidField, FluidSolver, LatticeDomain};
use crate::math::{Real, Vector};
use crate::object::{Body, BodyDesc, BodyHandle, BodySet, MarkerSet};
use crate::params::{Capacity, WorldParams};
use crate::sampling::SphereDesc;
use crate::solver::{RigidBodyIntegrator, SoftCollisionResolver};
use crate::TimestepManager;

/// The physics world coupling rigid bodies to a fluid simulated on a lattice.
///
/// The fluid itself is owned by the caller and passed to every step. The world owns the bodies,
/// their markers, and everything needed to exchange momentum between them and the fluid.
pub struct ImmersedWorld<K: DeltaKernel = PeskinKernel> {
    /// Performance counters of the whole coupling engine.
    pub counters: Counters,
    domain: LatticeDomain,
    capacity: Capacity,
    bodies: BodySet,
    markers: MarkerSet,
    ibm: InterpolationSpread<K>,
    coupling: FieldCoupling,
    integrator: RigidBodyIntegrator,
    collisions: SoftCollisionResolver,
    timestep_manager: TimestepManager,
    spread_force: Vector<Real>,
}

impl ImmersedWorld {
    /// Initialize a new immersed world using the 4-point Peskin kernel.
    pub fn new(domain: LatticeDomain, params: WorldParams) -> Result<Self> {
        Self::with_kernel(domain, params)
    }
}

impl<K: DeltaKernel> ImmersedWorld<K> {
    /// Initialize a new immersed world using the delta kernel `K`.
    pub fn with_kernel(domain: LatticeDomain, params: WorldParams) -> Result<Self> {
        params.validate()?;

        log::info!(
            "immersed world on a {}x{}x{} lattice, {}-node stencils, {} forcing iteration(s)",
            domain.nx,
            domain.ny,
            domain.nz,
            K::WIDTH,
            params.ibm.iterations
        );

        Ok(Self {
            counters: Counters::new(),
            domain,
            capacity: params.capacity,
            bodies: BodySet::new(),
            markers: MarkerSet::new(),
            ibm: InterpolationSpread::new(params.ibm)?,
            coupling: FieldCoupling::new(&params.ibm),
            integrator: RigidBodyIntegrator::new(params.kinematics)?,
            collisions: SoftCollisionResolver::new(params.collisions)?,
            timestep_manager: TimestepManager::new(
                params.kinematics.dt,
                params.kinematics.max_displacement_per_step,
            ),
            spread_force: Vector::zeros(),
        })
    }

    /// Adds a rigid body to this world.
    ///
    /// Fails without modifying the world if the body is invalid, if the capacity would be
    /// exceeded, or if the stencil of any of its markers does not fit in the lattice.
    pub fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle> {
        desc.validate()?;
        self.capacity.check(
            self.bodies.len() + 1,
            self.markers.len() + desc.markers.len(),
        )?;

        let body = self.bodies.next_handle().index();

        for (k, (offset, _)) in desc.markers.iter().enumerate() {
            let marker = self.markers.len() + k;
            let position = desc.center + desc.orientation * offset;

            if !position.iter().all(|x| x.is_finite()) {
                return Err(Error::NonFinitePosition { body, marker });
            }

            if self.domain.stencil::<K>(&position).is_none() {
                return Err(Error::StencilOutOfBounds {
                    body,
                    marker,
                    position,
                });
            }
        }

        let range = self.markers.push_body(body, &desc.markers);
        let handle = self.bodies.insert(Body::new(desc, range));
        self.integrator
            .update_markers(self.bodies.as_slice(), &mut self.markers);

        log::debug!(
            "added {} body {} at {} with {} markers",
            if desc.movable { "movable" } else { "fixed" },
            body,
            desc.center,
            desc.markers.len()
        );

        Ok(handle)
    }

    /// Samples a sphere and adds it to this world.
    ///
    /// The capacity is checked before any marker is generated.
    pub fn add_sphere(&mut self, desc: &SphereDesc) -> Result<BodyHandle> {
        desc.validate()?;

        let available = self.capacity.max_markers.saturating_sub(self.markers.len());
        let nmarkers = match desc.num_markers(available) {
            Some(n) => self.markers.len() + n,
            None => self.capacity.max_markers.saturating_add(1),
        };
        self.capacity.check(self.bodies.len() + 1, nmarkers)?;

        self.add_body(&desc.body_desc()?)
    }

    /// Advances the simulation by one time step.
    ///
    /// The density and velocity of `field` must already be up to date.
    pub fn step(&mut self, field: &mut FluidField) -> Result<()> {
        self.step_with_solver(field, &mut ())
    }

    /// Advances the simulation by one time step, letting `solver` refresh the macroscopic
    /// fields first and read the spread forces last.
    ///
    /// If this returns an error, neither the bodies nor the markers nor `field` were modified,
    /// except for what `solver` did itself. The error is fatal and the run should be aborted.
    pub fn step_with_solver(
        &mut self,
        field: &mut FluidField,
        solver: &mut impl FluidSolver,
    ) -> Result<()> {
        if *field.domain() != self.domain {
            return Err(Error::LatticeMismatch {
                expected: self.domain.num_nodes(),
                found: field.domain().num_nodes(),
            });
        }

        self.counters.reset();
        self.counters.step_time.start();

        self.ibm.update_stencils(&self.domain, &mut self.markers)?;
        solver.update_macroscopics(field)?;

        let dt = self.timestep_manager.dt();
        self.coupling.reset(field, &mut self.markers);
        self.spread_force = Vector::zeros();

        for _ in 0..self.ibm.params().iterations {
            self.counters.stages.interpolation_time.resume();
            self.ibm.interpolate(field, &mut self.markers, dt);
            self.counters.stages.interpolation_time.pause();

            self.counters.stages.spread_time.resume();
            self.counters.ibm.nstencil_nodes += self.ibm.spread(field, &self.markers);
            self.counters.stages.spread_time.pause();

            self.counters.stages.coupling_time.resume();
            self.coupling.fold(field, dt);
            self.counters.stages.coupling_time.pause();

            self.spread_force += self
                .markers
                .samples()
                .iter()
                .fold(Vector::zeros(), |acc, s| acc + s.spread_force);
            self.counters.ibm.niterations += 1;
            self.counters.ibm.nmarkers += self.markers.len();
        }

        solver.transmit_forces(field);

        self.counters.stages.collision_time.resume();
        let collision_forces = self.collisions.resolve(
            self.bodies.as_slice(),
            &self.domain,
            &mut self.counters.collisions,
        );

        for (body, force) in self
            .bodies
            .as_mut_slice()
            .iter_mut()
            .zip(collision_forces.into_iter())
        {
            body.collision_force = force;
        }
        self.counters.stages.collision_time.pause();

        self.counters.stages.kinematics_time.resume();
        self.integrator
            .accumulate_hydrodynamics(self.bodies.as_mut_slice(), &self.markers);
        self.integrator.integrate(self.bodies.as_mut_slice());
        self.integrator
            .update_markers(self.bodies.as_slice(), &mut self.markers);
        self.counters.stages.kinematics_time.pause();

        self.timestep_manager.advance();
        let _ = self
            .timestep_manager
            .check_stability(self.bodies.as_slice());

        self.counters.nsteps += 1;
        self.counters.step_time.pause();
        log::debug!("{}", self.counters);

        Ok(())
    }

    /// The lattice the fluid lives on.
    pub fn domain(&self) -> &LatticeDomain {
        &self.domain
    }

    /// The set of bodies of this world.
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// The body with the given handle.
    pub fn body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies
            .get(handle)
            .ok_or(Error::UnknownBody(handle.index()))
    }

    /// The body with the given handle.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies
            .get_mut(handle)
            .ok_or(Error::UnknownBody(handle.index()))
    }

    /// The markers of every body.
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// The time step manager of this world.
    pub fn timestep_manager(&self) -> &TimestepManager {
        &self.timestep_manager
    }

    /// The sum of the forces spread onto the fluid during the last step, over all passes.
    pub fn total_spread_force(&self) -> Vector<Real> {
        self.spread_force
    }

    /// The sum of the forces exerted by the fluid on every marker during the last step.
    pub fn total_marker_force(&self) -> Vector<Real> {
        self.markers.total_force()
    }
}

#[cfg(test)]
mod test {
    use super::ImmersedWorld;
    use crate::error::{Error, Result};
    use crate::lattice::{FluidField, FluidSolver, LatticeDomain};
    use crate::math::{Point, Real, Vector};
    use crate::object::BodyHandle;
    use crate::params::{Capacity, WorldParams};
    use crate::sampling::SphereDesc;
    use approx::assert_relative_eq;

    struct UniformFlow(Vector<Real>);

    impl FluidSolver for UniformFlow {
        fn update_macroscopics(&mut self, field: &mut FluidField) -> Result<()> {
            field.fill(1.0, self.0);
            Ok(())
        }
    }

    fn world() -> (ImmersedWorld, FluidField) {
        let domain = LatticeDomain::new(32, 32, 32).unwrap();
        let world = ImmersedWorld::new(domain, WorldParams::default()).unwrap();
        (world, FluidField::new(domain, 1.0))
    }

    #[test]
    fn bodies_leaving_the_lattice_are_rejected_at_setup() {
        let (mut world, _) = world();
        let desc = SphereDesc::new(10.0, Point::new(5.0, 16.0, 16.0), true);

        assert!(matches!(
            world.add_sphere(&desc),
            Err(Error::StencilOutOfBounds { body: 0, .. })
        ));
        assert!(world.bodies().is_empty());
        assert!(world.markers().is_empty());
    }

    #[test]
    fn capacity_is_enforced_at_setup() {
        let domain = LatticeDomain::new(32, 32, 32).unwrap();
        let params = WorldParams {
            capacity: Capacity {
                max_bodies: 1,
                max_markers: 10_000,
            },
            ..WorldParams::default()
        };
        let mut world = ImmersedWorld::new(domain, params).unwrap();
        let desc = SphereDesc::new(6.0, Point::new(16.0, 16.0, 16.0), false);

        assert!(world.add_sphere(&desc).is_ok());
        assert!(matches!(
            world.add_sphere(&desc),
            Err(Error::CapacityExceeded { what: "bodies", .. })
        ));
        assert_eq!(world.body(BodyHandle(1)).err(), Some(Error::UnknownBody(1)));
    }

    #[test]
    fn oversized_spheres_are_rejected_before_sampling() {
        let domain = LatticeDomain::new(64, 64, 64).unwrap();
        let params = WorldParams {
            capacity: Capacity {
                max_bodies: 4,
                max_markers: 10,
            },
            ..WorldParams::default()
        };
        let mut world = ImmersedWorld::new(domain, params).unwrap();
        let desc = SphereDesc::new(40.0, Point::new(32.0, 32.0, 32.0), true)
            .spacing(1.0e-4)
            .coulomb_iterations(1);

        let start = std::time::Instant::now();
        assert!(matches!(
            world.add_sphere(&desc),
            Err(Error::CapacityExceeded {
                what: "markers",
                capacity: 10,
                requested,
            }) if requested > 10
        ));
        assert!(start.elapsed().as_secs() < 1);
        assert!(world.markers().is_empty());
        assert!(world.bodies().is_empty());
    }

    #[test]
    fn fixed_body_in_a_fluid_at_rest_feels_no_force() {
        let (mut world, mut field) = world();
        let handle = world
            .add_sphere(&SphereDesc::new(8.0, Point::new(16.0, 16.0, 16.0), false))
            .unwrap();

        world.step(&mut field).unwrap();

        assert!(world.markers().forces().iter().all(|f| *f == Vector::zeros()));
        assert_eq!(field.total_force(), Vector::zeros());
        assert_eq!(*world.body(handle).unwrap().center(), Point::new(16.0, 16.0, 16.0));
    }

    #[test]
    fn momentum_given_to_the_fluid_is_taken_from_the_bodies() {
        let (mut world, mut field) = world();
        let desc = SphereDesc::new(8.0, Point::new(16.0, 16.0, 16.0), true)
            .density(2.0)
            .linvel(Vector::new(0.01, 0.0, -0.005));
        let handle = world.add_sphere(&desc).unwrap();

        world.step(&mut field).unwrap();

        let spread = world.total_spread_force();
        assert!(spread.norm() > 1.0e-3);
        assert_relative_eq!(spread, -world.total_marker_force(), epsilon = 1.0e-5);
        assert_relative_eq!(field.total_force(), spread, epsilon = 1.0e-4);
        assert_relative_eq!(
            *world.body(handle).unwrap().hydro_force(),
            world.total_marker_force(),
            epsilon = 1.0e-5
        );
        // The drag opposes the motion.
        assert!(world.body(handle).unwrap().hydro_force().x < 0.0);
    }

    #[test]
    fn consecutive_steps_do_not_accumulate_forces() {
        let (mut world, mut field) = world();
        let _ = world
            .add_sphere(&SphereDesc::new(8.0, Point::new(16.0, 16.0, 16.0), false))
            .unwrap();
        let mut solver = UniformFlow(Vector::new(0.01, 0.0, 0.0));

        world.step_with_solver(&mut field, &mut solver).unwrap();
        let first = field.forces().to_vec();
        let first_markers = world.markers().forces().to_vec();

        world.step_with_solver(&mut field, &mut solver).unwrap();
        assert_eq!(field.forces(), &first[..]);
        assert_eq!(world.markers().forces(), &first_markers[..]);
        assert_eq!(world.counters.nsteps, 2);
    }

    #[test]
    fn failing_step_leaves_the_world_untouched() {
        let (mut world, mut field) = world();
        let handle = world
            .add_sphere(&SphereDesc::new(8.0, Point::new(16.0, 16.0, 16.0), true).density(3.0))
            .unwrap();
        world.markers.positions[3] = Point::new(Real::NAN, 1.0, 1.0);
        let positions = world.markers().positions()[4..].to_vec();

        assert_eq!(
            world.step(&mut field),
            Err(Error::NonFinitePosition { body: 0, marker: 3 })
        );
        assert_eq!(&world.markers().positions()[4..], &positions[..]);
        assert_eq!(*world.body(handle).unwrap().linvel(), Vector::zeros());
        assert_eq!(field.total_force(), Vector::zeros());

        let mut other = FluidField::new(LatticeDomain::new(8, 8, 8).unwrap(), 1.0);
        assert!(matches!(
            world.step(&mut other),
            Err(Error::LatticeMismatch { .. })
        ));
    }
}
