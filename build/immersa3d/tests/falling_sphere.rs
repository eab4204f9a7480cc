use approx::assert_relative_eq;
use immersa3d::lattice::{FluidField, LatticeDomain, Populations};
use immersa3d::math::{Point, Real, Vector};
use immersa3d::sampling::SphereDesc;
use immersa3d::scenario::{Scenario, SphereTemplate};
use immersa3d::{Error, ImmersedWorld, KinematicsParams, WorldParams};

const N: usize = 64;
const DIAMETER: Real = 10.0;
const DENSITY: Real = 2.0;
const GRAVITY: Real = -1.0e-4;

fn falling_sphere_world() -> (ImmersedWorld, FluidField, Populations) {
    let domain = LatticeDomain::new(N, N, N).unwrap();
    let params = WorldParams {
        kinematics: KinematicsParams {
            gravity: Vector::new(0.0, 0.0, GRAVITY),
            ..KinematicsParams::default()
        },
        ..WorldParams::default()
    };

    let mut world = ImmersedWorld::new(domain, params).unwrap();
    let scenario = Scenario::FallingSphere(SphereTemplate {
        diameter: DIAMETER,
        density: DENSITY,
        ..SphereTemplate::default()
    });
    let handles = scenario.populate(&mut world).unwrap();
    assert_eq!(handles.len(), 1);

    // A reservoir at rest: the populations are never streamed, so every step starts from a
    // quiescent fluid.
    let populations = Populations::at_equilibrium(domain, 1.0, &Vector::zeros());
    let field = FluidField::new(domain, 1.0);

    (world, field, populations)
}

#[test]
fn falling_sphere_reaches_terminal_velocity() {
    let (mut world, mut field, mut populations) = falling_sphere_world();
    let start = *world.bodies().as_slice()[0].center();
    assert_eq!(start, Point::new(32.0, 32.0, 53.0));

    for _ in 0..300 {
        world
            .step_with_solver(&mut field, &mut populations)
            .unwrap();

        assert_relative_eq!(
            field.total_force(),
            world.total_spread_force(),
            epsilon = 1.0e-5
        );
        assert_relative_eq!(
            world.total_spread_force(),
            -world.total_marker_force(),
            epsilon = 1.0e-6
        );
    }

    let body = &world.bodies().as_slice()[0];
    assert!(body.is_finite());

    // With a quiescent reservoir, each marker feels a drag of 2 ρ A U / dt, which balances
    // the buoyant weight at terminal velocity.
    let area: Real = world.markers().areas().iter().sum();
    let weight = (body.mass() - body.volume()) * GRAVITY;
    let terminal = weight / (2.0 * area);

    assert!(body.linvel().z < 0.0);
    assert_relative_eq!(body.linvel().z, terminal, max_relative = 1.0e-2);
    assert!(body.linvel().xy().norm() < 1.0e-2 * terminal.abs());
    assert!(body.center().z < start.z);

    // The sphere never touched the domain walls.
    let upper = world.domain().upper_corner();
    for i in 0..3 {
        assert!(body.center()[i] - body.radius() > 0.0);
        assert!(body.center()[i] + body.radius() < upper[i]);
    }

    for p in world.markers().positions() {
        assert!(p.iter().all(|x| x.is_finite()));
    }
}

#[test]
fn bodies_outside_the_lattice_are_rejected_at_setup() {
    let domain = LatticeDomain::new(32, 32, 32).unwrap();
    let mut world = ImmersedWorld::new(domain, WorldParams::default()).unwrap();

    // The falling-sphere placement of a sphere too large for this lattice.
    let scenario = Scenario::FallingSphere(SphereTemplate {
        diameter: 12.0,
        ..SphereTemplate::default()
    });
    assert!(matches!(
        scenario.populate(&mut world),
        Err(Error::StencilOutOfBounds { .. })
    ));

    let desc = SphereDesc::new(6.0, Point::new(16.0, 16.0, 30.5), true);
    assert!(matches!(
        world.add_sphere(&desc),
        Err(Error::StencilOutOfBounds { .. })
    ));
    assert!(world.bodies().is_empty());
}
