use na::Vector3;

use immersa3d::scenario::{Scenario, SphereTemplate};
use immersa3d::{ImmersedWorld, Result, WorldParams};

use crate::helper::{self, Harness};

pub fn init_world(mut params: WorldParams) -> Result<Harness> {
    params.kinematics.gravity = Vector3::new(0.0, 0.0, -1.0e-4);

    let mut world = ImmersedWorld::new(helper::domain(64, 64, 128)?, params)?;
    let _ = Scenario::FallingSphere(SphereTemplate {
        diameter: 12.0,
        density: 2.5,
        coulomb_iterations: 30,
        ..SphereTemplate::default()
    })
    .populate(&mut world)?;

    Ok(Harness::at_rest(world, 1000))
}
