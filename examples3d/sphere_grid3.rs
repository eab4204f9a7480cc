use na::Vector3;

use immersa3d::scenario::{Scenario, SphereTemplate};
use immersa3d::{ImmersedWorld, Result, WorldParams};

use crate::helper::{self, Harness};

pub fn init_world(mut params: WorldParams) -> Result<Harness> {
    params.kinematics.gravity = Vector3::new(0.0, 0.0, -5.0e-5);

    let mut world = ImmersedWorld::new(helper::domain(96, 96, 160)?, params)?;
    let _ = Scenario::SphereGrid {
        template: SphereTemplate {
            diameter: 10.0,
            density: 1.5,
            ..SphereTemplate::default()
        },
        count: 27,
        gap: 3.0,
    }
    .populate(&mut world)?;

    Ok(Harness::at_rest(world, 2000))
}
