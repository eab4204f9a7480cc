use na::Vector3;

use immersa3d::lattice::{FluidField, Populations};
use immersa3d::scenario::{Scenario, SphereTemplate};
use immersa3d::{ImmersedWorld, Result, WorldParams};

use crate::helper::{self, Harness};

/// A fixed sphere held in a uniform stream. The drag is logged at every report.
pub fn init_world(params: WorldParams) -> Result<Harness> {
    let domain = helper::domain(64, 64, 64)?;
    let inflow = Vector3::new(0.0, 0.0, 0.02);

    let mut world = ImmersedWorld::new(domain, params)?;
    let _ = Scenario::FixedSphere(SphereTemplate::default()).populate(&mut world)?;

    let mut field = FluidField::new(domain, 1.0);
    field.fill(1.0, inflow);

    Ok(Harness {
        world,
        field,
        populations: Populations::at_equilibrium(domain, 1.0, &inflow),
        nsteps: 200,
    })
}
