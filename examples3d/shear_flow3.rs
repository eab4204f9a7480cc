use na::Vector3;

use immersa3d::lattice::{FluidField, Populations};
use immersa3d::math::Real;
use immersa3d::scenario::{Scenario, SphereTemplate};
use immersa3d::{ImmersedWorld, Result, WorldParams};

use crate::helper::{self, Harness};

/// A neutrally buoyant sphere at the center of a linear shear flow starts spinning.
pub fn init_world(params: WorldParams) -> Result<Harness> {
    let domain = helper::domain(64, 64, 64)?;
    let shear_rate = 1.0e-3;

    let mut world = ImmersedWorld::new(domain, params)?;
    let _ = Scenario::ShearFlowSphere(SphereTemplate::default()).populate(&mut world)?;

    let mut populations = Populations::new(domain);
    for i in 0..domain.num_nodes() {
        let [_, _, z] = domain.node(i);
        let u = Vector3::new(shear_rate * (z as Real - domain.nz as Real / 2.0), 0.0, 0.0);
        populations.set_equilibrium(i, 1.0, &u);
    }

    Ok(Harness {
        world,
        field: FluidField::new(domain, 1.0),
        populations,
        nsteps: 500,
    })
}
