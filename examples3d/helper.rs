use immersa3d::lattice::{FluidField, LatticeDomain, Populations};
use immersa3d::{ImmersedWorld, Result, WorldParams};

/// A world, its fluid, and the number of steps to run.
pub struct Harness {
    pub world: ImmersedWorld,
    pub field: FluidField,
    pub populations: Populations,
    pub nsteps: usize,
}

impl Harness {
    /// A harness whose fluid is a reservoir at rest with unit density.
    pub fn at_rest(world: ImmersedWorld, nsteps: usize) -> Self {
        let domain = *world.domain();
        Self {
            field: FluidField::new(domain, 1.0),
            populations: Populations::at_equilibrium(domain, 1.0, &na::Vector3::zeros()),
            world,
            nsteps,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        for i in 0..self.nsteps {
            self.world
                .step_with_solver(&mut self.field, &mut self.populations)?;

            if i % 100 == 0 {
                for (handle, body) in self.world.bodies().iter() {
                    log::info!(
                        "step {}: body {} at {:.4?}, velocity {:.6?}, hydrodynamic force {:.6?}",
                        i,
                        handle.index(),
                        body.center().coords.as_slice(),
                        body.linvel().as_slice(),
                        body.hydro_force().as_slice()
                    );
                }
            }
        }

        log::info!("last step:\n{}", self.world.counters);
        Ok(())
    }
}

pub fn domain(nx: usize, ny: usize, nz: usize) -> Result<LatticeDomain> {
    LatticeDomain::new(nx, ny, nz)
}

fn config_from_command_line() -> Option<String> {
    let mut args = std::env::args();

    while let Some(arg) = args.next() {
        if &arg[..] == "--config" {
            return args.next();
        }
    }

    None
}

/// Reads the world parameters from the JSON file given with `--config`, if any.
pub fn params_from_command_line() -> std::result::Result<WorldParams, Box<dyn std::error::Error>> {
    match config_from_command_line() {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&json)?)
        }
        None => Ok(WorldParams::default()),
    }
}
