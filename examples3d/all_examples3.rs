#![allow(dead_code)]

extern crate nalgebra as na;

use immersa3d::{Result, WorldParams};

use helper::Harness;

mod falling_sphere3;
mod fixed_sphere3;
mod helper;
mod shear_flow3;
mod sphere_grid3;

fn demo_name_from_command_line() -> Option<String> {
    let mut args = std::env::args();

    while let Some(arg) = args.next() {
        if &arg[..] == "--example" {
            return args.next();
        }
    }

    None
}

fn main() {
    env_logger::init();

    let demo = demo_name_from_command_line().unwrap_or_default();
    let params = match helper::params_from_command_line() {
        Ok(params) => params,
        Err(e) => {
            log::error!("could not read the configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut builders: Vec<(_, fn(WorldParams) -> Result<Harness>)> = vec![
        ("falling_sphere", falling_sphere3::init_world),
        ("fixed_sphere", fixed_sphere3::init_world),
        ("shear_flow", shear_flow3::init_world),
        ("sphere_grid", sphere_grid3::init_world),
    ];

    builders.sort_by_key(|builder| builder.0);

    let i = builders
        .iter()
        .position(|builder| builder.0 == demo.as_str())
        .unwrap_or(0);
    log::info!("running the {} demo", builders[i].0);

    if let Err(e) = (builders[i].1)(params).and_then(|mut harness| harness.run()) {
        log::error!("simulation aborted: {}", e);
        std::process::exit(1);
    }
}
