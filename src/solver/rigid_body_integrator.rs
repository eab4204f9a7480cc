#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::math::{AngularVector, Point, Rotation, Vector};
use crate::object::{Body, MarkerSet};
use crate::params::KinematicsParams;

/// Integrates the motion of rigid bodies subject to hydrodynamic, collision and body forces.
///
/// Velocities are updated with an explicit Euler step using the hydrodynamic force averaged
/// over the current and previous steps. Positions and orientations are then advanced with the
/// average of the old and new velocities.
#[derive(Clone, Debug)]
pub struct RigidBodyIntegrator {
    params: KinematicsParams,
}

impl RigidBodyIntegrator {
    /// Creates the integrator after validating its parameters.
    pub fn new(params: KinematicsParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters of this integrator.
    pub fn params(&self) -> &KinematicsParams {
        &self.params
    }

    /// Sums the marker forces of every body into its hydrodynamic force and torque.
    ///
    /// The torque is computed around the body center.
    pub fn accumulate_hydrodynamics(&self, bodies: &mut [Body], markers: &MarkerSet) {
        par_iter_mut!(bodies).for_each(|body| {
            let mut force = Vector::zeros();
            let mut torque = AngularVector::zeros();

            for i in body.markers() {
                let f = markers.forces[i];
                force += f;
                torque += (markers.positions[i] - body.center).cross(&f);
            }

            body.hydro_force = force;
            body.hydro_torque = torque;
        })
    }

    /// Advances the velocity and pose of every movable body by one time step.
    ///
    /// Fixed bodies only record their hydrodynamic force history.
    pub fn integrate(&self, bodies: &mut [Body]) {
        let dt = self.params.dt;
        let gravity = self.params.gravity;
        let fluid_density = self.params.fluid_density;

        par_iter_mut!(bodies).for_each(|body| {
            let (prev_force, prev_torque) = body
                .prev_hydro
                .unwrap_or((body.hydro_force, body.hydro_torque));
            body.prev_hydro = Some((body.hydro_force, body.hydro_torque));

            if !body.is_movable() {
                return;
            }

            let weight = gravity * (body.mass() - fluid_density * body.volume());
            let force = (body.hydro_force + prev_force) * 0.5
                + body.collision_force
                + body.external_force()
                + weight;
            let torque = (body.hydro_torque + prev_torque) * 0.5 + body.external_torque();

            let linvel = body.linvel + force * (dt / body.mass());
            body.center += (body.linvel + linvel) * (0.5 * dt);
            body.linvel = linvel;

            let inertia = body.world_inertia();
            let inv_inertia = body.world_inv_inertia();
            let gyroscopic = body.angvel.cross(&(inertia * body.angvel));
            let angvel = body.angvel + inv_inertia * (torque - gyroscopic) * dt;

            let rotation = Rotation::from_scaled_axis((body.angvel + angvel) * (0.5 * dt));
            body.orientation = rotation * body.orientation;
            body.orientation.renormalize_fast();
            body.angvel = angvel;
        })
    }

    /// Moves every marker with the rigid motion of its body.
    pub fn update_markers(&self, bodies: &[Body], markers: &mut MarkerSet) {
        let offsets = &markers.offsets;
        let owners = &markers.bodies;

        par_iter_mut!(markers.positions)
            .zip(&mut markers.velocities)
            .enumerate()
            .for_each(|(i, (position, velocity))| {
                let body = &bodies[owners[i]];
                *position = body.position() * Point::from(offsets[i]);
                *velocity = body.velocity_at_point(position);
            })
    }
}
