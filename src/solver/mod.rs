//! Rigid-body dynamics: time integration and soft collisions.

pub use self::rigid_body_integrator::RigidBodyIntegrator;
pub use self::soft_collision::SoftCollisionResolver;

mod rigid_body_integrator;
mod soft_collision;
