#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::math::{AngularInertia, AngularVector, Point, Real, Rotation, Vector};
use crate::object::BodyDesc;
use crate::z_order;

use std::f32::consts::PI;

/// Description of a rigid sphere sampled by markers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SphereDesc {
    /// The diameter of the sphere, in lattice units.
    pub diameter: Real,
    /// The initial position of the sphere center.
    pub center: Point<Real>,
    /// The target distance between neighboring markers.
    pub spacing: Real,
    /// The density of the sphere material.
    pub density: Real,
    /// Does the sphere move in response to forces?
    pub movable: bool,
    /// The initial linear velocity.
    pub linvel: Vector<Real>,
    /// The initial angular velocity.
    pub angvel: AngularVector<Real>,
    /// How far inside the sphere surface the markers are placed.
    pub retraction: Real,
    /// Number of Coulomb relaxation iterations applied to the polar tiling.
    pub coulomb_iterations: usize,
}

impl SphereDesc {
    /// A sphere at rest with unit density and markers spaced by one lattice cell.
    pub fn new(diameter: Real, center: Point<Real>, movable: bool) -> Self {
        Self {
            diameter,
            center,
            spacing: 1.0,
            density: 1.0,
            movable,
            linvel: Vector::zeros(),
            angvel: AngularVector::zeros(),
            retraction: 0.0,
            coulomb_iterations: 0,
        }
    }

    /// Sets the target distance between neighboring markers.
    pub fn spacing(mut self, spacing: Real) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the density of the sphere material.
    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    /// Sets the initial linear velocity.
    pub fn linvel(mut self, linvel: Vector<Real>) -> Self {
        self.linvel = linvel;
        self
    }

    /// Sets the initial angular velocity.
    pub fn angvel(mut self, angvel: AngularVector<Real>) -> Self {
        self.angvel = angvel;
        self
    }

    /// Moves the markers `retraction` lattice units toward the sphere center.
    pub fn retraction(mut self, retraction: Real) -> Self {
        self.retraction = retraction;
        self
    }

    /// Sets the number of Coulomb relaxation iterations.
    pub fn coulomb_iterations(mut self, iterations: usize) -> Self {
        self.coulomb_iterations = iterations;
        self
    }

    /// The radius of the sphere.
    pub fn radius(&self) -> Real {
        self.diameter / 2.0
    }

    /// The volume of the sphere.
    pub fn volume(&self) -> Real {
        let r = self.radius();
        4.0 / 3.0 * PI * r * r * r
    }

    /// Checks the geometric parameters of this sphere.
    pub fn validate(&self) -> Result<()> {
        if !(self.diameter > 0.0 && self.diameter.is_finite()) {
            return Err(Error::invalid(
                "diameter",
                format!("must be > 0, got {}", self.diameter),
            ));
        }

        if !(self.spacing > 0.0 && self.spacing.is_finite()) {
            return Err(Error::invalid(
                "spacing",
                format!("must be > 0, got {}", self.spacing),
            ));
        }

        if !(self.retraction >= 0.0 && self.retraction < self.radius()) {
            return Err(Error::invalid(
                "retraction",
                format!("must be in [0, {}[, got {}", self.radius(), self.retraction),
            ));
        }

        if !self.center.iter().all(|x| x.is_finite()) {
            return Err(Error::invalid("center", "must be finite"));
        }

        Ok(())
    }

    /// The number of markers sampling this sphere, or `None` if there are more than `limit`.
    ///
    /// Coulomb relaxation does not change this number.
    pub fn num_markers(&self, limit: usize) -> Option<usize> {
        sphere_marker_count(self.radius() - self.retraction, self.spacing, limit)
    }

    /// Samples this sphere and computes its mass properties.
    pub fn body_desc(&self) -> Result<BodyDesc> {
        self.validate()?;

        let radius = self.radius();
        let shell_radius = radius - self.retraction;
        let mut markers = sphere_markers(shell_radius, self.spacing);

        if self.coulomb_iterations > 0 {
            let mut points: Vec<_> = markers.iter().map(|m| m.0).collect();
            coulomb_relaxation(shell_radius, self.spacing, &mut points, self.coulomb_iterations);

            let area = 4.0 * PI * shell_radius * shell_radius / points.len() as Real;
            markers = points.into_iter().map(|p| (p, area)).collect();
        }

        // Markers close in space are stored close in memory.
        let shifted: Vec<_> = markers
            .iter()
            .map(|m| m.0.add_scalar(shell_radius))
            .collect();
        let permutation = z_order::compute_points_z_order(&shifted);
        let markers = z_order::apply_permutation(&permutation, &markers);

        let volume = self.volume();
        let mass = self.density * volume;
        let desc = BodyDesc {
            center: self.center,
            orientation: Rotation::identity(),
            linvel: self.linvel,
            angvel: self.angvel,
            mass,
            volume,
            inertia: AngularInertia::identity() * (0.4 * mass * radius * radius),
            radius,
            movable: self.movable,
            markers,
        };

        desc.validate()?;
        Ok(desc)
    }
}

/// Tiles a sphere of the given radius with markers along latitude rings.
///
/// The polar angle is split into bands of equal angular height about `spacing` apart. Each band
/// carries a ring of markers about `spacing` apart, sharing the exact area of the spherical zone
/// covered by the band. Consecutive rings are staggered. The areas sum to the sphere area.
pub fn sphere_markers(radius: Real, spacing: Real) -> Vec<(Vector<Real>, Real)> {
    let mut result = Vec::new();

    for (k, (theta0, theta1, npoints)) in rings(radius, spacing).enumerate() {
        let theta = (theta0 + theta1) / 2.0;
        let zone_area = 2.0 * PI * radius * radius * (theta0.cos() - theta1.cos());
        let area = zone_area / npoints as Real;
        let phase = if k % 2 == 0 { 0.0 } else { 0.5 };

        for j in 0..npoints {
            let phi = 2.0 * PI * (j as Real + phase) / npoints as Real;
            let dir = Vector::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            result.push((dir * radius, area));
        }
    }

    result
}

/// The number of markers `sphere_markers(radius, spacing)` produces, or `None` if there are
/// more than `limit`.
///
/// Nothing is allocated, and counting stops as soon as `limit` is exceeded.
pub fn sphere_marker_count(radius: Real, spacing: Real, limit: usize) -> Option<usize> {
    rings(radius, spacing).try_fold(0usize, |count, (_, _, npoints)| {
        count.checked_add(npoints).filter(|count| *count <= limit)
    })
}

// Polar angle range and number of markers of each latitude band. Every band has a marker.
fn rings(radius: Real, spacing: Real) -> impl Iterator<Item = (Real, Real, usize)> {
    let nrings = ((PI * radius / spacing).round() as usize).max(1);
    let dtheta = PI / nrings as Real;

    (0..nrings).map(move |k| {
        let theta0 = k as Real * dtheta;
        let theta1 = (k + 1) as Real * dtheta;
        let theta = (theta0 + theta1) / 2.0;
        let npoints = ((2.0 * PI * radius * theta.sin() / spacing).round() as usize).max(1);
        (theta0, theta1, npoints)
    })
}

/// Spreads points evenly on a sphere by letting them repel each other like charges.
///
/// Each iteration moves every point along the tangential part of its Coulomb force, the fastest
/// point moving by a tenth of `spacing`, then projects it back onto the sphere.
pub fn coulomb_relaxation(
    radius: Real,
    spacing: Real,
    points: &mut [Vector<Real>],
    iterations: usize,
) {
    if points.len() < 2 {
        return;
    }

    let mut displacements = vec![Vector::zeros(); points.len()];

    for _ in 0..iterations {
        {
            let points = &*points;

            par_iter_mut!(displacements)
                .enumerate()
                .for_each(|(i, displacement)| {
                    let pi = points[i];
                    let mut force = Vector::zeros();

                    for (j, pj) in points.iter().enumerate() {
                        let r = pi - pj;
                        let sq_dist = r.norm_squared();

                        if i != j && sq_dist > Real::EPSILON {
                            force += r / (sq_dist * sq_dist.sqrt());
                        }
                    }

                    let normal = pi.normalize();
                    *displacement = force - normal * force.dot(&normal);
                });
        }

        let max_norm = displacements
            .iter()
            .map(|d| d.norm())
            .fold(0.0, Real::max);

        if max_norm <= Real::EPSILON {
            break;
        }

        let scale = 0.1 * spacing / max_norm;

        for (p, d) in points.iter_mut().zip(displacements.iter()) {
            let moved = *p + d * scale;
            *p = moved * (radius / moved.norm());
        }
    }
}
