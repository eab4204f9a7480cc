use crate::error::{Error, Result};
use crate::math::{AngularInertia, AngularVector, Isometry, Point, Real, Rotation, Vector};
use std::ops::Range;

/// The handle of a body added to an immersed world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    /// The index of this body in the body set.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Everything needed to add a rigid body to an immersed world.
#[derive(Clone, Debug)]
pub struct BodyDesc {
    /// The initial position of the center of mass.
    pub center: Point<Real>,
    /// The initial orientation.
    pub orientation: Rotation<Real>,
    /// The initial linear velocity. Ignored for fixed bodies.
    pub linvel: Vector<Real>,
    /// The initial angular velocity. Ignored for fixed bodies.
    pub angvel: AngularVector<Real>,
    /// The mass of the body.
    pub mass: Real,
    /// The volume of the body, used for buoyancy.
    pub volume: Real,
    /// The inertia tensor expressed in body-space.
    pub inertia: AngularInertia<Real>,
    /// Radius of the bounding sphere used by the collision model.
    pub radius: Real,
    /// Does this body move in response to forces?
    pub movable: bool,
    /// The markers of the body: their body-space offset and the surface area they represent.
    pub markers: Vec<(Vector<Real>, Real)>,
}

impl BodyDesc {
    /// Checks that this description can be turned into a body.
    pub fn validate(&self) -> Result<()> {
        if self.markers.is_empty() {
            return Err(Error::invalid("markers", "a body needs at least one marker"));
        }

        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(Error::invalid("radius", format!("must be > 0, got {}", self.radius)));
        }

        if self.markers.iter().any(|(_, area)| !(*area >= 0.0)) {
            return Err(Error::invalid("markers", "marker areas must be >= 0"));
        }

        if self.movable {
            if !(self.mass > 0.0 && self.mass.is_finite()) {
                return Err(Error::NonPositiveMass(self.mass));
            }

            // The inertia tensor must be symmetric positive-definite.
            let min_diag = self.inertia.diagonal().min();
            if !(min_diag > 0.0) || self.inertia.cholesky().is_none() {
                return Err(Error::NonPositiveInertia(min_diag));
            }
        }

        Ok(())
    }
}

/// A rigid body immersed in the fluid.
#[derive(Clone, Debug)]
pub struct Body {
    pub(crate) markers: Range<usize>,
    pub(crate) center: Point<Real>,
    pub(crate) orientation: Rotation<Real>,
    pub(crate) linvel: Vector<Real>,
    pub(crate) angvel: AngularVector<Real>,
    mass: Real,
    volume: Real,
    radius: Real,
    local_inertia: AngularInertia<Real>,
    local_inv_inertia: AngularInertia<Real>,
    movable: bool,
    pub(crate) hydro_force: Vector<Real>,
    pub(crate) hydro_torque: AngularVector<Real>,
    pub(crate) prev_hydro: Option<(Vector<Real>, AngularVector<Real>)>,
    pub(crate) collision_force: Vector<Real>,
    external_force: Vector<Real>,
    external_torque: AngularVector<Real>,
}

impl Body {
    pub(crate) fn new(desc: &BodyDesc, markers: Range<usize>) -> Self {
        let (linvel, angvel, local_inv_inertia) = if desc.movable {
            let inv = desc
                .inertia
                .try_inverse()
                .unwrap_or_else(AngularInertia::zeros);
            (desc.linvel, desc.angvel, inv)
        } else {
            (Vector::zeros(), AngularVector::zeros(), AngularInertia::zeros())
        };

        Self {
            markers,
            center: desc.center,
            orientation: desc.orientation,
            linvel,
            angvel,
            mass: desc.mass,
            volume: desc.volume,
            radius: desc.radius,
            local_inertia: desc.inertia,
            local_inv_inertia,
            movable: desc.movable,
            hydro_force: Vector::zeros(),
            hydro_torque: AngularVector::zeros(),
            prev_hydro: None,
            collision_force: Vector::zeros(),
            external_force: Vector::zeros(),
            external_torque: AngularVector::zeros(),
        }
    }

    /// The range of the markers of this body in the world marker set.
    pub fn markers(&self) -> Range<usize> {
        self.markers.clone()
    }

    /// The number of markers of this body.
    pub fn num_markers(&self) -> usize {
        self.markers.len()
    }

    /// The position of the center of mass.
    pub fn center(&self) -> &Point<Real> {
        &self.center
    }

    /// The orientation of this body.
    pub fn orientation(&self) -> &Rotation<Real> {
        &self.orientation
    }

    /// The rigid transformation from body-space to world-space.
    pub fn position(&self) -> Isometry<Real> {
        Isometry::from_parts(self.center.coords.into(), self.orientation)
    }

    /// The linear velocity of the center of mass.
    pub fn linvel(&self) -> &Vector<Real> {
        &self.linvel
    }

    /// The angular velocity.
    pub fn angvel(&self) -> &AngularVector<Real> {
        &self.angvel
    }

    /// The velocity of the material point of this body located at `point`.
    #[inline]
    pub fn velocity_at_point(&self, point: &Point<Real>) -> Vector<Real> {
        self.linvel + self.angvel.cross(&(point - self.center))
    }

    /// The mass of this body.
    pub fn mass(&self) -> Real {
        self.mass
    }

    /// The volume of this body.
    pub fn volume(&self) -> Real {
        self.volume
    }

    /// Radius of the bounding sphere of this body.
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Does this body move in response to forces?
    pub fn is_movable(&self) -> bool {
        self.movable
    }

    /// The inertia tensor in body-space.
    pub fn local_inertia(&self) -> &AngularInertia<Real> {
        &self.local_inertia
    }

    /// The inertia tensor in world-space.
    pub fn world_inertia(&self) -> AngularInertia<Real> {
        let rot = self.orientation.to_rotation_matrix();
        rot * self.local_inertia * rot.transpose()
    }

    /// The inverse of the inertia tensor in world-space. Zero for fixed bodies.
    pub fn world_inv_inertia(&self) -> AngularInertia<Real> {
        let rot = self.orientation.to_rotation_matrix();
        rot * self.local_inv_inertia * rot.transpose()
    }

    /// The force exerted by the fluid on this body during the last step.
    pub fn hydro_force(&self) -> &Vector<Real> {
        &self.hydro_force
    }

    /// The torque exerted by the fluid on this body during the last step, around its center.
    pub fn hydro_torque(&self) -> &AngularVector<Real> {
        &self.hydro_torque
    }

    /// The collision force applied to this body during the last step.
    pub fn collision_force(&self) -> &Vector<Real> {
        &self.collision_force
    }

    /// A user-defined force applied to this body at every step.
    pub fn external_force(&self) -> &Vector<Real> {
        &self.external_force
    }

    /// Sets the user-defined force applied to this body at every step.
    pub fn set_external_force(&mut self, force: Vector<Real>) {
        self.external_force = force;
    }

    /// A user-defined torque applied to this body at every step.
    pub fn external_torque(&self) -> &AngularVector<Real> {
        &self.external_torque
    }

    /// Sets the user-defined torque applied to this body at every step.
    pub fn set_external_torque(&mut self, torque: AngularVector<Real>) {
        self.external_torque = torque;
    }

    /// Is the state of this body free of NaN and infinities?
    pub fn is_finite(&self) -> bool {
        self.center.iter().all(|x| x.is_finite())
            && self.linvel.iter().all(|x| x.is_finite())
            && self.angvel.iter().all(|x| x.is_finite())
            && self.orientation.coords.iter().all(|x| x.is_finite())
    }
}

#[cfg(test)]
mod test {
    use super::{Body, BodyDesc};
    use crate::error::Error;
    use crate::math::{AngularInertia, AngularVector, Point, Rotation, Vector};
    use approx::assert_relative_eq;

    fn desc() -> BodyDesc {
        BodyDesc {
            center: Point::new(1.0, 2.0, 3.0),
            orientation: Rotation::identity(),
            linvel: Vector::x(),
            angvel: AngularVector::z(),
            mass: 2.0,
            volume: 1.0,
            inertia: AngularInertia::identity() * 0.5,
            radius: 1.0,
            movable: true,
            markers: vec![(Vector::x(), 1.0)],
        }
    }

    #[test]
    fn movable_body_needs_positive_mass_and_inertia() {
        let mut d = desc();
        d.mass = 0.0;
        assert_eq!(d.validate(), Err(Error::NonPositiveMass(0.0)));

        let mut d = desc();
        d.inertia[(1, 1)] = -1.0;
        assert!(matches!(d.validate(), Err(Error::NonPositiveInertia(_))));

        let mut d = desc();
        d.mass = 0.0;
        d.movable = false;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn fixed_body_is_at_rest() {
        let mut d = desc();
        d.movable = false;
        let body = Body::new(&d, 0..1);
        assert_eq!(*body.linvel(), Vector::zeros());
        assert_eq!(*body.angvel(), AngularVector::zeros());
        assert_eq!(body.world_inv_inertia(), AngularInertia::zeros());
    }

    #[test]
    fn rigid_velocity_field() {
        let body = Body::new(&desc(), 0..1);
        let v = body.velocity_at_point(&Point::new(2.0, 2.0, 3.0));
        assert_relative_eq!(v, Vector::new(1.0, 1.0, 0.0));
    }
}
