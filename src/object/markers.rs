use crate::kernel::Stencil;
use crate::math::{Point, Real, Vector};
use std::ops::Range;

/// What the last interpolation pass measured at a marker.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MarkerSample {
    /// The lattice nodes covered by the marker kernel, with their weights.
    pub stencil: Stencil,
    /// The fluid density interpolated at the marker.
    pub density: Real,
    /// The fluid velocity interpolated at the marker.
    pub velocity: Vector<Real>,
    /// The force handed to the fluid by the marker during the last pass.
    pub spread_force: Vector<Real>,
}

/// Structure-of-arrays storage of the Lagrangian markers of every body.
///
/// Each body owns a contiguous range of markers. Markers are only added when a body is added to
/// the world, so the range of a body never changes during a simulation.
#[derive(Clone, Debug, Default)]
pub struct MarkerSet {
    pub(crate) offsets: Vec<Vector<Real>>,
    pub(crate) positions: Vec<Point<Real>>,
    pub(crate) velocities: Vec<Vector<Real>>,
    pub(crate) areas: Vec<Real>,
    pub(crate) bodies: Vec<usize>,
    pub(crate) forces: Vec<Vector<Real>>,
    pub(crate) samples: Vec<MarkerSample>,
}

impl MarkerSet {
    /// An empty marker set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The total number of markers.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Is this set empty?
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Appends the markers of the body with index `body` and returns their range.
    ///
    /// Positions and velocities are set by the caller once the body pose is known.
    pub(crate) fn push_body(&mut self, body: usize, markers: &[(Vector<Real>, Real)]) -> Range<usize> {
        let start = self.len();

        for (offset, area) in markers {
            self.offsets.push(*offset);
            self.positions.push(Point::origin());
            self.velocities.push(Vector::zeros());
            self.areas.push(*area);
            self.bodies.push(body);
            self.forces.push(Vector::zeros());
            self.samples.push(MarkerSample::default());
        }

        start..self.len()
    }

    /// The marker offsets, relative to their body center, in body-space.
    pub fn offsets(&self) -> &[Vector<Real>] {
        &self.offsets
    }

    /// The world-space marker positions.
    pub fn positions(&self) -> &[Point<Real>] {
        &self.positions
    }

    /// The marker velocities, derived from the rigid motion of their body.
    pub fn velocities(&self) -> &[Vector<Real>] {
        &self.velocities
    }

    /// The surface area represented by each marker.
    pub fn areas(&self) -> &[Real] {
        &self.areas
    }

    /// The index of the body owning each marker.
    pub fn bodies(&self) -> &[usize] {
        &self.bodies
    }

    /// The force exerted by the fluid on each marker during the last step.
    ///
    /// This is the opposite of what the marker spread onto the lattice.
    pub fn forces(&self) -> &[Vector<Real>] {
        &self.forces
    }

    /// The last interpolation results of each marker.
    pub fn samples(&self) -> &[MarkerSample] {
        &self.samples
    }

    /// The sum of the forces exerted by the fluid on every marker.
    pub fn total_force(&self) -> Vector<Real> {
        self.forces.iter().fold(Vector::zeros(), |acc, f| acc + f)
    }
}

#[cfg(test)]
mod test {
    use super::MarkerSet;
    use crate::math::Vector;

    #[test]
    fn bodies_own_contiguous_ranges() {
        let mut markers = MarkerSet::new();
        let a = markers.push_body(0, &[(Vector::x(), 1.0), (Vector::y(), 2.0)]);
        let b = markers.push_body(1, &[(Vector::z(), 3.0)]);

        assert_eq!(a, 0..2);
        assert_eq!(b, 2..3);
        assert_eq!(markers.len(), 3);
        assert_eq!(markers.bodies(), &[0, 0, 1]);
        assert_eq!(markers.areas(), &[1.0, 2.0, 3.0]);
    }
}
