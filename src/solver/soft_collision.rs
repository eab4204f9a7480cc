use crate::counters::CollisionCounters;
use crate::error::Result;
use crate::geometry::HGrid;
use crate::lattice::LatticeDomain;
use crate::math::{Real, Vector, DIM};
use crate::object::Body;
use crate::params::CollisionParams;

/// Penalty-based collision model between bodies and against the lattice walls.
///
/// Two surfaces closer than the threshold `ζ` repel each other with a force of magnitude
/// `k ((ζ - s) / ζ)²` where `s` is their separation, directed along the line joining the body
/// centers, or along the wall normal. Bodies are approximated by their bounding sphere.
#[derive(Clone, Debug)]
pub struct SoftCollisionResolver {
    params: CollisionParams,
    hgrid: HGrid<usize>,
}

impl SoftCollisionResolver {
    /// Creates the resolver after validating its parameters.
    pub fn new(params: CollisionParams) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            params,
            hgrid: HGrid::new(params.threshold),
        })
    }

    /// The parameters of this resolver.
    pub fn params(&self) -> &CollisionParams {
        &self.params
    }

    /// Magnitude of the repulsive force between two surfaces separated by `separation`.
    ///
    /// Zero at and beyond the threshold, strictly decreasing with the separation below it.
    /// Overlapping surfaces have a negative separation.
    pub fn repulsion(&self, separation: Real, stiffness: Real) -> Real {
        let threshold = self.params.threshold;

        if separation >= threshold {
            0.0
        } else {
            let gap = (threshold - separation) / threshold;
            stiffness * gap * gap
        }
    }

    /// The collision force exerted by `b2` on `b1`.
    ///
    /// `b2` is subject to the opposite force. Bodies with coincident centers do not repel each
    /// other since no direction can be chosen.
    pub fn pair_force(&self, b1: &Body, b2: &Body) -> Vector<Real> {
        let dir = b1.center() - b2.center();
        let dist = dir.norm();
        let separation = dist - b1.radius() - b2.radius();
        let magnitude = self.repulsion(separation, self.params.pair_stiffness);

        if magnitude == 0.0 || dist <= Real::EPSILON {
            Vector::zeros()
        } else {
            dir * (magnitude / dist)
        }
    }

    /// The force exerted by the walls of `domain` on `body`, and the number of walls touched.
    ///
    /// The walls orthogonal to an axis are the lattice faces at coordinates `0` and `n - 1`.
    pub fn wall_force(&self, body: &Body, domain: &LatticeDomain) -> (Vector<Real>, usize) {
        let upper = domain.upper_corner();
        let center = body.center();
        let mut force = Vector::zeros();
        let mut ncontacts = 0;

        for i in 0..DIM {
            if !self.params.walls[i] {
                continue;
            }

            let lower = self.repulsion(center[i] - body.radius(), self.params.wall_stiffness);
            let upper = self.repulsion(
                upper[i] - center[i] - body.radius(),
                self.params.wall_stiffness,
            );

            if lower > 0.0 {
                force[i] += lower;
                ncontacts += 1;
            }

            if upper > 0.0 {
                force[i] -= upper;
                ncontacts += 1;
            }
        }

        (force, ncontacts)
    }

    /// Computes the collision force of every body, indexed like `bodies`.
    ///
    /// Candidate pairs are found with a spatial hash of the body centers. Pairs of fixed bodies
    /// are skipped and fixed bodies get no wall force. The bodies are not modified.
    pub fn resolve(
        &mut self,
        bodies: &[Body],
        domain: &LatticeDomain,
        counters: &mut CollisionCounters,
    ) -> Vec<Vector<Real>> {
        let mut forces = vec![Vector::zeros(); bodies.len()];
        let max_radius = bodies.iter().map(|b| b.radius()).fold(0.0, Real::max);
        let reach = 2.0 * max_radius + self.params.threshold;

        self.hgrid.reset(reach);

        for (i, body) in bodies.iter().enumerate() {
            self.hgrid.insert(body.center(), i);
        }

        for (i, b1) in bodies.iter().enumerate() {
            for j in self.hgrid.elements_near_point(b1.center(), reach) {
                let j = *j;

                if j <= i {
                    continue;
                }

                let b2 = &bodies[j];
                counters.ncandidate_pairs += 1;

                if !b1.is_movable() && !b2.is_movable() {
                    continue;
                }

                let f = self.pair_force(b1, b2);

                if f != Vector::zeros() {
                    forces[i] += f;
                    forces[j] -= f;
                    counters.npair_contacts += 1;
                }
            }

            if b1.is_movable() {
                let (f, ncontacts) = self.wall_force(b1, domain);
                forces[i] += f;
                counters.nwall_contacts += ncontacts;
            }
        }

        forces
    }
}

#[cfg(test)]
mod test {
    use super::SoftCollisionResolver;
    use crate::counters::CollisionCounters;
    use crate::lattice::LatticeDomain;
    use crate::math::{AngularInertia, AngularVector, Point, Real, Rotation, Vector};
    use crate::object::{Body, BodyDesc};
    use crate::params::CollisionParams;
    use approx::assert_relative_eq;

    fn sphere(center: Point<Real>, radius: Real, movable: bool) -> Body {
        let desc = BodyDesc {
            center,
            orientation: Rotation::identity(),
            linvel: Vector::zeros(),
            angvel: AngularVector::zeros(),
            mass: 1.0,
            volume: 1.0,
            inertia: AngularInertia::identity(),
            radius,
            movable,
            markers: vec![(Vector::x() * radius, 1.0)],
        };
        Body::new(&desc, 0..1)
    }

    fn resolver() -> SoftCollisionResolver {
        SoftCollisionResolver::new(CollisionParams {
            threshold: 2.0,
            pair_stiffness: 1.0,
            wall_stiffness: 0.5,
            walls: [true, true, false],
        })
        .unwrap()
    }

    #[test]
    fn repulsion_vanishes_at_the_threshold_and_grows_when_closing_in() {
        let r = resolver();
        assert_eq!(r.repulsion(2.0, 1.0), 0.0);
        assert_eq!(r.repulsion(5.0, 1.0), 0.0);

        let mut last = 0.0;
        for s in [1.9, 1.5, 1.0, 0.5, 0.0, -0.5] {
            let f = r.repulsion(s, 1.0);
            assert!(f > last);
            last = f;
        }
        assert_relative_eq!(r.repulsion(0.0, 1.0), 1.0);
    }

    #[test]
    fn pair_forces_are_equal_and_opposite() {
        let mut r = resolver();
        let domain = LatticeDomain::new(64, 64, 64).unwrap();
        let bodies = [
            sphere(Point::new(30.0, 32.0, 32.0), 5.0, true),
            sphere(Point::new(41.0, 32.5, 32.0), 5.0, true),
        ];
        let mut counters = CollisionCounters::new();

        let forces = r.resolve(&bodies, &domain, &mut counters);

        assert!(forces[0].x < 0.0);
        assert_relative_eq!(forces[0], -forces[1]);
        assert_eq!(counters.npair_contacts, 1);
        assert_eq!(counters.nwall_contacts, 0);
    }

    #[test]
    fn distant_and_fixed_pairs_do_not_interact() {
        let mut r = resolver();
        let domain = LatticeDomain::new(64, 64, 64).unwrap();
        let mut counters = CollisionCounters::new();

        let far = [
            sphere(Point::new(20.0, 32.0, 32.0), 5.0, true),
            sphere(Point::new(32.0, 32.0, 32.0), 5.0, true),
        ];
        let forces = r.resolve(&far, &domain, &mut counters);
        assert!(forces.iter().all(|f| *f == Vector::zeros()));

        let fixed = [
            sphere(Point::new(30.0, 32.0, 32.0), 5.0, false),
            sphere(Point::new(39.0, 32.0, 32.0), 5.0, false),
        ];
        let forces = r.resolve(&fixed, &domain, &mut counters);
        assert!(forces.iter().all(|f| *f == Vector::zeros()));
    }

    #[test]
    fn walls_push_bodies_inward() {
        let r = resolver();
        let domain = LatticeDomain::new(32, 32, 32).unwrap();

        let (f, n) = r.wall_force(&sphere(Point::new(5.0, 16.0, 16.0), 4.0, true), &domain);
        assert_eq!(n, 1);
        assert_relative_eq!(f, Vector::new(0.5 * 0.25, 0.0, 0.0));

        let (f, n) = r.wall_force(&sphere(Point::new(16.0, 26.0, 16.0), 4.0, true), &domain);
        assert_eq!(n, 1);
        assert!(f.y < 0.0);

        // No walls along z.
        let (f, n) = r.wall_force(&sphere(Point::new(16.0, 16.0, 2.0), 4.0, true), &domain);
        assert_eq!(n, 0);
        assert_eq!(f, Vector::zeros());
    }

    #[test]
    fn spatial_hash_finds_every_contact() {
        let mut r = resolver();
        let domain = LatticeDomain::new(128, 128, 128).unwrap();
        let mut counters = CollisionCounters::new();
        let bodies: Vec<_> = (0..40)
            .map(|i| {
                let x = 10.0 + (i % 10) as Real * 9.3;
                let y = 10.0 + (i / 10) as Real * 11.7;
                let radius = if i % 3 == 0 { 5.0 } else { 3.0 };
                sphere(Point::new(x, y, 64.0), radius, true)
            })
            .collect();

        let forces = r.resolve(&bodies, &domain, &mut counters);

        for (i, b1) in bodies.iter().enumerate() {
            let mut expected = r.wall_force(b1, &domain).0;
            for (j, b2) in bodies.iter().enumerate() {
                if i != j {
                    expected += r.pair_force(b1, b2);
                }
            }
            assert_relative_eq!(forces[i], expected, epsilon = 1.0e-6);
        }
    }
}
