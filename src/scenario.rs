//! Initial body layouts.
//!
//! A scenario only decides how many spheres are created and where. Everything else is done by
//! the immersed world when the spheres are added.

use itertools::iproduct;

use crate::error::{Error, Result};
use crate::kernel::DeltaKernel;
use crate::lattice::LatticeDomain;
use crate::math::{Point, Real, Vector};
use crate::object::BodyHandle;
use crate::sampling::SphereDesc;
use crate::ImmersedWorld;

/// Shape and material shared by every sphere of a scenario.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SphereTemplate {
    /// The diameter of every sphere.
    pub diameter: Real,
    /// The target distance between neighboring markers.
    pub spacing: Real,
    /// The density of the sphere material.
    pub density: Real,
    /// Number of Coulomb relaxation iterations of the marker tiling.
    pub coulomb_iterations: usize,
}

impl Default for SphereTemplate {
    fn default() -> Self {
        Self {
            diameter: 10.0,
            spacing: 1.0,
            density: 1.0,
            coulomb_iterations: 0,
        }
    }
}

impl SphereTemplate {
    fn at(&self, center: Point<Real>, movable: bool) -> SphereDesc {
        SphereDesc::new(self.diameter, center, movable)
            .spacing(self.spacing)
            .density(self.density)
            .coulomb_iterations(self.coulomb_iterations)
    }
}

/// A layout of spheres inside the lattice.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Scenario {
    /// One movable sphere in the upper part of the domain, at `(nx/2, ny/2, 3nz/4 + D/2)`.
    FallingSphere(SphereTemplate),
    /// One fixed sphere in the lower part of the domain, at `(nx/2, ny/2, nz/4)`.
    FixedSphere(SphereTemplate),
    /// One movable sphere at the center of the domain, typically placed in a shear flow.
    ShearFlowSphere(SphereTemplate),
    /// Up to `count` movable spheres on a regular grid starting from the top of the domain.
    ///
    /// Neighboring centers are `D + gap` apart along every axis.
    SphereGrid {
        /// Shape and material of every sphere.
        template: SphereTemplate,
        /// Number of spheres to place.
        count: usize,
        /// Distance between the surfaces of neighboring spheres.
        gap: Real,
    },
}

impl Scenario {
    /// The spheres of this scenario for the given lattice.
    pub fn spheres(&self, domain: &LatticeDomain) -> Result<Vec<SphereDesc>> {
        let [nx, ny, nz] = domain.extents().map(|n| n as Real);

        let spheres = match *self {
            Scenario::FallingSphere(t) => vec![t.at(
                Point::new(nx / 2.0, ny / 2.0, 3.0 * nz / 4.0 + t.diameter / 2.0),
                true,
            )],
            Scenario::FixedSphere(t) => {
                vec![t.at(Point::new(nx / 2.0, ny / 2.0, nz / 4.0), false)]
            }
            Scenario::ShearFlowSphere(t) => {
                vec![t.at(Point::new(nx / 2.0, ny / 2.0, nz / 2.0), true)]
            }
            Scenario::SphereGrid {
                template,
                count,
                gap,
            } => Self::grid(domain, &template, count, gap)?,
        };

        Ok(spheres)
    }

    fn grid(
        domain: &LatticeDomain,
        template: &SphereTemplate,
        count: usize,
        gap: Real,
    ) -> Result<Vec<SphereDesc>> {
        if !(gap >= 0.0) {
            return Err(Error::invalid("gap", format!("must be >= 0, got {}", gap)));
        }

        let pitch = template.diameter + gap;
        let margin = template.diameter / 2.0 + gap;
        let upper = domain.upper_corner();
        let per_axis = |extent: Real| {
            let usable = extent - 2.0 * margin;
            if usable < 0.0 {
                0
            } else {
                (usable / pitch).floor() as usize + 1
            }
        };
        let (cx, cy, cz) = (per_axis(upper.x), per_axis(upper.y), per_axis(upper.z));

        if count > cx * cy * cz {
            return Err(Error::invalid(
                "count",
                format!(
                    "{} spheres of diameter {} do not fit in the domain ({} at most)",
                    count,
                    template.diameter,
                    cx * cy * cz
                ),
            ));
        }

        // Layers are filled from the top of the domain, row by row.
        let spheres = iproduct!(0..cz, 0..cy, 0..cx)
            .take(count)
            .map(|(z, y, x)| {
                let center = Point::new(margin, margin, upper.z - margin)
                    + Vector::new(x as Real, y as Real, -(z as Real)) * pitch;
                template.at(center, true)
            })
            .collect();

        Ok(spheres)
    }

    /// Adds the spheres of this scenario to `world`.
    ///
    /// Stops at the first sphere that cannot be added.
    pub fn populate<K: DeltaKernel>(&self, world: &mut ImmersedWorld<K>) -> Result<Vec<BodyHandle>> {
        let spheres = self.spheres(world.domain())?;
        let mut handles = Vec::with_capacity(spheres.len());

        for sphere in &spheres {
            handles.push(world.add_sphere(sphere)?);
        }

        log::info!(
            "scenario populated with {} bodies and {} markers",
            world.bodies().len(),
            world.markers().len()
        );

        Ok(handles)
    }
}

#[cfg(test)]
mod test {
    use super::{Scenario, SphereTemplate};
    use crate::lattice::LatticeDomain;
    use crate::math::Point;
    use crate::params::WorldParams;
    use crate::ImmersedWorld;

    #[test]
    fn single_sphere_placements() {
        let domain = LatticeDomain::new(64, 64, 128).unwrap();
        let t = SphereTemplate::default();

        let falling = Scenario::FallingSphere(t).spheres(&domain).unwrap();
        assert_eq!(falling[0].center, Point::new(32.0, 32.0, 101.0));
        assert!(falling[0].movable);

        let fixed = Scenario::FixedSphere(t).spheres(&domain).unwrap();
        assert_eq!(fixed[0].center, Point::new(32.0, 32.0, 32.0));
        assert!(!fixed[0].movable);

        let shear = Scenario::ShearFlowSphere(t).spheres(&domain).unwrap();
        assert_eq!(shear[0].center, Point::new(32.0, 32.0, 64.0));
    }

    #[test]
    fn grid_spheres_do_not_overlap_and_fit_in_the_domain() {
        let domain = LatticeDomain::new(48, 48, 48).unwrap();
        let template = SphereTemplate {
            diameter: 8.0,
            ..SphereTemplate::default()
        };
        let scenario = Scenario::SphereGrid {
            template,
            count: 20,
            gap: 2.0,
        };

        let spheres = scenario.spheres(&domain).unwrap();
        assert_eq!(spheres.len(), 20);

        for (i, a) in spheres.iter().enumerate() {
            assert!(a.center.iter().all(|x| *x >= 6.0 && *x <= 41.0));
            for b in &spheres[i + 1..] {
                assert!((a.center - b.center).norm() >= 10.0 - 1.0e-4);
            }
        }

        let mut world = ImmersedWorld::new(domain, WorldParams::default()).unwrap();
        let handles = scenario.populate(&mut world).unwrap();
        assert_eq!(handles.len(), 20);
        assert_eq!(world.bodies().len(), 20);
    }

    #[test]
    fn overfull_grid_is_rejected() {
        let domain = LatticeDomain::new(24, 24, 24).unwrap();
        let scenario = Scenario::SphereGrid {
            template: SphereTemplate::default(),
            count: 9,
            gap: 1.0,
        };
        assert!(scenario.spheres(&domain).is_err());
    }
}
