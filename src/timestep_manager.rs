use crate::math::Real;
use crate::object::Body;

/// Structure responsible for tracking the simulation time and the stability of the body motion.
#[derive(Clone, Debug)]
pub struct TimestepManager {
    dt: Real,
    inv_dt: Real,
    max_displacement: Real,
    nsteps: u64,
    time: f64,
}

impl TimestepManager {
    /// Initialize a new timestep manager for steps of length `dt`.
    ///
    /// A warning is logged whenever a body moves by more than `max_displacement` in one step.
    pub fn new(dt: Real, max_displacement: Real) -> Self {
        Self {
            dt,
            inv_dt: 1.0 / dt,
            max_displacement,
            nsteps: 0,
            time: 0.0,
        }
    }

    /// The length of a step.
    #[inline]
    pub fn dt(&self) -> Real {
        self.dt
    }

    /// The inverse length of a step.
    #[inline]
    pub fn inv_dt(&self) -> Real {
        self.inv_dt
    }

    /// The number of completed steps.
    pub fn nsteps(&self) -> u64 {
        self.nsteps
    }

    /// The simulated time elapsed since the first step.
    pub fn elapsed_time(&self) -> f64 {
        self.time
    }

    pub(crate) fn advance(&mut self) {
        self.nsteps += 1;
        self.time += self.dt as f64;
    }

    /// Logs a warning for every body with a non-finite state or moving too fast.
    ///
    /// Returns the number of offending bodies.
    pub fn check_stability(&self, bodies: &[Body]) -> usize {
        let mut noffending = 0;

        for (i, body) in bodies.iter().enumerate() {
            if !body.is_finite() {
                log::warn!("step {}: body {} has a non-finite state", self.nsteps, i);
                noffending += 1;
                continue;
            }

            let displacement = body.linvel().norm() * self.dt;

            if displacement > self.max_displacement {
                log::warn!(
                    "step {}: body {} moved by {:.4} cells in one step (limit {})",
                    self.nsteps,
                    i,
                    displacement,
                    self.max_displacement
                );
                noffending += 1;
            }
        }

        noffending
    }
}
