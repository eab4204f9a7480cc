//! Counters for benchmarking various parts of the coupling engine.

use std::fmt::{Display, Formatter, Result};

pub use self::collision_counters::CollisionCounters;
pub use self::ibm_counters::IbmCounters;
pub use self::stages_counters::StagesCounters;
pub use self::timer::Timer;

mod collision_counters;
mod ibm_counters;
mod stages_counters;
mod timer;

/// Aggregation of all the performances counters tracked by the immersed world.
#[derive(Clone, Copy)]
pub struct Counters {
    /// Total number of steps performed since the world was created.
    pub nsteps: usize,
    /// Timer for a whole timestep.
    pub step_time: Timer,
    /// Counters of every stage of one time step.
    pub stages: StagesCounters,
    /// Counters of the interpolation/spread passes.
    pub ibm: IbmCounters,
    /// Counters of the soft-collision stage.
    pub collisions: CollisionCounters,
}

impl Counters {
    /// Create a new set of counters initialized to zero.
    pub fn new() -> Self {
        Counters {
            nsteps: 0,
            step_time: Timer::new(),
            stages: StagesCounters::new(),
            ibm: IbmCounters::new(),
            collisions: CollisionCounters::new(),
        }
    }

    /// Resets to zero all the per-step counters.
    ///
    /// The total number of steps is kept.
    pub fn reset(&mut self) {
        self.step_time.reset();
        self.stages.reset();
        self.ibm.reset();
        self.collisions.reset();
    }

    /// Enable all the timers.
    pub fn enable(&mut self) {
        self.step_time.enable();
        self.stages.enable();
    }

    /// Disable all the timers.
    pub fn disable(&mut self) {
        self.step_time.disable();
        self.stages.disable();
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Counters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Total timestep time: {}", self.step_time)?;
        writeln!(f, "Num steps: {}", self.nsteps)?;
        self.stages.fmt(f)?;
        self.ibm.fmt(f)?;
        self.collisions.fmt(f)
    }
}
