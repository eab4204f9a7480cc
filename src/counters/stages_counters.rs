use crate::counters::Timer;
use std::fmt::{Display, Formatter, Result};

/// Performance counters related to each stage of the time step.
#[derive(Default, Clone, Copy)]
pub struct StagesCounters {
    /// Time spent interpolating the fluid velocity and computing the marker forces.
    pub interpolation_time: Timer,
    /// Time spent spreading the marker forces onto the lattice.
    pub spread_time: Timer,
    /// Time spent folding the spread forces into the macroscopic velocity.
    pub coupling_time: Timer,
    /// Time spent computing the soft-collision forces.
    pub collision_time: Timer,
    /// Time spent integrating the rigid-body motion and moving the markers.
    pub kinematics_time: Timer,
}

impl StagesCounters {
    /// Create a new counter initialized to zero.
    pub fn new() -> Self {
        StagesCounters {
            interpolation_time: Timer::new(),
            spread_time: Timer::new(),
            coupling_time: Timer::new(),
            collision_time: Timer::new(),
            kinematics_time: Timer::new(),
        }
    }

    /// Enables all the counters for the simulation stages.
    pub fn enable(&mut self) {
        self.interpolation_time.enable();
        self.spread_time.enable();
        self.coupling_time.enable();
        self.collision_time.enable();
        self.kinematics_time.enable();
    }

    /// Disables all the counters for the simulation stages.
    pub fn disable(&mut self) {
        self.interpolation_time.disable();
        self.spread_time.disable();
        self.coupling_time.disable();
        self.collision_time.disable();
        self.kinematics_time.disable();
    }

    /// Resets to zero all the counters for the simulation stages.
    pub fn reset(&mut self) {
        self.interpolation_time.reset();
        self.spread_time.reset();
        self.coupling_time.reset();
        self.collision_time.reset();
        self.kinematics_time.reset();
    }
}

impl Display for StagesCounters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Interpolation time: {}", self.interpolation_time)?;
        writeln!(f, "Spread time: {}", self.spread_time)?;
        writeln!(f, "Coupling time: {}", self.coupling_time)?;
        writeln!(f, "Collision time: {}", self.collision_time)?;
        writeln!(f, "Kinematics time: {}", self.kinematics_time)
    }
}
