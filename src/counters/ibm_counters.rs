use std::fmt::{Display, Formatter, Result};

/// Counters of the interpolation/spread passes.
#[derive(Default, Clone, Copy)]
pub struct IbmCounters {
    /// Number of velocity-correction iterations performed.
    pub niterations: usize,
    /// Number of markers interpolated during the last iteration.
    pub nmarkers: usize,
    /// Number of (marker, lattice node) pairs visited by the spread passes.
    pub nstencil_nodes: usize,
}

impl IbmCounters {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to zero all the counters.
    pub fn reset(&mut self) {
        self.niterations = 0;
        self.nmarkers = 0;
        self.nstencil_nodes = 0;
    }
}

impl Display for IbmCounters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Velocity-correction iterations: {}", self.niterations)?;
        writeln!(f, "Markers: {}", self.nmarkers)?;
        writeln!(f, "Stencil nodes visited: {}", self.nstencil_nodes)
    }
}
