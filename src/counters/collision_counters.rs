use std::fmt::{Display, Formatter, Result};

/// Counters of the soft-collision stage.
#[derive(Default, Clone, Copy)]
pub struct CollisionCounters {
    /// Number of body pairs returned by the broad phase.
    pub ncandidate_pairs: usize,
    /// Number of body pairs closer than the collision threshold.
    pub npair_contacts: usize,
    /// Number of body-wall pairs closer than the collision threshold.
    pub nwall_contacts: usize,
}

impl CollisionCounters {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to zero all the counters.
    pub fn reset(&mut self) {
        self.ncandidate_pairs = 0;
        self.npair_contacts = 0;
        self.nwall_contacts = 0;
    }
}

impl Display for CollisionCounters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Candidate pairs: {}", self.ncandidate_pairs)?;
        writeln!(f, "Pair contacts: {}", self.npair_contacts)?;
        writeln!(f, "Wall contacts: {}", self.nwall_contacts)
    }
}
