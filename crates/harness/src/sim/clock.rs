//! Simulated-time and cycle bookkeeping.

/// Monotonic simulated time plus clock level and cycle counting.
///
/// Time only ever moves forward, and always by a positive quantum, so the
/// trace timeline stays causally ordered. The clock level alternates strictly
/// on every [`toggle`](SimClock::toggle). Half-cycles are counted explicitly
/// by the run loop so that reset sequencing does not consume the cycle budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    time: u64,
    half_cycles: u64,
    level: bool,
}

impl SimClock {
    /// A clock at time zero with the level low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Current clock level.
    pub fn level(&self) -> bool {
        self.level
    }

    /// Full clock cycles counted so far.
    pub fn cycles(&self) -> u64 {
        self.half_cycles / 2
    }

    /// Advances simulated time by `quantum` units.
    pub fn advance(&mut self, quantum: u64) {
        self.time += quantum;
    }

    /// Flips the clock level and returns the new level.
    pub fn toggle(&mut self) -> bool {
        self.level = !self.level;
        self.level
    }

    /// Forces the clock level without counting an edge.
    pub fn set_level(&mut self, level: bool) {
        self.level = level;
    }

    /// Records one half-cycle of run-loop progress.
    pub fn count_half_cycle(&mut self) {
        self.half_cycles += 1;
    }
}
