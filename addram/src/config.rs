/// Run options, fixed once the run starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Detect and report, but leave the list and control register as found.
    pub dry_run: bool,
    pub verbose: bool,
    /// Grow a fast region ending at the bonus window instead of adding a new one.
    pub merge_with_adjacent: bool,
    /// Allocation priority for the board's fast RAM.
    ///
    /// Bonus RAM is queued two below it and legacy RAM one below it.
    pub target_priority: i8,
    /// Only clear the bonus RAM enable bit.
    pub disable: bool,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            dry_run: false,
            verbose: false,
            merge_with_adjacent: false,
            target_priority: 0,
            disable: false,
        }
    }

    pub const fn dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    pub const fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    pub const fn merge_with_adjacent(mut self, on: bool) -> Self {
        self.merge_with_adjacent = on;
        self
    }

    pub const fn target_priority(mut self, priority: i8) -> Self {
        self.target_priority = priority;
        self
    }

    pub const fn disable(mut self, on: bool) -> Self {
        self.disable = on;
        self
    }

    /// Priority of a newly added bonus region.
    pub fn bonus_priority(&self) -> i8 {
        self.target_priority.saturating_sub(2)
    }

    /// Priority the legacy region is demoted to.
    pub fn legacy_priority(&self) -> i8 {
        self.target_priority.saturating_sub(1)
    }
}
