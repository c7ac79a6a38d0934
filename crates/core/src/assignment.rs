//! Assignment policy math.
//!
//! Batch sizing and top-up arithmetic for the draft batch processor
//! and stale news re-topper. The selection query itself lives in the
//! repository layer; this module owns the policy knobs and the pure
//! calculations so they are testable in isolation.

use chrono::Duration;

/// Default target number of fact checkers assigned per news item.
pub const DEFAULT_TARGET_PER_NEWS: i64 = 4;

/// Default rolling window (minutes) in which an assignment counts as
/// "active".
pub const DEFAULT_ACTIVITY_WINDOW_MINS: i64 = 120;

/// Default safety margin (minutes) subtracted from the activity window
/// so assignments from the immediately preceding processor run are not
/// counted. Must be revisited if the run cadence changes.
pub const DEFAULT_SAFETY_MARGIN_MINS: i64 = 5;

/// Tunable assignment policy. All knobs are configuration, not
/// hardcoded literals.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentPolicy {
    /// Target assignment count per news item.
    pub target_per_news: i64,
    /// Rolling activity window in minutes.
    pub activity_window_mins: i64,
    /// Safety margin in minutes subtracted from the window.
    pub safety_margin_mins: i64,
}

impl Default for AssignmentPolicy {
    fn default() -> Self {
        Self {
            target_per_news: DEFAULT_TARGET_PER_NEWS,
            activity_window_mins: DEFAULT_ACTIVITY_WINDOW_MINS,
            safety_margin_mins: DEFAULT_SAFETY_MARGIN_MINS,
        }
    }
}

impl AssignmentPolicy {
    /// The effective lookback for counting active assignments: the
    /// activity window minus the safety margin.
    pub fn active_window(&self) -> Duration {
        Duration::minutes(self.activity_window_mins - self.safety_margin_mins)
    }

    /// Drafts (or stale news) to process per run:
    /// `ceil(active_fact_checkers / target_per_news)`, aiming at
    /// roughly one new assignment per fact checker per run.
    pub fn batch_size(&self, active_fact_checkers: i64) -> i64 {
        if self.target_per_news <= 0 {
            return 0;
        }
        (active_fact_checkers + self.target_per_news - 1) / self.target_per_news
    }

    /// Additional checkers needed to reach the target, never negative.
    pub fn missing(&self, current_assignments: i64) -> i64 {
        (self.target_per_news - current_assignments).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_size_is_ceiling_division() {
        let policy = AssignmentPolicy::default();
        assert_eq!(policy.batch_size(12), 3);
        assert_eq!(policy.batch_size(13), 4);
        assert_eq!(policy.batch_size(1), 1);
        assert_eq!(policy.batch_size(0), 0);
    }

    #[test]
    fn missing_never_goes_negative() {
        let policy = AssignmentPolicy::default();
        assert_eq!(policy.missing(0), 4);
        assert_eq!(policy.missing(3), 1);
        assert_eq!(policy.missing(4), 0);
        assert_eq!(policy.missing(7), 0);
    }

    #[test]
    fn active_window_subtracts_safety_margin() {
        let policy = AssignmentPolicy::default();
        assert_eq!(policy.active_window(), Duration::minutes(115));
    }
}
