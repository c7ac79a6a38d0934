//! Worker configuration loaded from environment variables.

use veritas_core::assignment::{
    AssignmentPolicy, DEFAULT_ACTIVITY_WINDOW_MINS, DEFAULT_SAFETY_MARGIN_MINS,
    DEFAULT_TARGET_PER_NEWS,
};

/// Maximum stale news items topped up per run.
const DEFAULT_STALE_BATCH_LIMIT: i64 = 50;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Assignment tuning shared with the selection queries.
    pub policy: AssignmentPolicy,
    /// Cap on stale items handled per run.
    pub stale_batch_limit: i64,
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default |
    /// |----------------------------------|---------|
    /// | `TARGET_ASSIGNMENTS_PER_NEWS`    | `4`     |
    /// | `ASSIGNMENT_ACTIVITY_WINDOW_MINS`| `120`   |
    /// | `ASSIGNMENT_SAFETY_MARGIN_MINS`  | `5`     |
    /// | `STALE_BATCH_LIMIT`              | `50`    |
    pub fn from_env() -> Self {
        Self {
            policy: AssignmentPolicy {
                target_per_news: env_i64("TARGET_ASSIGNMENTS_PER_NEWS", DEFAULT_TARGET_PER_NEWS),
                activity_window_mins: env_i64(
                    "ASSIGNMENT_ACTIVITY_WINDOW_MINS",
                    DEFAULT_ACTIVITY_WINDOW_MINS,
                ),
                safety_margin_mins: env_i64(
                    "ASSIGNMENT_SAFETY_MARGIN_MINS",
                    DEFAULT_SAFETY_MARGIN_MINS,
                ),
            },
            stale_batch_limit: env_i64("STALE_BATCH_LIMIT", DEFAULT_STALE_BATCH_LIMIT),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            policy: AssignmentPolicy::default(),
            stale_batch_limit: DEFAULT_STALE_BATCH_LIMIT,
        }
    }
}
