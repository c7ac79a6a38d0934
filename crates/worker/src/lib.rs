//! Intake worker: turns drafts into assigned news items and tops up
//! coverage on stalled ones.
//!
//! The worker is a one-shot process meant to run on a schedule (cron
//! or a container job). Each run first tops up stale news, then
//! processes a batch of drafts sized to the current fact-checker pool.

pub mod config;
pub mod processor;

pub use config::WorkerConfig;
pub use processor::{DraftBatchProcessor, StaleNewsProcessor};
