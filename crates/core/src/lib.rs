//! Veritas domain logic.
//!
//! Pure domain rules for the fact-checking workflow: verdict
//! aggregation, opinion-shape validation, assignment policy math, the
//! role promotion state machine, and sensitive-keyword matching.
//!
//! This crate has zero internal deps so it can be used by the API,
//! repository layer, and worker tooling alike. Nothing here touches
//! the database or the network.

pub mod assignment;
pub mod error;
pub mod keywords;
pub mod news;
pub mod opinion;
pub mod roles;
pub mod types;
pub mod verdict;
