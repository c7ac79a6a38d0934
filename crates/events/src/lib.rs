//! Verdict events and notification infrastructure.
//!
//! Building blocks for reacting to verdict changes:
//!
//! - [`EventDispatcher`]: explicit event-to-subscriber routing table,
//!   validated at construction.
//! - [`NewsEvent`] / [`NewsVerdictContext`]: the dispatched event kinds
//!   and their payload.
//! - [`email`]: SMTP delivery of workflow notification emails.
//! - [`subscribers`]: the concrete subscriber implementations wired in
//!   by the binaries.

pub mod dispatcher;
pub mod email;
pub mod subscribers;

pub use dispatcher::{EventDispatcher, NewsEvent, NewsEventSubscriber, NewsVerdictContext};
pub use email::{EmailConfig, EmailDelivery, EmailError};
pub use subscribers::{default_routes, ReporterVerdictNotifier, VerdictAuditLogger};
