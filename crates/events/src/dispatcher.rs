//! Explicit event routing for verdict changes.
//!
//! [`EventDispatcher`] holds a fixed table mapping each [`NewsEvent`]
//! to an ordered list of subscribers. The table is validated when the
//! dispatcher is built: every event kind must have at least one
//! subscriber, so a missing wiring is caught at startup rather than
//! silently dropping notifications at runtime.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use veritas_core::types::DbId;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Verdict lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsEvent {
    /// A news item crossed from no verdict to a final verdict.
    NewVerdict,
    /// An existing opinion was edited by an admin.
    EditVerdict,
}

impl NewsEvent {
    pub const ALL: [NewsEvent; 2] = [NewsEvent::NewVerdict, NewsEvent::EditVerdict];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsEvent::NewVerdict => "new_verdict",
            NewsEvent::EditVerdict => "edit_verdict",
        }
    }
}

/// Payload handed to every subscriber of a verdict event.
#[derive(Debug, Clone, Serialize)]
pub struct NewsVerdictContext {
    pub news_id: DbId,
    pub reporter_email: String,
    /// Whether the triggering opinion came from an expert-class judge.
    pub verdicted_by_expert: bool,
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

/// A reaction to a verdict event.
///
/// Implementations must be infallible from the dispatcher's point of
/// view in the sense that their errors never abort the containing
/// request; the dispatcher logs and moves on.
#[async_trait]
pub trait NewsEventSubscriber: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        event: NewsEvent,
        ctx: &NewsVerdictContext,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Error raised when the routing table is incomplete at wiring time.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatcherError {
    #[error("no subscribers registered for event '{0}'")]
    MissingSubscribers(&'static str),
}

/// Routes each [`NewsEvent`] to its subscribers, in registration order.
pub struct EventDispatcher {
    routes: BTreeMap<NewsEvent, Vec<Box<dyn NewsEventSubscriber>>>,
}

impl EventDispatcher {
    /// Build a dispatcher from an explicit routing table.
    ///
    /// Fails if any [`NewsEvent`] kind has no subscriber list or an
    /// empty one.
    pub fn new(
        routes: BTreeMap<NewsEvent, Vec<Box<dyn NewsEventSubscriber>>>,
    ) -> Result<Self, DispatcherError> {
        for event in NewsEvent::ALL {
            match routes.get(&event) {
                Some(subs) if !subs.is_empty() => {}
                _ => return Err(DispatcherError::MissingSubscribers(event.as_str())),
            }
        }
        Ok(Self { routes })
    }

    /// Deliver an event to every subscriber, sequentially and in order.
    ///
    /// Subscriber failures are logged and never propagated; a broken
    /// mailer must not fail the request that produced the verdict.
    pub async fn dispatch(&self, event: NewsEvent, ctx: &NewsVerdictContext) {
        // Validated non-empty in `new`.
        let subscribers = &self.routes[&event];
        for subscriber in subscribers {
            if let Err(error) = subscriber.handle(event, ctx).await {
                tracing::error!(
                    event = event.as_str(),
                    subscriber = subscriber.name(),
                    news_id = %ctx.news_id,
                    %error,
                    "Event subscriber failed"
                );
            } else {
                tracing::debug!(
                    event = event.as_str(),
                    subscriber = subscriber.name(),
                    news_id = %ctx.news_id,
                    "Event delivered"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
