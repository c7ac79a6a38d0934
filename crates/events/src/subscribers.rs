//! Concrete event subscribers and the standard wiring.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatcher::{NewsEvent, NewsEventSubscriber, NewsVerdictContext};
use crate::email::EmailDelivery;

/// Standard routing table used by the server and worker binaries.
///
/// Every event gets the audit logger; `new_verdict` additionally
/// notifies the reporter.
pub fn default_routes(
    email: Option<Arc<EmailDelivery>>,
) -> BTreeMap<NewsEvent, Vec<Box<dyn NewsEventSubscriber>>> {
    let mut routes: BTreeMap<NewsEvent, Vec<Box<dyn NewsEventSubscriber>>> = BTreeMap::new();
    routes.insert(
        NewsEvent::NewVerdict,
        vec![
            Box::new(VerdictAuditLogger),
            Box::new(ReporterVerdictNotifier::new(email)),
        ],
    );
    routes.insert(NewsEvent::EditVerdict, vec![Box::new(VerdictAuditLogger)]);
    routes
}

/// Emails the original reporter when their submission gets a verdict.
///
/// Holds an optional mailer so the same wiring works in environments
/// without SMTP configured; without one the subscriber only logs.
pub struct ReporterVerdictNotifier {
    email: Option<Arc<EmailDelivery>>,
}

impl ReporterVerdictNotifier {
    pub fn new(email: Option<Arc<EmailDelivery>>) -> Self {
        Self { email }
    }
}

#[async_trait]
impl NewsEventSubscriber for ReporterVerdictNotifier {
    fn name(&self) -> &'static str {
        "reporter_verdict_notifier"
    }

    async fn handle(
        &self,
        event: NewsEvent,
        ctx: &NewsVerdictContext,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Edits change an existing judgment; the reporter was already
        // notified on the first verdict.
        if event != NewsEvent::NewVerdict {
            tracing::debug!(news_id = %ctx.news_id, "Skipping reporter email for edit");
            return Ok(());
        }
        match &self.email {
            Some(mailer) => {
                mailer
                    .send_news_verified_notification(&ctx.reporter_email, ctx.verdicted_by_expert)
                    .await?;
                Ok(())
            }
            None => {
                tracing::info!(
                    news_id = %ctx.news_id,
                    "Email delivery not configured, reporter notification skipped"
                );
                Ok(())
            }
        }
    }
}

/// Writes a structured log line for every verdict event.
pub struct VerdictAuditLogger;

#[async_trait]
impl NewsEventSubscriber for VerdictAuditLogger {
    fn name(&self) -> &'static str {
        "verdict_audit_logger"
    }

    async fn handle(
        &self,
        event: NewsEvent,
        ctx: &NewsVerdictContext,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!(
            event = event.as_str(),
            news_id = %ctx.news_id,
            verdicted_by_expert = ctx.verdicted_by_expert,
            "Verdict event"
        );
        Ok(())
    }
}
