//! Draft materialization and stale-news top-up.
//!
//! Both processors share the same per-item discipline: each draft or
//! news item gets its own transaction, a failure is logged and the run
//! moves on, and notification emails go out only after the commit.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use veritas_core::assignment::AssignmentPolicy;
use veritas_core::keywords::match_keywords;
use veritas_core::news::ProcessingResult;
use veritas_core::types::Timestamp;
use veritas_db::models::news_draft::NewsDraft;
use veritas_db::models::user::User;
use veritas_db::repositories::{
    NewsDraftRepo, NewsRepo, SensitiveKeywordRepo, UserNewsRepo, UserRepo,
};
use veritas_db::DbPool;
use veritas_events::EmailDelivery;

/// Materializes unprocessed drafts into news items and assigns them to
/// the least-loaded fact checkers.
pub struct DraftBatchProcessor {
    pool: DbPool,
    read_pool: DbPool,
    policy: AssignmentPolicy,
    email: Option<Arc<EmailDelivery>>,
}

impl DraftBatchProcessor {
    pub fn new(
        pool: DbPool,
        read_pool: DbPool,
        policy: AssignmentPolicy,
        email: Option<Arc<EmailDelivery>>,
    ) -> Self {
        Self {
            pool,
            read_pool,
            policy,
            email,
        }
    }

    /// Run one batch. Returns the number of drafts processed.
    pub async fn process_batch(&self) -> Result<usize, sqlx::Error> {
        let active = UserRepo::count_active_fact_checkers(&self.pool).await?;
        let batch = self.policy.batch_size(active);
        if batch == 0 {
            warn!("no active fact checkers, skipping draft batch");
            return Ok(0);
        }

        let drafts = NewsDraftRepo::oldest_unprocessed(&self.read_pool, batch).await?;
        if drafts.is_empty() {
            return Ok(0);
        }
        info!(
            drafts = drafts.len(),
            active_fact_checkers = active,
            "processing draft batch"
        );

        let keyword_names = SensitiveKeywordRepo::names(&self.pool).await?;
        let window_start = Utc::now() - self.policy.active_window();

        let mut processed = 0;
        for draft in &drafts {
            match self.process_draft(draft, &keyword_names, window_start).await {
                Ok(assigned) => {
                    processed += 1;
                    self.notify_assigned(&assigned).await;
                }
                Err(err) => {
                    error!(draft_id = %draft.id, error = %err, "draft processing failed");
                }
            }
        }
        Ok(processed)
    }

    /// Materialize a single draft inside its own transaction.
    async fn process_draft(
        &self,
        draft: &NewsDraft,
        keyword_names: &[String],
        window_start: Timestamp,
    ) -> Result<Vec<User>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if NewsRepo::url_exists(&mut tx, &draft.url).await? {
            NewsDraftRepo::mark_processed(&mut tx, draft.id, ProcessingResult::Duplicate.as_str())
                .await?;
            tx.commit().await?;
            info!(draft_id = %draft.id, "draft marked as duplicate");
            return Ok(Vec::new());
        }

        let news = NewsRepo::create_from_draft(&mut tx, draft).await?;

        let matched = match_keywords(keyword_names, &news.text, &news.comment);
        if !matched.is_empty() {
            SensitiveKeywordRepo::attach_to_news(&mut tx, news.id, &matched).await?;
            NewsRepo::set_sensitive(&mut tx, news.id, true).await?;
        }

        let checkers = UserRepo::select_least_loaded_checkers(
            &mut tx,
            news.id,
            window_start,
            self.policy.target_per_news,
        )
        .await?;
        let ids: Vec<_> = checkers.iter().map(|u| u.id).collect();
        UserNewsRepo::assign_many(&mut tx, news.id, &ids, None).await?;

        NewsDraftRepo::mark_processed(&mut tx, draft.id, ProcessingResult::Assigned.as_str())
            .await?;
        tx.commit().await?;

        info!(
            draft_id = %draft.id,
            news_id = %news.id,
            assigned = checkers.len(),
            sensitive = !matched.is_empty(),
            "draft materialized"
        );
        Ok(checkers)
    }

    async fn notify_assigned(&self, assigned: &[User]) {
        let Some(mailer) = &self.email else {
            return;
        };
        let recipients: Vec<String> = assigned
            .iter()
            .filter(|u| u.allow_subscriptions)
            .map(|u| u.email.clone())
            .collect();
        if !recipients.is_empty() {
            mailer.send_assignment_notifications(&recipients).await;
        }
    }
}

/// Tops up assignments on news items whose earlier assignments have
/// gone stale without producing a verdict.
pub struct StaleNewsProcessor {
    pool: DbPool,
    policy: AssignmentPolicy,
    batch_limit: i64,
    email: Option<Arc<EmailDelivery>>,
}

impl StaleNewsProcessor {
    pub fn new(
        pool: DbPool,
        policy: AssignmentPolicy,
        batch_limit: i64,
        email: Option<Arc<EmailDelivery>>,
    ) -> Self {
        Self {
            pool,
            policy,
            batch_limit,
            email,
        }
    }

    /// Run one pass. Returns the number of news items topped up.
    ///
    /// The batch is sized like the draft batch, from the current
    /// fact-checker pool, and additionally capped by `batch_limit`.
    pub async fn process(&self) -> Result<usize, sqlx::Error> {
        let active = UserRepo::count_active_fact_checkers(&self.pool).await?;
        let batch = self.policy.batch_size(active).min(self.batch_limit);
        if batch == 0 {
            warn!("no active fact checkers, skipping stale top-up");
            return Ok(0);
        }

        let window_start = Utc::now() - self.policy.active_window();
        let stale = NewsRepo::stale(
            &self.pool,
            window_start,
            self.policy.target_per_news,
            batch,
        )
        .await?;
        if stale.is_empty() {
            return Ok(0);
        }
        info!(stale = stale.len(), "topping up stale news assignments");

        let mut topped_up = 0;
        for news in &stale {
            match self.top_up(news.id, window_start).await {
                Ok(assigned) if !assigned.is_empty() => {
                    topped_up += 1;
                    self.notify_assigned(&assigned).await;
                }
                Ok(_) => {}
                Err(err) => {
                    error!(news_id = %news.id, error = %err, "stale top-up failed");
                }
            }
        }
        Ok(topped_up)
    }

    async fn top_up(
        &self,
        news_id: veritas_core::types::DbId,
        window_start: Timestamp,
    ) -> Result<Vec<User>, sqlx::Error> {
        let active = NewsRepo::active_assignment_count(&self.pool, news_id, window_start).await?;
        let missing = self.policy.missing(active);
        if missing == 0 {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let checkers =
            UserRepo::select_least_loaded_checkers(&mut tx, news_id, window_start, missing).await?;
        let ids: Vec<_> = checkers.iter().map(|u| u.id).collect();
        UserNewsRepo::assign_many(&mut tx, news_id, &ids, None).await?;
        tx.commit().await?;

        if !checkers.is_empty() {
            info!(news_id = %news_id, assigned = checkers.len(), "stale news topped up");
        }
        Ok(checkers)
    }

    async fn notify_assigned(&self, assigned: &[User]) {
        let Some(mailer) = &self.email else {
            return;
        };
        let recipients: Vec<String> = assigned
            .iter()
            .filter(|u| u.allow_subscriptions)
            .map(|u| u.email.clone())
            .collect();
        if !recipients.is_empty() {
            mailer.send_assignment_notifications(&recipients).await;
        }
    }
}
