use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use veritas_events::{EmailConfig, EmailDelivery};
use veritas_worker::{DraftBatchProcessor, StaleNewsProcessor, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veritas_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let read_url = std::env::var("DATABASE_READ_URL").ok();

    let pool = veritas_db::create_pool(&database_url)
        .await
        .context("failed to connect to the database")?;
    let read_pool = veritas_db::create_read_pool(&database_url, read_url.as_deref())
        .await
        .context("failed to connect to the read database")?;

    let config = WorkerConfig::from_env();
    let email = EmailConfig::from_env().map(|cfg| Arc::new(EmailDelivery::new(cfg)));
    if email.is_none() {
        tracing::warn!("SMTP not configured, assignment notifications disabled");
    }

    let stale = StaleNewsProcessor::new(
        pool.clone(),
        config.policy,
        config.stale_batch_limit,
        email.clone(),
    );
    let topped_up = stale.process().await.context("stale top-up run failed")?;

    let drafts = DraftBatchProcessor::new(pool, read_pool, config.policy, email);
    let processed = drafts
        .process_batch()
        .await
        .context("draft batch run failed")?;

    tracing::info!(topped_up, processed, "worker run complete");
    Ok(())
}
