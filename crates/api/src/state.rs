use std::sync::Arc;

use veritas_events::{EmailDelivery, EventDispatcher};

use crate::config::ServerConfig;
use crate::storage::ScreenshotStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: veritas_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Event routing table for verdict events, validated at startup.
    pub dispatcher: Arc<EventDispatcher>,
    /// SMTP mailer, `None` when `SMTP_HOST` is not configured.
    pub email: Option<Arc<EmailDelivery>>,
    /// S3 screenshot storage, `None` when not configured.
    pub storage: Option<Arc<ScreenshotStorage>>,
}
