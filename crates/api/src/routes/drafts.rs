//! Report intake route mounted at `/drafts`.
//!
//! ```text
//! POST / -> create_draft (public)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::drafts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(drafts::create_draft))
}
