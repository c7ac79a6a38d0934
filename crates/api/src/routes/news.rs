//! News routes mounted at `/news`, plus the opinion edit route.
//!
//! ```text
//! GET    /                   -> list_news (reviewer)
//! GET    /published          -> list_published (public)
//! GET    /{id}               -> get_news
//! PATCH  /{id}               -> update_news (admin)
//! POST   /{id}/publish       -> publish_news (admin)
//! POST   /{id}/pin           -> pin_news (admin)
//! POST   /{id}/opinions      -> leave_opinion (judge)
//! POST   /{id}/assignment    -> assign_news (crew)
//! DELETE /{id}/assignment    -> dismiss_assignment (self)
//! PUT    /{id}/tags          -> set_tags (crew)
//! PUT    /{id}/domains       -> set_domains (admin)
//! POST   /{id}/screenshot    -> upload_screenshot (crew)
//! ```

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{news, opinions};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(news::list_news))
        .route("/published", get(news::list_published))
        .route("/{id}", get(news::get_news).patch(news::update_news))
        .route("/{id}/publish", post(news::publish_news))
        .route("/{id}/pin", post(news::pin_news))
        .route("/{id}/opinions", post(opinions::leave_opinion))
        .route(
            "/{id}/assignment",
            post(news::assign_news).delete(news::dismiss_assignment),
        )
        .route("/{id}/tags", put(news::set_tags))
        .route("/{id}/domains", put(news::set_domains))
        .route("/{id}/screenshot", post(news::upload_screenshot))
}

/// Opinion edit route mounted at `/opinions`.
///
/// ```text
/// PATCH /opinions/{id} -> update_opinion (admin)
/// ```
pub fn opinions_router() -> Router<AppState> {
    Router::new().route("/opinions/{id}", patch(opinions::update_opinion))
}
