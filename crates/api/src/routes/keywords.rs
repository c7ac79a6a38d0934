//! Dictionary routes: `/sensitive-keywords`, `/domains`, `/tags`.
//!
//! ```text
//! GET    /sensitive-keywords        -> list (admin)
//! POST   /sensitive-keywords        -> create (admin)
//! DELETE /sensitive-keywords/{id}   -> delete (admin)
//! GET    /domains                   -> list
//! POST   /domains                   -> create (admin)
//! DELETE /domains/{id}              -> delete (admin)
//! GET    /tags                      -> list
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::keywords;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sensitive-keywords",
            get(keywords::list_sensitive_keywords).post(keywords::create_sensitive_keyword),
        )
        .route(
            "/sensitive-keywords/{id}",
            delete(keywords::delete_sensitive_keyword),
        )
        .route(
            "/domains",
            get(keywords::list_domains).post(keywords::create_domain),
        )
        .route("/domains/{id}", delete(keywords::delete_domain))
        .route("/tags", get(keywords::list_tags))
}
