//! Route tree assembly.

pub mod auth;
pub mod drafts;
pub mod health;
pub mod invitations;
pub mod keywords;
pub mod news;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                     login (public)
/// /auth/register                  invitation signup (public)
///
/// /drafts                         report intake (public, POST)
///
/// /news                           list (reviewer)
/// /news/published                 public verdict feed
/// /news/{id}                      detail, admin edit
/// /news/{id}/publish              toggle publication (admin)
/// /news/{id}/pin                  toggle pin (admin)
/// /news/{id}/opinions             leave opinion (judge)
/// /news/{id}/assignment           manual assign (crew), dismiss (self)
/// /news/{id}/tags                 replace tag set (crew)
/// /news/{id}/domains              replace domain set (admin)
/// /news/{id}/screenshot           upload screenshot (crew)
///
/// /opinions/{id}                  rewrite opinion (admin)
///
/// /users/me                       profile (self)
/// /users                          list (admin)
/// /users/{id}/role                promotion (admin)
///
/// /invitations                    create, list (admin)
///
/// /sensitive-keywords             dictionary CRUD (admin)
/// /domains                        list (auth), create/delete (admin)
/// /tags                           list (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/drafts", drafts::router())
        .nest("/news", news::router())
        .merge(news::opinions_router())
        .nest("/users", users::router())
        .nest("/invitations", invitations::router())
        .merge(keywords::router())
}
