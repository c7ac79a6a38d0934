//! HTTP request handlers, grouped by resource.

pub mod auth;
pub mod drafts;
pub mod health;
pub mod invitations;
pub mod keywords;
pub mod news;
pub mod opinions;
pub mod users;
