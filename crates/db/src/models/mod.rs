//! Database entity models and DTOs.

pub mod invitation;
pub mod keyword;
pub mod news;
pub mod news_draft;
pub mod opinion;
pub mod user;
pub mod user_news;
