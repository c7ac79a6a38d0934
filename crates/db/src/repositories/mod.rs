//! Repository layer: one zero-sized struct per table with async
//! operations taking a pool or transaction.

pub mod domain_repo;
pub mod invitation_repo;
pub mod news_draft_repo;
pub mod news_repo;
pub mod opinion_repo;
pub mod sensitive_keyword_repo;
pub mod tag_repo;
pub mod user_news_repo;
pub mod user_repo;

pub use domain_repo::DomainRepo;
pub use invitation_repo::InvitationRepo;
pub use news_draft_repo::NewsDraftRepo;
pub use news_repo::NewsRepo;
pub use opinion_repo::OpinionRepo;
pub use sensitive_keyword_repo::SensitiveKeywordRepo;
pub use tag_repo::TagRepo;
pub use user_news_repo::UserNewsRepo;
pub use user_repo::UserRepo;
