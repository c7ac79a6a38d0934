//! Integration tests for the repository layer.
//!
//! Exercises the repositories against a real database:
//! - User creation and the duplicate-email constraint
//! - Least-loaded fact-checker selection and its exclusions
//! - Opinion uniqueness (per judge and one expert per news)
//! - Stale-news detection
//! - Draft processing and invitation lifecycle

use chrono::{Duration, Utc};
use sqlx::PgPool;
use veritas_core::roles::{validate_promotion, UserRole};
use veritas_core::types::DbId;
use veritas_db::models::news_draft::CreateNewsDraft;
use veritas_db::models::opinion::CreateOpinion;
use veritas_db::models::user::CreateUser;
use veritas_db::repositories::{
    DomainRepo, InvitationRepo, NewsDraftRepo, NewsRepo, OpinionRepo, SensitiveKeywordRepo,
    TagRepo, UserNewsRepo, UserRepo,
};
use veritas_core::opinion::OpinionFields;
use veritas_core::verdict::Verdict;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str, role: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        name: email.split('@').next().unwrap().to_string(),
        password_hash: "$argon2id$stub".to_string(),
        role: role.to_string(),
    }
}

fn new_draft(url: &str) -> CreateNewsDraft {
    CreateNewsDraft {
        url: url.to_string(),
        screenshot_url: String::new(),
        reporter_email: "reporter@example.com".to_string(),
        text: "claim text".to_string(),
        comment: String::new(),
        origin: "plugin".to_string(),
        reported_at: Utc::now(),
    }
}

fn verdict_fields(verdict: Verdict) -> OpinionFields {
    OpinionFields {
        title: "title".to_string(),
        comment: "comment".to_string(),
        confirmation_sources: "https://example.com/source".to_string(),
        verdict: Some(verdict),
        is_duplicate: false,
        duplicate_reference: None,
    }
}

async fn materialize_news(pool: &PgPool, url: &str) -> veritas_db::models::news::News {
    let draft = NewsDraftRepo::create(pool, &new_draft(url)).await.unwrap();
    let mut tx = pool.begin().await.unwrap();
    let news = NewsRepo::create_from_draft(&mut tx, &draft).await.unwrap();
    NewsDraftRepo::mark_processed(&mut tx, draft.id, "assigned")
        .await
        .unwrap();
    tx.commit().await.unwrap();
    news
}

fn constraint_name(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_email_hits_named_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("a@example.com", "fact_checker"))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("a@example.com", "expert"))
        .await
        .unwrap_err();
    assert_eq!(constraint_name(&err).as_deref(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "./migrations")]
async fn active_fact_checker_count_ignores_other_roles(pool: PgPool) {
    UserRepo::create(&pool, &new_user("c1@example.com", "fact_checker"))
        .await
        .unwrap();
    UserRepo::create(&pool, &new_user("c2@example.com", "fact_checker"))
        .await
        .unwrap();
    UserRepo::create(&pool, &new_user("e@example.com", "expert"))
        .await
        .unwrap();

    assert_eq!(UserRepo::count_active_fact_checkers(&pool).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn least_loaded_selection_orders_by_recent_assignments(pool: PgPool) {
    let busy = UserRepo::create(&pool, &new_user("busy@example.com", "fact_checker"))
        .await
        .unwrap();
    let idle = UserRepo::create(&pool, &new_user("idle@example.com", "fact_checker"))
        .await
        .unwrap();

    let old_news = materialize_news(&pool, "https://example.com/old").await;
    UserNewsRepo::assign(&pool, old_news.id, busy.id, None)
        .await
        .unwrap();

    let news = materialize_news(&pool, "https://example.com/new").await;
    let mut tx = pool.begin().await.unwrap();
    let window_start = Utc::now() - Duration::minutes(115);
    let picked = UserRepo::select_least_loaded_checkers(&mut tx, news.id, window_start, 1)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].id, idle.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn least_loaded_selection_skips_already_assigned(pool: PgPool) {
    let checker = UserRepo::create(&pool, &new_user("only@example.com", "fact_checker"))
        .await
        .unwrap();
    let news = materialize_news(&pool, "https://example.com/n").await;
    UserNewsRepo::assign(&pool, news.id, checker.id, None)
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let window_start = Utc::now() - Duration::minutes(115);
    let picked = UserRepo::select_least_loaded_checkers(&mut tx, news.id, window_start, 5)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert!(picked.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn promotion_to_moderator_drops_assignments(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("climber@example.com", "fact_checker"))
        .await
        .unwrap();
    let news = materialize_news(&pool, "https://example.com/assigned").await;
    UserNewsRepo::assign(&pool, news.id, user.id, None)
        .await
        .unwrap();

    let effects = validate_promotion(UserRole::FactChecker, UserRole::Moderator, false).unwrap();
    let promoted = UserRepo::promote(&pool, user.id, "moderator", None, effects)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(promoted.role, "moderator");
    assert!(UserNewsRepo::find(&pool, news.id, user.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Opinions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn one_opinion_per_judge_per_news(pool: PgPool) {
    let judge = UserRepo::create(&pool, &new_user("judge@example.com", "fact_checker"))
        .await
        .unwrap();
    let news = materialize_news(&pool, "https://example.com/n").await;

    let input = CreateOpinion {
        news_id: news.id,
        judge_id: judge.id,
        kind: "fact_checker".to_string(),
        fields: verdict_fields(Verdict::True),
    };
    OpinionRepo::create(&pool, &input).await.unwrap();
    let err = OpinionRepo::create(&pool, &input).await.unwrap_err();
    assert_eq!(
        constraint_name(&err).as_deref(),
        Some("uq_opinions_news_judge")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn simultaneous_duplicate_opinions_leave_exactly_one_row(pool: PgPool) {
    let judge = UserRepo::create(&pool, &new_user("judge@example.com", "fact_checker"))
        .await
        .unwrap();
    let news = materialize_news(&pool, "https://example.com/n").await;

    let input = CreateOpinion {
        news_id: news.id,
        judge_id: judge.id,
        kind: "fact_checker".to_string(),
        fields: verdict_fields(Verdict::True),
    };
    // Two writes race on separate pool connections; the constraint
    // decides the winner, with no check-then-act in the repository.
    let (first, second) = tokio::join!(
        OpinionRepo::create(&pool, &input),
        OpinionRepo::create(&pool, &input),
    );

    let (ok, err) = match (first, second) {
        (Ok(o), Err(e)) | (Err(e), Ok(o)) => (o, e),
        (Ok(_), Ok(_)) => panic!("both concurrent inserts succeeded"),
        (Err(a), Err(b)) => panic!("both concurrent inserts failed: {a}, {b}"),
    };
    assert_eq!(ok.judge_id, judge.id);
    assert_eq!(
        constraint_name(&err).as_deref(),
        Some("uq_opinions_news_judge")
    );

    let stored = OpinionRepo::list_for_news(&pool, news.id).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn at_most_one_expert_opinion_per_news(pool: PgPool) {
    let first = UserRepo::create(&pool, &new_user("e1@example.com", "expert"))
        .await
        .unwrap();
    let second = UserRepo::create(&pool, &new_user("e2@example.com", "expert"))
        .await
        .unwrap();
    let news = materialize_news(&pool, "https://example.com/n").await;

    OpinionRepo::create(
        &pool,
        &CreateOpinion {
            news_id: news.id,
            judge_id: first.id,
            kind: "expert".to_string(),
            fields: verdict_fields(Verdict::False),
        },
    )
    .await
    .unwrap();

    let err = OpinionRepo::create(
        &pool,
        &CreateOpinion {
            news_id: news.id,
            judge_id: second.id,
            kind: "expert".to_string(),
            fields: verdict_fields(Verdict::True),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        constraint_name(&err).as_deref(),
        Some("uq_opinions_one_expert_per_news")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn update_fields_overwrites_the_full_group(pool: PgPool) {
    let judge = UserRepo::create(&pool, &new_user("judge@example.com", "fact_checker"))
        .await
        .unwrap();
    let news = materialize_news(&pool, "https://example.com/n").await;
    let opinion = OpinionRepo::create(
        &pool,
        &CreateOpinion {
            news_id: news.id,
            judge_id: judge.id,
            kind: "fact_checker".to_string(),
            fields: verdict_fields(Verdict::True),
        },
    )
    .await
    .unwrap();

    let duplicate_of: DbId = materialize_news(&pool, "https://example.com/orig").await.id;
    let rewritten = OpinionRepo::update_fields(
        &pool,
        opinion.id,
        &OpinionFields {
            title: String::new(),
            comment: String::new(),
            confirmation_sources: String::new(),
            verdict: None,
            is_duplicate: true,
            duplicate_reference: Some(duplicate_of),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(rewritten.verdict, None);
    assert!(rewritten.is_duplicate);
    assert_eq!(rewritten.duplicate_reference, Some(duplicate_of));
}

// ---------------------------------------------------------------------------
// Stale news
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn stale_excludes_items_with_expert_opinion(pool: PgPool) {
    let expert = UserRepo::create(&pool, &new_user("e@example.com", "expert"))
        .await
        .unwrap();
    let judged = materialize_news(&pool, "https://example.com/judged").await;
    let waiting = materialize_news(&pool, "https://example.com/waiting").await;

    OpinionRepo::create(
        &pool,
        &CreateOpinion {
            news_id: judged.id,
            judge_id: expert.id,
            kind: "expert".to_string(),
            fields: verdict_fields(Verdict::True),
        },
    )
    .await
    .unwrap();

    let window_start = Utc::now() - Duration::minutes(115);
    let stale = NewsRepo::stale(&pool, window_start, 4, 100).await.unwrap();
    let ids: Vec<DbId> = stale.iter().map(|n| n.id).collect();
    assert!(ids.contains(&waiting.id));
    assert!(!ids.contains(&judged.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn stale_excludes_items_with_enough_active_assignments(pool: PgPool) {
    let news = materialize_news(&pool, "https://example.com/covered").await;
    for i in 0..4 {
        let u = UserRepo::create(
            &pool,
            &new_user(&format!("c{i}@example.com"), "fact_checker"),
        )
        .await
        .unwrap();
        UserNewsRepo::assign(&pool, news.id, u.id, None).await.unwrap();
    }

    let window_start = Utc::now() - Duration::minutes(115);
    let stale = NewsRepo::stale(&pool, window_start, 4, 100).await.unwrap();
    assert!(stale.iter().all(|n| n.id != news.id));
}

// ---------------------------------------------------------------------------
// Drafts and invitations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn mark_processed_is_single_shot(pool: PgPool) {
    let draft = NewsDraftRepo::create(&pool, &new_draft("https://example.com/d"))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert!(NewsDraftRepo::mark_processed(&mut tx, draft.id, "assigned")
        .await
        .unwrap());
    assert!(!NewsDraftRepo::mark_processed(&mut tx, draft.id, "duplicate")
        .await
        .unwrap());
    tx.commit().await.unwrap();

    assert!(NewsDraftRepo::oldest_unprocessed(&pool, 10)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn oldest_unprocessed_orders_by_reported_at(pool: PgPool) {
    let mut newer = new_draft("https://example.com/newer");
    newer.reported_at = Utc::now();
    let mut older = new_draft("https://example.com/older");
    older.reported_at = Utc::now() - Duration::hours(2);

    NewsDraftRepo::create(&pool, &newer).await.unwrap();
    NewsDraftRepo::create(&pool, &older).await.unwrap();

    let drafts = NewsDraftRepo::oldest_unprocessed(&pool, 1).await.unwrap();
    assert_eq!(drafts[0].url, "https://example.com/older");
}

#[sqlx::test(migrations = "./migrations")]
async fn invitation_lifecycle(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let invitation = InvitationRepo::create(&mut tx, "new@example.com", "tok-123", "fact_checker")
        .await
        .unwrap();
    InvitationRepo::mark_sent(&mut tx, invitation.id, Utc::now().date_naive())
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let found = InvitationRepo::find_waiting_by_token(&pool, "tok-123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.email, "new@example.com");
    assert!(found.sent_at.is_some());

    assert!(InvitationRepo::mark_used(&pool, found.id).await.unwrap());
    assert!(InvitationRepo::find_waiting_by_token(&pool, "tok-123")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn invitation_rollback_leaves_no_row(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    InvitationRepo::create(&mut tx, "gone@example.com", "tok-xyz", "fact_checker")
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert!(InvitationRepo::find_waiting_by_token(&pool, "tok-xyz")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Keywords and tags
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn sensitive_keywords_attach_by_name(pool: PgPool) {
    SensitiveKeywordRepo::create(&pool, "  Vaccine ").await.unwrap();
    SensitiveKeywordRepo::create(&pool, "election").await.unwrap();
    let news = materialize_news(&pool, "https://example.com/n").await;

    let mut tx = pool.begin().await.unwrap();
    let attached = SensitiveKeywordRepo::attach_to_news(&mut tx, news.id, &["vaccine"])
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(attached, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn set_news_tags_replaces_previous_set(pool: PgPool) {
    let news = materialize_news(&pool, "https://example.com/n").await;
    let a = TagRepo::create_or_get(&pool, "health").await.unwrap();
    let b = TagRepo::create_or_get(&pool, "politics").await.unwrap();

    TagRepo::set_news_tags(&pool, news.id, &[a.id]).await.unwrap();
    TagRepo::set_news_tags(&pool, news.id, &[b.id]).await.unwrap();

    let tags = TagRepo::tags_for_news(&pool, news.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "politics");
}

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn set_news_domains_replaces_previous_set(pool: PgPool) {
    let news = materialize_news(&pool, "https://example.com/n").await;
    let health = DomainRepo::create(&pool, "health").await.unwrap();
    let politics = DomainRepo::create(&pool, "politics").await.unwrap();

    DomainRepo::set_news_domains(&pool, news.id, &[health.id])
        .await
        .unwrap();
    DomainRepo::set_news_domains(&pool, news.id, &[politics.id])
        .await
        .unwrap();

    let domains = DomainRepo::domains_for_news(&pool, news.id).await.unwrap();
    assert_eq!(domains.len(), 1);
    assert_eq!(domains[0].name, "politics");

    DomainRepo::set_news_domains(&pool, news.id, &[]).await.unwrap();
    assert!(DomainRepo::domains_for_news(&pool, news.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_in_domain_returns_only_tagged_news(pool: PgPool) {
    let health = DomainRepo::create(&pool, "health").await.unwrap();
    let tagged = materialize_news(&pool, "https://example.com/tagged").await;
    let _untagged = materialize_news(&pool, "https://example.com/other").await;

    DomainRepo::set_news_domains(&pool, tagged.id, &[health.id])
        .await
        .unwrap();

    let listed = NewsRepo::list_in_domain(&pool, health.id, 50, 0).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, tagged.id);
}
