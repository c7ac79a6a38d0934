//! Integration tests for the draft batch and stale-news processors.

use chrono::Utc;
use sqlx::PgPool;
use veritas_core::assignment::AssignmentPolicy;
use veritas_core::types::DbId;
use veritas_db::models::news_draft::CreateNewsDraft;
use veritas_db::models::user::CreateUser;
use veritas_db::repositories::{NewsDraftRepo, SensitiveKeywordRepo, UserNewsRepo, UserRepo};
use veritas_worker::{DraftBatchProcessor, StaleNewsProcessor};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn policy() -> AssignmentPolicy {
    AssignmentPolicy::default()
}

fn new_user(email: &str, role: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        name: email.split('@').next().unwrap().to_string(),
        password_hash: "$argon2id$stub".to_string(),
        role: role.to_string(),
    }
}

fn new_draft(url: &str, text: &str) -> CreateNewsDraft {
    CreateNewsDraft {
        url: url.to_string(),
        screenshot_url: String::new(),
        reporter_email: "reporter@example.com".to_string(),
        text: text.to_string(),
        comment: String::new(),
        origin: "plugin".to_string(),
        reported_at: Utc::now(),
    }
}

async fn seed_fact_checkers(pool: &PgPool, count: usize) -> Vec<DbId> {
    let mut ids = Vec::with_capacity(count);
    for n in 0..count {
        let user = UserRepo::create(pool, &new_user(&format!("fc{n}@example.com"), "fact_checker"))
            .await
            .unwrap();
        ids.push(user.id);
    }
    ids
}

fn draft_processor(pool: &PgPool) -> DraftBatchProcessor {
    DraftBatchProcessor::new(pool.clone(), pool.clone(), policy(), None)
}

async fn news_id_by_url(pool: &PgPool, url: &str) -> DbId {
    let (id,): (DbId,) = sqlx::query_as("SELECT id FROM news WHERE url = $1")
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap();
    id
}

async fn assignment_count(pool: &PgPool, news_id: DbId) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_news WHERE news_id = $1")
        .bind(news_id)
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

// ---------------------------------------------------------------------------
// Draft batch processing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn draft_is_materialized_and_assigned_to_target_checkers(pool: PgPool) {
    seed_fact_checkers(&pool, 5).await;
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/claim", "a claim"))
        .await
        .unwrap();

    let processed = draft_processor(&pool).process_batch().await.unwrap();
    assert_eq!(processed, 1);

    let news_id = news_id_by_url(&pool, "https://example.com/claim").await;
    assert_eq!(assignment_count(&pool, news_id).await, 4);

    let remaining = NewsDraftRepo::oldest_unprocessed(&pool, 10).await.unwrap();
    assert!(remaining.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn batch_size_caps_drafts_per_run(pool: PgPool) {
    // 12 active checkers at target 4 gives a batch of 3.
    seed_fact_checkers(&pool, 12).await;
    for n in 0..5 {
        NewsDraftRepo::create(&pool, &new_draft(&format!("https://example.com/{n}"), "claim"))
            .await
            .unwrap();
    }

    let processed = draft_processor(&pool).process_batch().await.unwrap();
    assert_eq!(processed, 3);

    let remaining = NewsDraftRepo::oldest_unprocessed(&pool, 10).await.unwrap();
    assert_eq!(remaining.len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn no_active_checkers_leaves_drafts_untouched(pool: PgPool) {
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/claim", "claim"))
        .await
        .unwrap();

    let processed = draft_processor(&pool).process_batch().await.unwrap();
    assert_eq!(processed, 0);

    let remaining = NewsDraftRepo::oldest_unprocessed(&pool, 10).await.unwrap();
    assert_eq!(remaining.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_url_is_marked_without_a_second_news_row(pool: PgPool) {
    seed_fact_checkers(&pool, 4).await;
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/claim", "first report"))
        .await
        .unwrap();
    draft_processor(&pool).process_batch().await.unwrap();

    NewsDraftRepo::create(&pool, &new_draft("https://example.com/claim", "second report"))
        .await
        .unwrap();
    let processed = draft_processor(&pool).process_batch().await.unwrap();
    assert_eq!(processed, 1);

    let (news_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM news WHERE url = $1")
        .bind("https://example.com/claim")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(news_rows, 1);

    let (result,): (Option<String>,) = sqlx::query_as(
        "SELECT processing_result FROM news_drafts ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(result.as_deref(), Some("duplicate"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sensitive_keyword_hit_flags_the_news(pool: PgPool) {
    seed_fact_checkers(&pool, 4).await;
    SensitiveKeywordRepo::create(&pool, "vaccine").await.unwrap();
    NewsDraftRepo::create(
        &pool,
        &new_draft("https://example.com/claim", "new VACCINE scare"),
    )
    .await
    .unwrap();

    draft_processor(&pool).process_batch().await.unwrap();

    let news_id = news_id_by_url(&pool, "https://example.com/claim").await;
    let (is_sensitive,): (bool,) = sqlx::query_as("SELECT is_sensitive FROM news WHERE id = $1")
        .bind(news_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(is_sensitive);

    let (linked,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM news_sensitive_keywords WHERE news_id = $1")
            .bind(news_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(linked, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn assignments_spread_across_the_least_loaded_checkers(pool: PgPool) {
    // Eight checkers, two drafts at target 4: nobody should be assigned
    // twice while an idle checker remains.
    seed_fact_checkers(&pool, 8).await;
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/one", "claim one"))
        .await
        .unwrap();
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/two", "claim two"))
        .await
        .unwrap();

    let processed = draft_processor(&pool).process_batch().await.unwrap();
    assert_eq!(processed, 2);

    let (max_load,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(MAX(cnt), 0) FROM
             (SELECT COUNT(*) AS cnt FROM user_news GROUP BY user_id) loads",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(max_load, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn one_bad_draft_does_not_sink_the_batch(pool: PgPool) {
    seed_fact_checkers(&pool, 12).await;
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/good-1", "claim"))
        .await
        .unwrap();
    // Drafts are raw intake; origin is only checked when the news row
    // is materialized, so this one fails mid-batch.
    let mut bad = new_draft("https://example.com/bad", "claim");
    bad.origin = "carrier_pigeon".to_string();
    NewsDraftRepo::create(&pool, &bad).await.unwrap();
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/good-2", "claim"))
        .await
        .unwrap();

    let processed = draft_processor(&pool).process_batch().await.unwrap();
    assert_eq!(processed, 2);

    let remaining = NewsDraftRepo::oldest_unprocessed(&pool, 10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].url, "https://example.com/bad");

    for url in ["https://example.com/good-1", "https://example.com/good-2"] {
        let news_id = news_id_by_url(&pool, url).await;
        assert_eq!(assignment_count(&pool, news_id).await, 4);
    }
}

// ---------------------------------------------------------------------------
// Stale news top-up
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn stale_news_is_topped_up_to_the_target(pool: PgPool) {
    let checkers = seed_fact_checkers(&pool, 6).await;
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/claim", "claim"))
        .await
        .unwrap();
    // Materialize by hand with only two of the six checkers assigned.
    let draft = NewsDraftRepo::oldest_unprocessed(&pool, 1).await.unwrap();
    let mut tx = pool.begin().await.unwrap();
    let news = veritas_db::repositories::NewsRepo::create_from_draft(&mut tx, &draft[0])
        .await
        .unwrap();
    UserNewsRepo::assign_many(&mut tx, news.id, &checkers[..2], None)
        .await
        .unwrap();
    NewsDraftRepo::mark_processed(&mut tx, draft[0].id, "assigned")
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let topped_up = StaleNewsProcessor::new(pool.clone(), policy(), 50, None)
        .process()
        .await
        .unwrap();
    assert_eq!(topped_up, 1);
    assert_eq!(assignment_count(&pool, news.id).await, 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn top_up_never_duplicates_an_existing_assignment(pool: PgPool) {
    let checkers = seed_fact_checkers(&pool, 4).await;
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/claim", "claim"))
        .await
        .unwrap();
    let draft = NewsDraftRepo::oldest_unprocessed(&pool, 1).await.unwrap();
    let mut tx = pool.begin().await.unwrap();
    let news = veritas_db::repositories::NewsRepo::create_from_draft(&mut tx, &draft[0])
        .await
        .unwrap();
    UserNewsRepo::assign_many(&mut tx, news.id, &checkers[..3], None)
        .await
        .unwrap();
    NewsDraftRepo::mark_processed(&mut tx, draft[0].id, "assigned")
        .await
        .unwrap();
    tx.commit().await.unwrap();

    StaleNewsProcessor::new(pool.clone(), policy(), 50, None)
        .process()
        .await
        .unwrap();

    assert_eq!(assignment_count(&pool, news.id).await, 4);
    let (distinct,): (i64,) =
        sqlx::query_as("SELECT COUNT(DISTINCT user_id) FROM user_news WHERE news_id = $1")
            .bind(news.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(distinct, 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn fully_assigned_news_is_left_alone(pool: PgPool) {
    seed_fact_checkers(&pool, 4).await;
    NewsDraftRepo::create(&pool, &new_draft("https://example.com/claim", "claim"))
        .await
        .unwrap();
    draft_processor(&pool).process_batch().await.unwrap();

    let topped_up = StaleNewsProcessor::new(pool.clone(), policy(), 50, None)
        .process()
        .await
        .unwrap();
    assert_eq!(topped_up, 0);

    let news_id = news_id_by_url(&pool, "https://example.com/claim").await;
    assert_eq!(assignment_count(&pool, news_id).await, 4);
}
