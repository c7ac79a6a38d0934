//! News listing, moderation, assignment and publication endpoints.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use veritas_core::error::CoreError;
use veritas_core::keywords::MAX_TAGS_PER_NEWS;
use veritas_core::roles::UserRole;
use veritas_core::types::{DbId, Timestamp};
use veritas_core::verdict::{current_verdict, is_duplicate, is_spam, is_with_verdict, verdict_status};
use veritas_db::models::keyword::Keyword;
use veritas_db::models::news::{News, UpdateNews};
use veritas_db::models::opinion::Opinion;
use veritas_db::repositories::{DomainRepo, NewsRepo, OpinionRepo, TagRepo, UserNewsRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::opinions::split_facts;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireCrew};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// News item enriched with its computed verdict and the coarse
/// confirmation status (`awaiting` while opinions trickle in).
#[derive(Debug, Serialize)]
pub struct NewsWithVerdict {
    #[serde(flatten)]
    pub news: News,
    pub current_verdict: &'static str,
    pub verdict_status: &'static str,
}

/// Queue entry for a fact checker's own assignments.
#[derive(Debug, Serialize)]
pub struct AssignedNews {
    #[serde(flatten)]
    pub news: News,
    pub current_verdict: &'static str,
    pub assigned_at: Timestamp,
    pub is_opined: bool,
}

/// Full detail view for reviewers.
#[derive(Debug, Serialize)]
pub struct NewsDetail {
    #[serde(flatten)]
    pub news: News,
    pub current_verdict: &'static str,
    pub verdict_status: &'static str,
    pub opinions: Vec<Opinion>,
    pub tags: Vec<Keyword>,
    pub domains: Vec<Keyword>,
}

/// Public feed entry. Carries no reporter data.
#[derive(Debug, Serialize)]
pub struct PublicNews {
    pub id: DbId,
    pub url: String,
    pub screenshot_url: String,
    pub text: String,
    pub is_pinned: bool,
    pub reported_at: Timestamp,
    pub current_verdict: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    fn limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let page = self.page.unwrap_or(1).max(1);
        (per_page, (page - 1) * per_page)
    }
}

async fn with_verdict(state: &AppState, news: News) -> AppResult<NewsWithVerdict> {
    let opinions = OpinionRepo::list_for_news(&state.pool, news.id).await?;
    let (expert, checkers) = split_facts(&opinions);
    Ok(NewsWithVerdict {
        news,
        current_verdict: current_verdict(expert.as_ref(), &checkers).as_str(),
        verdict_status: verdict_status(expert.as_ref(), &checkers).as_str(),
    })
}

// ---------------------------------------------------------------------------
// Listing and detail
// ---------------------------------------------------------------------------

/// GET /api/v1/news
///
/// Fact checkers see their assigned queue; crew and admins see
/// everything. Each item carries its computed verdict.
pub async fn list_news(
    user: AuthUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<axum::response::Response> {
    let items = match user.role {
        UserRole::FactChecker => {
            let items = NewsRepo::list_assigned_to(&state.pool, user.user_id).await?;
            let mut data = Vec::with_capacity(items.len());
            for news in items {
                let opinions = OpinionRepo::list_for_news(&state.pool, news.id).await?;
                let is_opined = opinions.iter().any(|o| o.judge_id == user.user_id);
                let (expert, checkers) = split_facts(&opinions);
                let assignment = UserNewsRepo::find(&state.pool, news.id, user.user_id)
                    .await?
                    .ok_or(AppError::Core(CoreError::NotFound {
                        entity: "Assignment",
                        id: news.id,
                    }))?;
                data.push(AssignedNews {
                    current_verdict: current_verdict(expert.as_ref(), &checkers).as_str(),
                    news,
                    assigned_at: assignment.created_at,
                    is_opined,
                });
            }
            return Ok(Json(DataResponse { data }).into_response());
        }
        UserRole::BaseUser => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Reviewer role required".into(),
            )))
        }
        // Specialists review only items tagged with their domain.
        UserRole::Specialist => {
            let record = UserRepo::find_by_id(&state.pool, user.user_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "User",
                    id: user.user_id,
                }))?;
            let Some(domain_id) = record.domain_id else {
                return Err(AppError::Core(CoreError::Forbidden(
                    "No domain is assigned to your account".into(),
                )));
            };
            let (limit, offset) = pagination.limit_offset();
            NewsRepo::list_in_domain(&state.pool, domain_id, limit, offset).await?
        }
        _ => {
            let (limit, offset) = pagination.limit_offset();
            NewsRepo::list(&state.pool, limit, offset).await?
        }
    };

    let mut data = Vec::with_capacity(items.len());
    for news in items {
        data.push(with_verdict(&state, news).await?);
    }
    Ok(Json(DataResponse { data }).into_response())
}

/// GET /api/v1/news/{id}
///
/// Full detail with opinions, tags and the computed verdict.
pub async fn get_news(
    user: AuthUser,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let news = NewsRepo::find_by_id(&state.pool, news_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }))?;

    if user.role == UserRole::BaseUser {
        return Err(AppError::Core(CoreError::Forbidden(
            "Reviewer role required".into(),
        )));
    }

    let opinions = OpinionRepo::list_for_news(&state.pool, news_id).await?;
    let (expert, checkers) = split_facts(&opinions);
    let tags = TagRepo::tags_for_news(&state.pool, news_id).await?;
    let domains = DomainRepo::domains_for_news(&state.pool, news_id).await?;

    Ok(Json(DataResponse {
        data: NewsDetail {
            current_verdict: current_verdict(expert.as_ref(), &checkers).as_str(),
            verdict_status: verdict_status(expert.as_ref(), &checkers).as_str(),
            news,
            opinions,
            tags,
            domains,
        },
    }))
}

/// GET /api/v1/news/published
///
/// Public verdict feed. Only published items that hold a final verdict
/// and are neither spam nor duplicates appear; the filter runs over
/// the computed opinion facts rather than a stored flag.
pub async fn list_published(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = pagination.limit_offset();
    let items = NewsRepo::list_published(&state.pool, limit, offset).await?;

    let mut data = Vec::new();
    for news in items {
        let opinions = OpinionRepo::list_for_news(&state.pool, news.id).await?;
        let (expert, checkers) = split_facts(&opinions);
        let expert = expert.as_ref();
        if !is_with_verdict(expert, &checkers)
            || is_spam(expert, &checkers)
            || is_duplicate(expert, &checkers)
        {
            continue;
        }
        data.push(PublicNews {
            id: news.id,
            url: news.url,
            screenshot_url: news.screenshot_url,
            text: news.text,
            is_pinned: news.is_pinned,
            reported_at: news.reported_at,
            current_verdict: current_verdict(expert, &checkers).as_str(),
        });
    }
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

/// PATCH /api/v1/news/{id}
///
/// Admin edit of a news item's content and flags.
pub async fn update_news(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
    Json(input): Json<UpdateNews>,
) -> AppResult<impl IntoResponse> {
    let news = NewsRepo::update(&state.pool, news_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }))?;

    tracing::info!(news_id = %news_id, admin_id = %admin.user_id, "News updated");

    Ok(Json(DataResponse { data: news }))
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub is_published: bool,
}

/// POST /api/v1/news/{id}/publish
///
/// Toggle publication. Publishing requires the item to hold a final
/// verdict; unpublishing is always allowed.
pub async fn publish_news(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
    Json(input): Json<PublishRequest>,
) -> AppResult<impl IntoResponse> {
    if input.is_published {
        let opinions = OpinionRepo::list_for_news(&state.pool, news_id).await?;
        let (expert, checkers) = split_facts(&opinions);
        if !is_with_verdict(expert.as_ref(), &checkers) {
            return Err(AppError::Core(CoreError::Validation(
                "Cannot publish a news item without a final verdict".into(),
            )));
        }
    }

    if !NewsRepo::set_published(&state.pool, news_id, input.is_published).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }));
    }

    tracing::info!(
        news_id = %news_id,
        admin_id = %admin.user_id,
        is_published = input.is_published,
        "Publication flag changed"
    );

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub is_pinned: bool,
}

/// POST /api/v1/news/{id}/pin
pub async fn pin_news(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
    Json(input): Json<PinRequest>,
) -> AppResult<impl IntoResponse> {
    if !NewsRepo::set_pinned(&state.pool, news_id, input.is_pinned).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub user_id: DbId,
}

/// POST /api/v1/news/{id}/assignment
///
/// Manually assign a fact checker. Crew only. The assignor's email is
/// recorded so a later dismissal can notify them.
pub async fn assign_news(
    RequireCrew(crew): RequireCrew,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<impl IntoResponse> {
    let target = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;
    if target.role != UserRole::FactChecker.as_str() {
        return Err(AppError::Core(CoreError::Validation(
            "Only fact checkers can receive assignments".into(),
        )));
    }

    let assignor = UserRepo::find_by_id(&state.pool, crew.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: crew.user_id,
        }))?;

    let assignment =
        UserNewsRepo::assign(&state.pool, news_id, input.user_id, Some(&assignor.email)).await?;

    tracing::info!(
        news_id = %news_id,
        user_id = %input.user_id,
        assigned_by = %crew.user_id,
        "Manual assignment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// DELETE /api/v1/news/{id}/assignment
///
/// Dismiss one's own assignment. If the assignment was made manually,
/// the assignor is emailed about the dismissal.
pub async fn dismiss_assignment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let assignment = UserNewsRepo::find(&state.pool, news_id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id: news_id,
        }))?;

    UserNewsRepo::delete(&state.pool, news_id, user.user_id).await?;
    tracing::info!(news_id = %news_id, user_id = %user.user_id, "Assignment dismissed");

    if let (Some(assignor_email), Some(mailer)) = (&assignment.assigned_by_email, &state.email) {
        let assignee = UserRepo::find_by_id(&state.pool, user.user_id).await?;
        let name = assignee.map(|u| u.name).unwrap_or_else(|| "A reviewer".to_string());
        mailer.send_assignment_rejection(assignor_email, &name).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Tags and screenshots
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SetTagsRequest {
    pub tags: Vec<String>,
}

/// PUT /api/v1/news/{id}/tags
///
/// Replace the item's tag set. Tags are created on first use.
pub async fn set_tags(
    RequireCrew(_crew): RequireCrew,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
    Json(input): Json<SetTagsRequest>,
) -> AppResult<impl IntoResponse> {
    if input.tags.len() > MAX_TAGS_PER_NEWS {
        return Err(AppError::Core(CoreError::Validation(format!(
            "A news item can have at most {MAX_TAGS_PER_NEWS} tags"
        ))));
    }
    NewsRepo::find_by_id(&state.pool, news_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }))?;

    let mut tag_ids = Vec::with_capacity(input.tags.len());
    for name in &input.tags {
        let tag = TagRepo::create_or_get(&state.pool, name).await?;
        if !tag_ids.contains(&tag.id) {
            tag_ids.push(tag.id);
        }
    }
    TagRepo::set_news_tags(&state.pool, news_id, &tag_ids).await?;

    let tags = TagRepo::tags_for_news(&state.pool, news_id).await?;
    Ok(Json(DataResponse { data: tags }))
}

#[derive(Debug, Deserialize)]
pub struct SetDomainsRequest {
    pub domain_ids: Vec<DbId>,
}

/// PUT /api/v1/news/{id}/domains
///
/// Replace the item's domain set. Admin only. Domains route news into
/// the matching specialists' queues.
pub async fn set_domains(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
    Json(input): Json<SetDomainsRequest>,
) -> AppResult<impl IntoResponse> {
    NewsRepo::find_by_id(&state.pool, news_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }))?;
    let mut domain_ids = Vec::with_capacity(input.domain_ids.len());
    for domain_id in input.domain_ids {
        DomainRepo::find_by_id(&state.pool, domain_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Domain",
                id: domain_id,
            }))?;
        if !domain_ids.contains(&domain_id) {
            domain_ids.push(domain_id);
        }
    }
    DomainRepo::set_news_domains(&state.pool, news_id, &domain_ids).await?;

    let domains = DomainRepo::domains_for_news(&state.pool, news_id).await?;
    Ok(Json(DataResponse { data: domains }))
}

/// POST /api/v1/news/{id}/screenshot
///
/// Upload a screenshot for a news item. The file goes to S3 and the
/// resulting URL is stored on the item.
pub async fn upload_screenshot(
    RequireCrew(_crew): RequireCrew,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let Some(storage) = &state.storage else {
        return Err(AppError::InternalError(
            "Screenshot storage is not configured".into(),
        ));
    };
    NewsRepo::find_by_id(&state.pool, news_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }))?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("Missing file field".into()))?;

    let content_type = field
        .content_type()
        .ok_or_else(|| AppError::BadRequest("Missing file content type".into()))?
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

    let url = storage
        .upload_screenshot(news_id, &content_type, bytes.to_vec())
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    NewsRepo::set_screenshot_url(&state.pool, news_id, &url).await?;

    Ok(Json(DataResponse { data: url }))
}
