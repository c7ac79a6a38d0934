//! Opinion submission and admin edits.
//!
//! Submitting an opinion may push a news item over the verdict line;
//! when it does, the `new_verdict` event is dispatched after the row is
//! committed. Admin edits always dispatch `edit_verdict` because an
//! edit can change an already published judgment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use veritas_core::error::CoreError;
use veritas_core::opinion::{OpinionInput, OpinionKind};
use veritas_core::roles::UserRole;
use veritas_core::types::DbId;
use veritas_core::verdict::{is_with_verdict, OpinionFacts};
use veritas_db::models::news::News;
use veritas_db::models::opinion::{CreateOpinion, Opinion};
use veritas_db::repositories::{NewsRepo, OpinionRepo, UserNewsRepo};
use veritas_events::{NewsEvent, NewsVerdictContext};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireJudge};
use crate::response::DataResponse;
use crate::state::AppState;

/// Split stored opinions into the expert one and the fact-checker facts.
pub(crate) fn split_facts(opinions: &[Opinion]) -> (Option<OpinionFacts>, Vec<OpinionFacts>) {
    let expert = opinions.iter().find(|o| o.is_expert()).map(Opinion::facts);
    let checkers = opinions
        .iter()
        .filter(|o| !o.is_expert())
        .map(Opinion::facts)
        .collect();
    (expert, checkers)
}

async fn load_news(state: &AppState, news_id: DbId) -> AppResult<News> {
    NewsRepo::find_by_id(&state.pool, news_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }))
}

/// POST /api/v1/news/{id}/opinions
///
/// Leave an opinion on a news item. The judge's role decides the
/// opinion kind: fact checkers submit fact-checker opinions and must be
/// assigned to the item; expert-class roles submit the single expert
/// opinion and may judge any item.
pub async fn leave_opinion(
    RequireJudge(user): RequireJudge,
    State(state): State<AppState>,
    Path(news_id): Path<DbId>,
    Json(input): Json<OpinionInput>,
) -> AppResult<impl IntoResponse> {
    let Some(kind) = user.role.opinion_kind() else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Judging role required".into(),
        )));
    };

    let news = load_news(&state, news_id).await?;

    if user.role == UserRole::FactChecker
        && UserNewsRepo::find(&state.pool, news_id, user.user_id)
            .await?
            .is_none()
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "This news item is not assigned to you".into(),
        )));
    }

    let fields = input.validate()?;
    let opinion = OpinionRepo::create(
        &state.pool,
        &CreateOpinion {
            news_id,
            judge_id: user.user_id,
            kind: kind.as_str().to_string(),
            fields,
        },
    )
    .await?;

    let opinions = OpinionRepo::list_for_news(&state.pool, news_id).await?;
    let (expert, checkers) = split_facts(&opinions);
    if is_with_verdict(expert.as_ref(), &checkers) {
        state
            .dispatcher
            .dispatch(
                NewsEvent::NewVerdict,
                &NewsVerdictContext {
                    news_id,
                    reporter_email: news.reporter_email.clone(),
                    verdicted_by_expert: kind == OpinionKind::Expert,
                },
            )
            .await;
    }

    tracing::info!(
        news_id = %news_id,
        judge_id = %user.user_id,
        kind = kind.as_str(),
        "Opinion recorded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: opinion })))
}

/// PATCH /api/v1/opinions/{id}
///
/// Rewrite an opinion. Admin only. The whole judgment field group is
/// replaced, and `edit_verdict` is dispatched unconditionally.
pub async fn update_opinion(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(opinion_id): Path<DbId>,
    Json(input): Json<OpinionInput>,
) -> AppResult<impl IntoResponse> {
    let existing = OpinionRepo::find_by_id(&state.pool, opinion_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Opinion",
            id: opinion_id,
        }))?;

    let fields = input.validate()?;
    let updated = OpinionRepo::update_fields(&state.pool, opinion_id, &fields)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Opinion",
            id: opinion_id,
        }))?;

    let news = load_news(&state, existing.news_id).await?;
    state
        .dispatcher
        .dispatch(
            NewsEvent::EditVerdict,
            &NewsVerdictContext {
                news_id: news.id,
                reporter_email: news.reporter_email,
                verdicted_by_expert: existing.is_expert(),
            },
        )
        .await;

    tracing::info!(
        opinion_id = %opinion_id,
        admin_id = %admin.user_id,
        "Opinion rewritten by admin"
    );

    Ok(Json(DataResponse { data: updated }))
}
