use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::types::{CreatePrRequest, DeletePrQuery, PrListQuery, PrListResponse, PrResponse, UpdatePrRequest};
use super::{ApiError, ApiResponse, AppState};
use crate::db::{NewPr, PrFilter, PrUpdate};
use crate::models::Category;

/// GET /api/prs?project=&status=
/// Owner-scoped listing, newest-updated first. Served from the list cache
/// when the exact filter combination was fetched recently.
pub async fn list_prs(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<PrListQuery>,
) -> Result<Json<ApiResponse<PrListResponse>>, ApiError> {
    let filter = PrFilter {
        project: query.project,
        status: query.status,
    };
    let key = filter.signature(current.id);

    if let Some(prs) = state.pr_cache().get(&key).await {
        tracing::debug!(user_id = current.id, "PR list served from cache");
        return Ok(Json(ApiResponse::success(PrListResponse { prs })));
    }

    let prs = state
        .store()
        .list_prs(current.id, &filter)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    state.pr_cache().put(key, prs.clone()).await;

    Ok(Json(ApiResponse::success(PrListResponse { prs })))
}

/// POST /api/prs
/// Create a PR owned by the current user. Status always starts at
/// `initial` regardless of the payload.
pub async fn create_pr(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<CreatePrRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PrResponse>>), ApiError> {
    validate_create(&payload)?;

    let input = NewPr {
        title: payload.title.trim().to_string(),
        category: payload.category,
        project: payload.project.filter(|p| !p.trim().is_empty()),
        service: payload.service.filter(|s| !s.trim().is_empty()),
        author: payload.author.trim().to_string(),
        description: payload.description,
        priority: payload.priority,
        links: payload.links,
        scheduled_date: payload.scheduled_date,
        scheduled_time: payload.scheduled_time,
        email_reminder: payload.email_reminder,
        calendar_event: payload.calendar_event,
    };

    let pr = state
        .store()
        .create_pr(current.id, input)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    // Invalidate before responding so a follow-up list never sees a
    // pre-write snapshot.
    state.pr_cache().clear().await;

    tracing::info!(user_id = current.id, pr_id = pr.id, "PR created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PrResponse { pr })),
    ))
}

fn validate_create(payload: &CreatePrRequest) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if payload.author.trim().is_empty() {
        return Err(ApiError::validation("Author is required"));
    }

    // The workspace field matching the category must be present.
    match payload.category {
        Category::Project => {
            if payload.project.as_deref().is_none_or(|p| p.trim().is_empty()) {
                return Err(ApiError::validation(
                    "Project is required for project PRs",
                ));
            }
        }
        Category::Service => {
            if payload.service.as_deref().is_none_or(|s| s.trim().is_empty()) {
                return Err(ApiError::validation(
                    "Service is required for service PRs",
                ));
            }
        }
    }

    Ok(())
}

/// PATCH /api/prs
/// Partial update, scoped to the owner. A PR owned by someone else is
/// reported as missing.
pub async fn update_pr(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<UpdatePrRequest>,
) -> Result<Json<ApiResponse<PrResponse>>, ApiError> {
    let update = PrUpdate {
        title: payload.title,
        category: payload.category,
        project: payload.project,
        service: payload.service,
        author: payload.author,
        description: payload.description,
        status: payload.status,
        priority: payload.priority,
        links: payload.links,
        scheduled_date: payload.scheduled_date,
        scheduled_time: payload.scheduled_time,
        email_reminder: payload.email_reminder,
        calendar_event: payload.calendar_event,
    };

    let pr = state
        .store()
        .update_pr(current.id, payload.id, update)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("PR not found"))?;

    state.pr_cache().clear().await;

    Ok(Json(ApiResponse::success(PrResponse { pr })))
}

/// DELETE /api/prs?id=
pub async fn delete_pr(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<DeletePrQuery>,
) -> Result<StatusCode, ApiError> {
    let id = query
        .id
        .ok_or_else(|| ApiError::validation("PR id is required"))?;

    let removed = state
        .store()
        .delete_pr(current.id, id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if !removed {
        return Err(ApiError::not_found("PR not found"));
    }

    state.pr_cache().clear().await;

    tracing::info!(user_id = current.id, pr_id = id, "PR deleted");

    Ok(StatusCode::NO_CONTENT)
}
