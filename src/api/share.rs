use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::types::{ShareCreateRequest, ShareCreateResponse, ShareQuery, ShareViewResponse};
use super::{ApiError, ApiResponse, AppState};
use crate::db::PrFilter;
use crate::db::repositories::share_link::generate_token;

/// Validity window for a share link.
const SHARE_TTL_DAYS: i64 = 7;

/// POST /api/share
/// Mint a capability token for the current user's board. Anyone holding
/// the returned URL can read the board until the link expires.
pub async fn create_share(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<ShareCreateRequest>,
) -> Result<Json<ApiResponse<ShareCreateResponse>>, ApiError> {
    let default_title = format!("{}'s PR Board", current.name);
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(&default_title);

    let token = generate_token();

    let link = state
        .store()
        .create_share_link(&token, current.id, title, SHARE_TTL_DAYS)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let public_url = state.config().await.server.public_url;
    let share_url = format!("{}/shared?token={}", public_url.trim_end_matches('/'), token);

    tracing::info!(user_id = current.id, "Share link created");

    Ok(Json(ApiResponse::success(ShareCreateResponse {
        share_url,
        token: link.token,
        expires_at: link.expires_at,
    })))
}

/// GET /api/share?token=
/// Public resolution. Missing, deactivated and expired tokens are
/// indistinguishable; each successful read bumps the access counter.
pub async fn resolve_share(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShareQuery>,
) -> Result<Json<ApiResponse<ShareViewResponse>>, ApiError> {
    let token = query
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::validation("Share token is required"))?;

    let link = state
        .store()
        .find_valid_share_link(token)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Share link not found or expired"))?;

    state
        .store()
        .record_share_access(token)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let created_by = state
        .store()
        .get_user_by_id(link.user_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .map_or_else(|| "Unknown".to_string(), |u| u.name);

    let prs = state
        .store()
        .list_prs(link.user_id, &PrFilter::default())
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(ApiResponse::success(ShareViewResponse {
        title: link.title,
        created_by,
        created_at: link.created_at,
        prs,
        access_count: link.access_count + 1,
    })))
}
