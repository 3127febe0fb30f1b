use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::types::{
    CreateWorkspaceRequest, DeleteWorkspaceQuery, WorkspaceDto, WorkspaceListQuery,
    WorkspaceListResponse, WorkspaceResponse,
};
use super::{ApiError, ApiResponse, AppState};

/// GET /api/workspaces?type=
pub async fn list_workspaces(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<WorkspaceListQuery>,
) -> Result<Json<ApiResponse<WorkspaceListResponse>>, ApiError> {
    let items = state
        .store()
        .list_workspaces(current.id, query.ws_type)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .into_iter()
        .map(WorkspaceDto::from)
        .collect();

    Ok(Json(ApiResponse::success(WorkspaceListResponse { items })))
}

/// POST /api/workspaces
/// Duplicate (owner, type, name) triples are rejected with a 409.
pub async fn create_workspace(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkspaceResponse>>), ApiError> {
    let ws_type = payload
        .ws_type
        .ok_or_else(|| ApiError::validation("Workspace type is required"))?;
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("Workspace name is required"))?;

    let workspace = state
        .store()
        .create_workspace(current.id, ws_type, name)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::conflict("Workspace already exists"))?;

    tracing::info!(
        user_id = current.id,
        workspace = %workspace.name,
        workspace_type = workspace.ws_type.as_str(),
        "Workspace created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(WorkspaceResponse {
            item: WorkspaceDto::from(workspace),
        })),
    ))
}

/// DELETE /api/workspaces?type=&name=
/// Refused while any of the owner's PRs still reference the name under
/// the matching category.
pub async fn delete_workspace(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<DeleteWorkspaceQuery>,
) -> Result<StatusCode, ApiError> {
    let ws_type = query
        .ws_type
        .ok_or_else(|| ApiError::validation("Workspace type is required"))?;
    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("Workspace name is required"))?;

    let in_use = state
        .store()
        .count_prs_referencing(current.id, ws_type, name)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if in_use > 0 {
        return Err(ApiError::conflict(format!(
            "Workspace is referenced by {in_use} PR(s)"
        )));
    }

    let removed = state
        .store()
        .delete_workspace(current.id, ws_type, name)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if !removed {
        return Err(ApiError::not_found("Workspace not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
