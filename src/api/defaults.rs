use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::types::{DefaultsDto, DefaultsResponse, UpdateDefaultsRequest};
use super::{ApiError, ApiResponse, AppState};
use crate::db::DefaultsUpdate;

/// GET /api/defaults
/// Public read of the shared form-prefill document. Reads as empty when
/// nothing has been stored yet.
pub async fn get_defaults(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DefaultsResponse>>, ApiError> {
    let doc = state
        .store()
        .get_defaults()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(ApiResponse::success(DefaultsResponse {
        defaults: DefaultsDto::from(doc),
    })))
}

/// POST /api/defaults
/// Merge the provided fields into the single shared document; absent
/// fields keep their stored values.
pub async fn update_defaults(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateDefaultsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DefaultsResponse>>), ApiError> {
    let update = DefaultsUpdate {
        default_project: payload.default_project,
        default_service: payload.default_service,
        default_email: payload.default_email,
        default_author: payload.default_author,
    };

    let doc = state
        .store()
        .upsert_defaults(update)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(DefaultsResponse {
            defaults: DefaultsDto::from(doc),
        })),
    ))
}
