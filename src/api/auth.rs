use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use super::types::{AuthAction, AuthRequest, AuthResponse, MessageResponse, PreferencesRequest, UserDto};
use crate::db::User;

/// Name of the HTTP-only session cookie.
pub const SESSION_COOKIE: &str = "auth-token";

// ============================================================================
// Session extraction
// ============================================================================

/// Authenticated identity extracted from the session cookie. A minimal
/// projection of the user record; the password hash never leaves the
/// repository layer.
///
/// Use as an extractor parameter in any handler that requires a session:
/// verification failures, missing cookies, and deleted accounts all reject
/// with a 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_cookie(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let claims = state.tokens().verify(&token).map_err(|e| {
            tracing::debug!("Session token rejected: {e}");
            ApiError::unauthorized("Invalid or expired token")
        })?;

        // A valid token for a deleted account is still a rejection.
        let user = state
            .store()
            .get_user_by_id(claims.sub)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to load user: {e}")))?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(Self {
            id: user.id,
            email: user.email,
            name: user.name,
        })
    }
}

/// Pull the session token out of the `Cookie` header, if present.
fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Build the `Set-Cookie` value for a freshly issued session token.
fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_seconds}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth
/// Login or signup, selected by the `action` field. Sets the session
/// cookie on success.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AuthRequest>,
) -> Result<Response, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    match payload.action {
        AuthAction::Signup => signup(&state, &payload).await,
        AuthAction::Login => login(&state, &payload).await,
    }
}

async fn signup(state: &Arc<AppState>, payload: &AuthRequest) -> Result<Response, ApiError> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("Name is required for signup"))?;

    if payload.password.len() < 6 {
        return Err(ApiError::validation("Password must be at least 6 characters"));
    }

    let auth_config = state.config().await.auth;

    let user = state
        .store()
        .create_user(&payload.email, &payload.password, name, &auth_config)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create user: {e}")))?
        .ok_or_else(|| ApiError::conflict("User already exists with this email"))?;

    tracing::info!(user_id = user.id, "New account created");
    session_response(state, user, StatusCode::CREATED).await
}

async fn login(state: &Arc<AppState>, payload: &AuthRequest) -> Result<Response, ApiError> {
    let user = state
        .store()
        .verify_user_password(&payload.email, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    state
        .store()
        .touch_last_login(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to record login: {e}")))?;

    session_response(state, user, StatusCode::OK).await
}

async fn session_response(
    state: &Arc<AppState>,
    user: User,
    status: StatusCode,
) -> Result<Response, ApiError> {
    let config = state.config().await;

    let token = state
        .tokens()
        .issue(&user)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    let cookie = session_cookie(
        &token,
        config.auth.token_ttl_days * 24 * 60 * 60,
        config.server.secure_cookies,
    );

    let body = Json(ApiResponse::success(AuthResponse {
        user: UserDto::from(user),
    }));

    Ok((status, [(header::SET_COOKIE, cookie)], body).into_response())
}

/// GET /api/auth
/// Return the current user for a valid session.
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let user = state
        .store()
        .get_user_by_id(current.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load user: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

    Ok(Json(ApiResponse::success(AuthResponse {
        user: UserDto::from(user),
    })))
}

/// PATCH /api/auth
/// Merge preference changes into the current user.
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<PreferencesRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if let Some(theme) = payload.theme.as_deref()
        && !matches!(theme, "light" | "dark" | "system")
    {
        return Err(ApiError::validation("Theme must be light, dark or system"));
    }

    let user = state
        .store()
        .update_user_preferences(
            current.id,
            payload.theme.as_deref(),
            payload.email_notifications,
            payload.calendar_integration,
        )
        .await
        .map_err(|e| ApiError::internal(format!("Failed to update preferences: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

    Ok(Json(ApiResponse::success(AuthResponse {
        user: UserDto::from(user),
    })))
}

/// DELETE /api/auth
/// Logout: clear the session cookie. The token itself stays valid until
/// expiry; there is no server-side revocation.
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let secure = state.config().await.server.secure_cookies;
    let cookie = session_cookie("", 0, secure);

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success(MessageResponse {
            message: "Logged out successfully".to_string(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_extraction_finds_token_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth-token=abc123; other=1"),
        );

        assert_eq!(extract_session_cookie(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn cookie_extraction_handles_absence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));

        assert_eq!(extract_session_cookie(&headers), None);
        assert_eq!(extract_session_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn session_cookie_carries_hardening_flags() {
        let cookie = session_cookie("tok", 604_800, true);

        assert!(cookie.starts_with("auth-token=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.ends_with("Secure"));

        let dev_cookie = session_cookie("tok", 604_800, false);
        assert!(!dev_cookie.contains("Secure"));
    }
}
