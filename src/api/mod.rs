use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
pub mod defaults;
mod error;
pub mod prs;
pub mod share;
mod types;
pub mod workspaces;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn config_handle(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    pub async fn config(&self) -> Config {
        self.shared.config().await
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn tokens(&self) -> &crate::services::TokenService {
        &self.shared.tokens
    }

    #[must_use]
    pub fn pr_cache(&self) -> &crate::services::ListCache {
        &self.shared.pr_cache
    }
}

pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config_handle().read().await;
        config.server.cors_allowed_origins.clone()
    };

    // Every handler that requires a session declares the `CurrentUser`
    // extractor; the remaining routes are deliberately public (auth entry
    // points, the read side of defaults, and share-link resolution).
    let api_router = Router::new()
        .route(
            "/auth",
            post(auth::authenticate)
                .get(auth::get_current_user)
                .patch(auth::update_preferences)
                .delete(auth::logout),
        )
        .route(
            "/prs",
            get(prs::list_prs)
                .post(prs::create_pr)
                .patch(prs::update_pr)
                .delete(prs::delete_pr),
        )
        .route(
            "/workspaces",
            get(workspaces::list_workspaces)
                .post(workspaces::create_workspace)
                .delete(workspaces::delete_workspace),
        )
        .route(
            "/defaults",
            get(defaults::get_defaults).post(defaults::update_defaults),
        )
        .route(
            "/share",
            post(share::create_share).get(share::resolve_share),
        )
        .route("/health", get(health))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

async fn health(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<axum::Json<ApiResponse<HealthResponse>>, ApiError> {
    state
        .store()
        .ping()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(axum::Json(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })))
}
