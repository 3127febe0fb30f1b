use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;

use crate::api::{
    ApiResponse, AuthAction, AuthRequest, AuthResponse, CreatePrRequest, CreateWorkspaceRequest,
    DefaultsResponse, HealthResponse, PreferencesRequest, PrListResponse, PrResponse,
    ShareCreateRequest, ShareCreateResponse, ShareViewResponse, UpdateDefaultsRequest,
    UpdatePrRequest, UserDto, WorkspaceListResponse, WorkspaceResponse,
};
use crate::db::PrFilter;
use crate::models::Category;

const SESSION_COOKIE: &str = "auth-token";

/// Typed client for the dashboard API. Carries the session token
/// explicitly rather than in a cookie jar so a CLI process can persist it
/// between invocations.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("prboard/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Current session token, if authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        builder
    }

    /// Unwrap the response envelope, surfacing the server's error message
    /// on failure.
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.context("Failed to read response")?;

        if status == StatusCode::NO_CONTENT {
            bail!("Endpoint returned no content; use parse_empty");
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .with_context(|| format!("Unexpected response ({status}): {body}"))?;

        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| format!("Request failed with status {status}"));
            bail!("{message}");
        }

        envelope
            .data
            .context("Server reported success without a payload")
    }

    async fn parse_empty(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiResponse<()>>(&body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        bail!("{message}");
    }

    fn capture_session(&mut self, response: &reqwest::Response) {
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|raw| raw.split(';').next())
            .and_then(|pair| pair.split_once('='))
            .filter(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.to_string());

        if let Some(token) = cookie.filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn signup(&mut self, email: &str, password: &str, name: &str) -> Result<UserDto> {
        self.authenticate(AuthRequest {
            action: AuthAction::Signup,
            email: email.to_string(),
            password: password.to_string(),
            name: Some(name.to_string()),
        })
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserDto> {
        self.authenticate(AuthRequest {
            action: AuthAction::Login,
            email: email.to_string(),
            password: password.to_string(),
            name: None,
        })
        .await
    }

    async fn authenticate(&mut self, payload: AuthRequest) -> Result<UserDto> {
        let response = self
            .request(reqwest::Method::POST, "/auth")
            .json(&payload)
            .send()
            .await
            .context("Failed to reach server")?;

        self.capture_session(&response);

        let auth: AuthResponse = Self::parse(response).await?;
        Ok(auth.user)
    }

    pub async fn current_user(&self) -> Result<UserDto> {
        let response = self.request(reqwest::Method::GET, "/auth").send().await?;
        let auth: AuthResponse = Self::parse(response).await?;
        Ok(auth.user)
    }

    pub async fn update_preferences(&self, prefs: &PreferencesRequest) -> Result<UserDto> {
        let response = self
            .request(reqwest::Method::PATCH, "/auth")
            .json(prefs)
            .send()
            .await?;
        let auth: AuthResponse = Self::parse(response).await?;
        Ok(auth.user)
    }

    pub async fn logout(&mut self) -> Result<()> {
        let response = self.request(reqwest::Method::DELETE, "/auth").send().await?;
        Self::parse_empty(response).await?;
        self.clear_token();
        Ok(())
    }

    // ------------------------------------------------------------------
    // PRs
    // ------------------------------------------------------------------

    pub async fn list_prs(&self, filter: &PrFilter) -> Result<PrListResponse> {
        let mut request = self.request(reqwest::Method::GET, "/prs");
        if let Some(project) = &filter.project {
            request = request.query(&[("project", project.as_str())]);
        }
        if let Some(status) = filter.status {
            request = request.query(&[("status", status.as_str())]);
        }

        Self::parse(request.send().await?).await
    }

    pub async fn create_pr(&self, payload: &CreatePrRequest) -> Result<PrResponse> {
        let response = self
            .request(reqwest::Method::POST, "/prs")
            .json(payload)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn update_pr(&self, payload: &UpdatePrRequest) -> Result<PrResponse> {
        let response = self
            .request(reqwest::Method::PATCH, "/prs")
            .json(payload)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn delete_pr(&self, id: i32) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, "/prs")
            .query(&[("id", id)])
            .send()
            .await?;
        Self::parse_empty(response).await
    }

    // ------------------------------------------------------------------
    // Workspaces
    // ------------------------------------------------------------------

    pub async fn list_workspaces(&self, ws_type: Option<Category>) -> Result<WorkspaceListResponse> {
        let mut request = self.request(reqwest::Method::GET, "/workspaces");
        if let Some(ws_type) = ws_type {
            request = request.query(&[("type", ws_type.as_str())]);
        }
        Self::parse(request.send().await?).await
    }

    pub async fn create_workspace(
        &self,
        ws_type: Category,
        name: &str,
    ) -> Result<WorkspaceResponse> {
        let response = self
            .request(reqwest::Method::POST, "/workspaces")
            .json(&CreateWorkspaceRequest {
                name: Some(name.to_string()),
                ws_type: Some(ws_type),
            })
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn delete_workspace(&self, ws_type: Category, name: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, "/workspaces")
            .query(&[("type", ws_type.as_str()), ("name", name)])
            .send()
            .await?;
        Self::parse_empty(response).await
    }

    // ------------------------------------------------------------------
    // Defaults
    // ------------------------------------------------------------------

    pub async fn get_defaults(&self) -> Result<DefaultsResponse> {
        let response = self.request(reqwest::Method::GET, "/defaults").send().await?;
        Self::parse(response).await
    }

    pub async fn update_defaults(&self, payload: &UpdateDefaultsRequest) -> Result<DefaultsResponse> {
        let response = self
            .request(reqwest::Method::POST, "/defaults")
            .json(payload)
            .send()
            .await?;
        Self::parse(response).await
    }

    // ------------------------------------------------------------------
    // Share links
    // ------------------------------------------------------------------

    pub async fn create_share(&self, title: Option<&str>) -> Result<ShareCreateResponse> {
        let response = self
            .request(reqwest::Method::POST, "/share")
            .json(&ShareCreateRequest {
                title: title.map(str::to_string),
            })
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn resolve_share(&self, token: &str) -> Result<ShareViewResponse> {
        let response = self
            .request(reqwest::Method::GET, "/share")
            .query(&[("token", token)])
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self.request(reqwest::Method::GET, "/health").send().await?;
        Self::parse(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:7070/");
        assert_eq!(client.url("/prs"), "http://localhost:7070/api/prs");
    }

    #[test]
    fn token_round_trips_through_builder() {
        let client = ApiClient::new("http://localhost:7070").with_token(Some("abc".to_string()));
        assert_eq!(client.token(), Some("abc"));
    }
}
