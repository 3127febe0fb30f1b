use serde::{Deserialize, Serialize};

use crate::db::{DefaultsDoc, User, Workspace};
use crate::models::{Category, PrItem, PrLink, PrStatus, Priority};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthAction {
    Login,
    Signup,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthRequest {
    pub action: AuthAction,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Preference changes merged into the current user's record.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferencesRequest {
    pub theme: Option<String>,
    pub email_notifications: Option<bool>,
    pub calendar_integration: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreferencesDto {
    pub theme: String,
    pub email_notifications: bool,
    pub calendar_integration: bool,
}

/// Identity projection returned to clients. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub preferences: PreferencesDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
            preferences: PreferencesDto {
                theme: user.preferences.theme,
                email_notifications: user.preferences.email_notifications,
                calendar_integration: user.preferences.calendar_integration,
            },
            last_login: user.last_login,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

// ============================================================================
// PRs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PrListQuery {
    pub project: Option<String>,
    pub status: Option<PrStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePrRequest {
    pub title: String,
    pub category: Category,
    pub project: Option<String>,
    pub service: Option<String>,
    pub author: String,
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub links: Vec<PrLink>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub email_reminder: bool,
    #[serde(default)]
    pub calendar_event: bool,
}

const fn default_priority() -> Priority {
    Priority::Medium
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePrRequest {
    pub id: i32,
    pub title: Option<String>,
    pub category: Option<Category>,
    pub project: Option<String>,
    pub service: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub status: Option<PrStatus>,
    pub priority: Option<Priority>,
    pub links: Option<Vec<PrLink>>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub email_reminder: Option<bool>,
    pub calendar_event: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DeletePrQuery {
    pub id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrListResponse {
    pub prs: Vec<PrItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrResponse {
    pub pr: PrItem,
}

// ============================================================================
// Workspaces
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkspaceDto {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub ws_type: Category,
    pub created_at: String,
}

impl From<Workspace> for WorkspaceDto {
    fn from(ws: Workspace) -> Self {
        Self {
            id: ws.id,
            name: ws.name,
            ws_type: ws.ws_type,
            created_at: ws.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkspaceListQuery {
    #[serde(rename = "type")]
    pub ws_type: Option<Category>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateWorkspaceRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ws_type: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteWorkspaceQuery {
    #[serde(rename = "type")]
    pub ws_type: Option<Category>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkspaceListResponse {
    pub items: Vec<WorkspaceDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkspaceResponse {
    pub item: WorkspaceDto,
}

// ============================================================================
// Defaults
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DefaultsDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_author: Option<String>,
}

impl From<DefaultsDoc> for DefaultsDto {
    fn from(doc: DefaultsDoc) -> Self {
        Self {
            default_project: doc.default_project,
            default_service: doc.default_service,
            default_email: doc.default_email,
            default_author: doc.default_author,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDefaultsRequest {
    pub default_project: Option<String>,
    pub default_service: Option<String>,
    pub default_email: Option<String>,
    pub default_author: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DefaultsResponse {
    pub defaults: DefaultsDto,
}

// ============================================================================
// Share links
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    pub token: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShareCreateRequest {
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCreateResponse {
    pub share_url: String,
    pub token: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareViewResponse {
    pub title: String,
    pub created_by: String,
    pub created_at: String,
    pub prs: Vec<PrItem>,
    pub access_count: i32,
}
