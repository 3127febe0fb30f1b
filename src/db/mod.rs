use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::AuthConfig;
use crate::models::{Category, PrItem};

pub mod migrator;
pub mod repositories;

pub use repositories::defaults::{DefaultsDoc, DefaultsUpdate};
pub use repositories::pr::{NewPr, PrFilter, PrUpdate};
pub use repositories::share_link::ShareLink;
pub use repositories::user::{Preferences, User};
pub use repositories::workspace::Workspace;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("::memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn pr_repo(&self) -> repositories::pr::PrRepository {
        repositories::pr::PrRepository::new(self.conn.clone())
    }

    fn workspace_repo(&self) -> repositories::workspace::WorkspaceRepository {
        repositories::workspace::WorkspaceRepository::new(self.conn.clone())
    }

    fn share_link_repo(&self) -> repositories::share_link::ShareLinkRepository {
        repositories::share_link::ShareLinkRepository::new(self.conn.clone())
    }

    fn defaults_repo(&self) -> repositories::defaults::DefaultsRepository {
        repositories::defaults::DefaultsRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        config: &AuthConfig,
    ) -> Result<Option<User>> {
        self.user_repo().create(email, password, name, config).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn touch_last_login(&self, id: i32) -> Result<()> {
        self.user_repo().touch_last_login(id).await
    }

    pub async fn update_user_preferences(
        &self,
        id: i32,
        theme: Option<&str>,
        email_notifications: Option<bool>,
        calendar_integration: Option<bool>,
    ) -> Result<Option<User>> {
        self.user_repo()
            .update_preferences(id, theme, email_notifications, calendar_integration)
            .await
    }

    // ========================================================================
    // PRs
    // ========================================================================

    pub async fn list_prs(&self, user_id: i32, filter: &PrFilter) -> Result<Vec<PrItem>> {
        self.pr_repo().list(user_id, filter).await
    }

    pub async fn create_pr(&self, user_id: i32, input: NewPr) -> Result<PrItem> {
        self.pr_repo().create(user_id, input).await
    }

    pub async fn update_pr(
        &self,
        user_id: i32,
        id: i32,
        update: PrUpdate,
    ) -> Result<Option<PrItem>> {
        self.pr_repo().update(user_id, id, update).await
    }

    pub async fn delete_pr(&self, user_id: i32, id: i32) -> Result<bool> {
        self.pr_repo().delete(user_id, id).await
    }

    pub async fn count_prs_referencing(
        &self,
        user_id: i32,
        category: Category,
        name: &str,
    ) -> Result<u64> {
        self.pr_repo()
            .count_referencing(user_id, category, name)
            .await
    }

    // ========================================================================
    // Workspaces
    // ========================================================================

    pub async fn list_workspaces(
        &self,
        user_id: i32,
        ws_type: Option<Category>,
    ) -> Result<Vec<Workspace>> {
        self.workspace_repo().list(user_id, ws_type).await
    }

    pub async fn create_workspace(
        &self,
        user_id: i32,
        ws_type: Category,
        name: &str,
    ) -> Result<Option<Workspace>> {
        self.workspace_repo().create(user_id, ws_type, name).await
    }

    pub async fn delete_workspace(
        &self,
        user_id: i32,
        ws_type: Category,
        name: &str,
    ) -> Result<bool> {
        self.workspace_repo().delete(user_id, ws_type, name).await
    }

    // ========================================================================
    // Share links
    // ========================================================================

    pub async fn create_share_link(
        &self,
        token: &str,
        user_id: i32,
        title: &str,
        ttl_days: i64,
    ) -> Result<ShareLink> {
        self.share_link_repo()
            .create(token, user_id, title, ttl_days)
            .await
    }

    pub async fn deactivate_share_link(&self, token: &str) -> Result<()> {
        self.share_link_repo().deactivate(token).await
    }

    pub async fn find_valid_share_link(&self, token: &str) -> Result<Option<ShareLink>> {
        self.share_link_repo().find_valid(token).await
    }

    pub async fn record_share_access(&self, token: &str) -> Result<()> {
        self.share_link_repo().record_access(token).await
    }

    // ========================================================================
    // Defaults
    // ========================================================================

    pub async fn get_defaults(&self) -> Result<DefaultsDoc> {
        self.defaults_repo().get().await
    }

    pub async fn upsert_defaults(&self, update: DefaultsUpdate) -> Result<DefaultsDoc> {
        self.defaults_repo().upsert(update).await
    }
}
