use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};

use crate::entities::{prelude::*, share_links};

#[derive(Debug, Clone)]
pub struct ShareLink {
    pub token: String,
    pub user_id: i32,
    pub title: String,
    pub created_at: String,
    pub expires_at: String,
    pub access_count: i32,
    pub is_active: bool,
}

impl From<share_links::Model> for ShareLink {
    fn from(model: share_links::Model) -> Self {
        Self {
            token: model.token,
            user_id: model.user_id,
            title: model.title,
            created_at: model.created_at,
            expires_at: model.expires_at,
            access_count: model.access_count,
            is_active: model.is_active,
        }
    }
}

pub struct ShareLinkRepository {
    conn: DatabaseConnection,
}

impl ShareLinkRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Persist a new share link with the given validity window.
    pub async fn create(
        &self,
        token: &str,
        user_id: i32,
        title: &str,
        ttl_days: i64,
    ) -> Result<ShareLink> {
        let now = Utc::now();
        let expires_at = now + Duration::days(ttl_days);

        let active = share_links::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(user_id),
            title: Set(title.to_string()),
            created_at: Set(now.to_rfc3339()),
            expires_at: Set(expires_at.to_rfc3339()),
            access_count: Set(0),
            last_accessed_at: Set(None),
            is_active: Set(true),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert share link")?;

        Ok(ShareLink::from(model))
    }

    /// Look up a link by token, requiring it to be active and unexpired.
    /// All failure causes (missing, deactivated, expired, corrupt expiry)
    /// collapse to `None`.
    pub async fn find_valid(&self, token: &str) -> Result<Option<ShareLink>> {
        let row = ShareLinks::find()
            .filter(share_links::Column::Token.eq(token))
            .filter(share_links::Column::IsActive.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query share link")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Ok(expires_at) = DateTime::parse_from_rfc3339(&row.expires_at) else {
            return Ok(None);
        };

        if expires_at <= Utc::now() {
            return Ok(None);
        }

        Ok(Some(ShareLink::from(row)))
    }

    /// Flip the active flag off. Direct flag mutation is the only
    /// revocation the design offers.
    pub async fn deactivate(&self, token: &str) -> Result<()> {
        ShareLinks::update_many()
            .col_expr(share_links::Column::IsActive, Expr::value(false))
            .filter(share_links::Column::Token.eq(token))
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    /// Record one successful resolution: bump the access counter and touch
    /// the last-accessed timestamp in a single update.
    pub async fn record_access(&self, token: &str) -> Result<()> {
        ShareLinks::update_many()
            .col_expr(
                share_links::Column::AccessCount,
                Expr::col(share_links::Column::AccessCount).add(1),
            )
            .col_expr(
                share_links::Column::LastAccessedAt,
                Expr::value(Utc::now().to_rfc3339()),
            )
            .filter(share_links::Column::Token.eq(token))
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}

/// Generate a random capability token (64 character hex string, 256 bits).
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
