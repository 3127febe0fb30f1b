use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, workspaces};
use crate::models::Category;

#[derive(Debug, Clone)]
pub struct Workspace {
    pub id: i32,
    pub name: String,
    pub ws_type: Category,
    pub created_at: String,
}

pub struct WorkspaceRepository {
    conn: DatabaseConnection,
}

impl WorkspaceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: workspaces::Model) -> Result<Workspace> {
        Ok(Workspace {
            id: model.id,
            name: model.name,
            ws_type: model.ws_type.parse().map_err(anyhow::Error::msg)?,
            created_at: model.created_at,
        })
    }

    /// List workspaces owned by `user_id`, optionally filtered by type,
    /// sorted by name.
    pub async fn list(&self, user_id: i32, ws_type: Option<Category>) -> Result<Vec<Workspace>> {
        let mut query = Workspaces::find().filter(workspaces::Column::UserId.eq(user_id));

        if let Some(ws_type) = ws_type {
            query = query.filter(workspaces::Column::WsType.eq(ws_type.as_str()));
        }

        let rows = query
            .order_by_asc(workspaces::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list workspaces")?;

        rows.into_iter().map(Self::map_model).collect()
    }

    /// Create a workspace for `user_id`. Returns `None` when the
    /// (user, type, name) triple already exists, so the caller can surface
    /// a distinct conflict instead of a generic failure.
    pub async fn create(
        &self,
        user_id: i32,
        ws_type: Category,
        name: &str,
    ) -> Result<Option<Workspace>> {
        let existing = Workspaces::find()
            .filter(workspaces::Column::UserId.eq(user_id))
            .filter(workspaces::Column::WsType.eq(ws_type.as_str()))
            .filter(workspaces::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to check for duplicate workspace")?;

        if existing.is_some() {
            return Ok(None);
        }

        let active = workspaces::ActiveModel {
            user_id: Set(user_id),
            name: Set(name.to_string()),
            ws_type: Set(ws_type.as_str().to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert workspace")?;

        Ok(Some(Self::map_model(model)?))
    }

    /// Delete a workspace by (user, type, name). Returns whether a row was
    /// removed. The referential-integrity guard against PRs lives at the
    /// API layer, before this call.
    pub async fn delete(&self, user_id: i32, ws_type: Category, name: &str) -> Result<bool> {
        let result = Workspaces::delete_many()
            .filter(workspaces::Column::UserId.eq(user_id))
            .filter(workspaces::Column::WsType.eq(ws_type.as_str()))
            .filter(workspaces::Column::Name.eq(name))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
