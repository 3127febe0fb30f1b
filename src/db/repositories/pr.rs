use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{prelude::*, prs};
use crate::models::{Category, PrItem, PrLink, PrStatus, Priority};

/// Filters applied to owner-scoped PR listings. The owner is always present;
/// an empty filter set lists everything the user owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrFilter {
    pub project: Option<String>,
    pub status: Option<PrStatus>,
}

impl PrFilter {
    /// Cache key for this exact (owner, filter) combination.
    #[must_use]
    pub fn signature(&self, user_id: i32) -> String {
        format!(
            "prs:user={user_id}:project={}:status={}",
            self.project.as_deref().unwrap_or(""),
            self.status.map_or("", PrStatus::as_str),
        )
    }
}

/// Fields accepted when creating a PR. The owner is never part of the
/// payload; it is stamped from the authenticated identity by the caller.
#[derive(Debug, Clone)]
pub struct NewPr {
    pub title: String,
    pub category: Category,
    pub project: Option<String>,
    pub service: Option<String>,
    pub author: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub links: Vec<PrLink>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub email_reminder: bool,
    pub calendar_event: bool,
}

/// Partial update; only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct PrUpdate {
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

pub struct PrRepository {
    conn: DatabaseConnection,
}

impl PrRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: prs::Model) -> Result<PrItem> {
        let links = match model.links.as_deref() {
            Some(raw) => serde_json::from_str(raw).context("Corrupt links column")?,
            None => Vec::new(),
        };

        Ok(PrItem {
            id: model.id,
            title: model.title,
            category: model.category.parse().map_err(anyhow::Error::msg)?,
            project: model.project,
            service: model.service,
            author: model.author,
            description: model.description,
            status: model.status.parse().map_err(anyhow::Error::msg)?,
            priority: model.priority.parse().map_err(anyhow::Error::msg)?,
            links,
            scheduled_date: model.scheduled_date,
            scheduled_time: model.scheduled_time,
            email_reminder: model.email_reminder,
            calendar_event: model.calendar_event,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    /// List PRs owned by `user_id`, newest-updated first.
    pub async fn list(&self, user_id: i32, filter: &PrFilter) -> Result<Vec<PrItem>> {
        let mut query = Prs::find().filter(prs::Column::UserId.eq(user_id));

        if let Some(project) = &filter.project {
            query = query.filter(prs::Column::Project.eq(project.clone()));
        }
        if let Some(status) = filter.status {
            query = query.filter(prs::Column::Status.eq(status.as_str()));
        }

        let rows = query
            .order_by_desc(prs::Column::UpdatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list PRs")?;

        rows.into_iter().map(Self::map_model).collect()
    }

    /// Create a PR owned by `user_id`. Status always starts at `initial`.
    pub async fn create(&self, user_id: i32, input: NewPr) -> Result<PrItem> {
        let now = chrono::Utc::now().to_rfc3339();
        let links = if input.links.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&input.links)?)
        };

        let active = prs::ActiveModel {
            user_id: Set(user_id),
            title: Set(input.title),
            category: Set(input.category.as_str().to_string()),
            project: Set(input.project),
            service: Set(input.service),
            author: Set(input.author),
            description: Set(input.description),
            status: Set(PrStatus::Initial.as_str().to_string()),
            priority: Set(input.priority.as_str().to_string()),
            links: Set(links),
            scheduled_date: Set(input.scheduled_date),
            scheduled_time: Set(input.scheduled_time),
            email_reminder: Set(input.email_reminder),
            calendar_event: Set(input.calendar_event),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert PR")?;

        Self::map_model(model)
    }

    /// Apply a partial update to a PR, scoped to the owner. Returns `None`
    /// when the id does not exist under this owner; a record owned by
    /// someone else looks identical to a missing one.
    pub async fn update(&self, user_id: i32, id: i32, update: PrUpdate) -> Result<Option<PrItem>> {
        let row = Prs::find_by_id(id)
            .filter(prs::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query PR for update")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut active: prs::ActiveModel = row.into();
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(category) = update.category {
            active.category = Set(category.as_str().to_string());
        }
        if let Some(project) = update.project {
            active.project = Set(Some(project));
        }
        if let Some(service) = update.service {
            active.service = Set(Some(service));
        }
        if let Some(author) = update.author {
            active.author = Set(author);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(status) = update.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(priority) = update.priority {
            active.priority = Set(priority.as_str().to_string());
        }
        if let Some(links) = update.links {
            let encoded = if links.is_empty() {
                None
            } else {
                Some(serde_json::to_string(&links)?)
            };
            active.links = Set(encoded);
        }
        if let Some(date) = update.scheduled_date {
            active.scheduled_date = Set(Some(date));
        }
        if let Some(time) = update.scheduled_time {
            active.scheduled_time = Set(Some(time));
        }
        if let Some(flag) = update.email_reminder {
            active.email_reminder = Set(flag);
        }
        if let Some(flag) = update.calendar_event {
            active.calendar_event = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(model)?))
    }

    /// Delete a PR, scoped to the owner. Returns whether a row was removed.
    pub async fn delete(&self, user_id: i32, id: i32) -> Result<bool> {
        let result = Prs::delete_many()
            .filter(prs::Column::Id.eq(id))
            .filter(prs::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Count this user's PRs that reference a workspace name under the
    /// matching category. Used as the delete guard for workspaces.
    pub async fn count_referencing(
        &self,
        user_id: i32,
        category: Category,
        name: &str,
    ) -> Result<u64> {
        let mut query = Prs::find().filter(prs::Column::UserId.eq(user_id));

        query = match category {
            Category::Project => query.filter(prs::Column::Project.eq(name)),
            Category::Service => query.filter(prs::Column::Service.eq(name)),
        };

        let count = query.count(&self.conn).await?;
        Ok(count)
    }
}
