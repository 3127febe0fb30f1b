use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, Set};

use crate::entities::{defaults, prelude::*};

const GLOBAL_KEY: &str = "global";

/// Install-wide form prefill values. Not authoritative data; only used to
/// pre-populate creation forms.
#[derive(Debug, Clone, Default)]
pub struct DefaultsDoc {
    pub default_project: Option<String>,
    pub default_service: Option<String>,
    pub default_email: Option<String>,
    pub default_author: Option<String>,
}

/// Fields to merge into the defaults document; `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct DefaultsUpdate {
    pub default_project: Option<String>,
    pub default_service: Option<String>,
    pub default_email: Option<String>,
    pub default_author: Option<String>,
}

impl From<defaults::Model> for DefaultsDoc {
    fn from(model: defaults::Model) -> Self {
        Self {
            default_project: model.default_project,
            default_service: model.default_service,
            default_email: model.default_email,
            default_author: model.default_author,
        }
    }
}

pub struct DefaultsRepository {
    conn: DatabaseConnection,
}

impl DefaultsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Fetch the global defaults document; an absent row reads as empty.
    pub async fn get(&self) -> Result<DefaultsDoc> {
        let row = Defaults::find_by_id(GLOBAL_KEY)
            .one(&self.conn)
            .await
            .context("Failed to query defaults")?;

        Ok(row.map(DefaultsDoc::from).unwrap_or_default())
    }

    /// Merge the provided fields into the global document, creating it on
    /// first write.
    pub async fn upsert(&self, update: DefaultsUpdate) -> Result<DefaultsDoc> {
        let now = chrono::Utc::now().to_rfc3339();

        let existing = Defaults::find_by_id(GLOBAL_KEY)
            .one(&self.conn)
            .await
            .context("Failed to query defaults for upsert")?;

        let model = if let Some(existing) = existing {
            let mut active: defaults::ActiveModel = existing.into();
            if let Some(v) = update.default_project {
                active.default_project = Set(Some(v));
            }
            if let Some(v) = update.default_service {
                active.default_service = Set(Some(v));
            }
            if let Some(v) = update.default_email {
                active.default_email = Set(Some(v));
            }
            if let Some(v) = update.default_author {
                active.default_author = Set(Some(v));
            }
            active.updated_at = Set(now);
            active.update(&self.conn).await?
        } else {
            let active = defaults::ActiveModel {
                key: Set(GLOBAL_KEY.to_string()),
                default_project: match update.default_project {
                    Some(v) => Set(Some(v)),
                    None => NotSet,
                },
                default_service: match update.default_service {
                    Some(v) => Set(Some(v)),
                    None => NotSet,
                },
                default_email: match update.default_email {
                    Some(v) => Set(Some(v)),
                    None => NotSet,
                },
                default_author: match update.default_author {
                    Some(v) => Set(Some(v)),
                    None => NotSet,
                },
                updated_at: Set(now),
            };
            active.insert(&self.conn).await?
        };

        Ok(DefaultsDoc::from(model))
    }
}
