use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "prs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning user; every query is scoped by this column.
    #[sea_orm(indexed)]
    pub user_id: i32,

    pub title: String,

    /// "project" or "service"; selects which name column is authoritative.
    pub category: String,

    pub project: Option<String>,

    pub service: Option<String>,

    pub author: String,

    pub description: Option<String>,

    /// One of: initial, in_review, approved, merged, released.
    #[sea_orm(indexed)]
    pub status: String,

    /// One of: low, medium, high, critical.
    pub priority: String,

    /// JSON array of {url, label} stored as text
    pub links: Option<String>,

    pub scheduled_date: Option<String>,

    pub scheduled_time: Option<String>,

    pub email_reminder: bool,

    pub calendar_event: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
