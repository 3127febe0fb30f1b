use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "share_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Opaque capability token (64-char hex). Possession is the only
    /// access-control check on the read path.
    #[sea_orm(unique, indexed)]
    pub token: String,

    pub user_id: i32,

    pub title: String,

    pub created_at: String,

    pub expires_at: String,

    pub access_count: i32,

    pub last_accessed_at: Option<String>,

    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
