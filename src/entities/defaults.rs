use sea_orm::entity::prelude::*;

/// Install-wide form prefill values. A single row keyed "global".
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "defaults")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,

    pub default_project: Option<String>,

    pub default_service: Option<String>,

    pub default_email: Option<String>,

    pub default_author: Option<String>,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
