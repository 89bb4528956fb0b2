use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::entities::StringList;

/// Blog posts. `published_at` null means draft; drafts never leave the
/// admin list. `views` is bumped read-then-write on each public detail
/// fetch, matching the original site's non-atomic counter.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub author: String,
    pub category: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub tags: StringList,
    pub views: i32,
    pub created_at: DateTimeUtc,
    pub published_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
