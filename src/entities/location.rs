use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Pickup/neighbourhood landing pages. The slug carries a unique index; the
/// admin handler additionally scans the list before writing so a duplicate
/// never reaches the insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub headline: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::entities::car_location::Entity")]
    CarLocation,
}

impl Related<crate::entities::car_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
