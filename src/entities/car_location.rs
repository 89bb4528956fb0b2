use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Junction between cars and the locations they are offered from.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "car_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub car_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub location_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::car::Entity",
        from = "crate::entities::car_location::Column::CarId",
        to = "crate::entities::car::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade",
    )]
    Car,
    #[sea_orm(
        belongs_to = "crate::entities::location::Entity",
        from = "crate::entities::car_location::Column::LocationId",
        to = "crate::entities::location::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade",
    )]
    Location,
}

impl Related<crate::entities::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl Related<crate::entities::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
