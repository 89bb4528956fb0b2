use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::brand::Entity as Brand;
use crate::entities::StringList;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub brand_id: i32,
    pub price_per_day: f32,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub seats: i32,
    pub luggage: i32,
    pub mileage: Option<f32>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Json")]
    pub features: StringList,
    pub main_image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Brand",
        from = "crate::entities::car::Column::BrandId",
        to = "crate::entities::brand::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict",
    )]
    Brand,
    #[sea_orm(has_many = "crate::entities::car_location::Entity")]
    CarLocation,
}

impl Related<Brand> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<crate::entities::car_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "transmission_enum",
    db_type = "String(StringLen::N(16))",
    rs_type = "String"
)]
pub enum Transmission {
    #[sea_orm(string_value = "Manual")]
    Manual,
    #[sea_orm(string_value = "Automatic")]
    Automatic,
}

impl FromStr for Transmission {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Manual" => Ok(Transmission::Manual),
            "Automatic" => Ok(Transmission::Automatic),
            _ => Err(()),
        }
    }
}

impl ToString for Transmission {
    fn to_string(&self) -> String {
        match self {
            Transmission::Manual => "Manual".to_string(),
            Transmission::Automatic => "Automatic".to_string(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "fuel_type_enum",
    db_type = "String(StringLen::N(16))",
    rs_type = "String"
)]
pub enum FuelType {
    #[sea_orm(string_value = "Petrol")]
    Petrol,
    #[sea_orm(string_value = "Diesel")]
    Diesel,
    #[sea_orm(string_value = "Electric")]
    Electric,
    #[sea_orm(string_value = "Hybrid")]
    Hybrid,
}

impl FromStr for FuelType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Petrol" => Ok(FuelType::Petrol),
            "Diesel" => Ok(FuelType::Diesel),
            "Electric" => Ok(FuelType::Electric),
            "Hybrid" => Ok(FuelType::Hybrid),
            _ => Err(()),
        }
    }
}

impl ToString for FuelType {
    fn to_string(&self) -> String {
        match self {
            FuelType::Petrol => "Petrol".to_string(),
            FuelType::Diesel => "Diesel".to_string(),
            FuelType::Electric => "Electric".to_string(),
            FuelType::Hybrid => "Hybrid".to_string(),
        }
    }
}
