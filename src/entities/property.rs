use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::StringList;

/// Mumbai real-estate listings. `location` is a free-form string and is
/// deliberately not normalised to a `locations` row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub price: f32,
    pub listing_type: ListingType,
    pub property_type: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area_sqft: i32,
    pub location: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Json")]
    pub features: StringList,
    #[sea_orm(column_type = "Json")]
    pub images: StringList,
    pub is_featured: bool,
    pub is_premium: bool,
    pub availability_status: AvailabilityStatus,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "listing_type_enum",
    db_type = "String(StringLen::N(8))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "rent")]
    Rent,
}

impl FromStr for ListingType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(ListingType::Sale),
            "rent" => Ok(ListingType::Rent),
            _ => Err(()),
        }
    }
}

impl ToString for ListingType {
    fn to_string(&self) -> String {
        match self {
            ListingType::Sale => "sale".to_string(),
            ListingType::Rent => "rent".to_string(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "availability_status_enum",
    db_type = "String(StringLen::N(16))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "sold")]
    Sold,
    #[sea_orm(string_value = "rented")]
    Rented,
}

impl ToString for AvailabilityStatus {
    fn to_string(&self) -> String {
        match self {
            AvailabilityStatus::Available => "available".to_string(),
            AvailabilityStatus::Sold => "sold".to_string(),
            AvailabilityStatus::Rented => "rented".to_string(),
        }
    }
}
