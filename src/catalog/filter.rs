//! In-memory catalog filtering.
//!
//! The browse pages fetch the full result set and narrow it here, exactly
//! like the original client-side grids: a key whose value is missing, empty
//! or the literal sentinel `"All"` matches everything, equality keys compare
//! case-insensitively, and price bounds are inclusive integers. Input order
//! is preserved and no pagination is applied.

use serde::Deserialize;

use crate::entities::{car, property};

pub const MATCH_ALL: &str = "All";

fn is_wildcard(param: &Option<String>) -> bool {
    match param {
        None => true,
        Some(v) => v.is_empty() || v == MATCH_ALL,
    }
}

fn matches_eq(param: &Option<String>, value: &str) -> bool {
    if is_wildcard(param) {
        return true;
    }
    match param {
        Some(wanted) => wanted.eq_ignore_ascii_case(value),
        None => true,
    }
}

/// Inclusive numeric bound parsed from a query-string value. A present but
/// unparseable value matches no row at all, which is what the original's
/// unguarded `parseInt` comparison against NaN did.
fn within_bound(price: f32, param: &Option<String>, is_min: bool) -> bool {
    if is_wildcard(param) {
        return true;
    }
    let raw = match param {
        Some(raw) => raw,
        None => return true,
    };
    match raw.trim().parse::<i64>() {
        Ok(bound) => {
            if is_min {
                price >= bound as f32
            } else {
                price <= bound as f32
            }
        }
        Err(_) => false,
    }
}

fn within_price(price: f32, min: &Option<String>, max: &Option<String>) -> bool {
    within_bound(price, min, true) && within_bound(price, max, false)
}

/// A car row joined with its brand name for display and filtering.
#[derive(Clone, Debug, serde::Serialize)]
pub struct CarCard {
    #[serde(flatten)]
    pub car: car::Model,
    pub brand: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CarListQuery {
    pub brand: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl CarListQuery {
    pub fn matches(&self, card: &CarCard) -> bool {
        matches_eq(&self.brand, &card.brand)
            && matches_eq(&self.fuel, &card.car.fuel_type.to_string())
            && matches_eq(&self.transmission, &card.car.transmission.to_string())
            && within_price(card.car.price_per_day, &self.min_price, &self.max_price)
    }
}

pub fn filter_cars(cards: Vec<CarCard>, query: &CarListQuery) -> Vec<CarCard> {
    cards.into_iter().filter(|card| query.matches(card)).collect()
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PropertyListQuery {
    pub listing_type: Option<String>,
    pub property_type: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl PropertyListQuery {
    pub fn matches(&self, p: &property::Model) -> bool {
        matches_eq(&self.listing_type, &p.listing_type.to_string())
            && matches_eq(&self.property_type, &p.property_type)
            && matches_eq(&self.location, &p.location)
            && within_price(p.price, &self.min_price, &self.max_price)
    }
}

pub fn filter_properties(
    properties: Vec<property::Model>,
    query: &PropertyListQuery,
) -> Vec<property::Model> {
    properties.into_iter().filter(|p| query.matches(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::car::{FuelType, Transmission};
    use crate::entities::property::{AvailabilityStatus, ListingType};
    use crate::entities::StringList;

    fn car(id: i32, brand: &str, fuel: FuelType, transmission: Transmission, price: f32) -> CarCard {
        CarCard {
            car: car::Model {
                id,
                name: format!("car-{id}"),
                slug: format!("car-{id}"),
                brand_id: 1,
                price_per_day: price,
                transmission,
                fuel_type: fuel,
                seats: 5,
                luggage: 2,
                mileage: None,
                description: String::new(),
                features: StringList::default(),
                main_image: None,
            },
            brand: brand.to_string(),
        }
    }

    fn fleet() -> Vec<CarCard> {
        vec![
            car(1, "Hyundai", FuelType::Petrol, Transmission::Manual, 1500.0),
            car(2, "Hyundai", FuelType::Diesel, Transmission::Automatic, 2500.0),
            car(3, "Tata", FuelType::Diesel, Transmission::Manual, 2000.0),
            car(4, "Tata", FuelType::Electric, Transmission::Automatic, 3500.0),
        ]
    }

    #[test]
    fn equality_filter_selects_exact_subset() {
        let query = CarListQuery { fuel: Some("Diesel".into()), ..Default::default() };
        let out = filter_cars(fleet(), &query);
        let ids: Vec<i32> = out.iter().map(|c| c.car.id).collect();
        assert_eq!(ids, [2, 3]);
    }

    #[test]
    fn all_sentinel_and_empty_match_everything() {
        let query = CarListQuery {
            fuel: Some("All".into()),
            brand: Some(String::new()),
            transmission: None,
            ..Default::default()
        };
        assert_eq!(filter_cars(fleet(), &query).len(), 4);
    }

    #[test]
    fn filters_combine_conjunctively() {
        let query = CarListQuery {
            brand: Some("Tata".into()),
            transmission: Some("Automatic".into()),
            ..Default::default()
        };
        let out = filter_cars(fleet(), &query);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].car.id, 4);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let query = CarListQuery {
            min_price: Some("2000".into()),
            max_price: Some("2500".into()),
            ..Default::default()
        };
        let ids: Vec<i32> = filter_cars(fleet(), &query).iter().map(|c| c.car.id).collect();
        assert_eq!(ids, [2, 3]);
    }

    #[test]
    fn unparseable_bound_matches_nothing() {
        let query = CarListQuery { min_price: Some("cheap".into()), ..Default::default() };
        assert!(filter_cars(fleet(), &query).is_empty());
    }

    #[test]
    fn input_order_is_preserved() {
        let query = CarListQuery::default();
        let ids: Vec<i32> = filter_cars(fleet(), &query).iter().map(|c| c.car.id).collect();
        assert_eq!(ids, [1, 2, 3, 4]);
    }

    #[test]
    fn brand_equality_is_case_insensitive() {
        let query = CarListQuery { brand: Some("hyundai".into()), ..Default::default() };
        assert_eq!(filter_cars(fleet(), &query).len(), 2);
    }

    fn flat(id: i32, listing: ListingType, kind: &str, location: &str, price: f32) -> property::Model {
        property::Model {
            id,
            title: format!("flat-{id}"),
            slug: format!("flat-{id}"),
            price,
            listing_type: listing,
            property_type: kind.to_string(),
            bedrooms: 2,
            bathrooms: 2,
            area_sqft: 900,
            location: location.to_string(),
            description: String::new(),
            features: StringList::default(),
            images: StringList::default(),
            is_featured: false,
            is_premium: false,
            availability_status: AvailabilityStatus::Available,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn property_filters_apply_all_criteria() {
        let listings = vec![
            flat(1, ListingType::Sale, "Apartment", "Andheri", 9_500_000.0),
            flat(2, ListingType::Rent, "Apartment", "Andheri", 45_000.0),
            flat(3, ListingType::Rent, "Villa", "Powai", 120_000.0),
        ];
        let query = PropertyListQuery {
            listing_type: Some("rent".into()),
            property_type: Some("Apartment".into()),
            ..Default::default()
        };
        let out = filter_properties(listings, &query);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 2);
    }
}
