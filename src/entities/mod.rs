pub mod blog;
pub mod brand;
pub mod car;
pub mod car_location;
pub mod contact_message;
pub mod location;
pub mod property;
pub mod testimonial;
pub mod user;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, FromJsonQueryResult, Schema, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::{
    blog::Entity as Blog,
    brand::Entity as Brand,
    car::Entity as Car,
    car_location::Entity as CarLocation,
    contact_message::Entity as ContactMessage,
    location::Entity as Location,
    property::Entity as Property,
    testimonial::Entity as Testimonial,
    user::Entity as User,
};

/// JSON-backed list column (car features, blog tags, property images).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

impl StringList {
    /// De-duplicates case-insensitively, keeping first occurrence order.
    /// Mirrors the add-time check in the admin feature editor.
    pub fn deduped(items: Vec<String>) -> StringList {
        let mut seen: Vec<String> = Vec::new();
        let mut out = Vec::new();
        for item in items {
            let trimmed = item.trim().to_string();
            if trimmed.is_empty() {
                continue;
            }
            let folded = trimmed.to_lowercase();
            if !seen.contains(&folded) {
                seen.push(folded);
                out.push(trimmed);
            }
        }
        StringList(out)
    }
}

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = vec![
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Brand),
        schema.create_table_from_entity(Car),
        schema.create_table_from_entity(Location),
        schema.create_table_from_entity(CarLocation),
        schema.create_table_from_entity(Blog),
        schema.create_table_from_entity(Property),
        schema.create_table_from_entity(Testimonial),
        schema.create_table_from_entity(ContactMessage),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(statement)).await?;
    }

    Ok(())
}

/// Seeds the back-office admin account. Password comes from
/// `ADMIN_PASSWORD`; the seed is skipped when the user already exists.
pub async fn primary_setup(db: Arc<DatabaseConnection>) -> Result<(), DbErr> {
    dotenvy::dotenv().ok();
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq("admin"))
        .one(db.as_ref())
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| DbErr::Custom(format!("Failed to hash admin password: {err}")))?
        .to_string();

    let new_admin = user::ActiveModel {
        username: Set("admin".to_owned()),
        password: Set(password_hash),
        role: Set(user::Role::Admin),
        ..Default::default()
    };

    let txn = db.begin().await?;
    user::Entity::insert(new_admin).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::StringList;

    #[test]
    fn feature_dedup_is_case_insensitive_and_order_preserving() {
        let list = StringList::deduped(vec![
            "Sunroof".to_string(),
            "ABS".to_string(),
            "sunroof".to_string(),
            "  abs ".to_string(),
            "Airbags".to_string(),
        ]);
        assert_eq!(list.0, vec!["Sunroof", "ABS", "Airbags"]);
    }

    #[test]
    fn feature_dedup_drops_blank_entries() {
        let list = StringList::deduped(vec!["".to_string(), "  ".to_string(), "GPS".to_string()]);
        assert_eq!(list.0, vec!["GPS"]);
    }
}
