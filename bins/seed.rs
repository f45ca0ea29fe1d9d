//! One-shot seeding: run migrations, ensure the admin account exists, and
//! insert the starter catalog when the tables are empty.

use anyhow::Result;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use chrono::Utc;
use dotenvy::dotenv;
use migration::MigratorTrait;
use rand::rngs::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

use service::db::{category_service, shop_service};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    ensure_admin(&db).await?;
    seed_catalog(&db).await?;

    info!("seed complete");
    Ok(())
}

/// Create the back-office admin from `ADMIN_EMAIL`/`ADMIN_PASSWORD` unless an
/// account with that email already exists.
async fn ensure_admin(db: &DatabaseConnection) -> Result<()> {
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "secret123".to_string());

    let existing = models::admin::Entity::find()
        .filter(models::admin::Column::Email.eq(email.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        info!(%email, "admin already present");
        return Ok(());
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?
        .to_string();
    let now = Utc::now().into();
    models::admin::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.clone()),
        password_hash: Set(hash),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    info!(%email, "admin created");
    Ok(())
}

/// Insert the starter categories and shops. Icons and images start unset;
/// the admin uploads real ones through the API.
async fn seed_catalog(db: &DatabaseConnection) -> Result<()> {
    if models::category::Entity::find().count(db).await? > 0 {
        info!("catalog already seeded");
        return Ok(());
    }

    let mut restaurants = None;
    let mut cafes = None;
    let mut gyms = None;
    let mut salons = None;
    for name in ["Restaurants", "Cafes", "Shops", "Gyms", "Salons"] {
        let created = category_service::create_category(db, name, None).await?;
        match name {
            "Restaurants" => restaurants = Some(created.id),
            "Cafes" => cafes = Some(created.id),
            "Gyms" => gyms = Some(created.id),
            "Salons" => salons = Some(created.id),
            _ => {}
        }
        info!(id = %created.id, name, "category seeded");
    }

    let shops = [
        (
            "Pizza Palace",
            restaurants,
            "The best pizza in town.",
            "123 Main St, Cityville",
            "123-456-7890",
        ),
        (
            "Coffee Corner",
            cafes,
            "Cozy place for coffee lovers.",
            "456 Coffee Rd, Townsville",
            "987-654-3210",
        ),
        (
            "Fitness Hub",
            gyms,
            "Your neighborhood gym.",
            "789 Workout Ave, Fit City",
            "555-123-4567",
        ),
        (
            "Style Salon",
            salons,
            "Trendy hairstyles and beauty services.",
            "321 Beauty St, Glamour Town",
            "444-555-6666",
        ),
    ];
    for (name, category_id, description, address, phone) in shops {
        let Some(category_id) = category_id else { continue };
        let created =
            shop_service::create_shop(db, name, category_id, description, None, address, phone)
                .await?;
        info!(id = %created.id, name, "shop seeded");
    }

    Ok(())
}
