use crate::db::connect;
use crate::{banner, category, shop};
use anyhow::Result;
use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn new_category(name: &str) -> category::ActiveModel {
    let now = Utc::now().into();
    category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        icon: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn test_category_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = match setup_test_db().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(());
        }
    };

    let name = format!("test_category_{}", Uuid::new_v4());
    let created = new_category(&name).insert(&db).await?;
    assert_eq!(created.name, name);
    assert!(created.icon.is_none());

    let found = category::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().name, name);

    let by_name = category::Entity::find()
        .filter(category::Column::Name.eq(name.clone()))
        .one(&db)
        .await?;
    assert_eq!(by_name.unwrap().id, created.id);

    // Duplicate names are allowed
    let dup = new_category(&name).insert(&db).await;
    assert!(dup.is_ok());
    category::Entity::delete_by_id(dup.unwrap().id).exec(&db).await?;

    category::Entity::delete_by_id(created.id).exec(&db).await?;
    let after = category::Entity::find_by_id(created.id).one(&db).await?;
    assert!(after.is_none());
    Ok(())
}

#[tokio::test]
async fn test_shop_crud_and_fk() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = match setup_test_db().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(());
        }
    };

    let cat = new_category(&format!("shop_test_category_{}", Uuid::new_v4()))
        .insert(&db)
        .await?;

    let now = Utc::now().into();
    let created = shop::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Pizza Palace".into()),
        category_id: Set(cat.id),
        description: Set("The best pizza in town.".into()),
        image: Set(Some("shop_images/test.jpg".into())),
        address: Set("123 Main St, Cityville".into()),
        phone: Set("123-456-7890".into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;
    assert_eq!(created.category_id, cat.id);

    // Dangling category reference must be rejected by the FK
    let dangling = shop::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Ghost Shop".into()),
        category_id: Set(Uuid::new_v4()),
        description: Set("no category".into()),
        image: Set(None),
        address: Set("nowhere".into()),
        phone: Set("000".into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await;
    assert!(dangling.is_err());

    // A category with shops cannot be deleted (ON DELETE RESTRICT)
    let restricted = category::Entity::delete_by_id(cat.id).exec(&db).await;
    assert!(restricted.is_err());

    shop::Entity::delete_by_id(created.id).exec(&db).await?;
    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_banner_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = match setup_test_db().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(());
        }
    };

    let now = Utc::now().into();
    let created = banner::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(None),
        image: Set(format!("banners/{}.png", Uuid::new_v4())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    let found = banner::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    assert!(found.unwrap().title.is_none());

    banner::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}
