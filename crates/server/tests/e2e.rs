use std::net::SocketAddr;
use std::sync::Arc;

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use axum::Router;
use chrono::Utc;
use migration::MigratorTrait;
use rand::rngs::OsRng;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, auth};
use service::storage::{AssetStore, FsAssetStore};

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
    admin_email: String,
    admin_password: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Ensure the server prefers env over a config file
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");

    // Use DATABASE_URL from environment; if not present, skip tests gracefully
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests. Provide .env.test or env var.");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }

    // Seed a throwaway admin for this run
    let admin_email = format!("admin_{}@example.com", Uuid::new_v4());
    let admin_password = "secret123".to_string();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(admin_password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash: {e}"))?
        .to_string();
    let now = Utc::now().into();
    models::admin::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(admin_email.clone()),
        password_hash: Set(hash),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    // Isolated upload root per test run
    let storage_root = format!("target/test-data/{}", Uuid::new_v4());
    let assets: Arc<dyn AssetStore> =
        FsAssetStore::new(storage_root.clone(), "http://localhost/storage")
            .await
            .map_err(|e| anyhow::anyhow!("asset store: {e}"))?;

    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 12 },
        assets,
    };

    let app: Router = routes::build_router(state, &storage_root, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, admin_email, admin_password })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn login(app: &TestApp) -> anyhow::Result<String> {
    let res = client()
        .post(format!("{}/admin/login", app.base_url))
        .json(&json!({ "email": app.admin_email, "password": app.admin_password }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    Ok(body["token"].as_str().expect("token in login body").to_string())
}

fn png_part(len: usize) -> Part {
    Part::bytes(vec![0u8; len]).file_name("pic.png").mime_str("image/png").expect("mime")
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_login_rejects_bad_credentials() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };

    let res = client()
        .post(format!("{}/admin/login", app.base_url))
        .json(&json!({ "email": app.admin_email, "password": "wrong-pass" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    // Malformed credentials are a 422 with field errors
    let res = client()
        .post(format!("{}/admin/login", app.base_url))
        .json(&json!({ "email": "nope", "password": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["errors"]["email"].is_array());
    Ok(())
}

#[tokio::test]
async fn e2e_admin_routes_require_bearer_token() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };

    let res = client().get(format!("{}/admin/banners", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let res = client()
        .get(format!("{}/admin/banners", app.base_url))
        .header("Authorization", "Bearer not-a-real-token")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_category_lifecycle_with_icon() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let token = login(&app).await?;
    let c = client();

    // Create with a 1.5 MiB icon: body carries a derived URL, not a raw key
    let name = format!("Gyms {}", Uuid::new_v4());
    let form = Form::new().text("name", name.clone()).part("icon", png_part(1536 * 1024));
    let res = c
        .post(format!("{}/admin/categories", app.base_url))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let icon = body["category"]["icon"].as_str().expect("icon url");
    assert!(icon.starts_with("http://localhost/storage/category_icons/"));
    let id = body["category"]["id"].as_str().expect("id").to_string();

    // Visible in the public listing via the search filter
    let res = c
        .get(format!("{}/user/categories", app.base_url))
        .query(&[("search", name.to_uppercase())])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["categories"].as_array().map(|a| a.len()), Some(1));

    // Partial update: rename only, icon URL survives
    let form = Form::new().text("name", "Renamed Gyms");
    let res = c
        .post(format!("{}/admin/categories/{}/update", app.base_url, id))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["category"]["name"], "Renamed Gyms");
    assert_eq!(body["category"]["icon"].as_str(), Some(icon));

    // Delete, then the detail is gone
    let res = c
        .delete(format!("{}/admin/categories/{}", app.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c
        .get(format!("{}/admin/categories/{}", app.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_oversized_icon_is_rejected_without_side_effects() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let token = login(&app).await?;

    let name = format!("Oversize {}", Uuid::new_v4());
    let form = Form::new().text("name", name.clone()).part("icon", png_part(3 * 1024 * 1024));
    let res = client()
        .post(format!("{}/admin/categories", app.base_url))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["errors"]["icon"].is_array());

    // No record was created
    let res = client()
        .get(format!("{}/user/categories", app.base_url))
        .query(&[("search", name)])
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["categories"].as_array().map(|a| a.len()), Some(0));
    Ok(())
}

#[tokio::test]
async fn e2e_shop_create_search_and_pagination_shape() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let token = login(&app).await?;
    let c = client();

    let form = Form::new()
        .text("name", format!("Category {}", Uuid::new_v4()))
        .part("icon", png_part(256));
    let res = c
        .post(format!("{}/admin/categories", app.base_url))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    let category_id = body["category"]["id"].as_str().expect("category id").to_string();

    // Shop referencing a nonexistent category is a conflict, not a 500
    let form = Form::new()
        .text("name", "Dangling")
        .text("category_id", Uuid::new_v4().to_string())
        .text("description", "nope")
        .text("address", "1 Nowhere")
        .text("phone", "000")
        .part("image", png_part(128));
    let res = c
        .post(format!("{}/admin/shops", app.base_url))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let marker = Uuid::new_v4().simple().to_string();
    let form = Form::new()
        .text("name", format!("Pizza Palace {marker}"))
        .text("category_id", category_id.clone())
        .text("description", "The best pizza in town.")
        .text("address", "123 Main St, Cityville")
        .text("phone", "123-456-7890")
        .part("image", png_part(512));
    let res = c
        .post(format!("{}/admin/shops", app.base_url))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let image = body["shop"]["image"].as_str().expect("image url");
    assert!(image.starts_with("http://localhost/storage/shop_images/"));
    let shop_id = body["shop"]["id"].as_str().expect("shop id").to_string();

    // Case-insensitive global search finds it and carries the metadata block
    let res = c
        .get(format!("{}/user/shops/search", app.base_url))
        .query(&[("q", marker.to_uppercase())])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["per_page"], 20);
    assert_eq!(body["pagination"]["current_page"], 1);

    // Category listing carries the ten-per-page block
    let res = c
        .get(format!("{}/user/{}/shops", app.base_url, category_id))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["pagination"]["per_page"], 10);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["from"], 1);

    // Empty search query is rejected
    let res = c.get(format!("{}/user/shops/search", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

    // Unknown category listing is a 404
    let res = c
        .get(format!("{}/user/{}/shops", app.base_url, Uuid::new_v4()))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    // Cleanup: shop first, then the category can go
    let res = c
        .delete(format!("{}/admin/categories/{}", app.base_url, category_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    let res = c
        .delete(format!("{}/admin/shops/{}", app.base_url, shop_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c
        .delete(format!("{}/admin/categories/{}", app.base_url, category_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_banner_upload_requires_image() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let token = login(&app).await?;
    let c = client();

    let form = Form::new().text("title", "No image here");
    let res = c
        .post(format!("{}/admin/banner/upload", app.base_url))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["errors"]["image"].is_array());

    // With an image the upload lands and the blob is publicly served
    let form = Form::new().text("title", "Summer Sale").part("image", png_part(2048));
    let res = c
        .post(format!("{}/admin/banner/upload", app.base_url))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let id = body["banner"]["id"].as_str().expect("banner id").to_string();
    assert!(body["banner"]["image"].as_str().expect("url").contains("/storage/banners/"));

    let res = c
        .delete(format!("{}/admin/banners/{}", app.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}
