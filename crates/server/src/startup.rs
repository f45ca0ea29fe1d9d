use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth};
use service::storage::FsAssetStore;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration, falling back to defaults plus env vars when no
/// config.toml is present.
fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Some(port) = env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
                cfg.server.port = port;
            }
            cfg.database.normalize_from_env();
            cfg.auth.normalize_from_env();
            cfg
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();

    // Upload root must exist before the first multipart request lands
    common::env::ensure_env(&cfg.storage.root).await?;
    let assets =
        FsAssetStore::new(cfg.storage.root.clone(), cfg.storage.public_base_url.clone()).await?;

    // DB connection
    let db = models::db::connect().await?;

    let jwt_secret = if cfg.auth.jwt_secret.trim().is_empty() {
        "dev-secret-change-me".to_string()
    } else {
        cfg.auth.jwt_secret.clone()
    };
    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret, token_ttl_hours: cfg.auth.token_ttl_hours },
        assets,
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, &cfg.storage.root, cors);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting directory server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
