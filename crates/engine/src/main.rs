//! Tablekeep Engine - Main entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod infrastructure;
mod stores;
mod use_cases;

use app::App;
use infrastructure::drive::DriveClient;
use infrastructure::persistence::JsonRepositories;
use tablekeep_domain::FileId;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablekeep_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tablekeep Engine");

    // Load configuration
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "5000".into())
        .parse()
        .unwrap_or(5000);
    let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into()));
    let assets_dir = PathBuf::from(
        std::env::var("STATIC_ASSETS_DIR").unwrap_or_else(|_| "static/assets".into()),
    );
    let drive_api_url = std::env::var("DRIVE_API_BASE_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/drive/v3".into());
    let drive_upload_url = std::env::var("DRIVE_UPLOAD_BASE_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/upload/drive/v3".into());
    let drive_token = std::env::var("DRIVE_ACCESS_TOKEN").unwrap_or_default();
    let root_folder_id = std::env::var("DRIVE_ROOT_FOLDER_ID").unwrap_or_default();

    if drive_token.is_empty() {
        tracing::warn!("DRIVE_ACCESS_TOKEN is not set; remote store calls will be rejected");
    }
    if root_folder_id.is_empty() {
        tracing::warn!("DRIVE_ROOT_FOLDER_ID is not set; 'root' resolves to nothing");
    }

    // Create the remote store adapter
    let remote = Arc::new(DriveClient::new(
        &drive_api_url,
        &drive_upload_url,
        &drive_token,
        FileId::new(root_folder_id),
    ));

    // Create local persistence
    std::fs::create_dir_all(&data_dir)?;
    let repos = JsonRepositories::new(&data_dir);

    // Create application
    let app = Arc::new(App::new(
        remote,
        repos,
        assets_dir.clone(),
        data_dir.join("maps"),
    ));

    // Build router
    let mut router = api::http::routes()
        .with_state(app)
        .nest_service("/static/assets", ServeDir::new(&assets_dir))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
