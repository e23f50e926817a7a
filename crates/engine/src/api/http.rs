//! HTTP routes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures_util::TryStreamExt;
use serde::Deserialize;

use crate::app::App;
use crate::infrastructure::proxy::ProxyError;
use crate::stores::MapSnapshot;
use crate::use_cases::{
    CampaignError, EntityError, FolderTreeError, MapError, SceneError, SidebarError, UploadError,
};
use tablekeep_domain::{CampaignNode, EntityMetadata, FileId, FolderNode, SceneState};
use tablekeep_shared::requests::{
    CreateFolderRequest, ImportMapRequest, SaveEntityRequest, SaveMapRequest, SaveShortcutRequest,
    VisitFolderRequest,
};
use tablekeep_shared::responses::{
    DriveMapListing, FolderListing, ImportedMap, MapSaveResponse, SaveEntityResponse, SidebarData,
    UploadResponse,
};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        // Folder navigation and the cached tree
        .route("/api/drive/list", get(list_folder))
        .route("/api/drive/add_folder", post(add_folder))
        .route("/api/drive/visit", post(visit_folder))
        .route("/api/drive/tree", get(folder_tree))
        .route("/api/drive/tree/refresh", post(refresh_folder_tree))
        // Entities
        .route("/api/drive/entity", get(get_entity))
        .route("/api/drive/update", post(save_entity))
        .route("/api/upload", post(upload))
        // Scene state + visualization
        .route("/api/set_vis", get(set_vis))
        .route("/api/set_music", get(set_music))
        .route("/vis/state", get(scene_state))
        .route("/vis/proxy_image", get(proxy_image))
        // Sidebar
        .route("/api/local/location", post(save_shortcut))
        .route("/api/local/sidebar", get(sidebar))
        // Path-keyed campaign tree
        .route("/api/tree", get(campaign_tree))
        // Map tool
        .route("/api/map/sync", get(map_sync_pull).post(map_sync_push))
        .route("/api/map/assets", get(map_assets))
        .route("/api/map/characters", get(character_assets))
        .route("/api/map/save", post(save_map))
        .route("/api/map/drive-list", get(list_drive_maps))
        .route("/api/map/import-drive", post(import_drive_map))
        .route("/data/maps/{filename}", get(serve_saved_map))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Folder navigation
// =============================================================================

#[derive(Deserialize)]
struct FolderQuery {
    folder_id: Option<String>,
}

async fn list_folder(
    State(app): State<Arc<App>>,
    Query(query): Query<FolderQuery>,
) -> Result<Json<FolderListing>, ApiError> {
    let folder_id = FileId::new(query.folder_id.unwrap_or_else(|| "root".to_string()));
    let listing = app.use_cases.folders.list(folder_id).await?;
    Ok(Json(listing))
}

async fn add_folder(
    State(app): State<Arc<App>>,
    Json(request): Json<CreateFolderRequest>,
) -> Result<Json<SaveEntityResponse>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing parent_id or name".to_string()));
    }
    let id = app
        .use_cases
        .folders
        .create_folder(&request.name, &request.parent_id)
        .await?;
    Ok(Json(SaveEntityResponse { id }))
}

async fn visit_folder(
    State(app): State<Arc<App>>,
    Json(request): Json<VisitFolderRequest>,
) -> Result<StatusCode, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing id or name".to_string()));
    }
    app.use_cases.folders.visit(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn folder_tree(State(app): State<Arc<App>>) -> Result<Json<Vec<FolderNode>>, ApiError> {
    Ok(Json(app.use_cases.folders.tree().await?))
}

async fn refresh_folder_tree(
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<FolderNode>>, ApiError> {
    Ok(Json(app.use_cases.folders.refresh().await?))
}

// =============================================================================
// Entities
// =============================================================================

#[derive(Deserialize)]
struct FileQuery {
    file_id: Option<String>,
}

async fn get_entity(
    State(app): State<Arc<App>>,
    Query(query): Query<FileQuery>,
) -> Result<Json<EntityMetadata>, ApiError> {
    let file_id = query
        .file_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing file_id".to_string()))?;
    let metadata = app.use_cases.entities.get(&FileId::new(file_id)).await?;
    Ok(Json(metadata))
}

async fn save_entity(
    State(app): State<Arc<App>>,
    Json(request): Json<SaveEntityRequest>,
) -> Result<Json<SaveEntityResponse>, ApiError> {
    let id = app.use_cases.entities.save(request).await?;
    Ok(Json(SaveEntityResponse { id }))
}

async fn upload(
    State(app): State<Arc<App>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut folder_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                file = Some((file_name, mime_type, bytes.to_vec()));
            }
            Some("folder_id") => {
                folder_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let (file_name, mime_type, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("No file part".to_string()))?;
    let folder_id =
        folder_id.ok_or_else(|| ApiError::BadRequest("Missing folder_id".to_string()))?;

    let response = app
        .use_cases
        .upload
        .upload(&file_name, &mime_type, bytes, &FileId::new(folder_id))
        .await?;
    Ok(Json(response))
}

// =============================================================================
// Scene state + visualization
// =============================================================================

#[derive(Deserialize)]
struct UrlQuery {
    url: Option<String>,
}

impl UrlQuery {
    fn required(self) -> Result<String, ApiError> {
        self.url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Missing url".to_string()))
    }
}

async fn set_vis(
    State(app): State<Arc<App>>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<SceneState>, ApiError> {
    let url = query.required()?;
    Ok(Json(app.use_cases.scene.set_image(&url)?))
}

async fn set_music(
    State(app): State<Arc<App>>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<SceneState>, ApiError> {
    let url = query.required()?;
    Ok(Json(app.use_cases.scene.set_music(&url)?))
}

async fn scene_state(State(app): State<Arc<App>>) -> Result<Json<SceneState>, ApiError> {
    Ok(Json(app.use_cases.scene.state()?))
}

async fn proxy_image(
    State(app): State<Arc<App>>,
    Query(query): Query<UrlQuery>,
) -> Result<Response, ApiError> {
    let url = query.required()?;

    let (content_type, upstream) = app.proxy.fetch(&url).await.map_err(|e| match e {
        ProxyError::UpstreamStatus(code) => {
            ApiError::BadGateway(format!("Error fetching image: {code}"))
        }
        ProxyError::Fetch(message) => {
            tracing::warn!(error = %message, "Image proxy fetch failed");
            ApiError::Internal(message)
        }
    })?;

    let body = Body::from_stream(upstream.bytes_stream().map_err(std::io::Error::other));
    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

// =============================================================================
// Sidebar
// =============================================================================

async fn save_shortcut(
    State(app): State<Arc<App>>,
    Json(request): Json<SaveShortcutRequest>,
) -> Result<StatusCode, ApiError> {
    if request.id.as_str().is_empty() || request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing id or name".to_string()));
    }
    app.use_cases.sidebar.add_shortcut(request.id, request.name)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn sidebar(State(app): State<Arc<App>>) -> Result<Json<SidebarData>, ApiError> {
    Ok(Json(app.use_cases.sidebar.sidebar()?))
}

// =============================================================================
// Path-keyed campaign tree
// =============================================================================

async fn campaign_tree(State(app): State<Arc<App>>) -> Result<Json<CampaignNode>, ApiError> {
    Ok(Json(app.use_cases.campaign.tree()?))
}

// =============================================================================
// Map tool
// =============================================================================

async fn map_sync_pull(State(app): State<Arc<App>>) -> Json<MapSnapshot> {
    Json(app.map_sync.snapshot().await)
}

async fn map_sync_push(
    State(app): State<Arc<App>>,
    Json(data): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    let timestamp = app.map_sync.replace(data).await;
    Json(serde_json::json!({ "timestamp": timestamp }))
}

async fn map_assets(
    State(app): State<Arc<App>>,
) -> Result<Json<BTreeMap<String, Vec<String>>>, ApiError> {
    Ok(Json(app.use_cases.maps.list_assets()?))
}

async fn character_assets(State(app): State<Arc<App>>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(app.use_cases.maps.list_characters()?))
}

async fn save_map(
    State(app): State<Arc<App>>,
    Json(request): Json<SaveMapRequest>,
) -> Result<Json<MapSaveResponse>, ApiError> {
    Ok(Json(app.use_cases.maps.save(request)?))
}

async fn list_drive_maps(
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<DriveMapListing>>, ApiError> {
    Ok(Json(app.use_cases.maps.drive_list().await?))
}

async fn import_drive_map(
    State(app): State<Arc<App>>,
    Json(request): Json<ImportMapRequest>,
) -> Result<Json<ImportedMap>, ApiError> {
    Ok(Json(app.use_cases.maps.import(request).await?))
}

async fn serve_saved_map(
    State(app): State<Arc<App>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = app
        .use_cases
        .maps
        .saved_map_path(&filename)
        .ok_or(ApiError::NotFound)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let content_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    };

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    BadGateway(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<FolderTreeError> for ApiError {
    fn from(e: FolderTreeError) -> Self {
        tracing::error!(error = %e, "Folder operation failed");
        ApiError::Internal(e.to_string())
    }
}

impl From<EntityError> for ApiError {
    fn from(e: EntityError) -> Self {
        match e {
            EntityError::Validation(field) => {
                ApiError::BadRequest(format!("Missing required field: {field}"))
            }
            EntityError::NotFound(_) => ApiError::NotFound,
            other => {
                tracing::error!(error = %other, "Entity operation failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<SceneError> for ApiError {
    fn from(e: SceneError) -> Self {
        match e {
            SceneError::Validation(field) => {
                ApiError::BadRequest(format!("Missing required field: {field}"))
            }
            SceneError::Repo(e) => {
                tracing::error!(error = %e, "Scene state operation failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<SidebarError> for ApiError {
    fn from(e: SidebarError) -> Self {
        tracing::error!(error = %e, "Sidebar operation failed");
        ApiError::Internal(e.to_string())
    }
}

impl From<CampaignError> for ApiError {
    fn from(e: CampaignError) -> Self {
        tracing::error!(error = %e, "Campaign tree build failed");
        ApiError::Internal(e.to_string())
    }
}

impl From<MapError> for ApiError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::Validation(field) => {
                ApiError::BadRequest(format!("Missing required field: {field}"))
            }
            MapError::BadImage(msg) => ApiError::BadRequest(msg),
            MapError::NotFound(_) => ApiError::NotFound,
            other => {
                tracing::error!(error = %other, "Map operation failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Validation(field) => {
                ApiError::BadRequest(format!("Missing required field: {field}"))
            }
            UploadError::Store(e) => {
                tracing::error!(error = %e, "Upload failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}
