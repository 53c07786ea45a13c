//! API endpoints for asset upload and management

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::api::handlers::{error_response, ApiResult, AppState};
use crate::assets::Asset;

/// `/assets/object/<name>` with the name percent-encoded as a path segment
fn asset_location(name: &str) -> String {
    let mut url = match Url::parse("http://localhost/assets/object") {
        Ok(url) => url,
        Err(_) => return "/assets".to_string(),
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(name);
    }
    url.path().to_string()
}

/// Reply with the status the multipart error carries (413 for oversized bodies)
fn multipart_rejection(e: MultipartError) -> Response {
    warn!(error = %e, "Rejected asset upload body");
    (e.status(), e.body_text()).into_response()
}

/// GET /assets
pub async fn list_assets(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Asset>>> {
    let assets = state.assets.list_assets().await.map_err(error_response)?;
    Ok(Json(assets))
}

/// POST /assets/upload - multipart `assetname` + `assetfile`
pub async fn upload_asset(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let mut name = None;
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_rejection)? {
        let field_name = field.name().map(|s| s.to_string());

        match field_name.as_deref() {
            Some("assetname") => {
                name = Some(field.text().await.map_err(multipart_rejection)?);
            }
            Some("assetfile") => {
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_rejection)?;
                file = Some((mime, bytes));
            }
            _ => {}
        }
    }

    let name = match name.filter(|n| !n.is_empty()) {
        Some(name) => name,
        None => return Ok((StatusCode::BAD_REQUEST, "Missing assetname field").into_response()),
    };
    let (mime, bytes) = match file {
        Some(file) => file,
        None => return Ok((StatusCode::BAD_REQUEST, "Missing assetfile field").into_response()),
    };

    debug!(name = %name, mime = %mime, size = bytes.len(), "Asset upload received");

    let asset = state
        .assets
        .upload(
            state.object_store.as_ref(),
            &state.key_prefix,
            &name,
            bytes,
            &mime,
        )
        .await
        .map_err(error_response)?;

    Ok(Redirect::to(&asset_location(&asset.name)).into_response())
}

/// GET /assets/object/:name
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    match state.assets.get_asset(&name).await.map_err(error_response)? {
        Some(asset) => Ok(Json(asset).into_response()),
        None => Ok(Redirect::to("/").into_response()),
    }
}

/// GET /assets/object/:name/delete
pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Redirect> {
    state.assets.delete_asset(&name).await.map_err(error_response)?;
    Ok(Redirect::to("/assets"))
}
