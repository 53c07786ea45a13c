//! Shared API state, error mapping and the small top-level handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::assets::{Asset, AssetRegistry};
use crate::config::{Brand, SendyConfig};
use crate::error::CampaignError;
use crate::publish::CampaignPublisher;
use crate::storage::{ObjectStore, StaticFiles};
use crate::templates::{Template, TemplateManager};

/// Everything a request handler can reach
pub struct AppState {
    pub templates: TemplateManager,
    pub assets: AssetRegistry,
    pub object_store: Arc<dyn ObjectStore>,
    pub publisher: Arc<dyn CampaignPublisher>,
    pub sendy: SendyConfig,
    /// Prefix for object storage keys of uploaded assets
    pub key_prefix: String,
    /// Local object directory to serve, when assets live on this host
    pub static_files: Option<StaticFiles>,
}

impl AppState {
    pub fn brands(&self) -> Vec<Brand> {
        self.sendy.brands()
    }
}

/// Response with error details
#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

pub type ApiResult<T> = Result<T, Response>;

/// Map a pipeline error onto the response the user sees
pub fn error_response(e: CampaignError) -> Response {
    match e {
        CampaignError::NotFound(_) => Redirect::to("/404").into_response(),
        e if e.is_validation() => (StatusCode::OK, e.to_string()).into_response(),
        CampaignError::Transport(_) | CampaignError::Http(_) | CampaignError::Storage(_) => {
            error!(error = %e, "Upstream service failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiError {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
        e => {
            error!(error = %e, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Look a template up, redirecting to the 404 view when it is missing
pub async fn require_template(state: &AppState, id: &str) -> ApiResult<Template> {
    state
        .templates
        .get_template(id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| Redirect::to("/404").into_response())
}

#[derive(Serialize)]
pub struct Dashboard {
    pub templates: Vec<Template>,
    /// Subset of `templates` flagged as starting points
    pub starter_templates: Vec<Template>,
    pub assets: Vec<Asset>,
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// GET /dashboard
pub async fn dashboard(State(state): State<Arc<AppState>>) -> ApiResult<Json<Dashboard>> {
    let templates = state.templates.list_templates().await.map_err(error_response)?;
    let assets = state.assets.list_assets().await.map_err(error_response)?;
    let starter_templates = templates.iter().filter(|t| t.is_template).cloned().collect();

    Ok(Json(Dashboard {
        templates,
        starter_templates,
        assets,
    }))
}

/// Fallback for unknown paths and the `/404` view
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error: "Not found".to_string(),
        }),
    )
}
