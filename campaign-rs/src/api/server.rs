//! API Server - HTTP server for the editor, preview and export routes

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, get_service, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::handlers::{self, AppState};
use crate::api::{assets, templates};

/// Largest accepted request body (asset uploads)
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// First path segments owned by the application routes
const ROUTED_SEGMENTS: [&str; 5] = ["assets", "edit", "dashboard", "health", "404"];

fn collides_with_routes(mount: &str) -> bool {
    let first = mount.trim_start_matches('/').split('/').next().unwrap_or_default();
    ROUTED_SEGMENTS.contains(&first)
}

pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    pub fn new(state: AppState, addr: String) -> Self {
        Self {
            state: Arc::new(state),
            addr,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    pub async fn run(self) -> std::io::Result<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.addr).await?;

        info!(address = %self.addr, "API server listening");

        axum::serve(listener, app).await
    }
}

/// Routes over an existing state, also used directly by tests
pub fn router(state: Arc<AppState>) -> Router {
    let editor_routes = Router::new()
        .route("/edit/:id", get(templates::edit_template))
        .route("/edit/:id/clone", get(templates::clone_template))
        .route("/edit/:id/delete", get(templates::delete_template))
        .route("/edit/:id/delete/confirm", get(templates::confirm_delete_template))
        .route("/edit/:id/save", post(templates::save_template))
        .route("/edit/:id/metadata", post(templates::update_metadata))
        .route("/edit/:id/render", get(templates::render_template))
        .route(
            "/edit/:id/export",
            get(templates::export_form).post(templates::export),
        )
        .route("/edit/:id/export/done", get(templates::export_done));

    let asset_routes = Router::new()
        .route("/", get(assets::list_assets))
        .route("/upload", post(assets::upload_asset))
        .route("/object/:name", get(assets::get_asset))
        .route("/object/:name/delete", get(assets::delete_asset));

    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .route("/dashboard", get(handlers::dashboard))
        .route("/404", get(handlers::not_found))
        .merge(editor_routes)
        .nest("/assets", asset_routes);

    if let Some(files) = &state.static_files {
        if collides_with_routes(&files.mount) {
            warn!(mount = %files.mount, "Local assets not served: mount path overlaps application routes");
        } else {
            info!(mount = %files.mount, root = %files.root.display(), "Serving local assets");
            app = app.nest_service(&files.mount, get_service(ServeDir::new(&files.root)));
        }
    }

    app.fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
