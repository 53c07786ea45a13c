//! API endpoints for the template editor, preview and export

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::api::handlers::{error_response, require_template, ApiResult, AppState};
use crate::assets::Asset;
use crate::config::Brand;
use crate::publish::{export_template, ExportForm};
use crate::templates::types::{
    SaveTemplateRequest, UpdateMetadataRequest, DEFAULT_BODY, DEFAULT_SUBJECT,
};
use crate::templates::Template;

#[derive(Serialize)]
pub struct EditorView {
    pub template: Template,
    pub assets: Vec<Asset>,
}

#[derive(Serialize)]
pub struct ExportView {
    pub template: Template,
    pub brands: Vec<Brand>,
}

#[derive(Serialize)]
pub struct ExportDoneView {
    pub template: Template,
    pub msg: Option<String>,
    pub sendy_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportDoneQuery {
    pub msg: Option<String>,
}

/// GET /edit/:id - Open the editor, or create a template when `id` is `new`
pub async fn edit_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    if id == "new" {
        let new_id = state
            .templates
            .create_template(DEFAULT_BODY, DEFAULT_SUBJECT)
            .await
            .map_err(error_response)?;
        return Ok(Redirect::to(&format!("/edit/{}", new_id)).into_response());
    }

    let template = match state.templates.get_template(&id).await.map_err(error_response)? {
        Some(template) => template,
        None => return Ok(Redirect::to("/dashboard").into_response()),
    };
    let assets = state.assets.list_assets().await.map_err(error_response)?;

    Ok(Json(EditorView { template, assets }).into_response())
}

/// GET /edit/:id/clone
pub async fn clone_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Redirect> {
    let template = require_template(&state, &id).await?;

    let new_id = state
        .templates
        .clone_template(&template.id)
        .await
        .map_err(error_response)?;

    Ok(Redirect::to(&format!("/edit/{}", new_id)))
}

/// GET /edit/:id/delete - What is about to be deleted
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Template>> {
    let template = require_template(&state, &id).await?;
    Ok(Json(template))
}

/// GET /edit/:id/delete/confirm
pub async fn confirm_delete_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Redirect> {
    let template = require_template(&state, &id).await?;

    state
        .templates
        .delete_template(&template.id)
        .await
        .map_err(error_response)?;

    Ok(Redirect::to("/dashboard"))
}

/// POST /edit/:id/save - Store body and subject from the editor
pub async fn save_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<SaveTemplateRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .templates
        .save_template(&id, &payload.body, &payload.subject)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({ "success": true })))
}

/// POST /edit/:id/metadata - Subject and template flag from the settings form
pub async fn update_metadata(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(payload): Form<UpdateMetadataRequest>,
) -> ApiResult<Redirect> {
    let template = require_template(&state, &id).await?;

    state
        .templates
        .update_metadata(&template.id, &payload.subject, payload.is_template())
        .await
        .map_err(error_response)?;

    Ok(Redirect::to(&format!("/edit/{}", template.id)))
}

/// GET /edit/:id/render - Compiled HTML, or the compile failure message
pub async fn render_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    let template = require_template(&state, &id).await?;

    let rendered = state
        .templates
        .render_template(&template.id, &state.assets)
        .await
        .map_err(error_response)?;

    Ok(Html(rendered.into_body()))
}

/// GET /edit/:id/export - Data for the export form
pub async fn export_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ExportView>> {
    let template = require_template(&state, &id).await?;

    Ok(Json(ExportView {
        template,
        brands: state.brands(),
    }))
}

/// POST /edit/:id/export - Render and publish, then redirect with the API's answer
pub async fn export(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<ExportForm>,
) -> ApiResult<Redirect> {
    let template = require_template(&state, &id).await?;

    let record = export_template(
        &state.templates,
        &state.assets,
        state.publisher.as_ref(),
        &state.sendy.api_key,
        &template.id,
        form,
    )
    .await
    .map_err(error_response)?;

    Ok(Redirect::to(&format!(
        "/edit/{}/export/done?{}",
        template.id,
        record.done_query()
    )))
}

/// GET /edit/:id/export/done
pub async fn export_done(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ExportDoneQuery>,
) -> ApiResult<Json<ExportDoneView>> {
    let template = require_template(&state, &id).await?;

    Ok(Json(ExportDoneView {
        template,
        msg: query.msg,
        sendy_url: state.sendy.server.clone(),
    }))
}
