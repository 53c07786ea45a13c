//! Integration tests for the HTTP routes

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use campaign_rs::api::{router, AppState};
use campaign_rs::assets::AssetRegistry;
use campaign_rs::config::SendyConfig;
use campaign_rs::publish::{Campaign, CampaignPublisher};
use campaign_rs::storage::LocalObjectStore;
use campaign_rs::templates::TemplateManager;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "campaign-rs-test-boundary";

struct RecordingPublisher {
    seen: Mutex<Vec<Campaign>>,
}

#[async_trait]
impl CampaignPublisher for RecordingPublisher {
    async fn publish(&self, campaign: &Campaign) -> campaign_rs::Result<String> {
        self.seen.lock().unwrap().push(campaign.clone());
        Ok("Campaign created".to_string())
    }
}

struct TestApp {
    state: Arc<AppState>,
    publisher: Arc<RecordingPublisher>,
    _assets_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let templates = TemplateManager::new(pool.clone());
        templates.init_db().await.unwrap();
        let assets = AssetRegistry::new(pool);
        assets.init_db().await.unwrap();

        let assets_dir = tempfile::tempdir().unwrap();
        let publisher = Arc::new(RecordingPublisher {
            seen: Mutex::new(Vec::new()),
        });

        let object_store = LocalObjectStore::new(assets_dir.path(), "http://localhost/static");
        let static_files = object_store.static_files();

        let state = Arc::new(AppState {
            templates,
            assets,
            object_store: Arc::new(object_store),
            publisher: publisher.clone(),
            sendy: SendyConfig {
                server: "https://sendy.example.com".to_string(),
                api_key: "sendy-key".to_string(),
                brands: "1:Main,2:Events".to_string(),
            },
            key_prefix: "mail".to_string(),
            static_files,
        });

        Self {
            state,
            publisher,
            _assets_dir: assets_dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        router(self.state.clone()).oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post_form(&self, uri: &str, form: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn upload(&self, name: &str, mime: &str, data: &str) -> Response<Body> {
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"assetname\"\r\n\r\n\
             {name}\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"assetfile\"; filename=\"upload\"\r\n\
             Content-Type: {mime}\r\n\r\n\
             {data}\r\n\
             --{b}--\r\n",
            b = BOUNDARY,
        );

        self.send(
            Request::builder()
                .method("POST")
                .uri("/assets/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_new_creates_and_redirects_to_editor() {
    let app = TestApp::new().await;

    let response = app.get("/edit/new").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let target = location(&response);
    let id = target.strip_prefix("/edit/").unwrap();
    let template = app.state.templates.get_template(id).await.unwrap().unwrap();
    assert_eq!(template.subject, "Hello World!");

    let editor = body_json(app.get(&target).await).await;
    assert_eq!(editor["template"]["id"], id);
    assert!(editor["assets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_editor_for_missing_template_redirects_to_dashboard() {
    let app = TestApp::new().await;

    let response = app.get("/edit/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_guarded_routes_redirect_to_404() {
    let app = TestApp::new().await;

    for uri in [
        "/edit/missing/render",
        "/edit/missing/clone",
        "/edit/missing/delete/confirm",
        "/edit/missing/export",
        "/edit/missing/export/done",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/404", "{}", uri);
    }
}

#[tokio::test]
async fn test_render_route_returns_html() {
    let app = TestApp::new().await;
    let id = app
        .state
        .templates
        .create_template("<mjml><mj-body></mj-body></mjml>", "Hi")
        .await
        .unwrap();

    let response = app.get(&format!("/edit/{}/render", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<html"));
}

#[tokio::test]
async fn test_render_route_failure_string() {
    let app = TestApp::new().await;
    let id = app
        .state
        .templates
        .create_template("<mjml><mj-body>", "Broken")
        .await
        .unwrap();

    let response = app.get(&format!("/edit/{}/render", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "compile failed--check your mjml!");
}

#[tokio::test]
async fn test_save_route() {
    let app = TestApp::new().await;
    let id = app.state.templates.create_template("a", "b").await.unwrap();

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri(format!("/edit/{}/save", id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"body":"<mjml></mjml>","subject":"Saved"}"#))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "success": true }));

    let template = app.state.templates.get_template(&id).await.unwrap().unwrap();
    assert_eq!(template.body, "<mjml></mjml>");
    assert_eq!(template.subject, "Saved");
}

#[tokio::test]
async fn test_metadata_route() {
    let app = TestApp::new().await;
    let id = app.state.templates.create_template("a", "b").await.unwrap();

    let response = app
        .post_form(&format!("/edit/{}/metadata", id), "subject=Starter&is_template=on")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/edit/{}", id));

    let template = app.state.templates.get_template(&id).await.unwrap().unwrap();
    assert_eq!(template.subject, "Starter");
    assert!(template.is_template);

    app.post_form(&format!("/edit/{}/metadata", id), "subject=Starter")
        .await;
    let template = app.state.templates.get_template(&id).await.unwrap().unwrap();
    assert!(!template.is_template);
}

#[tokio::test]
async fn test_clone_and_delete_routes() {
    let app = TestApp::new().await;
    let id = app.state.templates.create_template("a", "Promo").await.unwrap();

    let response = app.get(&format!("/edit/{}/clone", id)).await;
    let clone_id = location(&response).trim_start_matches("/edit/").to_string();
    let clone = app.state.templates.get_template(&clone_id).await.unwrap().unwrap();
    assert_eq!(clone.subject, "Promo (copy)");

    let response = app.get(&format!("/edit/{}/delete/confirm", id)).await;
    assert_eq!(location(&response), "/dashboard");
    assert!(!app.state.templates.template_exists(&id).await.unwrap());
}

#[tokio::test]
async fn test_dashboard_lists_starter_templates() {
    let app = TestApp::new().await;
    let starter = app.state.templates.create_template("a", "Starter").await.unwrap();
    app.state.templates.create_template("b", "Draft").await.unwrap();
    app.state
        .templates
        .update_metadata(&starter, "Starter", true)
        .await
        .unwrap();

    let dashboard = body_json(app.get("/dashboard").await).await;

    assert_eq!(dashboard["templates"].as_array().unwrap().len(), 2);
    let starters = dashboard["starter_templates"].as_array().unwrap();
    assert_eq!(starters.len(), 1);
    assert_eq!(starters[0]["id"], starter);
}

#[tokio::test]
async fn test_export_flow() {
    let app = TestApp::new().await;
    let id = app
        .state
        .templates
        .create_template("<mjml><mj-body></mj-body></mjml>", "News")
        .await
        .unwrap();

    let form = body_json(app.get(&format!("/edit/{}/export", id)).await).await;
    assert_eq!(form["brands"][1]["name"], "Events");

    let response = app
        .post_form(
            &format!("/edit/{}/export", id),
            "from_name=Society&from_email=news%40example.com&reply_to=reply%40example.com&title=October&brand_id=1",
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert_eq!(target, format!("/edit/{}/export/done?msg=Campaign+created", id));

    let seen = app.publisher.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].api_key, "sendy-key");
    assert_eq!(seen[0].from_email, "news@example.com");
    assert_eq!(seen[0].subject, "News");

    let done = body_json(app.get(&target).await).await;
    assert_eq!(done["msg"], "Campaign created");
    assert_eq!(done["sendy_url"], "https://sendy.example.com");
}

#[tokio::test]
async fn test_asset_upload_flow() {
    let app = TestApp::new().await;

    let response = app.upload("logo", "image/png", "PNGDATA").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/assets/object/logo");

    let asset = body_json(app.get("/assets/object/logo").await).await;
    assert_eq!(asset["url"], "http://localhost/static/mail/logo.png");
    assert_eq!(asset["size"], 7);

    let listed = body_json(app.get("/assets").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app.get("/assets/object/logo/delete").await;
    assert_eq!(location(&response), "/assets");
    assert_eq!(location(&app.get("/assets/object/logo").await), "/");
}

#[tokio::test]
async fn test_asset_upload_validation_messages() {
    let app = TestApp::new().await;

    let response = app.upload("doc", "text/plain", "hello").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "mime type text/plain not in [image/png, image/gif, image/jpeg]"
    );

    app.upload("logo", "image/png", "1").await;
    let response = app.upload("logo", "image/png", "2").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Asset name logo is not unique!");

    let listed = body_json(app.get("/assets").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_uploaded_asset_is_served() {
    let app = TestApp::new().await;

    app.upload("logo", "image/png", "PNGDATA").await;
    let asset = body_json(app.get("/assets/object/logo").await).await;
    let url = asset["url"].as_str().unwrap().to_string();
    let path = url.strip_prefix("http://localhost").unwrap();

    let response = app.get(path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    assert_eq!(body_text(response).await, "PNGDATA");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = TestApp::new().await;

    let data = "x".repeat(11 * 1024 * 1024);
    let response = app.upload("huge", "image/png", &data).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let listed = body_json(app.get("/assets").await).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_with_path_in_name_is_rejected() {
    let app = TestApp::new().await;

    let response = app.upload("../../x", "image/png", "PNGDATA").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Invalid asset name ../../x");
    let listed = body_json(app.get("/assets").await).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new().await;

    let response = app.get("/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
