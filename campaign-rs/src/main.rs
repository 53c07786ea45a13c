use campaign_rs::api::{ApiServer, AppState};
use campaign_rs::assets::AssetRegistry;
use campaign_rs::config::{Config, StorageBackend};
use campaign_rs::publish::SendyClient;
use campaign_rs::storage::{LocalObjectStore, ObjectStore, S3ObjectStore, StaticFiles};
use campaign_rs::templates::TemplateManager;
use campaign_rs::CampaignError;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("campaign_rs={},tower_http={}", config.logging.level, config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let mut config = if Path::new(&config_path).exists() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };
    config.apply_env_overrides();

    init_logging(&config);

    info!("Starting campaign-rs v{}", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", config.server.listen_addr);
    info!("  Database: {}", config.database.url);
    info!("  Campaign server: {}", config.sendy.server);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;

    let templates = TemplateManager::new(pool.clone());
    templates.init_db().await?;
    let assets = AssetRegistry::new(pool);
    assets.init_db().await?;

    let (object_store, static_files): (Arc<dyn ObjectStore>, Option<StaticFiles>) =
        match config.storage.backend {
            StorageBackend::Local => {
                let store = LocalObjectStore::new(
                    config.storage.local_root.clone(),
                    config.storage.public_base_url.clone(),
                );
                let files = store.static_files();
                if files.is_none() {
                    warn!(
                        "public_base_url {} has no path; local assets must be served by another host",
                        config.storage.public_base_url
                    );
                }
                (Arc::new(store) as Arc<dyn ObjectStore>, files)
            }
            StorageBackend::S3 => {
                let s3 = config.storage.s3.as_ref().ok_or_else(|| {
                    CampaignError::Config(
                        "storage.backend is s3 but [storage.s3] is missing".to_string(),
                    )
                })?;
                (Arc::new(S3ObjectStore::new(s3)?) as Arc<dyn ObjectStore>, None)
            }
        };
    info!("  Object storage: {:?}", config.storage.backend);

    let publisher = Arc::new(SendyClient::new(config.sendy.server.clone())?);

    let state = AppState {
        templates,
        assets,
        object_store,
        publisher,
        sendy: config.sendy.clone(),
        key_prefix: config.storage.key_prefix.clone(),
        static_files,
    };

    ApiServer::new(state, config.server.listen_addr.clone())
        .run()
        .await?;

    Ok(())
}
