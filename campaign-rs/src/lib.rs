//! campaign-rs: MJML email template studio
//!
//! Author MJML email templates, preview them as HTML and publish them to a
//! Sendy campaign server.
//!
//! # Pipeline
//!
//! 1. A stored [`Template`](templates::Template) supplies MJML source.
//! 2. `@asset:<name>` tokens are replaced with URLs from a snapshot of the
//!    [`AssetRegistry`](assets::AssetRegistry).
//! 3. [`MjmlRenderer`](templates::MjmlRenderer) compiles the result to HTML.
//! 4. Optionally, a [`CampaignPublisher`](publish::CampaignPublisher) posts the
//!    HTML and campaign fields to the campaign API.
//!
//! # Example
//!
//! ```no_run
//! use campaign_rs::assets::AssetRegistry;
//! use campaign_rs::templates::TemplateManager;
//! use sqlx::SqlitePool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = SqlitePool::connect("sqlite://campaign.db?mode=rwc").await?;
//!     let assets = AssetRegistry::new(pool.clone());
//!     let templates = TemplateManager::new(pool);
//!     assets.init_db().await?;
//!     templates.init_db().await?;
//!
//!     let id = templates
//!         .create_template("<mjml><mj-body></mj-body></mjml>", "Hello")
//!         .await?;
//!     let html = templates.render_template(&id, &assets).await?.into_body();
//!     println!("{}", html);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`assets`]: Asset registry and `@asset:` resolution
//! - [`templates`]: Template store and MJML rendering
//! - [`publish`]: Campaign API connector
//! - [`storage`]: Object storage backends for uploads
//! - [`api`]: HTTP routes
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling

pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod publish;
pub mod storage;
pub mod templates;

// Re-export commonly used types
pub use config::Config;
pub use error::{CampaignError, Result};
