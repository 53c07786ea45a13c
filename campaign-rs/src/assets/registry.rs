//! Asset registry backed by SQLite

use bytes::Bytes;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::resolver::AssetSnapshot;
use super::types::{
    is_accepted_mime, is_valid_asset_name, object_key, Asset, ACCEPTED_MIME_TYPES,
};
use crate::error::{CampaignError, Result};
use crate::storage::ObjectStore;

/// Maps asset names to stored object URLs
#[derive(Clone)]
pub struct AssetRegistry {
    db: SqlitePool,
}

impl AssetRegistry {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the assets table
    ///
    /// `name` is the primary key, so two racing registrations of the same
    /// name cannot both land.
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assets (
                name TEXT PRIMARY KEY,
                url TEXT NOT NULL,
                size INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// All assets, in whatever order SQLite returns them
    pub async fn list_assets(&self) -> Result<Vec<Asset>> {
        let assets = sqlx::query_as::<_, Asset>("SELECT name, url, size FROM assets")
            .fetch_all(&self.db)
            .await?;

        Ok(assets)
    }

    pub async fn get_asset(&self, name: &str) -> Result<Option<Asset>> {
        let asset = sqlx::query_as::<_, Asset>("SELECT name, url, size FROM assets WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.db)
            .await?;

        Ok(asset)
    }

    /// Insert a new asset
    ///
    /// A name that is already taken is reported as [`CampaignError::DuplicateAsset`].
    pub async fn register_asset(&self, name: &str, url: &str, size: i64) -> Result<Asset> {
        let inserted = sqlx::query("INSERT INTO assets (name, url, size) VALUES (?, ?, ?)")
            .bind(name)
            .bind(url)
            .bind(size)
            .execute(&self.db)
            .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(CampaignError::DuplicateAsset(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        info!(name, url, size, "Asset registered");

        Ok(Asset {
            name: name.to_string(),
            url: url.to_string(),
            size,
        })
    }

    /// Remove an asset; unknown names are ignored
    pub async fn delete_asset(&self, name: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM assets WHERE name = ?")
            .bind(name)
            .execute(&self.db)
            .await?;

        debug!(name, removed = result.rows_affected(), "Asset delete");

        Ok(())
    }

    /// Read-only copy of the registry for one resolution pass
    pub async fn snapshot(&self) -> Result<AssetSnapshot> {
        Ok(AssetSnapshot::new(self.list_assets().await?))
    }

    /// Replace every `@asset:<name>` in `source` against the current registry
    pub async fn resolve(&self, source: &str) -> Result<String> {
        Ok(self.snapshot().await?.resolve(source))
    }

    /// Validate, store and register an uploaded asset
    ///
    /// The uniqueness, MIME and name checks all run before anything is
    /// written to the object store or the database.
    pub async fn upload(
        &self,
        store: &dyn ObjectStore,
        key_prefix: &str,
        name: &str,
        bytes: Bytes,
        mime: &str,
    ) -> Result<Asset> {
        if self.get_asset(name).await?.is_some() {
            return Err(CampaignError::DuplicateAsset(name.to_string()));
        }

        if !is_accepted_mime(mime) {
            return Err(CampaignError::UnsupportedMimeType {
                mime: mime.to_string(),
                accepted: ACCEPTED_MIME_TYPES.to_vec(),
            });
        }

        if !is_valid_asset_name(name) {
            return Err(CampaignError::InvalidAssetName(name.to_string()));
        }

        let key = object_key(key_prefix, name, mime);
        let size = bytes.len() as i64;
        let url = store.put_object(&key, bytes, mime).await?;

        self.register_asset(name, &url, size).await
    }
}
