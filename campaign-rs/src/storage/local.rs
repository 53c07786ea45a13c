//! Filesystem object store

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;
use url::Url;

use super::ObjectStore;
use crate::error::{CampaignError, Result};

/// A local store's directory as this server exposes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFiles {
    /// URL path the directory is mounted under, e.g. `/static`
    pub mount: String,
    pub root: PathBuf,
}

/// Writes objects below `root`; URLs are `public_base_url/key`
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Mount point implied by the path of `public_base_url`
    ///
    /// `None` when the base URL has no path, in which case the objects are
    /// expected to be served by some other host.
    pub fn static_files(&self) -> Option<StaticFiles> {
        let base = Url::parse(&self.public_base_url).ok()?;
        let mount = base.path().trim_end_matches('/');
        if mount.is_empty() {
            return None;
        }

        Some(StaticFiles {
            mount: mount.to_string(),
            root: self.root.clone(),
        })
    }

    /// Map a key onto a path that cannot leave `root`
    fn resolve_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));

        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(CampaignError::Storage(format!("Invalid object key: {}", key)));
        }

        Ok(self.root.join(relative))
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_object(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String> {
        let path = self.resolve_path(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &bytes).await?;

        debug!(key, content_type, size = bytes.len(), "Stored object on local filesystem");

        Ok(self.public_url(key))
    }
}
