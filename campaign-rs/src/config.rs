use crate::error::{CampaignError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub sendy: SendyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Prepended to every object key
    pub key_prefix: String,
    pub local_root: String,
    pub public_base_url: String,
    pub s3: Option<S3Config>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Config {
    /// e.g. `https://ams3.digitaloceanspaces.com`
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Address objects as `<endpoint>/<bucket>/<key>` instead of `<bucket>.<endpoint>/<key>`
    #[serde(default)]
    pub force_path_style: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendyConfig {
    /// Base URL of the campaign server; `/api/campaigns/create.php` is appended
    pub server: String,
    pub api_key: String,
    /// `id:name` pairs separated by commas
    pub brands: String,
}

/// A sending brand the export form can target
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl SendyConfig {
    pub fn brands(&self) -> Vec<Brand> {
        parse_brands(&self.brands)
    }
}

/// Parse `"1:Newsletter,2:Events"` into brands; entries without a name keep an empty one
pub fn parse_brands(raw: &str) -> Vec<Brand> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, name) = entry.split_once(':').unwrap_or((entry, ""));
            Brand {
                id: id.trim().to_string(),
                name: name.trim().to_string(),
            }
        })
        .collect()
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CampaignError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| CampaignError::Config(e.to_string()))
    }

    /// Overlay deployment secrets and endpoints from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE") {
            self.database.url = url;
        }
        if let Some(port) = lookup("APP_PORT") {
            self.server.listen_addr = format!("0.0.0.0:{}", port);
        }
        if let Some(server) = lookup("SENDY_SERVER") {
            self.sendy.server = server;
        }
        if let Some(api_key) = lookup("SENDY_API_KEY") {
            self.sendy.api_key = api_key;
        }
        if let Some(brands) = lookup("SENDY_BRANDS") {
            self.sendy.brands = brands;
        }

        let bucket = lookup("S3_BUCKET");
        let endpoint = lookup("S3_API_ENDPOINT");
        let access_key = lookup("S3_API_ACCESS_KEY");
        let secret_key = lookup("S3_API_SECRET_KEY");
        if bucket.is_some() || endpoint.is_some() || access_key.is_some() || secret_key.is_some() {
            let s3 = self.storage.s3.get_or_insert_with(|| S3Config {
                endpoint: String::new(),
                bucket: String::new(),
                region: "us-east-1".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                force_path_style: false,
            });
            if let Some(bucket) = bucket {
                s3.bucket = bucket;
            }
            if let Some(endpoint) = endpoint {
                s3.endpoint = if endpoint.contains("://") {
                    endpoint
                } else {
                    format!("https://{}", endpoint)
                };
            }
            if let Some(access_key) = access_key {
                s3.access_key = access_key;
            }
            if let Some(secret_key) = secret_key {
                s3.secret_key = secret_key;
            }
        }
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "0.0.0.0:3000".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://campaign.db?mode=rwc".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                key_prefix: "mail".to_string(),
                local_root: "/tmp/campaign-assets".to_string(),
                public_base_url: "http://localhost:3000/static".to_string(),
                s3: None,
            },
            sendy: SendyConfig {
                server: "http://localhost:8080".to_string(),
                api_key: String::new(),
                brands: String::new(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
