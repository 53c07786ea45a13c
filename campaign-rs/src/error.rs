use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Asset name {0} is not unique!")]
    DuplicateAsset(String),

    #[error("mime type {mime} not in [{}]", .accepted.join(", "))]
    UnsupportedMimeType {
        mime: String,
        accepted: Vec<&'static str>,
    },

    #[error("Invalid asset name {0}")]
    InvalidAssetName(String),

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CampaignError {
    /// True for failures the user can fix by changing their input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CampaignError::DuplicateAsset(_)
                | CampaignError::UnsupportedMimeType { .. }
                | CampaignError::InvalidAssetName(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CampaignError>;
