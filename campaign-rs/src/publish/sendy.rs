//! Sendy campaign API client

use async_trait::async_trait;
use reqwest::multipart::Form;
use std::time::Duration;
use tracing::{debug, error, info};

use super::types::Campaign;
use super::CampaignPublisher;
use crate::error::{CampaignError, Result};

/// Path of the campaign creation endpoint below the server URL
pub const CREATE_CAMPAIGN_PATH: &str = "/api/campaigns/create.php";

/// Posts campaigns to a Sendy installation
pub struct SendyClient {
    base_url: String,
    client: reqwest::Client,
}

impl SendyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CampaignError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), CREATE_CAMPAIGN_PATH)
    }
}

#[async_trait]
impl CampaignPublisher for SendyClient {
    async fn publish(&self, campaign: &Campaign) -> Result<String> {
        let form = campaign
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name, value.to_string())
            });

        let url = self.endpoint();
        debug!(url = %url, title = %campaign.title, brand_id = %campaign.brand_id, "Exporting campaign");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Campaign API unreachable");
                CampaignError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(url = %url, %status, "Campaign API request failed: {}", error_text);
            return Err(CampaignError::Transport(format!(
                "Campaign API request failed: {} - {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        info!(title = %campaign.title, response = %body, "Campaign exported");

        Ok(body)
    }
}
