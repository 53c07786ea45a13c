//! Campaign publishing
//!
//! Export runs the whole pipeline every time: render the stored template,
//! attach the campaign fields, and make one call to the campaign API. The
//! API's answer is passed back untouched.

pub mod sendy;
pub mod types;

use async_trait::async_trait;
use tracing::warn;

use crate::assets::AssetRegistry;
use crate::error::{CampaignError, Result};
use crate::templates::TemplateManager;

pub use sendy::SendyClient;
pub use types::{Campaign, ExportForm, ExportRecord};

/// External service that turns compiled HTML into a campaign
#[async_trait]
pub trait CampaignPublisher: Send + Sync {
    /// Submit the campaign and return the raw response body
    ///
    /// Only transport-level failures are errors; whatever the service says in
    /// a successful response is returned as-is.
    async fn publish(&self, campaign: &Campaign) -> Result<String>;
}

/// Render a template and publish it as a campaign
pub async fn export_template(
    templates: &TemplateManager,
    assets: &AssetRegistry,
    publisher: &dyn CampaignPublisher,
    api_key: &str,
    template_id: &str,
    form: ExportForm,
) -> Result<ExportRecord> {
    let template = templates
        .get_template(template_id)
        .await?
        .ok_or_else(|| CampaignError::NotFound(format!("Template not found: {}", template_id)))?;

    let rendered = templates.render_template(template_id, assets).await?;
    if rendered.is_failed() {
        warn!(id = template_id, "Exporting a template that failed to compile");
    }

    let campaign = Campaign {
        api_key: api_key.to_string(),
        from_name: form.from_name,
        from_email: form.from_email,
        reply_to: form.reply_to,
        title: form.title,
        brand_id: form.brand_id,
        subject: template.subject,
        html_text: rendered.into_body(),
    };

    let response = publisher.publish(&campaign).await?;

    Ok(ExportRecord {
        template_id: template_id.to_string(),
        campaign,
        response,
    })
}
