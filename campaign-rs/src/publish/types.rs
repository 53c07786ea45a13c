//! Campaign publishing types

use serde::{Deserialize, Serialize};

/// Everything the campaign API needs to create one campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub from_name: String,
    pub from_email: String,
    pub reply_to: String,
    pub title: String,
    pub brand_id: String,
    pub subject: String,
    /// Compiled HTML body
    pub html_text: String,
}

impl Campaign {
    /// Multipart field names and values, in submission order
    pub fn form_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("api_key", self.api_key.as_str()),
            ("from_name", self.from_name.as_str()),
            ("from_email", self.from_email.as_str()),
            ("reply_to", self.reply_to.as_str()),
            ("title", self.title.as_str()),
            ("brand_id", self.brand_id.as_str()),
            ("html_text", self.html_text.as_str()),
            ("subject", self.subject.as_str()),
        ]
    }
}

/// Campaign fields typed into the export form
#[derive(Debug, Clone, Deserialize)]
pub struct ExportForm {
    pub from_name: String,
    pub from_email: String,
    pub reply_to: String,
    pub title: String,
    pub brand_id: String,
}

/// One publish attempt: what was sent and what came back
///
/// Never stored; the response is relayed to the caller and forgotten.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRecord {
    pub template_id: String,
    pub campaign: Campaign,
    /// Raw response body from the campaign API
    pub response: String,
}

impl ExportRecord {
    /// `msg=<response>` query string for the export-done redirect
    pub fn done_query(&self) -> String {
        serde_urlencoded::to_string(&[("msg", self.response.as_str())]).unwrap_or_default()
    }
}
