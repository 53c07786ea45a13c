//! Template types and data structures

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::renderer::COMPILE_FAILED_MESSAGE;

/// Body given to templates created from the editor's "new" action
pub const DEFAULT_BODY: &str = r#"<mjml>
  <mj-body>
    <mj-section>
      <mj-column>
        <mj-text>Hello World!</mj-text>
      </mj-column>
    </mj-section>
  </mj-body>
</mjml>"#;

/// Subject given to templates created from the editor's "new" action
pub const DEFAULT_SUBJECT: &str = "Hello World!";

/// Stored MJML document plus subject and usage metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// MJML source
    pub body: String,
    /// Email subject line
    pub subject: String,
    /// Whether this document is offered as a starting point for others
    pub is_template: bool,
    /// Milliseconds since the Unix epoch of the last body or metadata change
    pub last_used: i64,
    /// `last_used` as an unpadded UTC `YYYY-M-D` date
    pub last_used_str: String,
}

/// Raw `templates` row as SQLite hands it back
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateRow {
    pub id: String,
    pub last_used: i64,
    pub body: String,
    pub subject: String,
    pub is_template: i64,
}

impl From<TemplateRow> for Template {
    fn from(row: TemplateRow) -> Self {
        Template {
            id: row.id,
            body: row.body,
            subject: row.subject,
            is_template: row.is_template == 1,
            last_used_str: format_last_used(row.last_used),
            last_used: row.last_used,
        }
    }
}

/// Format epoch milliseconds as `YYYY-M-D` in UTC, without zero padding
pub fn format_last_used(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(date) => format!("{}-{}-{}", date.year(), date.month(), date.day()),
        None => String::new(),
    }
}

/// Outcome of rendering a template; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    Html(String),
    Failed { message: String },
}

impl RenderResult {
    pub(crate) fn compile_failed() -> Self {
        RenderResult::Failed {
            message: COMPILE_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RenderResult::Failed { .. })
    }

    /// The text handed to whoever asked for the render: HTML or the failure message
    pub fn into_body(self) -> String {
        match self {
            RenderResult::Html(html) => html,
            RenderResult::Failed { message } => message,
        }
    }
}

/// Body of `POST /edit/:id/save`
#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    pub body: String,
    pub subject: String,
}

/// Form of `POST /edit/:id/metadata`
#[derive(Debug, Deserialize)]
pub struct UpdateMetadataRequest {
    pub subject: String,
    /// HTML checkbox value, `"on"` when ticked and absent otherwise
    pub is_template: Option<String>,
}

impl UpdateMetadataRequest {
    pub fn is_template(&self) -> bool {
        self.is_template.as_deref() == Some("on")
    }
}
