//! Template store for CRUD and lifecycle operations

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assets::AssetRegistry;
use crate::error::{CampaignError, Result};
use crate::templates::renderer::MjmlRenderer;
use crate::templates::types::{RenderResult, Template, TemplateRow};

/// Suffix appended to the subject of a cloned template
pub const CLONE_SUFFIX: &str = " (copy)";

/// Manages email templates with database persistence
#[derive(Clone)]
pub struct TemplateManager {
    db: SqlitePool,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl TemplateManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the templates table
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS templates (
                id TEXT PRIMARY KEY,
                last_used INTEGER NOT NULL,
                body TEXT NOT NULL,
                subject TEXT NOT NULL,
                is_template INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_templates_last_used ON templates(last_used)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Create a new template and return its id
    pub async fn create_template(&self, body: &str, subject: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO templates (id, last_used, body, subject, is_template)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(&id)
        .bind(now_millis())
        .bind(body)
        .bind(subject)
        .execute(&self.db)
        .await?;

        info!(id = %id, "Template created");

        Ok(id)
    }

    pub async fn get_template(&self, id: &str) -> Result<Option<Template>> {
        let row = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, last_used, body, subject, is_template
            FROM templates
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Template::from))
    }

    pub async fn template_exists(&self, id: &str) -> Result<bool> {
        let row: Option<(String,)> = sqlx::query_as("SELECT id FROM templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.is_some())
    }

    /// Overwrite body and subject and refresh `last_used`
    ///
    /// An unknown id writes nothing; callers check existence first.
    pub async fn save_template(&self, id: &str, body: &str, subject: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE templates
            SET last_used = ?, body = ?, subject = ?
            WHERE id = ?
            "#,
        )
        .bind(now_millis())
        .bind(body)
        .bind(subject)
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            debug!(id, "Save matched no template");
        }

        Ok(())
    }

    /// Refresh subject, the template flag and `last_used`
    pub async fn update_metadata(&self, id: &str, subject: &str, is_template: bool) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE templates
            SET last_used = ?, is_template = ?, subject = ?
            WHERE id = ?
            "#,
        )
        .bind(now_millis())
        .bind(is_template)
        .bind(subject)
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            debug!(id, "Metadata update matched no template");
        }

        Ok(())
    }

    /// Delete a template; deleting an unknown id succeeds
    pub async fn delete_template(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() > 0 {
            info!(id, "Template deleted");
        }

        Ok(())
    }

    /// Copy body and subject into a new template whose subject ends in " (copy)"
    pub async fn clone_template(&self, id: &str) -> Result<String> {
        let source = self
            .get_template(id)
            .await?
            .ok_or_else(|| CampaignError::NotFound(format!("Template not found: {}", id)))?;

        let subject = format!("{}{}", source.subject, CLONE_SUFFIX);
        let new_id = self.create_template(&source.body, &subject).await?;

        info!(source = id, id = %new_id, "Template cloned");

        Ok(new_id)
    }

    /// All templates, most recently touched first
    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, last_used, body, subject, is_template
            FROM templates
            ORDER BY last_used DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Template::from).collect())
    }

    /// Resolve asset tokens and compile the template to HTML
    ///
    /// A compile failure is not an error: it comes back as
    /// [`RenderResult::Failed`] and the diagnostic goes to the log.
    pub async fn render_template(&self, id: &str, assets: &AssetRegistry) -> Result<RenderResult> {
        let template = self
            .get_template(id)
            .await?
            .ok_or_else(|| CampaignError::NotFound(format!("Template not found: {}", id)))?;

        let snapshot = assets.snapshot().await?;
        let resolved = snapshot.resolve(&template.body);

        match MjmlRenderer::compile(&resolved) {
            Ok(html) => {
                debug!(id, size = html.len(), "Template rendered");
                Ok(RenderResult::Html(html))
            }
            Err(e) => {
                warn!(id, error = %e, "Template failed to compile");
                Ok(RenderResult::compile_failed())
            }
        }
    }
}
