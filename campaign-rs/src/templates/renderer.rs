//! MJML compilation
//!
//! The renderer knows nothing about assets or persistence: it takes source
//! that has already been through [`AssetSnapshot::resolve`] and turns it into
//! an HTML document.
//!
//! [`AssetSnapshot::resolve`]: crate::assets::AssetSnapshot::resolve

use mrml::mjml::Mjml;
use mrml::prelude::render::RenderOptions;
use thiserror::Error;

/// Body served in place of HTML when compilation fails
pub const COMPILE_FAILED_MESSAGE: &str = "compile failed--check your mjml!";

/// Compilation failure with the original diagnostic attached
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("MJML parse failed: {0}")]
    Parse(#[from] mrml::prelude::parser::Error),

    #[error("MJML render failed: {0}")]
    Render(#[from] mrml::prelude::render::Error),
}

/// Compiles MJML markup to HTML
pub struct MjmlRenderer;

impl MjmlRenderer {
    /// Compile resolved MJML source into an HTML document
    pub fn compile(source: &str) -> Result<String, CompileError> {
        let root = Mjml::parse(source)?;
        let html = root.render(&RenderOptions::default())?;
        Ok(html)
    }
}
