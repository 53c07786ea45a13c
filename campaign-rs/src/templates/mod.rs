//! Email templates
//!
//! MJML documents with a subject line, stored in SQLite and compiled to
//! HTML on demand.

pub mod manager;
pub mod renderer;
pub mod types;

pub use manager::TemplateManager;
pub use renderer::{CompileError, MjmlRenderer, COMPILE_FAILED_MESSAGE};
pub use types::{RenderResult, Template};
