//! HTTP API for campaign-rs
//!
//! Mirrors the editor workflow: dashboard, editor, preview, export and the
//! asset library.

pub mod assets;
pub mod handlers;
pub mod server;
pub mod templates;

pub use handlers::AppState;
pub use server::{router, ApiServer};
