//! Asset registry
//!
//! Uploaded images are registered under a unique name and referenced from
//! template source with `@asset:<name>` tokens.

pub mod registry;
pub mod resolver;
pub mod types;

pub use registry::AssetRegistry;
pub use resolver::{AssetSnapshot, TOKEN_PREFIX};
pub use types::{Asset, ACCEPTED_MIME_TYPES};
