//! Asset types

use serde::{Deserialize, Serialize};

/// MIME types accepted for uploaded assets
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/gif", "image/jpeg"];

/// A registered, uniquely named reference to an uploaded object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Asset {
    pub name: String,
    /// Public URL substituted for `@asset:<name>`
    pub url: String,
    /// Size of the stored object in bytes
    pub size: i64,
}

/// Whether `mime` is in [`ACCEPTED_MIME_TYPES`]
pub fn is_accepted_mime(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime)
}

/// Whether `name` can safely become part of an object key
///
/// Names stay a single key segment: no separators, no control characters,
/// and not `.` or `..`.
pub fn is_valid_asset_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}

/// Object storage key for an asset: `<prefix>/<name>.<subtype>`
///
/// The subtype is whatever follows `image/` in the MIME type, so
/// `image/jpeg` gives a `.jpeg` suffix.
pub fn object_key(prefix: &str, name: &str, mime: &str) -> String {
    let subtype = mime.strip_prefix("image/").unwrap_or(mime);
    let prefix = prefix.trim_end_matches('/');

    if prefix.is_empty() {
        format!("{}.{}", name, subtype)
    } else {
        format!("{}/{}.{}", prefix, name, subtype)
    }
}
