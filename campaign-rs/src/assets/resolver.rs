//! `@asset:<name>` substitution
//!
//! Resolution works against an [`AssetSnapshot`] taken once per render, so a
//! single render never sees the registry change underneath it. The source is
//! scanned once: at every `@asset:` marker the longest registered name that
//! follows it is replaced by that asset's URL. Markers that match no name are
//! copied through untouched.

use tracing::{debug, warn};

use super::types::Asset;

/// Literal marker that starts a substitution token
pub const TOKEN_PREFIX: &str = "@asset:";

/// Read-only view of the registry used for one resolution pass
#[derive(Debug, Clone, Default)]
pub struct AssetSnapshot {
    /// `(name, url)` pairs, longest name first
    entries: Vec<(String, String)>,
}

impl AssetSnapshot {
    pub fn new<I>(assets: I) -> Self
    where
        I: IntoIterator<Item = Asset>,
    {
        let mut entries: Vec<(String, String)> = assets
            .into_iter()
            .map(|asset| (asset.name, asset.url))
            .collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self { entries }
    }

    /// Replace every `@asset:<name>` in `source` with the asset's URL
    pub fn resolve(&self, source: &str) -> String {
        let mut output = String::with_capacity(source.len());
        let mut rest = source;
        let mut replaced = 0usize;

        while let Some(pos) = rest.find(TOKEN_PREFIX) {
            output.push_str(&rest[..pos]);
            let after = &rest[pos + TOKEN_PREFIX.len()..];

            match self.longest_match(after) {
                Some((name, url)) => {
                    output.push_str(url);
                    rest = &after[name.len()..];
                    replaced += 1;
                }
                None => {
                    warn!(token = %token_hint(after), "Unresolved asset token left in source");
                    output.push_str(TOKEN_PREFIX);
                    rest = after;
                }
            }
        }
        output.push_str(rest);

        debug!(replaced, assets = self.entries.len(), "Resolved asset tokens");
        output
    }

    fn longest_match(&self, text: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|(name, _)| text.starts_with(name.as_str()))
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }
}

/// Best guess at the name an unresolved token was meant to carry, for logs only
fn token_hint(text: &str) -> String {
    let name: String = text
        .chars()
        .take_while(|c| !c.is_whitespace() && !matches!(c, '"' | '\'' | '<' | '>' | ')'))
        .take(64)
        .collect();
    format!("{}{}", TOKEN_PREFIX, name)
}
