//! Parse Options
//!
//! Settings supplied by the integrator rather than by the map itself.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    /// URL the map was fetched from. Only absolute URLs take part in
    /// source resolution.
    pub retrieval_url: Option<String>,
    /// Replaces the document's `sourceRoot` when set.
    pub source_root: Option<String>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retrieval_url(mut self, url: impl Into<String>) -> Self {
        self.retrieval_url = Some(url.into());
        self
    }

    pub fn with_source_root(mut self, root: impl Into<String>) -> Self {
        self.source_root = Some(root.into());
        self
    }

    /// Read options from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let options: ParseOptions = serde_json::from_str(&content)?;
        Ok(options)
    }
}
