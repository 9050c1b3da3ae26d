//! Raw Source Map
//!
//! The JSON shape of a version 3 source map as it comes off the wire.

use serde::{Deserialize, Deserializer};

pub const SUPPORTED_VERSION: i64 = 3;

/// Raw source map (version 3).
///
/// Missing fields default to their empty values so that the version gate,
/// not the JSON decoder, reports documents without a `version`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSourceMap {
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(rename = "sourceRoot", default)]
    pub source_root: Option<String>,
    #[serde(default, deserialize_with = "nullable_strings")]
    pub sources: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub names: Vec<NameEntry>,
    #[serde(default)]
    pub mappings: String,
}

impl RawSourceMap {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

// Generators emit `null` for sources they could not name, and some write
// `null` in place of an empty list.
fn nullable_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// An entry of the `names` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NameEntry {
    Text(String),
    Number(f64),
    Other(serde_json::Value),
}

impl NameEntry {
    /// Display form used in lookup results.
    ///
    /// Numbers use the shortest decimal that round-trips, without exponent.
    pub fn render(&self) -> String {
        match self {
            NameEntry::Text(text) => text.clone(),
            NameEntry::Number(number) => number.to_string(),
            NameEntry::Other(value) => value.to_string(),
        }
    }
}

impl From<&str> for NameEntry {
    fn from(text: &str) -> Self {
        NameEntry::Text(text.to_string())
    }
}
