//! Source Map Consumer
//!
//! Owns a decoded source map and answers generated → original position
//! queries.

use crate::document::{NameEntry, RawSourceMap, SUPPORTED_VERSION};
use crate::error::{Result, SourceMapError};
use crate::mappings::Mapping;
use crate::options::ParseOptions;
use crate::source_path::SourceResolver;
use crate::table::MappingTable;
use tracing::debug;
use url::Url;

/// Where a generated position came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
    /// Resolved source path or URL, empty for unmapped generated text.
    pub source: String,
    /// Symbol name, empty when the mapping has none.
    pub name: String,
    /// Original line (1-based).
    pub line: u32,
    /// Original column (0-based).
    pub column: u32,
}

/// A parsed, immutable source map.
///
/// Queries take `&self`, so a consumer can be shared between threads
/// without locking.
#[derive(Debug, Clone)]
pub struct SourceMapConsumer {
    file: Option<String>,
    source_root: Option<String>,
    sources: Vec<String>,
    names: Vec<NameEntry>,
    resolver: SourceResolver,
    table: MappingTable,
}

impl SourceMapConsumer {
    /// Parse a source map document.
    ///
    /// `retrieval_url` is where the map was fetched from, or empty.
    pub fn parse(retrieval_url: &str, bytes: &[u8]) -> Result<Self> {
        let options = ParseOptions {
            retrieval_url: Some(retrieval_url.to_string()).filter(|url| !url.is_empty()),
            ..ParseOptions::default()
        };
        Self::parse_with_options(bytes, &options)
    }

    pub fn parse_with_options(bytes: &[u8], options: &ParseOptions) -> Result<Self> {
        let raw = RawSourceMap::from_slice(bytes)?;
        Self::from_raw(raw, options)
    }

    /// Build a consumer from an already decoded document.
    pub fn from_raw(mut raw: RawSourceMap, options: &ParseOptions) -> Result<Self> {
        if raw.version != SUPPORTED_VERSION {
            return Err(SourceMapError::UnsupportedVersion(raw.version));
        }

        let source_root = options.source_root.clone().or(raw.source_root);
        let resolver = SourceResolver::new(
            source_root.as_deref().unwrap_or(""),
            options.retrieval_url.as_deref().unwrap_or(""),
        )?;

        // The encoded string is dead weight once decoded.
        let encoded = std::mem::take(&mut raw.mappings);
        let table = MappingTable::parse(&encoded)?;
        drop(encoded);

        check_indices(&table, raw.sources.len(), raw.names.len())?;

        debug!(
            file = raw.file.as_deref().unwrap_or(""),
            mappings = table.len(),
            sources = raw.sources.len(),
            names = raw.names.len(),
            "parsed source map"
        );

        Ok(Self {
            file: raw.file,
            source_root,
            sources: raw.sources,
            names: raw.names,
            resolver,
            table,
        })
    }

    /// Original position of generated `(line, column)`.
    ///
    /// `line` is 1-based, `column` 0-based. A position between two mappings
    /// resolves to the earlier one. `None` when the position lies after
    /// every mapping.
    pub fn source(&self, line: u32, column: u32) -> Option<OriginalPosition> {
        let mapping = self.table.lookup(line, column)?;
        Some(OriginalPosition {
            source: self.mapping_source(mapping).unwrap_or_default(),
            name: self.mapping_name(mapping).unwrap_or_default(),
            line: mapping.source_line,
            column: mapping.source_column,
        })
    }

    /// Name of the symbol at generated `(line, column)`.
    ///
    /// Walks back from the mapping that covers the position to the nearest
    /// one carrying a name, returning `fallback` if there is none. `None`
    /// when the position lies after every mapping.
    pub fn source_name(&self, line: u32, column: u32, fallback: &str) -> Option<String> {
        let index = self.table.locate(line, column)?;
        let name = self
            .table
            .nearest_named(index)
            .and_then(|mapping| self.mapping_name(mapping))
            .unwrap_or_else(|| fallback.to_string());
        Some(name)
    }

    /// The document's `file`, empty if absent.
    pub fn file(&self) -> &str {
        self.file.as_deref().unwrap_or("")
    }

    /// Effective source root (options override the document).
    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    /// `sources` as written in the document.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// `sources` after root and base URL resolution.
    pub fn resolved_sources(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|source| self.resolver.resolve(source))
            .collect()
    }

    /// `names` in display form.
    pub fn names(&self) -> Vec<String> {
        self.names.iter().map(NameEntry::render).collect()
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.resolver.base_url()
    }

    pub fn mappings(&self) -> &[Mapping] {
        self.table.as_slice()
    }

    pub fn mapping_count(&self) -> usize {
        self.table.len()
    }

    fn mapping_source(&self, mapping: &Mapping) -> Option<String> {
        let index = mapping.source_index?;
        let source = self.sources.get(index as usize)?;
        Some(self.resolver.resolve(source))
    }

    fn mapping_name(&self, mapping: &Mapping) -> Option<String> {
        let index = mapping.name_index?;
        self.names.get(index as usize).map(NameEntry::render)
    }
}

fn check_indices(table: &MappingTable, sources: usize, names: usize) -> Result<()> {
    for mapping in table {
        if let Some(index) = mapping.source_index {
            if index as usize >= sources {
                return Err(SourceMapError::SourceIndexOutOfRange { index, len: sources });
            }
        }
        if let Some(index) = mapping.name_index {
            if index as usize >= names {
                return Err(SourceMapError::NameIndexOutOfRange { index, len: names });
            }
        }
    }
    Ok(())
}
