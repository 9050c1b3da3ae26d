//! Errors
//!
//! Every failure here is fatal to construction: a consumer is either built
//! from a fully valid document or not at all.

use thiserror::Error;

/// Failure while decoding a single base64 VLQ value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VlqError {
    #[error("invalid base64 VLQ digit {digit:?} at offset {offset}")]
    InvalidDigit { digit: char, offset: usize },

    #[error("unterminated VLQ sequence at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("VLQ value starting at offset {offset} does not fit in 64 bits")]
    Overflow { offset: usize },
}

/// Structural failure in the `mappings` stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Segments carry 1, 4 or 5 fields.
    #[error("segment on generated line {line} has {fields} fields, expected 1, 4 or 5")]
    InvalidSegment { line: u32, fields: usize },

    /// Segments of a line are emitted in increasing column order.
    #[error("negative generated column delta {delta} on generated line {line}")]
    UnorderedSegment { line: u32, delta: i64 },

    #[error("{field} on generated line {line} is out of range ({value})")]
    ValueOutOfRange {
        field: &'static str,
        line: u32,
        value: i64,
    },
}

#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported source map version {0}, only version 3 is supported")]
    UnsupportedVersion(i64),

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid mappings: {0}")]
    Vlq(#[from] VlqError),

    #[error("invalid mappings: {0}")]
    Mapping(#[from] MappingError),

    #[error("source index {index} is out of range ({len} sources)")]
    SourceIndexOutOfRange { index: u32, len: usize },

    #[error("name index {index} is out of range ({len} names)")]
    NameIndexOutOfRange { index: u32, len: usize },
}

pub type Result<T> = std::result::Result<T, SourceMapError>;
