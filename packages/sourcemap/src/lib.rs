//! Source Map v3 Consumer
//!
//! Decodes the `mappings` stream of a source map document and answers
//! "where did this generated position come from" queries.
//!
//! ```
//! use sourcemap_consumer::SourceMapConsumer;
//!
//! let map = br#"{"version":3,"sources":["a.js"],"names":[],"mappings":"AAAA,IAAI"}"#;
//! let consumer = SourceMapConsumer::parse("https://example.com/a.min.js.map", map).unwrap();
//! let position = consumer.source(1, 6).unwrap();
//! assert_eq!(position.source, "https://example.com/a.js");
//! assert_eq!((position.line, position.column), (1, 4));
//! ```

#![deny(clippy::all)]

pub mod consumer;
pub mod document;
pub mod error;
pub mod mappings;
pub mod options;
pub mod source_path;
pub mod table;
pub mod vlq;

pub use consumer::{OriginalPosition, SourceMapConsumer};
pub use document::{NameEntry, RawSourceMap, SUPPORTED_VERSION};
pub use error::{MappingError, Result, SourceMapError, VlqError};
pub use mappings::{parse_mappings, Mapping};
pub use options::ParseOptions;
pub use source_path::SourceResolver;
pub use table::MappingTable;
pub use vlq::{decode_vlq, VlqDecoder};
