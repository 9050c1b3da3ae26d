//! Mapping Stream Parser
//!
//! Turns the `mappings` field into a flat list of [`Mapping`] records.
//!
//! The stream is a list of generated lines separated by `;`, each holding
//! comma separated segments. A segment is 1, 4 or 5 VLQ deltas:
//!
//! | field | meaning                   | running total reset       |
//! |-------|---------------------------|---------------------------|
//! | 1     | generated column          | at every generated line   |
//! | 2     | index into `sources`      | never                     |
//! | 3     | original line             | never                     |
//! | 4     | original column           | never                     |
//! | 5     | index into `names`        | never                     |

use crate::error::{MappingError, SourceMapError};
use crate::vlq::VlqDecoder;
use std::cmp::Ordering;

/// One decoded segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// Generated line (1-based).
    pub generated_line: u32,
    /// Generated column (0-based).
    pub generated_column: u32,
    /// Index into `sources`, `None` for unmapped generated text.
    pub source_index: Option<u32>,
    /// Original line (1-based). 0 when there is no source.
    pub source_line: u32,
    /// Original column (0-based).
    pub source_column: u32,
    /// Index into `names`.
    pub name_index: Option<u32>,
}

impl Mapping {
    fn unmapped(generated_line: u32) -> Self {
        Self {
            generated_line,
            generated_column: 0,
            source_index: None,
            source_line: 0,
            source_column: 0,
            name_index: None,
        }
    }

    pub fn generated_position(&self) -> (u32, u32) {
        (self.generated_line, self.generated_column)
    }

    pub fn has_source(&self) -> bool {
        self.source_index.is_some()
    }
}

/// Compare two mappings by generated position.
pub fn compare_generated(a: &Mapping, b: &Mapping) -> Ordering {
    a.generated_position().cmp(&b.generated_position())
}

/// Which field the next VLQ value of a segment fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    GeneratedColumn,
    SourceIndex,
    SourceLine,
    SourceColumn,
    NameIndex,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::GeneratedColumn => Field::SourceIndex,
            Field::SourceIndex => Field::SourceLine,
            Field::SourceLine => Field::SourceColumn,
            Field::SourceColumn => Field::NameIndex,
            Field::NameIndex => Field::GeneratedColumn,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::GeneratedColumn => "generated column",
            Field::SourceIndex => "source index",
            Field::SourceLine => "source line",
            Field::SourceColumn => "source column",
            Field::NameIndex => "name index",
        }
    }
}

/// Segment under construction.
struct Pending {
    mapping: Mapping,
    fields: usize,
}

struct MappingParser<'a> {
    decoder: VlqDecoder<'a>,
    next: Field,

    generated_line: u32,
    generated_column: i64,
    source_index: i64,
    source_line: i64,
    source_column: i64,
    name_index: i64,

    pending: Option<Pending>,
    mappings: Vec<Mapping>,
}

impl<'a> MappingParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            decoder: VlqDecoder::new(input),
            next: Field::GeneratedColumn,
            generated_line: 1,
            generated_column: 0,
            source_index: 0,
            source_line: 1,
            source_column: 0,
            name_index: 0,
            pending: None,
            // Four digits per segment is a typical density.
            mappings: Vec::with_capacity(input.len() / 4),
        }
    }

    fn parse(mut self) -> Result<Vec<Mapping>, SourceMapError> {
        loop {
            match self.decoder.peek() {
                None => {
                    self.finish_segment()?;
                    return Ok(self.mappings);
                }
                Some(b',') => {
                    self.decoder.bump();
                    self.finish_segment()?;
                }
                Some(b';') => {
                    self.decoder.bump();
                    self.finish_segment()?;
                    self.generated_line += 1;
                    self.generated_column = 0;
                }
                Some(_) => self.read_field()?,
            }
        }
    }

    fn read_field(&mut self) -> Result<(), SourceMapError> {
        let line = self.generated_line;
        let pending = self.pending.get_or_insert_with(|| Pending {
            mapping: Mapping::unmapped(line),
            fields: 0,
        });
        if pending.fields == 5 {
            return Err(MappingError::InvalidSegment { line, fields: 6 }.into());
        }

        let delta = self.decoder.decode()?;
        let field = self.next;
        if field == Field::GeneratedColumn && delta < 0 {
            return Err(MappingError::UnorderedSegment { line, delta }.into());
        }
        let total = match field {
            Field::GeneratedColumn => &mut self.generated_column,
            Field::SourceIndex => &mut self.source_index,
            Field::SourceLine => &mut self.source_line,
            Field::SourceColumn => &mut self.source_column,
            Field::NameIndex => &mut self.name_index,
        };
        *total = total.saturating_add(delta);
        let value = u32::try_from(*total).map_err(|_| MappingError::ValueOutOfRange {
            field: field.label(),
            line,
            value: *total,
        })?;

        let mapping = &mut pending.mapping;
        match field {
            Field::GeneratedColumn => mapping.generated_column = value,
            Field::SourceIndex => mapping.source_index = Some(value),
            Field::SourceLine => mapping.source_line = value,
            Field::SourceColumn => mapping.source_column = value,
            Field::NameIndex => mapping.name_index = Some(value),
        }
        pending.fields += 1;
        self.next = field.next();
        Ok(())
    }

    fn finish_segment(&mut self) -> Result<(), SourceMapError> {
        self.next = Field::GeneratedColumn;
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        match pending.fields {
            // A 1-field segment keeps the unmapped defaults for everything but
            // the column, while the running totals stay untouched.
            1 | 4 | 5 => self.mappings.push(pending.mapping),
            fields => {
                return Err(MappingError::InvalidSegment {
                    line: pending.mapping.generated_line,
                    fields,
                }
                .into())
            }
        }
        Ok(())
    }
}

/// Decode a `mappings` string.
///
/// The returned records are ordered by generated position. Any malformed
/// segment fails the whole stream.
pub fn parse_mappings(input: &str) -> Result<Vec<Mapping>, SourceMapError> {
    MappingParser::new(input).parse()
}
