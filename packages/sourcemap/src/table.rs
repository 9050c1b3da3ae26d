//! Mapping Table
//!
//! Immutable, position-ordered list of mappings with the lookup used by the
//! consumer.

use crate::error::Result;
use crate::mappings::{compare_generated, parse_mappings, Mapping};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    mappings: Vec<Mapping>,
}

impl MappingTable {
    /// Build a table from already ordered mappings.
    pub fn new(mappings: Vec<Mapping>) -> Self {
        debug_assert!(
            mappings
                .windows(2)
                .all(|pair| compare_generated(&pair[0], &pair[1]) != Ordering::Greater),
            "mappings must be ordered by generated position"
        );
        Self { mappings }
    }

    /// Decode a `mappings` string into a table.
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self::new(parse_mappings(input)?))
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Mapping> {
        self.mappings.get(index)
    }

    pub fn as_slice(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mapping> {
        self.mappings.iter()
    }

    /// Index of the first mapping at or after `(line, column)`.
    pub fn lower_bound(&self, line: u32, column: u32) -> usize {
        self.mappings
            .partition_point(|m| m.generated_position() < (line, column))
    }

    /// Index of the mapping that covers `(line, column)`.
    ///
    /// Takes the first mapping at or after the position. When that mapping
    /// sits at a greater column it steps back one, unless it is the very
    /// first mapping. `None` when the position lies after every mapping.
    pub fn locate(&self, line: u32, column: u32) -> Option<usize> {
        let index = self.lower_bound(line, column);
        let found = self.mappings.get(index)?;
        if found.generated_column > column && index > 0 {
            Some(index - 1)
        } else {
            Some(index)
        }
    }

    pub fn lookup(&self, line: u32, column: u32) -> Option<&Mapping> {
        self.locate(line, column).and_then(|index| self.mappings.get(index))
    }

    /// Walk backwards from `index` (inclusive) to the nearest mapping that
    /// carries a name.
    pub fn nearest_named(&self, index: usize) -> Option<&Mapping> {
        let end = index.checked_add(1)?.min(self.mappings.len());
        self.mappings[..end]
            .iter()
            .rev()
            .find(|m| m.name_index.is_some())
    }
}

impl<'a> IntoIterator for &'a MappingTable {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_LINES: &str = "CAAC,IAAI,IAAM,SAAUA,GAClB,OAAOC,IAAID;CCDb,IAAI,IAAM,SAAUE,GAClB,OAAOA";

    fn table() -> MappingTable {
        MappingTable::parse(TWO_LINES).unwrap()
    }

    #[test]
    fn should_locate_exact_matches() {
        let table = table();
        assert_eq!(table.len(), 13);
        assert_eq!(table.lookup(1, 18).unwrap().generated_position(), (1, 18));
        assert_eq!(table.lookup(2, 28).unwrap().generated_position(), (2, 28));
    }

    #[test]
    fn should_fall_back_to_preceding_column() {
        let table = table();
        assert_eq!(table.lookup(1, 20).unwrap().generated_position(), (1, 18));
        assert_eq!(table.lookup(2, 12).unwrap().generated_position(), (2, 9));
    }

    #[test]
    fn should_compare_columns_only_across_line_end() {
        let table = table();
        // Past the end of line 1 the next record is (2, 1); its column is not
        // greater than the query's, so it is kept.
        assert_eq!(table.lookup(1, 100).unwrap().generated_position(), (2, 1));
        assert_eq!(table.lookup(1, 33).unwrap().generated_position(), (2, 1));
        // Column 0 is before (2, 1), so step back to the end of line 1.
        assert_eq!(table.lookup(2, 0).unwrap().generated_position(), (1, 32));
    }

    #[test]
    fn should_keep_first_mapping_before_start() {
        let table = table();
        assert_eq!(table.locate(1, 0), Some(0));
    }

    #[test]
    fn should_not_find_positions_past_the_end() {
        let table = table();
        assert_eq!(table.locate(2, 29), None);
        assert_eq!(table.locate(3, 0), None);
        assert_eq!(MappingTable::default().locate(1, 0), None);
    }

    #[test]
    fn should_find_nearest_named_mapping() {
        let table = table();
        // (1, 21) has no name, (1, 18) is "bar".
        let index = table.locate(1, 21).unwrap();
        assert_eq!(table.nearest_named(index).unwrap().generated_position(), (1, 18));
        // The first three mappings have no name at all.
        assert!(table.nearest_named(2).is_none());
    }
}
