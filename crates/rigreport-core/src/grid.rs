//! Cleaned table grids handed to the record mappers.

use std::collections::BTreeMap;

/// One grid row: original column index → cell text.
///
/// Column indices survive pruning, so a dropped column leaves a gap in the keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawRow {
    cells: BTreeMap<usize, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: usize, value: impl Into<String>) {
        self.cells.insert(column, value.into());
    }

    /// Cell at `column`, or `""` when the row has no such column.
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(&column).map(String::as_str).unwrap_or("")
    }

    /// Trimmed cell at `column`.
    pub fn trimmed(&self, column: usize) -> &str {
        self.cell(column).trim()
    }

    pub fn has_column(&self, column: usize) -> bool {
        self.cells.contains_key(&column)
    }

    /// Highest column index present.
    pub fn max_column(&self) -> Option<usize> {
        self.cells.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.cells.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Values in column order, ignoring the original indices.
    pub fn values(&self) -> Vec<&str> {
        self.cells.values().map(String::as_str).collect()
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

/// A pruned table: no all-empty rows or columns, no missing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawGrid {
    rows: Vec<RawRow>,
}

impl RawGrid {
    /// Clean an extracted table.
    ///
    /// Rows whose cells are all `None` go first, then columns that are `None` in
    /// every surviving row. What is left of `None` becomes `""`. Short rows are
    /// treated as `None`-padded.
    pub fn from_extracted(table: &[Vec<Option<String>>]) -> Self {
        let kept_rows: Vec<&Vec<Option<String>>> = table
            .iter()
            .filter(|row| row.iter().any(Option::is_some))
            .collect();

        let width = kept_rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let kept_columns: Vec<usize> = (0..width)
            .filter(|&c| kept_rows.iter().any(|r| matches!(r.get(c), Some(Some(_)))))
            .collect();

        let rows = kept_rows
            .into_iter()
            .map(|row| {
                kept_columns
                    .iter()
                    .map(|&c| (c, row.get(c).cloned().flatten().unwrap_or_default()))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&RawRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Apply `f` to every cell, keeping the layout.
    pub fn map_cells<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.cells.into_iter().map(|(k, v)| (k, f(&v))).collect())
            .collect();
        Self { rows }
    }
}
