//! Dense cell matrices over (row x column) identities
//!
//! Both dependent tables are matrices that must be complete: value rows are
//! (location x value target) and translations are (language x translation
//! target). A [`CellMatrix`] knows the expected cells and can tell which are
//! missing from, or orphaned in, what storage actually holds.

use crate::translation::{FixedKey, TargetRef};
use crate::value::ValueTarget;
use crate::RecordId;
use std::collections::BTreeSet;

/// The full set of cells expected for a row set and a column set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellMatrix<R: Ord, C: Ord> {
    rows: BTreeSet<R>,
    columns: BTreeSet<C>,
}

/// Cells that break completeness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixDiff<R, C> {
    /// Expected cells with no stored row
    pub missing: Vec<(R, C)>,
    /// Stored cells whose row or column no longer exists
    pub orphaned: Vec<(R, C)>,
}

impl<R, C> MatrixDiff<R, C> {
    /// True when storage matches the matrix exactly
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }
}

impl<R: Ord + Clone, C: Ord + Clone> CellMatrix<R, C> {
    /// Build a matrix; duplicate rows or columns collapse
    pub fn new(rows: impl IntoIterator<Item = R>, columns: impl IntoIterator<Item = C>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            columns: columns.into_iter().collect(),
        }
    }

    /// Row identities, sorted
    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    /// Column identities, sorted
    pub fn columns(&self) -> impl Iterator<Item = &C> {
        self.columns.iter()
    }

    /// Number of expected cells
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.columns.len()
    }

    /// Whether the cell is expected
    pub fn contains(&self, row: &R, column: &C) -> bool {
        self.rows.contains(row) && self.columns.contains(column)
    }

    /// Cells a newly added row needs, one per existing column
    pub fn cells_for_new_row(&self, row: &R) -> Vec<(R, C)> {
        self.columns
            .iter()
            .map(|column| (row.clone(), column.clone()))
            .collect()
    }

    /// Cells a newly added column needs, one per existing row
    pub fn cells_for_new_column(&self, column: &C) -> Vec<(R, C)> {
        self.rows
            .iter()
            .map(|row| (row.clone(), column.clone()))
            .collect()
    }

    /// Compare the expected cells against the cells storage holds
    ///
    /// Stored duplicates are impossible when storage keys are derived from the
    /// cell, so `existing` is treated as a set.
    pub fn diff(&self, existing: impl IntoIterator<Item = (R, C)>) -> MatrixDiff<R, C> {
        let existing: BTreeSet<(R, C)> = existing.into_iter().collect();

        let mut missing = Vec::new();
        for row in &self.rows {
            for column in &self.columns {
                let cell = (row.clone(), column.clone());
                if !existing.contains(&cell) {
                    missing.push(cell);
                }
            }
        }

        let orphaned = existing
            .into_iter()
            .filter(|(row, column)| !self.contains(row, column))
            .collect();

        MatrixDiff { missing, orphaned }
    }
}

/// Languages x translation targets
pub type TranslationMatrix = CellMatrix<RecordId, TargetRef>;

/// Locations x value targets
pub type ValueMatrix = CellMatrix<RecordId, ValueTarget>;

impl TranslationMatrix {
    /// Build the translation matrix of a shop
    ///
    /// The column set is every fixed key plus every definition target.
    pub fn for_shop(
        languages: impl IntoIterator<Item = RecordId>,
        definition_targets: impl IntoIterator<Item = TargetRef>,
    ) -> Self {
        let columns = FixedKey::ALL
            .iter()
            .copied()
            .map(TargetRef::Fixed)
            .chain(definition_targets);
        Self::new(languages, columns)
    }
}
