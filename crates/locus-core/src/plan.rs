//! Reconciliation planning
//!
//! Diffs the persisted rows of one collection against the caller's complete
//! desired state and splits the result into creates, updates and deletes.
//! Planning is pure: nothing here touches storage.
//!
//! The adopted application order is deletes, then creates, then updates, so a
//! slot that changes id cannot transiently collide with itself.

use crate::definition::Record;
use crate::identity_set::IdentitySet;

/// Operations needed to turn the current rows into the desired rows
#[derive(Debug, Clone)]
pub struct Plan<T: Record> {
    /// Current rows whose key is absent from the desired rows
    pub to_delete: Vec<T>,
    /// Desired rows whose key is absent from the current rows
    pub to_create: Vec<T>,
    /// Desired rows present in both, with at least one differing field
    ///
    /// Full-row overwrite: the desired row replaces the stored one.
    pub to_update: Vec<T>,
    /// Desired rows present in both and identical
    pub unchanged: Vec<T>,
}

impl<T: Record> Plan<T> {
    /// Diff `current` against `desired`
    ///
    /// Both sets must already be free of duplicate keys. `to_create` and
    /// `to_update` follow desired order; `to_delete` follows current order.
    pub fn build(current: &IdentitySet<T>, desired: &IdentitySet<T>) -> Self {
        let to_delete = current.difference(desired).cloned().collect();
        let to_create = desired.difference(current).cloned().collect();

        let mut to_update = Vec::new();
        let mut unchanged = Vec::new();
        for row in desired.intersection(current) {
            match current.get(&row.key()) {
                Some(existing) if existing == row => unchanged.push(row.clone()),
                _ => to_update.push(row.clone()),
            }
        }

        Self {
            to_delete,
            to_create,
            to_update,
            unchanged,
        }
    }

    /// True when applying the plan would write nothing
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_create.is_empty() && self.to_update.is_empty()
    }

    /// Number of write operations in the plan
    pub fn write_count(&self) -> usize {
        self.to_delete.len() + self.to_create.len() + self.to_update.len()
    }
}
