//! Outcome reporting for sync calls.

use locus_core::Plan;
use locus_core::Record;

/// Dependent rows written by a cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub value_rows_created: usize,
    pub value_rows_deleted: usize,
    pub translations_created: usize,
    pub translations_deleted: usize,
}

/// What a sync call changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub cascade: CascadeReport,
}

impl SyncReport {
    /// Start a report from a plan's partition sizes
    pub fn from_plan<T: Record>(plan: &Plan<T>) -> Self {
        Self {
            created: plan.to_create.len(),
            updated: plan.to_update.len(),
            deleted: plan.to_delete.len(),
            unchanged: plan.unchanged.len(),
            cascade: CascadeReport::default(),
        }
    }

    /// True when the call wrote nothing
    pub fn is_noop(&self) -> bool {
        self.created == 0
            && self.updated == 0
            && self.deleted == 0
            && self.cascade == CascadeReport::default()
    }
}

/// Refreshed collection plus what the sync changed
#[derive(Debug, Clone)]
pub struct SyncOutcome<T> {
    /// The shop's full collection as persisted after the sync
    pub items: Vec<T>,
    pub report: SyncReport,
}
