//! Run summary.

use serde::Serialize;

use crate::executor::DeletionOutcome;

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub projects_fetched: usize,
    /// False when the projects listing stopped on a failure.
    pub projects_complete: bool,
    pub deployments_fetched: usize,
    /// Names of projects whose deployment listing stopped on a failure.
    pub incomplete_projects: Vec<String>,
    pub kept: usize,
    pub would_delete: usize,
    pub deleted: usize,
    pub rejected: usize,
    pub unreachable: usize,
    pub local_rows_removed: usize,
}

impl RunReport {
    pub(crate) fn record_deletion(&mut self, outcome: &DeletionOutcome) {
        match outcome {
            DeletionOutcome::WouldDelete => self.would_delete += 1,
            DeletionOutcome::Deleted { .. } => self.deleted += 1,
            DeletionOutcome::Rejected { .. } => self.rejected += 1,
            DeletionOutcome::Unreachable { .. } => self.unreachable += 1,
        }
        if outcome.local_removed() {
            self.local_rows_removed += 1;
        }
    }

    /// Remote deletes that did not go through.
    pub fn failed_deletes(&self) -> usize {
        self.rejected + self.unreachable
    }
}
