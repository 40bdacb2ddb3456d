//! Retention policy — which deployments of a project survive a sweep.
//!
//! Pure and deterministic. Given a project's history ordered newest first,
//! the two newest and the two oldest positions are kept and everything in
//! between is stale. Positions are always judged against the full length
//! of the list as it was read, never against a list shrinking under
//! deletion.

use serde::Serialize;

/// Newest positions that are always kept.
pub const KEEP_NEWEST: usize = 2;

/// Oldest positions that are always kept.
pub const KEEP_OLDEST: usize = 2;

/// Verdict for one position of an ordered history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Keep(KeepReason),
    Delete,
}

/// Which edge of the history protects a kept position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepReason {
    Newest,
    Oldest,
}

impl Decision {
    pub fn is_delete(self) -> bool {
        self == Decision::Delete
    }
}

/// Decide position `index` (0 = newest) of a history of `total` entries.
pub fn decide(index: usize, total: usize) -> Decision {
    if index < KEEP_NEWEST {
        Decision::Keep(KeepReason::Newest)
    } else if index + KEEP_OLDEST >= total {
        Decision::Keep(KeepReason::Oldest)
    } else {
        Decision::Delete
    }
}

/// Decisions for every entry of a newest-first history, in the same order.
pub fn decisions(total: usize) -> Vec<Decision> {
    (0..total).map(|index| decide(index, total)).collect()
}
