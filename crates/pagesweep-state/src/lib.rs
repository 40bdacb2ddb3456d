//! pagesweep-state — local snapshot of remote projects and deployments.
//!
//! Backed by [redb](https://docs.rs/redb). The snapshot is a pair of
//! tables that is fully replaced on every run: both tables are reset,
//! then refilled from the remote inventory.
//!
//! # Architecture
//!
//! All domain types are JSON-serialized into redb's `&[u8]` value columns.
//! Deployments use the composite key `{len}:{project_id}:{deployment_id}`
//! so a project's history is a single range scan, even when ids contain `:`.
//!
//! Callers depend on the [`SnapshotStore`] trait; [`StateStore`] is the
//! redb implementation and is `Clone` + `Send` + `Sync`.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::{ResetOutcome, SnapshotStore, StateStore};
pub use types::*;
