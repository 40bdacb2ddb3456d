//! Snapshot store failures. Every one of them is fatal for a sweep.

use thiserror::Error;

pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    /// The snapshot file could not be opened or created.
    #[error("cannot open snapshot: {0}")]
    Open(String),

    #[error("snapshot transaction failed: {0}")]
    Transaction(String),

    /// Creating, deleting or opening a table failed.
    #[error("snapshot table unavailable: {0}")]
    Table(String),

    #[error("snapshot read failed: {0}")]
    Read(String),

    #[error("snapshot write failed: {0}")]
    Write(String),

    #[error("cannot encode snapshot row: {0}")]
    Serialize(String),

    /// A stored row no longer matches the current row layout.
    #[error("cannot decode snapshot row: {0}")]
    Deserialize(String),

    /// A deployment was written before its project.
    #[error("deployment {deployment_id} references unknown project {project_id}")]
    Orphan {
        project_id: String,
        deployment_id: String,
    },
}
