//! StateStore — redb-backed snapshot persistence.
//!
//! Provides the [`SnapshotStore`] operations over the projects and
//! deployments tables. All values are JSON-serialized into redb's
//! `&[u8]` value columns. The store supports both on-disk and in-memory
//! backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{
    Database, ReadOnlyTable, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition,
    TableError,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// What a table reset found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The table did not exist yet and was created empty.
    Created,
    /// The table existed; all of its rows were discarded.
    Cleared,
}

/// The operations the sweeper needs from its local snapshot.
///
/// Implementations are accessed by a single writer per run.
pub trait SnapshotStore {
    /// Empty the projects table, creating it if absent.
    fn reset_projects(&self) -> StateResult<ResetOutcome>;

    /// Empty the deployments table, creating it if absent.
    fn reset_deployments(&self) -> StateResult<ResetOutcome>;

    /// Insert or replace a project keyed by its id. Last write wins.
    fn upsert_project(&self, project: &Project) -> StateResult<()>;

    /// Insert or replace a deployment keyed by `(project_id, id)`.
    ///
    /// Fails with [`StateError::Orphan`] when the owning project is not stored.
    fn upsert_deployment(&self, deployment: &Deployment) -> StateResult<()>;

    /// All stored projects, in no particular order.
    fn list_projects(&self) -> StateResult<Vec<Project>>;

    /// A project's deployments ordered by [`Deployment::newest_first`].
    fn deployments_for_project(&self, project_id: &str) -> StateResult<Vec<Deployment>>;

    /// Remove one deployment. Returns true if it existed.
    fn delete_deployment(&self, project_id: &str, deployment_id: &str) -> StateResult<bool>;
}

/// Thread-safe snapshot store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent snapshot at the given path.
    ///
    /// Tables are not created here; the first reset does that.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        debug!(?path, "snapshot store opened");
        Ok(Self { db: Arc::new(db) })
    }

    /// Create an ephemeral in-memory snapshot (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        debug!("in-memory snapshot store opened");
        Ok(Self { db: Arc::new(db) })
    }

    /// Get a project by id.
    pub fn get_project(&self, project_id: &str) -> StateResult<Option<Project>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let Some(table) = open_readable(&txn, PROJECTS)? else {
            return Ok(None);
        };
        match table.get(project_id).map_err(map_err!(Read))? {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Total number of stored deployments across all projects.
    pub fn count_deployments(&self) -> StateResult<usize> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let Some(table) = open_readable(&txn, DEPLOYMENTS)? else {
            return Ok(0);
        };
        let mut count = 0;
        for entry in table.iter().map_err(map_err!(Read))? {
            entry.map_err(map_err!(Read))?;
            count += 1;
        }
        Ok(count)
    }

    fn reset_table(
        &self,
        def: TableDefinition<'static, &'static str, &'static [u8]>,
    ) -> StateResult<ResetOutcome> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed = txn.delete_table(def).map_err(map_err!(Table))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(def).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        let outcome = if existed {
            ResetOutcome::Cleared
        } else {
            ResetOutcome::Created
        };
        debug!(table = %def, ?outcome, "table reset");
        Ok(outcome)
    }
}

impl SnapshotStore for StateStore {
    fn reset_projects(&self) -> StateResult<ResetOutcome> {
        self.reset_table(PROJECTS)
    }

    fn reset_deployments(&self) -> StateResult<ResetOutcome> {
        self.reset_table(DEPLOYMENTS)
    }

    fn upsert_project(&self, project: &Project) -> StateResult<()> {
        let value = serde_json::to_vec(project).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(PROJECTS).map_err(map_err!(Table))?;
            table
                .insert(project.table_key(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(project_id = %project.id, name = %project.name, "project stored");
        Ok(())
    }

    fn upsert_deployment(&self, deployment: &Deployment) -> StateResult<()> {
        let key = deployment.table_key();
        let value = serde_json::to_vec(deployment).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let projects = txn.open_table(PROJECTS).map_err(map_err!(Table))?;
            let owner_present = projects
                .get(deployment.project_id.as_str())
                .map_err(map_err!(Read))?
                .is_some();
            if !owner_present {
                return Err(StateError::Orphan {
                    project_id: deployment.project_id.clone(),
                    deployment_id: deployment.id.clone(),
                });
            }
        }
        {
            let mut table = txn.open_table(DEPLOYMENTS).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, created_on = %deployment.created_on, "deployment stored");
        Ok(())
    }

    fn list_projects(&self) -> StateResult<Vec<Project>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let Some(table) = open_readable(&txn, PROJECTS)? else {
            return Ok(Vec::new());
        };
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            results.push(decode(value.value())?);
        }
        Ok(results)
    }

    fn deployments_for_project(&self, project_id: &str) -> StateResult<Vec<Deployment>> {
        let prefix = deployment_prefix(project_id);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let Some(table) = open_readable(&txn, DEPLOYMENTS)? else {
            return Ok(Vec::new());
        };
        let mut results: Vec<Deployment> = Vec::new();
        for entry in table.range(prefix.as_str()..).map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if !key.value().starts_with(&prefix) {
                break;
            }
            let deployment: Deployment = decode(value.value())?;
            if deployment.project_id == project_id {
                results.push(deployment);
            }
        }
        results.sort_by(Deployment::newest_first);
        Ok(results)
    }

    fn delete_deployment(&self, project_id: &str, deployment_id: &str) -> StateResult<bool> {
        let key = deployment_key(project_id, deployment_id);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(DEPLOYMENTS).map_err(map_err!(Table))?;
            existed = table.remove(key.as_str()).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, existed, "deployment removed");
        Ok(existed)
    }
}

/// Open a table for reading, treating a never-created table as absent.
fn open_readable(
    txn: &ReadTransaction,
    def: TableDefinition<'static, &'static str, &'static [u8]>,
) -> StateResult<Option<ReadOnlyTable<&'static str, &'static [u8]>>> {
    match txn.open_table(def) {
        Ok(table) => Ok(Some(table)),
        Err(TableError::TableDoesNotExist(_)) => Ok(None),
        Err(e) => Err(StateError::Table(e.to_string())),
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StateResult<T> {
    serde_json::from_slice(bytes).map_err(map_err!(Deserialize))
}
