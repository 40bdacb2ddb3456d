//! Deletion executor — remote delete plus local snapshot reconciliation.
//!
//! The remote call is always attempted before the local row is touched.
//! Whether the local row is then removed depends on the reconcile policy:
//! `Confirmed` removes it only after the remote reported success, so a
//! deployment that still exists remotely is never missing locally.
//! `Unconditional` removes it after any attempt.

use pagesweep_core::ReconcilePolicy;
use pagesweep_remote::{ApiClient, ApiError, DeleteOutcome, Throttle, Transport};
use pagesweep_state::{Deployment, Project, SnapshotStore, StateResult};
use tracing::{info, warn};

/// How deletions are carried out for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorMode {
    /// Report only: no network delete, no local change.
    pub dry_run: bool,
    pub reconcile: ReconcilePolicy,
}

/// What happened to one deployment marked for deletion.
#[derive(Debug, Clone, PartialEq)]
pub enum DeletionOutcome {
    /// Dry run; nothing was touched.
    WouldDelete,
    Deleted { local_removed: bool },
    Rejected { reason: String, local_removed: bool },
    Unreachable { error: ApiError, local_removed: bool },
}

impl DeletionOutcome {
    pub fn local_removed(&self) -> bool {
        match self {
            DeletionOutcome::WouldDelete => false,
            DeletionOutcome::Deleted { local_removed }
            | DeletionOutcome::Rejected { local_removed, .. }
            | DeletionOutcome::Unreachable { local_removed, .. } => *local_removed,
        }
    }
}

pub struct DeletionExecutor<'a, S, T, L> {
    client: &'a ApiClient<T, L>,
    store: &'a S,
    mode: ExecutorMode,
}

impl<'a, S, T, L> DeletionExecutor<'a, S, T, L>
where
    S: SnapshotStore,
    T: Transport,
    L: Throttle,
{
    pub fn new(client: &'a ApiClient<T, L>, store: &'a S, mode: ExecutorMode) -> Self {
        Self {
            client,
            store,
            mode,
        }
    }

    /// Delete one stale deployment of `project`.
    ///
    /// Only a snapshot failure is an error; remote failures are outcomes.
    pub async fn execute(
        &self,
        project: &Project,
        deployment: &Deployment,
    ) -> StateResult<DeletionOutcome> {
        if self.mode.dry_run {
            info!(
                project = %project.name,
                deployment = %deployment.id,
                created_on = %deployment.created_on,
                "dry run: would delete deployment"
            );
            return Ok(DeletionOutcome::WouldDelete);
        }

        info!(project = %project.name, deployment = %deployment.id, "deleting deployment");
        let remote = self
            .client
            .delete_deployment(&project.name, &deployment.id)
            .await;

        let remove_local = match self.mode.reconcile {
            ReconcilePolicy::Confirmed => remote.is_confirmed(),
            ReconcilePolicy::Unconditional => true,
        };
        let local_removed = if remove_local {
            self.store.delete_deployment(&project.id, &deployment.id)?
        } else {
            false
        };

        let outcome = match remote {
            DeleteOutcome::Deleted => {
                info!(
                    project = %project.name,
                    deployment = %deployment.id,
                    local_removed,
                    "deployment deleted"
                );
                DeletionOutcome::Deleted { local_removed }
            }
            DeleteOutcome::Rejected(reason) => {
                warn!(
                    project = %project.name,
                    deployment = %deployment.id,
                    %reason,
                    local_removed,
                    "deployment not deleted"
                );
                DeletionOutcome::Rejected {
                    reason,
                    local_removed,
                }
            }
            DeleteOutcome::Unreachable(error) => {
                warn!(
                    project = %project.name,
                    deployment = %deployment.id,
                    %error,
                    local_removed,
                    "deployment delete unconfirmed"
                );
                DeletionOutcome::Unreachable {
                    error,
                    local_removed,
                }
            }
        };
        Ok(outcome)
    }
}
