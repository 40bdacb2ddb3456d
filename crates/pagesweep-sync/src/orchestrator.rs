//! Sweep orchestrator — drives one run through its phases.
//!
//! Phases are strictly linear:
//! `Start → ResetSnapshot → FetchProjects → FetchDeployments → ApplyRetention → Done`.
//! Remote failures shorten a phase but never end the run; a snapshot
//! failure ends it immediately with [`SweepError::Storage`].

use std::fmt;

use pagesweep_remote::{ApiClient, RemoteDeployment, StopReason, Throttle, Transport};
use pagesweep_state::{Deployment, Project, ResetOutcome, SnapshotStore, normalize_aliases};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{SweepError, SweepResult};
use crate::executor::{DeletionExecutor, ExecutorMode};
use crate::plan::plan_project;
use crate::report::RunReport;

/// Phase of a sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPhase {
    Start,
    ResetSnapshot,
    FetchProjects,
    FetchDeployments,
    ApplyRetention,
    Done,
}

impl fmt::Display for SweepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SweepPhase::Start => "start",
            SweepPhase::ResetSnapshot => "reset_snapshot",
            SweepPhase::FetchProjects => "fetch_projects",
            SweepPhase::FetchDeployments => "fetch_deployments",
            SweepPhase::ApplyRetention => "apply_retention",
            SweepPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs sweeps of one account against one snapshot.
pub struct Sweeper<S, T, L> {
    store: S,
    client: ApiClient<T, L>,
    mode: ExecutorMode,
    phase: SweepPhase,
}

impl<S, T, L> Sweeper<S, T, L>
where
    S: SnapshotStore,
    T: Transport,
    L: Throttle,
{
    pub fn new(store: S, client: ApiClient<T, L>, mode: ExecutorMode) -> Self {
        Self {
            store,
            client,
            mode,
            phase: SweepPhase::Start,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn client(&self) -> &ApiClient<T, L> {
        &self.client
    }

    /// Last phase entered by the most recent run.
    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    /// Execute one full run.
    pub async fn run(&mut self) -> SweepResult<RunReport> {
        let mut report = RunReport::default();
        self.enter(SweepPhase::Start);
        info!(dry_run = self.mode.dry_run, reconcile = ?self.mode.reconcile, "sweep starting");

        self.enter(SweepPhase::ResetSnapshot);
        self.reset_snapshot()?;

        self.enter(SweepPhase::FetchProjects);
        self.fetch_projects(&mut report).await?;

        self.enter(SweepPhase::FetchDeployments);
        self.fetch_deployments(&mut report).await?;

        self.enter(SweepPhase::ApplyRetention);
        self.apply_retention(&mut report).await?;

        self.enter(SweepPhase::Done);
        info!(
            projects = report.projects_fetched,
            deployments = report.deployments_fetched,
            kept = report.kept,
            deleted = report.deleted,
            would_delete = report.would_delete,
            failed = report.failed_deletes(),
            "sweep complete"
        );
        Ok(report)
    }

    fn enter(&mut self, phase: SweepPhase) {
        debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    fn reset_snapshot(&self) -> SweepResult<()> {
        let phase = SweepPhase::ResetSnapshot;
        let projects = self
            .store
            .reset_projects()
            .map_err(SweepError::storage(phase))?;
        let deployments = self
            .store
            .reset_deployments()
            .map_err(SweepError::storage(phase))?;
        if projects == ResetOutcome::Created || deployments == ResetOutcome::Created {
            info!("snapshot absent, creating");
        } else {
            info!("snapshot cleared");
        }
        Ok(())
    }

    async fn fetch_projects(&self, report: &mut RunReport) -> SweepResult<()> {
        let mut pager = self.client.projects();
        while let Some(page) = pager.next_page().await {
            for remote in page.items {
                let project = Project {
                    id: remote.id,
                    name: remote.name,
                    raw: remote.raw.to_string(),
                };
                self.store
                    .upsert_project(&project)
                    .map_err(SweepError::storage(SweepPhase::FetchProjects))?;
                report.projects_fetched += 1;
            }
        }
        report.projects_complete = matches!(pager.stop_reason(), Some(StopReason::Exhausted));
        info!(
            projects = report.projects_fetched,
            complete = report.projects_complete,
            "projects fetched"
        );
        Ok(())
    }

    async fn fetch_deployments(&self, report: &mut RunReport) -> SweepResult<()> {
        let phase = SweepPhase::FetchDeployments;
        let projects = self.store.list_projects().map_err(SweepError::storage(phase))?;
        for project in &projects {
            let mut pager = self.client.deployments(&project.name);
            let mut fetch_index = 0u64;
            while let Some(page) = pager.next_page().await {
                for remote in page.items {
                    let deployment = snapshot_deployment(remote, &project.id, fetch_index);
                    fetch_index += 1;
                    self.store
                        .upsert_deployment(&deployment)
                        .map_err(SweepError::storage(phase))?;
                }
            }
            // Pages can shift between requests, so one deployment may be listed twice.
            let stored = self
                .store
                .deployments_for_project(&project.id)
                .map_err(SweepError::storage(phase))?
                .len();
            report.deployments_fetched += stored;
            if let Some(StopReason::Failed { page, .. }) = pager.stop_reason() {
                warn!(
                    project = %project.name,
                    page,
                    listed = fetch_index,
                    stored,
                    "deployment listing incomplete"
                );
                report.incomplete_projects.push(project.name.clone());
            } else {
                debug!(
                    project = %project.name,
                    listed = fetch_index,
                    stored,
                    "deployments fetched"
                );
            }
        }
        Ok(())
    }

    async fn apply_retention(&self, report: &mut RunReport) -> SweepResult<()> {
        let phase = SweepPhase::ApplyRetention;
        let executor = DeletionExecutor::new(&self.client, &self.store, self.mode);
        let projects = self.store.list_projects().map_err(SweepError::storage(phase))?;
        for project in projects {
            // Every decision is fixed before the first delete of the project.
            let plan = plan_project(&self.store, project).map_err(SweepError::storage(phase))?;
            report.kept += plan.kept();
            let stale: Vec<&Deployment> = plan.stale().collect();
            if stale.is_empty() {
                continue;
            }
            info!(
                project = %plan.project.name,
                total = plan.entries.len(),
                stale = stale.len(),
                "applying retention"
            );
            for deployment in stale {
                let outcome = executor
                    .execute(&plan.project, deployment)
                    .await
                    .map_err(SweepError::storage(phase))?;
                report.record_deletion(&outcome);
            }
        }
        Ok(())
    }
}

fn snapshot_deployment(remote: RemoteDeployment, project_id: &str, fetch_index: u64) -> Deployment {
    Deployment {
        aliases: normalize_aliases(remote.aliases.as_deref()),
        id: remote.id,
        project_id: project_id.to_string(),
        created_on: remote.created_on,
        url: remote.url,
        fetch_index,
    }
}
