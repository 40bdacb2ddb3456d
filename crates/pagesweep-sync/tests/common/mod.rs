//! Shared fixtures for sweep integration tests: account scripting on top
//! of the scripted transport, and a snapshot store that fails on demand.

#![allow(dead_code)]

use std::time::Duration;

pub use pagesweep_remote::testing::ScriptedTransport;
use pagesweep_remote::testing::{list_body, project_json, status_ok};
use pagesweep_remote::{ApiClient, Endpoints, FixedDelay, Method};
use pagesweep_state::{
    Deployment, Project, ResetOutcome, SnapshotStore, StateError, StateResult, StateStore,
};
use pagesweep_sync::{ExecutorMode, Sweeper};

pub const BASE: &str = "https://api.test/v4/accounts/acc/pages/projects";
pub const PAGE_SIZE: u32 = 5;

// ── Remote ────────────────────────────────────────────────────────

/// Scripting shorthands for one account's listing and delete endpoints.
pub trait AccountScript: Sized {
    fn projects_page(self, page: u32, total_pages: u32, projects: &[(&str, &str)]) -> Self;
    fn deployments_page(
        self,
        project: &str,
        page: u32,
        total_pages: u32,
        deployments: &[(&str, &str)],
    ) -> Self;
    fn delete_ok(self, project: &str, deployment: &str) -> Self;
    fn delete_rejected(self, project: &str, deployment: &str) -> Self;
    fn deletes(&self) -> Vec<String>;
}

impl AccountScript for ScriptedTransport {
    fn projects_page(self, page: u32, total_pages: u32, projects: &[(&str, &str)]) -> Self {
        let items: Vec<String> = projects
            .iter()
            .map(|(id, name)| project_json(id, name))
            .collect();
        self.respond(Method::Get, &projects_url(page), list_body(&items, total_pages))
    }

    fn deployments_page(
        self,
        project: &str,
        page: u32,
        total_pages: u32,
        deployments: &[(&str, &str)],
    ) -> Self {
        let items: Vec<String> = deployments
            .iter()
            .map(|(id, created_on)| deployment_json(project, id, created_on))
            .collect();
        self.respond(
            Method::Get,
            &deployments_url(project, page),
            list_body(&items, total_pages),
        )
    }

    fn delete_ok(self, project: &str, deployment: &str) -> Self {
        self.respond(Method::Delete, &delete_url(project, deployment), status_ok())
    }

    fn delete_rejected(self, project: &str, deployment: &str) -> Self {
        self.respond(
            Method::Delete,
            &delete_url(project, deployment),
            r#"{"success":false,"errors":[{"code":8000035,"message":"deployment is aliased"}]}"#
                .to_string(),
        )
    }

    fn deletes(&self) -> Vec<String> {
        self.requests(Method::Delete)
    }
}

pub fn projects_url(page: u32) -> String {
    format!("{BASE}?page={page}&per_page={PAGE_SIZE}")
}

pub fn deployments_url(project: &str, page: u32) -> String {
    format!("{BASE}/{project}/deployments?page={page}&per_page={PAGE_SIZE}")
}

pub fn delete_url(project: &str, deployment: &str) -> String {
    format!("{BASE}/{project}/deployments/{deployment}")
}

pub fn deployment_json(project: &str, id: &str, created_on: &str) -> String {
    format!(
        r#"{{"id":"{id}","created_on":"{created_on}","url":"https://{id}.{project}.pages.dev","aliases":null}}"#
    )
}

/// Five deployments listed newest first, one day apart.
pub fn five_days() -> Vec<(&'static str, &'static str)> {
    vec![
        ("d4", "2024-06-05T00:00:00Z"),
        ("d3", "2024-06-04T00:00:00Z"),
        ("d2", "2024-06-03T00:00:00Z"),
        ("d1", "2024-06-02T00:00:00Z"),
        ("d0", "2024-06-01T00:00:00Z"),
    ]
}

pub fn api_client(
    remote: ScriptedTransport,
    delay: Duration,
) -> ApiClient<ScriptedTransport, FixedDelay> {
    let endpoints = Endpoints::new("https://api.test/v4", "acc", "pages", PAGE_SIZE).unwrap();
    ApiClient::new(endpoints, remote, FixedDelay::new(delay))
}

pub fn sweeper<S: SnapshotStore>(
    store: S,
    remote: ScriptedTransport,
    mode: ExecutorMode,
) -> Sweeper<S, ScriptedTransport, FixedDelay> {
    Sweeper::new(store, api_client(remote, Duration::ZERO), mode)
}

pub fn live() -> ExecutorMode {
    ExecutorMode::default()
}

// ── Snapshot ──────────────────────────────────────────────────────

/// A fresh store with `project` and its deployments already in place.
pub fn seeded_store(project: (&str, &str), deployments: &[(&str, &str)]) -> StateStore {
    let store = StateStore::open_in_memory().unwrap();
    store.reset_projects().unwrap();
    store.reset_deployments().unwrap();
    let (project_id, name) = project;
    store
        .upsert_project(&Project {
            id: project_id.to_string(),
            name: name.to_string(),
            raw: "{}".to_string(),
        })
        .unwrap();
    for (index, (id, created_on)) in deployments.iter().enumerate() {
        store
            .upsert_deployment(&Deployment {
                id: id.to_string(),
                project_id: project_id.to_string(),
                created_on: created_on.to_string(),
                url: String::new(),
                aliases: String::new(),
                fetch_index: index as u64,
            })
            .unwrap();
    }
    store
}

/// Which store operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Reset,
    UpsertDeployment,
    DeleteDeployment,
}

/// Delegates to a real store, except for the one faulty operation.
pub struct FaultyStore {
    pub inner: StateStore,
    pub fault: Fault,
}

impl FaultyStore {
    pub fn new(fault: Fault) -> Self {
        Self {
            inner: StateStore::open_in_memory().unwrap(),
            fault,
        }
    }

    fn check(&self, op: Fault) -> StateResult<()> {
        if self.fault == op {
            Err(StateError::Transaction(format!("injected {op:?} failure")))
        } else {
            Ok(())
        }
    }
}

impl SnapshotStore for FaultyStore {
    fn reset_projects(&self) -> StateResult<ResetOutcome> {
        self.check(Fault::Reset)?;
        self.inner.reset_projects()
    }

    fn reset_deployments(&self) -> StateResult<ResetOutcome> {
        self.check(Fault::Reset)?;
        self.inner.reset_deployments()
    }

    fn upsert_project(&self, project: &Project) -> StateResult<()> {
        self.inner.upsert_project(project)
    }

    fn upsert_deployment(&self, deployment: &Deployment) -> StateResult<()> {
        self.check(Fault::UpsertDeployment)?;
        self.inner.upsert_deployment(deployment)
    }

    fn list_projects(&self) -> StateResult<Vec<Project>> {
        self.inner.list_projects()
    }

    fn deployments_for_project(&self, project_id: &str) -> StateResult<Vec<Deployment>> {
        self.inner.deployments_for_project(project_id)
    }

    fn delete_deployment(&self, project_id: &str, deployment_id: &str) -> StateResult<bool> {
        self.check(Fault::DeleteDeployment)?;
        self.inner.delete_deployment(project_id, deployment_id)
    }
}
