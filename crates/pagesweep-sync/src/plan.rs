//! Retention decisions read from the stored snapshot.
//!
//! The sweep applies these plans; `pagesweep plan` only prints them.

use pagesweep_state::{Deployment, Project, SnapshotStore, StateResult};
use serde::Serialize;

use crate::retention::{self, Decision};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedDeployment {
    pub deployment: Deployment,
    pub decision: Decision,
}

/// A project's stored history, newest first, with a decision per entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPlan {
    pub project: Project,
    pub entries: Vec<PlannedDeployment>,
}

impl ProjectPlan {
    /// Entries marked for deletion, in newest-to-oldest order.
    pub fn stale(&self) -> impl Iterator<Item = &Deployment> {
        self.entries
            .iter()
            .filter(|e| e.decision.is_delete())
            .map(|e| &e.deployment)
    }

    pub fn kept(&self) -> usize {
        self.entries.len() - self.stale().count()
    }
}

/// Read one project's history and decide every entry against its full length.
pub fn plan_project<S: SnapshotStore>(store: &S, project: Project) -> StateResult<ProjectPlan> {
    let history = store.deployments_for_project(&project.id)?;
    let decisions = retention::decisions(history.len());
    let entries = history
        .into_iter()
        .zip(decisions)
        .map(|(deployment, decision)| PlannedDeployment {
            deployment,
            decision,
        })
        .collect();
    Ok(ProjectPlan { project, entries })
}

/// Plans for every stored project, ordered by project name.
pub fn plan_snapshot<S: SnapshotStore>(store: &S) -> StateResult<Vec<ProjectPlan>> {
    let mut projects = store.list_projects()?;
    projects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    projects
        .into_iter()
        .map(|project| plan_project(store, project))
        .collect()
}

#[cfg(test)]
mod tests {
    use pagesweep_state::StateStore;

    use super::*;

    fn seed(store: &StateStore, project_id: &str, name: &str, count: usize) {
        store
            .upsert_project(&Project {
                id: project_id.to_string(),
                name: name.to_string(),
                raw: "{}".to_string(),
            })
            .unwrap();
        for i in 0..count {
            store
                .upsert_deployment(&Deployment {
                    id: format!("{name}-d{i}"),
                    project_id: project_id.to_string(),
                    created_on: format!("2024-01-{:02}T00:00:00Z", i + 1),
                    url: String::new(),
                    aliases: String::new(),
                    fetch_index: (count - 1 - i) as u64,
                })
                .unwrap();
        }
    }

    #[test]
    fn plan_marks_middle_of_history() {
        let store = StateStore::open_in_memory().unwrap();
        store.reset_projects().unwrap();
        store.reset_deployments().unwrap();
        seed(&store, "p1", "site", 6);

        let plans = plan_snapshot(&store).unwrap();
        assert_eq!(plans.len(), 1);
        let stale: Vec<_> = plans[0].stale().map(|d| d.id.as_str()).collect();
        // Newest first: d5, d4 | d3, d2 | d1, d0
        assert_eq!(stale, vec!["site-d3", "site-d2"]);
        assert_eq!(plans[0].kept(), 4);
    }

    #[test]
    fn plans_are_ordered_by_name() {
        let store = StateStore::open_in_memory().unwrap();
        store.reset_projects().unwrap();
        store.reset_deployments().unwrap();
        seed(&store, "p2", "zeta", 1);
        seed(&store, "p1", "alpha", 3);

        let names: Vec<_> = plan_snapshot(&store)
            .unwrap()
            .into_iter()
            .map(|p| p.project.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
