use pagesweep_core::SweepConfig;
use pagesweep_state::SnapshotStore;

use super::open_snapshot;

pub fn show(config: &SweepConfig) -> anyhow::Result<()> {
    let store = open_snapshot(&config.storage)?;
    let mut projects = store.list_projects()?;
    projects.sort_by(|a, b| a.name.cmp(&b.name));

    let mut total = 0;
    for project in &projects {
        let count = store.deployments_for_project(&project.id)?.len();
        total += count;
        println!("{:<40} {:<38} {count:>5}", project.name, project.id);
    }
    println!("{} projects, {total} deployments", projects.len());
    Ok(())
}
