use std::fmt::Write as _;

use pagesweep_core::SweepConfig;
use pagesweep_sync::{Decision, KeepReason, ProjectPlan, plan_snapshot};

use super::open_snapshot;

pub fn plan(config: &SweepConfig, format: &str) -> anyhow::Result<()> {
    let store = open_snapshot(&config.storage)?;
    let plans = plan_snapshot(&store)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&plans)?),
        _ => print!("{}", format_plans(&plans)),
    }
    Ok(())
}

fn format_plans(plans: &[ProjectPlan]) -> String {
    let mut out = String::new();
    let mut stale_total = 0;
    for plan in plans {
        let stale = plan.stale().count();
        stale_total += stale;
        let _ = writeln!(
            out,
            "{} ({}): {} deployments, {stale} stale",
            plan.project.name,
            plan.project.id,
            plan.entries.len()
        );
        for entry in &plan.entries {
            let verdict = match entry.decision {
                Decision::Delete => "delete",
                Decision::Keep(KeepReason::Newest) => "keep (newest)",
                Decision::Keep(KeepReason::Oldest) => "keep (oldest)",
            };
            let _ = writeln!(
                out,
                "  {verdict:<14} {:<38} {}",
                entry.deployment.id, entry.deployment.created_on
            );
        }
    }
    let _ = writeln!(out, "{stale_total} stale deployments in {} projects", plans.len());
    out
}
