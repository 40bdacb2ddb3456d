use anyhow::Context;
use pagesweep_core::SweepConfig;
use pagesweep_remote::{ApiClient, Endpoints, FixedDelay, HttpTransport};
use pagesweep_state::StateStore;
use pagesweep_sync::{ExecutorMode, Sweeper};
use tracing::{error, info};

use crate::lock::RunLock;

/// One scheduled sweep: lock, open the snapshot, run every phase.
pub async fn run(config: &SweepConfig, report_json: bool) -> anyhow::Result<()> {
    let storage = &config.storage;
    std::fs::create_dir_all(&storage.data_dir)
        .with_context(|| format!("failed to create {}", storage.data_dir.display()))?;
    let _lock = RunLock::acquire(&storage.lock_path())?;

    let snapshot_path = storage.snapshot_path();
    let store = StateStore::open(&snapshot_path)
        .with_context(|| format!("failed to open snapshot {}", snapshot_path.display()))?;
    info!(path = %snapshot_path.display(), "snapshot opened");

    let endpoints = Endpoints::new(
        &config.api.base_url,
        &config.account.id,
        &config.api.resource,
        config.api.page_size,
    )?;
    let transport = HttpTransport::new(&config.account.api_token, config.api_timeout()?)?;
    let client = ApiClient::new(endpoints, transport, FixedDelay::new(config.api_delay()?));
    let mode = ExecutorMode {
        dry_run: config.retention.dry_run,
        reconcile: config.retention.reconcile,
    };

    let mut sweeper = Sweeper::new(store, client, mode);
    let report = match sweeper.run().await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "sweep aborted");
            return Err(e.into());
        }
    };

    if report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
