pub mod init;
pub mod plan;
pub mod run;
pub mod show;

use anyhow::{Context, bail};
use pagesweep_core::StorageConfig;
use pagesweep_state::StateStore;

/// Open the snapshot a previous `run` left behind. Never creates one.
pub(crate) fn open_snapshot(storage: &StorageConfig) -> anyhow::Result<StateStore> {
    let path = storage.snapshot_path();
    if !path.exists() {
        bail!(
            "no snapshot at {}; run `pagesweep run` first",
            path.display()
        );
    }
    StateStore::open(&path).with_context(|| format!("failed to open {}", path.display()))
}
