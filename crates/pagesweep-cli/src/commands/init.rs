use std::path::Path;

use anyhow::{Context, bail};
use pagesweep_core::SweepConfig;

pub fn init(path: &Path, account_id: &str, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }
    let config = SweepConfig::scaffold(account_id);
    let rendered = config.to_toml_string()?;
    std::fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
    println!("✓ Generated {}", path.display());
    println!("  set [account].api_token or PAGESWEEP_API_TOKEN, then drop dry_run");
    Ok(())
}
