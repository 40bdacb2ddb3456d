//! pagesweep — prunes stale deployments of every project in an account.
//!
//! Meant to run from cron. Each `run` refreshes the local snapshot, then
//! deletes every deployment outside the retention window (two newest, two
//! oldest per project).
//!
//! # Usage
//!
//! ```text
//! pagesweep init --account-id 0123abcd
//! pagesweep --config /etc/pagesweep.toml run --dry-run
//! pagesweep plan --format json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use pagesweep_core::SweepConfig;

mod commands;
mod lock;
mod logging;

const DEFAULT_CONFIG: &str = "pagesweep.toml";

#[derive(Parser)]
#[command(
    name = "pagesweep",
    about = "Prune stale deployments, keeping the two newest and two oldest per project",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file [default: ./pagesweep.toml, built-in defaults if absent]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh the snapshot and delete stale deployments.
    Run {
        /// Report what would be deleted without deleting anything.
        #[arg(long)]
        dry_run: bool,
        /// Override [storage].data_dir.
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Print the run report as JSON on stdout.
        #[arg(long)]
        report_json: bool,
    },
    /// Show retention decisions for the stored snapshot (no network).
    Plan {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// List stored projects and their deployment counts.
    Show {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Write an example config file.
    Init {
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        path: PathBuf,
        #[arg(long, default_value = "")]
        account_id: String,
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            path,
            account_id,
            force,
        } => {
            logging::init(&Default::default())?;
            commands::init::init(&path, &account_id, force)
        }
        Command::Run {
            dry_run,
            data_dir,
            report_json,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, dry_run, data_dir);
            config.validate().context("invalid configuration")?;
            logging::init(&config.log)?;
            commands::run::run(&config, report_json).await
        }
        Command::Plan { data_dir, format } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, false, data_dir);
            logging::init(&config.log)?;
            commands::plan::plan(&config, &format)
        }
        Command::Show { data_dir } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, false, data_dir);
            logging::init(&config.log)?;
            commands::show::show(&config)
        }
    }
}

/// Read the config file, then layer the credential environment on top.
///
/// An explicit `--config` must exist; the default path is optional.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<SweepConfig> {
    let mut config = match explicit {
        Some(path) => SweepConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => {
            SweepConfig::from_file(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("failed to load {DEFAULT_CONFIG}"))?
        }
        None => SweepConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

fn apply_overrides(config: &mut SweepConfig, dry_run: bool, data_dir: Option<PathBuf>) {
    if dry_run {
        config.retention.dry_run = true;
    }
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from([
            "pagesweep",
            "--config",
            "/etc/pagesweep.toml",
            "run",
            "--dry-run",
            "--data-dir",
            "/tmp/sweep",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/pagesweep.toml")));
        match cli.command {
            Command::Run {
                dry_run,
                data_dir,
                report_json,
            } => {
                assert!(dry_run);
                assert_eq!(data_dir, Some(PathBuf::from("/tmp/sweep")));
                assert!(!report_json);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["pagesweep", "show", "-c", "x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn overrides_only_widen_dry_run() {
        let mut config = SweepConfig::default();
        config.retention.dry_run = true;
        apply_overrides(&mut config, false, None);
        assert!(config.retention.dry_run);

        config.retention.dry_run = false;
        apply_overrides(&mut config, true, Some(PathBuf::from("/srv/sweep")));
        assert!(config.retention.dry_run);
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/sweep"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn explicit_config_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.toml");
        std::fs::write(&path, "[api]\npage_size = 25\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.api.page_size, 25);
    }
}
