//! pagesweep-sync — the sweep engine.
//!
//! One run refreshes the local snapshot from the remote inventory, then
//! prunes every project's deployment history down to its retention
//! window: the two newest and the two oldest deployments.
//!
//! # Architecture
//!
//! ```text
//! Sweeper::run()
//!   ├── ResetSnapshot     SnapshotStore::reset_*
//!   ├── FetchProjects     ApiClient::projects()      → upsert_project
//!   ├── FetchDeployments  ApiClient::deployments(n)  → upsert_deployment
//!   └── ApplyRetention    plan_project() → DeletionExecutor::execute()
//! ```
//!
//! Only snapshot failures are fatal. Everything the remote does wrong is
//! logged and counted in the [`RunReport`].

pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod plan;
pub mod report;
pub mod retention;

pub use error::{SweepError, SweepResult};
pub use executor::{DeletionExecutor, DeletionOutcome, ExecutorMode};
pub use orchestrator::{SweepPhase, Sweeper};
pub use plan::{PlannedDeployment, ProjectPlan, plan_project, plan_snapshot};
pub use report::RunReport;
pub use retention::{Decision, KeepReason};
