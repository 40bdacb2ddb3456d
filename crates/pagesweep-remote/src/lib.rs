//! pagesweep-remote — client for the account-scoped projects API.
//!
//! Every call goes through a [`Transport`] (the authenticated REST seam)
//! and is followed by a [`Throttle`] pause, which keeps the request rate
//! bounded across the whole run.
//!
//! # Architecture
//!
//! ```text
//! ApiClient
//!   ├── Endpoints   (URL construction, path escaping, pagination query)
//!   ├── Transport   (HttpTransport in production, scripted fakes in tests)
//!   ├── Throttle    (FixedDelay after every call)
//!   ├── Pager<I>    (page-by-page listing, stops on last page or first failure)
//!   └── delete_deployment() → DeleteOutcome
//! ```
//!
//! Transport and envelope failures never escape a pager: they end the
//! stream and are kept as its [`StopReason`].

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod model;
pub mod pager;
pub mod throttle;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{ApiClient, DeleteOutcome};
pub use endpoints::Endpoints;
pub use error::{ApiError, ApiResult};
pub use model::{RemoteDeployment, RemoteProject};
pub use pager::{Page, Pager, StopReason};
pub use throttle::{FixedDelay, Throttle};
pub use transport::{HttpTransport, Method, Transport};
