//! API client — the one place remote calls are issued from.

use reqwest::Url;
use tracing::{debug, warn};

use crate::endpoints::Endpoints;
use crate::envelope::parse_status;
use crate::error::{ApiError, ApiResult};
use crate::model::{RemoteDeployment, RemoteProject};
use crate::pager::{Collection, Pager};
use crate::throttle::Throttle;
use crate::transport::{Method, Transport};

/// Result of a remote delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The remote confirmed the deletion.
    Deleted,
    /// The remote answered with `success: false`.
    Rejected(String),
    /// No usable answer: transport failure or unparsable body.
    Unreachable(ApiError),
}

impl DeleteOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

/// Client for one account's projects and deployments.
pub struct ApiClient<T, L> {
    endpoints: Endpoints,
    transport: T,
    throttle: L,
}

impl<T: Transport, L: Throttle> ApiClient<T, L> {
    pub fn new(endpoints: Endpoints, transport: T, throttle: L) -> Self {
        Self {
            endpoints,
            transport,
            throttle,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Pager over every project of the account.
    pub fn projects(&self) -> Pager<'_, T, L, RemoteProject> {
        Pager::new(self, Collection::Projects)
    }

    /// Pager over one project's deployments.
    pub fn deployments(&self, project_name: &str) -> Pager<'_, T, L, RemoteDeployment> {
        Pager::new(
            self,
            Collection::Deployments {
                project_name: project_name.to_string(),
            },
        )
    }

    /// Ask the remote to delete one deployment.
    pub async fn delete_deployment(
        &self,
        project_name: &str,
        deployment_id: &str,
    ) -> DeleteOutcome {
        let url = match self.endpoints.deployment(project_name, deployment_id) {
            Ok(url) => url,
            Err(error) => return DeleteOutcome::Unreachable(error),
        };
        debug!(project = %project_name, deployment = %deployment_id, %url, "requesting delete");

        let body = match self.call(Method::Delete, &url).await {
            Ok(body) => body,
            Err(error) => {
                warn!(
                    project = %project_name,
                    deployment = %deployment_id,
                    %error,
                    "delete request failed"
                );
                return DeleteOutcome::Unreachable(error);
            }
        };
        match parse_status(&body) {
            Ok(()) => DeleteOutcome::Deleted,
            Err(ApiError::Rejected(reason)) => {
                warn!(
                    project = %project_name,
                    deployment = %deployment_id,
                    %reason,
                    "delete rejected by remote"
                );
                DeleteOutcome::Rejected(reason)
            }
            Err(error) => {
                warn!(
                    project = %project_name,
                    deployment = %deployment_id,
                    %error,
                    "delete response unreadable"
                );
                DeleteOutcome::Unreachable(error)
            }
        }
    }

    /// Send one request, then pause before anything else may be sent.
    pub(crate) async fn call(&self, method: Method, url: &Url) -> ApiResult<String> {
        let result = self.transport.send(method, url).await;
        self.throttle.pause().await;
        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::FixedDelay;

    const DELETE_URL: &str = "https://api.test/v4/accounts/acc/pages/projects/site/deployments/d1";

    fn api_client(
        transport: ScriptedTransport,
        delay: Duration,
    ) -> ApiClient<ScriptedTransport, FixedDelay> {
        let endpoints = Endpoints::new("https://api.test/v4", "acc", "pages", 5).unwrap();
        ApiClient::new(endpoints, transport, FixedDelay::new(delay))
    }

    #[tokio::test]
    async fn delete_confirmed() {
        let transport = ScriptedTransport::new().respond(
            Method::Delete,
            DELETE_URL,
            r#"{"success":true,"errors":[],"result":null}"#.into(),
        );
        let client = api_client(transport, Duration::ZERO);

        let outcome = client.delete_deployment("site", "d1").await;
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(outcome.is_confirmed());
        assert_eq!(client.transport().calls(), vec![(Method::Delete, DELETE_URL.to_string())]);
    }

    #[tokio::test]
    async fn delete_rejected() {
        let transport = ScriptedTransport::new().respond(
            Method::Delete,
            DELETE_URL,
            concat!(
                r#"{"success":false,"errors":[{"code":8000035,"#,
                r#""message":"Cannot delete an aliased deployment"}]}"#
            )
            .into(),
        );
        let client = api_client(transport, Duration::ZERO);

        let outcome = client.delete_deployment("site", "d1").await;
        assert_eq!(
            outcome,
            DeleteOutcome::Rejected("[8000035] Cannot delete an aliased deployment".to_string())
        );
        assert!(!outcome.is_confirmed());
    }

    #[tokio::test]
    async fn delete_unreachable_on_transport_or_garbage() {
        let transport = ScriptedTransport::new()
            .fail(Method::Delete, DELETE_URL, ApiError::Transport("timed out".into()))
            .respond(Method::Delete, DELETE_URL, "<html>bad gateway</html>".into());
        let client = api_client(transport, Duration::ZERO);

        assert_eq!(
            client.delete_deployment("site", "d1").await,
            DeleteOutcome::Unreachable(ApiError::Transport("timed out".into()))
        );
        assert!(matches!(
            client.delete_deployment("site", "d1").await,
            DeleteOutcome::Unreachable(ApiError::Parse(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn delete_is_throttled_even_when_it_fails() {
        let transport = ScriptedTransport::new()
            .fail(Method::Delete, DELETE_URL, ApiError::Transport("refused".into()));
        let client = api_client(transport, Duration::from_secs(2));

        let start = Instant::now();
        client.delete_deployment("site", "d1").await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }
}
