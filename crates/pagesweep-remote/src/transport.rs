//! Authenticated REST transport.
//!
//! [`Transport`] is the seam between the sweeper and the network: it sends
//! one request and hands back the raw response body. Status codes are not
//! interpreted here because the remote reports failures inside the body.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// HTTP verbs the sweeper issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Delete,
}

/// Boxed future alias for transport responses.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = ApiResult<String>> + Send + 'a>>;

/// Sends a single authenticated request and returns the response body.
pub trait Transport: Send + Sync {
    /// Issue `method` against `url` and return the response body.
    fn send<'a>(&'a self, method: Method, url: &'a Url) -> TransportFuture<'a>;
}

/// Production transport: bearer-token HTTPS via reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    token: String,
}

impl HttpTransport {
    pub fn new(token: &str, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pagesweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self {
            client,
            token: token.to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn send<'a>(&'a self, method: Method, url: &'a Url) -> TransportFuture<'a> {
        Box::pin(async move {
            let request = match method {
                Method::Get => self.client.get(url.clone()),
                Method::Delete => self.client.delete(url.clone()),
            };
            let response = request
                .bearer_auth(&self.token)
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            debug!(?method, %url, %status, bytes = body.len(), "response received");
            Ok(body)
        })
    }
}
