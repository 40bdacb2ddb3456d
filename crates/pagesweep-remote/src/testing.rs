//! Scripted transport for tests, here and in downstream crates
//! (`features = ["testing"]`).

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::Url;

use crate::error::{ApiError, ApiResult};
use crate::transport::{Method, Transport, TransportFuture};

type Script = HashMap<(Method, String), VecDeque<ApiResult<String>>>;

/// Replays canned responses per `(method, url)` and records every request.
///
/// Unscripted requests fail with [`ApiError::Transport`].
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
    calls: Mutex<Vec<(Method, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: Method, url: &str, body: String) -> Self {
        self.push(method, url, Ok(body))
    }

    pub fn fail(self, method: Method, url: &str, error: ApiError) -> Self {
        self.push(method, url, Err(error))
    }

    /// Every request so far, in order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        lock(&self.calls).clone()
    }

    /// URLs requested with `method`, in order.
    pub fn requests(&self, method: Method) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter(|(m, _)| *m == method)
            .map(|(_, url)| url.clone())
            .collect()
    }

    fn push(self, method: Method, url: &str, response: ApiResult<String>) -> Self {
        lock(&self.script)
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
        self
    }
}

impl Transport for ScriptedTransport {
    fn send<'a>(&'a self, method: Method, url: &'a Url) -> TransportFuture<'a> {
        let key = (method, url.to_string());
        lock(&self.calls).push(key.clone());
        let response = lock(&self.script)
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ApiError::Transport(format!("unscripted request {key:?}"))));
        Box::pin(async move { response })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A successful list envelope around pre-rendered JSON items.
pub fn list_body(items: &[String], total_pages: u32) -> String {
    format!(
        r#"{{"success":true,"errors":[],"messages":[],"result":[{}],"result_info":{{"page":1,"per_page":{},"total_pages":{}}}}}"#,
        items.join(","),
        items.len(),
        total_pages
    )
}

/// A successful status envelope, as returned by a delete.
pub fn status_ok() -> String {
    r#"{"success":true,"errors":[],"messages":[],"result":null}"#.to_string()
}

pub fn project_json(id: &str, name: &str) -> String {
    format!(r#"{{"id":"{id}","name":"{name}","subdomain":"{name}.pages.dev"}}"#)
}
