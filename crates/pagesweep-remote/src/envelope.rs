//! Response envelopes shared by every endpoint.
//!
//! List calls answer `{success, result: [...], result_info: {total_pages}}`;
//! deletes answer `{success}`. Failures are reported in-band through
//! `success: false` plus an `errors` array, often with a non-2xx status.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

/// One entry of the envelope's `errors` array.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    success: bool,
    result: Option<Vec<T>>,
    result_info: Option<ResultInfo>,
    errors: Option<Vec<ApiMessage>>,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    success: bool,
    #[serde(default)]
    errors: Option<Vec<ApiMessage>>,
}

/// The useful part of a successful list response.
#[derive(Debug, PartialEq)]
pub struct ListBody<T> {
    pub items: Vec<T>,
    /// `None` when the response carried no pagination metadata.
    pub total_pages: Option<u32>,
}

/// Decode a list response body.
pub fn parse_list<T: DeserializeOwned>(body: &str) -> ApiResult<ListBody<T>> {
    let envelope: ListEnvelope<T> =
        serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    if !envelope.success {
        return Err(ApiError::Rejected(describe(envelope.errors.as_deref())));
    }
    Ok(ListBody {
        items: envelope.result.unwrap_or_default(),
        total_pages: envelope.result_info.and_then(|info| info.total_pages),
    })
}

/// Decode a delete (or any status-only) response body.
pub fn parse_status(body: &str) -> ApiResult<()> {
    let envelope: StatusEnvelope =
        serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    if envelope.success {
        Ok(())
    } else {
        Err(ApiError::Rejected(describe(envelope.errors.as_deref())))
    }
}

fn describe(errors: Option<&[ApiMessage]>) -> String {
    match errors {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(|m| format!("[{}] {}", m.code, m.message))
            .collect::<Vec<_>>()
            .join("; "),
        _ => "success=false".to_string(),
    }
}
