//! HTTP transport to the skiff daemon.
//!
//! One generic request/response cycle: JSON in, JSON out, bearer credential
//! when configured, caller-configured timeout. Failures are classified into
//! the status space the error type documents: service statuses as reported,
//! timeouts as 408, connection-level failures as 0.

use crate::config::Config;
use crate::error::{ClientError, Result, STATUS_TIMEOUT, STATUS_UNREACHABLE};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, trace};

/// HTTP transport bound to one daemon address.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl Transport {
    /// Creates a transport from configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// practice).
    pub(crate) fn new(config: &Config) -> Self {
        let http = HttpClient::builder()
            .user_agent(concat!("skiff/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.bearer_token().map(str::to_string),
        }
    }

    /// Returns the daemon base address.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request and returns the parsed response body.
    ///
    /// Returns `None` for responses with no body (204 or empty), without
    /// attempting a JSON parse.
    pub(crate) async fn send(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, url = %url, operation, "dispatching request");

        let mut request = self.http.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_send_error(operation, &e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ClientError::Api {
            operation,
            status: status.as_u16(),
            message: format!("failed to read response body: {e}"),
            detail: None,
        })?;

        trace!(status = status.as_u16(), body_len = text.len(), operation, "received response");

        if !status.is_success() {
            return Err(service_error(operation, status, &text));
        }

        if status == StatusCode::NO_CONTENT || text.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|_| ClientError::Api {
                operation,
                status: status.as_u16(),
                message: "invalid JSON in response body".to_string(),
                detail: None,
            })
    }
}

/// Classifies a request that never produced a response.
fn classify_send_error(operation: &'static str, err: &reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::Api {
            operation,
            status: STATUS_TIMEOUT,
            message: "request timed out".to_string(),
            detail: None,
        };
    }
    ClientError::Api {
        operation,
        status: STATUS_UNREACHABLE,
        message: format!("connection failed: {err}"),
        detail: None,
    }
}

/// Builds the typed failure for a non-2xx response.
///
/// The daemon reports errors as `{"error": "...", "detail": "..."}`; when
/// the body is not valid JSON the raw text is substituted as the message.
fn service_error(operation: &'static str, status: StatusCode, body: &str) -> ClientError {
    let (message, detail) = match serde_json::from_str::<Value>(body) {
        Ok(parsed) => {
            let message = parsed
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or(body)
                .to_string();
            let detail = parsed
                .get("detail")
                .and_then(Value::as_str)
                .map(str::to_string);
            (message, detail)
        }
        Err(_) => (body.to_string(), None),
    };

    ClientError::Api {
        operation,
        status: status.as_u16(),
        message,
        detail,
    }
}

/// Renders a map of scalar filters as a query string, empty map included.
pub(crate) fn query_string(params: &Map<String, Value>) -> String {
    let mut parts = Vec::new();
    for (key, value) in params {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        parts.push(format!("{key}={}", urlencoding::encode(&rendered)));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}
