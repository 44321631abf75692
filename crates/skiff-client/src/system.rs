//! System operations: health, version, metrics.

use crate::client::Client;
use crate::defaults::merge_defaults;
use crate::error::Result;
use crate::normalize::normalize_object;
use crate::transport::query_string;
use reqwest::Method;
use serde_json::Value;

impl Client {
    /// Probes daemon health.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon is unreachable or unhealthy.
    pub async fn health(&self) -> Result<Value> {
        let response = self
            .transport
            .send("health", Method::GET, "/health", None)
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Fetches the daemon's version report.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon reports a failure.
    pub async fn server_version(&self) -> Result<Value> {
        let response = self
            .transport
            .send("version", Method::GET, "/version", None)
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Queries system metrics.
    ///
    /// Caller filters are normalized and merged over the metrics-query
    /// defaults, then rendered into the query string.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon reports a failure.
    pub async fn metrics(&self, filters: Value) -> Result<Value> {
        let params = merge_defaults(
            &self.defaults.metrics_query,
            normalize_object(filters, "metrics query")?,
        );
        let path = format!("/system/metrics{}", query_string(&params));
        let response = self
            .transport
            .send("metrics query", Method::GET, &path, None)
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }
}
