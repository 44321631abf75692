//! Network configuration operations.

use crate::client::Client;
use crate::containers::ContainerRef;
use crate::error::{ClientError, Result};
use crate::normalize::normalize_object;
use reqwest::Method;
use serde_json::{Map, Value};

impl Client {
    /// Applies network settings to a container.
    ///
    /// The payload carries a nested `network_config` object (any naming
    /// convention); only the fields the daemon accepts for mutation are
    /// sent: the address, plus the gateway when setup is complete. When
    /// setup is incomplete an explicit null is sent instead, which clears
    /// any previously set gateway.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the payload carries no usable
    /// network configuration, or an API error on daemon failure.
    pub async fn set_network(
        &self,
        container: &ContainerRef,
        payload: Value,
    ) -> Result<Option<Value>> {
        let outer = normalize_object(payload, "network set")?;
        let body = narrow_network_body(&outer)?;

        let id = self.resolve_container(container).await?;
        self.transport
            .send(
                "network set",
                Method::PUT,
                &format!("/containers/{id}/network"),
                Some(&Value::Object(body)),
            )
            .await
    }

    /// Asks the daemon to tear down orphaned network state.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon reports a failure.
    pub async fn cleanup_network(&self) -> Result<Option<Value>> {
        self.transport
            .send("network cleanup", Method::POST, "/admin/network/cleanup", None)
            .await
    }
}

/// Narrows a normalized payload to the flat body the daemon accepts.
fn narrow_network_body(outer: &Map<String, Value>) -> Result<Map<String, Value>> {
    let config = outer
        .get("network_config")
        .and_then(Value::as_object)
        .ok_or_else(|| ClientError::validation("network set requires a network_config object"))?;

    let address = config
        .get("address")
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::validation("network_config requires an address"))?;

    let mut body = Map::new();
    body.insert("address".to_string(), Value::String(address.to_string()));

    let setup_complete = config
        .get("setup_complete")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if setup_complete {
        if let Some(gateway) = config.get("gateway") {
            body.insert("gateway".to_string(), gateway.clone());
        }
    } else {
        // Incomplete setup clears any previously configured gateway.
        body.insert("gateway".to_string(), Value::Null);
    }

    Ok(body)
}
