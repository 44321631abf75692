//! Volume operations.

use crate::client::Client;
use crate::defaults::merge_defaults;
use crate::error::{ClientError, Result};
use crate::normalize::normalize_object;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Result of a volume inspection.
///
/// A daemon 404 is a successful-but-negative outcome here, not an error:
/// `found` is false and `error_message` carries the daemon's explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeInspect {
    /// Whether the volume exists.
    pub found: bool,
    /// Daemon-supplied message when the volume was not found.
    pub error_message: Option<String>,
    /// Volume details when found.
    pub volume: Option<Value>,
}

impl Client {
    /// Creates a volume.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the payload names no volume, or an
    /// API error when the daemon reports a failure.
    pub async fn create_volume(&self, payload: Value) -> Result<Value> {
        let body = merge_defaults(
            &self.defaults.volume_create,
            normalize_object(payload, "volume create")?,
        );
        if !body.get("name").is_some_and(Value::is_string) {
            return Err(ClientError::validation("volume create requires a name"));
        }

        let response = self
            .transport
            .send("volume create", Method::POST, "/volumes", Some(&Value::Object(body)))
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Inspects a volume by name.
    ///
    /// # Errors
    ///
    /// Returns an error for any daemon failure other than "not found".
    pub async fn inspect_volume(&self, name: &str) -> Result<VolumeInspect> {
        let path = format!("/volumes/{}", urlencoding::encode(name));
        match self
            .transport
            .send("volume inspect", Method::GET, &path, None)
            .await
        {
            Ok(volume) => Ok(VolumeInspect {
                found: true,
                error_message: None,
                volume,
            }),
            Err(err) if err.is_not_found() => {
                let message = match &err {
                    ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
                    _ => "Volume not found".to_string(),
                };
                Ok(VolumeInspect {
                    found: false,
                    error_message: Some(message),
                    volume: None,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Lists volumes.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon reports a failure.
    pub async fn list_volumes(&self) -> Result<Value> {
        let response = self
            .transport
            .send("volume list", Method::GET, "/volumes", None)
            .await?;
        Ok(response.unwrap_or_else(|| json!([])))
    }

    /// Removes a volume by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon reports a failure.
    pub async fn remove_volume(&self, name: &str) -> Result<()> {
        let path = format!("/volumes/{}", urlencoding::encode(name));
        self.transport
            .send("volume remove", Method::DELETE, &path, None)
            .await?;
        Ok(())
    }
}
