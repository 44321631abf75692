//! Serverless-function operations.
//!
//! The warm pool behind function invocation is maintained by the daemon;
//! these operations only issue requests and read state.

use crate::client::Client;
use crate::defaults::merge_defaults;
use crate::error::{ClientError, Result};
use crate::normalize::normalize_object;
use reqwest::Method;
use serde_json::{Value, json};

/// Identifier prefix the daemon assigns to functions.
pub const FUNCTION_ID_PREFIX: &str = "fn-";

/// A function, addressed by opaque identifier or by human-readable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionRef {
    /// Service-assigned opaque identifier.
    Id(String),
    /// Human-readable name, resolved via a lookup call.
    Name(String),
}

impl FunctionRef {
    /// Builds a reference from a CLI-style argument.
    ///
    /// Arguments carrying the daemon's `fn-` identifier prefix are treated
    /// as identifiers; everything else is a name to resolve.
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with(FUNCTION_ID_PREFIX) {
            Self::Id(arg.to_string())
        } else {
            Self::Name(arg.to_string())
        }
    }
}

impl Client {
    /// Lists functions.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon reports a failure.
    pub async fn list_functions(&self) -> Result<Value> {
        let response = self
            .transport
            .send("function list", Method::GET, "/functions", None)
            .await?;
        Ok(response.unwrap_or_else(|| json!([])))
    }

    /// Creates a function.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the payload names no function, or an
    /// API error when the daemon reports a failure.
    pub async fn create_function(&self, payload: Value) -> Result<Value> {
        let body = merge_defaults(
            &self.defaults.function_create,
            normalize_object(payload, "function create")?,
        );
        if !body.get("function_name").is_some_and(Value::is_string) {
            return Err(ClientError::validation(
                "function create requires a function_name",
            ));
        }

        let response = self
            .transport
            .send("function create", Method::POST, "/functions", Some(&Value::Object(body)))
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Fetches a function's details.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn get_function(&self, function: &FunctionRef) -> Result<Value> {
        let id = self.resolve_function(function).await?;
        let response = self
            .transport
            .send("function get", Method::GET, &format!("/functions/{id}"), None)
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Deploys a function's current source.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn deploy_function(&self, function: &FunctionRef, payload: Value) -> Result<Value> {
        let body = merge_defaults(
            &self.defaults.function_deploy,
            normalize_object(payload, "function deploy")?,
        );
        let id = self.resolve_function(function).await?;
        let response = self
            .transport
            .send(
                "function deploy",
                Method::POST,
                &format!("/functions/{id}/deploy"),
                Some(&Value::Object(body)),
            )
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Invokes a function.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn invoke_function(&self, function: &FunctionRef, payload: Value) -> Result<Value> {
        let body = merge_defaults(
            &self.defaults.function_invoke,
            normalize_object(payload, "function invoke")?,
        );
        let id = self.resolve_function(function).await?;
        let response = self
            .transport
            .send(
                "function invoke",
                Method::POST,
                &format!("/functions/{id}/invoke"),
                Some(&Value::Object(body)),
            )
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Pauses a function's warm pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn pause_function(&self, function: &FunctionRef) -> Result<Option<Value>> {
        let body = merge_defaults(&self.defaults.function_pause, Default::default());
        let id = self.resolve_function(function).await?;
        self.transport
            .send(
                "function pause",
                Method::POST,
                &format!("/functions/{id}/pause"),
                Some(&Value::Object(body)),
            )
            .await
    }

    /// Resumes a paused function.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn resume_function(&self, function: &FunctionRef) -> Result<Option<Value>> {
        let body = merge_defaults(&self.defaults.function_resume, Default::default());
        let id = self.resolve_function(function).await?;
        self.transport
            .send(
                "function resume",
                Method::POST,
                &format!("/functions/{id}/resume"),
                Some(&Value::Object(body)),
            )
            .await
    }

    /// Rolls a function back to a previous version, or to the latest
    /// previous version when none is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn rollback_function(
        &self,
        function: &FunctionRef,
        version: Option<&str>,
    ) -> Result<Value> {
        let body = match version {
            Some(version) => json!({ "version": version }),
            None => json!({}),
        };
        let id = self.resolve_function(function).await?;
        let response = self
            .transport
            .send(
                "function rollback",
                Method::POST,
                &format!("/functions/{id}/rollback"),
                Some(&body),
            )
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Reports the daemon-side warm pool state for a function.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn function_pool(&self, function: &FunctionRef) -> Result<Value> {
        let id = self.resolve_function(function).await?;
        let response = self
            .transport
            .send("function pool", Method::GET, &format!("/functions/{id}/pool"), None)
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Lists recent invocations of a function.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn function_invocations(
        &self,
        function: &FunctionRef,
        limit: Option<u32>,
    ) -> Result<Value> {
        let id = self.resolve_function(function).await?;
        let query = match limit {
            Some(n) => format!("?limit={n}"),
            None => String::new(),
        };
        let response = self
            .transport
            .send(
                "function invocations",
                Method::GET,
                &format!("/functions/{id}/invocations{query}"),
                None,
            )
            .await?;
        Ok(response.unwrap_or_else(|| json!([])))
    }

    /// Lists deployed versions of a function.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn function_versions(&self, function: &FunctionRef) -> Result<Value> {
        let id = self.resolve_function(function).await?;
        let response = self
            .transport
            .send(
                "function versions",
                Method::GET,
                &format!("/functions/{id}/versions"),
                None,
            )
            .await?;
        Ok(response.unwrap_or_else(|| json!([])))
    }

    /// Resolves a reference to the daemon's opaque identifier.
    pub(crate) async fn resolve_function(&self, function: &FunctionRef) -> Result<String> {
        match function {
            FunctionRef::Id(id) => Ok(id.clone()),
            FunctionRef::Name(name) => {
                let path = format!("/functions?name={}", urlencoding::encode(name));
                let response = self
                    .transport
                    .send("function resolve", Method::GET, &path, None)
                    .await?;
                let id = response
                    .as_ref()
                    .and_then(Value::as_array)
                    .and_then(|entries| {
                        entries.iter().find(|entry| {
                            entry.get("name").and_then(Value::as_str) == Some(name)
                        })
                    })
                    .and_then(|entry| entry.get("id"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                id.ok_or_else(|| {
                    ClientError::validation(format!("no function found with name '{name}'"))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_from_arg() {
        assert_eq!(
            FunctionRef::from_arg("fn-42ab"),
            FunctionRef::Id("fn-42ab".to_string())
        );
        assert_eq!(
            FunctionRef::from_arg("thumbnailer"),
            FunctionRef::Name("thumbnailer".to_string())
        );
    }
}
