//! Container operations.

use crate::client::Client;
use crate::defaults::{DEFAULT_IMAGE_PATH, merge_defaults};
use crate::error::{ClientError, Result};
use crate::normalize::normalize_object;
use crate::transport::query_string;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Method;
use serde_json::{Map, Value, json};

/// Identifier prefix the daemon assigns to containers.
pub const CONTAINER_ID_PREFIX: &str = "c-";

/// A container, addressed by opaque identifier or by human-readable name.
///
/// Names are resolved to identifiers at the boundary of each operation;
/// resolution is never cached, so two calls with the same name each perform
/// their own lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRef {
    /// Service-assigned opaque identifier.
    Id(String),
    /// Human-readable name, resolved via a lookup call.
    Name(String),
}

impl ContainerRef {
    /// Builds a reference from a CLI-style argument.
    ///
    /// Arguments carrying the daemon's `c-` identifier prefix are treated as
    /// identifiers; everything else is a name to resolve.
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with(CONTAINER_ID_PREFIX) {
            Self::Id(arg.to_string())
        } else {
            Self::Name(arg.to_string())
        }
    }
}

impl Client {
    /// Lists containers, with optional filters rendered into the query
    /// string (e.g. `name`, `status`, `all`).
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon reports a failure.
    pub async fn list_containers(&self, filters: Value) -> Result<Value> {
        let filters = normalize_object(filters, "container list")?;
        let path = format!("/containers{}", query_string(&filters));
        let body = self
            .transport
            .send("container list", Method::GET, &path, None)
            .await?;
        Ok(body.unwrap_or_else(|| json!([])))
    }

    /// Creates a container.
    ///
    /// The payload may use any accepted naming convention; it is normalized
    /// and merged over the container-create defaults. The async flag is
    /// forced to `true` when the caller leaves it unset, and the default
    /// image path is substituted when no image reference is supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not an object or the daemon
    /// reports a failure.
    pub async fn create_container(&self, payload: Value) -> Result<Value> {
        let mut body = merge_defaults(
            &self.defaults.container_create,
            normalize_object(payload, "container create")?,
        );

        // Non-blocking creation is the forced default, not merely a fallback.
        if !body.contains_key("async_mode") {
            body.insert("async_mode".to_string(), Value::Bool(true));
        }
        if !body.contains_key("image_path") {
            body.insert("image_path".to_string(), Value::String(DEFAULT_IMAGE_PATH.to_string()));
        }

        let response = self
            .transport
            .send("container create", Method::POST, "/containers", Some(&Value::Object(body)))
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Starts a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn start_container(&self, container: &ContainerRef) -> Result<Option<Value>> {
        let id = self.resolve_container(container).await?;
        self.transport
            .send("container start", Method::POST, &format!("/containers/{id}/start"), None)
            .await
    }

    /// Executes a command in a running container.
    ///
    /// The payload must carry the command in one of four shapes: a plain
    /// string (run through a shell), a sequence of argument strings, a
    /// `{script_base64}` object, or a `{script_parts}` object. A
    /// convenience `script` field is also accepted and is transcoded to the
    /// single base64-encoded form so embedded newlines survive transport.
    ///
    /// # Errors
    ///
    /// Returns a validation error, before any exec request is sent, when
    /// neither a command nor a script is present or the shape is invalid.
    pub async fn exec(&self, container: &ContainerRef, payload: Value) -> Result<Value> {
        let mut body = merge_defaults(
            &self.defaults.container_exec,
            normalize_object(payload, "container exec")?,
        );
        reshape_exec_command(&mut body)?;

        let id = self.resolve_container(container).await?;
        let response = self
            .transport
            .send(
                "container exec",
                Method::POST,
                &format!("/containers/{id}/exec"),
                Some(&Value::Object(body)),
            )
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Stops a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn stop_container(
        &self,
        container: &ContainerRef,
        payload: Value,
    ) -> Result<Option<Value>> {
        let body = merge_defaults(
            &self.defaults.container_stop,
            normalize_object(payload, "container stop")?,
        );
        let id = self.resolve_container(container).await?;
        self.transport
            .send(
                "container stop",
                Method::POST,
                &format!("/containers/{id}/stop"),
                Some(&Value::Object(body)),
            )
            .await
    }

    /// Removes a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn remove_container(&self, container: &ContainerRef, force: bool) -> Result<()> {
        let id = self.resolve_container(container).await?;
        self.transport
            .send(
                "container remove",
                Method::DELETE,
                &format!("/containers/{id}?force={force}"),
                None,
            )
            .await?;
        Ok(())
    }

    /// Fetches container logs.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be resolved or the daemon
    /// reports a failure.
    pub async fn container_logs(
        &self,
        container: &ContainerRef,
        tail: Option<u32>,
    ) -> Result<Value> {
        let id = self.resolve_container(container).await?;
        let query = match tail {
            Some(n) => format!("?tail={n}"),
            None => String::new(),
        };
        let response = self
            .transport
            .send(
                "container logs",
                Method::GET,
                &format!("/containers/{id}/logs{query}"),
                None,
            )
            .await?;
        Ok(response.unwrap_or(Value::Null))
    }

    /// Resolves a reference to the daemon's opaque identifier.
    ///
    /// A name that matches no container fails with a locally-constructed
    /// validation error naming it; the primary request is never attempted.
    pub(crate) async fn resolve_container(&self, container: &ContainerRef) -> Result<String> {
        match container {
            ContainerRef::Id(id) => Ok(id.clone()),
            ContainerRef::Name(name) => {
                let path = format!("/containers?name={}", urlencoding::encode(name));
                let response = self
                    .transport
                    .send("container resolve", Method::GET, &path, None)
                    .await?;
                lookup_id(response.as_ref(), name).ok_or_else(|| {
                    ClientError::validation(format!("no container found with name '{name}'"))
                })
            }
        }
    }
}

/// Picks the identifier of the entry whose `name` matches exactly.
fn lookup_id(response: Option<&Value>, name: &str) -> Option<String> {
    response?
        .as_array()?
        .iter()
        .find(|entry| entry.get("name").and_then(Value::as_str) == Some(name))?
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Validates the exec command shape, transcoding the `script` convenience
/// field into the single base64-encoded structured form.
fn reshape_exec_command(body: &mut Map<String, Value>) -> Result<()> {
    if let Some(script) = body.remove("script") {
        let Value::String(text) = script else {
            return Err(ClientError::validation("script must be a string"));
        };
        let encoded = BASE64.encode(text.as_bytes());
        body.insert("command".to_string(), json!({ "script_base64": encoded }));
        return Ok(());
    }

    match body.get("command") {
        Some(Value::String(_)) => Ok(()),
        Some(Value::Array(args)) => {
            if args.iter().all(Value::is_string) {
                Ok(())
            } else {
                Err(ClientError::validation(
                    "command arguments must all be strings",
                ))
            }
        }
        Some(Value::Object(structured)) => {
            let single = structured.get("script_base64").is_some_and(Value::is_string);
            let parts = structured
                .get("script_parts")
                .and_then(Value::as_array)
                .is_some_and(|p| p.iter().all(Value::is_string));
            if single != parts {
                Ok(())
            } else {
                Err(ClientError::validation(
                    "structured command must carry exactly one of script_base64 or script_parts",
                ))
            }
        }
        Some(_) => Err(ClientError::validation(
            "command must be a string, an argument array, or a script object",
        )),
        None => Err(ClientError::validation("exec requires a command or script")),
    }
}
