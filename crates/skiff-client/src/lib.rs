//! Client library for the skiff container-runtime daemon.
//!
//! The daemon owns container execution, networking, storage, and the
//! serverless-function warm pool; this crate implements the client-side
//! request shaping layer in front of it:
//!
//! - **Normalization**: payloads may name fields with short aliases
//!   (`cmd`), camelCase (`imagePath`), or canonical snake_case; every
//!   mapping key in the tree is rewritten to canonical form.
//! - **Defaulting**: each operation merges the caller's payload over its
//!   default table; caller values always win.
//! - **Reshaping**: per-operation rules (forced async creation, exec script
//!   transcoding, name resolution, network narrowing) produce the final
//!   wire payload.
//! - **Transport**: one HTTP request per operation with timeout and
//!   optional bearer credential, failures classified into three typed
//!   error kinds.
//!
//! ```no_run
//! use serde_json::json;
//! use skiff_client::{Client, Config, ContainerRef};
//!
//! # async fn demo() -> skiff_client::Result<()> {
//! let client = Client::connect(&Config::default()).await?;
//! let created = client
//!     .create_container(json!({ "cmd": ["node", "app.js"], "mem": 256 }))
//!     .await?;
//! client
//!     .exec(&ContainerRef::from_arg("my-app"), json!({ "script": "echo hi" }))
//!     .await?;
//! # let _ = created;
//! # Ok(())
//! # }
//! ```

pub mod alias;
mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod normalize;
mod transport;

mod containers;
mod functions;
mod network;
mod system;
mod volumes;

pub use client::Client;
pub use config::Config;
pub use containers::{CONTAINER_ID_PREFIX, ContainerRef};
pub use defaults::{DEFAULT_IMAGE_PATH, DefaultTables};
pub use error::{ClientError, Result};
pub use functions::{FUNCTION_ID_PREFIX, FunctionRef};
pub use normalize::normalize;
pub use volumes::VolumeInspect;
