//! Error types for provisioning and provider calls.

use crate::resource::{ResourceId, ResourceKind};
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by definitions, resolvers, and providers.
#[derive(Debug, Error)]
pub enum Error {
    /// A terminal call was attempted before a required field was set.
    /// Raised at call time, before any provider request is issued.
    #[error("definition is not provisionable: {0}")]
    InvalidState(&'static str),

    /// Creating a resource (a dependency or the target itself) failed.
    /// Tagged with the kind and the name that was attempted, so a partially
    /// provisioned dependency graph can be diagnosed and cleaned up by the
    /// caller. Already-created sibling dependencies are not rolled back.
    #[error("failed to create {kind} '{name}'")]
    CreationFailed {
        kind: ResourceKind,
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// The requested resource does not exist at the provider.
    #[error("resource not found: {0}")]
    NotFound(ResourceId),

    /// `provision()` was called a second time on the same definition.
    #[error("definition has already been provisioned")]
    AlreadyProvisioned,

    /// The provider rejected a request with a non-success status.
    #[error("provider API request failed: {status} {message}")]
    Api { status: u16, message: String },

    /// A provider invariant was violated (e.g. a network with no subnets).
    #[error("provider error: {0}")]
    Provider(String),

    /// Transport-level failure from the HTTP client.
    #[error("HTTP transport error")]
    Http(#[from] reqwest::Error),

    /// A provider payload could not be parsed.
    #[error("failed to parse provider payload")]
    Payload(#[from] serde_json::Error),

    /// The configured endpoint is not a valid URL.
    #[error("invalid endpoint URL")]
    Endpoint(#[from] url::ParseError),

    /// Filesystem failure while reading or writing configuration.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a dependency-creation failure with its kind and attempted name.
    pub(crate) fn creation_failed(kind: ResourceKind, name: impl Into<String>, source: Error) -> Self {
        Error::CreationFailed {
            kind,
            name: name.into(),
            source: Box::new(source),
        }
    }
}
