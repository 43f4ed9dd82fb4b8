//! Provider interface
//!
//! The narrow boundary this crate consumes. Everything the builders and
//! collections do goes through these four calls; the real HTTP work,
//! serialization, and authentication live behind them. Providers are injected
//! explicitly (no lazily constructed global clients).

pub mod memory;
pub mod rest;

use crate::error::Result;
use crate::resource::{ResourceId, ResourceKind, ResourceState, Tags};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::MemoryProvider;
pub use rest::RestProvider;

/// A creation request assembled by the provisioning orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    pub kind: ResourceKind,
    pub name: String,
    pub region: String,
    /// Identifier of the owning resource group. `None` only when creating a
    /// group itself.
    pub group: Option<ResourceId>,
    #[serde(default)]
    pub tags: Tags,
    /// Kind-specific payload fields (address space, referenced identifiers).
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl CreateRequest {
    pub fn new(kind: ResourceKind, name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            region: region.into(),
            group: None,
            tags: Tags::new(),
            properties: serde_json::Value::Null,
        }
    }

    pub fn in_group(mut self, group: ResourceId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = properties;
        self
    }
}

/// The external management API, reduced to the calls this layer needs.
///
/// No retries, no caching, no timeouts here: each call maps to one exchange
/// with the provider and completes or fails before returning.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Create a resource and return its authoritative state.
    async fn create_resource(&self, request: CreateRequest) -> Result<ResourceState>;

    /// Read the current state of a resource. Fails with `NotFound` if the
    /// identifier does not exist.
    async fn get_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<ResourceState>;

    /// Delete a resource. Fails with `NotFound` if the identifier does not
    /// exist; never cascades at this layer.
    async fn delete_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<()>;

    /// List resources of one kind, optionally restricted to a group.
    async fn list_resources(
        &self,
        kind: ResourceKind,
        group: Option<&ResourceId>,
    ) -> Result<Vec<ResourceState>>;
}
