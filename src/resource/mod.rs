//! Resource model
//!
//! Identifiers, kinds, provider-authoritative state snapshots, and the
//! `ProvisionedResource` handle returned by terminal `provision()` calls.

pub mod naming;
pub mod reference;

use crate::error::Result;
use crate::provider::Provider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use reference::{DependencySlot, ResourceReference};

/// Resource tags. Insertion order is irrelevant.
pub type Tags = HashMap<String, String>;

/// Opaque resource identifier minted by a provider.
///
/// Identifiers are compared and ordered as plain strings. A resource group's
/// identifier is its name at this layer; identifiers of grouped resources are
/// provider-defined paths.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kinds of resources this layer knows how to reference and create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Group,
    Network,
    Subnet,
    PublicAddress,
    VirtualMachine,
    LoadBalancer,
}

impl ResourceKind {
    /// Stable URL path segment for this kind, used by providers.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::Group => "groups",
            ResourceKind::Network => "networks",
            ResourceKind::Subnet => "subnets",
            ResourceKind::PublicAddress => "public-addresses",
            ResourceKind::VirtualMachine => "virtual-machines",
            ResourceKind::LoadBalancer => "load-balancers",
        }
    }

    /// Whether resources of this kind live inside a resource group.
    pub fn is_grouped(&self) -> bool {
        !matches!(self, ResourceKind::Group)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Group => "group",
            ResourceKind::Network => "network",
            ResourceKind::Subnet => "subnet",
            ResourceKind::PublicAddress => "public address",
            ResourceKind::VirtualMachine => "virtual machine",
            ResourceKind::LoadBalancer => "load balancer",
        };
        f.write_str(name)
    }
}

/// Authoritative resource state as reported by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub name: String,
    pub region: String,
    /// Identifier of the owning resource group, if any.
    #[serde(default)]
    pub group: Option<ResourceId>,
    #[serde(default)]
    pub tags: Tags,
    /// Identifiers of child resources (e.g. the subnets of a network).
    /// Providers define the order; callers must not rely on a specific one.
    #[serde(default)]
    pub members: Vec<ResourceId>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Kind-specific payload fields, passed through untouched.
    #[serde(default)]
    pub properties: serde_json::Value,
}

/// Handle to a successfully provisioned (or fetched) resource.
///
/// Immutable by convention: accessors read a snapshot taken at provisioning
/// time, and `refresh()` replaces the snapshot with authoritative state from
/// the provider.
#[derive(Clone)]
pub struct ProvisionedResource {
    state: ResourceState,
    provider: Arc<dyn Provider>,
}

impl ProvisionedResource {
    pub(crate) fn new(state: ResourceState, provider: Arc<dyn Provider>) -> Self {
        Self { state, provider }
    }

    pub fn id(&self) -> &ResourceId {
        &self.state.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.state.kind
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn region(&self) -> &str {
        &self.state.region
    }

    pub fn group(&self) -> Option<&ResourceId> {
        self.state.group.as_ref()
    }

    pub fn tags(&self) -> &Tags {
        &self.state.tags
    }

    /// Child resource identifiers (e.g. subnets of a network).
    pub fn members(&self) -> &[ResourceId] {
        &self.state.members
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.state.created
    }

    /// The full state snapshot this handle wraps.
    pub fn state(&self) -> &ResourceState {
        &self.state
    }

    /// Re-read authoritative state from the provider.
    pub async fn refresh(&mut self) -> Result<()> {
        self.state = self
            .provider
            .get_resource(self.state.kind, &self.state.id)
            .await?;
        Ok(())
    }

    /// Delete this resource at the provider. Does not cascade to dependent
    /// resources unless the provider itself cascades.
    pub async fn delete(self) -> Result<()> {
        self.provider
            .delete_resource(self.state.kind, &self.state.id)
            .await
    }
}

impl fmt::Debug for ProvisionedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionedResource")
            .field("id", &self.state.id)
            .field("kind", &self.state.kind)
            .field("name", &self.state.name)
            .field("region", &self.state.region)
            .finish_non_exhaustive()
    }
}
