//! Network definitions.

use super::{resolver, DefinitionCore};
use crate::error::{Error, Result};
use crate::provider::{CreateRequest, Provider};
use crate::resource::{DependencySlot, ProvisionedResource, ResourceId, ResourceKind, Tags};
use std::sync::Arc;

/// Address space used when a network definition does not declare one.
pub const DEFAULT_ADDRESS_SPACE: &str = "10.0.0.0/16";

/// Fluent definition of a virtual network.
///
/// A network lives inside a resource group; the group may be an existing one,
/// a new one with an explicit name, or a new one named after the network.
/// Subnets declared with `with_subnet` are created together with the network;
/// when none are declared the provider creates a default subnet.
pub struct NetworkDefinition {
    core: DefinitionCore,
    group: DependencySlot,
    address_space: Option<String>,
    subnets: Vec<String>,
}

impl NetworkDefinition {
    pub(crate) fn new(provider: Arc<dyn Provider>, name: impl Into<String>) -> Self {
        Self {
            core: DefinitionCore::new(provider, name),
            group: DependencySlot::pending_default(ResourceKind::Group),
            address_space: None,
            subnets: Vec::new(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.core.region = Some(region.into());
        self
    }

    /// Use an existing resource group.
    pub fn with_existing_group(mut self, group: impl Into<ResourceId>) -> Self {
        self.group = DependencySlot::existing(ResourceKind::Group, group);
        self
    }

    /// Create a new resource group named after this network.
    pub fn with_new_group(mut self) -> Self {
        self.group = DependencySlot::pending_default(ResourceKind::Group);
        self
    }

    /// Create a new resource group with the given name.
    pub fn with_new_group_named(mut self, name: impl Into<String>) -> Self {
        self.group = DependencySlot::pending(ResourceKind::Group, name);
        self
    }

    pub fn with_address_space(mut self, cidr: impl Into<String>) -> Self {
        self.address_space = Some(cidr.into());
        self
    }

    /// Declare a subnet to create together with the network.
    pub fn with_subnet(mut self, name: impl Into<String>) -> Self {
        self.subnets.push(name.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.core.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.core.tags = tags;
        self
    }

    /// Resolve the group, then create the network.
    pub async fn provision(&mut self) -> Result<ProvisionedResource> {
        self.core.check_not_provisioned()?;
        let region = self.core.require_region()?.to_string();
        let name = self.core.name.clone();

        let group = resolver::ensure_group(
            self.core.provider.as_ref(),
            &mut self.group,
            &name,
            &region,
        )
        .await?;

        let address_space = self
            .address_space
            .clone()
            .unwrap_or_else(|| DEFAULT_ADDRESS_SPACE.to_string());
        let mut properties = serde_json::json!({ "addressSpace": address_space });
        if !self.subnets.is_empty() {
            properties["subnets"] = serde_json::json!(self.subnets);
        }

        let state = self
            .core
            .provider
            .create_resource(
                CreateRequest::new(ResourceKind::Network, name.clone(), region)
                    .in_group(group)
                    .with_tags(self.core.tags.clone())
                    .with_properties(properties),
            )
            .await
            .map_err(|e| Error::creation_failed(ResourceKind::Network, name, e))?;

        self.core.mark_provisioned();
        Ok(ProvisionedResource::new(state, self.core.provider.clone()))
    }
}
