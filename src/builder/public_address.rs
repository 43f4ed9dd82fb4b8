//! Public address definitions.

use super::{resolver, DefinitionCore};
use crate::error::{Error, Result};
use crate::provider::{CreateRequest, Provider};
use crate::resource::{DependencySlot, ProvisionedResource, ResourceId, ResourceKind, Tags};
use std::sync::Arc;

/// Fluent definition of a public address.
///
/// The leaf domain label defaults to the address's name lowercased.
pub struct PublicAddressDefinition {
    core: DefinitionCore,
    group: DependencySlot,
    leaf_domain_label: Option<String>,
}

impl PublicAddressDefinition {
    pub(crate) fn new(provider: Arc<dyn Provider>, name: impl Into<String>) -> Self {
        Self {
            core: DefinitionCore::new(provider, name),
            group: DependencySlot::pending_default(ResourceKind::Group),
            leaf_domain_label: None,
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

    /// Create a new resource group named after this address.
    pub fn with_new_group(mut self) -> Self {
        self.group = DependencySlot::pending_default(ResourceKind::Group);
        self
    }

    /// Create a new resource group with the given name.
    pub fn with_new_group_named(mut self, name: impl Into<String>) -> Self {
        self.group = DependencySlot::pending(ResourceKind::Group, name);
        self
    }

    /// Leaf domain label for the address. Stored lowercased.
    pub fn with_leaf_domain_label(mut self, label: impl Into<String>) -> Self {
        self.leaf_domain_label = Some(label.into().to_lowercase());
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

    /// Resolve the group, then create the public address.
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

        let label = self
            .leaf_domain_label
            .clone()
            .unwrap_or_else(|| name.to_lowercase());

        let state = self
            .core
            .provider
            .create_resource(
                CreateRequest::new(ResourceKind::PublicAddress, name.clone(), region)
                    .in_group(group)
                    .with_tags(self.core.tags.clone())
                    .with_properties(serde_json::json!({ "leafDomainLabel": label })),
            )
            .await
            .map_err(|e| Error::creation_failed(ResourceKind::PublicAddress, name, e))?;

        self.core.mark_provisioned();
        Ok(ProvisionedResource::new(state, self.core.provider.clone()))
    }
}
