//! Load balancer definitions.

use super::{resolver, DefinitionCore};
use crate::error::{Error, Result};
use crate::provider::{CreateRequest, Provider};
use crate::resource::{DependencySlot, ProvisionedResource, ResourceId, ResourceKind, Tags};
use std::sync::Arc;

/// Fluent definition of a load balancer.
///
/// The definition chain mirrors the stages a load balancer needs: a region,
/// a resource group, a public front end, then optional tags before
/// `provision()`. The front end defaults to a new public address named after
/// the balancer.
pub struct LoadBalancerDefinition {
    core: DefinitionCore,
    group: DependencySlot,
    front_end: DependencySlot,
}

impl LoadBalancerDefinition {
    pub(crate) fn new(provider: Arc<dyn Provider>, name: impl Into<String>) -> Self {
        Self {
            core: DefinitionCore::new(provider, name),
            group: DependencySlot::pending_default(ResourceKind::Group),
            front_end: DependencySlot::pending_default(ResourceKind::PublicAddress),
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

    /// Create a new resource group named after this balancer.
    pub fn with_new_group(mut self) -> Self {
        self.group = DependencySlot::pending_default(ResourceKind::Group);
        self
    }

    /// Create a new resource group with the given name.
    pub fn with_new_group_named(mut self, name: impl Into<String>) -> Self {
        self.group = DependencySlot::pending(ResourceKind::Group, name);
        self
    }

    /// Front the balancer with an existing public address.
    pub fn with_existing_front_end(mut self, address: impl Into<ResourceId>) -> Self {
        self.front_end = DependencySlot::existing(ResourceKind::PublicAddress, address);
        self
    }

    /// Front the balancer with a new public address (the default); its leaf
    /// domain label derives from the balancer's name.
    pub fn with_new_front_end(mut self) -> Self {
        self.front_end = DependencySlot::pending_default(ResourceKind::PublicAddress);
        self
    }

    /// Front the balancer with a new public address under the given leaf
    /// domain label.
    pub fn with_new_front_end_labeled(mut self, label: impl Into<String>) -> Self {
        self.front_end = DependencySlot::pending(
            ResourceKind::PublicAddress,
            label.into().to_lowercase(),
        );
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

    /// Resolve the group and front-end address, then create the balancer.
    pub async fn provision(&mut self) -> Result<ProvisionedResource> {
        self.core.check_not_provisioned()?;
        let region = self.core.require_region()?.to_string();
        let name = self.core.name.clone();
        let provider = self.core.provider.clone();

        let group =
            resolver::ensure_group(provider.as_ref(), &mut self.group, &name, &region).await?;

        let front_end = resolver::ensure_public_address(
            provider.as_ref(),
            &mut self.front_end,
            &name,
            &region,
            &group,
        )
        .await?;

        let state = provider
            .create_resource(
                CreateRequest::new(ResourceKind::LoadBalancer, name.clone(), region)
                    .in_group(group)
                    .with_tags(self.core.tags.clone())
                    .with_properties(serde_json::json!({
                        "frontEndPublicAddressId": front_end,
                    })),
            )
            .await
            .map_err(|e| Error::creation_failed(ResourceKind::LoadBalancer, name, e))?;

        self.core.mark_provisioned();
        Ok(ProvisionedResource::new(state, provider))
    }
}
