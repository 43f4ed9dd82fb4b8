//! Dependency resolution
//!
//! Each `ensure_*` helper resolves one dependency slot to a concrete
//! identifier: existing references are returned unchanged with no provider
//! call, pending references are created (under an explicit or derived name)
//! and the slot is switched to existing so repeated resolution reuses the
//! same resource. Failures wrap as `CreationFailed`; siblings that were
//! already created stay in place.

use crate::error::{Error, Result};
use crate::provider::{CreateRequest, Provider};
use crate::resource::{DependencySlot, ResourceId, ResourceKind};

/// Resolve the resource-group slot. Runs first: later dependencies need the
/// group identifier and region fixed.
pub(crate) async fn ensure_group(
    provider: &dyn Provider,
    slot: &mut DependencySlot,
    owner: &str,
    region: &str,
) -> Result<ResourceId> {
    if let Some(id) = slot.identifier() {
        return Ok(id.clone());
    }

    let name = slot.creation_name(owner);
    tracing::info!("creating resource group '{}' in {}", name, region);

    let state = provider
        .create_resource(CreateRequest::new(ResourceKind::Group, name.clone(), region))
        .await
        .map_err(|e| Error::creation_failed(ResourceKind::Group, name, e))?;

    slot.mark_resolved(state.id.clone());
    Ok(state.id)
}

/// Resolve the network slot within an already-resolved group.
pub(crate) async fn ensure_network(
    provider: &dyn Provider,
    slot: &mut DependencySlot,
    owner: &str,
    region: &str,
    group: &ResourceId,
    address_space: &str,
    subnets: &[String],
) -> Result<ResourceId> {
    if let Some(id) = slot.identifier() {
        return Ok(id.clone());
    }

    let name = slot.creation_name(owner);
    tracing::info!("creating network '{}' in {} ({})", name, group, address_space);

    let mut properties = serde_json::json!({ "addressSpace": address_space });
    if !subnets.is_empty() {
        properties["subnets"] = serde_json::json!(subnets);
    }

    let state = provider
        .create_resource(
            CreateRequest::new(ResourceKind::Network, name.clone(), region)
                .in_group(group.clone())
                .with_properties(properties),
        )
        .await
        .map_err(|e| Error::creation_failed(ResourceKind::Network, name, e))?;

    slot.mark_resolved(state.id.clone());
    Ok(state.id)
}

/// Pick the subnet to attach to. An explicit choice is returned unchanged;
/// otherwise the first subnet of the resolved network is taken. Which subnet
/// "first" is when several exist is provider-defined and not a guarantee.
pub(crate) async fn ensure_subnet(
    provider: &dyn Provider,
    network: &ResourceId,
    explicit: Option<&ResourceId>,
) -> Result<ResourceId> {
    if let Some(id) = explicit {
        return Ok(id.clone());
    }

    let state = provider.get_resource(ResourceKind::Network, network).await?;
    if state.members.is_empty() {
        return Err(Error::Provider(format!("network {network} has no subnets")));
    }
    if state.members.len() > 1 {
        tracing::warn!(
            "network {} has {} subnets and none was chosen; picking '{}'",
            network,
            state.members.len(),
            state.members[0]
        );
    }
    Ok(state.members[0].clone())
}

/// Resolve the public-address slot within an already-resolved group. The
/// default name doubles as the leaf domain label, so it is the owner's name
/// lowercased.
pub(crate) async fn ensure_public_address(
    provider: &dyn Provider,
    slot: &mut DependencySlot,
    owner: &str,
    region: &str,
    group: &ResourceId,
) -> Result<ResourceId> {
    if let Some(id) = slot.identifier() {
        return Ok(id.clone());
    }

    let name = slot.creation_name(owner);
    tracing::info!("creating public address '{}' in {}", name, group);

    let state = provider
        .create_resource(
            CreateRequest::new(ResourceKind::PublicAddress, name.clone(), region)
                .in_group(group.clone())
                .with_properties(serde_json::json!({ "leafDomainLabel": name })),
        )
        .await
        .map_err(|e| Error::creation_failed(ResourceKind::PublicAddress, name, e))?;

    slot.mark_resolved(state.id.clone());
    Ok(state.id)
}
