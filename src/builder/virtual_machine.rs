//! Virtual machine definitions.

use super::{resolver, DefinitionCore};
use crate::error::{Error, Result};
use crate::provider::{CreateRequest, Provider};
use crate::resource::{DependencySlot, ProvisionedResource, ResourceId, ResourceKind, Tags};
use std::sync::Arc;

/// How the machine's private address is allocated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PrivateAddressMode {
    /// Provider-assigned address.
    #[default]
    Dynamic,
    /// Fixed address supplied by the caller.
    Static(String),
}

/// Fluent definition of a virtual machine.
///
/// Only the region is mandatory. The resource group defaults to a new group
/// named `<name>group`; network and public address are omitted unless a
/// `with_*` call declares them. Dependencies resolve in a fixed order at
/// `provision()` time: group, then network and subnet, then public address,
/// then the machine itself.
///
/// ```no_run
/// # async fn demo(cloud: cloudcuts::Cloud) -> cloudcuts::Result<()> {
/// let vm = cloud
///     .virtual_machines()
///     .define("vm1")
///     .with_region("westus")
///     .with_existing_group("grp1")
///     .with_new_network("10.0.0.0/28")
///     .with_new_public_address()
///     .provision()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct VirtualMachineDefinition {
    core: DefinitionCore,
    group: DependencySlot,
    network: Option<DependencySlot>,
    network_address_space: Option<String>,
    subnet: Option<ResourceId>,
    public_address: Option<DependencySlot>,
    private_address: PrivateAddressMode,
}

impl VirtualMachineDefinition {
    pub(crate) fn new(provider: Arc<dyn Provider>, name: impl Into<String>) -> Self {
        Self {
            core: DefinitionCore::new(provider, name),
            group: DependencySlot::pending_default(ResourceKind::Group),
            network: None,
            network_address_space: None,
            subnet: None,
            public_address: None,
            private_address: PrivateAddressMode::Dynamic,
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

    /// Create a new resource group named after this machine.
    pub fn with_new_group(mut self) -> Self {
        self.group = DependencySlot::pending_default(ResourceKind::Group);
        self
    }

    /// Create a new resource group with the given name.
    pub fn with_new_group_named(mut self, name: impl Into<String>) -> Self {
        self.group = DependencySlot::pending(ResourceKind::Group, name);
        self
    }

    /// Attach to an existing network.
    pub fn with_existing_network(mut self, network: impl Into<ResourceId>) -> Self {
        self.network = Some(DependencySlot::existing(ResourceKind::Network, network));
        self
    }

    /// Create a new network named after this machine, with the given address
    /// space.
    pub fn with_new_network(mut self, address_space: impl Into<String>) -> Self {
        self.network = Some(DependencySlot::pending_default(ResourceKind::Network));
        self.network_address_space = Some(address_space.into());
        self
    }

    /// Create a new network with the given name and address space.
    pub fn with_new_network_named(
        mut self,
        name: impl Into<String>,
        address_space: impl Into<String>,
    ) -> Self {
        self.network = Some(DependencySlot::pending(ResourceKind::Network, name));
        self.network_address_space = Some(address_space.into());
        self
    }

    /// Attach to a specific subnet of the network. Without this, the first
    /// subnet of the resolved network is picked; when the network has several
    /// subnets that pick is provider-defined, not a guarantee.
    pub fn with_subnet(mut self, subnet: impl Into<ResourceId>) -> Self {
        self.subnet = Some(subnet.into());
        self
    }

    /// Associate an existing public address.
    pub fn with_existing_public_address(mut self, address: impl Into<ResourceId>) -> Self {
        self.public_address = Some(DependencySlot::existing(ResourceKind::PublicAddress, address));
        self
    }

    /// Create a new public address; its name and leaf domain label derive
    /// from this machine's name.
    pub fn with_new_public_address(mut self) -> Self {
        self.public_address = Some(DependencySlot::pending_default(ResourceKind::PublicAddress));
        self
    }

    /// Create a new public address with the given leaf domain label.
    pub fn with_new_public_address_labeled(mut self, label: impl Into<String>) -> Self {
        self.public_address = Some(DependencySlot::pending(
            ResourceKind::PublicAddress,
            label.into().to_lowercase(),
        ));
        self
    }

    /// No public address (the default).
    pub fn without_public_address(mut self) -> Self {
        self.public_address = None;
        self
    }

    pub fn with_private_address_dynamic(mut self) -> Self {
        self.private_address = PrivateAddressMode::Dynamic;
        self
    }

    pub fn with_private_address_static(mut self, address: impl Into<String>) -> Self {
        self.private_address = PrivateAddressMode::Static(address.into());
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

    /// Resolve dependencies in order, then create the machine.
    pub async fn provision(&mut self) -> Result<ProvisionedResource> {
        self.core.check_not_provisioned()?;
        let region = self.core.require_region()?.to_string();
        let name = self.core.name.clone();
        let provider = self.core.provider.clone();

        let group =
            resolver::ensure_group(provider.as_ref(), &mut self.group, &name, &region).await?;

        let mut network_id = None;
        let mut subnet_id = None;
        if let Some(network) = self.network.as_mut() {
            let address_space = self
                .network_address_space
                .as_deref()
                .unwrap_or(super::network::DEFAULT_ADDRESS_SPACE);
            let id = resolver::ensure_network(
                provider.as_ref(),
                network,
                &name,
                &region,
                &group,
                address_space,
                &[],
            )
            .await?;
            subnet_id =
                Some(resolver::ensure_subnet(provider.as_ref(), &id, self.subnet.as_ref()).await?);
            network_id = Some(id);
        }

        let mut public_address_id = None;
        if let Some(address) = self.public_address.as_mut() {
            public_address_id = Some(
                resolver::ensure_public_address(
                    provider.as_ref(),
                    address,
                    &name,
                    &region,
                    &group,
                )
                .await?,
            );
        }

        let private_address = match &self.private_address {
            PrivateAddressMode::Dynamic => serde_json::json!({ "mode": "dynamic" }),
            PrivateAddressMode::Static(address) => {
                serde_json::json!({ "mode": "static", "address": address })
            }
        };

        let state = provider
            .create_resource(
                CreateRequest::new(ResourceKind::VirtualMachine, name.clone(), region)
                    .in_group(group)
                    .with_tags(self.core.tags.clone())
                    .with_properties(serde_json::json!({
                        "networkId": network_id,
                        "subnetId": subnet_id,
                        "publicAddressId": public_address_id,
                        "privateAddress": private_address,
                    })),
            )
            .await
            .map_err(|e| Error::creation_failed(ResourceKind::VirtualMachine, name, e))?;

        self.core.mark_provisioned();
        Ok(ProvisionedResource::new(state, provider))
    }
}
