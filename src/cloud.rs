//! Entry point and typed resource collections.
//!
//! `Cloud` is an explicit dependency-injection context: it holds an
//! already-constructed provider and hands out typed collection accessors.
//! Collections query the provider directly on every call; nothing is cached
//! at this layer.

use crate::builder::{
    GroupDefinition, LoadBalancerDefinition, NetworkDefinition, PublicAddressDefinition,
    VirtualMachineDefinition,
};
use crate::error::Result;
use crate::provider::Provider;
use crate::resource::{ProvisionedResource, ResourceId, ResourceKind};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Root handle over an injected provider.
///
/// ```no_run
/// # async fn demo() -> cloudcuts::Result<()> {
/// use cloudcuts::{Cloud, RestProvider};
///
/// let provider = RestProvider::new("https://management.example.com", "token")?;
/// let cloud = Cloud::new(provider);
///
/// let vm = cloud
///     .virtual_machines()
///     .define("vm1")
///     .with_region("westus")
///     .provision()
///     .await?;
/// println!("provisioned {}", vm.id());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Cloud {
    provider: Arc<dyn Provider>,
}

impl Cloud {
    pub fn new(provider: impl Provider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn with_provider(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub fn groups(&self) -> Groups {
        Groups(Collection::new(ResourceKind::Group, self.provider.clone()))
    }

    pub fn networks(&self) -> Networks {
        Networks(Collection::new(ResourceKind::Network, self.provider.clone()))
    }

    pub fn public_addresses(&self) -> PublicAddresses {
        PublicAddresses(Collection::new(
            ResourceKind::PublicAddress,
            self.provider.clone(),
        ))
    }

    pub fn virtual_machines(&self) -> VirtualMachines {
        VirtualMachines(Collection::new(
            ResourceKind::VirtualMachine,
            self.provider.clone(),
        ))
    }

    pub fn load_balancers(&self) -> LoadBalancers {
        LoadBalancers(Collection::new(
            ResourceKind::LoadBalancer,
            self.provider.clone(),
        ))
    }
}

/// Shared collection behavior: list, get, delete against one resource kind.
struct Collection {
    kind: ResourceKind,
    provider: Arc<dyn Provider>,
}

impl Collection {
    fn new(kind: ResourceKind, provider: Arc<dyn Provider>) -> Self {
        Self { kind, provider }
    }

    async fn list(
        &self,
        group: Option<&ResourceId>,
    ) -> Result<BTreeMap<ResourceId, ProvisionedResource>> {
        let states = self.provider.list_resources(self.kind, group).await?;
        Ok(states
            .into_iter()
            .map(|state| {
                (
                    state.id.clone(),
                    ProvisionedResource::new(state, self.provider.clone()),
                )
            })
            .collect())
    }

    async fn get(&self, id: &ResourceId) -> Result<ProvisionedResource> {
        let state = self.provider.get_resource(self.kind, id).await?;
        Ok(ProvisionedResource::new(state, self.provider.clone()))
    }

    async fn delete(&self, id: &ResourceId) -> Result<()> {
        self.provider.delete_resource(self.kind, id).await
    }
}

macro_rules! collection_accessors {
    () => {
        /// Read one resource by identifier. Fails with `NotFound` when the
        /// identifier does not exist.
        pub async fn get(&self, id: impl Into<ResourceId>) -> Result<ProvisionedResource> {
            self.0.get(&id.into()).await
        }

        /// Delete one resource by identifier. Does not cascade to dependent
        /// resources.
        pub async fn delete(&self, id: impl Into<ResourceId>) -> Result<()> {
            self.0.delete(&id.into()).await
        }
    };
}

/// Resource group collection.
pub struct Groups(Collection);

impl Groups {
    /// Start a fluent group definition.
    pub fn define(&self, name: impl Into<String>) -> GroupDefinition {
        GroupDefinition::new(self.0.provider.clone(), name)
    }

    /// All resource groups, keyed by identifier.
    pub async fn list(&self) -> Result<BTreeMap<ResourceId, ProvisionedResource>> {
        self.0.list(None).await
    }

    collection_accessors!();
}

/// Network collection.
pub struct Networks(Collection);

impl Networks {
    pub fn define(&self, name: impl Into<String>) -> NetworkDefinition {
        NetworkDefinition::new(self.0.provider.clone(), name)
    }

    /// Networks within one resource group, keyed by identifier.
    pub async fn list_in(
        &self,
        group: impl Into<ResourceId>,
    ) -> Result<BTreeMap<ResourceId, ProvisionedResource>> {
        self.0.list(Some(&group.into())).await
    }

    collection_accessors!();
}

/// Public address collection.
pub struct PublicAddresses(Collection);

impl PublicAddresses {
    pub fn define(&self, name: impl Into<String>) -> PublicAddressDefinition {
        PublicAddressDefinition::new(self.0.provider.clone(), name)
    }

    pub async fn list_in(
        &self,
        group: impl Into<ResourceId>,
    ) -> Result<BTreeMap<ResourceId, ProvisionedResource>> {
        self.0.list(Some(&group.into())).await
    }

    collection_accessors!();
}

/// Virtual machine collection.
pub struct VirtualMachines(Collection);

impl VirtualMachines {
    pub fn define(&self, name: impl Into<String>) -> VirtualMachineDefinition {
        VirtualMachineDefinition::new(self.0.provider.clone(), name)
    }

    pub async fn list_in(
        &self,
        group: impl Into<ResourceId>,
    ) -> Result<BTreeMap<ResourceId, ProvisionedResource>> {
        self.0.list(Some(&group.into())).await
    }

    collection_accessors!();
}

/// Load balancer collection.
pub struct LoadBalancers(Collection);

impl LoadBalancers {
    pub fn define(&self, name: impl Into<String>) -> LoadBalancerDefinition {
        LoadBalancerDefinition::new(self.0.provider.clone(), name)
    }

    pub async fn list_in(
        &self,
        group: impl Into<ResourceId>,
    ) -> Result<BTreeMap<ResourceId, ProvisionedResource>> {
        self.0.list(Some(&group.into())).await
    }

    collection_accessors!();
}
