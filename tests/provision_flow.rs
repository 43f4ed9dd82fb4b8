//! End-to-end provisioning flows against the in-memory provider.
//!
//! These tests pin down the observable contract of the fluent definitions:
//! which creation calls a flow issues, in which order, and that invalid or
//! repeated terminal calls issue none.

use async_trait::async_trait;
use cloudcuts::{
    Cloud, CreateRequest, Error, MemoryProvider, Provider, ResourceId, ResourceKind, ResourceState,
};
use std::sync::Arc;

fn cloud_with_recorder() -> (Cloud, Arc<MemoryProvider>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let provider = Arc::new(MemoryProvider::new());
    (Cloud::with_provider(provider.clone()), provider)
}

#[tokio::test]
async fn bare_vm_creates_default_group_then_machine() {
    let (cloud, provider) = cloud_with_recorder();

    let vm = cloud
        .virtual_machines()
        .define("vm1")
        .with_region("westus")
        .provision()
        .await
        .expect("provisioning should succeed");

    let creations = provider.creations();
    assert_eq!(creations.len(), 2, "exactly group then machine");

    assert_eq!(creations[0].kind, ResourceKind::Group);
    assert_eq!(creations[0].name, "vm1group");
    assert_eq!(creations[0].region, "westus");
    assert_eq!(creations[0].group, None);

    assert_eq!(creations[1].kind, ResourceKind::VirtualMachine);
    assert_eq!(creations[1].name, "vm1");
    assert_eq!(creations[1].region, "westus");
    assert_eq!(creations[1].group, Some(ResourceId::from("vm1group")));

    assert_eq!(vm.name(), "vm1");
    assert_eq!(vm.region(), "westus");
    assert_eq!(vm.group(), Some(&ResourceId::from("vm1group")));
}

#[tokio::test]
async fn existing_group_is_referenced_not_created() {
    let (cloud, provider) = cloud_with_recorder();

    cloud
        .virtual_machines()
        .define("vm1")
        .with_region("westus")
        .with_existing_group("grp1")
        .provision()
        .await
        .unwrap();

    let creations = provider.creations();
    assert_eq!(creations.len(), 1, "no group creation call");
    assert_eq!(creations[0].kind, ResourceKind::VirtualMachine);
    assert_eq!(creations[0].group, Some(ResourceId::from("grp1")));
}

#[tokio::test]
async fn provision_without_region_fails_before_any_call() {
    let (cloud, provider) = cloud_with_recorder();

    let err = cloud
        .virtual_machines()
        .define("vm1")
        .provision()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidState(_)), "got {err:?}");
    assert_eq!(provider.creation_count(), 0);

    let err = cloud.groups().define("grp1").provision().await.unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
    assert_eq!(provider.creation_count(), 0);
}

#[tokio::test]
async fn second_provision_is_rejected() {
    let (cloud, provider) = cloud_with_recorder();

    let mut definition = cloud
        .virtual_machines()
        .define("vm1")
        .with_region("westus");
    definition.provision().await.unwrap();
    let count = provider.creation_count();

    let err = definition.provision().await.unwrap_err();
    assert!(matches!(err, Error::AlreadyProvisioned), "got {err:?}");
    assert_eq!(provider.creation_count(), count, "no further calls");
}

#[tokio::test]
async fn new_network_is_provisioned_between_group_and_machine() {
    let (cloud, provider) = cloud_with_recorder();

    cloud
        .virtual_machines()
        .define("vm1")
        .with_region("westus")
        .with_new_network("10.0.0.0/28")
        .provision()
        .await
        .unwrap();

    let creations = provider.creations();
    let kinds: Vec<ResourceKind> = creations.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ResourceKind::Group,
            ResourceKind::Network,
            ResourceKind::VirtualMachine
        ]
    );
    assert_eq!(creations[1].name, "vm1net");
    assert_eq!(creations[1].properties["addressSpace"], "10.0.0.0/28");

    let vm_props = &creations[2].properties;
    assert!(vm_props["networkId"].is_string());
    assert!(vm_props["subnetId"].is_string());
    assert!(vm_props["publicAddressId"].is_null());
}

#[tokio::test]
async fn subnet_pick_chooses_one_of_the_network_members() {
    let (cloud, _provider) = cloud_with_recorder();

    let network = cloud
        .networks()
        .define("net1")
        .with_region("westus")
        .with_existing_group("grp1")
        .with_subnet("a")
        .with_subnet("b")
        .provision()
        .await
        .unwrap();
    assert_eq!(network.members().len(), 2);

    let vm = cloud
        .virtual_machines()
        .define("vm1")
        .with_region("westus")
        .with_existing_group("grp1")
        .with_existing_network(network.id().clone())
        .provision()
        .await
        .unwrap();

    let picked = vm.state().properties["subnetId"].as_str().unwrap();
    let picked = ResourceId::from(picked);
    assert!(
        network.members().contains(&picked),
        "picked subnet must be one of the network's"
    );
}

#[tokio::test]
async fn explicit_subnet_wins_over_auto_pick() {
    let (cloud, _provider) = cloud_with_recorder();

    let network = cloud
        .networks()
        .define("net1")
        .with_region("westus")
        .with_existing_group("grp1")
        .with_subnet("a")
        .with_subnet("b")
        .provision()
        .await
        .unwrap();
    let chosen = network.members()[1].clone();

    let vm = cloud
        .virtual_machines()
        .define("vm1")
        .with_region("westus")
        .with_existing_group("grp1")
        .with_existing_network(network.id().clone())
        .with_subnet(chosen.clone())
        .provision()
        .await
        .unwrap();

    assert_eq!(
        vm.state().properties["subnetId"].as_str().unwrap(),
        chosen.as_str()
    );
}

#[tokio::test]
async fn load_balancer_front_end_defaults_to_new_public_address() {
    let (cloud, provider) = cloud_with_recorder();

    cloud
        .load_balancers()
        .define("LB1")
        .with_region("westus")
        .with_existing_group("grp1")
        .with_tag("env", "test")
        .provision()
        .await
        .unwrap();

    let creations = provider.creations();
    let kinds: Vec<ResourceKind> = creations.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ResourceKind::PublicAddress, ResourceKind::LoadBalancer]
    );
    // Public address names double as leaf domain labels, so lowercase.
    assert_eq!(creations[0].name, "lb1");
    assert!(creations[1].properties["frontEndPublicAddressId"].is_string());
    assert_eq!(creations[1].tags.get("env").map(String::as_str), Some("test"));
}

#[tokio::test]
async fn delete_missing_identifier_is_not_found() {
    let (cloud, provider) = cloud_with_recorder();

    let err = cloud
        .virtual_machines()
        .delete("grp1/virtual-machines/ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
    assert_eq!(provider.creation_count(), 0);
}

#[tokio::test]
async fn listing_and_get_reflect_provider_state() {
    let (cloud, _provider) = cloud_with_recorder();

    for name in ["alpha", "beta"] {
        cloud
            .groups()
            .define(name)
            .with_region("westus")
            .provision()
            .await
            .unwrap();
    }

    let groups = cloud.groups().list().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups.contains_key(&ResourceId::from("alpha")));
    assert!(groups.contains_key(&ResourceId::from("beta")));

    let fetched = cloud.groups().get("alpha").await.unwrap();
    assert_eq!(fetched.name(), "alpha");

    let err = cloud.groups().get("gamma").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn refresh_rereads_authoritative_state() {
    let (cloud, _provider) = cloud_with_recorder();

    let mut group = cloud
        .groups()
        .define("grp1")
        .with_region("westus")
        .with_tag("env", "test")
        .provision()
        .await
        .unwrap();

    group.refresh().await.unwrap();
    assert_eq!(group.name(), "grp1");
    assert_eq!(group.tags().get("env").map(String::as_str), Some("test"));

    group.clone().delete().await.unwrap();
    let err = group.refresh().await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

/// Delegates to an in-memory provider but rejects creations of one kind.
/// Models a provider-side failure after some dependencies already exist.
struct FailingKind {
    inner: Arc<MemoryProvider>,
    rejected: ResourceKind,
}

#[async_trait]
impl Provider for FailingKind {
    async fn create_resource(&self, request: CreateRequest) -> cloudcuts::Result<ResourceState> {
        if request.kind == self.rejected {
            return Err(Error::Provider("quota exceeded".to_string()));
        }
        self.inner.create_resource(request).await
    }

    async fn get_resource(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> cloudcuts::Result<ResourceState> {
        self.inner.get_resource(kind, id).await
    }

    async fn delete_resource(&self, kind: ResourceKind, id: &ResourceId) -> cloudcuts::Result<()> {
        self.inner.delete_resource(kind, id).await
    }

    async fn list_resources(
        &self,
        kind: ResourceKind,
        group: Option<&ResourceId>,
    ) -> cloudcuts::Result<Vec<ResourceState>> {
        self.inner.list_resources(kind, group).await
    }
}

#[tokio::test]
async fn partial_failure_leaves_created_dependencies_in_place() {
    let memory = Arc::new(MemoryProvider::new());
    let cloud = Cloud::new(FailingKind {
        inner: memory.clone(),
        rejected: ResourceKind::VirtualMachine,
    });

    let mut definition = cloud
        .virtual_machines()
        .define("vm1")
        .with_region("westus");

    let err = definition.provision().await.unwrap_err();
    match err {
        Error::CreationFailed { kind, name, .. } => {
            assert_eq!(kind, ResourceKind::VirtualMachine);
            assert_eq!(name, "vm1");
        }
        other => panic!("expected CreationFailed, got {other:?}"),
    }

    // The group created before the failure is not rolled back.
    memory
        .get_resource(ResourceKind::Group, &ResourceId::from("vm1group"))
        .await
        .expect("group should still exist");

    // A retry reuses the memoized group: still exactly one group creation.
    let err = definition.provision().await.unwrap_err();
    assert!(matches!(err, Error::CreationFailed { .. }));
    let group_creations = memory
        .creations()
        .iter()
        .filter(|c| c.kind == ResourceKind::Group)
        .count();
    assert_eq!(group_creations, 1);
}
