//! In-memory provider
//!
//! A deterministic, self-contained `Provider` backed by an ordered map. Used
//! for tests and local dry-runs: it records every creation request in order,
//! so callers can assert exactly which calls a provisioning flow issued (and
//! that invalid definitions issued none).

use super::{CreateRequest, Provider};
use crate::error::{Error, Result};
use crate::resource::{ResourceId, ResourceKind, ResourceState, Tags};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory `Provider` implementation.
///
/// Identifiers are path-shaped and deterministic: a group's identifier is its
/// name, grouped resources get `<group>/<kind-path>/<name>`. Creating a
/// resource under a name that already exists is an upsert. Creating a network
/// also creates its subnets (one `default` subnet when the request names
/// none) and lists them in the network's `members`, in creation order.
#[derive(Default)]
pub struct MemoryProvider {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    resources: BTreeMap<ResourceId, ResourceState>,
    creations: Vec<CreateRequest>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every creation request received so far, in call order. Includes the
    /// implicit network requests issued by dependency resolution, but not the
    /// subnets a network creation expands into.
    pub fn creations(&self) -> Vec<CreateRequest> {
        self.lock().creations.clone()
    }

    /// Number of creation requests received so far.
    pub fn creation_count(&self) -> usize {
        self.lock().creations.len()
    }

    // A poisoned lock means another caller panicked mid-operation; the map
    // itself is still consistent, so keep serving it.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mint_id(request: &CreateRequest) -> Result<ResourceId> {
        match (&request.kind, &request.group) {
            (ResourceKind::Group, _) => Ok(ResourceId::new(request.name.clone())),
            (kind, Some(group)) => Ok(ResourceId::new(format!(
                "{}/{}/{}",
                group,
                kind.path_segment(),
                request.name
            ))),
            (kind, None) => Err(Error::Provider(format!(
                "cannot create {kind} '{}' without a group",
                request.name
            ))),
        }
    }

    fn subnet_names(request: &CreateRequest) -> Vec<String> {
        let named: Vec<String> = request
            .properties
            .get("subnets")
            .and_then(|v| v.as_array())
            .map(|subnets| {
                subnets
                    .iter()
                    .filter_map(|s| {
                        s.as_str()
                            .map(String::from)
                            .or_else(|| s.get("name").and_then(|n| n.as_str()).map(String::from))
                    })
                    .collect()
            })
            .unwrap_or_default();

        if named.is_empty() {
            vec!["default".to_string()]
        } else {
            named
        }
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    async fn create_resource(&self, request: CreateRequest) -> Result<ResourceState> {
        let id = Self::mint_id(&request)?;
        tracing::debug!("memory create: {} '{}' -> {}", request.kind, request.name, id);

        let mut inner = self.lock();
        inner.creations.push(request.clone());

        let mut state = ResourceState {
            id: id.clone(),
            kind: request.kind,
            name: request.name.clone(),
            region: request.region.clone(),
            group: request.group.clone(),
            tags: request.tags.clone(),
            members: Vec::new(),
            created: Some(Utc::now()),
            properties: request.properties.clone(),
        };

        if request.kind == ResourceKind::Network {
            for subnet_name in Self::subnet_names(&request) {
                let subnet_id = ResourceId::new(format!("{}/subnets/{}", id, subnet_name));
                let subnet = ResourceState {
                    id: subnet_id.clone(),
                    kind: ResourceKind::Subnet,
                    name: subnet_name,
                    region: request.region.clone(),
                    group: request.group.clone(),
                    tags: Tags::new(),
                    members: Vec::new(),
                    created: Some(Utc::now()),
                    properties: serde_json::Value::Null,
                };
                inner.resources.insert(subnet_id.clone(), subnet);
                state.members.push(subnet_id);
            }
        }

        inner.resources.insert(id, state.clone());
        Ok(state)
    }

    async fn get_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<ResourceState> {
        let inner = self.lock();
        inner
            .resources
            .get(id)
            .filter(|state| state.kind == kind)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    async fn delete_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<()> {
        let mut inner = self.lock();
        let exists = inner
            .resources
            .get(id)
            .map(|state| state.kind == kind)
            .unwrap_or(false);
        if !exists {
            return Err(Error::NotFound(id.clone()));
        }
        inner.resources.remove(id);
        tracing::debug!("memory delete: {} {}", kind, id);
        Ok(())
    }

    async fn list_resources(
        &self,
        kind: ResourceKind,
        group: Option<&ResourceId>,
    ) -> Result<Vec<ResourceState>> {
        let inner = self.lock();
        Ok(inner
            .resources
            .values()
            .filter(|state| state.kind == kind)
            .filter(|state| group.is_none() || state.group.as_ref() == group)
            .cloned()
            .collect())
    }
}
