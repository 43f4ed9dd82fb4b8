//! Resource group definitions.

use super::DefinitionCore;
use crate::error::{Error, Result};
use crate::provider::{CreateRequest, Provider};
use crate::resource::{ProvisionedResource, ResourceKind, Tags};
use std::sync::Arc;

/// Fluent definition of a resource group.
///
/// ```no_run
/// # async fn demo(cloud: cloudcuts::Cloud) -> cloudcuts::Result<()> {
/// let group = cloud
///     .groups()
///     .define("grp1")
///     .with_region("westus")
///     .with_tag("env", "test")
///     .provision()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct GroupDefinition {
    core: DefinitionCore,
}

impl GroupDefinition {
    pub(crate) fn new(provider: Arc<dyn Provider>, name: impl Into<String>) -> Self {
        Self {
            core: DefinitionCore::new(provider, name),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.core.region = Some(region.into());
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

    /// Create the group. Fails with `InvalidState` before any provider call
    /// when the region is missing, and with `AlreadyProvisioned` on a second
    /// invocation.
    pub async fn provision(&mut self) -> Result<ProvisionedResource> {
        self.core.check_not_provisioned()?;
        let region = self.core.require_region()?.to_string();

        let name = self.core.name.clone();
        let state = self
            .core
            .provider
            .create_resource(
                CreateRequest::new(ResourceKind::Group, name.clone(), region)
                    .with_tags(self.core.tags.clone()),
            )
            .await
            .map_err(|e| Error::creation_failed(ResourceKind::Group, name, e))?;

        self.core.mark_provisioned();
        Ok(ProvisionedResource::new(state, self.core.provider.clone()))
    }
}
