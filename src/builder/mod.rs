//! Fluent resource definitions
//!
//! Builder-style definition chains: `define(name)` starts a definition,
//! `with_*` calls fill it in, and a terminal `provision()` resolves dependent
//! resources in a fixed order (group, then network and subnet, then public
//! address) before creating the target. Required fields are checked at
//! `provision()` time, before any provider call; a definition provisions at
//! most once.
//!
//! Each definition owns only the capability slots that apply to its kind,
//! composed from the shared [`DefinitionCore`] and `DependencySlot` values.

pub mod group;
pub mod load_balancer;
pub mod network;
pub mod public_address;
pub(crate) mod resolver;
pub mod virtual_machine;

pub use group::GroupDefinition;
pub use load_balancer::LoadBalancerDefinition;
pub use network::NetworkDefinition;
pub use public_address::PublicAddressDefinition;
pub use virtual_machine::{PrivateAddressMode, VirtualMachineDefinition};

use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::resource::Tags;
use std::sync::Arc;

/// Fields every definition carries: the target's name, region, tags, the
/// injected provider, and the single-shot provisioning flag.
pub(crate) struct DefinitionCore {
    pub provider: Arc<dyn Provider>,
    pub name: String,
    pub region: Option<String>,
    pub tags: Tags,
    provisioned: bool,
}

impl DefinitionCore {
    pub fn new(provider: Arc<dyn Provider>, name: impl Into<String>) -> Self {
        Self {
            provider,
            name: name.into(),
            region: None,
            tags: Tags::new(),
            provisioned: false,
        }
    }

    /// The declared region. `InvalidState` when `with_region` was never
    /// called; checked before any provider request is issued.
    pub fn require_region(&self) -> Result<&str> {
        self.region
            .as_deref()
            .ok_or(Error::InvalidState("region is not set"))
    }

    /// Reject a second `provision()` on the same definition.
    pub fn check_not_provisioned(&self) -> Result<()> {
        if self.provisioned {
            return Err(Error::AlreadyProvisioned);
        }
        Ok(())
    }

    /// Flip the single-shot flag. Called only after the target resource was
    /// created, so a failed run may be retried.
    pub fn mark_provisioned(&mut self) {
        self.provisioned = true;
    }
}
