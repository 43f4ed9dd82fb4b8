//! References to dependent resources.
//!
//! A definition's dependency (its resource group, network, public address) is
//! either an existing resource referenced by identifier, or a pending one to
//! be created during provisioning under an explicit or derived name. The
//! reference is an explicit tagged variant rather than a mutable
//! existing/pending flag, so resolution state cannot drift.

use super::naming;
use super::{ResourceId, ResourceKind};

/// How a dependency slot refers to its resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceReference {
    /// An existing resource; resolution returns the identifier unchanged and
    /// performs no provider call.
    Existing(ResourceId),
    /// A resource to create under the given name.
    Pending(String),
    /// A resource to create under a name derived from the owner's name.
    PendingDefault,
}

/// A dependency slot: one kind plus the reference filled in by `with_*` calls.
///
/// Resolution is memoized per slot instance: once the pending resource has
/// been created, the slot switches to `Existing` and later resolutions reuse
/// the cached identifier without issuing a second creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySlot {
    kind: ResourceKind,
    reference: ResourceReference,
}

impl DependencySlot {
    pub fn existing(kind: ResourceKind, id: impl Into<ResourceId>) -> Self {
        Self {
            kind,
            reference: ResourceReference::Existing(id.into()),
        }
    }

    pub fn pending(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            reference: ResourceReference::Pending(name.into()),
        }
    }

    pub fn pending_default(kind: ResourceKind) -> Self {
        Self {
            kind,
            reference: ResourceReference::PendingDefault,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn reference(&self) -> &ResourceReference {
        &self.reference
    }

    /// The resolved identifier, if this slot already points at an existing
    /// resource.
    pub fn identifier(&self) -> Option<&ResourceId> {
        match &self.reference {
            ResourceReference::Existing(id) => Some(id),
            _ => None,
        }
    }

    /// The name to create the pending resource under, deriving the default
    /// from the owner's name when none was given. Must not be called on an
    /// `Existing` reference.
    pub(crate) fn creation_name(&self, owner: &str) -> String {
        match &self.reference {
            ResourceReference::Existing(id) => {
                unreachable!("creation_name on existing reference {id}")
            }
            ResourceReference::Pending(name) => name.clone(),
            ResourceReference::PendingDefault => naming::default_name(self.kind, owner),
        }
    }

    /// Record the identifier of the freshly created resource. Later
    /// resolutions of this slot return it without another creation call.
    pub(crate) fn mark_resolved(&mut self, id: ResourceId) {
        self.reference = ResourceReference::Existing(id);
    }
}
