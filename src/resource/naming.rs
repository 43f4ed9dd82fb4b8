//! Default names for generated dependent resources.
//!
//! When a definition asks for a new dependency without naming it, the name is
//! derived deterministically from the owning resource's name plus a fixed
//! per-kind suffix. Public addresses instead reuse the owner's name lowercased,
//! since it doubles as a leaf domain label.

use super::ResourceKind;

/// Derive the default name for a generated resource of `kind` owned by
/// `owner`. Deterministic: the same inputs always produce the same name.
pub fn default_name(kind: ResourceKind, owner: &str) -> String {
    match kind {
        ResourceKind::Group => format!("{owner}group"),
        ResourceKind::Network => format!("{owner}net"),
        ResourceKind::Subnet => format!("{owner}subnet"),
        ResourceKind::PublicAddress => owner.to_lowercase(),
        ResourceKind::VirtualMachine => format!("{owner}vm"),
        ResourceKind::LoadBalancer => format!("{owner}lb"),
    }
}
