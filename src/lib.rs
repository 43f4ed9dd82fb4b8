//! Fluent provisioning shortcuts for cloud resource management APIs.
//!
//! This crate is a thin convenience layer over a narrow provider interface:
//! builder-style definition chains that declare a target resource together
//! with its dependent resources (resource group, network and subnet, public
//! address), where each dependency is referenced by existing identifier,
//! created fresh under an explicit or derived name, or omitted. The terminal
//! `provision()` call resolves dependencies in order, creating what is
//! missing, then creates the target referencing the resolved identifiers.
//!
//! ```no_run
//! # async fn demo() -> cloudcuts::Result<()> {
//! use cloudcuts::{Cloud, MemoryProvider};
//!
//! let cloud = Cloud::new(MemoryProvider::new());
//!
//! // Provisions the group "vm1group" in westus, then the machine itself.
//! let vm = cloud
//!     .virtual_machines()
//!     .define("vm1")
//!     .with_region("westus")
//!     .provision()
//!     .await?;
//!
//! assert_eq!(vm.name(), "vm1");
//! # Ok(())
//! # }
//! ```
//!
//! Everything network-facing goes through the injected [`Provider`]; the
//! bundled [`RestProvider`] speaks a bearer-token JSON management API, and
//! [`MemoryProvider`] is a deterministic in-memory stand-in for tests.
//! There are no retries, no caching, and no cancellation at this layer, and
//! a definition must not be shared across threads while it is being built.

pub mod builder;
pub mod cloud;
pub mod config;
pub mod error;
pub mod provider;
pub mod resource;

pub use builder::{
    GroupDefinition, LoadBalancerDefinition, NetworkDefinition, PrivateAddressMode,
    PublicAddressDefinition, VirtualMachineDefinition,
};
pub use cloud::Cloud;
pub use config::Config;
pub use error::{Error, Result};
pub use provider::{CreateRequest, MemoryProvider, Provider, RestProvider};
pub use resource::{
    DependencySlot, ProvisionedResource, ResourceId, ResourceKind, ResourceReference,
    ResourceState, Tags,
};
