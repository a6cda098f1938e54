//! Service Discovery
//!
//! Publishes cluster services as DNS SRV records and resolves them back into
//! service descriptors, with fallbacks for clusters that have no records.
//! Also finds free ports on cluster nodes through a remote probe script.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

// === RE-EXPORTS ===
pub use config::{RegistrationMode, ServiceDiscoveryConfig};
pub use domain::cluster::{Cluster, Vm};
pub use domain::ports::LocalPortAllocator;
pub use domain::registration::RegistrationReport;
pub use domain::registry::DnsProviderRegistry;
pub use domain::service::ServiceDiscovery;
