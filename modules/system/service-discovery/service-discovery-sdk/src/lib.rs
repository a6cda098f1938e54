//! Service Discovery SDK
//!
//! Contracts shared between the service-discovery module and its collaborators:
//!
//! - **Models**: nodes, service types and modes, service descriptors
//! - **DNS records**: the record shape exchanged with DNS providers
//! - **Collaborator traits**: [`DnsProvider`] and [`RemoteExecutor`]
//! - **Errors**: [`DiscoveryError`] for public operations, plus the error types
//!   collaborators report back
//!
//! The SDK holds no runtime logic. Discovery, registration and port allocation
//! live in the `service_discovery` crate.

#![forbid(unsafe_code)]

pub mod api;
pub mod dns;
pub mod error;
pub mod models;

pub use api::{DnsProvider, RemoteExecutor};
pub use dns::{DnsRecord, DnsRecordType, SrvData};
pub use error::{DiscoveryError, ExecError, ProviderError, RecordParseError, Result};
pub use models::{
    Node, NodeServiceMap, SHARED_PRIORITY_CLASS, SYSTEM_TENANT_NAME, ServiceDescriptor,
    ServiceDescriptors, ServiceMode, ServiceType,
};
