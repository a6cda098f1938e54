use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;

/// Reserved tenant that owns shared services.
pub const SYSTEM_TENANT_NAME: &str = "system";

/// SRV priority at or above which a service is considered shared.
///
/// Protocol constant: every reader and writer of service records agrees on it.
pub const SHARED_PRIORITY_CLASS: u16 = 1000;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A machine in the cluster, identified by its 1-based ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(u32);

impl Node {
    #[must_use]
    pub const fn new(ordinal: u32) -> Self {
        Self(ordinal)
    }

    /// The 1-based ordinal.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position of the node's VM in the cluster inventory.
    ///
    /// Returns `None` for the invalid ordinal `0`.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        self.0
            .checked_sub(1)
            .and_then(|idx| usize::try_from(idx).ok())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Node {
    fn from(ordinal: u32) -> Self {
        Self(ordinal)
    }
}

// ---------------------------------------------------------------------------
// Service type / mode
// ---------------------------------------------------------------------------

/// Kind of endpoint a service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Sql,
    Ui,
}

impl ServiceType {
    /// Every service type, in a stable order.
    pub const ALL: [Self; 2] = [Self::Sql, Self::Ui];

    /// Literal used in record names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Ui => "ui",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| DiscoveryError::InvalidServiceType(s.to_owned()))
    }
}

/// How a service process relates to the tenant's default process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// Served by the shared system process.
    Shared,
    /// Served by a dedicated process.
    External,
}

impl ServiceMode {
    /// Classify a record priority.
    #[must_use]
    pub const fn from_priority(priority: u16) -> Self {
        if priority >= SHARED_PRIORITY_CLASS {
            Self::Shared
        } else {
            Self::External
        }
    }

    /// Priority written into records for this mode.
    #[must_use]
    pub const fn priority(self) -> u16 {
        match self {
            Self::Shared => SHARED_PRIORITY_CLASS,
            Self::External => 0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::External => "external",
        }
    }
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// A service instance running (or about to run) on a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Tenant that owns the service.
    pub tenant_name: String,
    pub service_type: ServiceType,
    pub service_mode: ServiceMode,
    /// Node the service runs on.
    pub node: Node,
    pub port: u16,
}

/// An unordered collection of service descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceDescriptors(Vec<ServiceDescriptor>);

impl ServiceDescriptors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, descriptor: ServiceDescriptor) {
        self.0.push(descriptor);
    }

    /// Keep only descriptors whose node is one of `nodes`.
    #[must_use]
    pub fn filter(self, nodes: &[Node]) -> Self {
        Self(
            self.0
                .into_iter()
                .filter(|desc| nodes.contains(&desc.node))
                .collect(),
        )
    }

    #[must_use]
    pub fn first(&self) -> Option<&ServiceDescriptor> {
        self.0.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<ServiceDescriptor> {
        self.0
    }
}

impl From<Vec<ServiceDescriptor>> for ServiceDescriptors {
    fn from(descriptors: Vec<ServiceDescriptor>) -> Self {
        Self(descriptors)
    }
}

impl FromIterator<ServiceDescriptor> for ServiceDescriptors {
    fn from_iter<I: IntoIterator<Item = ServiceDescriptor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<ServiceDescriptor> for ServiceDescriptors {
    fn extend<I: IntoIterator<Item = ServiceDescriptor>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ServiceDescriptors {
    type Item = ServiceDescriptor;
    type IntoIter = std::vec::IntoIter<ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ServiceDescriptors {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Services per node, keyed by service type. At most one descriptor per pair.
pub type NodeServiceMap = BTreeMap<Node, BTreeMap<ServiceType, ServiceDescriptor>>;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
