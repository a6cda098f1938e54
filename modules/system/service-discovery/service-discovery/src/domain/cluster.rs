use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use service_discovery_sdk::{DiscoveryError, Node, Result};

/// Name of the single-machine simulated cluster.
pub const LOCAL_CLUSTER_NAME: &str = "local";

/// A machine backing one cluster node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vm {
    /// Publicly resolvable host name or address.
    pub public_dns: String,
    /// Name of the DNS provider that owns this VM's records.
    #[serde(default)]
    pub dns_provider: Option<String>,
}

impl Vm {
    #[must_use]
    pub fn new(public_dns: impl Into<String>) -> Self {
        Self {
            public_dns: public_dns.into(),
            dns_provider: None,
        }
    }

    #[must_use]
    pub fn with_dns_provider(mut self, provider: impl Into<String>) -> Self {
        self.dns_provider = Some(provider.into());
        self
    }
}

/// Cluster inventory: VM `i` backs node `i + 1`.
#[derive(Debug, Clone)]
pub struct Cluster {
    name: String,
    vms: Vec<Vm>,
    local: bool,
}

/// Local clusters are named `local` or `local-<suffix>`, where the suffix is
/// non-empty ASCII alphanumerics and hyphens.
#[must_use]
pub fn is_local_cluster_name(name: &str) -> bool {
    match name.strip_prefix(LOCAL_CLUSTER_NAME) {
        Some("") => true,
        Some(rest) => rest.strip_prefix('-').is_some_and(|suffix| {
            !suffix.is_empty()
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        }),
        None => false,
    }
}

impl Cluster {
    #[must_use]
    pub fn new(name: impl Into<String>, vms: Vec<Vm>) -> Self {
        let name = name.into();
        let local = is_local_cluster_name(&name);
        Self { name, vms, local }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn vms(&self) -> &[Vm] {
        &self.vms
    }

    /// Whether every node is simulated on this machine.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.local
    }

    /// All nodes in ordinal order.
    #[must_use]
    pub fn nodes(&self) -> Vec<Node> {
        (1..).zip(&self.vms).map(|(ordinal, _)| Node::new(ordinal)).collect()
    }

    /// VM backing `node`.
    ///
    /// # Errors
    /// Returns `DiscoveryError::NodeOutOfRange` if the node is not part of the cluster.
    pub fn vm(&self, node: Node) -> Result<&Vm> {
        node.index()
            .and_then(|idx| self.vms.get(idx))
            .ok_or(DiscoveryError::NodeOutOfRange(node))
    }

    /// SRV target name for `node`.
    ///
    /// Local nodes share one public name, so the ordinal is appended to keep
    /// targets unique. Targets always end with a period.
    ///
    /// # Errors
    /// Returns `DiscoveryError::NodeOutOfRange` if the node is not part of the cluster.
    pub fn target_dns_name(&self, node: Node) -> Result<String> {
        let vm = self.vm(node)?;
        Ok(if self.local {
            format!("{}.{node}.", vm.public_dns)
        } else {
            format!("{}.", vm.public_dns)
        })
    }

    /// Map every node's target name back to the node.
    pub(crate) fn target_index(&self) -> HashMap<String, Node> {
        self.nodes()
            .into_iter()
            .filter_map(|node| self.target_dns_name(node).ok().map(|name| (name, node)))
            .collect()
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
