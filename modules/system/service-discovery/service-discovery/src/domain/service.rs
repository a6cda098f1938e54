use std::sync::Arc;

use service_discovery_sdk::RemoteExecutor;

use super::cluster::Cluster;
use super::ports::LocalPortAllocator;
use super::registry::DnsProviderRegistry;
use crate::config::ServiceDiscoveryConfig;

/// Service discovery, registration and port allocation for one cluster.
///
/// Operations are split across `discovery`, `registration` and `ports`.
#[derive(Clone)]
pub struct ServiceDiscovery {
    pub(crate) cluster: Arc<Cluster>,
    pub(crate) providers: Arc<DnsProviderRegistry>,
    pub(crate) executor: Arc<dyn RemoteExecutor>,
    pub(crate) local_ports: Arc<LocalPortAllocator>,
    pub(crate) config: ServiceDiscoveryConfig,
}

impl ServiceDiscovery {
    /// Create a service with default configuration and a fresh local port
    /// allocator.
    #[must_use]
    pub fn new(
        cluster: Arc<Cluster>,
        providers: Arc<DnsProviderRegistry>,
        executor: Arc<dyn RemoteExecutor>,
    ) -> Self {
        Self {
            cluster,
            providers,
            executor,
            local_ports: Arc::new(LocalPortAllocator::new()),
            config: ServiceDiscoveryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ServiceDiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a port allocator with other services provisioning the same
    /// local cluster.
    #[must_use]
    pub fn with_local_ports(mut self, local_ports: Arc<LocalPortAllocator>) -> Self {
        self.local_ports = local_ports;
        self
    }

    #[must_use]
    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    #[must_use]
    pub const fn config(&self) -> &ServiceDiscoveryConfig {
        &self.config
    }
}
