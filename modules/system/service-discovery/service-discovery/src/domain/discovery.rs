use std::collections::BTreeMap;

use parking_lot::Mutex;
use service_discovery_sdk::{
    DiscoveryError, DnsRecord, Node, NodeServiceMap, Result, SYSTEM_TENANT_NAME,
    ServiceDescriptor, ServiceDescriptors, ServiceMode, ServiceType,
};
use tracing::{debug, instrument, trace};

use super::codec::{self, SERVICE_PROTOCOL};
use super::service::ServiceDiscovery;

impl ServiceDiscovery {
    /// Discover services of `service_type` owned by `tenant_name` on `nodes`.
    ///
    /// Every DNS provider referenced by the cluster is queried, so records
    /// for the requested nodes are found regardless of which provider holds
    /// them. More than one service may be returned per node.
    ///
    /// # Errors
    /// Returns an error if any provider lookup fails or a record cannot be
    /// decoded. No partial results are returned.
    #[instrument(skip(self, nodes), fields(cluster = %self.cluster.name()))]
    pub async fn discover_services(
        &self,
        nodes: &[Node],
        tenant_name: &str,
        service_type: ServiceType,
    ) -> Result<ServiceDescriptors> {
        let tenant_name = codec::normalize_tenant(tenant_name);
        let service = codec::service_label(tenant_name, service_type);
        let service = service.as_str();
        let scope = self.cluster.name();
        // Keyed by provider position so merge order does not depend on
        // which lookup finishes first.
        let slots: Mutex<BTreeMap<usize, Vec<DnsRecord>>> = Mutex::new(BTreeMap::new());
        let merged = &slots;

        self.providers
            .fan_out(self.cluster.vms(), move |position, provider| async move {
                let found = provider
                    .lookup_srv_records(service, SERVICE_PROTOCOL, scope)
                    .await
                    .map_err(|source| DiscoveryError::Lookup {
                        provider: provider.name().to_owned(),
                        source,
                    })?;
                trace!(provider = provider.name(), records = found.len(), "lookup done");
                merged.lock().insert(position, found);
                Ok(())
            })
            .await?;

        let records = slots.into_inner().into_values().flatten().collect();
        let descriptors = self.records_to_descriptors(records)?;
        Ok(descriptors.filter(nodes))
    }

    /// Discover a single service on `node`.
    ///
    /// Falls back to the system tenant when the tenant has no service, then
    /// to a shared service on the configured default port when no records
    /// exist at all. When several services match, the first is returned.
    ///
    /// # Errors
    /// Returns `NodeOutOfRange` for nodes outside the cluster, or any error
    /// from [`Self::discover_services`].
    #[instrument(skip(self), fields(cluster = %self.cluster.name()))]
    pub async fn discover_service(
        &self,
        node: Node,
        tenant_name: &str,
        service_type: ServiceType,
    ) -> Result<ServiceDescriptor> {
        self.cluster.vm(node)?;
        let tenant_name = codec::normalize_tenant(tenant_name);

        let mut services = self
            .discover_services(&[node], tenant_name, service_type)
            .await?;

        if services.is_empty() && tenant_name != SYSTEM_TENANT_NAME {
            debug!("no tenant service found, assuming it is served by the system tenant");
            services = self
                .discover_services(&[node], SYSTEM_TENANT_NAME, service_type)
                .await?;
        }

        if let Some(service) = services.into_iter().next() {
            return Ok(service);
        }

        let port = self.config.default_port(service_type);
        debug!(port, "no service records found, using default port");
        Ok(ServiceDescriptor {
            tenant_name: tenant_name.to_owned(),
            service_type,
            service_mode: ServiceMode::Shared,
            node,
            port,
        })
    }

    /// Discover every service type for `tenant_name` across the cluster.
    ///
    /// Every cluster node is present in the result, possibly with no services.
    ///
    /// # Errors
    /// Returns any error from [`Self::discover_services`].
    #[instrument(skip(self), fields(cluster = %self.cluster.name()))]
    pub async fn map_services(&self, tenant_name: &str) -> Result<NodeServiceMap> {
        let nodes = self.cluster.nodes();
        let mut service_map: NodeServiceMap =
            nodes.iter().map(|&node| (node, BTreeMap::new())).collect();

        for service_type in ServiceType::ALL {
            let services = self
                .discover_services(&nodes, tenant_name, service_type)
                .await?;
            for service in services {
                service_map
                    .entry(service.node)
                    .or_default()
                    .insert(service.service_type, service);
            }
        }

        Ok(service_map)
    }

    fn records_to_descriptors(&self, records: Vec<DnsRecord>) -> Result<ServiceDescriptors> {
        let targets = self.cluster.target_index();
        let mut descriptors = ServiceDescriptors::new();

        for record in records {
            if !record.is_srv() {
                continue;
            }
            let data = record
                .parse_srv()
                .map_err(|source| DiscoveryError::InvalidRecord {
                    name: record.name.clone(),
                    source,
                })?;
            // Records may outlive the nodes they point at.
            let Some(&node) = targets.get(&data.target) else {
                trace!(record = %record.name, target_name = %data.target, "skipping record for unknown node");
                continue;
            };
            let (tenant_name, service_type) = codec::decode_service_name(&record.name)?;
            descriptors.push(ServiceDescriptor {
                tenant_name,
                service_type,
                service_mode: ServiceMode::from_priority(data.priority),
                node,
                port: data.port,
            });
        }

        Ok(descriptors)
    }
}
