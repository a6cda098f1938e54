use std::collections::BTreeMap;

use service_discovery_sdk::{
    DiscoveryError, DnsRecord, Result, ServiceDescriptor, ServiceDescriptors, SrvData,
};
use tracing::{debug, info, instrument, warn};

use super::codec;
use super::service::ServiceDiscovery;
use crate::config::RegistrationMode;

/// Outcome of [`ServiceDiscovery::register_services`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Descriptors published as records.
    pub registered: usize,
    /// Descriptors on nodes without a DNS provider.
    pub skipped: usize,
    /// Providers that accepted a batch, in submission order.
    pub providers: Vec<String>,
}

impl ServiceDiscovery {
    /// Publish `services` as SRV records through each node's DNS provider.
    ///
    /// Descriptors on nodes without a provider are skipped and counted in the
    /// report. Each provider receives a single batch. In
    /// [`RegistrationMode::AllProviders`] every batch is attempted before the
    /// first failure is returned.
    ///
    /// # Errors
    /// Returns `NodeOutOfRange` for descriptors outside the cluster,
    /// `UnknownProvider` for unregistered providers, or `Registration` if a
    /// provider rejects its batch.
    #[instrument(skip_all, fields(cluster = %self.cluster.name(), services = services.len()))]
    pub async fn register_services(
        &self,
        services: &ServiceDescriptors,
    ) -> Result<RegistrationReport> {
        let mut report = RegistrationReport::default();
        let mut by_provider: BTreeMap<&str, Vec<&ServiceDescriptor>> = BTreeMap::new();

        for service in services {
            let Some(provider) = self.cluster.vm(service.node)?.dns_provider.as_deref() else {
                report.skipped += 1;
                continue;
            };
            by_provider.entry(provider).or_default().push(service);
        }

        if report.skipped > 0 {
            debug!(
                skipped = report.skipped,
                "skipping services on nodes without a DNS provider"
            );
        }

        let batches = match self.config.registration_mode {
            RegistrationMode::AllProviders => by_provider.len(),
            RegistrationMode::FirstProviderOnly => 1,
        };

        let mut first_error = None;
        for (provider, batch) in by_provider.into_iter().take(batches) {
            match self.register_with_provider(provider, &batch).await {
                Ok(()) => {
                    report.registered += batch.len();
                    report.providers.push(provider.to_owned());
                }
                Err(err) => {
                    warn!(provider, error = %err, "failed to register services");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    async fn register_with_provider(
        &self,
        provider_name: &str,
        services: &[&ServiceDescriptor],
    ) -> Result<()> {
        let provider = self.providers.resolve(provider_name)?;

        let records = services
            .iter()
            .map(|service| {
                let name = codec::encode_service_name(
                    provider.domain(),
                    codec::normalize_tenant(&service.tenant_name),
                    service.service_type,
                    self.cluster.name(),
                );
                let data = SrvData {
                    target: self.cluster.target_dns_name(service.node)?,
                    port: service.port,
                    priority: service.service_mode.priority(),
                    weight: 0,
                };
                Ok(DnsRecord::srv(name, &data))
            })
            .collect::<Result<Vec<_>>>()?;

        let count = records.len();
        provider
            .create_records(records)
            .await
            .map_err(|source| DiscoveryError::Registration {
                provider: provider_name.to_owned(),
                source,
            })?;

        info!(provider = provider_name, records = count, "registered service records");
        Ok(())
    }
}
