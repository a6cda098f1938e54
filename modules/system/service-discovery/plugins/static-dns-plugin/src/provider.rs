use dashmap::DashMap;
use service_discovery_sdk::{DnsProvider, DnsRecord, ProviderError};
use tracing::debug;

use crate::config::StaticDnsPluginConfig;

/// In-memory DNS provider.
pub struct StaticDnsProvider {
    name: String,
    domain: String,
    records: DashMap<String, Vec<DnsRecord>>,
}

impl StaticDnsProvider {
    #[must_use]
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            records: DashMap::new(),
        }
    }

    /// Create a provider seeded with the configured records.
    #[must_use]
    pub fn from_config(config: StaticDnsPluginConfig) -> Self {
        let provider = Self::new(config.name, config.domain);
        for record in config.records {
            provider.insert(record);
        }
        provider
    }

    /// Add a record unless an identical one exists.
    pub fn insert(&self, record: DnsRecord) {
        let mut entry = self.records.entry(record.name.clone()).or_default();
        if !entry.contains(&record) {
            entry.push(record);
        }
    }

    /// Records stored under `name`.
    #[must_use]
    pub fn records(&self, name: &str) -> Vec<DnsRecord> {
        self.records
            .get(name)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Total number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl DnsProvider for StaticDnsProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    async fn lookup_srv_records(
        &self,
        service: &str,
        proto: &str,
        subdomain: &str,
    ) -> Result<Vec<DnsRecord>, ProviderError> {
        let name = format!("_{service}._{proto}.{subdomain}.{}", self.domain);
        let found: Vec<DnsRecord> = self
            .records(&name)
            .into_iter()
            .filter(DnsRecord::is_srv)
            .collect();
        debug!(provider = %self.name, %name, records = found.len(), "static SRV lookup");
        Ok(found)
    }

    async fn create_records(&self, records: Vec<DnsRecord>) -> Result<(), ProviderError> {
        for record in records {
            self.insert(record);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
