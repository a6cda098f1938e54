use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use service_discovery_sdk::{DiscoveryError, DnsProvider, Result};
use tracing::debug;

use super::cluster::Vm;

/// Registry that resolves DNS provider names to provider implementations.
#[derive(Default, Clone)]
pub struct DnsProviderRegistry {
    providers: HashMap<String, Arc<dyn DnsProvider>>,
}

impl DnsProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-loaded with providers.
    #[must_use]
    pub fn with_providers(providers: impl IntoIterator<Item = Arc<dyn DnsProvider>>) -> Self {
        let mut registry = Self::new();
        for provider in providers {
            registry.register(provider);
        }
        registry
    }

    /// Add a provider, replacing any provider registered under the same name.
    pub fn register(&mut self, provider: Arc<dyn DnsProvider>) {
        self.providers.insert(provider.name().to_owned(), provider);
    }

    /// Resolve a provider by name.
    ///
    /// # Errors
    /// Returns `DiscoveryError::UnknownProvider` if the provider is not registered.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn DnsProvider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| DiscoveryError::UnknownProvider(name.to_owned()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Distinct providers referenced by `vms`, in first-seen order.
    ///
    /// VMs without a provider are ignored.
    ///
    /// # Errors
    /// Returns `DiscoveryError::UnknownProvider` if a VM names an unregistered provider.
    pub fn providers_for(&self, vms: &[Vm]) -> Result<Vec<Arc<dyn DnsProvider>>> {
        let mut seen: Vec<&str> = Vec::new();
        for name in vms.iter().filter_map(|vm| vm.dns_provider.as_deref()) {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen.into_iter().map(|name| self.resolve(name)).collect()
    }

    /// Run `f` once per distinct provider referenced by `vms`, concurrently.
    ///
    /// `f` receives the provider's position in [`Self::providers_for`] order.
    /// All started calls run to completion; the first error in provider order
    /// is returned.
    ///
    /// # Errors
    /// Returns the first error produced by `f`, or `UnknownProvider` if a VM
    /// names an unregistered provider.
    pub async fn fan_out<F, Fut>(&self, vms: &[Vm], f: F) -> Result<()>
    where
        F: Fn(usize, Arc<dyn DnsProvider>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let providers = self.providers_for(vms)?;
        debug!(providers = providers.len(), "fanning out to DNS providers");
        join_all(
            providers
                .into_iter()
                .enumerate()
                .map(|(position, provider)| f(position, provider)),
        )
        .await
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
