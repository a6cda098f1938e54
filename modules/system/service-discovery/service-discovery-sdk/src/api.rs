use crate::dns::DnsRecord;
use crate::error::{ExecError, ProviderError};
use crate::models::Node;

/// A DNS backend that stores service records.
///
/// Providers are registered by name; each VM in a cluster names the provider
/// that owns its records.
#[async_trait::async_trait]
pub trait DnsProvider: Send + Sync {
    /// Registry key of this provider.
    fn name(&self) -> &str;

    /// Domain suffix appended to every record name.
    fn domain(&self) -> &str;

    /// Look up SRV records named `_{service}._{proto}.{subdomain}.{domain}`.
    ///
    /// # Errors
    /// Returns `ProviderError` if the backend cannot be queried.
    async fn lookup_srv_records(
        &self,
        service: &str,
        proto: &str,
        subdomain: &str,
    ) -> Result<Vec<DnsRecord>, ProviderError>;

    /// Create the given records in one batch.
    ///
    /// # Errors
    /// Returns `ProviderError` if the backend rejects the batch.
    async fn create_records(&self, records: Vec<DnsRecord>) -> Result<(), ProviderError>;
}

/// Runs shell scripts on cluster nodes.
#[async_trait::async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Run `script` on `node` and return its combined stdout and stderr.
    ///
    /// # Errors
    /// Returns `ExecError` if the script cannot be started or exits non-zero.
    async fn run_on_node(&self, node: Node, script: &str) -> Result<String, ExecError>;
}
