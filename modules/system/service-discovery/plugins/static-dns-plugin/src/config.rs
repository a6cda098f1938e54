use serde::{Deserialize, Serialize};
use service_discovery_sdk::DnsRecord;

/// Configuration for the static DNS provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticDnsPluginConfig {
    /// Registry key VMs use to reference this provider.
    pub name: String,

    /// Domain suffix for record names.
    pub domain: String,

    /// Records available before anything is registered.
    #[serde(default)]
    pub records: Vec<DnsRecord>,
}
