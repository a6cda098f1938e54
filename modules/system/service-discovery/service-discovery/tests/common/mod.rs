#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use service_discovery::{Cluster, DnsProviderRegistry, ServiceDiscovery, Vm};
use service_discovery_sdk::{
    DnsProvider, DnsRecord, ExecError, Node, ProviderError, RemoteExecutor, SrvData,
};
use static_dns_plugin::StaticDnsProvider;

pub const DOMAIN: &str = "crdb.test";

// ---------------------------------------------------------------------------
// DNS providers
// ---------------------------------------------------------------------------

/// Provider whose every call fails.
pub struct FailingProvider {
    name: String,
}

impl FailingProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for FailingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> &str {
        DOMAIN
    }

    async fn lookup_srv_records(
        &self,
        _service: &str,
        _proto: &str,
        _subdomain: &str,
    ) -> Result<Vec<DnsRecord>, ProviderError> {
        Err(ProviderError::Unavailable("backend down".to_owned()))
    }

    async fn create_records(&self, _records: Vec<DnsRecord>) -> Result<(), ProviderError> {
        Err(ProviderError::Rejected("read-only zone".to_owned()))
    }
}

/// Static provider that answers lookups after a delay.
pub struct DelayedProvider {
    inner: Arc<StaticDnsProvider>,
    delay: Duration,
}

impl DelayedProvider {
    pub fn new(inner: Arc<StaticDnsProvider>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait::async_trait]
impl DnsProvider for DelayedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn domain(&self) -> &str {
        self.inner.domain()
    }

    async fn lookup_srv_records(
        &self,
        service: &str,
        proto: &str,
        subdomain: &str,
    ) -> Result<Vec<DnsRecord>, ProviderError> {
        tokio::time::sleep(self.delay).await;
        self.inner.lookup_srv_records(service, proto, subdomain).await
    }

    async fn create_records(&self, records: Vec<DnsRecord>) -> Result<(), ProviderError> {
        self.inner.create_records(records).await
    }
}

pub fn static_provider(name: &str) -> Arc<StaticDnsProvider> {
    Arc::new(StaticDnsProvider::new(name, DOMAIN))
}

pub fn srv_record(name: &str, target: &str, port: u16, priority: u16) -> DnsRecord {
    DnsRecord::srv(
        name,
        &SrvData {
            target: target.to_owned(),
            port,
            priority,
            weight: 0,
        },
    )
}

// ---------------------------------------------------------------------------
// Remote execution
// ---------------------------------------------------------------------------

/// Executor that answers the probe script with consecutive ports from the
/// script's start port, or with a fixed reply when one is set.
#[derive(Default)]
pub struct ScriptedExecutor {
    reply: Option<Result<String, String>>,
    calls: Mutex<Vec<(Node, u16)>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(output: &str) -> Self {
        Self {
            reply: Some(Ok(output.to_owned())),
            calls: Mutex::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Some(Err(reason.to_owned())),
            calls: Mutex::default(),
        }
    }

    /// `(node, start_port)` of every probe, in call order.
    pub fn calls(&self) -> Vec<(Node, u16)> {
        self.calls.lock().clone()
    }
}

fn script_value(script: &str, key: &str) -> u16 {
    script
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
        .and_then(|value| value.trim().parse().ok())
        .expect("probe script is missing a parameter")
}

#[async_trait::async_trait]
impl RemoteExecutor for ScriptedExecutor {
    async fn run_on_node(&self, node: Node, script: &str) -> Result<String, ExecError> {
        let start = script_value(script, "start_port");
        let count = script_value(script, "port_count");
        self.calls.lock().push((node, start));
        tokio::task::yield_now().await;

        match &self.reply {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(reason)) => Err(ExecError::Transport(reason.clone())),
            None => Ok((start..start + count)
                .map(|port| port.to_string())
                .collect::<Vec<_>>()
                .join(" ")),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn remote_cluster(name: &str, providers: &[Option<&str>]) -> Cluster {
    let vms = providers
        .iter()
        .enumerate()
        .map(|(idx, provider)| {
            let vm = Vm::new(format!("{name}-{}.{DOMAIN}", idx + 1));
            match provider {
                Some(provider) => vm.with_dns_provider(*provider),
                None => vm,
            }
        })
        .collect();
    Cluster::new(name, vms)
}

pub fn local_cluster(name: &str, nodes: usize, provider: &str) -> Cluster {
    let vms = (0..nodes)
        .map(|_| Vm::new("localhost").with_dns_provider(provider))
        .collect();
    Cluster::new(name, vms)
}

pub fn discovery(
    cluster: Cluster,
    providers: Vec<Arc<dyn DnsProvider>>,
    executor: Arc<dyn RemoteExecutor>,
) -> ServiceDiscovery {
    ServiceDiscovery::new(
        Arc::new(cluster),
        Arc::new(DnsProviderRegistry::with_providers(providers)),
        executor,
    )
}
