use service_discovery_sdk::{DiscoveryError, Node, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::service::ServiceDiscovery;

const OPEN_PORTS_SCRIPT: &str = include_str!("../../scripts/open_ports.sh");

/// Reservation cursor for clusters simulated on one machine.
///
/// Every node of a local cluster shares the host's port space, so concurrent
/// searches would otherwise return the same ports. Searches run one at a time
/// and each starts above the highest port handed out so far. Separate
/// processes provisioning the same machine are not coordinated.
#[derive(Debug, Default)]
pub struct LocalPortAllocator {
    next_start: Mutex<u32>,
}

impl LocalPortAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest port the next search may start from.
    ///
    /// `0` until the first successful reservation. Once port `65535` has been
    /// handed out the cursor is `65536` and every further reservation fails
    /// with `PortRangeExhausted`.
    pub async fn next_start(&self) -> u32 {
        *self.next_start.lock().await
    }

    /// Run `search` from `max(start_port, cursor)` and advance the cursor past
    /// the highest port it returns.
    ///
    /// The cursor is unchanged when `search` fails or returns no ports.
    ///
    /// # Errors
    /// Returns `PortRangeExhausted` without running `search` when the cursor is
    /// past the last port, otherwise the error produced by `search`.
    pub async fn reserve<F, Fut>(&self, start_port: u16, search: F) -> Result<Vec<u16>>
    where
        F: FnOnce(u16) -> Fut,
        Fut: Future<Output = Result<Vec<u16>>>,
    {
        let mut next_start = self.next_start.lock().await;
        let Ok(start) = u16::try_from(u32::from(start_port).max(*next_start)) else {
            return Err(DiscoveryError::PortRangeExhausted {
                next_start: *next_start,
            });
        };
        let ports = search(start).await?;
        if let Some(&highest) = ports.iter().max() {
            *next_start = (*next_start).max(u32::from(highest) + 1);
        }
        Ok(ports)
    }
}

/// Render the probe script for a search.
#[must_use]
pub fn render_probe_script(start_port: u16, count: usize) -> String {
    OPEN_PORTS_SCRIPT
        .replace("{{start_port}}", &start_port.to_string())
        .replace("{{port_count}}", &count.to_string())
}

/// Parse whitespace separated ports printed by the probe.
///
/// # Errors
/// Returns `RemoteExecution` if any token is not a valid port.
pub fn parse_ports(node: Node, output: &str) -> Result<Vec<u16>> {
    output
        .split_whitespace()
        .map(|token| {
            token
                .parse::<u16>()
                .map_err(|_| DiscoveryError::RemoteExecution {
                    node,
                    reason: format!("invalid port in probe output: '{token}'"),
                })
        })
        .collect()
}

impl ServiceDiscovery {
    /// Find `count` ports that are not bound on `node`, searching upward from
    /// `start_port`.
    ///
    /// On local clusters the search goes through the shared
    /// [`LocalPortAllocator`], so concurrent calls return disjoint ports.
    ///
    /// # Errors
    /// Returns `NodeOutOfRange` for nodes outside the cluster,
    /// `RemoteExecution` if the probe fails or prints something other than
    /// ports, `PortCountMismatch` if it prints the wrong number of ports, and
    /// `PortRangeExhausted` once a local cluster has handed out port `65535`.
    #[instrument(skip(self), fields(cluster = %self.cluster.name()))]
    pub async fn find_open_ports(
        &self,
        node: Node,
        start_port: u16,
        count: usize,
    ) -> Result<Vec<u16>> {
        self.cluster.vm(node)?;

        if self.cluster.is_local() {
            self.local_ports
                .reserve(start_port, |start| self.probe_open_ports(node, start, count))
                .await
        } else {
            self.probe_open_ports(node, start_port, count).await
        }
    }

    async fn probe_open_ports(&self, node: Node, start_port: u16, count: usize) -> Result<Vec<u16>> {
        debug!(start_port, count, "probing for open ports");
        let script = render_probe_script(start_port, count);

        let output = self
            .executor
            .run_on_node(node, &script)
            .await
            .map_err(|err| DiscoveryError::RemoteExecution {
                node,
                reason: err.to_string(),
            })?;

        let ports = parse_ports(node, output.trim())?;
        if ports.len() != count {
            return Err(DiscoveryError::PortCountMismatch {
                expected: count,
                actual: ports.len(),
            });
        }

        info!(start_port, ports = ?ports, "found open ports");
        Ok(ports)
    }
}

#[cfg(test)]
#[path = "ports_tests.rs"]
mod tests;
