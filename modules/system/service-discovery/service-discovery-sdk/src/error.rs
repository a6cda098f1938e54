//! Error types for service discovery

use crate::dns::DnsRecordType;
use crate::models::Node;

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Errors reported by a DNS provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("provider error: {0}")]
    Internal(String),
}

/// Errors reported by the remote execution channel.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The command could not be started or the connection failed.
    #[error("failed to run command: {0}")]
    Transport(String),
    /// The command ran and exited unsuccessfully.
    #[error("command exited with status {status}: {output}")]
    NonZeroExit { status: i32, output: String },
}

/// Errors parsing a record payload.
#[derive(Debug, thiserror::Error)]
pub enum RecordParseError {
    #[error("expected {expected} record, got {actual}")]
    WrongType {
        expected: DnsRecordType,
        actual: DnsRecordType,
    },
    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Error type for service discovery, registration and port allocation.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Record name has fewer than two dot-separated components.
    #[error("invalid DNS SRV name: {0}")]
    InvalidDnsName(String),

    /// Leading label has no `-` separating tenant from service type.
    #[error("invalid service name: {0}")]
    InvalidServiceName(String),

    /// Service type suffix is not a known literal.
    #[error("invalid service type: {0}")]
    InvalidServiceType(String),

    /// A provider returned an SRV record whose payload cannot be parsed.
    #[error("invalid record {name}: {source}")]
    InvalidRecord {
        name: String,
        #[source]
        source: RecordParseError,
    },

    /// A VM references a provider that is not registered.
    #[error("unknown DNS provider: {0}")]
    UnknownProvider(String),

    /// Node ordinal does not belong to the cluster.
    #[error("node {0} is not part of the cluster")]
    NodeOutOfRange(Node),

    /// Looking up records failed.
    #[error("lookup via {provider} failed: {source}")]
    Lookup {
        provider: String,
        #[source]
        source: ProviderError,
    },

    /// Creating records failed.
    #[error("registration via {provider} failed: {source}")]
    Registration {
        provider: String,
        #[source]
        source: ProviderError,
    },

    /// The port probe returned a different number of ports than requested.
    #[error("expected {expected} ports, got {actual}")]
    PortCountMismatch { expected: usize, actual: usize },

    /// A local reservation already handed out the top of the port range.
    #[error("no ports left to reserve at or above {next_start}")]
    PortRangeExhausted { next_start: u32 },

    /// The port probe could not run or produced unreadable output.
    #[error("remote execution on node {node} failed: {reason}")]
    RemoteExecution { node: Node, reason: String },
}

impl DiscoveryError {
    /// Check if the error comes from decoding a record
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDnsName(_)
                | Self::InvalidServiceName(_)
                | Self::InvalidServiceType(_)
                | Self::InvalidRecord { .. }
        )
    }

    /// Check if the error was reported by a DNS provider
    #[must_use]
    pub const fn is_backend_error(&self) -> bool {
        matches!(self, Self::Lookup { .. } | Self::Registration { .. })
    }

    /// Name of the provider involved, if any
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Lookup { provider, .. }
            | Self::Registration { provider, .. }
            | Self::UnknownProvider(provider) => Some(provider),
            _ => None,
        }
    }
}

/// Result type alias for service discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;
