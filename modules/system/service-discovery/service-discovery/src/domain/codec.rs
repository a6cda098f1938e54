//! Service record naming.
//!
//! Records follow the standard SRV form `_service._proto.name`, where the
//! service label is `{tenant}-{type}`:
//!
//! ```text
//! _{tenant}-{type}._tcp.{cluster}.{domain}
//! ```

use service_discovery_sdk::{DiscoveryError, Result, SYSTEM_TENANT_NAME, ServiceType};

/// Transport protocol label used in every service record.
pub const SERVICE_PROTOCOL: &str = "tcp";

/// Empty tenant names refer to the system tenant.
#[must_use]
pub fn normalize_tenant(tenant_name: &str) -> &str {
    if tenant_name.is_empty() {
        SYSTEM_TENANT_NAME
    } else {
        tenant_name
    }
}

/// Service label looked up in DNS providers: `{tenant}-{type}`.
#[must_use]
pub fn service_label(tenant_name: &str, service_type: ServiceType) -> String {
    format!("{tenant_name}-{service_type}")
}

/// Full record name for a tenant's service.
#[must_use]
pub fn encode_service_name(
    domain: &str,
    tenant_name: &str,
    service_type: ServiceType,
    cluster_name: &str,
) -> String {
    format!(
        "_{}._{SERVICE_PROTOCOL}.{cluster_name}.{domain}",
        service_label(tenant_name, service_type)
    )
}

/// Recover the tenant name and service type from a record name.
///
/// The tenant is split from the type at the last `-`, so tenants may contain
/// hyphens while types may not.
///
/// # Errors
/// - `InvalidDnsName` if the name has no `.`
/// - `InvalidServiceName` if the leading label has no `-`
/// - `InvalidServiceType` if the suffix is not a known service type
pub fn decode_service_name(name: &str) -> Result<(String, ServiceType)> {
    let Some((label, _)) = name.split_once('.') else {
        return Err(DiscoveryError::InvalidDnsName(name.to_owned()));
    };

    let service = label.strip_prefix('_').unwrap_or(label);
    let Some((tenant_name, service_type)) = service.rsplit_once('-') else {
        return Err(DiscoveryError::InvalidServiceName(service.to_owned()));
    };

    Ok((tenant_name.to_owned(), service_type.parse()?))
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
