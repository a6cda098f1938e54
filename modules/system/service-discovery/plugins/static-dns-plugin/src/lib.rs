//! Static DNS provider plugin
//!
//! Keeps service records in memory, optionally seeded from configuration.
//! Used for local clusters and tests, where no real DNS backend exists.

pub mod config;
mod provider;

pub use config::StaticDnsPluginConfig;
pub use provider::StaticDnsProvider;
