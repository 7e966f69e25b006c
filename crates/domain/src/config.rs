use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Resolver configuration, supplied by the surrounding process. Every
/// field has a default so a partial TOML document deserializes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Ordered upstream list; tried first to last on failure.
    #[serde(default = "default_upstream_servers")]
    pub upstream_servers: Vec<String>,

    /// Per-upstream-attempt timeout in milliseconds.
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    /// Overall per-query deadline in milliseconds, spanning all
    /// upstream attempts.
    #[serde(default = "default_query_deadline_ms")]
    pub query_deadline_ms: u64,

    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstream_servers: default_upstream_servers(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            query_deadline_ms: default_query_deadline_ms(),
            cache_enabled: true,
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

impl DnsConfig {
    /// Parses the upstream list into socket addresses. Fails if the
    /// list is empty or any entry does not parse.
    pub fn upstream_addrs(&self) -> Result<Vec<SocketAddr>, DomainError> {
        if self.upstream_servers.is_empty() {
            return Err(DomainError::ConfigError(
                "no upstream servers configured".to_string(),
            ));
        }
        self.upstream_servers
            .iter()
            .map(|entry| {
                entry.parse::<SocketAddr>().map_err(|e| {
                    DomainError::ConfigError(format!("invalid upstream '{}': {}", entry, e))
                })
            })
            .collect()
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn query_deadline(&self) -> Duration {
        Duration::from_millis(self.query_deadline_ms)
    }
}

fn default_upstream_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_attempt_timeout_ms() -> u64 {
    2000
}

fn default_query_deadline_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_cache_max_entries() -> usize {
    10_000
}
