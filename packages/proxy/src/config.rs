//! Proxy configuration from environment variables.

use std::time::Duration;

use idss_proxy_models::Upstream;

/// Default legacy back-office host.
pub const DEFAULT_LEGACY_BASE_URL: &str = "http://161.49.61.47";

/// Default voucher reload API host.
pub const DEFAULT_IBAS_BASE_URL: &str = "https://ibas.s2s.ph";

/// Runtime configuration for the proxy and its upstream client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Address to bind the HTTP server to (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// Base URL of the legacy PHP pages (`IDSS_LEGACY_BASE_URL`).
    pub legacy_base_url: String,
    /// Base URL of the voucher reload API (`IDSS_IBAS_BASE_URL`).
    pub ibas_base_url: String,
    /// Per-request upstream timeout (`IDSS_UPSTREAM_TIMEOUT_SECS`).
    pub upstream_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 3000,
            legacy_base_url: DEFAULT_LEGACY_BASE_URL.to_string(),
            ibas_base_url: DEFAULT_IBAS_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(30),
        }
    }
}

impl ProxyConfig {
    /// Reads the configuration from the process environment, falling back to
    /// defaults for unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT").and_then(|p| p.parse().ok());
        if port.is_none() && lookup("PORT").is_some() {
            log::warn!("Ignoring unparseable PORT, using {}", defaults.port);
        }

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: port.unwrap_or(defaults.port),
            legacy_base_url: lookup("IDSS_LEGACY_BASE_URL").unwrap_or(defaults.legacy_base_url),
            ibas_base_url: lookup("IDSS_IBAS_BASE_URL").unwrap_or(defaults.ibas_base_url),
            upstream_timeout: lookup("IDSS_UPSTREAM_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.upstream_timeout, Duration::from_secs),
        }
    }

    /// Base URL for an upstream host family.
    #[must_use]
    pub fn base_url(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::Legacy => &self.legacy_base_url,
            Upstream::Ibas => &self.ibas_base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(ProxyConfig::from_lookup(|_| None), ProxyConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = ProxyConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "8081"),
            ("IDSS_LEGACY_BASE_URL", "http://legacy.test"),
            ("IDSS_UPSTREAM_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert_eq!(config.base_url(Upstream::Legacy), "http://legacy.test");
        assert_eq!(config.base_url(Upstream::Ibas), DEFAULT_IBAS_BASE_URL);
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = ProxyConfig::from_lookup(lookup_from(&[
            ("PORT", "eighty"),
            ("IDSS_UPSTREAM_TIMEOUT_SECS", "-1"),
        ]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
    }
}
