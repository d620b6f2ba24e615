//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::adif::{AdifConfig, ResponseShape};
use crate::domain::CommuterNetwork;
use crate::stations::{SlugTableError, StationSlugs, UnmappedPolicy};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
#[error("invalid {var}: {message}")]
pub struct ConfigError {
    var: &'static str,
    message: String,
}

impl ConfigError {
    fn new(var: &'static str, message: impl Into<String>) -> Self {
        Self {
            var,
            message: message.into(),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
    /// Upstream client settings
    pub adif: AdifConfig,
    /// Network used when a request has no `red` parameter
    pub default_network: CommuterNetwork,
    /// Handling of codes missing from the slug table
    pub unmapped: UnmappedPolicy,
    /// Extra slug table entries
    pub stations_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            adif: AdifConfig::default(),
            default_network: CommuterNetwork::default(),
            unmapped: UnmappedPolicy::default(),
            stations_file: None,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup (useful for testing).
    ///
    /// Unset and empty variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::new("PORT", format!("{port}: {e}")))?;
        }

        if let Some(host) = get("HOST") {
            config.host = host
                .trim()
                .parse()
                .map_err(|e| ConfigError::new("HOST", format!("{host}: {e}")))?;
        }

        if let Some(url) = get("ADIF_BASE_URL") {
            config.adif = config.adif.with_base_url(url.trim());
        }

        if let Some(secs) = get("ADIF_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| ConfigError::new("ADIF_TIMEOUT_SECS", format!("{secs}: {e}")))?;
            if secs == 0 {
                return Err(ConfigError::new("ADIF_TIMEOUT_SECS", "must be positive"));
            }
            config.adif = config.adif.with_timeout(secs);
        }

        if let Some(user_agent) = get("ADIF_USER_AGENT") {
            config.adif = config.adif.with_user_agent(user_agent.trim());
        }

        if let Some(shape) = get("ADIF_RESPONSE_SHAPE") {
            let shape: ResponseShape = shape
                .parse()
                .map_err(|e: String| ConfigError::new("ADIF_RESPONSE_SHAPE", e))?;
            config.adif = config.adif.with_shape(shape);
        }

        if let Some(network) = get("ADIF_DEFAULT_NETWORK") {
            config.default_network = CommuterNetwork::parse(&network)
                .map_err(|e| ConfigError::new("ADIF_DEFAULT_NETWORK", e.to_string()))?;
        }

        if let Some(policy) = get("ADIF_UNMAPPED_STATIONS") {
            config.unmapped = policy
                .parse()
                .map_err(|e: String| ConfigError::new("ADIF_UNMAPPED_STATIONS", e))?;
        }

        config.stations_file = get("ADIF_STATIONS_FILE").map(|p| PathBuf::from(p.trim()));

        Ok(config)
    }

    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Built-in slug table merged with the configured file, if any.
    pub fn load_stations(&self) -> Result<StationSlugs, SlugTableError> {
        let table = StationSlugs::builtin();
        match &self.stations_file {
            Some(path) => table.with_overrides_from(path),
            None => Ok(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.addr().to_string(), "0.0.0.0:5000");
        assert_eq!(config.adif.base_url, "https://www.adif.es");
        assert_eq!(config.adif.timeout_secs, 20);
        assert!(config.adif.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.adif.shape, ResponseShape::Raw);
        assert_eq!(config.default_network.as_str(), "BILBAO");
        assert_eq!(config.unmapped, UnmappedPolicy::PassThrough);
        assert!(config.stations_file.is_none());
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("ADIF_BASE_URL", "http://localhost:9000"),
            ("ADIF_TIMEOUT_SECS", "5"),
            ("ADIF_USER_AGENT", "horarios/0.1"),
            ("ADIF_RESPONSE_SHAPE", "horarios"),
            ("ADIF_DEFAULT_NETWORK", "madrid"),
            ("ADIF_UNMAPPED_STATIONS", "reject"),
            ("ADIF_STATIONS_FILE", "/etc/horarios/stations.json"),
        ]))
        .unwrap();

        assert_eq!(config.addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.adif.base_url, "http://localhost:9000");
        assert_eq!(config.adif.timeout_secs, 5);
        assert_eq!(config.adif.user_agent, "horarios/0.1");
        assert_eq!(config.adif.shape, ResponseShape::Horarios);
        assert_eq!(config.default_network.as_str(), "MADRID");
        assert_eq!(config.unmapped, UnmappedPolicy::Reject);
        assert_eq!(
            config.stations_file,
            Some(PathBuf::from("/etc/horarios/stations.json"))
        );
    }

    #[test]
    fn empty_values_use_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", ""), ("ADIF_STATIONS_FILE", " ")]))
            .unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.stations_file.is_none());
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().starts_with("invalid PORT"));

        let err = ServerConfig::from_lookup(lookup(&[("ADIF_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid ADIF_TIMEOUT_SECS: must be positive");

        let err =
            ServerConfig::from_lookup(lookup(&[("ADIF_UNMAPPED_STATIONS", "maybe")])).unwrap_err();
        assert!(err.to_string().starts_with("invalid ADIF_UNMAPPED_STATIONS"));

        let err =
            ServerConfig::from_lookup(lookup(&[("ADIF_DEFAULT_NETWORK", "BIL BAO")])).unwrap_err();
        assert!(err.to_string().starts_with("invalid ADIF_DEFAULT_NETWORK"));
    }

    #[test]
    fn load_stations_without_file() {
        let config = ServerConfig::default();
        let table = config.load_stations().unwrap();
        assert_eq!(table.get("13200"), Some("bilbao-abando"));
    }
}
