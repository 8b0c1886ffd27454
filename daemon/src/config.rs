//! Service configuration with TOML file support.

use fangate_consent::ConsentPolicy;
use fangate_types::EngineParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the fangate service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Data directory for LMDB storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the HTTP server listens on.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// LMDB map size in megabytes.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// Base URL gated files are served from.
    #[serde(default = "default_cdn_base_url")]
    pub cdn_base_url: String,

    /// Base URL for provider authorization redirects.
    #[serde(default = "default_authorize_base_url")]
    pub authorize_base_url: String,

    /// How submitted consent grants translate to ledger entries.
    #[serde(default = "ConsentPolicy::single_opt_in")]
    pub consent: ConsentPolicy,

    /// Engine timing and bound parameters.
    #[serde(default)]
    pub params: EngineParams,

    /// Interval between expired-handshake sweeps, in seconds.
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./fangate_data")
}

fn default_listen() -> String {
    "127.0.0.1:7200".to_string()
}

fn default_map_size_mb() -> usize {
    1024
}

fn default_cdn_base_url() -> String {
    "http://127.0.0.1:9000/files".to_string()
}

fn default_authorize_base_url() -> String {
    "http://127.0.0.1:7200/connect".to_string()
}

fn default_purge_interval_secs() -> u64 {
    600
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            listen: default_listen(),
            map_size_mb: default_map_size_mb(),
            cdn_base_url: default_cdn_base_url(),
            authorize_base_url: default_authorize_base_url(),
            consent: ConsentPolicy::single_opt_in(),
            params: EngineParams::gate_defaults(),
            purge_interval_secs: default_purge_interval_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.listen, "127.0.0.1:7200");
        assert_eq!(config.params.handshake_ttl_secs, 600);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            listen = "0.0.0.0:8080"
            map_size_mb = 64

            [params]
            handshake_ttl_secs = 120
            credential_ttl_secs = 3600
            max_consent_metadata_fields = 8
            provider_timeout_secs = 5
        "#;
        let config = ServiceConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.map_size_mb, 64);
        assert_eq!(config.params.handshake_ttl_secs, 120);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn consent_policy_from_toml() {
        let toml = r#"
            [consent]
            model = "dual_brand"
            primary = "label"
            partner = "promoter"
        "#;
        let config = ServiceConfig::from_toml_str(toml).expect("should parse");
        assert!(matches!(config.consent, ConsentPolicy::DualBrand { .. }));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = ServiceConfig::from_toml_file(std::path::Path::new("/nonexistent/fangate.toml"));
        assert!(result.is_err());
    }
}
