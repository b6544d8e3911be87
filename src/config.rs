//! Service configuration.
//!
//! Layered, lowest precedence first: built-in defaults, an optional TOML
//! file, the `.env` file plus process environment, then CLI flags (applied
//! by `main`). The service key is not frozen at startup: it is resolved on
//! every call so a missing key surfaces as a structured failure result
//! rather than a startup crash.
//!
//! ```toml
//! [upstream]
//! endpoint = "https://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getUltraSrtNcst"
//! timeout_secs = 8
//! page_size = 1000
//! service_key = "..."   # optional; KMA_SERVICE_KEY wins
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::ingest::kma::ULTRA_SRT_NCST_URL;
use crate::model::{NowcastError, SERVICE_KEY_ENV};

pub const DEFAULT_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "KMA_NOWCAST_CONFIG";

// ============================================================================
// TOML Configuration Structures
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    upstream: UpstreamSection,
    #[serde(default)]
    server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpstreamSection {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    page_size: Option<u32>,
    service_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

// ============================================================================
// Resolved configuration
// ============================================================================

/// Settings for the upstream client.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub page_size: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: ULTRA_SRT_NCST_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Bind address for the HTTP stream transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub server: ServerConfig,
    /// Key from the config file, used when the environment has none.
    file_service_key: Option<String>,
}

impl Config {
    /// Loads `.env`, then the TOML file at `path` (or `KMA_NOWCAST_CONFIG`)
    /// if any, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, NowcastError> {
        dotenv::dotenv().ok();

        let env_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty());
        let mut config = match path.map(Path::to_path_buf).or(env_path.map(Into::into)) {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML config file over the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NowcastError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| NowcastError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| NowcastError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, NowcastError> {
        let file: FileConfig =
            toml::from_str(content).map_err(|e| NowcastError::Config(e.to_string()))?;
        let defaults = Self::default();

        let config = Self {
            upstream: UpstreamConfig {
                endpoint: file.upstream.endpoint.unwrap_or(defaults.upstream.endpoint),
                timeout: file
                    .upstream
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.upstream.timeout),
                page_size: file.upstream.page_size.unwrap_or(defaults.upstream.page_size),
            },
            server: ServerConfig {
                host: file.server.host.unwrap_or(defaults.server.host),
                port: file.server.port.unwrap_or(defaults.server.port),
            },
            file_service_key: non_blank(file.upstream.service_key),
        };
        config.validate()?;
        Ok(config)
    }

    /// Applies `KMA_ENDPOINT`, `KMA_TIMEOUT_SECS` and `PORT` from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), NowcastError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = non_blank(lookup("KMA_ENDPOINT")) {
            self.upstream.endpoint = endpoint;
        }
        if let Some(raw) = non_blank(lookup("KMA_TIMEOUT_SECS")) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                NowcastError::Config(format!("KMA_TIMEOUT_SECS={} is not a whole number of seconds", raw))
            })?;
            self.upstream.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = non_blank(lookup("PORT")) {
            self.server.port = raw
                .trim()
                .parse::<u16>()
                .map_err(|_| NowcastError::Config(format!("PORT={} is not a valid port", raw)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), NowcastError> {
        let mut issues: Vec<String> = Vec::new();
        if self.upstream.endpoint.trim().is_empty() {
            issues.push("upstream.endpoint must not be empty".into());
        }
        if self.upstream.timeout.is_zero() {
            issues.push("upstream.timeout_secs must be > 0".into());
        }
        if self.upstream.page_size == 0 {
            issues.push("upstream.page_size must be > 0".into());
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(NowcastError::Config(issues.join("; ")))
        }
    }

    /// Service key for this call: `KMA_SERVICE_KEY` from `lookup` first,
    /// then the file.
    pub fn resolve_service_key_with<F>(&self, lookup: F) -> Result<String, NowcastError>
    where
        F: Fn(&str) -> Option<String>,
    {
        non_blank(lookup(SERVICE_KEY_ENV))
            .or_else(|| self.file_service_key.clone())
            .ok_or_else(|| NowcastError::MissingCredential(SERVICE_KEY_ENV.to_string()))
    }

    /// Sets the fallback key, as if it came from the config file.
    pub fn with_service_key(mut self, key: &str) -> Self {
        self.file_service_key = non_blank(Some(key.to_string()));
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_upstream_expectations() {
        let config = Config::default();
        assert_eq!(config.upstream.endpoint, ULTRA_SRT_NCST_URL);
        assert_eq!(config.upstream.timeout, Duration::from_secs(8));
        assert_eq!(config.upstream.page_size, 1000);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
            [upstream]
            timeout_secs = 3
            service_key = "from-file"

            [server]
            port = 3000
            "#,
        )
        .expect("valid config should parse");
        assert_eq!(config.upstream.timeout, Duration::from_secs(3));
        assert_eq!(config.upstream.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.resolve_service_key_with(env(&[])).unwrap(), "from-file");
    }

    #[test]
    fn test_unknown_toml_keys_are_rejected() {
        let result = Config::from_toml_str("[upstream]\ntimeout = 3\n");
        assert!(matches!(result, Err(NowcastError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_and_page_size_fail_validation() {
        let result = Config::from_toml_str("[upstream]\ntimeout_secs = 0\npage_size = 0\n");
        match result {
            Err(NowcastError::Config(msg)) => {
                assert!(msg.contains("timeout_secs"), "got: {}", msg);
                assert!(msg.contains("page_size"), "got: {}", msg);
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("PORT", "3000"), ("KMA_TIMEOUT_SECS", "5"), ("KMA_ENDPOINT", "http://localhost:9/x")]))
            .expect("valid env should apply");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upstream.timeout, Duration::from_secs(5));
        assert_eq!(config.upstream.endpoint, "http://localhost:9/x");
    }

    #[test]
    fn test_bad_port_is_a_config_error() {
        let mut config = Config::default();
        let result = config.apply_env(env(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(NowcastError::Config(_))));
    }

    #[test]
    fn test_missing_or_blank_key_is_a_credential_error() {
        let config = Config::default();
        for lookup in [env(&[]), env(&[("KMA_SERVICE_KEY", "   ")])] {
            assert_eq!(
                config.resolve_service_key_with(lookup),
                Err(NowcastError::MissingCredential("KMA_SERVICE_KEY".to_string()))
            );
        }
    }

    #[test]
    fn test_environment_key_wins_over_file_key() {
        let config = Config::default().with_service_key("from-file");
        let key = config
            .resolve_service_key_with(env(&[("KMA_SERVICE_KEY", " from-env ")]))
            .unwrap();
        assert_eq!(key, "from-env");
    }
}
