//! Client configuration files
//!
//! A YAML document holding everything needed to construct a [`Client`]:
//!
//! ```yaml
//! options:
//!   retries: infinite
//!   retry_delay: 0.5
//! auth:
//!   type: bearer
//!   token: "0/abc"
//! rate_limit:
//!   requests_per_second: 2
//!   burst_size: 5
//! timeout_secs: 30
//! ```

use crate::auth::AuthConfig;
use crate::client::{Client, ClientBuilder};
use crate::error::{Error, Result, ResultExt};
use crate::http::RateLimiterConfig;
use crate::options::Options;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Everything a client needs, as read from a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Construction-time options
    #[serde(default)]
    pub options: Options,

    /// Credential
    #[serde(default)]
    pub auth: AuthConfig,

    /// Client-side throttle, off when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Turn the config into a builder, so callers can still override fields
    pub fn into_builder(self) -> ClientBuilder {
        let mut builder = Client::builder().options(&self.options).auth(self.auth);
        if let Some(rate_limit) = self.rate_limit {
            builder = builder.rate_limit(rate_limit);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        builder
    }

    /// Build a client from the config
    pub fn build(self) -> Result<Client> {
        self.into_builder().build()
    }
}

/// Load a client config from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    load_config_from_str(&content)
}

/// Load a client config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<ClientConfig> {
    // An empty document means "all defaults"
    if yaml.trim().is_empty() {
        return Ok(ClientConfig::default());
    }

    let config: ClientConfig = serde_yaml::from_str(yaml)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ClientConfig) -> Result<()> {
    config.options.validate()?;

    match &config.auth {
        AuthConfig::Bearer { token } if token.is_empty() => {
            return Err(Error::config("Bearer token cannot be empty"));
        }
        AuthConfig::Basic { username, .. } if username.is_empty() => {
            return Err(Error::config("Basic auth username cannot be empty"));
        }
        _ => {}
    }

    if let Some(rate_limit) = &config.rate_limit {
        if rate_limit.requests_per_second == 0 {
            return Err(Error::config(
                "rate_limit.requests_per_second must be positive",
            ));
        }
    }

    if config.timeout_secs == Some(0) {
        return Err(Error::config("timeout_secs must be positive"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{keys, Retries};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_load_full_config() {
        let yaml = r#"
options:
  base_url: https://example.test/api/1.0
  retries: infinite
  retry_delay: 0.5
  fields: [name, notes]
auth:
  type: bearer
  token: "0/abc"
rate_limit:
  requests_per_second: 2
  burst_size: 5
timeout_secs: 10
"#;

        let config = load_config_from_str(yaml).unwrap();
        assert_eq!(config.options.base_url().unwrap(), "https://example.test/api/1.0");
        assert_eq!(config.options.retries().unwrap(), Retries::Unbounded);
        assert_eq!(
            config.options.retry_delay().unwrap(),
            Duration::from_millis(500)
        );
        assert_eq!(
            config.options.get(keys::FIELDS),
            Some(&serde_json::json!(["name", "notes"]))
        );
        assert_eq!(config.auth, AuthConfig::bearer("0/abc"));
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 5)));
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(load_config_from_str("").unwrap(), ClientConfig::default());
        assert_eq!(load_config_from_str("{}").unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_basic_auth_config() {
        let yaml = r"
auth:
  type: basic
  username: key123
";
        let config = load_config_from_str(yaml).unwrap();
        assert_eq!(config.auth, AuthConfig::api_key("key123"));
    }

    #[test]
    fn test_invalid_option_rejected() {
        let yaml = r"
options:
  retries: many
";
        assert!(matches!(
            load_config_from_str(yaml),
            Err(Error::InvalidOption { ref key, .. }) if key == "retries"
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for yaml in [
            "auth:\n  type: bearer\n  token: \"\"\n",
            "rate_limit:\n  requests_per_second: 0\n",
            "timeout_secs: 0\n",
        ] {
            assert!(
                matches!(load_config_from_str(yaml), Err(Error::Config { .. })),
                "accepted: {yaml}"
            );
        }
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(matches!(
            load_config_from_str("retries: 3\n"),
            Err(Error::YamlParse(_))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "options:\n  limit: 20\ntimeout_secs: 5").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.options.limit().unwrap(), Some(20));
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/asana.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/asana.yaml"));
    }

    #[test]
    fn test_into_builder() {
        let config = load_config_from_str(
            "options:\n  limit: 10\nrate_limit:\n  requests_per_second: 4\n",
        )
        .unwrap();

        let client = config.build().unwrap();
        assert_eq!(client.options().limit().unwrap(), Some(10));
        assert!(client.has_rate_limiter());
        assert_eq!(client.options().retries().unwrap(), Retries::default());
    }
}
