//! Configuration loading and types.
//!
//! Configuration is read from a YAML file and deserialized into the
//! [`Config`] struct: one connection descriptor per bucket role
//! (source and target) plus logging settings.

use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bucket being migrated from.
    pub source: StoreConfig,

    /// Bucket being migrated to.
    pub target: StoreConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection descriptor for one bucket role.
///
/// Immutable once constructed; the two roles share no state.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Access key (maps to `access_key` in YAML, also accepts `access_key_id`).
    #[serde(alias = "access_key_id")]
    pub access_key: String,

    /// Secret access key (also accepts `secret_access_key`).
    #[serde(alias = "secret_access_key")]
    pub secret_key: String,

    /// S3-compatible endpoint URL (e.g. `https://fra1.digitaloceanspaces.com`).
    pub endpoint: String,

    /// Region presented to the endpoint.
    #[serde(default = "default_region")]
    pub region: String,

    /// Bucket name.
    pub bucket: String,

    /// Force path-style URL addressing.
    #[serde(default)]
    pub use_path_style: bool,

    /// CDN-style base URL the bucket is publicly readable from.
    /// Required for the source role; unused for the target.
    #[serde(default)]
    pub public_base_url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: text or json.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// -- Defaults ----------------------------------------------------------------

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

// -- Loader ------------------------------------------------------------------

/// Load and parse configuration from a YAML file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config: Config = serde_yaml::from_str(&contents)?;
    Ok(config)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_YAML: &str = r#"
source:
  access_key: src-key
  secret_key: src-secret
  endpoint: https://fra1.digitaloceanspaces.com
  region: us-east-1
  bucket: staging-assets
  public_base_url: https://staging-assets.fra1.cdn.digitaloceanspaces.com
target:
  access_key: dst-key
  secret_key: dst-secret
  endpoint: https://s3.eu-central-1.amazonaws.com
  region: eu-central-1
  bucket: prod-assets
logging:
  level: debug
  format: json
"#;

    #[test]
    fn parses_full_config() {
        let config: Config = serde_yaml::from_str(FULL_YAML).unwrap();
        assert_eq!(config.source.bucket, "staging-assets");
        assert_eq!(config.source.region, "us-east-1");
        assert_eq!(
            config.source.public_base_url,
            "https://staging-assets.fra1.cdn.digitaloceanspaces.com"
        );
        assert_eq!(config.target.bucket, "prod-assets");
        assert_eq!(config.target.region, "eu-central-1");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn defaults_apply_for_optional_fields() {
        let yaml = r#"
source:
  access_key: k
  secret_key: s
  endpoint: https://example.com
  bucket: a
target:
  access_key: k
  secret_key: s
  endpoint: https://example.com
  bucket: b
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source.region, "us-east-1");
        assert!(!config.source.use_path_style);
        assert_eq!(config.source.public_base_url, "");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn accepts_aws_style_credential_aliases() {
        let yaml = r#"
source:
  access_key_id: k
  secret_access_key: s
  endpoint: https://example.com
  bucket: a
target:
  access_key: k
  secret_key: s
  endpoint: https://example.com
  bucket: b
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source.access_key, "k");
        assert_eq!(config.source.secret_key, "s");
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL_YAML.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.source.bucket, "staging-assets");
    }

    #[test]
    fn load_config_fails_on_missing_file() {
        assert!(load_config("/nonexistent/s3migrate.yaml").is_err());
    }

    #[test]
    fn load_config_fails_on_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"source: [not, a, mapping").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
