// Configuration module

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{DEFAULT_ADDRESS, DEFAULT_PORT, DEFAULT_REGION};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Listener configuration for the HTTP front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

/// Object storage configuration
///
/// One bucket holds both the original assets and the derived artifacts
/// (under the `optimized/` prefix).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: None,
        }
    }
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Config {
    /// Parses a YAML configuration file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        serde_yaml::from_str(&raw).map_err(|e| format!("invalid config: {}", e))
    }

    /// Loads configuration from file and environment
    ///
    /// A missing file is not an error: the service can be configured purely
    /// through the environment. Env vars override file values.
    pub fn load(path: &Path) -> Result<Self, String> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides via an injectable lookup
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(bucket) = get("IMAGE_BUCKET").filter(|v| !v.is_empty()) {
            self.storage.bucket = bucket;
        }
        if let Some(region) = get("AWS_REGION").filter(|v| !v.is_empty()) {
            self.storage.region = region;
        }
        if let Some(endpoint) = get("AWS_ENDPOINT_URL").filter(|v| !v.is_empty()) {
            self.storage.endpoint = Some(endpoint);
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.storage.bucket.is_empty() {
            return Err(
                "storage bucket cannot be empty (set storage.bucket or IMAGE_BUCKET)".to_string(),
            );
        }
        if self.storage.region.is_empty() {
            return Err("storage region cannot be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.address, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.region, "us-east-2");
        assert!(config.storage.bucket.is_empty());
        assert!(config.storage.endpoint.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
server:
  address: 127.0.0.1
  port: 9000
storage:
  bucket: site-images
  region: eu-west-1
  endpoint: http://localhost:9000
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.bucket, "site-images");
        assert_eq!(config.storage.region, "eu-west-1");
        assert_eq!(
            config.storage.endpoint,
            Some("http://localhost:9000".to_string())
        );
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "storage:\n  bucket: site-images\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.region, "us-east-2");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            storage: StorageConfig {
                bucket: "from-file".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let mut env = HashMap::new();
        env.insert("IMAGE_BUCKET", "from-env");
        env.insert("AWS_REGION", "ap-southeast-1");
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage.bucket, "from-env");
        assert_eq!(config.storage.region, "ap-southeast-1");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config {
            storage: StorageConfig {
                bucket: "from-file".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        config.apply_env(|name| match name {
            "IMAGE_BUCKET" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.storage.bucket, "from-file");
    }

    #[test]
    fn test_validate_requires_bucket() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(err.contains("bucket"));

        let config = Config {
            storage: StorageConfig {
                bucket: "site-images".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
