//! Layered configuration: defaults, optional TOML file, environment overlay.
//!
//! Precedence, lowest to highest: built-in defaults, the config file
//! (`--config` or the platform config directory), `DRIVESHARE__`-prefixed
//! environment variables with `__` separating nested keys.

use crate::error::SharingError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Gateway endpoints and paging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the provider's REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// URL of the provider's batch endpoint.
    #[serde(default = "default_batch_url")]
    pub batch_url: String,

    /// Page size used when listing resources.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_batch_url() -> String {
    "https://www.googleapis.com/batch/drive/v3".to_string()
}

fn default_page_size() -> u32 {
    100
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            api_base: default_api_base(),
            batch_url: default_batch_url(),
            page_size: default_page_size(),
        }
    }
}

/// Where the stored access token lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token file path; None means the platform config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment.
    pub fn load(config_file: Option<&Path>) -> Result<AppConfig, SharingError> {
        let file = match config_file {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        };

        let mut builder = Config::builder();
        if let Some(path) = file {
            let path_str = path.to_str().ok_or_else(|| {
                SharingError::Config(format!("config path is not valid UTF-8: {:?}", path))
            })?;
            builder = builder.add_source(File::with_name(path_str));
        }
        builder = builder.add_source(
            Environment::with_prefix("DRIVESHARE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| SharingError::Config(e.to_string()))?;
        config
            .try_deserialize()
            .map_err(|e| SharingError::Config(e.to_string()))
    }
}

/// Platform config file path (`~/.config/driveshare/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "driveshare", "driveshare")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_the_provider() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.api_base, "https://www.googleapis.com/drive/v3");
        assert_eq!(
            config.gateway.batch_url,
            "https://www.googleapis.com/batch/drive/v3"
        );
        assert_eq!(config.gateway.page_size, 100);
        assert!(config.auth.token_file.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[gateway]\napi_base = \"https://drive.test/v3\"\npage_size = 7\n"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.gateway.api_base, "https://drive.test/v3");
        assert_eq!(config.gateway.page_size, 7);
        // Untouched keys keep their defaults.
        assert_eq!(
            config.gateway.batch_url,
            "https://www.googleapis.com/batch/drive/v3"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/driveshare.toml")));
        assert!(matches!(result, Err(SharingError::Config(_))));
    }
}
