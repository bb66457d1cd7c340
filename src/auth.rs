//! Stored access-token resolution.
//!
//! Interactive credential acquisition is out of scope; the gateway expects a
//! previously obtained OAuth bearer token, resolved from the environment or
//! a token file.

use crate::config::AuthConfig;
use crate::error::SharingError;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable consulted before any token file.
pub const TOKEN_ENV_VAR: &str = "DRIVESHARE_ACCESS_TOKEN";

#[derive(Debug, Deserialize)]
struct TokenFile {
    access_token: String,
}

/// Resolve the access token: environment first, then the configured token
/// file, then the platform config directory.
pub fn resolve_access_token(config: &AuthConfig) -> Result<String, SharingError> {
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    let path = token_file_path(config)?;
    let content = std::fs::read_to_string(&path).map_err(|e| {
        SharingError::Config(format!("failed to read token file {:?}: {}", path, e))
    })?;
    let token: TokenFile = toml::from_str(&content)
        .map_err(|e| SharingError::Config(format!("failed to parse token file: {}", e)))?;

    if token.access_token.is_empty() {
        return Err(SharingError::Config(
            "token file holds an empty access token".to_string(),
        ));
    }
    Ok(token.access_token)
}

fn token_file_path(config: &AuthConfig) -> Result<PathBuf, SharingError> {
    if let Some(path) = &config.token_file {
        return Ok(path.clone());
    }
    directories::ProjectDirs::from("", "driveshare", "driveshare")
        .map(|dirs| dirs.config_dir().join("token.toml"))
        .ok_or_else(|| {
            SharingError::Config(
                "could not determine platform config directory for token file".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Tests touch the process environment, so they serialize on this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn token_file_is_read_when_env_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(TOKEN_ENV_VAR);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "access_token = \"ya29.file-token\"").unwrap();

        let config = AuthConfig {
            token_file: Some(file.path().to_path_buf()),
        };
        assert_eq!(resolve_access_token(&config).unwrap(), "ya29.file-token");
    }

    #[test]
    fn env_token_wins_over_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "access_token = \"ya29.file-token\"").unwrap();
        let config = AuthConfig {
            token_file: Some(file.path().to_path_buf()),
        };

        std::env::set_var(TOKEN_ENV_VAR, "ya29.env-token");
        let result = resolve_access_token(&config);
        std::env::remove_var(TOKEN_ENV_VAR);

        assert_eq!(result.unwrap(), "ya29.env-token");
    }

    #[test]
    fn empty_token_file_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(TOKEN_ENV_VAR);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "access_token = \"\"").unwrap();
        let config = AuthConfig {
            token_file: Some(file.path().to_path_buf()),
        };

        assert!(matches!(
            resolve_access_token(&config),
            Err(SharingError::Config(_))
        ));
    }

    #[test]
    fn missing_token_file_is_a_config_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(TOKEN_ENV_VAR);
        let config = AuthConfig {
            token_file: Some(PathBuf::from("/nonexistent/token.toml")),
        };

        assert!(matches!(
            resolve_access_token(&config),
            Err(SharingError::Config(_))
        ));
    }
}
