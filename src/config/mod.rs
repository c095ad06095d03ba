//! Configuration management for spiderop

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::models::AuthenticationModel;
use crate::error::{ConfigError, Result};

/// Default seconds between polls when waiting for a scan to finish
fn default_poll_interval() -> u64 {
    15
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the enterprise rest endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Account username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Account password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Optional tenant (client) id to authenticate against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Seconds between status polls for `scan run --wait`
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".spiderop").join("config.yaml"))
    }

    /// Resolve the config path from an optional CLI override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    /// Load configuration, honoring an optional CLI path override
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration, honoring an optional CLI path override
    pub fn save(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // The file holds credentials; keep it 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// The endpoint to target, preferring a CLI/env override.
    pub fn resolve_endpoint(&self, override_endpoint: Option<&str>) -> Result<String> {
        override_endpoint
            .map(str::to_string)
            .or_else(|| self.endpoint.clone())
            .ok_or_else(|| ConfigError::MissingEndpoint.into())
    }

    /// Build the credential bundle for `login`.
    pub fn auth_model(&self) -> Result<AuthenticationModel> {
        let (username, password) = match (&self.username, &self.password) {
            (Some(username), Some(password)) => (username.clone(), password.clone()),
            _ => return Err(ConfigError::MissingCredentials.into()),
        };

        Ok(match &self.client_id {
            Some(client_id) => {
                AuthenticationModel::with_client_id(username, password, client_id.clone())
            }
            None => AuthenticationModel::new(username, password),
        })
    }

    /// Validate that required configuration is present
    pub fn validate_auth(&self) -> Result<()> {
        if self.endpoint.is_none() {
            return Err(ConfigError::MissingEndpoint.into());
        }
        if self.username.is_none() || self.password.is_none() {
            return Err(ConfigError::MissingCredentials.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.endpoint.is_none());
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert!(config.client_id.is_none());
        assert_eq!(config.preferences.poll_interval_secs, 15);
    }

    #[test]
    fn test_validate_auth() {
        let mut config = Config::default();
        assert!(config.validate_auth().is_err());

        config.endpoint = Some("https://scanner.example.com/rest/v1".to_string());
        assert!(config.validate_auth().is_err());

        config.username = Some("admin".to_string());
        config.password = Some("s3cret".to_string());
        assert!(config.validate_auth().is_ok());
    }

    #[test]
    fn test_resolve_endpoint_prefers_override() {
        let config = Config {
            endpoint: Some("https://configured.example.com".to_string()),
            ..Default::default()
        };

        let resolved = config
            .resolve_endpoint(Some("https://override.example.com"))
            .unwrap();
        assert_eq!(resolved, "https://override.example.com");

        let fallback = config.resolve_endpoint(None).unwrap();
        assert_eq!(fallback, "https://configured.example.com");
    }

    #[test]
    fn test_resolve_endpoint_missing() {
        let config = Config::default();
        assert!(config.resolve_endpoint(None).is_err());
    }

    #[test]
    fn test_auth_model_includes_client_id() {
        let config = Config {
            username: Some("admin".to_string()),
            password: Some("s3cret".to_string()),
            client_id: Some("t-1".to_string()),
            ..Default::default()
        };

        let auth = config.auth_model().unwrap();
        assert_eq!(auth.username, "admin");
        assert_eq!(auth.client_id.as_deref(), Some("t-1"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");

        let config = Config {
            endpoint: Some("https://scanner.example.com/rest/v1".to_string()),
            username: Some("admin".to_string()),
            password: Some("s3cret".to_string()),
            client_id: None,
            preferences: Preferences {
                format: Some("json".to_string()),
                poll_interval_secs: 5,
            },
        };
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path.clone()).unwrap();
        assert_eq!(loaded.endpoint, config.endpoint);
        assert_eq!(loaded.username, config.username);
        assert_eq!(loaded.preferences.poll_interval_secs, 5);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let result = Config::load_from(temp.path().join("absent.yaml"));
        assert!(result.is_err());
    }
}
