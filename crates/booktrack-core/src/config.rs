//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/booktrack/config.toml)
//! 3. Environment variables (BOOKTRACK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix
const ENV_PREFIX: &str = "BOOKTRACK";

/// Base URL of the hosted BookTrack API
pub const DEFAULT_API_URL: &str = "https://backendbooktrack-production.up.railway.app/api";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote API (collection paths are appended to it)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Directory for local data (token store)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log file path (defaults to stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Per-request timeout in seconds; requests never time out when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Treat a non-success status on DELETE as a failure
    #[serde(default = "default_verify_delete")]
    pub verify_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            data_dir: default_data_dir(),
            log_file: None,
            request_timeout_secs: None,
            verify_delete: default_verify_delete(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (BOOKTRACK_API_URL, BOOKTRACK_DATA_DIR, ...)
    /// 2. Config file (~/.config/booktrack/config.toml or BOOKTRACK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // BOOKTRACK_API_URL
        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.api_url = val;
            }
        }

        // BOOKTRACK_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // BOOKTRACK_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        // BOOKTRACK_REQUEST_TIMEOUT_SECS
        if let Ok(val) = std::env::var(format!("{}_REQUEST_TIMEOUT_SECS", ENV_PREFIX)) {
            self.request_timeout_secs = val.parse().ok().filter(|secs| *secs > 0);
        }

        // BOOKTRACK_VERIFY_DELETE
        if let Ok(val) = std::env::var(format!("{}_VERIFY_DELETE", ENV_PREFIX)) {
            self.verify_delete = val.eq_ignore_ascii_case("true") || val == "1";
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with BOOKTRACK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("booktrack")
            .join("config.toml")
    }

    /// Get the path to the persisted token store
    pub fn token_store_path(&self) -> PathBuf {
        self.data_dir.join("tokens.json")
    }

    /// Get the request timeout, if one is configured
    ///
    /// Zero means no timeout, wherever the value came from.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_verify_delete() -> bool {
    true
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("booktrack")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "BOOKTRACK_API_URL",
        "BOOKTRACK_DATA_DIR",
        "BOOKTRACK_LOG_FILE",
        "BOOKTRACK_REQUEST_TIMEOUT_SECS",
        "BOOKTRACK_VERIFY_DELETE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.verify_delete);
        assert!(config.request_timeout().is_none());
        assert!(config.log_file.is_none());
        assert!(config.data_dir.ends_with("booktrack"));
    }

    #[test]
    fn test_token_store_path() {
        let config = Config::default();
        assert!(config.token_store_path().ends_with("tokens.json"));
    }

    #[test]
    fn test_env_override_api_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("BOOKTRACK_API_URL", "http://localhost:5000/api");
        config.apply_env_overrides();
        assert_eq!(config.api_url, "http://localhost:5000/api");

        // Empty value keeps the current URL
        env::set_var("BOOKTRACK_API_URL", "");
        config.apply_env_overrides();
        assert_eq!(config.api_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_env_override_verify_delete() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("BOOKTRACK_VERIFY_DELETE", "false");
        config.apply_env_overrides();
        assert!(!config.verify_delete);

        env::set_var("BOOKTRACK_VERIFY_DELETE", "1");
        config.apply_env_overrides();
        assert!(config.verify_delete);
    }

    #[test]
    fn test_env_override_timeout() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("BOOKTRACK_REQUEST_TIMEOUT_SECS", "15");
        config.apply_env_overrides();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));

        // Zero or garbage disables the timeout
        env::set_var("BOOKTRACK_REQUEST_TIMEOUT_SECS", "0");
        config.apply_env_overrides();
        assert!(config.request_timeout().is_none());

        env::set_var("BOOKTRACK_REQUEST_TIMEOUT_SECS", "soon");
        config.apply_env_overrides();
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_serialization() {
        let config = Config {
            api_url: "https://books.example.com/api".to_string(),
            data_dir: PathBuf::from("/data/booktrack"),
            log_file: Some(PathBuf::from("/tmp/booktrack.log")),
            request_timeout_secs: Some(30),
            verify_delete: false,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("api_url"));
        assert!(toml_str.contains("verify_delete"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api_url, config.api_url);
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.log_file, config.log_file);
        assert_eq!(parsed.request_timeout_secs, Some(30));
        assert!(!parsed.verify_delete);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            api_url = "http://127.0.0.1:8080/api"
            data_dir = "/custom/data"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        // Unspecified keys fall back to defaults
        assert!(config.verify_delete);
    }

    #[test]
    fn test_zero_timeout_in_file_means_none() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_str("request_timeout_secs = 0").unwrap();
        assert_eq!(config.request_timeout(), None);

        let config = Config::load_from_str("request_timeout_secs = 20").unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_save_and_load_path() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            verify_delete: false,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert!(!loaded.verify_delete);
        assert!(loaded.data_dir.exists());
    }
}
