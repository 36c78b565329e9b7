use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: PathBuf,
    /// User id that owns every local record and scopes remote rows
    pub user_id: String,
    /// Remote sync backend; sync is disabled until both fields are set
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub server_url: String,
    pub api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: home.join(".kilofit").join("kilofit.db"),
            user_id: "default".to_string(),
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("KILOFIT_DATABASE_PATH") {
            config.database_path = PathBuf::from(db_path);
        }
        if let Ok(user_id) = std::env::var("KILOFIT_USER_ID") {
            config.user_id = user_id;
        }
        if let Ok(server_url) = std::env::var("KILOFIT_SERVER_URL") {
            config.sync.server_url = server_url;
        }
        if let Ok(api_key) = std::env::var("KILOFIT_API_KEY") {
            config.sync.api_key = api_key;
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/kilofit/config.yaml
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".").join(".config"));
        base.join("kilofit").join("config.yaml")
    }

    /// Whether enough is configured to talk to the remote backend.
    pub fn sync_configured(&self) -> bool {
        !self.sync.server_url.is_empty() && !self.sync.api_key.is_empty()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
