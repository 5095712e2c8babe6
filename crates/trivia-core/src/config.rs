use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TriviaError};
use crate::pagination::QUESTIONS_PER_PAGE;

/// Top-level configuration for the trivia service.
///
/// Loaded from `~/.trivia/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriviaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl TriviaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TriviaConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.general.port == 0 {
            return Err(TriviaError::Config("general.port must be non-zero".to_string()));
        }
        if self.api.questions_per_page == 0 {
            return Err(TriviaError::Config(
                "api.questions_per_page must be at least 1".to_string(),
            ));
        }
        if self.storage.db_file.trim().is_empty() {
            return Err(TriviaError::Config("storage.db_file must not be empty".to_string()));
        }
        Ok(())
    }
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// API server port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            log_level: "info".to_string(),
            data_dir: "~/.trivia/data".to_string(),
        }
    }
}

/// HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Page size for every paginated listing.
    pub questions_per_page: usize,
    /// Allowed CORS origins. `"*"` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            questions_per_page: QUESTIONS_PER_PAGE,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file name, relative to `general.data_dir`.
    pub db_file: String,
    /// Insert the default categories when the store has none.
    pub seed_default_categories: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: "trivia.db".to_string(),
            seed_default_categories: true,
        }
    }
}
