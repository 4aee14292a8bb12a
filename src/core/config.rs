//! TOML configuration file parsing and loading
//!
//! Handles loading and parsing of the TOML configuration, default config
//! file discovery, and validation of config values.
//!
//! ```toml
//! [processor]
//! capacity = 1000
//!
//! [logging]
//! level = "debug"
//! format = "ext"
//! file = "/var/log/keyqueue.log"
//! color = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default per-key buffer capacity
pub const DEFAULT_CAPACITY: usize = 1000;

const CONFIG_DIR_NAME: &str = "keyqueue";
const CONFIG_FILE_NAME: &str = "keyqueue.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file does not exist: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Io { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { .. } => Some("Configuration file does not exist"),
            ConfigError::Parse { message, .. } => Some(message.as_str()),
            ConfigError::Invalid { message } => Some(message.as_str()),
            ConfigError::Io { .. } => None,
        }
    }
}

/// Settings for a single queue processor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl ProcessorConfig {
    /// Create a processor config with the given per-key capacity
    ///
    /// Fails if `capacity` is zero: such a processor could never accept an item.
    pub fn new(capacity: usize) -> ConfigResult<Self> {
        let config = Self { capacity };
        config.validate()?;
        Ok(config)
    }

    /// Maximum number of buffered items per key
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid {
                message: "processor.capacity must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Timestamp, level and message
    #[default]
    Text,
    /// Text plus the source location of the log call
    Ext,
    /// One compact JSON object per record
    Json,
}

/// Logging settings consumed by [`crate::core::logging::init_logging`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// flexi_logger level specification, e.g. `info` or `warn,keyqueue=trace`
    pub level: String,
    pub format: LogFormat,
    /// Write to this file instead of stderr
    pub file: Option<PathBuf>,
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            file: None,
            color: false,
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> ConfigResult<()> {
        flexi_logger::LogSpecification::parse(&self.level).map_err(|e| ConfigError::Invalid {
            message: format!("logging.level '{}' is not valid: {}", self.level, e),
        })?;
        Ok(())
    }
}

/// Top level configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyQueueConfig {
    pub processor: ProcessorConfig,
    pub logging: LoggingConfig,
}

impl KeyQueueConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Self::parse(contents, "<string>")
    }

    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        log::debug!("Loading configuration from {}", path.display());
        Self::parse(&contents, &path.display().to_string())
    }

    /// Load an explicitly requested file, or fall back to discovery
    ///
    /// An explicit path must exist. Without one, the default location
    /// (`<config dir>/keyqueue/keyqueue.toml`) is used when present,
    /// otherwise built-in defaults apply.
    pub fn load_or_default(config_file: Option<&Path>) -> ConfigResult<Self> {
        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::load(path)
            }
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => {
                    log::trace!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn parse(contents: &str, origin: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        config.processor.validate()?;
        config.logging.validate()?;
        Ok(config)
    }
}

/// Default configuration file location, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
