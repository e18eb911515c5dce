use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::tracker::DEFAULT_DECAY_WINDOW;
use crate::util::LabPaths;
use crate::walkthrough::{Catalog, CatalogError};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long a re-rendered unit stays flagged as active
    pub decay_window: Duration,
    /// Walkthrough definitions file (None = bundled walkthroughs)
    pub walkthroughs_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decay_window: DEFAULT_DECAY_WINDOW,
            walkthroughs_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlTrackerConfig {
    pub decay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlWalkthroughConfig {
    pub path: Option<PathBuf>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Render tracker configuration
    pub tracker: Option<TomlTrackerConfig>,
    /// Walkthrough source configuration
    pub walkthroughs: Option<TomlWalkthroughConfig>,
}

impl Config {
    /// Load the config file of a data directory, merging with defaults.
    ///
    /// A missing file is created from the bundled example; an unreadable or
    /// malformed file is logged and ignored.
    pub fn load(paths: &LabPaths) -> Self {
        let config_file = paths.config_file();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        match Self::load_from(&config_file) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Using default configuration");
                Config::default()
            }
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;

        // Relative walkthrough paths resolve against the config file
        if let (Some(walkthroughs), Some(parent)) = (&config.walkthroughs_path, path.parent()) {
            if walkthroughs.is_relative() {
                config.walkthroughs_path = Some(parent.join(walkthroughs));
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Config::default();

        // Load tracker configuration
        if let Some(tracker) = toml_config.tracker {
            if let Some(decay_ms) = tracker.decay_ms {
                config.decay_window = Duration::from_millis(decay_ms);
            }
        }

        // Load walkthrough configuration
        if let Some(walkthroughs) = toml_config.walkthroughs {
            config.walkthroughs_path = walkthroughs.path;
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    /// Override the decay window, e.g. from the command line
    pub fn with_decay_window(mut self, decay_window: Duration) -> Self {
        self.decay_window = decay_window;
        self
    }

    pub fn with_walkthroughs_path(mut self, path: PathBuf) -> Self {
        self.walkthroughs_path = Some(path);
        self
    }

    /// Walkthrough catalog from the configured file, or the bundled one
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.walkthroughs_path {
            Some(path) => Catalog::load(path),
            None => Catalog::bundled(),
        }
    }
}
