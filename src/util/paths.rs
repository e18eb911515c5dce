//! On-disk layout of a memo-lab data directory
//!
//! ```text
//! <root>/config.toml
//! <root>/logs/memo-lab.log
//! ```

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = ".memo-lab";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOGS_DIR_NAME: &str = "logs";
const LOG_FILE_NAME: &str = "memo-lab.log";

/// Resolved locations under one data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabPaths {
    root: PathBuf,
}

impl LabPaths {
    /// Layout rooted at `root`, or at `~/.memo-lab` when no override is given
    pub fn new(root: Option<PathBuf>) -> Self {
        let root = root.unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(DATA_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
        });
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR_NAME)
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE_NAME)
    }

    /// Create the logs directory if needed and open the log file for appending
    pub fn open_log_file(&self) -> io::Result<File> {
        fs::create_dir_all(self.logs_dir())?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_file())
    }
}
