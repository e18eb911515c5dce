//! Walkthrough definitions loaded from TOML

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sequencer::{SequenceError, StepSequencer};
use super::step::StepDefinition;

/// Walkthroughs shipped with the binary
pub const BUNDLED_WALKTHROUGHS: &str = include_str!("walkthroughs.toml");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read walkthroughs from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse walkthroughs: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid walkthrough {walkthrough}: {reason}")]
    Invalid { walkthrough: String, reason: String },
    #[error("Unknown walkthrough: {0}")]
    UnknownWalkthrough(String),
}

/// One guided example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walkthrough {
    pub id: String,
    pub title: String,
    #[serde(default, rename = "step")]
    pub steps: Vec<StepDefinition>,
}

impl Walkthrough {
    /// Fresh sequencer over this walkthrough's steps
    pub fn sequencer(&self) -> Result<StepSequencer, SequenceError> {
        StepSequencer::new(self.steps.clone())
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::Invalid {
            walkthrough: self.id.clone(),
            reason,
        };

        self.sequencer().map_err(|e| invalid(e.to_string()))?;

        for step in &self.steps {
            for target in step.next.iter().chain(step.back.iter()) {
                match self.steps.iter().find(|other| &other.id == target) {
                    None => {
                        return Err(invalid(format!(
                            "step {} links to unknown step {}",
                            step.id, target
                        )))
                    }
                    Some(other) if !other.enabled => {
                        return Err(invalid(format!(
                            "step {} links to disabled step {}",
                            step.id, target
                        )))
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct TomlCatalog {
    #[serde(default, rename = "walkthrough")]
    walkthroughs: Vec<Walkthrough>,
}

/// All walkthroughs available to a session
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    walkthroughs: Vec<Walkthrough>,
}

impl Catalog {
    /// Parse and validate a TOML document of `[[walkthrough]]` tables
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let parsed: TomlCatalog = toml::from_str(contents)?;

        for (index, walkthrough) in parsed.walkthroughs.iter().enumerate() {
            if parsed.walkthroughs[..index]
                .iter()
                .any(|other| other.id == walkthrough.id)
            {
                return Err(CatalogError::Invalid {
                    walkthrough: walkthrough.id.clone(),
                    reason: "duplicate walkthrough id".to_string(),
                });
            }
            walkthrough.validate()?;
        }

        Ok(Self {
            walkthroughs: parsed.walkthroughs,
        })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            count = catalog.walkthroughs.len(),
            "Loaded walkthroughs"
        );
        Ok(catalog)
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUNDLED_WALKTHROUGHS)
    }

    pub fn walkthroughs(&self) -> &[Walkthrough] {
        &self.walkthroughs
    }

    pub fn get(&self, id: &str) -> Result<&Walkthrough, CatalogError> {
        self.walkthroughs
            .iter()
            .find(|walkthrough| walkthrough.id == id)
            .ok_or_else(|| CatalogError::UnknownWalkthrough(id.to_string()))
    }
}
