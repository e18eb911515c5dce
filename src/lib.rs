pub mod config;
pub mod script;
pub mod session;
pub mod tracker;
pub mod util;
pub mod walkthrough;

pub use config::{Config, ConfigError};
pub use script::{replay, ScriptEvent, ScriptTape, TapeError, TraceRecord};
pub use session::{LabSession, SessionStatus};
pub use tracker::{ObserverRegistry, RenderObserver, RenderSnapshot, UnitSnapshot};
pub use walkthrough::{
    Catalog, CatalogError, CurrentStep, SequenceError, StepDefinition, StepSequencer, Walkthrough,
};
