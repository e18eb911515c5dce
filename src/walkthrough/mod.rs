//! Guided walkthroughs: step definitions, the sequencer that navigates them,
//! and the TOML catalog they are loaded from

mod catalog;
mod sequencer;
mod step;

pub use catalog::{Catalog, CatalogError, Walkthrough, BUNDLED_WALKTHROUGHS};
pub use sequencer::{Direction, SequenceError, StepSequencer};
pub use step::{CodeSample, CurrentStep, StepDefinition};
