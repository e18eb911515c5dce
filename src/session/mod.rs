//! Demo session wiring
//!
//! A [`LabSession`] pairs the render observers of one demo with the
//! sequencer of its walkthrough. This is the only place the two meet; the
//! presentation layer (or a script replay) drives it with render
//! notifications and navigation actions.

use std::time::Duration;

use serde::Serialize;

use crate::tracker::{ObserverRegistry, RenderSnapshot, UnitSnapshot};
use crate::walkthrough::{SequenceError, StepSequencer, Walkthrough};

/// Everything a view needs to draw the current state of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub walkthrough: String,
    pub step: String,
    pub trigger_observed: bool,
    /// Whether "next" would succeed right now
    pub can_advance: bool,
    pub units: Vec<UnitSnapshot>,
}

#[derive(Debug)]
pub struct LabSession {
    walkthrough_id: String,
    title: String,
    observers: ObserverRegistry,
    sequencer: StepSequencer,
}

impl LabSession {
    pub fn new(walkthrough: &Walkthrough, decay_window: Duration) -> Result<Self, SequenceError> {
        let sequencer = walkthrough.sequencer()?;
        let observers = ObserverRegistry::new(decay_window);
        tracing::info!(
            walkthrough = %walkthrough.id,
            steps = sequencer.steps().len(),
            decay = ?observers.decay_window(),
            "Session started"
        );
        Ok(Self {
            walkthrough_id: walkthrough.id.clone(),
            title: walkthrough.title.clone(),
            observers,
            sequencer,
        })
    }

    pub fn walkthrough_id(&self) -> &str {
        &self.walkthrough_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn render(&mut self, unit: &str) -> RenderSnapshot {
        self.observers.observe(unit)
    }

    pub fn unmount(&mut self, unit: &str) -> bool {
        self.observers.dispose(unit)
    }

    /// Mark a step's trigger as observed; defaults to the current step
    pub fn trigger(&mut self, step: Option<&str>) {
        let step = step
            .unwrap_or_else(|| self.sequencer.current_step_id())
            .to_string();
        self.sequencer.mark_trigger_observed(&step);
    }

    pub fn goto(&mut self, step: &str) -> Result<(), SequenceError> {
        self.sequencer.goto(step)
    }

    pub fn next(&mut self) -> Result<(), SequenceError> {
        self.sequencer.next()
    }

    pub fn back(&mut self) -> Result<(), SequenceError> {
        self.sequencer.back()
    }

    pub fn reset(&mut self) {
        self.sequencer.reset();
    }

    pub fn status(&self) -> SessionStatus {
        let current = self.sequencer.current_step();
        SessionStatus {
            walkthrough: self.walkthrough_id.clone(),
            step: current.id().to_string(),
            trigger_observed: current.trigger_observed,
            can_advance: current.can_advance(),
            units: self.observers.snapshots(),
        }
    }
}
