//! Step sequencing for a single walkthrough

use thiserror::Error;

use super::step::{CurrentStep, StepDefinition};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Invalid step: {0}")]
    InvalidStep(String),
    #[error("Walkthrough has no steps")]
    EmptySequence,
    #[error("Walkthrough has no enabled steps")]
    NoEnabledSteps,
    #[error("Duplicate step id: {0}")]
    DuplicateStep(String),
    #[error("No {direction} transition from step {from}")]
    NoTransition {
        from: String,
        direction: Direction,
    },
    #[error("Step {0} is waiting for its trigger")]
    TriggerPending(String),
}

/// Direction of a declared transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Back,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Next => f.write_str("next"),
            Direction::Back => f.write_str("back"),
        }
    }
}

/// Walkthrough controller: the current step, per-step trigger flags, and
/// validated navigation between steps.
///
/// Trigger flags are stored parallel to `steps`, so there is always exactly
/// one flag per step.
#[derive(Debug, Clone)]
pub struct StepSequencer {
    steps: Vec<StepDefinition>,
    current: usize,
    triggers: Vec<bool>,
}

impl StepSequencer {
    /// Build a sequencer positioned on the first enabled step
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, SequenceError> {
        if steps.is_empty() {
            return Err(SequenceError::EmptySequence);
        }

        for (index, step) in steps.iter().enumerate() {
            if steps[..index].iter().any(|other| other.id == step.id) {
                return Err(SequenceError::DuplicateStep(step.id.clone()));
            }
        }

        let current = first_enabled(&steps).ok_or(SequenceError::NoEnabledSteps)?;
        let triggers = vec![false; steps.len()];

        Ok(Self {
            steps,
            current,
            triggers,
        })
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn current_step_id(&self) -> &str {
        &self.steps[self.current].id
    }

    pub fn current_step(&self) -> CurrentStep<'_> {
        CurrentStep {
            step: &self.steps[self.current],
            trigger_observed: self.triggers[self.current],
        }
    }

    /// Trigger flag for `step_id`, or `None` for an unknown id
    pub fn trigger_observed(&self, step_id: &str) -> Option<bool> {
        self.index_of(step_id).map(|index| self.triggers[index])
    }

    /// Jump to `step_id`. Trigger flags are left untouched.
    pub fn goto(&mut self, step_id: &str) -> Result<(), SequenceError> {
        let index = self
            .index_of(step_id)
            .filter(|&index| self.steps[index].enabled)
            .ok_or_else(|| SequenceError::InvalidStep(step_id.to_string()))?;

        if index != self.current {
            tracing::debug!(
                from = %self.steps[self.current].id,
                to = %step_id,
                "Walkthrough step changed"
            );
        }
        self.current = index;
        Ok(())
    }

    /// Follow the current step's "next" edge
    pub fn next(&mut self) -> Result<(), SequenceError> {
        let current = self.current_step();
        let target = current
            .step
            .next
            .clone()
            .ok_or_else(|| SequenceError::NoTransition {
                from: current.step.id.clone(),
                direction: Direction::Next,
            })?;

        if current.step.require_trigger && !current.trigger_observed {
            return Err(SequenceError::TriggerPending(current.step.id.clone()));
        }

        self.goto(&target)
    }

    /// Follow the current step's "back" edge
    pub fn back(&mut self) -> Result<(), SequenceError> {
        let step = &self.steps[self.current];
        let target = step.back.clone().ok_or_else(|| SequenceError::NoTransition {
            from: step.id.clone(),
            direction: Direction::Back,
        })?;
        self.goto(&target)
    }

    /// Record that the step's expected user action happened. Unknown ids are
    /// ignored.
    pub fn mark_trigger_observed(&mut self, step_id: &str) {
        match self.index_of(step_id) {
            Some(index) => {
                if !self.triggers[index] {
                    tracing::debug!(step = %step_id, "Trigger observed");
                }
                self.triggers[index] = true;
            }
            None => {
                tracing::trace!(step = %step_id, "Ignoring trigger for unknown step");
            }
        }
    }

    /// Back to the first enabled step with every trigger cleared
    pub fn reset(&mut self) {
        // Construction guarantees an enabled step exists
        self.current = first_enabled(&self.steps).unwrap_or(0);
        self.triggers.iter_mut().for_each(|flag| *flag = false);
    }

    fn index_of(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == step_id)
    }
}

fn first_enabled(steps: &[StepDefinition]) -> Option<usize> {
    steps.iter().position(|step| step.enabled)
}
