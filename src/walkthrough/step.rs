//! Step descriptors for guided walkthroughs

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Code shown alongside a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSample {
    pub title: String,
    pub code: String,
}

/// One stage of a walkthrough
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Unique id within the walkthrough
    pub id: String,
    /// Label for navigation controls
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Step reached by "next", if any
    #[serde(default)]
    pub next: Option<String>,
    /// Step reached by "back", if any
    #[serde(default)]
    pub back: Option<String>,
    /// Only allow "next" once this step's trigger has been observed
    #[serde(default)]
    pub require_trigger: bool,
    /// Shown until the trigger fires
    #[serde(default)]
    pub intro: Option<String>,
    /// Shown once the trigger has fired
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub code: Option<CodeSample>,
}

impl StepDefinition {
    /// Minimal enabled step with no edges
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            enabled: true,
            next: None,
            back: None,
            require_trigger: false,
            intro: None,
            explanation: None,
            code: None,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_next(mut self, id: impl Into<String>) -> Self {
        self.next = Some(id.into());
        self
    }

    pub fn with_back(mut self, id: impl Into<String>) -> Self {
        self.back = Some(id.into());
        self
    }

    pub fn requiring_trigger(mut self) -> Self {
        self.require_trigger = true;
        self
    }

    pub fn with_intro(mut self, text: impl Into<String>) -> Self {
        self.intro = Some(text.into());
        self
    }

    pub fn with_explanation(mut self, text: impl Into<String>) -> Self {
        self.explanation = Some(text.into());
        self
    }

    pub fn with_code(mut self, title: impl Into<String>, code: impl Into<String>) -> Self {
        self.code = Some(CodeSample {
            title: title.into(),
            code: code.into(),
        });
        self
    }
}

/// The current step together with its trigger flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentStep<'a> {
    pub step: &'a StepDefinition,
    pub trigger_observed: bool,
}

impl<'a> CurrentStep<'a> {
    pub fn id(&self) -> &'a str {
        &self.step.id
    }

    /// Text to show right now: the explanation once the trigger fired,
    /// otherwise the introduction
    pub fn narrative(&self) -> Option<&'a str> {
        if self.trigger_observed {
            self.step.explanation.as_deref()
        } else {
            self.step.intro.as_deref()
        }
    }

    /// Whether "next" is currently allowed by the trigger gate
    pub fn can_advance(&self) -> bool {
        self.step.next.is_some() && (self.trigger_observed || !self.step.require_trigger)
    }
}
