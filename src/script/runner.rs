//! Replay a script tape against a session

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use super::tape::{ScriptEvent, ScriptTape};
use crate::session::{LabSession, SessionStatus};

/// Session state after one scripted event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    pub seq: usize,
    pub event: ScriptEvent,
    #[serde(flatten)]
    pub status: SessionStatus,
    /// Navigation failure caused by this event, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TraceRecord {
    /// One-line human readable form, e.g.
    /// `#2 render ProductList | baseline | ShoppingApp=1 ProductList=2*`
    pub fn render_line(&self) -> String {
        let mut line = format!(
            "#{} {} | {}{}",
            self.seq,
            describe(&self.event),
            self.status.step,
            if self.status.trigger_observed { " (triggered)" } else { "" }
        );
        if !self.status.units.is_empty() {
            line.push_str(" |");
            for unit in &self.status.units {
                let _ = write!(
                    line,
                    " {}={}{}",
                    unit.name,
                    unit.count,
                    if unit.active { "*" } else { "" }
                );
            }
        }
        if let Some(error) = &self.error {
            let _ = write!(line, " | error: {error}");
        }
        line
    }
}

fn describe(event: &ScriptEvent) -> String {
    match event {
        ScriptEvent::Render { unit } => format!("render {unit}"),
        ScriptEvent::Unmount { unit } => format!("unmount {unit}"),
        ScriptEvent::Advance { ms } => format!("advance {ms}ms"),
        ScriptEvent::Trigger { step: Some(step) } => format!("trigger {step}"),
        ScriptEvent::Trigger { step: None } => "trigger".to_string(),
        ScriptEvent::Goto { step } => format!("goto {step}"),
        ScriptEvent::Next => "next".to_string(),
        ScriptEvent::Back => "back".to_string(),
        ScriptEvent::Reset => "reset".to_string(),
        ScriptEvent::Note { message } => format!("note {message}"),
    }
}

/// Apply every event of `tape` in order, sleeping through `advance` events.
///
/// Navigation errors are recorded on the trace rather than aborting the
/// replay.
pub async fn replay(session: &mut LabSession, tape: &ScriptTape) -> Vec<TraceRecord> {
    let mut trace = Vec::with_capacity(tape.events.len());

    for (idx, event) in tape.events.iter().enumerate() {
        let result = match event {
            ScriptEvent::Render { unit } => {
                session.render(unit);
                Ok(())
            }
            ScriptEvent::Unmount { unit } => {
                session.unmount(unit);
                Ok(())
            }
            ScriptEvent::Advance { ms } => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                Ok(())
            }
            ScriptEvent::Trigger { step } => {
                session.trigger(step.as_deref());
                Ok(())
            }
            ScriptEvent::Goto { step } => session.goto(step),
            ScriptEvent::Next => session.next(),
            ScriptEvent::Back => session.back(),
            ScriptEvent::Reset => {
                session.reset();
                Ok(())
            }
            ScriptEvent::Note { message } => {
                tracing::info!(%message, "Script note");
                Ok(())
            }
        };

        let error = match result {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, seq = idx + 1, "Scripted navigation rejected");
                Some(e.to_string())
            }
        };

        trace.push(TraceRecord {
            seq: idx + 1,
            event: event.clone(),
            status: session.status(),
            error,
        });
    }

    trace
}
