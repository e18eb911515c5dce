//! Scripted demo sessions
//!
//! A script tape is a JSONL file of render notifications, user actions and
//! time advances. Replaying it against a [`LabSession`](crate::session::LabSession)
//! yields a trace of the session state after every event, which makes a demo
//! walkthrough reproducible without any UI.

mod runner;
mod tape;

pub use runner::{replay, TraceRecord};
pub use tape::{ScriptEvent, ScriptTape, TapeError, SCRIPT_TAPE_SCHEMA_VERSION};
