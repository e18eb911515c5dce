use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SCRIPT_TAPE_SCHEMA_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum TapeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid tape line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Missing tape header")]
    MissingHeader,
    #[error("Unsupported tape schema version {0}")]
    UnsupportedVersion(u32),
}

/// One scripted interaction with a demo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// The named unit rendered (mount or update)
    Render { unit: String },
    /// The named unit was torn down
    Unmount { unit: String },
    /// Let time pass
    Advance { ms: u64 },
    /// The expected user action for a step happened (current step if omitted)
    Trigger {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<String>,
    },
    Goto { step: String },
    Next,
    Back,
    Reset,
    Note { message: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum HeaderTag {
    Header,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TapeHeader {
    #[serde(rename = "type")]
    tag: HeaderTag,
    schema_version: u32,
}

/// A JSONL script: a header line followed by one event per line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTape {
    pub schema_version: u32,
    pub events: Vec<ScriptEvent>,
}

impl ScriptTape {
    pub fn new(events: Vec<ScriptEvent>) -> Self {
        Self {
            schema_version: SCRIPT_TAPE_SCHEMA_VERSION,
            events,
        }
    }

    pub fn parse_jsonl(contents: &str) -> Result<Self, TapeError> {
        Self::parse_lines(contents.lines().map(|line| Ok(line.to_string())))
    }

    pub fn read_jsonl_from_path(path: &Path) -> Result<Self, TapeError> {
        let reader = BufReader::new(File::open(path)?);
        Self::parse_lines(reader.lines())
    }

    fn parse_lines<I>(lines: I) -> Result<Self, TapeError>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let mut schema_version: Option<u32> = None;
        let mut events: Vec<ScriptEvent> = Vec::new();

        for (idx, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_no = idx + 1;

            match schema_version {
                None => {
                    let header: TapeHeader =
                        serde_json::from_str(&line).map_err(|_| TapeError::MissingHeader)?;
                    if header.schema_version != SCRIPT_TAPE_SCHEMA_VERSION {
                        return Err(TapeError::UnsupportedVersion(header.schema_version));
                    }
                    schema_version = Some(header.schema_version);
                }
                Some(_) => {
                    let event: ScriptEvent =
                        serde_json::from_str(&line).map_err(|source| TapeError::Json {
                            line: line_no,
                            source,
                        })?;
                    events.push(event);
                }
            }
        }

        let schema_version = schema_version.ok_or(TapeError::MissingHeader)?;
        Ok(Self {
            schema_version,
            events,
        })
    }

    pub fn write_jsonl_to_path(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let header = TapeHeader {
            tag: HeaderTag::Header,
            schema_version: self.schema_version,
        };
        writeln!(
            writer,
            "{}",
            serde_json::to_string(&header).map_err(io::Error::other)?
        )?;
        for event in &self.events {
            writeln!(
                writer,
                "{}",
                serde_json::to_string(event).map_err(io::Error::other)?
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}
