//! Boundary to the host build tool.
//!
//! Resolution never talks to the host directly. It hands registrations to a
//! [`DependencyRegistrar`] and interop intents to a [`NativeCompilationModel`].
//! [`RecordingRegistrar`] implements both by keeping everything in memory,
//! which is what the CLI renders and what tests assert on.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::core::interop::InteropIntent;

/// What a registration points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Notation {
    /// A published artifact coordinate
    Module(String),
    /// A sibling project, by path without the leading `:`
    Project(String),
}

impl Notation {
    pub fn as_str(&self) -> &str {
        match self {
            Notation::Module(s) | Notation::Project(s) => s,
        }
    }
}

impl fmt::Display for Notation {
    /// Build-script form: a quoted coordinate or a `project(...)` call.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Module(coordinate) => f.write_str(&script_string(coordinate)),
            Notation::Project(path) => write!(f, "project({})", script_string(&format!(":{}", path))),
        }
    }
}

/// Quote `s` as a build-script string literal.
///
/// Backslashes, quotes, `$` (string templates) and control characters are
/// escaped so any manifest value stays inside its literal.
pub fn script_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// One dependency registration: `notation` added to `configuration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub configuration: String,
    pub notation: Notation,
}

impl Registration {
    pub fn module(configuration: impl Into<String>, coordinate: impl Into<String>) -> Self {
        Registration {
            configuration: configuration.into(),
            notation: Notation::Module(coordinate.into()),
        }
    }

    pub fn project(configuration: impl Into<String>, path: impl Into<String>) -> Self {
        Registration {
            configuration: configuration.into(),
            notation: Notation::Project(path.into()),
        }
    }
}

/// Receives per-target dependency registrations.
pub trait DependencyRegistrar {
    fn add(&mut self, registration: Registration) -> Result<()>;
}

/// Receives interop attach intents for native compilations.
pub trait NativeCompilationModel {
    /// Attach the interop to the target's compilation, creating it if absent.
    fn attach_interop(&mut self, intent: &InteropIntent) -> Result<()>;
}

/// In-memory registrar and compilation model.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingRegistrar {
    pub registrations: Vec<Registration>,
    pub interops: Vec<InteropIntent>,
}

impl RecordingRegistrar {
    pub fn new() -> Self {
        RecordingRegistrar::default()
    }

    /// Notations registered under `configuration`, in order.
    pub fn notations_for(&self, configuration: &str) -> Vec<&str> {
        self.registrations
            .iter()
            .filter(|r| r.configuration == configuration)
            .map(|r| r.notation.as_str())
            .collect()
    }
}

impl DependencyRegistrar for RecordingRegistrar {
    fn add(&mut self, registration: Registration) -> Result<()> {
        self.registrations.push(registration);
        Ok(())
    }
}

impl NativeCompilationModel for RecordingRegistrar {
    fn attach_interop(&mut self, intent: &InteropIntent) -> Result<()> {
        let exists = self
            .interops
            .iter()
            .any(|i| i.interop == intent.interop && i.target == intent.target);
        if !exists {
            self.interops.push(intent.clone());
        }
        Ok(())
    }
}
