// src/types.rs

//! Input records shared by every stage of the pipeline.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Task name → names of its direct prerequisites.
///
/// A task missing from the map has no prerequisites.
pub type DependencyMap = BTreeMap<TaskName, Vec<TaskName>>;

/// Effort assumed for a task that does not declare one.
pub const DEFAULT_EFFORT: u32 = 1;

/// One unit of work to be placed on a day.
///
/// The scheduler only ever reads tasks; `done` is carried along for callers
/// and never influences placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: TaskName,
    /// Estimated effort in abstract units (e.g. hours).
    #[serde(default)]
    pub effort: Option<u32>,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(name: impl Into<TaskName>) -> Self {
        Self {
            name: name.into(),
            effort: None,
            done: false,
        }
    }

    pub fn with_effort(mut self, effort: u32) -> Self {
        self.effort = Some(effort);
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Effort used for capacity accounting.
    pub fn effective_effort(&self) -> u32 {
        self.effort.unwrap_or(DEFAULT_EFFORT)
    }
}

/// Rule used to pick the next task when several are ready at once.
///
/// - `Name`: lexicographically smallest task name first (default).
/// - `InputOrder`: the task supplied earliest in the input first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    Name,
    InputOrder,
}

impl Default for TieBreak {
    fn default() -> Self {
        TieBreak::Name
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(TieBreak::Name),
            "input-order" | "input_order" => Ok(TieBreak::InputOrder),
            other => Err(format!(
                "invalid tie_break: {other} (expected \"name\" or \"input-order\")"
            )),
        }
    }
}
