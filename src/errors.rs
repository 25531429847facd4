// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every pipeline stage reports failures through [`DayplanError`]. Variants
//! carry the offending entity as structured fields so that callers (the CLI,
//! the service layer) can translate them without parsing messages.

use thiserror::Error;

use crate::schedule::MAX_HORIZON_DAYS;
use crate::types::TaskName;

#[derive(Error, Debug)]
pub enum DayplanError {
    /// A dependency list names a task that is not part of the task set.
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownTask { task: TaskName, dependency: TaskName },

    /// The dependency graph contains at least one cycle; `cycle` is a witness.
    #[error("cycle detected in dependency graph: {}", format_cycle(.cycle))]
    Cycle { cycle: Vec<TaskName> },

    /// A stage broke one of its own post-conditions. Always a bug.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    #[error("horizon must be between 1 and {} days (got {days})", MAX_HORIZON_DAYS)]
    InvalidHorizon { days: i64 },

    #[error("unknown placement strategy '{0}'")]
    UnknownStrategy(String),

    #[error("task '{task}' does not fit in the horizon: needs {required} days, only {available} available")]
    HorizonExceeded {
        task: TaskName,
        required: usize,
        available: usize,
    },

    #[error("task '{0}' appears more than once in the task set")]
    DuplicateTask(TaskName),

    #[error("task '{task}' has effort {effort}, more than the per-day capacity of {capacity}")]
    TaskExceedsCapacity {
        task: TaskName,
        effort: u32,
        capacity: u32,
    },

    #[error("invalid capacity model: {0}")]
    InvalidCapacity(String),

    #[error("schedule {0} not found")]
    ScheduleNotFound(u64),

    #[error("principal '{principal}' is not allowed to {action}")]
    Unauthorized { principal: String, action: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Stable discriminant for [`DayplanError`], used by callers that map
/// failures to status codes or user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownTask,
    Cycle,
    InternalConsistency,
    InvalidHorizon,
    UnknownStrategy,
    HorizonExceeded,
    DuplicateTask,
    TaskExceedsCapacity,
    InvalidCapacity,
    ScheduleNotFound,
    Unauthorized,
    Config,
    Io,
}

impl DayplanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DayplanError::UnknownTask { .. } => ErrorKind::UnknownTask,
            DayplanError::Cycle { .. } => ErrorKind::Cycle,
            DayplanError::InternalConsistency(_) => ErrorKind::InternalConsistency,
            DayplanError::InvalidHorizon { .. } => ErrorKind::InvalidHorizon,
            DayplanError::UnknownStrategy(_) => ErrorKind::UnknownStrategy,
            DayplanError::HorizonExceeded { .. } => ErrorKind::HorizonExceeded,
            DayplanError::DuplicateTask(_) => ErrorKind::DuplicateTask,
            DayplanError::TaskExceedsCapacity { .. } => ErrorKind::TaskExceedsCapacity,
            DayplanError::InvalidCapacity(_) => ErrorKind::InvalidCapacity,
            DayplanError::ScheduleNotFound(_) => ErrorKind::ScheduleNotFound,
            DayplanError::Unauthorized { .. } => ErrorKind::Unauthorized,
            DayplanError::ConfigError(_) | DayplanError::TomlError(_) => ErrorKind::Config,
            DayplanError::IoError(_) => ErrorKind::Io,
        }
    }
}

fn format_cycle(cycle: &[TaskName]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(|s| s.as_str()).collect();
    // Close the loop so "A -> B -> A" reads as a cycle.
    if let Some(first) = cycle.first() {
        parts.push(first.as_str());
    }
    parts.join(" -> ")
}

pub type Result<T> = std::result::Result<T, DayplanError>;
