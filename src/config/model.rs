// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::placement::{CapacityModel, DEFAULT_STRATEGY};
use crate::schedule::ScheduleBuilder;
use crate::types::{DependencyMap, Task, TieBreak};

/// Plan file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// title = "Release"
/// days = 5
/// strategy = "earliest-fit"
/// max_tasks_per_day = 3
///
/// [task.research]
/// effort = 2
///
/// [task.design]
/// after = ["research"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlanFile {
    /// Horizon, strategy and capacity from `[config]`.
    #[serde(default)]
    pub config: PlanSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// A plan file that passed [`validate_plan`](crate::config::validate_plan).
///
/// Only constructible through `TryFrom<RawPlanFile>`.
#[derive(Debug, Clone)]
pub struct PlanFile {
    pub config: PlanSection,
    pub task: BTreeMap<String, TaskConfig>,
}

impl PlanFile {
    pub(crate) fn new_unchecked(config: PlanSection, task: BTreeMap<String, TaskConfig>) -> Self {
        Self { config, task }
    }

    /// Task records in key order.
    pub fn tasks(&self) -> Vec<Task> {
        self.task
            .iter()
            .map(|(name, tc)| Task {
                name: name.clone(),
                effort: tc.effort,
                done: tc.done,
            })
            .collect()
    }

    /// Dependency map built from every task's `after` list.
    pub fn dependencies(&self) -> DependencyMap {
        self.task
            .iter()
            .filter(|(_, tc)| !tc.after.is_empty())
            .map(|(name, tc)| (name.clone(), tc.after.clone()))
            .collect()
    }

    pub fn capacity(&self) -> CapacityModel {
        CapacityModel {
            max_tasks_per_day: self.config.max_tasks_per_day,
            max_effort_per_day: self.config.max_effort_per_day,
        }
    }

    /// A builder carrying this plan's capacity and tie-break settings.
    pub fn schedule_builder(&self) -> ScheduleBuilder {
        ScheduleBuilder::new()
            .with_capacity(self.capacity())
            .with_tie_break(self.config.tie_break)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanSection {
    /// Free-form title, only used for display.
    #[serde(default)]
    pub title: Option<String>,

    /// Horizon length in days. Checked by the scheduler, not here, so a
    /// non-positive value surfaces as the usual horizon error.
    #[serde(default = "default_days")]
    pub days: i64,

    /// Placement strategy identifier.
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// `"name"` (default) or `"input-order"`.
    #[serde(default)]
    pub tie_break: TieBreak,

    #[serde(default)]
    pub max_tasks_per_day: Option<usize>,

    #[serde(default)]
    pub max_effort_per_day: Option<u32>,
}

fn default_days() -> i64 {
    7
}

fn default_strategy() -> String {
    DEFAULT_STRATEGY.to_string()
}

impl Default for PlanSection {
    fn default() -> Self {
        Self {
            title: None,
            days: default_days(),
            strategy: default_strategy(),
            tie_break: TieBreak::default(),
            max_tasks_per_day: None,
            max_effort_per_day: None,
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskConfig {
    /// Estimated effort; counts as 1 against effort limits when omitted.
    #[serde(default)]
    pub effort: Option<u32>,

    /// Completion flag. Carried through, never used for placement.
    #[serde(default)]
    pub done: bool,

    /// Prerequisites: this task goes on a later day than each of these.
    #[serde(default)]
    pub after: Vec<String>,
}
