#![allow(dead_code)]

use std::collections::BTreeMap;

use dayplan::config::{PlanFile, PlanSection, RawPlanFile, TaskConfig};
use dayplan::types::{DependencyMap, Task, TieBreak};

/// Builder for `PlanFile` to simplify test setup.
pub struct PlanFileBuilder {
    plan: RawPlanFile,
}

impl PlanFileBuilder {
    pub fn new() -> Self {
        Self {
            plan: RawPlanFile {
                config: PlanSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.plan.task.insert(name.to_string(), task);
        self
    }

    pub fn with_days(mut self, days: i64) -> Self {
        self.plan.config.days = days;
        self
    }

    pub fn with_strategy(mut self, strategy: &str) -> Self {
        self.plan.config.strategy = strategy.to_string();
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.plan.config.tie_break = tie_break;
        self
    }

    pub fn with_max_tasks_per_day(mut self, max: usize) -> Self {
        self.plan.config.max_tasks_per_day = Some(max);
        self
    }

    pub fn with_max_effort_per_day(mut self, max: u32) -> Self {
        self.plan.config.max_effort_per_day = Some(max);
        self
    }

    pub fn raw(self) -> RawPlanFile {
        self.plan
    }

    pub fn build(self) -> PlanFile {
        PlanFile::try_from(self.plan).expect("Failed to build valid plan from builder")
    }
}

impl Default for PlanFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new() -> Self {
        Self {
            task: TaskConfig::default(),
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn effort(mut self, effort: u32) -> Self {
        self.task.effort = Some(effort);
        self
    }

    pub fn done(mut self, val: bool) -> Self {
        self.task.done = val;
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}

impl Default for TaskConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Tasks with default effort, in the given order.
pub fn tasks(names: &[&str]) -> Vec<Task> {
    names.iter().map(|n| Task::new(*n)).collect()
}

/// Dependency map from `(task, [prerequisites])` pairs.
pub fn deps(entries: &[(&str, &[&str])]) -> DependencyMap {
    entries
        .iter()
        .map(|(task, prereqs)| {
            (
                task.to_string(),
                prereqs.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}

/// The four-task diamond used throughout the tests:
/// `A` after `B` and `C`, both of which come after `D`.
pub fn diamond() -> (Vec<Task>, DependencyMap) {
    (
        tasks(&["A", "B", "C", "D"]),
        deps(&[("A", &["B", "C"]), ("B", &["D"]), ("C", &["D"]), ("D", &[])]),
    )
}
