// src/schedule/builder.rs

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dag::{self, DependencyGraph, TaskOrder};
use crate::errors::{DayplanError, Result};
use crate::placement::{CapacityModel, StrategyRegistry, DEFAULT_STRATEGY};
use crate::schedule::model::Schedule;
use crate::types::{DependencyMap, Task, TieBreak};

/// Longest horizon a build accepts: one hundred years of days.
///
/// Day slots and load counters are allocated per day up front, so larger
/// values are rejected as [`DayplanError::InvalidHorizon`] before any
/// allocation happens.
pub const MAX_HORIZON_DAYS: i64 = 36_525;

/// Everything one scheduling call needs, as a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub dependencies: DependencyMap,
    pub num_days: i64,
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

fn default_strategy() -> String {
    DEFAULT_STRATEGY.to_string()
}

/// Runs the scheduling pipeline:
///
/// 1. horizon check (`1..=MAX_HORIZON_DAYS`)
/// 2. strategy lookup
/// 3. capacity model check
/// 4. graph validation ([`DependencyGraph::build`])
/// 5. ordering ([`dag::order`])
/// 6. placement (the resolved strategy)
/// 7. assembly into a [`Schedule`]
///
/// The first failing stage ends the call and its error is returned as is.
/// Nothing is cached between calls: building again with an edited dependency
/// map goes through the same stages from scratch.
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    registry: StrategyRegistry,
    capacity: CapacityModel,
    tie_break: TieBreak,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_capacity(mut self, capacity: CapacityModel) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn capacity(&self) -> &CapacityModel {
        &self.capacity
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Build a schedule of `num_days` days using the strategy named `strategy`.
    pub fn build(
        &self,
        tasks: &[Task],
        dependencies: &DependencyMap,
        num_days: i64,
        strategy: &str,
    ) -> Result<Schedule> {
        let days = validate_horizon(num_days)?;
        let placer = self.registry.resolve(strategy)?;
        self.capacity.validate()?;

        debug!(
            tasks = tasks.len(),
            days,
            strategy = placer.name(),
            "building schedule"
        );

        let order = self.order(tasks, dependencies)?;
        let placement = placer.place(&order, days, &self.capacity)?;
        let schedule = Schedule::assemble(placer.name(), days, tasks, &placement)?;

        info!(
            tasks = schedule.task_count(),
            days,
            strategy = placer.name(),
            last_busy_day = ?schedule.last_busy_day(),
            "schedule built"
        );

        Ok(schedule)
    }

    pub fn build_request(&self, request: &ScheduleRequest) -> Result<Schedule> {
        self.build(
            &request.tasks,
            &request.dependencies,
            request.num_days,
            &request.strategy,
        )
    }

    /// Validate the graph and linearize it without placing anything.
    pub fn order(&self, tasks: &[Task], dependencies: &DependencyMap) -> Result<TaskOrder> {
        let graph = DependencyGraph::build(tasks, dependencies)?;
        dag::order(&graph, self.tie_break)
    }
}

fn validate_horizon(num_days: i64) -> Result<usize> {
    if !(1..=MAX_HORIZON_DAYS).contains(&num_days) {
        return Err(DayplanError::InvalidHorizon { days: num_days });
    }
    usize::try_from(num_days).map_err(|_| DayplanError::InvalidHorizon { days: num_days })
}
