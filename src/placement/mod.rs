// src/placement/mod.rs

//! Placement strategies: turning a validated ordering into day indices.
//!
//! Strategies see only the [`TaskOrder`] (which carries each task's validated
//! prerequisites) and a [`CapacityModel`]. They never touch the raw dependency
//! map, so adding one does not affect graph building or ordering.
//!
//! Every strategy enforces the same dependency rule: a task lands on a day
//! strictly after the days of all of its prerequisites.

pub mod balanced_load;
pub mod capacity;
pub mod earliest_fit;
pub mod latest_fit;
pub mod registry;

use std::collections::HashMap;
use std::fmt::Debug;

use crate::dag::{OrderedTask, TaskOrder};
use crate::errors::{DayplanError, Result};
use crate::types::TaskName;

pub use balanced_load::BalancedLoad;
pub use capacity::{CapacityModel, DayLoad, DayLoads};
pub use earliest_fit::EarliestFit;
pub use latest_fit::LatestFit;
pub use registry::StrategyRegistry;

pub const EARLIEST_FIT: &str = "earliest-fit";
pub const LATEST_FIT: &str = "latest-fit";
pub const BALANCED_LOAD: &str = "balanced-load";

/// Strategy used when a caller does not name one explicitly.
pub const DEFAULT_STRATEGY: &str = EARLIEST_FIT;

/// A policy that assigns every task of an ordering to a day in `[0, num_days)`.
///
/// Implementations must be deterministic: identical inputs always produce an
/// identical [`Placement`].
pub trait PlacementStrategy: Send + Sync + Debug {
    /// Identifier under which the strategy is normally registered.
    fn name(&self) -> &'static str;

    fn place(
        &self,
        order: &TaskOrder,
        num_days: usize,
        capacity: &CapacityModel,
    ) -> Result<Placement>;
}

/// One task → day decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedTask {
    pub name: TaskName,
    pub day: usize,
}

/// Task → day mapping, remembering the order in which tasks were placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    placed: Vec<PlacedTask>,
    index: HashMap<TaskName, usize>,
}

impl Placement {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            placed: Vec::with_capacity(n),
            index: HashMap::with_capacity(n),
        }
    }

    /// Record a decision. Placing the same task twice is a strategy bug.
    pub fn assign(&mut self, name: &str, day: usize) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(DayplanError::InternalConsistency(format!(
                "task '{name}' placed twice"
            )));
        }
        self.index.insert(name.to_string(), self.placed.len());
        self.placed.push(PlacedTask {
            name: name.to_string(),
            day,
        });
        Ok(())
    }

    pub fn day_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|&i| self.placed[i].day)
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Decisions in the order they were made.
    pub fn iter(&self) -> std::slice::Iter<'_, PlacedTask> {
        self.placed.iter()
    }
}

/// First day `task` may use: one past the latest prerequisite day.
///
/// Fails if a prerequisite has not been placed yet, which would mean the
/// ordering handed to the strategy was not topological.
pub(crate) fn earliest_start(task: &OrderedTask, placement: &Placement) -> Result<usize> {
    let mut earliest = 0;
    for prereq in task.prerequisites.iter() {
        let day = placement.day_of(prereq).ok_or_else(|| {
            DayplanError::InternalConsistency(format!(
                "prerequisite '{prereq}' of '{}' was not placed before it",
                task.name
            ))
        })?;
        earliest = earliest.max(day + 1);
    }
    Ok(earliest)
}
