// src/placement/capacity.rs

//! Per-day capacity limits and running load bookkeeping.

use serde::{Deserialize, Serialize};

use crate::dag::OrderedTask;
use crate::errors::{DayplanError, Result};

/// Limits applied to every day of the horizon. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityModel {
    #[serde(default)]
    pub max_tasks_per_day: Option<usize>,
    #[serde(default)]
    pub max_effort_per_day: Option<u32>,
}

impl CapacityModel {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_tasks_per_day(mut self, max: usize) -> Self {
        self.max_tasks_per_day = Some(max);
        self
    }

    pub fn with_max_effort_per_day(mut self, max: u32) -> Self {
        self.max_effort_per_day = Some(max);
        self
    }

    /// Reject limits that no day could ever satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.max_tasks_per_day == Some(0) {
            return Err(DayplanError::InvalidCapacity(
                "max_tasks_per_day must be >= 1 (got 0)".to_string(),
            ));
        }
        if self.max_effort_per_day == Some(0) {
            return Err(DayplanError::InvalidCapacity(
                "max_effort_per_day must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `task` fits on an otherwise empty day.
    ///
    /// A task that fails this check cannot be placed under any horizon.
    pub fn admits(&self, task: &OrderedTask) -> Result<()> {
        match self.max_effort_per_day {
            Some(capacity) if task.effort > capacity => Err(DayplanError::TaskExceedsCapacity {
                task: task.name.clone(),
                effort: task.effort,
                capacity,
            }),
            _ => Ok(()),
        }
    }

    /// Whether one more task of `effort` fits on a day carrying `load`.
    pub fn fits(&self, load: &DayLoad, effort: u32) -> bool {
        let tasks_ok = self
            .max_tasks_per_day
            .is_none_or(|max| load.tasks < max);
        let effort_ok = self
            .max_effort_per_day
            .is_none_or(|max| load.effort + u64::from(effort) <= u64::from(max));
        tasks_ok && effort_ok
    }
}

/// What has been placed on one day so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayLoad {
    pub tasks: usize,
    pub effort: u64,
}

/// Running loads for every day of a horizon.
#[derive(Debug, Clone)]
pub struct DayLoads {
    days: Vec<DayLoad>,
}

impl DayLoads {
    pub fn new(num_days: usize) -> Self {
        Self {
            days: vec![DayLoad::default(); num_days],
        }
    }

    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    pub fn get(&self, day: usize) -> Option<&DayLoad> {
        self.days.get(day)
    }

    /// Days outside the horizon never fit.
    pub fn fits(&self, day: usize, capacity: &CapacityModel, effort: u32) -> bool {
        self.days
            .get(day)
            .is_some_and(|load| capacity.fits(load, effort))
    }

    pub fn add(&mut self, day: usize, effort: u32) {
        if let Some(load) = self.days.get_mut(day) {
            load.tasks += 1;
            load.effort += u64::from(effort);
        }
    }
}
