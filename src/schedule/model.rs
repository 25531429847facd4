// src/schedule/model.rs

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::errors::{DayplanError, Result};
use crate::placement::Placement;
use crate::types::{Task, TaskName};

/// One day of the horizon and the tasks placed on it, in placement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub index: usize,
    pub tasks: Vec<TaskName>,
}

/// Final day-by-day assignment for one horizon.
///
/// A `Schedule` is only ever produced when every input task sits on exactly
/// one day inside the horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Identifier of the strategy that produced the placement.
    pub strategy: String,
    pub days: Vec<Day>,
}

impl Schedule {
    /// Lay a placement out as day slots and check coverage.
    pub(crate) fn assemble(
        strategy: &str,
        num_days: usize,
        tasks: &[Task],
        placement: &Placement,
    ) -> Result<Self> {
        let mut days: Vec<Day> = (0..num_days)
            .map(|index| Day {
                index,
                tasks: Vec::new(),
            })
            .collect();

        let mut seen: HashSet<&str> = HashSet::with_capacity(placement.len());
        for placed in placement.iter() {
            if !seen.insert(placed.name.as_str()) {
                return Err(DayplanError::InternalConsistency(format!(
                    "task '{}' placed more than once",
                    placed.name
                )));
            }
            let slot = days.get_mut(placed.day).ok_or_else(|| {
                DayplanError::InternalConsistency(format!(
                    "task '{}' placed on day {} outside a {}-day horizon",
                    placed.name, placed.day, num_days
                ))
            })?;
            slot.tasks.push(placed.name.clone());
        }

        if let Some(missing) = tasks.iter().find(|t| !seen.contains(t.name.as_str())) {
            return Err(DayplanError::InternalConsistency(format!(
                "task '{}' was never placed",
                missing.name
            )));
        }
        if seen.len() != tasks.len() {
            return Err(DayplanError::InternalConsistency(format!(
                "placement holds {} tasks but {} were requested",
                seen.len(),
                tasks.len()
            )));
        }

        Ok(Self {
            strategy: strategy.to_string(),
            days,
        })
    }

    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    /// Tasks placed on `index`, or an empty slice outside the horizon.
    pub fn tasks_on(&self, index: usize) -> &[TaskName] {
        self.days
            .get(index)
            .map(|d| d.tasks.as_slice())
            .unwrap_or(&[])
    }

    pub fn day_of(&self, task: &str) -> Option<usize> {
        self.days
            .iter()
            .find(|d| d.tasks.iter().any(|t| t == task))
            .map(|d| d.index)
    }

    pub fn task_count(&self) -> usize {
        self.days.iter().map(|d| d.tasks.len()).sum()
    }

    /// Task → day, keyed by name.
    pub fn assignments(&self) -> BTreeMap<TaskName, usize> {
        self.days
            .iter()
            .flat_map(|d| d.tasks.iter().map(move |t| (t.clone(), d.index)))
            .collect()
    }

    /// Index of the last day that holds any task.
    pub fn last_busy_day(&self) -> Option<usize> {
        self.days
            .iter()
            .rev()
            .find(|d| !d.tasks.is_empty())
            .map(|d| d.index)
    }
}
