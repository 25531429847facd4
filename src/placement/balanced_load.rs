// src/placement/balanced_load.rs

use tracing::trace;

use crate::dag::TaskOrder;
use crate::errors::{DayplanError, Result};
use crate::placement::{
    earliest_start, CapacityModel, DayLoads, Placement, PlacementStrategy, BALANCED_LOAD,
};

/// Spread effort across the horizon.
///
/// Each task may use any day from one past its latest prerequisite up to the
/// last day that still leaves room for its longest chain of dependents. Within
/// that window it goes to the day with the least effort so far, then the
/// fewest tasks, then the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedLoad;

impl PlacementStrategy for BalancedLoad {
    fn name(&self) -> &'static str {
        BALANCED_LOAD
    }

    fn place(
        &self,
        order: &TaskOrder,
        num_days: usize,
        capacity: &CapacityModel,
    ) -> Result<Placement> {
        let heights = order.chain_heights();

        let mut loads = DayLoads::new(num_days);
        let mut placement = Placement::with_capacity(order.len());

        for task in order {
            capacity.admits(task)?;
            let earliest = earliest_start(task, &placement)?;
            let tail = heights.get(task.name.as_str()).copied().unwrap_or(1);

            // Last usable day is `num_days - tail`; the window end is exclusive.
            let window_end = (num_days + 1).saturating_sub(tail);
            if earliest >= window_end {
                return Err(DayplanError::HorizonExceeded {
                    task: task.name.clone(),
                    required: earliest + tail,
                    available: num_days,
                });
            }

            let chosen = (earliest..window_end)
                .filter(|&d| loads.fits(d, capacity, task.effort))
                .min_by_key(|&d| {
                    let load = loads.get(d).copied().unwrap_or_default();
                    (load.effort, load.tasks, d)
                });

            let Some(day) = chosen else {
                return Err(DayplanError::HorizonExceeded {
                    task: task.name.clone(),
                    required: num_days + 1,
                    available: num_days,
                });
            };

            trace!(task = %task.name, day, earliest, window_end, "balanced-load placed task");
            loads.add(day, task.effort);
            placement.assign(&task.name, day)?;
        }

        Ok(placement)
    }
}
