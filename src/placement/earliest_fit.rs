// src/placement/earliest_fit.rs

use tracing::trace;

use crate::dag::TaskOrder;
use crate::errors::{DayplanError, Result};
use crate::placement::{
    earliest_start, CapacityModel, DayLoads, Placement, PlacementStrategy, EARLIEST_FIT,
};

/// Walk the ordering front to back and put each task on the first day that is
/// after all of its prerequisites and still has capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarliestFit;

impl PlacementStrategy for EarliestFit {
    fn name(&self) -> &'static str {
        EARLIEST_FIT
    }

    fn place(
        &self,
        order: &TaskOrder,
        num_days: usize,
        capacity: &CapacityModel,
    ) -> Result<Placement> {
        let mut loads = DayLoads::new(num_days);
        let mut placement = Placement::with_capacity(order.len());

        for task in order {
            capacity.admits(task)?;
            let earliest = earliest_start(task, &placement)?;

            let Some(day) = (earliest..num_days).find(|&d| loads.fits(d, capacity, task.effort))
            else {
                // Days past the horizon are empty, so the task would fit on
                // the first of them (or on `earliest` if that is later).
                return Err(DayplanError::HorizonExceeded {
                    task: task.name.clone(),
                    required: earliest.max(num_days) + 1,
                    available: num_days,
                });
            };

            trace!(task = %task.name, day, earliest, "earliest-fit placed task");
            loads.add(day, task.effort);
            placement.assign(&task.name, day)?;
        }

        Ok(placement)
    }
}
