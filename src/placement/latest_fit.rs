// src/placement/latest_fit.rs

use std::collections::HashMap;

use tracing::trace;

use crate::dag::TaskOrder;
use crate::errors::{DayplanError, Result};
use crate::placement::{CapacityModel, DayLoads, Placement, PlacementStrategy, LATEST_FIT};

/// Walk the ordering back to front and put each task on the last day that is
/// before all of its dependents and still has capacity.
///
/// Work is pushed towards the end of the horizon; tasks nothing depends on
/// land on the final day when capacity allows.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestFit;

impl PlacementStrategy for LatestFit {
    fn name(&self) -> &'static str {
        LATEST_FIT
    }

    fn place(
        &self,
        order: &TaskOrder,
        num_days: usize,
        capacity: &CapacityModel,
    ) -> Result<Placement> {
        let dependents = order.dependents();
        let depths = order.chain_depths();
        let heights = order.chain_heights();

        let mut loads = DayLoads::new(num_days);
        let mut placement = Placement::with_capacity(order.len());
        let mut day_of: HashMap<&str, usize> = HashMap::with_capacity(order.len());

        for task in order.iter().rev() {
            capacity.admits(task)?;
            let name = task.name.as_str();

            let mut latest = num_days.checked_sub(1);
            for dependent in dependents.get(name).into_iter().flatten() {
                let day = day_of.get(dependent).copied().ok_or_else(|| {
                    DayplanError::InternalConsistency(format!(
                        "dependent '{dependent}' of '{name}' was not placed before it"
                    ))
                })?;
                latest = latest.min(day.checked_sub(1));
            }

            let chosen = latest.and_then(|latest| {
                (0..=latest)
                    .rev()
                    .find(|&d| loads.fits(d, capacity, task.effort))
            });

            let Some(day) = chosen else {
                let through = depths.get(name).copied().unwrap_or(1)
                    + heights.get(name).copied().unwrap_or(1)
                    - 1;
                return Err(DayplanError::HorizonExceeded {
                    task: task.name.clone(),
                    required: through.max(num_days + 1),
                    available: num_days,
                });
            };

            trace!(task = %name, day, "latest-fit placed task");
            loads.add(day, task.effort);
            day_of.insert(name, day);
            placement.assign(name, day)?;
        }

        Ok(placement)
    }
}
