// src/config/validate.rs

use crate::config::model::{PlanFile, RawPlanFile};
use crate::errors::{DayplanError, Result};

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = DayplanError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        validate_plan(&raw)?;
        Ok(PlanFile::new_unchecked(raw.config, raw.task))
    }
}

/// File-level checks.
///
/// Dependency references, cycles and the horizon are left to the scheduling
/// pipeline so that plan files fail with the same errors as any other input.
pub fn validate_plan(plan: &RawPlanFile) -> Result<()> {
    ensure_has_tasks(plan)?;
    validate_config_section(plan)?;
    Ok(())
}

fn ensure_has_tasks(plan: &RawPlanFile) -> Result<()> {
    if plan.task.is_empty() {
        return Err(DayplanError::ConfigError(
            "plan must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_config_section(plan: &RawPlanFile) -> Result<()> {
    if plan.config.max_tasks_per_day == Some(0) {
        return Err(DayplanError::ConfigError(
            "[config].max_tasks_per_day must be >= 1 (got 0)".to_string(),
        ));
    }

    if plan.config.max_effort_per_day == Some(0) {
        return Err(DayplanError::ConfigError(
            "[config].max_effort_per_day must be >= 1 (got 0)".to_string(),
        ));
    }

    if plan.config.strategy.trim().is_empty() {
        return Err(DayplanError::ConfigError(
            "[config].strategy must not be empty".to_string(),
        ));
    }

    Ok(())
}
