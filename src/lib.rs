// src/lib.rs

//! Dependency-aware day planner.
//!
//! Given a set of tasks, a prerequisite map, a horizon in days and the name
//! of a placement strategy, [`ScheduleBuilder`](schedule::ScheduleBuilder)
//! produces a deterministic day-by-day [`Schedule`](schedule::Schedule) or a
//! structured [`DayplanError`](errors::DayplanError).

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod placement;
pub mod schedule;
pub mod service;
pub mod types;

use std::fmt::Write as _;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{CliArgs, OutputFormat};
use crate::config::loader::{default_plan_path, load_and_validate};
use crate::config::model::PlanFile;
use crate::dag::TaskOrder;
use crate::schedule::Schedule;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plan file loading
/// - CLI overrides for horizon and strategy
/// - the scheduling pipeline
/// - rendering to stdout
pub fn run(args: CliArgs) -> Result<()> {
    let plan_path = args.config.clone().unwrap_or_else(default_plan_path);
    let plan = load_and_validate(&plan_path)?;

    let builder = plan.schedule_builder();
    let tasks = plan.tasks();
    let dependencies = plan.dependencies();

    if args.dry_run {
        let order = builder.order(&tasks, &dependencies)?;
        print!("{}", render_dry_run(&plan, &order));
        debug!("dry-run complete (no placement)");
        return Ok(());
    }

    let days = args.days.unwrap_or(plan.config.days);
    let strategy = args
        .strategy
        .clone()
        .unwrap_or_else(|| plan.config.strategy.clone());

    info!(path = ?plan_path, days, strategy = %strategy, "scheduling plan");

    let schedule = builder.build(&tasks, &dependencies, days, &strategy)?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&plan, &schedule)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schedule)?),
    }

    Ok(())
}

/// Human-readable schedule: one line per day.
pub fn render_text(plan: &PlanFile, schedule: &Schedule) -> String {
    let mut out = String::new();
    let title = plan.config.title.as_deref().unwrap_or("dayplan");
    let _ = writeln!(
        out,
        "{title} ({} days, {})",
        schedule.num_days(),
        schedule.strategy
    );
    for day in schedule.days.iter() {
        if day.tasks.is_empty() {
            let _ = writeln!(out, "  day {}: -", day.index);
        } else {
            let _ = writeln!(out, "  day {}: {}", day.index, day.tasks.join(", "));
        }
    }
    out
}

/// Dry-run output: settings, tasks with prerequisites, and the order.
pub fn render_dry_run(plan: &PlanFile, order: &TaskOrder) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "dayplan dry-run");
    let _ = writeln!(out, "  config.days = {}", plan.config.days);
    let _ = writeln!(out, "  config.strategy = {}", plan.config.strategy);
    let _ = writeln!(out, "  config.tie_break = {:?}", plan.config.tie_break);
    if let Some(max) = plan.config.max_tasks_per_day {
        let _ = writeln!(out, "  config.max_tasks_per_day = {max}");
    }
    if let Some(max) = plan.config.max_effort_per_day {
        let _ = writeln!(out, "  config.max_effort_per_day = {max}");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "tasks ({}):", plan.task.len());
    for (name, task) in plan.task.iter() {
        let _ = writeln!(out, "  - {name}");
        if let Some(effort) = task.effort {
            let _ = writeln!(out, "      effort: {effort}");
        }
        if task.done {
            let _ = writeln!(out, "      done: true");
        }
        if !task.after.is_empty() {
            let _ = writeln!(out, "      after: {:?}", task.after);
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "order: {}", order.names().join(" -> "));
    let _ = writeln!(out, "minimum days: {}", order.critical_path_len());
    out
}
