// src/config/mod.rs

//! Plan file loading and validation for dayplan.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a plan file from disk (`loader.rs`).
//! - Validate file-level invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_plan_path, load_and_validate, load_from_path, parse_str};
pub use model::{PlanFile, PlanSection, RawPlanFile, TaskConfig};
pub use validate::validate_plan;
