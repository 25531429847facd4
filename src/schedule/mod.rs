// src/schedule/mod.rs

//! The schedule artifact and the builder that produces it.

pub mod builder;
pub mod model;

pub use builder::{ScheduleBuilder, ScheduleRequest, MAX_HORIZON_DAYS};
pub use model::{Day, Schedule};
