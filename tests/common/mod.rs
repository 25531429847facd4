#![allow(dead_code)]

pub use dayplan_test_utils::builders;
pub use dayplan_test_utils::{assert_respects_dependencies, init_tracing, with_timeout};
