pub mod builders;

use std::sync::Once;
use std::time::Duration;

use dayplan::schedule::Schedule;
use dayplan::types::DependencyMap;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a per-test tracing subscriber once per test binary.
///
/// Output goes through the test writer, so it only shows up for failing tests
/// (or with `-- --nocapture`). `RUST_LOG` overrides the default of
/// `dayplan=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,dayplan=debug"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Fail the test if `fut` takes longer than five seconds.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("test timed out after 5 seconds")
}

/// Assert that every task in `deps` sits on a strictly later day than each of
/// its prerequisites. `context` prefixes failure messages.
#[track_caller]
pub fn assert_respects_dependencies(schedule: &Schedule, deps: &DependencyMap, context: &str) {
    let days = schedule.assignments();
    for (task, prereqs) in deps.iter() {
        let Some(&task_day) = days.get(task) else {
            panic!("{context}: '{task}' is missing from the schedule");
        };
        for prereq in prereqs {
            let Some(&prereq_day) = days.get(prereq) else {
                panic!("{context}: prerequisite '{prereq}' is missing from the schedule");
            };
            assert!(
                prereq_day < task_day,
                "{context}: '{prereq}' (day {prereq_day}) must precede '{task}' (day {task_day})"
            );
        }
    }
}
