// tests/schedule_builder.rs
mod common;
use crate::common::builders::{deps, diamond, tasks};
use crate::common::init_tracing;

use dayplan::dag::TaskOrder;
use dayplan::errors::{DayplanError, ErrorKind, Result};
use dayplan::placement::{
    CapacityModel, EarliestFit, Placement, PlacementStrategy, StrategyRegistry,
};
use dayplan::schedule::{ScheduleBuilder, ScheduleRequest, MAX_HORIZON_DAYS};
use dayplan::types::DependencyMap;

#[test]
fn zero_or_negative_horizon_is_invalid() {
    init_tracing();
    let (tasks, map) = diamond();

    for days in [0, -1, -30] {
        match ScheduleBuilder::new().build(&tasks, &map, days, "earliest-fit") {
            Err(DayplanError::InvalidHorizon { days: got }) => assert_eq!(got, days),
            other => panic!("Expected InvalidHorizon, got: {:?}", other),
        }
    }
}

#[test]
fn horizon_above_the_maximum_is_invalid() {
    let single = tasks(&["A"]);
    let none = DependencyMap::new();

    for days in [MAX_HORIZON_DAYS + 1, i64::MAX] {
        for strategy in ["earliest-fit", "latest-fit", "balanced-load"] {
            match ScheduleBuilder::new().build(&single, &none, days, strategy) {
                Err(DayplanError::InvalidHorizon { days: got }) => assert_eq!(got, days),
                other => panic!("Expected InvalidHorizon, got: {:?}", other),
            }
        }
    }

    let err = ScheduleBuilder::new()
        .build(&single, &none, i64::MAX, "earliest-fit")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("horizon must be between 1 and {MAX_HORIZON_DAYS} days (got {})", i64::MAX)
    );
}

#[test]
fn maximum_horizon_is_accepted() {
    let schedule = ScheduleBuilder::new()
        .build(&tasks(&["A"]), &DependencyMap::new(), MAX_HORIZON_DAYS, "latest-fit")
        .unwrap();

    let last = usize::try_from(MAX_HORIZON_DAYS).unwrap() - 1;
    assert_eq!(schedule.num_days(), last + 1);
    assert_eq!(schedule.day_of("A"), Some(last));
}

#[test]
fn unknown_strategy_never_falls_back() {
    let (tasks, map) = diamond();

    match ScheduleBuilder::new().build(&tasks, &map, 3, "fastest-possible") {
        Err(DayplanError::UnknownStrategy(name)) => assert_eq!(name, "fastest-possible"),
        other => panic!("Expected UnknownStrategy, got: {:?}", other),
    }
}

#[test]
fn strategy_names_ignore_case_and_padding() {
    let (tasks, map) = diamond();
    let schedule = ScheduleBuilder::new()
        .build(&tasks, &map, 3, "  Earliest-Fit ")
        .unwrap();
    assert_eq!(schedule.strategy, "earliest-fit");
}

#[test]
fn first_failing_stage_wins() {
    let cyclic = deps(&[("A", &["B"]), ("B", &["A"])]);
    let ab = tasks(&["A", "B"]);
    let builder = ScheduleBuilder::new();

    // Horizon is checked before the strategy.
    let err = builder.build(&ab, &cyclic, 0, "nope").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHorizon);

    // Strategy is resolved before the graph is built.
    let err = builder.build(&ab, &cyclic, 3, "nope").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownStrategy);

    let err = builder.build(&ab, &cyclic, 3, "earliest-fit").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cycle);
}

#[test]
fn cyclic_map_never_yields_a_schedule() {
    let ab = tasks(&["A", "B"]);
    let cyclic = deps(&[("A", &["B"]), ("B", &["A"])]);

    for strategy in ["earliest-fit", "latest-fit", "balanced-load"] {
        match ScheduleBuilder::new().build(&ab, &cyclic, 10, strategy) {
            Err(DayplanError::Cycle { cycle }) => assert_eq!(cycle, vec!["A", "B"]),
            other => panic!("Expected Cycle, got: {:?}", other),
        }
    }
}

#[test]
fn zero_capacity_is_rejected() {
    let builder =
        ScheduleBuilder::new().with_capacity(CapacityModel::unlimited().with_max_tasks_per_day(0));

    let err = builder
        .build(&tasks(&["A"]), &DependencyMap::new(), 3, "earliest-fit")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCapacity);
}

#[test]
fn schedule_has_exactly_num_days_slots() {
    let (tasks, map) = diamond();
    let schedule = ScheduleBuilder::new()
        .build(&tasks, &map, 7, "earliest-fit")
        .unwrap();

    assert_eq!(schedule.num_days(), 7);
    assert_eq!(schedule.task_count(), 4);
    assert_eq!(schedule.last_busy_day(), Some(2));
    assert!(schedule.tasks_on(6).is_empty());
    assert!(schedule.tasks_on(99).is_empty());
    assert_eq!(schedule.day(2).map(|d| d.tasks.clone()), Some(vec!["A".to_string()]));
    assert!(schedule.day(7).is_none());
    for (i, day) in schedule.days.iter().enumerate() {
        assert_eq!(day.index, i);
    }
}

#[test]
fn empty_task_set_yields_empty_days() {
    let schedule = ScheduleBuilder::new()
        .build(&[], &DependencyMap::new(), 2, "earliest-fit")
        .unwrap();

    assert_eq!(schedule.num_days(), 2);
    assert_eq!(schedule.task_count(), 0);
    assert_eq!(schedule.last_busy_day(), None);
}

#[test]
fn identical_inputs_give_identical_output() {
    let (tasks, map) = diamond();
    let builder = ScheduleBuilder::new();

    for strategy in ["earliest-fit", "latest-fit", "balanced-load"] {
        let first = builder.build(&tasks, &map, 4, strategy).unwrap();
        let second = builder.build(&tasks, &map, 4, strategy).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn rebuilding_with_attached_dependencies_uses_the_same_pipeline() {
    init_tracing();
    let (tasks, map) = diamond();
    let builder = ScheduleBuilder::new();

    let initial = builder
        .build(&tasks, &DependencyMap::new(), 3, "earliest-fit")
        .unwrap();
    assert_eq!(initial.tasks_on(0), ["A", "B", "C", "D"]);

    let attached = builder.build(&tasks, &map, 3, "earliest-fit").unwrap();
    assert_eq!(attached.day_of("A"), Some(2));

    // Building again from scratch gives the same result as the attached one.
    let fresh = ScheduleBuilder::new()
        .build(&tasks, &map, 3, "earliest-fit")
        .unwrap();
    assert_eq!(attached, fresh);
}

#[test]
fn request_value_builds_like_the_argument_form() {
    let (tasks, map) = diamond();
    let request: ScheduleRequest = serde_json::from_str(
        r#"{
            "tasks": [{"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}],
            "dependencies": {"A": ["B", "C"], "B": ["D"], "C": ["D"]},
            "num_days": 3
        }"#,
    )
    .unwrap();

    assert_eq!(request.strategy, "earliest-fit");
    let builder = ScheduleBuilder::new();
    assert_eq!(
        builder.build_request(&request).unwrap(),
        builder.build(&tasks, &map, 3, "earliest-fit").unwrap()
    );
}

/// Puts the n-th task of the ordering on day n.
#[derive(Debug)]
struct OnePerDay;

impl PlacementStrategy for OnePerDay {
    fn name(&self) -> &'static str {
        "one-per-day"
    }

    fn place(
        &self,
        order: &TaskOrder,
        num_days: usize,
        _capacity: &CapacityModel,
    ) -> Result<Placement> {
        let mut placement = Placement::with_capacity(order.len());
        for (day, task) in order.iter().enumerate() {
            if day >= num_days {
                return Err(DayplanError::HorizonExceeded {
                    task: task.name.clone(),
                    required: order.len(),
                    available: num_days,
                });
            }
            placement.assign(&task.name, day)?;
        }
        Ok(placement)
    }
}

#[test]
fn registry_accepts_new_strategies() {
    let mut registry = StrategyRegistry::with_defaults();
    registry.register("one-per-day", || Box::new(OnePerDay));
    registry.register("asap", || Box::new(EarliestFit));

    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["asap", "balanced-load", "earliest-fit", "latest-fit", "one-per-day"]
    );

    let builder = ScheduleBuilder::new().with_registry(registry);
    let (tasks, map) = diamond();

    let schedule = builder.build(&tasks, &map, 4, "one-per-day").unwrap();
    assert_eq!(schedule.strategy, "one-per-day");
    assert_eq!(schedule.tasks_on(0), ["D"]);
    assert_eq!(schedule.tasks_on(1), ["B"]);
    assert_eq!(schedule.tasks_on(2), ["C"]);
    assert_eq!(schedule.tasks_on(3), ["A"]);

    let schedule = builder.build(&tasks, &map, 3, "asap").unwrap();
    assert_eq!(schedule.strategy, "earliest-fit");
}

#[test]
fn empty_registry_knows_nothing() {
    let builder = ScheduleBuilder::new().with_registry(StrategyRegistry::empty());
    let err = builder
        .build(&tasks(&["A"]), &DependencyMap::new(), 1, "earliest-fit")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownStrategy);
}
