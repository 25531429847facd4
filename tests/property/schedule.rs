use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;

use dayplan::dag::{order, DependencyGraph};
use dayplan::errors::DayplanError;
use dayplan::placement::CapacityModel;
use dayplan::schedule::ScheduleBuilder;
use dayplan::types::{DependencyMap, Task, TieBreak};

// Strategy to generate a valid DAG.
// We ensure acyclicity by only allowing task N to depend on tasks 0..N-1.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = (Vec<Task>, DependencyMap)> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        );
        let effort_strat = proptest::collection::vec(1u32..4, num_tasks);

        (deps_strat, effort_strat).prop_map(move |(raw_deps, efforts)| {
            let tasks: Vec<Task> = efforts
                .iter()
                .enumerate()
                .map(|(i, e)| Task::new(format!("task_{i}")).with_effort(*e))
                .collect();

            let mut map = DependencyMap::new();
            for (i, potential) in raw_deps.into_iter().enumerate() {
                if i == 0 {
                    continue;
                }
                // Sanitize dependencies: only allow deps < i.
                let valid: BTreeSet<usize> = potential.into_iter().map(|d| d % i).collect();
                if !valid.is_empty() {
                    map.insert(
                        format!("task_{i}"),
                        valid.into_iter().map(|d| format!("task_{d}")).collect(),
                    );
                }
            }
            (tasks, map)
        })
    })
}

const STRATEGIES: [&str; 3] = ["earliest-fit", "latest-fit", "balanced-load"];

proptest! {
    #[test]
    fn ordering_places_prerequisites_first((tasks, map) in dag_strategy(12)) {
        let graph = DependencyGraph::build(&tasks, &map).unwrap();
        for tie_break in [TieBreak::Name, TieBreak::InputOrder] {
            let order = order(&graph, tie_break).unwrap();
            prop_assert_eq!(order.len(), tasks.len());
            for (task, prereqs) in map.iter() {
                let t = order.position_of(task).unwrap();
                for p in prereqs {
                    prop_assert!(order.position_of(p).unwrap() < t);
                }
            }
        }
    }

    #[test]
    fn schedules_cover_every_task_once_and_respect_dependencies(
        (tasks, map) in dag_strategy(12),
        slack in 0usize..3,
    ) {
        let graph = DependencyGraph::build(&tasks, &map).unwrap();
        let needed = order(&graph, TieBreak::Name).unwrap().critical_path_len();
        let days = (needed + slack) as i64;

        for strategy in STRATEGIES {
            let schedule = ScheduleBuilder::new().build(&tasks, &map, days, strategy).unwrap();
            prop_assert_eq!(schedule.num_days(), needed + slack);

            let mut seen = HashSet::new();
            for day in schedule.days.iter() {
                for t in day.tasks.iter() {
                    prop_assert!(seen.insert(t.clone()), "{} placed twice", t);
                }
            }
            let expected: HashSet<String> = tasks.iter().map(|t| t.name.clone()).collect();
            prop_assert_eq!(seen, expected);

            let a = schedule.assignments();
            for (task, prereqs) in map.iter() {
                for p in prereqs {
                    prop_assert!(a[p] < a[task], "{}: {} must precede {}", strategy, p, task);
                }
            }
        }
    }

    #[test]
    fn building_twice_is_byte_identical(
        (tasks, map) in dag_strategy(10),
        max_tasks in 1usize..4,
    ) {
        let builder = ScheduleBuilder::new()
            .with_capacity(CapacityModel::unlimited().with_max_tasks_per_day(max_tasks));
        let days = tasks.len() as i64;

        for strategy in STRATEGIES {
            let first = builder.build(&tasks, &map, days, strategy);
            let second = builder.build(&tasks, &map, days, strategy);
            match (first, second) {
                (Ok(a), Ok(b)) => prop_assert_eq!(
                    serde_json::to_string(&a).unwrap(),
                    serde_json::to_string(&b).unwrap()
                ),
                (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
                (a, b) => prop_assert!(false, "diverging results: {:?} vs {:?}", a, b),
            }
        }
    }

    #[test]
    fn earliest_fit_fails_one_day_short_of_the_critical_path((tasks, map) in dag_strategy(12)) {
        let graph = DependencyGraph::build(&tasks, &map).unwrap();
        let needed = order(&graph, TieBreak::Name).unwrap().critical_path_len();
        prop_assume!(needed > 1);

        let result = ScheduleBuilder::new().build(&tasks, &map, (needed - 1) as i64, "earliest-fit");
        match result {
            Err(DayplanError::HorizonExceeded { required, available, .. }) => {
                prop_assert_eq!(available, needed - 1);
                prop_assert!(required > available);
            }
            other => prop_assert!(false, "expected HorizonExceeded, got {:?}", other),
        }
    }

    #[test]
    fn a_back_edge_always_yields_a_cycle((tasks, map) in dag_strategy(10), pick in any::<usize>()) {
        prop_assume!(!map.is_empty());
        let (task, prereqs) = map.iter().nth(pick % map.len()).unwrap();
        let prereq = prereqs[0].clone();

        let mut cyclic = map.clone();
        cyclic.entry(prereq.clone()).or_default().push(task.clone());

        match ScheduleBuilder::new().build(&tasks, &cyclic, 50, "earliest-fit") {
            Err(DayplanError::Cycle { cycle }) => prop_assert!(!cycle.is_empty()),
            other => prop_assert!(false, "expected Cycle, got {:?}", other),
        }
    }
}
