// src/dag/order.rs

//! Deterministic topological ordering (Kahn's algorithm).

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::dag::graph::DependencyGraph;
use crate::errors::{DayplanError, Result};
use crate::types::{TaskName, TieBreak};

/// A task as seen by placement strategies: its name, effort, and the direct
/// prerequisites that were validated by the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedTask {
    pub name: TaskName,
    pub effort: u32,
    pub prerequisites: Vec<TaskName>,
}

/// Linear ordering of all tasks in which every prerequisite appears strictly
/// before the tasks that depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOrder {
    tasks: Vec<OrderedTask>,
}

impl TaskOrder {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderedTask> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[OrderedTask] {
        &self.tasks
    }

    /// Task names in order.
    pub fn names(&self) -> Vec<TaskName> {
        self.tasks.iter().map(|t| t.name.clone()).collect()
    }

    /// Position of `name` in the ordering.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name == name)
    }

    /// Direct dependents of every task, derived from the prerequisite lists.
    ///
    /// Strategies that walk the ordering backwards use this instead of the
    /// raw dependency map.
    pub fn dependents(&self) -> HashMap<&str, Vec<&str>> {
        let mut out: HashMap<&str, Vec<&str>> = self
            .tasks
            .iter()
            .map(|t| (t.name.as_str(), Vec::new()))
            .collect();
        for task in self.tasks.iter() {
            for prereq in task.prerequisites.iter() {
                if let Some(list) = out.get_mut(prereq.as_str()) {
                    list.push(task.name.as_str());
                }
            }
        }
        out
    }

    /// Length of the longest prerequisite chain ending at each task,
    /// counting the task itself.
    pub fn chain_depths(&self) -> HashMap<&str, usize> {
        let mut depth: HashMap<&str, usize> = HashMap::with_capacity(self.tasks.len());
        for task in self.tasks.iter() {
            let d = task
                .prerequisites
                .iter()
                .filter_map(|p| depth.get(p.as_str()))
                .max()
                .map_or(1, |m| m + 1);
            depth.insert(task.name.as_str(), d);
        }
        depth
    }

    /// Length of the longest dependent chain starting at each task,
    /// counting the task itself.
    pub fn chain_heights(&self) -> HashMap<&str, usize> {
        let dependents = self.dependents();
        let mut height: HashMap<&str, usize> = HashMap::with_capacity(self.tasks.len());
        for task in self.tasks.iter().rev() {
            let h = dependents
                .get(task.name.as_str())
                .into_iter()
                .flatten()
                .filter_map(|d| height.get(d))
                .max()
                .map_or(1, |m| m + 1);
            height.insert(task.name.as_str(), h);
        }
        height
    }

    /// Fewest days any placement needs, ignoring capacity: the longest chain.
    pub fn critical_path_len(&self) -> usize {
        self.chain_depths().values().copied().max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a TaskOrder {
    type Item = &'a OrderedTask;
    type IntoIter = std::slice::Iter<'a, OrderedTask>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

/// Linearize a validated graph.
///
/// Repeatedly takes, among the tasks whose prerequisites are all placed, the
/// one ranked first by `tie_break`. Running out of ready tasks while tasks
/// remain means the graph was not acyclic, which [`DependencyGraph::build`]
/// rules out; that case is reported as
/// [`DayplanError::InternalConsistency`] rather than truncating the output.
pub fn order(graph: &DependencyGraph, tie_break: TieBreak) -> Result<TaskOrder> {
    let rank = |name: &str| -> usize {
        match tie_break {
            TieBreak::Name => 0,
            TieBreak::InputOrder => graph.input_index_of(name).unwrap_or(usize::MAX),
        }
    };

    let mut in_degree: HashMap<&str, usize> = graph
        .tasks()
        .map(|name| (name, graph.dependencies_of(name).len()))
        .collect();

    // (rank, name): with `TieBreak::Name` every rank is 0, so names decide.
    let mut ready: BTreeSet<(usize, &str)> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(name, _)| (rank(*name), *name))
        .collect();

    let mut tasks = Vec::with_capacity(graph.len());

    while let Some((_, name)) = ready.pop_first() {
        tasks.push(OrderedTask {
            name: name.to_string(),
            effort: graph.effort_of(name).unwrap_or_default(),
            prerequisites: graph.dependencies_of(name).to_vec(),
        });

        for dependent in graph.dependents_of(name) {
            let dependent = dependent.as_str();
            if let Some(deg) = in_degree.get_mut(dependent) {
                *deg -= 1;
                if *deg == 0 {
                    ready.insert((rank(dependent), dependent));
                }
            }
        }
    }

    if tasks.len() != graph.len() {
        let placed: BTreeSet<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        let stuck: Vec<&str> = graph.tasks().filter(|t| !placed.contains(t)).collect();
        return Err(DayplanError::InternalConsistency(format!(
            "ordering covered {} of {} tasks; unordered: {}",
            tasks.len(),
            graph.len(),
            stuck.join(", ")
        )));
    }

    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    debug!(order = ?names, ?tie_break, "topological order computed");

    Ok(TaskOrder { tasks })
}
