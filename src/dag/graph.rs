// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet, HashSet};

use petgraph::algo::kosaraju_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::errors::{DayplanError, Result};
use crate::types::{DependencyMap, Task, TaskName};

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct DagNode {
    /// Position of the task in the caller's input.
    input_index: usize,
    effort: u32,
    /// Direct prerequisites, sorted and de-duplicated.
    deps: Vec<TaskName>,
    /// Direct dependents: tasks that list this one as a prerequisite.
    dependents: Vec<TaskName>,
}

/// Validated, acyclic dependency graph keyed by task name.
///
/// A graph only exists once [`DependencyGraph::build`] has checked that every
/// referenced name is a known task and that no task reaches itself. It is
/// rebuilt for every scheduling request.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: BTreeMap<TaskName, DagNode>,
}

impl DependencyGraph {
    /// Build and validate a graph from a task set and a dependency map.
    ///
    /// Fails with:
    /// - [`DayplanError::DuplicateTask`] if a name appears twice in `tasks`
    /// - [`DayplanError::UnknownTask`] if the map mentions a name (as key or
    ///   prerequisite) that is not in `tasks`
    /// - [`DayplanError::Cycle`] if any task reaches itself, self-loops included
    pub fn build(tasks: &[Task], dependencies: &DependencyMap) -> Result<Self> {
        let mut nodes: BTreeMap<TaskName, DagNode> = BTreeMap::new();

        for (input_index, task) in tasks.iter().enumerate() {
            if nodes.contains_key(&task.name) {
                return Err(DayplanError::DuplicateTask(task.name.clone()));
            }
            nodes.insert(
                task.name.clone(),
                DagNode {
                    input_index,
                    effort: task.effective_effort(),
                    deps: Vec::new(),
                    dependents: Vec::new(),
                },
            );
        }

        validate_references(&nodes, dependencies)?;

        // First pass: dependency lists.
        for (name, deps) in dependencies.iter() {
            let unique: BTreeSet<&TaskName> = deps.iter().collect();
            if let Some(node) = nodes.get_mut(name) {
                node.deps = unique.into_iter().cloned().collect();
            }
        }

        // Second pass: dependents, derived from deps.
        for (name, deps) in dependencies.iter() {
            let unique: BTreeSet<&TaskName> = deps.iter().collect();
            for dep in unique {
                if let Some(dep_node) = nodes.get_mut(dep) {
                    dep_node.dependents.push(name.clone());
                }
            }
        }

        let graph = Self { nodes };

        if let Some(cycle) = graph.find_cycle()? {
            return Err(DayplanError::Cycle { cycle });
        }

        debug!(
            tasks = graph.len(),
            edges = graph.edge_count(),
            "dependency graph validated"
        );

        Ok(graph)
    }

    /// All task names, in lexicographic order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Total number of (task, prerequisite) edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.deps.len()).sum()
    }

    /// Immediate prerequisites of a task.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task (tasks that list this one as a prerequisite).
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    pub fn effort_of(&self, name: &str) -> Option<u32> {
        self.nodes.get(name).map(|n| n.effort)
    }

    pub fn input_index_of(&self, name: &str) -> Option<usize> {
        self.nodes.get(name).map(|n| n.input_index)
    }

    /// Tasks without prerequisites.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.deps.is_empty())
            .map(|(name, _)| name.as_str())
    }

    /// Find one concrete cycle, if any.
    ///
    /// Edges point from a task to its prerequisites, so the witness reads in
    /// "depends on" direction. Among all cyclic components the one holding the
    /// smallest name is reported, starting from that name.
    fn find_cycle(&self) -> Result<Option<Vec<TaskName>>> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in self.nodes.keys() {
            graph.add_node(name.as_str());
        }
        for (name, node) in self.nodes.iter() {
            for dep in node.deps.iter() {
                graph.add_edge(name.as_str(), dep.as_str(), ());
            }
        }

        let start_and_members = kosaraju_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| scc.into_iter().collect::<BTreeSet<&str>>())
            .filter_map(|members| members.first().copied().map(|start| (start, members)))
            .min_by(|a, b| a.0.cmp(b.0));

        let Some((start, members)) = start_and_members else {
            return Ok(None);
        };

        let Some(path) = self.path_back_to(start, &members) else {
            return Err(DayplanError::InternalConsistency(format!(
                "strongly connected component containing '{start}' has no cycle through it"
            )));
        };

        Ok(Some(path.into_iter().map(str::to_string).collect()))
    }

    /// Depth-first search restricted to `members` for a path from `start`
    /// back to itself, returned without repeating `start` at the end.
    ///
    /// Runs on an explicit stack of `(node, next prerequisite index)` so
    /// cycle length is bounded by memory, not by the call stack. The stack
    /// itself is the current path.
    fn path_back_to<'a>(
        &'a self,
        start: &'a str,
        members: &BTreeSet<&str>,
    ) -> Option<Vec<&'a str>> {
        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];

        while let Some((node, next)) = stack.last_mut() {
            let deps = self.dependencies_of(*node);
            let Some(dep) = deps.get(*next) else {
                stack.pop();
                continue;
            };
            *next += 1;

            let dep = dep.as_str();
            if !members.contains(dep) {
                continue;
            }
            if dep == start {
                return Some(stack.iter().map(|(n, _)| *n).collect());
            }
            if visited.insert(dep) {
                stack.push((dep, 0));
            }
        }
        None
    }
}

fn validate_references(
    nodes: &BTreeMap<TaskName, DagNode>,
    dependencies: &DependencyMap,
) -> Result<()> {
    for (name, deps) in dependencies.iter() {
        if !nodes.contains_key(name) {
            return Err(DayplanError::UnknownTask {
                task: name.clone(),
                dependency: name.clone(),
            });
        }
        for dep in deps.iter() {
            if !nodes.contains_key(dep) {
                return Err(DayplanError::UnknownTask {
                    task: name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    Ok(())
}
