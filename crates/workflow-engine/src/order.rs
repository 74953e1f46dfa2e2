//! Dependency resolution for workflow graphs
//!
//! Computes a valid execution order over a graph's link topology using
//! Kahn's algorithm: for every edge, the source node appears strictly
//! before the target node. Ties among simultaneously-ready nodes are
//! broken by the graph's own node ordering.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::{NodeId, WorkflowGraph};

/// Result of ordering a graph
#[derive(Debug, Clone)]
pub struct ExecutionOrder {
    /// Nodes in a valid topological order
    pub order: Vec<NodeId>,
    /// Nodes trapped in a dependency cycle, in graph order
    ///
    /// These never reach zero in-degree and cannot be scheduled. The
    /// engine's cycle policy decides whether their presence aborts the
    /// pass or they are skipped.
    pub cyclic: Vec<NodeId>,
}

impl ExecutionOrder {
    /// Whether any node was excluded by a cycle
    pub fn has_cycle(&self) -> bool {
        !self.cyclic.is_empty()
    }
}

/// Compute the execution order for a graph
///
/// Builds, in one pass over the edges, a dependency set per node
/// (distinct source ids feeding its inputs) and the reverse adjacency,
/// then runs Kahn's algorithm seeded with all zero-dependency nodes in
/// graph order. Edges referencing unknown node ids are ignored.
pub fn execution_order(graph: &WorkflowGraph) -> ExecutionOrder {
    let known: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

    // Dependency set per node (distinct sources) and reverse adjacency
    let mut dependencies: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for node in &graph.nodes {
        dependencies.insert(&node.id, HashSet::new());
        dependents.insert(&node.id, Vec::new());
    }

    for edge in &graph.edges {
        if !known.contains(edge.source.as_str()) || !known.contains(edge.target.as_str()) {
            continue;
        }
        if let Some(deps) = dependencies.get_mut(edge.target.as_str()) {
            // A second link from the same source is not a second dependency
            if deps.insert(&edge.source) {
                if let Some(dependent) = dependents.get_mut(edge.source.as_str()) {
                    dependent.push(&edge.target);
                }
            }
        }
    }

    let mut in_degree: HashMap<&str, usize> = dependencies
        .iter()
        .map(|(id, deps)| (*id, deps.len()))
        .collect();

    // Seed with zero-dependency nodes in graph order so ties are broken
    // by original position
    let mut queue: VecDeque<&str> = graph
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| in_degree[id] == 0)
        .collect();

    let mut order = Vec::with_capacity(graph.nodes.len());
    let mut ordered: HashSet<&str> = HashSet::new();

    while let Some(node) = queue.pop_front() {
        order.push(node.to_string());
        ordered.insert(node);

        if let Some(neighbors) = dependents.get(node) {
            for &neighbor in neighbors {
                if let Some(degree) = in_degree.get_mut(neighbor) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(neighbor);
                    }
                }
            }
        }
    }

    // Anything left over is inside a cycle
    let cyclic = graph
        .nodes
        .iter()
        .map(|n| n.id.clone())
        .filter(|id| !ordered.contains(id.as_str()))
        .collect();

    ExecutionOrder { order, cyclic }
}
