//! Workflow execution engine
//!
//! The engine executes workflow graphs in dependency order, routing data
//! between nodes through a shared result cache and streaming per-node
//! events to the caller. Three entry points cover the editor's needs:
//! a full run, re-execution of everything downstream of one node, and a
//! single-node run against cached upstream values.
//!
//! Each entry point begins a new execution session, superseding any pass
//! still in flight; see [`crate::session`] for the token protocol.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::events::{EventSink, ExecutionEvent};
use crate::modes::{bypassed_outputs, muted_outputs};
use crate::node::{ExecutionContext, NodeInputs, NodeOutputs};
use crate::order::execution_order;
use crate::registry::NodeRegistry;
use crate::session::{RunToken, SessionManager};
use crate::types::{GraphNode, NodeId, NodeMode, WorkflowGraph};
use crate::validation::{ValidationError, WorkflowValidator};

/// Policy for graphs containing a dependency cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Abort the pass with an error naming the cyclic nodes
    #[default]
    Reject,
    /// Exclude cyclic nodes from the pass without erroring
    ///
    /// Compatibility behavior for saved workflows that relied on the
    /// acyclic part still running.
    Skip,
}

/// Policy applied after a node execution error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep attempting downstream nodes with whatever inputs resolve
    #[default]
    Continue,
    /// Stop the pass after the first node error event
    Halt,
}

/// Tunable engine behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub cycle_policy: CyclePolicy,
    pub failure_policy: FailurePolicy,
}

/// Summary of one execution pass
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
    /// Nodes that produced a terminal completed event
    pub completed: Vec<NodeId>,
    /// Nodes that produced a terminal error event
    pub failed: Vec<NodeId>,
    /// Whether the pass stopped early because it was cancelled or
    /// superseded
    pub cancelled: bool,
}

enum NodeOutcome {
    Completed,
    Failed,
}

/// The workflow execution engine
///
/// Owns the shared result cache and the execution session for its
/// lifetime. The cache accumulates across passes and is cleared only by
/// a full run, which is what makes partial re-execution cheap: nodes
/// outside the re-run set feed downstream inputs from their last cached
/// outputs.
pub struct WorkflowEngine {
    registry: NodeRegistry,
    options: EngineOptions,
    cache: RwLock<HashMap<NodeId, NodeOutputs>>,
    session: SessionManager,
}

impl WorkflowEngine {
    /// Create an engine with default options
    pub fn new(registry: NodeRegistry) -> Self {
        Self::with_options(registry, EngineOptions::default())
    }

    /// Create an engine with explicit options
    pub fn with_options(registry: NodeRegistry, options: EngineOptions) -> Self {
        Self {
            registry,
            options,
            cache: RwLock::new(HashMap::new()),
            session: SessionManager::new(),
        }
    }

    /// Get a reference to the node registry
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Validate a graph against the registry
    ///
    /// Editor-facing; the execution entry points do not run these checks.
    pub fn validate(&self, graph: &WorkflowGraph) -> std::result::Result<(), ValidationError> {
        WorkflowValidator::new(&self.registry).validate(graph)
    }

    /// Cancel the active pass
    ///
    /// Cooperative: a node already executing runs to completion and
    /// still emits its terminal event; the pass stops before attempting
    /// the next node, with no further events and no error.
    pub fn cancel(&self) {
        self.session.cancel();
    }

    /// Snapshot of the result cache
    pub async fn results(&self) -> HashMap<NodeId, NodeOutputs> {
        self.cache.read().await.clone()
    }

    /// Execute the entire graph
    ///
    /// Clears the shared cache, orders all nodes, and processes each in
    /// turn. Progress spans the whole graph.
    pub async fn execute(
        &self,
        graph: &WorkflowGraph,
        sink: &dyn EventSink,
    ) -> Result<PassSummary> {
        let token = self.session.begin();
        let execution_id = Uuid::new_v4().to_string();
        log::debug!(
            "pass {}: full run over {} nodes",
            execution_id,
            graph.nodes.len()
        );

        self.cache.write().await.clear();

        let ids = self.ordered_or_reject(graph, sink)?;
        self.run_nodes(graph, &ids, &token, &execution_id, sink)
            .await
    }

    /// Re-execute a node and everything downstream of it
    ///
    /// The cache is not cleared: nodes outside the downstream set keep
    /// their last cached outputs and feed input projection as-is; nodes
    /// inside the set are re-executed and overwritten. Progress scales
    /// to the size of the re-executed subset.
    pub async fn execute_from_node(
        &self,
        graph: &WorkflowGraph,
        start_id: &str,
        sink: &dyn EventSink,
    ) -> Result<PassSummary> {
        let token = self.session.begin();
        let execution_id = Uuid::new_v4().to_string();

        if graph.find_node(start_id).is_none() {
            let err = EngineError::NodeNotFound(start_id.to_string());
            sink.send(ExecutionEvent::error(start_id, 0.0, err.to_string()))?;
            return Err(err);
        }

        let order = self.ordered_or_reject(graph, sink)?;
        let subset = downstream_subset(graph, &order, start_id);
        log::debug!(
            "pass {}: re-running {} of {} nodes from {}",
            execution_id,
            subset.len(),
            graph.nodes.len(),
            start_id
        );

        self.run_nodes(graph, &subset, &token, &execution_id, sink)
            .await
    }

    /// Execute a single node against cached upstream values
    ///
    /// Nothing upstream is re-executed; inputs resolve purely from the
    /// existing cache and missing upstream values are simply absent.
    pub async fn execute_node_only(
        &self,
        graph: &WorkflowGraph,
        node_id: &str,
        sink: &dyn EventSink,
    ) -> Result<PassSummary> {
        let token = self.session.begin();
        let execution_id = Uuid::new_v4().to_string();

        if graph.find_node(node_id).is_none() {
            let err = EngineError::NodeNotFound(node_id.to_string());
            sink.send(ExecutionEvent::error(node_id, 0.0, err.to_string()))?;
            return Err(err);
        }

        log::debug!("pass {}: single node {}", execution_id, node_id);

        self.run_nodes(graph, &[node_id.to_string()], &token, &execution_id, sink)
            .await
    }

    /// Order the graph, applying the engine's cycle policy
    fn ordered_or_reject(
        &self,
        graph: &WorkflowGraph,
        sink: &dyn EventSink,
    ) -> Result<Vec<NodeId>> {
        let order = execution_order(graph);
        if order.has_cycle() {
            match self.options.cycle_policy {
                CyclePolicy::Reject => {
                    let err = EngineError::CycleDetected {
                        nodes: order.cyclic.clone(),
                    };
                    sink.send(ExecutionEvent::error(
                        order.cyclic[0].clone(),
                        0.0,
                        err.to_string(),
                    ))?;
                    return Err(err);
                }
                CyclePolicy::Skip => {
                    log::warn!("cyclic nodes excluded from pass: {}", order.cyclic.join(", "));
                }
            }
        }
        Ok(order.order)
    }

    /// Drive an ordered list of nodes, emitting events as we go
    async fn run_nodes(
        &self,
        graph: &WorkflowGraph,
        ids: &[NodeId],
        token: &RunToken,
        execution_id: &str,
        sink: &dyn EventSink,
    ) -> Result<PassSummary> {
        let index = graph.node_index();
        let context = ExecutionContext::new(execution_id, token.clone());
        let total = ids.len();
        let mut summary = PassSummary::default();

        for (position, node_id) in ids.iter().enumerate() {
            // Liveness check at the loop boundary only: a node already
            // in flight when its pass is superseded still finishes and
            // emits its terminal event.
            if !token.is_live() {
                log::debug!(
                    "pass {}: superseded, stopping before {}",
                    execution_id,
                    node_id
                );
                summary.cancelled = true;
                return Ok(summary);
            }

            let started = progress_at(position, total);
            let finished = progress_at(position + 1, total);

            let Some(node) = index.get(node_id.as_str()) else {
                let err = EngineError::NodeNotFound(node_id.clone());
                sink.send(ExecutionEvent::error(node_id.clone(), started, err.to_string()))?;
                return Err(err);
            };

            match self
                .run_node(node, graph, &context, started, finished, sink)
                .await?
            {
                NodeOutcome::Completed => summary.completed.push(node_id.clone()),
                NodeOutcome::Failed => {
                    summary.failed.push(node_id.clone());
                    if self.options.failure_policy == FailurePolicy::Halt {
                        log::warn!(
                            "pass {}: halting after failure of {}",
                            execution_id,
                            node_id
                        );
                        return Ok(summary);
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Run one node according to its mode
    async fn run_node(
        &self,
        node: &GraphNode,
        graph: &WorkflowGraph,
        context: &ExecutionContext,
        started: f32,
        finished: f32,
        sink: &dyn EventSink,
    ) -> Result<NodeOutcome> {
        let inputs = self.resolve_inputs(graph, node).await;

        match node.mode {
            NodeMode::Muted | NodeMode::Bypassed => {
                let Some(definition) = self.registry.get_definition(&node.node_type) else {
                    sink.send(ExecutionEvent::error(
                        &node.id,
                        finished,
                        format!("Unknown node type: {}", node.node_type),
                    ))?;
                    return Ok(NodeOutcome::Failed);
                };

                let outputs = match node.mode {
                    NodeMode::Muted => muted_outputs(definition),
                    _ => bypassed_outputs(definition, &inputs),
                };

                self.cache
                    .write()
                    .await
                    .insert(node.id.clone(), outputs.clone());

                // No running event: no user code runs for this node
                sink.send(ExecutionEvent::completed(&node.id, finished, outputs))?;
                Ok(NodeOutcome::Completed)
            }
            NodeMode::Normal => {
                sink.send(ExecutionEvent::running(&node.id, started))?;

                let Some(instance) = self.registry.create_node(&node.node_type, &node.id) else {
                    sink.send(ExecutionEvent::error(
                        &node.id,
                        finished,
                        format!("Unknown node type: {}", node.node_type),
                    ))?;
                    return Ok(NodeOutcome::Failed);
                };

                match instance.execute(inputs, context).await {
                    Ok(outputs) => {
                        self.cache
                            .write()
                            .await
                            .insert(node.id.clone(), outputs.clone());
                        sink.send(ExecutionEvent::completed(&node.id, finished, outputs))?;
                        Ok(NodeOutcome::Completed)
                    }
                    Err(e) => {
                        log::warn!("node {} failed: {}", node.id, e);
                        sink.send(ExecutionEvent::error(&node.id, finished, e.to_string()))?;
                        Ok(NodeOutcome::Failed)
                    }
                }
            }
        }
    }

    /// Resolve inputs for a node from its property store and cached
    /// upstream outputs
    ///
    /// Priority:
    /// 1. Values stored in node.data (editor configuration)
    /// 2. Connected upstream outputs (these override on conflict)
    ///
    /// Inputs whose upstream has no cache entry are simply absent.
    async fn resolve_inputs(&self, graph: &WorkflowGraph, node: &GraphNode) -> NodeInputs {
        let mut inputs = NodeInputs::new();

        if let Some(obj) = node.data.as_object() {
            for (key, value) in obj {
                inputs.insert(key.clone(), value.clone());
            }
        }

        let cache = self.cache.read().await;
        for edge in graph.incoming_edges(&node.id) {
            if let Some(source_outputs) = cache.get(&edge.source) {
                if let Some(value) = source_outputs.get(&edge.source_handle) {
                    inputs.insert(edge.target_handle.clone(), value.clone());
                }
            }
        }

        inputs
    }
}

/// Pass progress percentage after `position` of `total` nodes
fn progress_at(position: usize, total: usize) -> f32 {
    if total == 0 {
        return 100.0;
    }
    (position as f32 / total as f32) * 100.0
}

/// The forward reachability closure of `start_id` within the ordered
/// node list
///
/// Walks the order from the start node's position, collecting the start
/// node plus every node with an incoming edge from an already-collected
/// node.
fn downstream_subset(graph: &WorkflowGraph, order: &[NodeId], start_id: &str) -> Vec<NodeId> {
    let Some(start_pos) = order.iter().position(|id| id == start_id) else {
        // The start node was excluded from the order (cyclic, under the
        // skip policy): nothing downstream can be scheduled either.
        return Vec::new();
    };

    let mut selected: HashSet<&str> = HashSet::new();
    selected.insert(start_id);
    let mut subset = vec![start_id.to_string()];

    for id in &order[start_pos + 1..] {
        if graph
            .incoming_edges(id)
            .any(|e| selected.contains(e.source.as_str()))
        {
            selected.insert(id);
            subset.push(id.clone());
        }
    }

    subset
}
