//! Workflow Engine - Graph-based workflow execution for Easel
//!
//! This crate runs directed graphs of computation nodes in dependency
//! order, streaming per-node status events, caching results for
//! incremental re-execution, and supporting cooperative cancellation.
//! It supports:
//!
//! - Full-graph, downstream-from-node, and single-node execution passes
//! - Muted/bypassed node modes that skip user code but keep downstream
//!   data well-shaped
//! - A shared result cache with a documented lifecycle (cleared only by
//!   a full run; otherwise accumulates)
//! - Run supersession: starting any pass cancels the one in flight
//!
//! # Architecture
//!
//! - `engine`: the scheduler and its three entry points
//! - `order`: dependency resolution (Kahn's algorithm)
//! - `modes`: output synthesis for muted/bypassed nodes
//! - `session`: run tokens and cooperative cancellation
//! - `events`: the execution event stream and its sinks
//! - `registry` / `validation`: node catalog and editor-facing checks
//!
//! # Example
//!
//! ```ignore
//! use workflow_engine::{NodeRegistry, VecEventSink, WorkflowEngine};
//!
//! let mut registry = NodeRegistry::new();
//! workflow_nodes::register_builtins(&mut registry);
//!
//! let engine = WorkflowEngine::new(registry);
//! let sink = VecEventSink::new();
//! let summary = engine.execute(&graph, &sink).await?;
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod modes;
pub mod node;
pub mod order;
pub mod registry;
pub mod session;
pub mod types;
pub mod validation;

// Re-export key types
pub use engine::{CyclePolicy, EngineOptions, FailurePolicy, PassSummary, WorkflowEngine};
pub use error::{EngineError, Result};
pub use events::{
    ChannelEventSink, EventError, EventSink, ExecutionEvent, ExecutionStatus, NullEventSink,
    VecEventSink,
};
pub use node::{ExecutionContext, InputsExt, Node, NodeError, NodeInputs, NodeOutputs, PortValue};
pub use order::{execution_order, ExecutionOrder};
pub use registry::NodeRegistry;
pub use session::{RunToken, SessionManager};
pub use types::{
    GraphEdge, GraphNode, NodeCategory, NodeDefinition, NodeId, NodeMode, PortDataType,
    PortDefinition, Position, WorkflowGraph,
};
pub use validation::{validate_connection, ValidationError, WorkflowValidator};
