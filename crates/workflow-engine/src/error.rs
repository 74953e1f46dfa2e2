//! Error types for the workflow engine

use thiserror::Error;

use crate::node::NodeError;
use crate::types::NodeId;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while running a pass
#[derive(Debug, Error)]
pub enum EngineError {
    /// A requested start node is absent from the graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The graph contains a dependency cycle
    #[error("Cycle detected, nodes unreachable: {}", .nodes.join(", "))]
    CycleDetected { nodes: Vec<NodeId> },

    /// A node failed and the failure policy halts the pass
    #[error("Node execution failed: {0}")]
    NodeFailed(#[from] NodeError),

    /// An event could not be delivered to the consumer
    #[error("Failed to deliver event: {0}")]
    EventDelivery(#[from] crate::events::EventError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
