//! Core types for the workflow graph model
//!
//! Defines port data types, node definitions, execution modes, and the
//! graph structure produced by the editor.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Unique identifier for a port
pub type PortId = String;

/// Data types that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDataType {
    /// Accepts any type
    Any,
    /// Plain text string
    String,
    /// Generation prompt (compatible with String)
    Prompt,
    /// Base64-encoded image data
    Image,
    /// Base64-encoded mask data
    Mask,
    /// JSON object
    Json,
    /// Numeric value
    Number,
    /// Boolean value
    Boolean,
}

impl PortDataType {
    /// Check if this type can connect to a target type
    ///
    /// Rules:
    /// - Any accepts/provides everything
    /// - Same types are always compatible
    /// - String and Prompt are interchangeable
    /// - Json, Number and Boolean are coercible to String
    pub fn is_compatible_with(&self, target: &PortDataType) -> bool {
        if *self == PortDataType::Any || *target == PortDataType::Any {
            return true;
        }

        if self == target {
            return true;
        }

        if matches!(
            (self, target),
            (PortDataType::String, PortDataType::Prompt)
                | (PortDataType::Prompt, PortDataType::String)
        ) {
            return true;
        }

        if *target == PortDataType::String {
            return matches!(
                self,
                PortDataType::Json | PortDataType::Number | PortDataType::Boolean
            );
        }

        false
    }
}

/// Definition of a single port (input or output)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDefinition {
    /// Unique identifier within the node
    pub id: PortId,
    /// Human-readable label
    pub label: String,
    /// Data type this port accepts/produces
    pub data_type: PortDataType,
    /// Whether this input is required for execution
    #[serde(default)]
    pub required: bool,
}

impl PortDefinition {
    /// Create a new required port
    pub fn required(
        id: impl Into<String>,
        label: impl Into<String>,
        data_type: PortDataType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data_type,
            required: true,
        }
    }

    /// Create a new optional port
    pub fn optional(
        id: impl Into<String>,
        label: impl Into<String>,
        data_type: PortDataType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data_type,
            required: false,
        }
    }
}

/// Category for organizing nodes in the palette
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Input nodes (user text, images, etc.)
    Input,
    /// Processing nodes (templates, generation calls, etc.)
    Processing,
    /// Output nodes (display, preview, etc.)
    Output,
    /// Control flow nodes
    Control,
}

/// Complete definition of a node type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    /// Unique type identifier (e.g., "text-input")
    pub node_type: String,
    /// Category for palette organization
    pub category: NodeCategory,
    /// Human-readable name
    pub label: String,
    /// Description for tooltips
    pub description: String,
    /// Input port definitions, in declaration order
    pub inputs: Vec<PortDefinition>,
    /// Output port definitions, in declaration order
    pub outputs: Vec<PortDefinition>,
}

/// How a node participates in execution
///
/// Muted and bypassed nodes never run their execute operation; the
/// scheduler synthesizes their outputs so downstream consumers still
/// observe well-shaped values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeMode {
    /// Execute normally
    #[default]
    Normal,
    /// Skip execution; every output becomes null
    Muted,
    /// Skip execution; inputs pass through to matching outputs
    Bypassed,
}

/// A node instance in a workflow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique instance ID
    pub id: NodeId,
    /// Node type (references NodeDefinition.node_type)
    pub node_type: String,
    /// Execution mode for this instance
    #[serde(default)]
    pub mode: NodeMode,
    /// Position on canvas
    #[serde(default)]
    pub position: Position,
    /// Node-specific configuration data set by the editor
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Position on the canvas
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// An edge connecting one node's output port to another node's input port
///
/// Each input port has at most one incoming edge; the editor enforces this
/// when connections are made.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Source port ID (output)
    pub source_handle: PortId,
    /// Target node ID
    pub target: NodeId,
    /// Target port ID (input)
    pub target_handle: PortId,
}

/// Complete workflow graph
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkflowGraph {
    /// All nodes in the graph
    pub nodes: Vec<GraphNode>,
    /// All edges connecting nodes
    pub edges: Vec<GraphEdge>,
}

impl WorkflowGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Build an id-to-node index for O(1) lookups during a pass
    pub fn node_index(&self) -> std::collections::HashMap<&str, &GraphNode> {
        self.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
    }

    /// Check if there's an edge connecting to a specific input port
    pub fn has_edge_to(&self, node_id: &str, port_id: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.target == node_id && e.target_handle == port_id)
    }

    /// Get all edges that feed into a specific node
    pub fn incoming_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Get all edges that come out of a specific node
    pub fn outgoing_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }
}
