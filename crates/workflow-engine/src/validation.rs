//! Graph validation for workflows
//!
//! Validates workflow graphs for:
//! - Unknown node types
//! - Cycle detection
//! - Required input connections
//! - Type compatibility between connected ports
//!
//! Validation is an editor-facing service, called before or while the
//! user wires nodes; the execution entry points have their own, fixed
//! error surface and do not run these checks.

use std::collections::HashSet;

use crate::order::execution_order;
use crate::registry::NodeRegistry;
use crate::types::{PortDataType, WorkflowGraph};

/// Errors that can occur during graph validation
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Cycle detected in workflow graph: {}", .nodes.join(", "))]
    CycleDetected { nodes: Vec<String> },

    #[error("Node '{node_id}' has unconnected required input '{port}'")]
    UnconnectedInput { node_id: String, port: String },

    #[error("Type mismatch on edge '{edge_id}': {source_type:?} cannot connect to {target_type:?}")]
    TypeMismatch {
        edge_id: String,
        source_type: PortDataType,
        target_type: PortDataType,
    },

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Unknown port '{port}' on node '{node_id}'")]
    UnknownPort { node_id: String, port: String },

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

/// Validates workflow graphs against a node registry
pub struct WorkflowValidator<'a> {
    registry: &'a NodeRegistry,
}

impl<'a> WorkflowValidator<'a> {
    /// Create a new validator with access to the node registry
    pub fn new(registry: &'a NodeRegistry) -> Self {
        Self { registry }
    }

    /// Validate an entire workflow graph
    ///
    /// Performs the following checks in order:
    /// 1. All node types are known
    /// 2. No cycles in the graph
    /// 3. All required inputs are connected
    /// 4. All edge types are compatible
    pub fn validate(&self, graph: &WorkflowGraph) -> Result<(), ValidationError> {
        self.validate_node_types(graph)?;
        self.detect_cycles(graph)?;
        self.validate_required_inputs(graph)?;
        self.validate_edge_types(graph)?;
        Ok(())
    }

    /// Check that all nodes have known types
    fn validate_node_types(&self, graph: &WorkflowGraph) -> Result<(), ValidationError> {
        for node in &graph.nodes {
            if self.registry.get_definition(&node.node_type).is_none() {
                return Err(ValidationError::UnknownNodeType(node.node_type.clone()));
            }
        }
        Ok(())
    }

    /// Detect cycles via the dependency resolver's leftover set
    fn detect_cycles(&self, graph: &WorkflowGraph) -> Result<(), ValidationError> {
        let order = execution_order(graph);
        if order.has_cycle() {
            return Err(ValidationError::CycleDetected {
                nodes: order.cyclic,
            });
        }
        Ok(())
    }

    /// Check that all required inputs have connections
    fn validate_required_inputs(&self, graph: &WorkflowGraph) -> Result<(), ValidationError> {
        // Set of connected inputs: (node_id, port_id)
        let connected_inputs: HashSet<(&str, &str)> = graph
            .edges
            .iter()
            .map(|e| (e.target.as_str(), e.target_handle.as_str()))
            .collect();

        for node in &graph.nodes {
            let definition = self
                .registry
                .get_definition(&node.node_type)
                .ok_or_else(|| ValidationError::UnknownNodeType(node.node_type.clone()))?;

            for input in &definition.inputs {
                if input.required
                    && !connected_inputs.contains(&(node.id.as_str(), input.id.as_str()))
                {
                    // A value in the node's property store also satisfies
                    // the requirement
                    let has_data_value = node
                        .data
                        .as_object()
                        .map(|obj| obj.contains_key(&input.id))
                        .unwrap_or(false);

                    if !has_data_value {
                        return Err(ValidationError::UnconnectedInput {
                            node_id: node.id.clone(),
                            port: input.id.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate that all edges connect compatible port types
    fn validate_edge_types(&self, graph: &WorkflowGraph) -> Result<(), ValidationError> {
        for edge in &graph.edges {
            let source_node = graph
                .find_node(&edge.source)
                .ok_or_else(|| ValidationError::NodeNotFound(edge.source.clone()))?;

            let target_node = graph
                .find_node(&edge.target)
                .ok_or_else(|| ValidationError::NodeNotFound(edge.target.clone()))?;

            let source_def = self
                .registry
                .get_definition(&source_node.node_type)
                .ok_or_else(|| ValidationError::UnknownNodeType(source_node.node_type.clone()))?;

            let target_def = self
                .registry
                .get_definition(&target_node.node_type)
                .ok_or_else(|| ValidationError::UnknownNodeType(target_node.node_type.clone()))?;

            let source_port = source_def
                .outputs
                .iter()
                .find(|p| p.id == edge.source_handle)
                .ok_or_else(|| ValidationError::UnknownPort {
                    node_id: source_node.id.clone(),
                    port: edge.source_handle.clone(),
                })?;

            let target_port = target_def
                .inputs
                .iter()
                .find(|p| p.id == edge.target_handle)
                .ok_or_else(|| ValidationError::UnknownPort {
                    node_id: target_node.id.clone(),
                    port: edge.target_handle.clone(),
                })?;

            if !source_port
                .data_type
                .is_compatible_with(&target_port.data_type)
            {
                return Err(ValidationError::TypeMismatch {
                    edge_id: edge.id.clone(),
                    source_type: source_port.data_type,
                    target_type: target_port.data_type,
                });
            }
        }

        Ok(())
    }
}

/// Check if a single connection between two port types is valid
///
/// This is what the editor calls to validate connections as they're made.
pub fn validate_connection(source_type: &PortDataType, target_type: &PortDataType) -> bool {
    source_type.is_compatible_with(target_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ExecutionContext, Node, NodeError, NodeInputs, NodeOutputs};
    use crate::types::{
        GraphEdge, GraphNode, NodeCategory, NodeDefinition, NodeMode, PortDefinition, Position,
    };
    use async_trait::async_trait;

    struct StubNode {
        id: String,
        definition: NodeDefinition,
    }

    #[async_trait]
    impl Node for StubNode {
        fn definition(&self) -> &NodeDefinition {
            &self.definition
        }

        fn id(&self) -> &str {
            &self.id
        }

        async fn execute(
            &self,
            _inputs: NodeInputs,
            _context: &ExecutionContext,
        ) -> Result<NodeOutputs, NodeError> {
            Ok(NodeOutputs::new())
        }
    }

    fn register_stub(registry: &mut NodeRegistry, definition: NodeDefinition) {
        let def = definition.clone();
        registry.register(definition, move |id| {
            Box::new(StubNode {
                id: id.to_string(),
                definition: def.clone(),
            })
        });
    }

    fn test_registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        register_stub(
            &mut registry,
            NodeDefinition {
                node_type: "source".into(),
                category: NodeCategory::Input,
                label: "Source".into(),
                description: String::new(),
                inputs: vec![],
                outputs: vec![PortDefinition::required(
                    "text",
                    "Text",
                    PortDataType::String,
                )],
            },
        );
        register_stub(
            &mut registry,
            NodeDefinition {
                node_type: "sink".into(),
                category: NodeCategory::Output,
                label: "Sink".into(),
                description: String::new(),
                inputs: vec![PortDefinition::required("text", "Text", PortDataType::String)],
                outputs: vec![],
            },
        );
        register_stub(
            &mut registry,
            NodeDefinition {
                node_type: "image-sink".into(),
                category: NodeCategory::Output,
                label: "Image Sink".into(),
                description: String::new(),
                inputs: vec![PortDefinition::required(
                    "image",
                    "Image",
                    PortDataType::Image,
                )],
                outputs: vec![],
            },
        );
        registry
    }

    fn node(id: &str, node_type: &str) -> GraphNode {
        GraphNode {
            id: id.into(),
            node_type: node_type.into(),
            mode: NodeMode::Normal,
            position: Position::default(),
            data: serde_json::Value::Null,
        }
    }

    fn edge(id: &str, source: &str, source_handle: &str, target: &str, target_handle: &str) -> GraphEdge {
        GraphEdge {
            id: id.into(),
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            target_handle: target_handle.into(),
        }
    }

    #[test]
    fn test_valid_graph_passes() {
        let registry = test_registry();
        let validator = WorkflowValidator::new(&registry);

        let graph = WorkflowGraph {
            nodes: vec![node("a", "source"), node("b", "sink")],
            edges: vec![edge("e1", "a", "text", "b", "text")],
        };

        assert!(validator.validate(&graph).is_ok());
    }

    #[test]
    fn test_unknown_node_type() {
        let registry = test_registry();
        let validator = WorkflowValidator::new(&registry);

        let graph = WorkflowGraph {
            nodes: vec![node("a", "mystery")],
            edges: vec![],
        };

        assert!(matches!(
            validator.validate(&graph),
            Err(ValidationError::UnknownNodeType(t)) if t == "mystery"
        ));
    }

    #[test]
    fn test_cycle_detection_reports_nodes() {
        let registry = test_registry();
        let validator = WorkflowValidator::new(&registry);

        let graph = WorkflowGraph {
            nodes: vec![node("a", "source"), node("b", "sink")],
            edges: vec![
                edge("e1", "a", "text", "b", "text"),
                edge("e2", "b", "text", "a", "text"),
            ],
        };

        match validator.validate(&graph) {
            Err(ValidationError::CycleDetected { nodes }) => {
                assert_eq!(nodes, vec!["a", "b"]);
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_unconnected_required_input() {
        let registry = test_registry();
        let validator = WorkflowValidator::new(&registry);

        let graph = WorkflowGraph {
            nodes: vec![node("b", "sink")],
            edges: vec![],
        };

        assert!(matches!(
            validator.validate(&graph),
            Err(ValidationError::UnconnectedInput { node_id, port })
                if node_id == "b" && port == "text"
        ));
    }

    #[test]
    fn test_required_input_satisfied_by_node_data() {
        let registry = test_registry();
        let validator = WorkflowValidator::new(&registry);

        let mut sink = node("b", "sink");
        sink.data = serde_json::json!({"text": "from the editor"});

        let graph = WorkflowGraph {
            nodes: vec![sink],
            edges: vec![],
        };

        assert!(validator.validate(&graph).is_ok());
    }

    #[test]
    fn test_edge_type_mismatch() {
        let registry = test_registry();
        let validator = WorkflowValidator::new(&registry);

        // String output wired into an Image input
        let graph = WorkflowGraph {
            nodes: vec![node("a", "source"), node("b", "image-sink")],
            edges: vec![edge("e1", "a", "text", "b", "image")],
        };

        assert!(matches!(
            validator.validate(&graph),
            Err(ValidationError::TypeMismatch { edge_id, .. }) if edge_id == "e1"
        ));
    }

    #[test]
    fn test_unknown_port() {
        let registry = test_registry();
        let validator = WorkflowValidator::new(&registry);

        let graph = WorkflowGraph {
            nodes: vec![node("a", "source"), node("b", "sink")],
            edges: vec![edge("e1", "a", "nonexistent", "b", "text")],
        };

        assert!(matches!(
            validator.validate(&graph),
            Err(ValidationError::UnknownPort { port, .. }) if port == "nonexistent"
        ));
    }

    #[test]
    fn test_validate_connection() {
        assert!(validate_connection(
            &PortDataType::String,
            &PortDataType::Prompt
        ));
        assert!(!validate_connection(
            &PortDataType::Image,
            &PortDataType::String
        ));
    }
}
