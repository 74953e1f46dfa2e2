//! Workflow Nodes
//!
//! Built-in node implementations for the Easel workflow engine. Each
//! node is an atomic building block that can be composed into
//! workflows.
//!
//! # Categories
//!
//! - **Input**: Nodes that accept user input or external data
//! - **Processing**: Nodes that transform data (templates, generation
//!   calls, JSON shaping)
//! - **Output**: Nodes that display or export results

pub mod input;
pub mod output;
pub mod processing;

// Re-export all nodes for convenience
pub use input::*;
pub use output::*;
pub use processing::*;

use workflow_engine::NodeRegistry;

/// Register every built-in node type
pub fn register_builtins(registry: &mut NodeRegistry) {
    // Input nodes
    registry.register(TextInputNode::definition(), |id| {
        Box::new(TextInputNode::new(id))
    });
    registry.register(ImageInputNode::definition(), |id| {
        Box::new(ImageInputNode::new(id))
    });

    // Processing nodes
    registry.register(PromptTemplateNode::definition(), |id| {
        Box::new(PromptTemplateNode::new(id))
    });
    registry.register(GenerationRequestNode::definition(), |id| {
        Box::new(GenerationRequestNode::new(id))
    });
    registry.register(JsonPathNode::definition(), |id| {
        Box::new(JsonPathNode::new(id))
    });

    // Output nodes
    registry.register(TextOutputNode::definition(), |id| {
        Box::new(TextOutputNode::new(id))
    });
}

/// A registry pre-populated with every built-in node type
pub fn default_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    register_builtins(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use workflow_engine::{
        GraphEdge, GraphNode, NodeMode, Position, VecEventSink, WorkflowEngine, WorkflowGraph,
    };

    #[test]
    fn test_default_registry_has_all_builtins() {
        let registry = default_registry();

        assert_eq!(registry.len(), 6);
        assert!(registry.has_node_type("text-input"));
        assert!(registry.has_node_type("image-input"));
        assert!(registry.has_node_type("prompt-template"));
        assert!(registry.has_node_type("generation-request"));
        assert!(registry.has_node_type("json-path"));
        assert!(registry.has_node_type("text-output"));
    }

    #[test]
    fn test_factories_match_registered_types() {
        let registry = default_registry();

        for definition in registry.all_definitions() {
            let node = registry
                .create_node(&definition.node_type, "instance-1")
                .unwrap();
            assert_eq!(node.definition().node_type, definition.node_type);
            assert_eq!(node.id(), "instance-1");
        }
    }

    fn node(id: &str, node_type: &str, data: serde_json::Value) -> GraphNode {
        GraphNode {
            id: id.into(),
            node_type: node_type.into(),
            mode: NodeMode::Normal,
            position: Position::default(),
            data,
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

    #[tokio::test]
    async fn test_builtin_chain_end_to_end() {
        // text-input -> prompt-template -> text-output
        let graph = WorkflowGraph {
            nodes: vec![
                node(
                    "subject",
                    "text-input",
                    serde_json::json!({"text": "a lighthouse"}),
                ),
                node(
                    "template",
                    "prompt-template",
                    serde_json::json!({"template": "{subject}, golden hour"}),
                ),
                node("display", "text-output", serde_json::Value::Null),
            ],
            edges: vec![
                edge("e1", "subject", "text", "template", "subject"),
                edge("e2", "template", "prompt", "display", "text"),
            ],
        };

        let engine = WorkflowEngine::new(default_registry());
        let sink = VecEventSink::new();

        let summary = engine.execute(&graph, &sink).await.unwrap();
        assert_eq!(summary.completed, vec!["subject", "template", "display"]);

        let results = engine.results().await;
        assert_eq!(
            results["display"]["text"],
            serde_json::json!("a lighthouse, golden hour")
        );
    }

    #[tokio::test]
    async fn test_builtin_graph_validates() {
        let graph = WorkflowGraph {
            nodes: vec![
                node(
                    "subject",
                    "text-input",
                    serde_json::json!({"text": "a lighthouse"}),
                ),
                node("display", "text-output", serde_json::Value::Null),
            ],
            edges: vec![edge("e1", "subject", "text", "display", "text")],
        };

        let engine = WorkflowEngine::new(default_registry());
        assert!(engine.validate(&graph).is_ok());
    }
}
