//! Text output node - terminal display node
//!
//! Passes its text through unchanged; the editor renders the cached
//! output of this node as the workflow's visible result.

use async_trait::async_trait;
use workflow_engine::{
    ExecutionContext, InputsExt, Node, NodeCategory, NodeDefinition, NodeError, NodeInputs,
    NodeOutputs, PortDataType, PortDefinition,
};

/// Text output node
pub struct TextOutputNode {
    id: String,
    definition: NodeDefinition,
}

impl TextOutputNode {
    /// Create a new text output node instance
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            definition: Self::definition(),
        }
    }

    /// Get the node type definition
    pub fn definition() -> NodeDefinition {
        NodeDefinition {
            node_type: "text-output".to_string(),
            category: NodeCategory::Output,
            label: "Text Output".to_string(),
            description: "Displays text produced by the workflow".to_string(),
            inputs: vec![PortDefinition::required("text", "Text", PortDataType::String)],
            outputs: vec![PortDefinition::optional("text", "Text", PortDataType::String)],
        }
    }
}

#[async_trait]
impl Node for TextOutputNode {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn execute(
        &self,
        inputs: NodeInputs,
        _context: &ExecutionContext,
    ) -> Result<NodeOutputs, NodeError> {
        let text = inputs.get_string("text")?;

        let mut outputs = NodeOutputs::new();
        outputs.insert("text".to_string(), serde_json::json!(text));

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workflow_engine::SessionManager;

    #[tokio::test]
    async fn test_passes_text_through() {
        let session = SessionManager::new();
        let context = ExecutionContext::new("test", session.begin());

        let node = TextOutputNode::new("out-1");
        let mut inputs = NodeInputs::new();
        inputs.insert("text".into(), serde_json::json!("final result"));

        let outputs = node.execute(inputs, &context).await.unwrap();
        assert_eq!(outputs["text"], serde_json::json!("final result"));
    }

    #[tokio::test]
    async fn test_missing_text_is_error() {
        let session = SessionManager::new();
        let context = ExecutionContext::new("test", session.begin());

        let node = TextOutputNode::new("out-1");
        let result = node.execute(NodeInputs::new(), &context).await;
        assert!(matches!(result, Err(NodeError::MissingInput(_))));
    }
}
