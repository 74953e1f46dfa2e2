//! Text input node - provides user-entered text
//!
//! The text value is stored in the node's data by the editor and passed
//! through as an output.

use async_trait::async_trait;
use workflow_engine::{
    ExecutionContext, InputsExt, Node, NodeCategory, NodeDefinition, NodeError, NodeInputs,
    NodeOutputs, PortDataType, PortDefinition,
};

/// Text input node
pub struct TextInputNode {
    id: String,
    definition: NodeDefinition,
}

impl TextInputNode {
    /// Create a new text input node instance
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            definition: Self::definition(),
        }
    }

    /// Get the node type definition
    pub fn definition() -> NodeDefinition {
        NodeDefinition {
            node_type: "text-input".to_string(),
            category: NodeCategory::Input,
            label: "Text Input".to_string(),
            description: "Provides user-entered text as input to the workflow".to_string(),
            inputs: vec![
                // Text can be provided via node data or connected upstream
                PortDefinition::optional("text", "Text", PortDataType::String),
            ],
            outputs: vec![PortDefinition::required("text", "Text", PortDataType::String)],
        }
    }
}

#[async_trait]
impl Node for TextInputNode {
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
        let text = inputs.get_string_opt("text").unwrap_or_default().to_string();

        let mut outputs = NodeOutputs::new();
        outputs.insert("text".to_string(), serde_json::json!(text));

        Ok(outputs)
    }
}
