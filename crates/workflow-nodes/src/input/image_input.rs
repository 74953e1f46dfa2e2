//! Image input node - provides image data (base64 encoded)
//!
//! The image is captured in the editor (canvas selection or file drop)
//! and stored in the node's data. Outputs both the image and the
//! capture bounds.

use async_trait::async_trait;
use workflow_engine::{
    ExecutionContext, InputsExt, Node, NodeCategory, NodeDefinition, NodeError, NodeInputs,
    NodeOutputs, PortDataType, PortDefinition,
};

/// Image input node
pub struct ImageInputNode {
    id: String,
    definition: NodeDefinition,
}

impl ImageInputNode {
    /// Create a new image input node instance
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            definition: Self::definition(),
        }
    }

    /// Get the node type definition
    pub fn definition() -> NodeDefinition {
        NodeDefinition {
            node_type: "image-input".to_string(),
            category: NodeCategory::Input,
            label: "Image Input".to_string(),
            description: "Provides image data (base64 encoded) from the editor".to_string(),
            inputs: vec![
                PortDefinition::optional("image_base64", "Image (Base64)", PortDataType::String),
                PortDefinition::optional("bounds", "Capture Bounds", PortDataType::Json),
            ],
            outputs: vec![
                PortDefinition::required("image", "Image", PortDataType::Image),
                PortDefinition::optional("bounds", "Bounds", PortDataType::Json),
            ],
        }
    }
}

#[async_trait]
impl Node for ImageInputNode {
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
        let image_base64 = inputs
            .get_string("image_base64")
            .map_err(|_| NodeError::MissingInput("image_base64".to_string()))?;

        let bounds = inputs
            .get("bounds")
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        let mut outputs = NodeOutputs::new();
        outputs.insert("image".to_string(), serde_json::json!(image_base64));
        outputs.insert("bounds".to_string(), bounds);

        Ok(outputs)
    }
}
