//! JSON path node
//!
//! Extracts a value from JSON input using a dotted path expression.
//! Useful for pulling a single field (an image URL, a token count) out
//! of a generation service response.

use async_trait::async_trait;
use workflow_engine::{
    ExecutionContext, InputsExt, Node, NodeCategory, NodeDefinition, NodeError, NodeInputs,
    NodeOutputs, PortDataType, PortDefinition,
};

/// JSON path node
///
/// # Path syntax
/// Dot-separated segments; a numeric segment indexes into an array:
/// - `"name"` - the "name" field
/// - `"data.items"` - nested field access
/// - `"choices.0.text"` - array element, then field
pub struct JsonPathNode {
    id: String,
    definition: NodeDefinition,
}

impl JsonPathNode {
    /// Create a new JSON path node instance
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            definition: Self::definition(),
        }
    }

    /// Get the node type definition
    pub fn definition() -> NodeDefinition {
        NodeDefinition {
            node_type: "json-path".to_string(),
            category: NodeCategory::Processing,
            label: "JSON Path".to_string(),
            description: "Extracts a value from JSON using a dotted path".to_string(),
            inputs: vec![
                PortDefinition::required("json", "JSON", PortDataType::Json),
                PortDefinition::optional("path", "Path", PortDataType::String),
            ],
            outputs: vec![
                PortDefinition::optional("value", "Value", PortDataType::Any),
                PortDefinition::optional("found", "Found", PortDataType::Boolean),
            ],
        }
    }

    /// Walk a dotted path through a JSON value
    fn extract(json: &serde_json::Value, path: &str) -> Option<serde_json::Value> {
        if path.is_empty() {
            return Some(json.clone());
        }

        let mut current = json;
        for segment in path.split('.') {
            current = match segment.parse::<usize>() {
                Ok(index) => current.get(index)?,
                Err(_) => current.get(segment)?,
            };
        }

        Some(current.clone())
    }
}

#[async_trait]
impl Node for JsonPathNode {
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
        let json = inputs
            .get("json")
            .ok_or_else(|| NodeError::MissingInput("json".to_string()))?;
        let path = inputs.get_string_opt("path").unwrap_or_default();

        let (value, found) = match Self::extract(json, path) {
            Some(v) => (v, true),
            None => (serde_json::Value::Null, false),
        };

        log::debug!("json-path {}: path '{}' found={}", self.id, path, found);

        let mut outputs = NodeOutputs::new();
        outputs.insert("value".to_string(), value);
        outputs.insert("found".to_string(), serde_json::json!(found));

        Ok(outputs)
    }
}
