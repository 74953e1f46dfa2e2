//! Generation request node
//!
//! Sends a prompt and generation parameters to an HTTP generation
//! service and returns the response payload. The endpoint lives in the
//! node's data so an operator can point a workflow at a local or remote
//! backend without rewiring it.

use async_trait::async_trait;
use workflow_engine::{
    ExecutionContext, InputsExt, Node, NodeCategory, NodeDefinition, NodeError, NodeInputs,
    NodeOutputs, PortDataType, PortDefinition,
};

/// Generation request node
pub struct GenerationRequestNode {
    id: String,
    definition: NodeDefinition,
}

impl GenerationRequestNode {
    /// Create a new generation request node instance
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            definition: Self::definition(),
        }
    }

    /// Get the node type definition
    pub fn definition() -> NodeDefinition {
        NodeDefinition {
            node_type: "generation-request".to_string(),
            category: NodeCategory::Processing,
            label: "Generation Request".to_string(),
            description: "Sends a prompt to a generation service and returns the response"
                .to_string(),
            inputs: vec![
                PortDefinition::required("prompt", "Prompt", PortDataType::Prompt),
                PortDefinition::optional("endpoint", "Endpoint", PortDataType::String),
                PortDefinition::optional("parameters", "Parameters", PortDataType::Json),
            ],
            outputs: vec![PortDefinition::required(
                "response",
                "Response",
                PortDataType::Json,
            )],
        }
    }

    /// Build the JSON request body from prompt and parameters
    fn request_body(prompt: &str, parameters: Option<&serde_json::Value>) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("prompt".to_string(), serde_json::json!(prompt));

        if let Some(params) = parameters.and_then(|p| p.as_object()) {
            for (key, value) in params {
                body.insert(key.clone(), value.clone());
            }
        }

        serde_json::Value::Object(body)
    }
}

#[async_trait]
impl Node for GenerationRequestNode {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn execute(
        &self,
        inputs: NodeInputs,
        context: &ExecutionContext,
    ) -> Result<NodeOutputs, NodeError> {
        let prompt = inputs.get_string("prompt")?;
        let endpoint = inputs.get_string("endpoint")?;

        // Generation calls are the expensive part of a pass; skip the
        // request if the pass was already superseded
        if context.is_cancelled() {
            return Err(NodeError::Cancelled);
        }

        let body = Self::request_body(prompt, inputs.get("parameters"));

        log::debug!(
            "generation request {} ({}): posting to {}",
            self.id,
            context.execution_id,
            endpoint
        );

        let client = reqwest::Client::new();
        let http_response = client
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| NodeError::ExecutionFailed(format!("Generation request failed: {}", e)))?;

        if !http_response.status().is_success() {
            let status = http_response.status();
            let error = http_response.text().await.unwrap_or_default();
            return Err(NodeError::ExecutionFailed(format!(
                "Generation service returned {}: {}",
                status, error
            )));
        }

        let json: serde_json::Value = http_response
            .json()
            .await
            .map_err(|e| NodeError::ExecutionFailed(format!("Failed to parse response: {}", e)))?;

        let mut outputs = NodeOutputs::new();
        outputs.insert("response".to_string(), json);

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use workflow_engine::SessionManager;

    // Exercising the HTTP path needs a live service; these cover the
    // definition and request assembly.

    #[test]
    fn test_definition_ports() {
        let def = GenerationRequestNode::definition();
        assert_eq!(def.node_type, "generation-request");
        assert_eq!(def.inputs.len(), 3);
        assert!(def.inputs[0].required);
        assert_eq!(def.outputs[0].id, "response");
    }

    #[test]
    fn test_request_body_merges_parameters() {
        let params = json!({"steps": 20, "seed": 42});
        let body = GenerationRequestNode::request_body("a lighthouse", Some(&params));

        assert_eq!(body["prompt"], json!("a lighthouse"));
        assert_eq!(body["steps"], json!(20));
        assert_eq!(body["seed"], json!(42));
    }

    #[test]
    fn test_request_body_without_parameters() {
        let body = GenerationRequestNode::request_body("a lighthouse", None);
        assert_eq!(body, json!({"prompt": "a lighthouse"}));
    }

    #[tokio::test]
    async fn test_cancelled_pass_skips_request() {
        let session = SessionManager::new();
        let context = ExecutionContext::new("test", session.begin());
        session.cancel();

        let node = GenerationRequestNode::new("gen-1");
        let mut inputs = NodeInputs::new();
        inputs.insert("prompt".into(), json!("a lighthouse"));
        inputs.insert("endpoint".into(), json!("http://localhost:7860/generate"));

        let result = node.execute(inputs, &context).await;
        assert!(matches!(result, Err(NodeError::Cancelled)));
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_error() {
        let session = SessionManager::new();
        let context = ExecutionContext::new("test", session.begin());

        let node = GenerationRequestNode::new("gen-1");
        let mut inputs = NodeInputs::new();
        inputs.insert("prompt".into(), json!("a lighthouse"));

        let result = node.execute(inputs, &context).await;
        assert!(matches!(result, Err(NodeError::MissingInput(_))));
    }
}
