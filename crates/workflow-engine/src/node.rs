//! Node trait and execution context
//!
//! Defines the core Node trait that all workflow nodes must implement,
//! along with the ExecutionContext handed to each execute call.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::session::RunToken;
use crate::types::NodeDefinition;

/// A value that flows through a port
pub type PortValue = serde_json::Value;

/// Resolved inputs for node execution
pub type NodeInputs = HashMap<String, PortValue>;

/// Outputs produced by node execution
pub type NodeOutputs = HashMap<String, PortValue>;

/// Errors that can occur during node execution
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Invalid input type for '{port}': expected {expected}")]
    InvalidInputType { port: String, expected: String },

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Execution cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    /// Create an execution failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }
}

/// Context available to all nodes during execution
///
/// Carries the identity of the current pass and a view onto its
/// cancellation state. Long-running nodes may poll `is_cancelled` and
/// bail out early; the scheduler itself only checks between nodes.
pub struct ExecutionContext {
    /// Unique identifier for this execution pass
    pub execution_id: String,

    /// Token for the pass this context belongs to
    token: RunToken,
}

impl ExecutionContext {
    /// Create a context for one execution pass
    pub fn new(execution_id: impl Into<String>, token: RunToken) -> Self {
        Self {
            execution_id: execution_id.into(),
            token,
        }
    }

    /// Check if this pass has been cancelled or superseded
    pub fn is_cancelled(&self) -> bool {
        !self.token.is_live()
    }
}

/// The core trait that all workflow nodes must implement
///
/// Nodes are the building blocks of workflows. Each node:
/// - Has a definition describing its ports and metadata
/// - Executes asynchronously with resolved inputs
/// - Produces outputs that flow to downstream nodes
#[async_trait]
pub trait Node: Send + Sync {
    /// Returns the node's type definition
    fn definition(&self) -> &NodeDefinition;

    /// Returns the node instance ID
    fn id(&self) -> &str;

    /// Execute the node with resolved inputs
    ///
    /// # Arguments
    /// * `inputs` - Map of port ID to resolved input values; missing keys
    ///   mean "no value provided", not an error
    /// * `context` - Pass identity and cancellation view
    ///
    /// # Returns
    /// Map of output port ID to produced values, or an error
    async fn execute(
        &self,
        inputs: NodeInputs,
        context: &ExecutionContext,
    ) -> Result<NodeOutputs, NodeError>;
}

/// Helper trait for extracting typed values from NodeInputs
pub trait InputsExt {
    /// Get a required string input
    fn get_string(&self, key: &str) -> Result<&str, NodeError>;

    /// Get an optional string input
    fn get_string_opt(&self, key: &str) -> Option<&str>;

    /// Get a required number input
    fn get_number(&self, key: &str) -> Result<f64, NodeError>;

    /// Get an optional number input with default
    fn get_number_or(&self, key: &str, default: f64) -> f64;

    /// Get a required boolean input
    fn get_bool(&self, key: &str) -> Result<bool, NodeError>;

    /// Get an optional boolean input with default
    fn get_bool_or(&self, key: &str, default: bool) -> bool;

    /// Get a required JSON object input
    fn get_object(&self, key: &str)
        -> Result<&serde_json::Map<String, serde_json::Value>, NodeError>;
}

impl InputsExt for NodeInputs {
    fn get_string(&self, key: &str) -> Result<&str, NodeError> {
        self.get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| NodeError::MissingInput(key.to_string()))
    }

    fn get_string_opt(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    fn get_number(&self, key: &str) -> Result<f64, NodeError> {
        self.get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| NodeError::MissingInput(key.to_string()))
    }

    fn get_number_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(|v| v.as_f64()).unwrap_or(default)
    }

    fn get_bool(&self, key: &str) -> Result<bool, NodeError> {
        self.get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| NodeError::MissingInput(key.to_string()))
    }

    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    fn get_object(
        &self,
        key: &str,
    ) -> Result<&serde_json::Map<String, serde_json::Value>, NodeError> {
        self.get(key)
            .and_then(|v| v.as_object())
            .ok_or_else(|| NodeError::MissingInput(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionManager;
    use serde_json::json;

    #[test]
    fn test_inputs_get_string() {
        let mut inputs = NodeInputs::new();
        inputs.insert("text".into(), json!("hello"));

        assert_eq!(inputs.get_string("text").unwrap(), "hello");
        assert!(inputs.get_string("missing").is_err());
    }

    #[test]
    fn test_inputs_get_number() {
        let mut inputs = NodeInputs::new();
        inputs.insert("count".into(), json!(42.0));

        assert_eq!(inputs.get_number("count").unwrap(), 42.0);
        assert_eq!(inputs.get_number_or("missing", 10.0), 10.0);
    }

    #[test]
    fn test_inputs_get_bool() {
        let mut inputs = NodeInputs::new();
        inputs.insert("flag".into(), json!(true));

        assert!(inputs.get_bool("flag").unwrap());
        assert!(!inputs.get_bool_or("missing", false));
    }

    #[test]
    fn test_context_cancellation_view() {
        let session = SessionManager::new();
        let context = ExecutionContext::new("exec-1", session.begin());

        assert!(!context.is_cancelled());

        session.cancel();
        assert!(context.is_cancelled());
    }

    #[test]
    fn test_context_superseded_by_new_pass() {
        let session = SessionManager::new();
        let context = ExecutionContext::new("exec-1", session.begin());

        let _second = session.begin();
        assert!(context.is_cancelled());
    }
}
