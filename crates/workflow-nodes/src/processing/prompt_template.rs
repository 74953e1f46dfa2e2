//! Prompt template node
//!
//! Assembles a generation prompt by substituting `{placeholder}` markers
//! in a template with resolved input values. Placeholders resolve from
//! the node's other inputs, plus the entries of an optional `vars`
//! object for ad-hoc values.

use async_trait::async_trait;
use workflow_engine::{
    ExecutionContext, InputsExt, Node, NodeCategory, NodeDefinition, NodeError, NodeInputs,
    NodeOutputs, PortDataType, PortDefinition,
};

/// Prompt template node
pub struct PromptTemplateNode {
    id: String,
    definition: NodeDefinition,
}

impl PromptTemplateNode {
    /// Port ID for the template input
    pub const PORT_TEMPLATE: &'static str = "template";
    /// Port ID for the ad-hoc variables input
    pub const PORT_VARS: &'static str = "vars";
    /// Port ID for the assembled prompt output
    pub const PORT_PROMPT: &'static str = "prompt";

    /// Create a new prompt template node instance
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            definition: Self::definition(),
        }
    }

    /// Get the node type definition
    pub fn definition() -> NodeDefinition {
        NodeDefinition {
            node_type: "prompt-template".to_string(),
            category: NodeCategory::Processing,
            label: "Prompt Template".to_string(),
            description: "Substitutes {placeholder} markers in a template with input values"
                .to_string(),
            inputs: vec![
                PortDefinition::required(Self::PORT_TEMPLATE, "Template", PortDataType::String),
                PortDefinition::optional("subject", "Subject", PortDataType::String),
                PortDefinition::optional("style", "Style", PortDataType::String),
                PortDefinition::optional(Self::PORT_VARS, "Variables", PortDataType::Json),
            ],
            outputs: vec![PortDefinition::required(
                Self::PORT_PROMPT,
                "Prompt",
                PortDataType::Prompt,
            )],
        }
    }

    /// Substitute `{key}` markers with values from the inputs
    ///
    /// Unresolved markers are left in place so the operator can spot
    /// them in the rendered prompt.
    fn render(template: &str, inputs: &NodeInputs) -> String {
        let mut rendered = template.to_string();

        let mut substitutions: Vec<(String, String)> = inputs
            .iter()
            .filter(|(key, _)| key.as_str() != Self::PORT_TEMPLATE && key.as_str() != Self::PORT_VARS)
            .map(|(key, value)| (key.clone(), value_to_text(value)))
            .collect();

        if let Some(vars) = inputs.get(Self::PORT_VARS).and_then(|v| v.as_object()) {
            for (key, value) in vars {
                substitutions.push((key.clone(), value_to_text(value)));
            }
        }

        for (key, value) in substitutions {
            rendered = rendered.replace(&format!("{{{}}}", key), &value);
        }

        rendered
    }
}

/// Render a JSON value the way it should read inside a prompt
fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Node for PromptTemplateNode {
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
        let template = inputs.get_string(Self::PORT_TEMPLATE)?;
        let prompt = Self::render(template, &inputs);

        let mut outputs = NodeOutputs::new();
        outputs.insert(Self::PORT_PROMPT.to_string(), serde_json::json!(prompt));

        Ok(outputs)
    }
}
