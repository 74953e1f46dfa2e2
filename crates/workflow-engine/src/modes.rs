//! Mode interpretation for muted and bypassed nodes
//!
//! Muted and bypassed nodes never run user code; the scheduler
//! synthesizes their outputs here so downstream consumers still see
//! well-shaped values. This mirrors the solo/mute pattern of media
//! tools: an operator can disable an expensive node without breaking
//! the shape of downstream data.

use crate::node::{NodeInputs, NodeOutputs};
use crate::types::NodeDefinition;

/// Synthesize outputs for a muted node
///
/// Every declared output slot is present and set to null, so downstream
/// inputs observe "a value that is empty" rather than "no value".
pub fn muted_outputs(definition: &NodeDefinition) -> NodeOutputs {
    definition
        .outputs
        .iter()
        .map(|port| (port.id.clone(), serde_json::Value::Null))
        .collect()
}

/// Synthesize outputs for a bypassed node by passing inputs through
///
/// For each output slot: take the first input slot with the identical
/// declared type and a resolved value; if none matches by type, fall
/// back to the input slot at the same ordinal position. Outputs with no
/// usable source are left absent.
pub fn bypassed_outputs(definition: &NodeDefinition, inputs: &NodeInputs) -> NodeOutputs {
    let mut outputs = NodeOutputs::new();

    for (position, output) in definition.outputs.iter().enumerate() {
        let by_type = definition
            .inputs
            .iter()
            .find(|input| input.data_type == output.data_type && inputs.contains_key(&input.id));

        let source = by_type.or_else(|| definition.inputs.get(position));

        if let Some(input) = source {
            if let Some(value) = inputs.get(&input.id) {
                outputs.insert(output.id.clone(), value.clone());
            }
        }
    }

    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeCategory, PortDataType, PortDefinition};
    use serde_json::json;

    fn definition(
        inputs: Vec<PortDefinition>,
        outputs: Vec<PortDefinition>,
    ) -> NodeDefinition {
        NodeDefinition {
            node_type: "test".into(),
            category: NodeCategory::Processing,
            label: "Test".into(),
            description: String::new(),
            inputs,
            outputs,
        }
    }

    #[test]
    fn test_muted_outputs_all_null() {
        let def = definition(
            vec![],
            vec![
                PortDefinition::required("image", "Image", PortDataType::Image),
                PortDefinition::optional("seed", "Seed", PortDataType::Number),
            ],
        );

        let outputs = muted_outputs(&def);
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs["image"], serde_json::Value::Null);
        assert_eq!(outputs["seed"], serde_json::Value::Null);
    }

    #[test]
    fn test_bypass_prefers_type_match() {
        // Output is an Image; second input matches by type even though
        // the first input sits at the output's ordinal position
        let def = definition(
            vec![
                PortDefinition::optional("text", "Text", PortDataType::String),
                PortDefinition::optional("picture", "Picture", PortDataType::Image),
            ],
            vec![PortDefinition::required("image", "Image", PortDataType::Image)],
        );

        let mut inputs = NodeInputs::new();
        inputs.insert("text".into(), json!("caption"));
        inputs.insert("picture".into(), json!("base64data"));

        let outputs = bypassed_outputs(&def, &inputs);
        assert_eq!(outputs["image"], json!("base64data"));
    }

    #[test]
    fn test_bypass_type_match_requires_resolved_value() {
        // The type-matching input has no value; positional fallback wins
        let def = definition(
            vec![
                PortDefinition::optional("text", "Text", PortDataType::String),
                PortDefinition::optional("picture", "Picture", PortDataType::Image),
            ],
            vec![PortDefinition::required("out", "Out", PortDataType::Image)],
        );

        let mut inputs = NodeInputs::new();
        inputs.insert("text".into(), json!("only text"));

        let outputs = bypassed_outputs(&def, &inputs);
        assert_eq!(outputs["out"], json!("only text"));
    }

    #[test]
    fn test_bypass_positional_fallback() {
        let def = definition(
            vec![
                PortDefinition::optional("a", "A", PortDataType::String),
                PortDefinition::optional("b", "B", PortDataType::String),
            ],
            vec![
                PortDefinition::required("x", "X", PortDataType::Number),
                PortDefinition::required("y", "Y", PortDataType::Number),
            ],
        );

        let mut inputs = NodeInputs::new();
        inputs.insert("a".into(), json!("first"));
        inputs.insert("b".into(), json!("second"));

        let outputs = bypassed_outputs(&def, &inputs);
        assert_eq!(outputs["x"], json!("first"));
        assert_eq!(outputs["y"], json!("second"));
    }

    #[test]
    fn test_bypass_unmatched_output_absent() {
        // One output, no inputs at all: nothing to pass through
        let def = definition(
            vec![],
            vec![PortDefinition::required("out", "Out", PortDataType::Image)],
        );

        let outputs = bypassed_outputs(&def, &NodeInputs::new());
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_bypass_positional_fallback_without_value_is_absent() {
        let def = definition(
            vec![PortDefinition::optional("a", "A", PortDataType::String)],
            vec![PortDefinition::required("out", "Out", PortDataType::Number)],
        );

        // "a" is declared but carries no resolved value
        let outputs = bypassed_outputs(&def, &NodeInputs::new());
        assert!(!outputs.contains_key("out"));
    }
}
