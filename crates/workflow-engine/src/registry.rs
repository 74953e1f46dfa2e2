//! Node registry - manages available node types
//!
//! The registry stores node definitions alongside factories and creates
//! node instances for workflow execution. Registration is open: node
//! crates (and tests) plug in their own types instead of the engine
//! hard-coding a built-in list.

use std::collections::HashMap;

use crate::node::Node;
use crate::types::NodeDefinition;

/// Factory that produces a node instance for a given instance id
pub type NodeFactory = Box<dyn Fn(&str) -> Box<dyn Node> + Send + Sync>;

struct RegistryEntry {
    definition: NodeDefinition,
    factory: NodeFactory,
}

/// Registry of available node types
///
/// Stores node definitions and provides factory methods for creating
/// node instances during workflow execution.
pub struct NodeRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl NodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a node type with its factory
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register<F>(&mut self, definition: NodeDefinition, factory: F)
    where
        F: Fn(&str) -> Box<dyn Node> + Send + Sync + 'static,
    {
        self.entries.insert(
            definition.node_type.clone(),
            RegistryEntry {
                definition,
                factory: Box::new(factory),
            },
        );
    }

    /// Get a node definition by type
    pub fn get_definition(&self, node_type: &str) -> Option<&NodeDefinition> {
        self.entries.get(node_type).map(|e| &e.definition)
    }

    /// Get all registered node definitions
    pub fn all_definitions(&self) -> Vec<NodeDefinition> {
        self.entries.values().map(|e| e.definition.clone()).collect()
    }

    /// Get definitions grouped by category, for the editor palette
    pub fn definitions_by_category(&self) -> HashMap<String, Vec<NodeDefinition>> {
        let mut grouped: HashMap<String, Vec<NodeDefinition>> = HashMap::new();

        for entry in self.entries.values() {
            let category = format!("{:?}", entry.definition.category).to_lowercase();
            grouped
                .entry(category)
                .or_default()
                .push(entry.definition.clone());
        }

        grouped
    }

    /// Create a node instance by type
    ///
    /// # Arguments
    /// * `node_type` - The type of node to create (e.g., "text-input")
    /// * `id` - The instance ID for the node
    ///
    /// # Returns
    /// A boxed node instance, or None if the type is unknown
    pub fn create_node(&self, node_type: &str, id: &str) -> Option<Box<dyn Node>> {
        self.entries.get(node_type).map(|e| (e.factory)(id))
    }

    /// Check if a node type is registered
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// Get the number of registered node types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
