//! Processing nodes - prompt assembly, generation calls, data shaping

mod generation_request;
mod json_path;
mod prompt_template;

pub use generation_request::GenerationRequestNode;
pub use json_path::JsonPathNode;
pub use prompt_template::PromptTemplateNode;
