//! Input nodes - sources of data for workflows

mod image_input;
mod text_input;

pub use image_input::ImageInputNode;
pub use text_input::TextInputNode;
