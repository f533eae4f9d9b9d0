//! Rendering backend boundary: transform and name stacks, scene walk,
//! software selection

pub mod backend;
pub mod selection;
pub mod stack;

pub use backend::{render_scene, RenderBackend, RenderPass, RenderStats};
pub use selection::{select, SelectionBuffer};
pub use stack::MatrixStack;
