//! Vertex geometry and its subset addressing

pub mod model;
pub mod vertex_group;

pub use model::Model;
pub use vertex_group::{Capability, Granularity, SharedVertexGroup, VertexGroup, VertexGroupKind};
