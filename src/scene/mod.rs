//! Scene graph: node identity, hierarchy and traversal

pub mod graph;
pub mod node;
pub mod traversal;

pub use graph::{SceneGraph, ROOT_ID};
pub use node::{Node, NodeId, Transform};
pub use traversal::Traversal;
