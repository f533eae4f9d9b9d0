//! Scenecore - A scene graph with hierarchical picking

pub mod core;
pub mod math;
pub mod geometry;
pub mod scene;
pub mod pick;
pub mod render;
