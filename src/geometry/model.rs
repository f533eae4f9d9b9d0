//! Models: the renderable payload a node may carry.

use crate::math::Aabb;

use super::vertex_group::{SharedVertexGroup, VertexGroup};

/// A named list of vertex groups.
///
/// Cloning a model shares its groups; subsets taken from either copy merge
/// into the same buffers.
#[derive(Clone, Debug, Default)]
pub struct Model {
    name: String,
    groups: Vec<SharedVertexGroup>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    /// Builder-style variant of [`Model::add_group`].
    pub fn with_group(mut self, group: VertexGroup) -> Self {
        self.add_group(group);
        self
    }

    /// Append a group and return its index within the model.
    pub fn add_group(&mut self, group: impl Into<SharedVertexGroup>) -> usize {
        self.groups.push(group.into());
        self.groups.len() - 1
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self, index: usize) -> Option<&SharedVertexGroup> {
        self.groups.get(index)
    }

    pub fn groups(&self) -> &[SharedVertexGroup] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Bounds of every group in model space.
    pub fn bounds(&self) -> Option<Aabb> {
        self.groups
            .iter()
            .filter_map(|g| g.borrow().bounds())
            .reduce(|a, b| a.merged(&b))
    }
}
