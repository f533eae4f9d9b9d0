//! Hit records from a selection pass and their resolution into [`Hit`]s.
//!
//! A hit record carries the name stack that was active when geometry fell
//! inside the pick region. Names are laid out as
//! `[node_id]` or `[node_id, group_index, primitive_index]`.

use crate::geometry::{Granularity, VertexGroup};
use crate::scene::{Node, NodeId, SceneGraph};

/// Position of the node id in a record's name list.
pub const NODE_NAME: usize = 0;
/// Position of the vertex group index within the node's model.
pub const GROUP_NAME: usize = 1;
/// Position of the primitive index within the vertex group.
pub const PRIMITIVE_NAME: usize = 2;

/// One entry of a backend hit buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct HitRecord {
    pub names: Vec<u32>,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl HitRecord {
    pub fn new(names: Vec<u32>, min_depth: f32, max_depth: f32) -> Self {
        Self {
            names,
            min_depth,
            max_depth,
        }
    }

    /// Widen the depth range to cover another hit under the same names.
    pub fn merge_depths(&mut self, min_depth: f32, max_depth: f32) {
        self.min_depth = self.min_depth.min(min_depth);
        self.max_depth = self.max_depth.max(max_depth);
    }
}

/// A resolved pick result.
#[derive(Clone, Debug)]
pub struct Hit {
    /// Node most directly containing the hit geometry.
    pub node: Node,
    /// Index of the vertex group within the node's model, when named.
    pub group_index: Option<usize>,
    /// Index of the primitive within that group, when named.
    pub primitive_index: Option<usize>,
    /// Subset holding the hit primitive. When several primitives share one
    /// name, which of them ends up here is unspecified.
    pub primitive: Option<VertexGroup>,
    pub minimum_distance: f32,
    pub maximum_distance: f32,
}

/// Turns hit records into hits against one scene graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct HitResolver {
    granularity: Granularity,
}

impl HitResolver {
    /// Primitive names are read as `granularity` primitives.
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Resolve `records` through `graph`, nearest first.
    ///
    /// Records whose node id no longer exists are skipped. A primitive name
    /// that cannot be rebuilt still yields a hit on the node, without a
    /// primitive.
    pub fn resolve(&self, graph: &SceneGraph, records: &[HitRecord]) -> Vec<Hit> {
        let mut hits: Vec<Hit> = records
            .iter()
            .filter_map(|record| self.resolve_record(graph, record))
            .collect();
        hits.sort_by(|a, b| a.minimum_distance.total_cmp(&b.minimum_distance));
        hits
    }

    fn resolve_record(&self, graph: &SceneGraph, record: &HitRecord) -> Option<Hit> {
        let Some(&id) = record.names.get(NODE_NAME) else {
            log::warn!("Skipping hit record without names");
            return None;
        };
        let Some(node) = graph.get_node(NodeId(id)) else {
            log::warn!("Skipping hit record for unknown node {}", NodeId(id));
            return None;
        };

        let group_index = record.names.get(GROUP_NAME).map(|&g| g as usize);
        let primitive_index = record.names.get(PRIMITIVE_NAME).map(|&p| p as usize);
        let primitive = match (group_index, primitive_index) {
            (Some(group), Some(index)) => self.resolve_primitive(node, group, index),
            _ => None,
        };

        Some(Hit {
            node: node.clone(),
            group_index,
            primitive_index,
            primitive,
            minimum_distance: record.min_depth,
            maximum_distance: record.max_depth,
        })
    }

    fn resolve_primitive(&self, node: &Node, group: usize, index: usize) -> Option<VertexGroup> {
        let model = node.model()?;
        let shared = model.group(group)?;
        match shared.create_primitive_subset(self.granularity, index) {
            Ok(subset) => Some(subset),
            Err(e) => {
                log::debug!(
                    "No {:?} primitive {} in group {} of {:?}: {}",
                    self.granularity,
                    index,
                    group,
                    node.id(),
                    e
                );
                None
            }
        }
    }
}
