//! Vertex groups: flat per-vertex attribute buffers with subset extraction
//! and merge-back addressing.
//!
//! Every vertex occupies three consecutive floats in each of the position,
//! normal and color arrays. A flat (`Array`) group addresses vertices by
//! their slot in those arrays; an `Indexed` group addresses them through an
//! index buffer, so element `k` reads its attributes at `indices[k] * 3`.
//!
//! A subset is a dense copy of a slice of its parent. It keeps a weak link to
//! the parent plus the offset it was taken from, and nothing flows back until
//! [`VertexGroup::merge_with_parent`] is called.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};
use crate::math::Aabb;

/// Floats per vertex in every attribute array.
pub const COMPONENTS: usize = 3;

/// The kind of primitive a pick or subset addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Vertex,
    Edge,
    #[default]
    Face,
}

impl Granularity {
    /// Number of consecutive elements one primitive spans.
    pub fn elements_per_primitive(self) -> usize {
        match self {
            Granularity::Vertex => 1,
            Granularity::Edge => 2,
            Granularity::Face => 3,
        }
    }

    /// First element of primitive `index`. Edges overlap (`[i, i + 1]`),
    /// faces do not (`[3i, 3i + 1, 3i + 2]`).
    fn first_element(self, index: usize) -> Option<usize> {
        match self {
            Granularity::Vertex | Granularity::Edge => Some(index),
            Granularity::Face => index.checked_mul(3),
        }
    }
}

/// Optional operations a vertex group variant may lack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    EdgeSubset,
    Merge,
}

/// Layout tag of a vertex group.
#[derive(Clone, Debug, PartialEq)]
pub enum VertexGroupKind {
    /// Vertex `i` lives at slot `i` of the attribute arrays.
    Array,
    /// Element `k` lives at slot `indices[k]` of the attribute arrays.
    Indexed { indices: Vec<u32> },
}

#[derive(Clone, Debug)]
struct SubsetLink {
    parent: Weak<RefCell<VertexGroup>>,
    /// Float-array offset of the first copied vertex (flat parents) or the
    /// first copied index slot (indexed parents).
    index_within_parent: usize,
}

/// A buffer of per-vertex position, normal and color data.
#[derive(Clone, Debug)]
pub struct VertexGroup {
    positions: Vec<f32>,
    normals: Vec<f32>,
    colors: Vec<f32>,
    kind: VertexGroupKind,
    subset: Option<SubsetLink>,
}

impl VertexGroup {
    /// Create a flat group. All three arrays must hold the same whole number
    /// of vertices.
    pub fn array(positions: Vec<f32>, normals: Vec<f32>, colors: Vec<f32>) -> Result<Self> {
        validate_attributes(&positions, &normals, &colors)?;
        Ok(Self {
            positions,
            normals,
            colors,
            kind: VertexGroupKind::Array,
            subset: None,
        })
    }

    /// Create an indexed group. Every index must name an existing vertex.
    pub fn indexed(
        positions: Vec<f32>,
        normals: Vec<f32>,
        colors: Vec<f32>,
        indices: Vec<u32>,
    ) -> Result<Self> {
        validate_attributes(&positions, &normals, &colors)?;
        let vertex_count = positions.len() / COMPONENTS;
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(Error::InvalidArgument(format!(
                "index {bad} out of range for {vertex_count} vertices"
            )));
        }
        Ok(Self {
            positions,
            normals,
            colors,
            kind: VertexGroupKind::Indexed { indices },
            subset: None,
        })
    }

    /// Flat group from positions, with +Z normals and white colors.
    pub fn from_positions(points: &[Vec3]) -> Self {
        let positions = points.iter().flat_map(|p| p.to_array()).collect();
        Self {
            positions,
            normals: points.iter().flat_map(|_| Vec3::Z.to_array()).collect(),
            colors: vec![1.0; points.len() * COMPONENTS],
            kind: VertexGroupKind::Array,
            subset: None,
        }
    }

    /// Indexed group from positions, with +Z normals and white colors.
    pub fn indexed_from_positions(points: &[Vec3], indices: Vec<u32>) -> Result<Self> {
        let flat = Self::from_positions(points);
        Self::indexed(flat.positions, flat.normals, flat.colors, indices)
    }

    pub fn kind(&self) -> &VertexGroupKind {
        &self.kind
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.kind, VertexGroupKind::Indexed { .. })
    }

    pub fn indices(&self) -> Option<&[u32]> {
        match &self.kind {
            VertexGroupKind::Array => None,
            VertexGroupKind::Indexed { indices } => Some(indices),
        }
    }

    /// Whether this variant implements `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        match (&self.kind, capability) {
            (VertexGroupKind::Array, _) => true,
            (VertexGroupKind::Indexed { .. }, Capability::EdgeSubset | Capability::Merge) => false,
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn positions_mut(&mut self) -> &mut [f32] {
        &mut self.positions
    }

    pub fn normals_mut(&mut self) -> &mut [f32] {
        &mut self.normals
    }

    pub fn colors_mut(&mut self) -> &mut [f32] {
        &mut self.colors
    }

    /// Raw position bytes, ready for a vertex buffer upload.
    pub fn positions_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Number of vertices stored in the attribute arrays.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / COMPONENTS
    }

    /// Number of addressable elements: vertices for flat groups, index
    /// slots for indexed ones.
    pub fn element_count(&self) -> usize {
        match &self.kind {
            VertexGroupKind::Array => self.vertex_count(),
            VertexGroupKind::Indexed { indices } => indices.len(),
        }
    }

    pub fn position(&self, vertex: usize) -> Option<Vec3> {
        read_vec3(&self.positions, vertex)
    }

    pub fn normal(&self, vertex: usize) -> Option<Vec3> {
        read_vec3(&self.normals, vertex)
    }

    pub fn color(&self, vertex: usize) -> Option<Vec3> {
        read_vec3(&self.colors, vertex)
    }

    /// Overwrite one vertex position. Returns false if `vertex` is out of range.
    pub fn set_position(&mut self, vertex: usize, value: Vec3) -> bool {
        write_vec3(&mut self.positions, vertex, value)
    }

    pub fn set_normal(&mut self, vertex: usize, value: Vec3) -> bool {
        write_vec3(&mut self.normals, vertex, value)
    }

    pub fn set_color(&mut self, vertex: usize, value: Vec3) -> bool {
        write_vec3(&mut self.colors, vertex, value)
    }

    pub fn is_subset(&self) -> bool {
        self.subset.is_some()
    }

    /// Where this subset was taken from in its parent; `None` for a group
    /// that is not a subset. For flat parents this is the float-array offset
    /// `vertex_index * 3`, for indexed parents the first index slot.
    pub fn index_within_parent(&self) -> Option<usize> {
        self.subset.as_ref().map(|link| link.index_within_parent)
    }

    /// The parent this subset was taken from, if it is still alive.
    pub fn parent(&self) -> Option<SharedVertexGroup> {
        self.subset
            .as_ref()
            .and_then(|link| link.parent.upgrade())
            .map(SharedVertexGroup)
    }

    /// How many primitives of `granularity` this group can address.
    pub fn primitive_count(&self, granularity: Granularity) -> usize {
        let elements = self.element_count();
        match granularity {
            Granularity::Vertex => elements,
            Granularity::Edge if self.supports(Capability::EdgeSubset) => elements.saturating_sub(1),
            Granularity::Edge => 0,
            Granularity::Face => elements / 3,
        }
    }

    /// Positions of primitive `index`, resolved through the index buffer
    /// when there is one.
    pub fn primitive_positions(&self, granularity: Granularity, index: usize) -> Result<Vec<Vec3>> {
        if granularity == Granularity::Edge && !self.supports(Capability::EdgeSubset) {
            return Err(Error::NotSupported("edge primitives of indexed vertex groups".into()));
        }
        let start = granularity
            .first_element(index)
            .ok_or_else(|| out_of_range(index, 1, self.element_count()))?;
        let elements = self.element_range(start, granularity.elements_per_primitive())?;
        Ok(elements
            .into_iter()
            .filter_map(|vertex| self.position(vertex))
            .collect())
    }

    /// Positions of every element in order, resolved through the index
    /// buffer when there is one.
    pub fn element_positions(&self) -> Vec<Vec3> {
        match &self.kind {
            VertexGroupKind::Array => (0..self.vertex_count()).filter_map(|v| self.position(v)).collect(),
            VertexGroupKind::Indexed { indices } => {
                indices.iter().filter_map(|&i| self.position(i as usize)).collect()
            }
        }
    }

    /// Bounds of every stored vertex.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points((0..self.vertex_count()).filter_map(|v| self.position(v)))
    }

    /// Vertex slots of `length` elements starting at element `start`.
    fn element_range(&self, start: usize, length: usize) -> Result<Vec<usize>> {
        let available = self.element_count();
        let end = start
            .checked_add(length)
            .filter(|&end| length > 0 && end <= available)
            .ok_or_else(|| out_of_range(start, length, available))?;
        Ok(match &self.kind {
            VertexGroupKind::Array => (start..end).collect(),
            VertexGroupKind::Indexed { indices } => {
                indices[start..end].iter().map(|&i| i as usize).collect()
            }
        })
    }

    /// Write this subset's attributes back into its parent at the recorded
    /// offset. Positions, normals and colors all use the same float offset.
    pub fn merge_with_parent(&self) -> Result<()> {
        if !self.supports(Capability::Merge) {
            return Err(Error::NotSupported("merging indexed vertex groups".into()));
        }
        let link = self
            .subset
            .as_ref()
            .ok_or_else(|| Error::InvalidOperation("vertex group is not a subset".into()))?;
        let parent = link
            .parent
            .upgrade()
            .ok_or_else(|| Error::InvalidOperation("parent vertex group was dropped".into()))?;
        let mut parent = parent
            .try_borrow_mut()
            .map_err(|_| Error::InvalidOperation("parent vertex group is borrowed".into()))?;

        let offset = link.index_within_parent;
        let end = offset + self.positions.len();
        if end > parent.positions.len() {
            return Err(Error::InvalidOperation(format!(
                "subset range {offset}..{end} exceeds parent of {} floats",
                parent.positions.len()
            )));
        }

        parent.positions[offset..end].copy_from_slice(&self.positions);
        parent.normals[offset..end].copy_from_slice(&self.normals);
        parent.colors[offset..end].copy_from_slice(&self.colors);
        Ok(())
    }
}

/// Shared handle to a vertex group that subsets can link back to.
#[derive(Clone, Debug)]
pub struct SharedVertexGroup(Rc<RefCell<VertexGroup>>);

impl SharedVertexGroup {
    pub fn new(group: VertexGroup) -> Self {
        Self(Rc::new(RefCell::new(group)))
    }

    pub fn borrow(&self) -> Ref<'_, VertexGroup> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, VertexGroup> {
        self.0.borrow_mut()
    }

    /// True if both handles point at the same group.
    pub fn ptr_eq(&self, other: &SharedVertexGroup) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Copy `length` elements starting at element `index` into a new subset.
    ///
    /// Flat parents copy the vertex slice directly and record
    /// `index_within_parent = index * 3`. Indexed parents copy the index
    /// slice verbatim and gather attributes through those index values.
    pub fn create_subset(&self, index: usize, length: usize) -> Result<VertexGroup> {
        let parent = self.0.borrow();
        let vertices = parent.element_range(index, length)?;

        let mut positions = Vec::with_capacity(length * COMPONENTS);
        let mut normals = Vec::with_capacity(length * COMPONENTS);
        let mut colors = Vec::with_capacity(length * COMPONENTS);
        for &v in &vertices {
            let slot = v * COMPONENTS..(v + 1) * COMPONENTS;
            positions.extend_from_slice(&parent.positions[slot.clone()]);
            normals.extend_from_slice(&parent.normals[slot.clone()]);
            colors.extend_from_slice(&parent.colors[slot]);
        }

        let (kind, index_within_parent) = match &parent.kind {
            VertexGroupKind::Array => (VertexGroupKind::Array, index * COMPONENTS),
            VertexGroupKind::Indexed { indices } => (
                VertexGroupKind::Indexed {
                    indices: indices[index..index + length].to_vec(),
                },
                index,
            ),
        };

        Ok(VertexGroup {
            positions,
            normals,
            colors,
            kind,
            subset: Some(SubsetLink {
                parent: Rc::downgrade(&self.0),
                index_within_parent,
            }),
        })
    }

    /// One-vertex subset at element `index`.
    pub fn create_vertex_subset(&self, index: usize) -> Result<VertexGroup> {
        self.create_primitive_subset(Granularity::Vertex, index)
    }

    /// Two-vertex subset at elements `[index, index + 1]`. Not supported for
    /// indexed groups.
    pub fn create_edge_subset(&self, index: usize) -> Result<VertexGroup> {
        self.create_primitive_subset(Granularity::Edge, index)
    }

    /// Three-vertex subset at elements `[3 * index, 3 * index + 2]`.
    pub fn create_face_subset(&self, index: usize) -> Result<VertexGroup> {
        self.create_primitive_subset(Granularity::Face, index)
    }

    pub fn create_primitive_subset(&self, granularity: Granularity, index: usize) -> Result<VertexGroup> {
        if granularity == Granularity::Edge && !self.0.borrow().supports(Capability::EdgeSubset) {
            return Err(Error::NotSupported("edge subsets of indexed vertex groups".into()));
        }
        let start = granularity.first_element(index).ok_or_else(|| {
            out_of_range(index, granularity.elements_per_primitive(), self.0.borrow().element_count())
        })?;
        self.create_subset(start, granularity.elements_per_primitive())
    }
}

impl From<VertexGroup> for SharedVertexGroup {
    fn from(group: VertexGroup) -> Self {
        SharedVertexGroup::new(group)
    }
}

fn validate_attributes(positions: &[f32], normals: &[f32], colors: &[f32]) -> Result<()> {
    if positions.len() % COMPONENTS != 0 {
        return Err(Error::InvalidArgument(format!(
            "position array of {} floats is not a whole number of vertices",
            positions.len()
        )));
    }
    if normals.len() != positions.len() || colors.len() != positions.len() {
        return Err(Error::InvalidArgument(format!(
            "attribute lengths differ: {} positions, {} normals, {} colors",
            positions.len(),
            normals.len(),
            colors.len()
        )));
    }
    Ok(())
}

fn out_of_range(start: usize, length: usize, available: usize) -> Error {
    Error::InvalidArgument(format!(
        "elements {start}..{} out of range for {available} elements",
        start.saturating_add(length)
    ))
}

fn read_vec3(data: &[f32], vertex: usize) -> Option<Vec3> {
    let start = vertex.checked_mul(COMPONENTS)?;
    data.get(start..start + COMPONENTS).map(Vec3::from_slice)
}

fn write_vec3(data: &mut [f32], vertex: usize, value: Vec3) -> bool {
    let Some(start) = vertex.checked_mul(COMPONENTS) else {
        return false;
    };
    match data.get_mut(start..start + COMPONENTS) {
        Some(slot) => {
            slot.copy_from_slice(&value.to_array());
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Triangle soup where vertex `i` sits at (i, 10i, 100i).
    fn soup(vertices: usize) -> SharedVertexGroup {
        let points: Vec<Vec3> = (0..vertices)
            .map(|i| Vec3::new(i as f32, 10.0 * i as f32, 100.0 * i as f32))
            .collect();
        let mut group = VertexGroup::from_positions(&points);
        for i in 0..vertices {
            group.set_normal(i, Vec3::splat(-(i as f32)));
            group.set_color(i, Vec3::new(0.1 * i as f32, 0.0, 1.0));
        }
        SharedVertexGroup::new(group)
    }

    fn indexed_quad() -> SharedVertexGroup {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        SharedVertexGroup::new(VertexGroup::indexed_from_positions(&points, vec![0, 1, 2, 3]).unwrap())
    }

    #[test]
    fn test_array_validation() {
        assert!(VertexGroup::array(vec![0.0; 4], vec![0.0; 4], vec![0.0; 4]).is_err());
        assert!(VertexGroup::array(vec![0.0; 6], vec![0.0; 3], vec![0.0; 6]).is_err());
        let g = VertexGroup::array(vec![0.0; 6], vec![0.0; 6], vec![0.0; 6]).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert!(!g.is_subset());
        assert_eq!(g.index_within_parent(), None);
        assert!(g.parent().is_none());
    }

    #[test]
    fn test_indexed_validation() {
        let err = VertexGroup::indexed_from_positions(&[Vec3::ZERO], vec![0, 1]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_vertex_subset() {
        let parent = soup(6);
        let sub = parent.create_vertex_subset(4).unwrap();
        assert!(sub.is_subset());
        assert_eq!(sub.index_within_parent(), Some(12));
        assert_eq!(sub.positions(), &[4.0, 40.0, 400.0]);
        assert_eq!(sub.positions().len(), 3);
        assert!(sub.parent().unwrap().ptr_eq(&parent));
    }

    #[test]
    fn test_edge_subset_is_consecutive() {
        let parent = soup(6);
        let sub = parent.create_edge_subset(2).unwrap();
        assert_eq!(sub.vertex_count(), 2);
        assert_eq!(sub.position(0), Some(Vec3::new(2.0, 20.0, 200.0)));
        assert_eq!(sub.position(1), Some(Vec3::new(3.0, 30.0, 300.0)));
        assert_eq!(sub.index_within_parent(), Some(6));
    }

    #[test]
    fn test_face_subset_uses_triangle_soup_layout() {
        let parent = soup(6);
        let sub = parent.create_face_subset(1).unwrap();
        assert_eq!(sub.vertex_count(), 3);
        assert_eq!(sub.position(0), Some(Vec3::new(3.0, 30.0, 300.0)));
        assert_eq!(sub.position(2), Some(Vec3::new(5.0, 50.0, 500.0)));
        assert_eq!(sub.index_within_parent(), Some(9));
        assert_eq!(sub.normal(0), Some(Vec3::splat(-3.0)));
    }

    #[test]
    fn test_general_subset_length() {
        let parent = soup(6);
        let sub = parent.create_subset(1, 4).unwrap();
        assert_eq!(sub.positions().len(), 12);
        assert_eq!(sub.normals().len(), 12);
        assert_eq!(sub.colors().len(), 12);
        assert_eq!(sub.index_within_parent(), Some(3));
    }

    #[test]
    fn test_subset_out_of_range() {
        let parent = soup(6);
        assert!(matches!(parent.create_face_subset(2), Err(Error::InvalidArgument(_))));
        assert!(matches!(parent.create_edge_subset(5), Err(Error::InvalidArgument(_))));
        assert!(matches!(parent.create_subset(0, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(parent.create_face_subset(usize::MAX), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_merge_round_trip() {
        let parent = soup(6);
        let before = parent.borrow().clone();

        let mut sub = parent.create_face_subset(1).unwrap();
        sub.set_position(1, Vec3::new(-1.0, -2.0, -3.0));
        sub.set_normal(1, Vec3::Y);
        sub.set_color(2, Vec3::new(0.5, 0.25, 0.125));

        // Edits are invisible until merged.
        assert_eq!(parent.borrow().position(4), before.position(4));

        sub.merge_with_parent().unwrap();

        let after = parent.borrow();
        assert_eq!(after.position(4), Some(Vec3::new(-1.0, -2.0, -3.0)));
        assert_eq!(after.normal(4), Some(Vec3::Y));
        assert_eq!(after.color(5), Some(Vec3::new(0.5, 0.25, 0.125)));
        for v in [0, 1, 2] {
            assert_eq!(after.position(v), before.position(v));
            assert_eq!(after.normal(v), before.normal(v));
            assert_eq!(after.color(v), before.color(v));
        }
        assert_eq!(after.color(3), before.color(3));
    }

    #[test]
    fn test_merge_vertex_subset_color_offset() {
        let parent = soup(4);
        let mut sub = parent.create_vertex_subset(3).unwrap();
        sub.set_color(0, Vec3::new(9.0, 8.0, 7.0));
        sub.merge_with_parent().unwrap();
        assert_eq!(parent.borrow().color(3), Some(Vec3::new(9.0, 8.0, 7.0)));
        assert_eq!(parent.borrow().color(1), Some(Vec3::new(0.1, 0.0, 1.0)));
    }

    #[test]
    fn test_merge_non_subset_is_invalid_operation() {
        let parent = soup(3);
        let err = parent.borrow().merge_with_parent().unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));
    }

    #[test]
    fn test_merge_after_parent_dropped() {
        let parent = soup(3);
        let sub = parent.create_vertex_subset(0).unwrap();
        drop(parent);
        assert!(sub.parent().is_none());
        assert!(matches!(sub.merge_with_parent(), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_merge_while_parent_borrowed() {
        let parent = soup(3);
        let sub = parent.create_vertex_subset(0).unwrap();
        let _guard = parent.borrow();
        assert!(matches!(sub.merge_with_parent(), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_indexed_face_subset_keeps_original_indices() {
        let parent = indexed_quad();
        let sub = parent.create_face_subset(0).unwrap();
        assert_eq!(sub.indices(), Some(&[0, 1, 2][..]));
        assert_eq!(sub.vertex_count(), 3);
        assert_eq!(sub.position(0), Some(Vec3::new(0.0, 0.0, 0.0)));
        assert_eq!(sub.position(1), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(sub.position(2), Some(Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(sub.index_within_parent(), Some(0));
    }

    #[test]
    fn test_indexed_vertex_subset_gathers_through_index() {
        let points = [Vec3::X, Vec3::Y, Vec3::Z];
        let parent = SharedVertexGroup::new(
            VertexGroup::indexed_from_positions(&points, vec![2, 0, 1, 2]).unwrap(),
        );
        let sub = parent.create_vertex_subset(3).unwrap();
        assert_eq!(sub.indices(), Some(&[2][..]));
        assert_eq!(sub.position(0), Some(Vec3::Z));
        assert_eq!(sub.index_within_parent(), Some(3));
    }

    #[test]
    fn test_indexed_unsupported_operations() {
        let parent = indexed_quad();
        assert!(!parent.borrow().supports(Capability::EdgeSubset));
        assert!(!parent.borrow().supports(Capability::Merge));

        let edge = parent.create_edge_subset(0).unwrap_err();
        assert!(edge.is_not_supported());

        let sub = parent.create_vertex_subset(1).unwrap();
        assert!(sub.merge_with_parent().unwrap_err().is_not_supported());
        assert!(parent.borrow().merge_with_parent().unwrap_err().is_not_supported());
    }

    #[test]
    fn test_primitive_counts() {
        let flat = soup(6);
        assert_eq!(flat.borrow().primitive_count(Granularity::Vertex), 6);
        assert_eq!(flat.borrow().primitive_count(Granularity::Edge), 5);
        assert_eq!(flat.borrow().primitive_count(Granularity::Face), 2);

        let indexed = indexed_quad();
        assert_eq!(indexed.borrow().primitive_count(Granularity::Vertex), 4);
        assert_eq!(indexed.borrow().primitive_count(Granularity::Edge), 0);
        assert_eq!(indexed.borrow().primitive_count(Granularity::Face), 1);
    }

    #[test]
    fn test_primitive_positions() {
        let flat = soup(6);
        let face = flat.borrow().primitive_positions(Granularity::Face, 1).unwrap();
        assert_eq!(face.len(), 3);
        assert_eq!(face[0], Vec3::new(3.0, 30.0, 300.0));
        assert!(indexed_quad()
            .borrow()
            .primitive_positions(Granularity::Edge, 0)
            .unwrap_err()
            .is_not_supported());
    }

    #[test]
    fn test_element_positions_follow_indices() {
        let g = VertexGroup::indexed_from_positions(&[Vec3::X, Vec3::Y], vec![1, 1, 0]).unwrap();
        assert_eq!(g.element_positions(), vec![Vec3::Y, Vec3::Y, Vec3::X]);
        assert_eq!(soup(2).borrow().element_positions().len(), 2);
    }

    #[test]
    fn test_positions_as_bytes() {
        let g = VertexGroup::from_positions(&[Vec3::ONE]);
        assert_eq!(g.positions_as_bytes().len(), 12);
    }

    #[test]
    fn test_bounds() {
        let g = soup(3).borrow().bounds().unwrap();
        assert_eq!(g.min, Vec3::ZERO);
        assert_eq!(g.max, Vec3::new(2.0, 20.0, 200.0));
    }
}
