//! Software selection backend.
//!
//! [`SelectionBuffer`] plays the part of a name-stack hit buffer: every
//! primitive drawn while names are on the stack is projected through the
//! narrowed pick frustum and clipped against it. If any of it survives, a
//! hit record for the current name list is created or widened to the depth
//! range of the surviving part.

use crate::core::config::SelectionConfig;
use crate::core::types::{Mat4, Vec3, Vec4};
use crate::math::{Aabb, Frustum};
use crate::pick::{Hit, HitRecord, Pick};
use crate::scene::SceneGraph;

use super::backend::{render_scene, RenderBackend, RenderPass};
use super::stack::MatrixStack;

/// Hit buffer filled by a selection pass over one pick region.
pub struct SelectionBuffer {
    projection: Mat4,
    transforms: MatrixStack,
    names: Vec<u32>,
    records: Vec<HitRecord>,
    capacity: usize,
    overflowed: bool,
}

impl SelectionBuffer {
    /// `view_projection` maps world space to clip space with a `[0, 1]`
    /// depth range; it is narrowed to `pick` before any test. At most
    /// `capacity` distinct records are kept.
    pub fn new(pick: &Pick, view_projection: Mat4, capacity: usize) -> Self {
        Self {
            projection: pick.pick_matrix() * view_projection,
            transforms: MatrixStack::new(),
            names: Vec::new(),
            records: Vec::new(),
            capacity,
            overflowed: false,
        }
    }

    pub fn records(&self) -> &[HitRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<HitRecord> {
        self.records
    }

    /// Whether hits were dropped because the buffer was full.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    fn record(&mut self, min_depth: f32, max_depth: f32) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.names == self.names) {
            existing.merge_depths(min_depth, max_depth);
            return;
        }
        if self.records.len() >= self.capacity {
            if !self.overflowed {
                log::warn!("Selection buffer full at {} records; dropping hits", self.capacity);
            }
            self.overflowed = true;
            return;
        }
        log::trace!("Hit {:?} depth {:.4}..{:.4}", self.names, min_depth, max_depth);
        self.records.push(HitRecord::new(self.names.clone(), min_depth, max_depth));
    }
}

impl RenderBackend for SelectionBuffer {
    fn push_transform(&mut self, local: Mat4) {
        self.transforms.push(local);
    }

    fn pop_transforms(&mut self, count: usize) {
        self.transforms.pop(count);
    }

    fn push_name(&mut self, name: u32) {
        self.names.push(name);
    }

    fn pop_name(&mut self) {
        if self.names.pop().is_none() {
            log::warn!("Name stack underflow");
        }
    }

    fn draw(&mut self, positions: &[Vec3]) {
        if self.names.is_empty() || positions.is_empty() {
            return;
        }
        let mvp = self.projection * self.transforms.top();
        let clip: Vec<Vec4> = positions.iter().map(|p| mvp * p.extend(1.0)).collect();

        let visible = if clip.len() <= 3 {
            clip_to_volume(&clip)
        } else {
            clip.into_iter().filter(|c| inside_clip_volume(*c)).collect()
        };
        let depths = visible
            .iter()
            .filter(|c| c.w > 0.0)
            .map(|c| (c.z / c.w).clamp(0.0, 1.0));

        let range = depths.fold(None, |range: Option<(f32, f32)>, depth| match range {
            Some((min, max)) => Some((min.min(depth), max.max(depth))),
            None => Some((depth, depth)),
        });
        if let Some((min, max)) = range {
            self.record(min, max);
        }
    }

    fn accepts_bounds(&self, bounds: &Aabb) -> bool {
        let mvp = self.projection * self.transforms.top();
        Frustum::from_view_projection(&mvp).intersects_aabb(bounds)
    }
}

/// Clip volume half-spaces `plane · v >= 0` for a `[0, 1]` depth range.
const CLIP_PLANES: [Vec4; 6] = [
    Vec4::new(1.0, 0.0, 0.0, 1.0),
    Vec4::new(-1.0, 0.0, 0.0, 1.0),
    Vec4::new(0.0, 1.0, 0.0, 1.0),
    Vec4::new(0.0, -1.0, 0.0, 1.0),
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, 0.0, -1.0, 1.0),
];

fn inside_clip_volume(c: Vec4) -> bool {
    c.w > 0.0 && CLIP_PLANES.iter().all(|plane| plane.dot(c) >= 0.0)
}

/// Part of a point, segment or triangle that lies inside the clip volume,
/// as a polygon in clip space. Empty when nothing survives.
///
/// Sutherland-Hodgman against each plane in homogeneous coordinates. A
/// segment is treated as a two-sided polygon, so its surviving endpoints may
/// appear twice.
fn clip_to_volume(vertices: &[Vec4]) -> Vec<Vec4> {
    let mut polygon = vertices.to_vec();
    for plane in CLIP_PLANES {
        if polygon.is_empty() {
            break;
        }
        let mut clipped = Vec::with_capacity(polygon.len() + 1);
        for (i, &current) in polygon.iter().enumerate() {
            let next = polygon[(i + 1) % polygon.len()];
            let d_current = plane.dot(current);
            let d_next = plane.dot(next);
            if d_current >= 0.0 {
                clipped.push(current);
            }
            if (d_current >= 0.0) != (d_next >= 0.0) {
                let t = d_current / (d_current - d_next);
                clipped.push(current.lerp(next, t));
            }
        }
        polygon = clipped;
    }
    polygon
}

/// Run a selection pass for `pick` and resolve the hits, nearest first.
pub fn select(graph: &SceneGraph, pick: &Pick, view_projection: Mat4, config: &SelectionConfig) -> Vec<Hit> {
    let mut buffer = SelectionBuffer::new(pick, view_projection, config.max_hits);
    render_scene(graph, &mut buffer, RenderPass::Select(config.granularity));
    let hits = config.resolver().resolve(graph, buffer.records());
    log::debug!(
        "Pick ({:.3}, {:.3}, {:.3}x{:.3}): {} records, {} hits",
        pick.x(),
        pick.y(),
        pick.width(),
        pick.height(),
        buffer.records().len(),
        hits.len()
    );
    hits
}
