//! The rendering backend boundary and the traversal that drives it.
//!
//! [`render_scene`] walks a scene graph in prefix order, pushing one
//! transform per node and popping as many as the traversal reports before
//! the next node. During a selection pass it also brackets every node and
//! primitive with names so a hit can be traced back to what produced it.

use crate::core::types::{Mat4, Vec3};
use crate::geometry::Granularity;
use crate::math::Aabb;
use crate::scene::{Node, SceneGraph, Traversal};

/// What a host renderer must provide to draw or select a scene.
pub trait RenderBackend {
    /// Push `local` onto the transform stack.
    fn push_transform(&mut self, local: Mat4);

    /// Pop `count` transforms.
    fn pop_transforms(&mut self, count: usize);

    fn push_name(&mut self, name: u32);

    fn pop_name(&mut self);

    /// Draw one primitive under the current transform: a point, a segment
    /// or a triangle for one, two or three positions, a point set otherwise.
    fn draw(&mut self, positions: &[Vec3]);

    /// Whether geometry inside `bounds`, given in the space of the current
    /// transform, can contribute anything. Backends that cull override this.
    fn accepts_bounds(&self, _bounds: &Aabb) -> bool {
        true
    }
}

/// Kind of pass [`render_scene`] performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPass {
    /// Draw each vertex group whole, without names.
    Draw,
    /// Name every node and every primitive of the given granularity.
    Select(Granularity),
}

/// Counters from one [`render_scene`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub nodes_visited: usize,
    pub nodes_drawn: usize,
    pub primitives_drawn: usize,
}

/// Walk `graph` and feed it to `backend`.
///
/// Every node gets exactly one transform push, balanced by the traversal's
/// backtracks, so the backend's stack is back at its starting depth when
/// this returns. Hidden nodes hide their whole subtree but are still pushed.
pub fn render_scene<B: RenderBackend>(graph: &SceneGraph, backend: &mut B, pass: RenderPass) -> RenderStats {
    let mut stats = RenderStats::default();
    let mut traversal = Traversal::new(graph.root().clone());
    let mut depth = 0usize;
    let mut hidden_from: Option<usize> = None;

    while let Some(node) = traversal.next_node() {
        depth += 1;
        stats.nodes_visited += 1;
        backend.push_transform(node.local_matrix());

        if hidden_from.is_none() && !node.is_visible() {
            hidden_from = Some(depth);
        }
        if hidden_from.is_none() {
            let primitives = draw_node(&node, backend, pass);
            if primitives > 0 {
                stats.nodes_drawn += 1;
                stats.primitives_drawn += primitives;
            }
        }

        let backtracks = traversal.backtracks_to_next_node();
        backend.pop_transforms(backtracks);
        depth -= backtracks;
        if hidden_from.is_some_and(|hidden| depth < hidden) {
            hidden_from = None;
        }
    }

    log::trace!(
        "Rendered {:?}: {} nodes visited, {} drawn, {} primitives",
        pass,
        stats.nodes_visited,
        stats.nodes_drawn,
        stats.primitives_drawn
    );
    stats
}

/// Draw one node's model. Returns the number of primitives drawn.
fn draw_node<B: RenderBackend>(node: &Node, backend: &mut B, pass: RenderPass) -> usize {
    let Some(model) = node.model() else {
        return 0;
    };
    if let Some(bounds) = node.bounds() {
        if !backend.accepts_bounds(&bounds) {
            return 0;
        }
    }

    let mut drawn = 0;
    match pass {
        RenderPass::Draw => {
            for group in model.groups() {
                backend.draw(&group.borrow().element_positions());
                drawn += 1;
            }
        }
        RenderPass::Select(granularity) => {
            let Some(id) = node.id() else {
                return 0;
            };
            backend.push_name(id.0);
            for (group_index, group) in model.groups().iter().enumerate() {
                let Some(group_name) = selection_name(group_index, "group") else {
                    break;
                };
                let group = group.borrow();
                backend.push_name(group_name);
                let count = group.primitive_count(granularity);
                if count == 0 {
                    // Not addressable at this granularity: draw whole under the group name.
                    backend.draw(&group.element_positions());
                    drawn += 1;
                }
                for primitive in 0..count {
                    let Some(primitive_name) = selection_name(primitive, "primitive") else {
                        break;
                    };
                    if let Ok(positions) = group.primitive_positions(granularity, primitive) {
                        backend.push_name(primitive_name);
                        backend.draw(&positions);
                        backend.pop_name();
                        drawn += 1;
                    }
                }
                backend.pop_name();
            }
            backend.pop_name();
        }
    }
    drawn
}

/// Name-stack entry for an index, or `None` once indices no longer fit.
fn selection_name(index: usize, what: &str) -> Option<u32> {
    match u32::try_from(index) {
        Ok(name) => Some(name),
        Err(_) => {
            log::warn!("Cannot name {} {}: index exceeds the name range; skipping the rest", what, index);
            None
        }
    }
}
