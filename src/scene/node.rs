//! Scene graph node types
//!
//! Core types for the scene graph: node IDs, local transforms and the node
//! handle itself. A [`Node`] owns its children; the link back to its parent
//! is weak, so ownership only ever flows from the root toward the leaves.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use glam::{Mat4, Quat, Vec3};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::geometry::Model;
use crate::math::Aabb;

use super::traversal::Traversal;

/// Identifier of a node within one scene graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Local transform relative to the parent node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

struct NodeData {
    id: Option<NodeId>,
    name: String,
    parent: Option<Weak<RefCell<NodeData>>>,
    children: Vec<Node>,
    transformation: Transform,
    collidable: bool,
    modifiable: bool,
    visible: bool,
    bounds: Option<Aabb>,
    model: Option<Model>,
}

/// A node of the scene graph.
///
/// `Node` is a handle: clones refer to the same node, and equality and
/// hashing are by identity.
#[derive(Clone)]
pub struct Node {
    data: Rc<RefCell<NodeData>>,
}

impl Node {
    /// Create a detached node with an identity transform. It has no id until
    /// a scene graph adopts it.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: Rc::new(RefCell::new(NodeData {
                id: None,
                name: name.into(),
                parent: None,
                children: Vec::new(),
                transformation: Transform::identity(),
                collidable: true,
                modifiable: true,
                visible: true,
                bounds: None,
                model: None,
            })),
        }
    }

    /// Create a detached node carrying `model`, bounded by the model's extent.
    pub fn with_model(name: impl Into<String>, model: Model) -> Self {
        let node = Node::new(name);
        node.set_bounds(model.bounds());
        node.set_model(Some(model));
        node
    }

    /// Id assigned by the owning scene graph, if the node is live.
    pub fn id(&self) -> Option<NodeId> {
        self.data.borrow().id
    }

    pub(crate) fn set_id(&self, id: Option<NodeId>) {
        self.data.borrow_mut().id = id;
    }

    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.data.borrow_mut().name = name.into();
    }

    pub fn transformation(&self) -> Transform {
        self.data.borrow().transformation
    }

    pub fn set_transformation(&self, transformation: Transform) {
        self.data.borrow_mut().transformation = transformation;
    }

    pub fn local_matrix(&self) -> Mat4 {
        self.data.borrow().transformation.to_mat4()
    }

    /// Product of the local matrices from the top-most ancestor down to this node.
    pub fn world_matrix(&self) -> Mat4 {
        let local = self.local_matrix();
        match self.parent() {
            Some(parent) => parent.world_matrix() * local,
            None => local,
        }
    }

    pub fn is_collidable(&self) -> bool {
        self.data.borrow().collidable
    }

    pub fn set_collidable(&self, collidable: bool) {
        self.data.borrow_mut().collidable = collidable;
    }

    pub fn is_modifiable(&self) -> bool {
        self.data.borrow().modifiable
    }

    pub fn set_modifiable(&self, modifiable: bool) {
        self.data.borrow_mut().modifiable = modifiable;
    }

    pub fn is_visible(&self) -> bool {
        self.data.borrow().visible
    }

    pub fn set_visible(&self, visible: bool) {
        self.data.borrow_mut().visible = visible;
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.data.borrow().bounds
    }

    pub fn set_bounds(&self, bounds: Option<Aabb>) {
        self.data.borrow_mut().bounds = bounds;
    }

    /// The node's model. Models share their vertex groups, so the clone is cheap.
    pub fn model(&self) -> Option<Model> {
        self.data.borrow().model.clone()
    }

    pub fn set_model(&self, model: Option<Model>) {
        self.data.borrow_mut().model = model;
    }

    pub fn has_model(&self) -> bool {
        self.data.borrow().model.is_some()
    }

    pub fn parent(&self) -> Option<Node> {
        self.data
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|data| Node { data })
    }

    /// Whether this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Snapshot of the children, in order.
    pub fn children(&self) -> Vec<Node> {
        self.data.borrow().children.clone()
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.data.borrow().children.get(index).cloned()
    }

    pub fn child_count(&self) -> usize {
        self.data.borrow().children.len()
    }

    /// Child that follows `child` under this node.
    pub(crate) fn child_after(&self, child: &Node) -> Option<Node> {
        let data = self.data.borrow();
        let position = data.children.iter().position(|c| c == child)?;
        data.children.get(position + 1).cloned()
    }

    /// Append `child`, detaching it from any previous parent first.
    ///
    /// Both links change together: afterwards `child.parent()` is `self` and
    /// `self.children()` ends with `child`. Adding a node under itself or
    /// under one of its own descendants is rejected.
    pub fn add_child(&self, child: &Node) -> Result<()> {
        if child == self || self.is_ancestor(child) {
            return Err(Error::InvalidArgument(format!(
                "cannot add '{}' under itself or its own descendant '{}'",
                child.name(),
                self.name()
            )));
        }
        if let Some(previous) = child.parent() {
            previous.unlink(child);
        }
        self.data.borrow_mut().children.push(child.clone());
        child.data.borrow_mut().parent = Some(Rc::downgrade(&self.data));
        Ok(())
    }

    /// Detach `child` from this node. Fails if it is not a child of this node.
    pub fn remove_child(&self, child: &Node) -> Result<()> {
        if child.parent().as_ref() != Some(self) {
            return Err(Error::InvalidArgument(format!(
                "'{}' is not a child of '{}'",
                child.name(),
                self.name()
            )));
        }
        self.unlink(child);
        Ok(())
    }

    /// Detach from the current parent, if any.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.unlink(self);
        }
    }

    fn unlink(&self, child: &Node) {
        self.data.borrow_mut().children.retain(|c| c != child);
        child.data.borrow_mut().parent = None;
    }

    /// Whether `other` is found by walking parent links upward. A node is
    /// never its own ancestor.
    pub fn is_ancestor(&self, other: &Node) -> bool {
        let mut current = self.parent();
        while let Some(node) = current {
            if &node == other {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Whether `other` comes strictly after this node in a prefix traversal
    /// rooted here, i.e. whether it is one of this node's descendants.
    pub fn is_successor(&self, other: &Node) -> bool {
        Traversal::new(self.clone()).skip(1).any(|node| &node == other)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.data), state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Node")
            .field("id", &data.id)
            .field("name", &data.name)
            .field("children", &data.children.len())
            .finish()
    }
}
