//! Prefix-order traversal with transform-stack bookkeeping.
//!
//! A renderer pairs every [`Traversal::next_node`] with one transform push and
//! then pops [`Traversal::backtracks_to_next_node`] entries before handling
//! the next node. After the last node the traversal reports one extra
//! backtrack for leaving the root, so pushes and pops always balance:
//!
//! ```
//! # use scenecore::scene::{Node, Traversal};
//! let root = Node::new("root");
//! root.add_child(&Node::new("child")).unwrap();
//!
//! let mut depth = 0;
//! let mut traversal = Traversal::new(root);
//! while let Some(_node) = traversal.next_node() {
//!     depth += 1;
//!     depth -= traversal.backtracks_to_next_node();
//! }
//! assert_eq!(depth, 0);
//! ```

use super::node::Node;

/// Explicit cursor over the subtree rooted at one node.
///
/// The cursor can be paused between nodes. Mutating the tree while a
/// traversal is in progress gives an unspecified order.
#[derive(Clone, Debug)]
pub struct Traversal {
    root: Node,
    next: Option<Node>,
    backtracks: usize,
}

impl Traversal {
    pub fn new(root: Node) -> Self {
        Self {
            next: Some(root.clone()),
            root,
            backtracks: 0,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Whether the next call to [`Traversal::next_node`] returns a node.
    pub fn has_more_nodes(&self) -> bool {
        self.next.is_some()
    }

    /// Upward moves taken to reach the node the next call will return,
    /// counting one final move above the root once the walk is exhausted.
    /// Zero before the first call and after any call that returned `None`.
    pub fn backtracks_to_next_node(&self) -> usize {
        self.backtracks
    }

    /// Restart from the root.
    pub fn reset(&mut self) {
        self.next = Some(self.root.clone());
        self.backtracks = 0;
    }

    /// The next node in prefix order, or `None` forever once exhausted.
    pub fn next_node(&mut self) -> Option<Node> {
        let Some(current) = self.next.take() else {
            self.backtracks = 0;
            return None;
        };

        if let Some(first_child) = current.child(0) {
            self.next = Some(first_child);
            self.backtracks = 0;
            return Some(current);
        }

        // Climb until a following sibling exists, never leaving the root.
        let mut backtracks = 0;
        let mut node = current.clone();
        loop {
            backtracks += 1;
            if node == self.root {
                break;
            }
            let Some(parent) = node.parent() else {
                break;
            };
            if let Some(sibling) = parent.child_after(&node) {
                self.next = Some(sibling);
                break;
            }
            node = parent;
        }
        self.backtracks = backtracks;
        Some(current)
    }
}

impl Iterator for Traversal {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        self.next_node()
    }
}
