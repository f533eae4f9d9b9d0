//! Scene graph: the node tree plus the id side table.
//!
//! Every node reachable from the synthetic root has an entry in the id map
//! and no other node does. Structural operations validate their arguments
//! before touching anything, so tree links and the map change together or
//! not at all.

use std::collections::HashMap;

use crate::core::error::Error;
use crate::core::types::Result;

use super::node::{Node, NodeId};
use super::traversal::Traversal;

/// Id of the synthetic root.
pub const ROOT_ID: NodeId = NodeId(0);

/// Owner of a node tree and of the ids of its nodes.
pub struct SceneGraph {
    root: Node,
    nodes: HashMap<NodeId, Node>,
    next_id: u32,
}

impl SceneGraph {
    /// Create a scene graph holding only the root node.
    pub fn new() -> Self {
        let root = Node::new("root");
        root.set_id(Some(ROOT_ID));

        let mut nodes = HashMap::new();
        nodes.insert(ROOT_ID, root.clone());

        Self {
            root,
            nodes,
            next_id: ROOT_ID.0 + 1,
        }
    }

    /// The synthetic root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Look up a live node by id.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Whether `node` is reachable from this graph's root.
    pub fn contains(&self, node: &Node) -> bool {
        node.id()
            .and_then(|id| self.nodes.get(&id))
            .is_some_and(|registered| registered == node)
    }

    /// Total number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Live nodes in prefix order, root first.
    pub fn nodes(&self) -> Traversal {
        Traversal::new(self.root.clone())
    }

    /// Attach `subgraph` under the root. See [`SceneGraph::add_subgraph_under`].
    pub fn add_subgraph(&mut self, subgraph: &Node) -> Result<NodeId> {
        let root = self.root.clone();
        self.add_subgraph_under(subgraph, &root)
    }

    /// Attach `subgraph` as the last child of `parent` and give every node of
    /// it a fresh id in prefix order, subgraph root first. Returns the id of
    /// the subgraph root.
    ///
    /// `parent` must belong to this graph and `subgraph` must be a detached
    /// tree: no parent, and no node of it holding an id in any graph.
    pub fn add_subgraph_under(&mut self, subgraph: &Node, parent: &Node) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(Error::InvalidArgument(format!(
                "parent '{}' is not part of this scene graph",
                parent.name()
            )));
        }
        if subgraph.parent().is_some() {
            return Err(Error::InvalidArgument(format!(
                "subgraph '{}' is already attached",
                subgraph.name()
            )));
        }

        let added: Vec<Node> = Traversal::new(subgraph.clone()).collect();
        if let Some(owned) = added.iter().find(|node| node.id().is_some()) {
            return Err(Error::InvalidArgument(format!(
                "node '{}' of subgraph '{}' already belongs to a scene graph",
                owned.name(),
                subgraph.name()
            )));
        }
        let available = u32::MAX - self.next_id;
        if added.len() > available as usize {
            return Err(Error::InvalidArgument(format!(
                "cannot add {} nodes: only {} ids left",
                added.len(),
                available
            )));
        }

        parent.add_child(subgraph)?;

        let first = NodeId(self.next_id);
        for node in &added {
            let id = self.alloc_id()?;
            node.set_id(Some(id));
            self.nodes.insert(id, node.clone());
        }

        log::debug!(
            "Added subgraph '{}' under {:?}: {} nodes, ids {}..{}",
            subgraph.name(),
            parent.id(),
            added.len(),
            first.0,
            self.next_id
        );
        Ok(first)
    }

    /// Detach `subgraph` from its parent and forget the ids of every node in
    /// it. The root cannot be removed. The detached nodes keep their links to
    /// each other and can be added again.
    pub fn remove_subgraph(&mut self, subgraph: &Node) -> Result<()> {
        if subgraph == &self.root {
            return Err(Error::InvalidArgument("the scene graph root cannot be removed".into()));
        }
        if !self.contains(subgraph) {
            return Err(Error::InvalidArgument(format!(
                "subgraph '{}' is not part of this scene graph",
                subgraph.name()
            )));
        }

        // Collect before detaching; the walk needs the links intact.
        let removed: Vec<Node> = Traversal::new(subgraph.clone()).collect();
        subgraph.detach();
        for node in &removed {
            if let Some(id) = node.id() {
                self.nodes.remove(&id);
            }
            node.set_id(None);
        }

        log::debug!(
            "Removed subgraph '{}': {} nodes, {} remain",
            subgraph.name(),
            removed.len(),
            self.nodes.len()
        );
        Ok(())
    }

    /// Reassign ids densely in prefix order, starting after the root, and
    /// rebuild the id map. Any id held outside the graph is stale afterwards.
    pub fn reset_ids(&mut self) {
        self.nodes.retain(|id, _| *id == ROOT_ID);

        let descendants = Traversal::new(self.root.clone()).skip(1);
        for (node, id) in descendants.zip(ROOT_ID.0 + 1..=u32::MAX) {
            node.set_id(Some(NodeId(id)));
            self.nodes.insert(NodeId(id), node);
        }
        // Ids are dense from the root, so the count is the next free id.
        self.next_id = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);

        log::debug!("Compacted scene graph ids: {} nodes", self.nodes.len());
    }

    /// Allocate a fresh node ID. `u32::MAX` is never handed out.
    fn alloc_id(&mut self) -> Result<NodeId> {
        let next = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| Error::InvalidArgument("scene graph node ids exhausted".into()))?;
        let id = NodeId(self.next_id);
        self.next_id = next;
        Ok(id)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn chain(names: &[&str]) -> Vec<Node> {
        let nodes: Vec<Node> = names.iter().map(|n| Node::new(*n)).collect();
        for pair in nodes.windows(2) {
            pair[0].add_child(&pair[1]).unwrap();
        }
        nodes
    }

    /// Name and id of every node reachable from root, in prefix order.
    fn reachable(graph: &SceneGraph) -> Vec<(String, NodeId)> {
        graph
            .nodes()
            .map(|n| (n.name(), n.id().expect("live node without id")))
            .collect()
    }

    fn assert_consistent(graph: &SceneGraph) {
        let live: Vec<Node> = graph.nodes().collect();
        assert_eq!(live.len(), graph.node_count());
        let mut seen = HashSet::new();
        for node in &live {
            let id = node.id().unwrap();
            assert!(seen.insert(id), "duplicate id {id}");
            assert_eq!(graph.get_node(id), Some(node));
        }
    }

    #[test]
    fn test_new_scene_graph() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.root().id(), Some(ROOT_ID));
        assert_eq!(graph.get_node(ROOT_ID), Some(graph.root()));
        assert!(graph.get_node(NodeId(1)).is_none());
    }

    #[test]
    fn test_add_chain_assigns_sequential_ids() {
        let mut graph = SceneGraph::new();
        let n = chain(&["n1", "n2", "n3"]);

        let first = graph.add_subgraph(&n[0]).unwrap();

        assert_eq!(first, NodeId(1));
        assert_eq!(n[0].id(), Some(NodeId(1)));
        assert_eq!(n[1].id(), Some(NodeId(2)));
        assert_eq!(n[2].id(), Some(NodeId(3)));
        assert_eq!(graph.get_node(NodeId(2)), Some(&n[1]));
        assert_eq!(n[0].parent().as_ref(), Some(graph.root()));
        assert_consistent(&graph);
    }

    #[test]
    fn test_ids_follow_prefix_order() {
        let mut graph = SceneGraph::new();
        let a = Node::new("a");
        let b = Node::new("b");
        let c = Node::new("c");
        let d = Node::new("d");
        a.add_child(&b).unwrap();
        b.add_child(&c).unwrap();
        a.add_child(&d).unwrap();

        graph.add_subgraph(&a).unwrap();
        let ids: Vec<_> = reachable(&graph);
        assert_eq!(
            ids,
            vec![
                ("root".to_string(), NodeId(0)),
                ("a".to_string(), NodeId(1)),
                ("b".to_string(), NodeId(2)),
                ("c".to_string(), NodeId(3)),
                ("d".to_string(), NodeId(4)),
            ]
        );
    }

    #[test]
    fn test_add_under_explicit_parent() {
        let mut graph = SceneGraph::new();
        let group = Node::new("group");
        graph.add_subgraph(&group).unwrap();

        let leaf = Node::new("leaf");
        let id = graph.add_subgraph_under(&leaf, &group).unwrap();

        assert_eq!(id, NodeId(2));
        assert_eq!(leaf.parent(), Some(group.clone()));
        assert_consistent(&graph);
    }

    #[test]
    fn test_add_under_foreign_parent_fails() {
        let mut graph = SceneGraph::new();
        let foreign = Node::new("foreign");
        let node = Node::new("node");

        let err = graph.add_subgraph_under(&node, &foreign).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(node.parent().is_none());
        assert!(node.id().is_none());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_under_parent_of_other_graph_fails() {
        let mut first = SceneGraph::new();
        let mut second = SceneGraph::new();
        let owned = Node::new("owned");
        second.add_subgraph(&owned).unwrap();
        first.add_subgraph(&Node::new("mine")).unwrap();

        // Same id, different node
        let err = first.add_subgraph_under(&Node::new("x"), &owned).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_add_attached_subgraph_fails() {
        let mut graph = SceneGraph::new();
        let n = chain(&["a", "b"]);
        graph.add_subgraph(&n[0]).unwrap();

        assert!(graph.add_subgraph(&n[0]).is_err());
        assert!(graph.add_subgraph(&n[1]).is_err());
        let root = graph.root().clone();
        assert!(graph.add_subgraph(&root).is_err());
        assert_consistent(&graph);
    }

    #[test]
    fn test_add_root_of_other_graph_fails() {
        let mut first = SceneGraph::new();
        let mut second = SceneGraph::new();
        let other_root = second.root().clone();

        let err = first.add_subgraph(&other_root).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(first.node_count(), 1);
        assert_eq!(other_root.id(), Some(ROOT_ID));
        assert!(other_root.parent().is_none());

        // The other graph is still fully usable
        assert!(second.contains(&other_root));
        assert_eq!(second.add_subgraph(&Node::new("y")).unwrap(), NodeId(1));
        assert_consistent(&second);
    }

    #[test]
    fn test_add_subtree_with_owned_descendant_fails() {
        let mut first = SceneGraph::new();
        let mut second = SceneGraph::new();
        let owned = Node::new("owned");
        second.add_subgraph(&owned).unwrap();

        // A fresh wrapper around a node that another graph still owns
        let wrapper = Node::new("wrapper");
        owned.detach();
        wrapper.add_child(&owned).unwrap();

        let err = first.add_subgraph(&wrapper).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(wrapper.parent().is_none());
        assert!(wrapper.id().is_none());
        assert_eq!(owned.id(), Some(NodeId(1)));
        assert_eq!(first.node_count(), 1);
    }

    #[test]
    fn test_id_exhaustion_is_an_error() {
        let mut graph = SceneGraph::new();
        graph.next_id = u32::MAX - 1;

        let pair = chain(&["a", "b"]);
        let err = graph.add_subgraph(&pair[0]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(pair[0].parent().is_none());
        assert!(pair[0].id().is_none());
        assert_eq!(graph.node_count(), 1);

        let last = Node::new("last");
        assert_eq!(graph.add_subgraph(&last).unwrap(), NodeId(u32::MAX - 1));
        assert!(graph.add_subgraph(&Node::new("one_more")).is_err());
        assert_consistent(&graph);

        // Compaction frees the id space again
        graph.reset_ids();
        assert_eq!(last.id(), Some(NodeId(1)));
        assert_eq!(graph.add_subgraph(&Node::new("one_more")).unwrap(), NodeId(2));
    }

    #[test]
    fn test_remove_subgraph() {
        let mut graph = SceneGraph::new();
        let n = chain(&["a", "b", "c"]);
        let other = Node::new("other");
        graph.add_subgraph(&n[0]).unwrap();
        graph.add_subgraph(&other).unwrap();

        graph.remove_subgraph(&n[1]).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert!(graph.get_node(NodeId(2)).is_none());
        assert!(graph.get_node(NodeId(3)).is_none());
        assert!(n[1].parent().is_none());
        assert!(n[1].id().is_none());
        assert!(n[2].id().is_none());
        // Detached subtree keeps its internal links
        assert_eq!(n[2].parent(), Some(n[1].clone()));
        assert_eq!(n[0].child_count(), 0);
        assert_consistent(&graph);
    }

    #[test]
    fn test_remove_root_fails() {
        let mut graph = SceneGraph::new();
        let root = graph.root().clone();
        assert!(matches!(graph.remove_subgraph(&root), Err(Error::InvalidArgument(_))));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_remove_detached_fails() {
        let mut graph = SceneGraph::new();
        let detached = Node::new("detached");
        assert!(matches!(graph.remove_subgraph(&detached), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_add_remove_symmetry() {
        let mut graph = SceneGraph::new();
        let base = chain(&["base", "base_child"]);
        graph.add_subgraph(&base[0]).unwrap();

        let before_ids = graph.ids();
        let before_shape = reachable(&graph);

        let extra = chain(&["x", "y", "z"]);
        graph.add_subgraph_under(&extra[0], &base[0]).unwrap();
        assert_eq!(graph.node_count(), 6);
        graph.remove_subgraph(&extra[0]).unwrap();

        assert_eq!(graph.ids(), before_ids);
        assert_eq!(reachable(&graph), before_shape);
        assert_consistent(&graph);

        // The removed subgraph can be attached again
        graph.add_subgraph(&extra[0]).unwrap();
        assert_eq!(graph.node_count(), 6);
        assert_consistent(&graph);
    }

    #[test]
    fn test_reset_ids_compacts() {
        crate::core::logging::init_for_tests();
        let mut graph = SceneGraph::new();
        let a = chain(&["a", "a1"]);
        let b = chain(&["b", "b1"]);
        let c = Node::new("c");
        graph.add_subgraph(&a[0]).unwrap();
        graph.add_subgraph(&b[0]).unwrap();
        graph.add_subgraph(&c).unwrap();
        graph.remove_subgraph(&a[0]).unwrap();
        assert_eq!(graph.ids(), vec![NodeId(0), NodeId(3), NodeId(4), NodeId(5)]);

        graph.reset_ids();

        assert_eq!(graph.ids(), vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(b[0].id(), Some(NodeId(1)));
        assert_eq!(b[1].id(), Some(NodeId(2)));
        assert_eq!(c.id(), Some(NodeId(3)));
        assert_consistent(&graph);

        let d = Node::new("d");
        assert_eq!(graph.add_subgraph(&d).unwrap(), NodeId(4));
    }

    #[test]
    fn test_ids_unique_across_many_operations() {
        let mut graph = SceneGraph::new();
        let mut live = Vec::new();
        for i in 0..20 {
            let n = chain(&["p", "q"]);
            if i % 3 == 0 {
                if let Some(parent) = live.last() {
                    graph.add_subgraph_under(&n[0], parent).unwrap();
                } else {
                    graph.add_subgraph(&n[0]).unwrap();
                }
            } else {
                graph.add_subgraph(&n[0]).unwrap();
            }
            live.push(n[1].clone());
            if i % 5 == 4 {
                let victim = live.remove(0);
                if graph.contains(&victim) {
                    graph.remove_subgraph(&victim).unwrap();
                }
                live.retain(|n| graph.contains(n));
            }
            assert_consistent(&graph);
        }
        graph.reset_ids();
        assert_consistent(&graph);
    }
}
