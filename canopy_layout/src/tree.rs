// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated node arena: structure, visibility and queries.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Point, Size};
use smallvec::SmallVec;

use crate::error::TreeError;
use crate::model::{Node, NodeId, NodeRecord};

bitflags::bitflags! {
    /// Per-node flags kept by the arena.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// The node hides its descendants.
        const COLLAPSED = 0b0000_0001;
        /// Some ancestor is collapsed, so the node takes no part in layout or interaction.
        const HIDDEN    = 0b0000_0010;
        /// The document stores a position for the node.
        const STORED    = 0b0000_0100;
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Slot {
    pub(crate) id: NodeId,
    text: String,
    pub(crate) color: String,
    pub(crate) stored: Option<Point>,
    pub(crate) size: Option<Size>,
    pub(crate) parent: Option<u32>,
    pub(crate) children: SmallVec<[u32; 4]>,
    pub(crate) depth: u32,
    /// Exclusive end of this node's subtree in pre-order.
    subtree_end: u32,
    pub(crate) flags: NodeFlags,
}

/// An immutable-shape mind-map tree stored as a pre-order arena.
///
/// Built from a host snapshot with [`MindMap::from_root`] or
/// [`MindMap::from_records`]; both validate the snapshot. Slot `0` is always
/// the root, and every subtree occupies a contiguous slot range, so
/// descendant queries do not recurse.
///
/// The only mutation allowed after construction is flipping collapsed flags
/// ([`MindMap::set_collapsed`]), which recomputes visibility.
///
/// ## Example
///
/// ```rust
/// use canopy_layout::{MindMap, Node, NodeId};
///
/// let map = MindMap::from_root(
///     Node::new("root")
///         .with_child(Node::new("a").collapsed(true).with_child(Node::new("a1")))
///         .with_child(Node::new("b")),
/// )
/// .unwrap();
///
/// let a1 = NodeId::from("a1");
/// assert!(!map.is_visible(&a1));
/// assert!(map.is_ancestor(&NodeId::from("root"), &a1));
/// assert_eq!(map.visible().count(), 3);
/// ```
#[derive(Clone)]
pub struct MindMap {
    slots: Vec<Slot>,
    index: HashMap<NodeId, u32>,
}

impl fmt::Debug for MindMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hidden = self
            .slots
            .iter()
            .filter(|s| s.flags.contains(NodeFlags::HIDDEN))
            .count();
        f.debug_struct("MindMap")
            .field("root", &self.slots.first().map(|s| &s.id))
            .field("nodes", &self.slots.len())
            .field("hidden", &hidden)
            .finish_non_exhaustive()
    }
}

impl MindMap {
    /// Builds an arena from a nested tree.
    ///
    /// Nested trees cannot contain cycles, but ids may still collide, so the
    /// snapshot is validated like [`MindMap::from_records`].
    pub fn from_root(root: Node) -> Result<Self, TreeError> {
        let root_id = root.id.clone();
        Self::from_records(root_id, root.into_records())
    }

    /// Builds an arena from a flat snapshot.
    ///
    /// Rejects empty snapshots, a missing root, duplicate ids, dangling child
    /// references, nodes reachable through two paths (cycles or shared
    /// children) and records unreachable from the root. The walk uses an
    /// explicit stack and a visited set, so malformed input can never cause
    /// unbounded recursion or an endless loop.
    pub fn from_records(root: impl Into<NodeId>, records: Vec<NodeRecord>) -> Result<Self, TreeError> {
        let root = root.into();
        if records.is_empty() {
            return Err(TreeError::Empty);
        }

        let mut by_id: HashMap<NodeId, usize> = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if by_id.insert(record.id.clone(), i).is_some() {
                return Err(TreeError::DuplicateId(record.id.clone()));
            }
        }
        let Some(&root_rec) = by_id.get(&root) else {
            return Err(TreeError::MissingRoot(root));
        };

        // Pre-order walk: (record, parent slot, depth).
        let mut visited = vec![false; records.len()];
        let mut order: Vec<(usize, Option<u32>, u32)> = Vec::with_capacity(records.len());
        let mut stack = vec![(root_rec, None, 0_u32)];
        visited[root_rec] = true;
        while let Some((rec, parent, depth)) = stack.pop() {
            let slot = to_handle(order.len());
            order.push((rec, parent, depth));
            for child in records[rec].children.iter().rev() {
                let Some(&c) = by_id.get(child) else {
                    return Err(TreeError::UnknownChild {
                        parent: records[rec].id.clone(),
                        child: child.clone(),
                    });
                };
                if visited[c] {
                    return Err(TreeError::Cycle(child.clone()));
                }
                visited[c] = true;
                stack.push((c, Some(slot), depth + 1));
            }
        }
        if let Some(orphan) = visited.iter().position(|v| !v) {
            return Err(TreeError::Unreachable(records[orphan].id.clone()));
        }

        let mut records: Vec<Option<NodeRecord>> = records.into_iter().map(Some).collect();
        let mut slots: Vec<Slot> = Vec::with_capacity(order.len());
        let mut index = HashMap::with_capacity(order.len());
        for (i, &(rec, parent, depth)) in order.iter().enumerate() {
            let Some(record) = records[rec].take() else {
                // Every record is visited exactly once.
                continue;
            };
            let mut flags = NodeFlags::empty();
            flags.set(NodeFlags::COLLAPSED, record.collapsed);
            flags.set(NodeFlags::STORED, record.stored.is_some());
            index.insert(record.id.clone(), to_handle(i));
            slots.push(Slot {
                id: record.id,
                text: record.text,
                color: record.color,
                stored: record.stored,
                size: record.size,
                parent,
                children: SmallVec::new(),
                depth,
                subtree_end: to_handle(i + 1),
                flags,
            });
        }
        for i in (1..slots.len()).rev() {
            if let Some(p) = slots[i].parent {
                let end = slots[i].subtree_end;
                let parent = &mut slots[p as usize];
                parent.subtree_end = parent.subtree_end.max(end);
            }
        }
        for i in 1..slots.len() {
            if let Some(p) = slots[i].parent {
                slots[p as usize].children.push(to_handle(i));
            }
        }

        let mut map = Self { slots, index };
        map.refresh_visibility();
        Ok(map)
    }

    /// Returns the number of nodes, hidden ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the arena has no nodes. Validated maps never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { map: self, idx: 0 }
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<NodeRef<'_>> {
        self.index.get(id).map(|&idx| NodeRef { map: self, idx })
    }

    /// Returns `true` if a node with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates over all nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        (0..self.slots.len()).map(move |i| NodeRef {
            map: self,
            idx: to_handle(i),
        })
    }

    /// Iterates over nodes not hidden by a collapsed ancestor, in pre-order.
    pub fn visible(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.iter().filter(|n| n.is_visible())
    }

    /// Returns `true` if the node exists and no ancestor is collapsed.
    #[must_use]
    pub fn is_visible(&self, id: &NodeId) -> bool {
        self.get(id).is_some_and(|n| n.is_visible())
    }

    /// Iterates over every descendant of `id` (not `id` itself), in pre-order.
    ///
    /// Unknown ids yield nothing.
    pub fn descendants(&self, id: &NodeId) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        let range = match self.index.get(id) {
            Some(&idx) => {
                let slot = &self.slots[idx as usize];
                (idx as usize + 1)..(slot.subtree_end as usize)
            }
            None => 0..0,
        };
        range.map(move |i| NodeRef {
            map: self,
            idx: to_handle(i),
        })
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `node`.
    ///
    /// Walks the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let (Some(&target), Some(&start)) = (self.index.get(ancestor), self.index.get(node)) else {
            return false;
        };
        let mut cursor = self.slots[start as usize].parent;
        while let Some(p) = cursor {
            if p == target {
                return true;
            }
            cursor = self.slots[p as usize].parent;
        }
        false
    }

    /// Sets a node's collapsed flag and recomputes visibility.
    ///
    /// Returns the previous value, or `None` if the id is unknown.
    pub fn set_collapsed(&mut self, id: &NodeId, collapsed: bool) -> Option<bool> {
        let idx = *self.index.get(id)? as usize;
        let flags = &mut self.slots[idx].flags;
        let previous = flags.contains(NodeFlags::COLLAPSED);
        if previous != collapsed {
            flags.set(NodeFlags::COLLAPSED, collapsed);
            self.refresh_visibility();
        }
        Some(previous)
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    fn refresh_visibility(&mut self) {
        for i in 0..self.slots.len() {
            let hidden = match self.slots[i].parent {
                Some(p) => self.slots[p as usize]
                    .flags
                    .intersects(NodeFlags::HIDDEN | NodeFlags::COLLAPSED),
                None => false,
            };
            self.slots[i].flags.set(NodeFlags::HIDDEN, hidden);
        }
    }
}

/// A borrowed view of one node in a [`MindMap`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    map: &'a MindMap,
    idx: u32,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", self.id())
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}

impl<'a> NodeRef<'a> {
    fn slot(&self) -> &'a Slot {
        &self.map.slots[self.idx as usize]
    }

    /// Returns the node id.
    #[must_use]
    pub fn id(&self) -> &'a NodeId {
        &self.slot().id
    }

    /// Returns the topic text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        &self.slot().text
    }

    /// Returns the color token.
    #[must_use]
    pub fn color(&self) -> &'a str {
        &self.slot().color
    }

    /// Returns the stored position, if any.
    #[must_use]
    pub fn stored(&self) -> Option<Point> {
        self.slot().stored
    }

    /// Returns the measured size, if known.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        self.slot().size
    }

    /// Returns the node's flags.
    #[must_use]
    pub fn flags(&self) -> NodeFlags {
        self.slot().flags
    }

    /// Returns `true` if the node is collapsed.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.flags().contains(NodeFlags::COLLAPSED)
    }

    /// Returns `true` if no ancestor is collapsed.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.flags().contains(NodeFlags::HIDDEN)
    }

    /// Returns the depth below the root (root is `0`).
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.slot().depth
    }

    /// Returns the parent, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.slot().parent.map(|idx| Self { map: self.map, idx })
    }

    /// Iterates over the children in document order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let map = self.map;
        self.slot()
            .children
            .iter()
            .map(move |&idx| NodeRef { map, idx })
    }

    /// Returns `true` if the node has children, visible or not.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.slot().children.is_empty()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "arena sizes are far below u32::MAX nodes"
)]
fn to_handle(i: usize) -> u32 {
    i as u32
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{MindMap, NodeFlags};
    use crate::{Node, NodeId, NodeRecord, TreeError};

    fn sample() -> MindMap {
        MindMap::from_root(
            Node::new("r")
                .with_child(
                    Node::new("a")
                        .with_child(Node::new("a1").with_child(Node::new("a1x")))
                        .with_child(Node::new("a2")),
                )
                .with_child(Node::new("b")),
        )
        .unwrap()
    }

    fn ids<'a>(it: impl Iterator<Item = super::NodeRef<'a>>) -> Vec<&'a str> {
        it.map(|n| n.id().as_str()).collect()
    }

    #[test]
    fn descendants_cover_whole_subtree() {
        let map = sample();
        assert_eq!(ids(map.descendants(&NodeId::from("a"))), ["a1", "a1x", "a2"]);
        assert_eq!(ids(map.descendants(&NodeId::from("b"))), Vec::<&str>::new());
        assert_eq!(ids(map.descendants(&NodeId::from("nope"))), Vec::<&str>::new());
        assert_eq!(map.descendants(&NodeId::from("r")).count(), 5);
    }

    #[test]
    fn ancestor_walk() {
        let map = sample();
        let a = NodeId::from("a");
        let a1x = NodeId::from("a1x");
        assert!(map.is_ancestor(&a, &a1x));
        assert!(!map.is_ancestor(&a1x, &a));
        assert!(!map.is_ancestor(&a, &a));
        assert!(!map.is_ancestor(&NodeId::from("b"), &a1x));
    }

    #[test]
    fn collapse_hides_descendants_only() {
        let mut map = sample();
        let a = NodeId::from("a");
        assert_eq!(map.set_collapsed(&a, true), Some(false));
        assert!(map.is_visible(&a));
        assert!(!map.is_visible(&NodeId::from("a1")));
        assert!(!map.is_visible(&NodeId::from("a1x")));
        assert!(map.is_visible(&NodeId::from("b")));
        assert_eq!(ids(map.visible()), ["r", "a", "b"]);

        assert_eq!(map.set_collapsed(&a, false), Some(true));
        assert_eq!(map.visible().count(), 6);
        assert_eq!(map.set_collapsed(&NodeId::from("zz"), true), None);
    }

    #[test]
    fn children_keep_document_order() {
        let map = sample();
        let a = map.get(&NodeId::from("a")).unwrap();
        assert_eq!(ids(a.children()), ["a1", "a2"]);
        assert_eq!(a.parent().unwrap().id().as_str(), "r");
        assert_eq!(map.get(&NodeId::from("a1x")).unwrap().depth(), 3);
    }

    #[test]
    fn stored_flag_tracks_positions() {
        let map =
            MindMap::from_root(Node::new("r").with_child(Node::new("a").at(1.0, 2.0))).unwrap();
        let a = map.get(&NodeId::from("a")).unwrap();
        assert!(a.flags().contains(NodeFlags::STORED));
        assert!(!map.root().flags().contains(NodeFlags::STORED));
    }

    #[test]
    fn rejects_cycles() {
        let records = vec![
            NodeRecord::new("r").with_children(["a"]),
            NodeRecord::new("a").with_children(["b"]),
            NodeRecord::new("b").with_children(["a"]),
        ];
        assert_eq!(
            MindMap::from_records("r", records).unwrap_err(),
            TreeError::Cycle(NodeId::from("a"))
        );
    }

    #[test]
    fn rejects_self_parent() {
        let records = vec![NodeRecord::new("r").with_children(["r"])];
        assert_eq!(
            MindMap::from_records("r", records).unwrap_err(),
            TreeError::Cycle(NodeId::from("r"))
        );
    }

    #[test]
    fn rejects_shared_children_duplicates_and_missing_nodes() {
        let shared = vec![
            NodeRecord::new("r").with_children(["a", "b"]),
            NodeRecord::new("a").with_children(["c"]),
            NodeRecord::new("b").with_children(["c"]),
            NodeRecord::new("c"),
        ];
        assert!(matches!(
            MindMap::from_records("r", shared),
            Err(TreeError::Cycle(_))
        ));

        let dup = vec![NodeRecord::new("r"), NodeRecord::new("r")];
        assert_eq!(
            MindMap::from_records("r", dup).unwrap_err(),
            TreeError::DuplicateId(NodeId::from("r"))
        );

        let dangling = vec![NodeRecord::new("r").with_children(["ghost"])];
        assert_eq!(
            MindMap::from_records("r", dangling).unwrap_err(),
            TreeError::UnknownChild {
                parent: NodeId::from("r"),
                child: NodeId::from("ghost"),
            }
        );

        assert_eq!(
            MindMap::from_records("x", vec![NodeRecord::new("r")]).unwrap_err(),
            TreeError::MissingRoot(NodeId::from("x"))
        );
        assert_eq!(
            MindMap::from_records("r", Vec::new()).unwrap_err(),
            TreeError::Empty
        );

        let orphan = vec![NodeRecord::new("r"), NodeRecord::new("loose")];
        assert_eq!(
            MindMap::from_records("r", orphan).unwrap_err(),
            TreeError::Unreachable(NodeId::from("loose"))
        );
    }

    #[test]
    fn nested_duplicates_are_rejected() {
        let tree = Node::new("r").with_child(Node::new("a")).with_child(Node::new("a"));
        assert_eq!(
            MindMap::from_root(tree).unwrap_err(),
            TreeError::DuplicateId(NodeId::from("a"))
        );
    }

    #[test]
    fn deep_chains_do_not_recurse() {
        let mut records = Vec::new();
        let depth = 50_000;
        for i in 0..depth {
            let mut rec = NodeRecord::new(alloc::format!("n{i}"));
            if i + 1 < depth {
                rec.children.push(NodeId::from(alloc::format!("n{}", i + 1)));
            }
            records.push(rec);
        }
        let map = MindMap::from_records("n0", records).unwrap();
        assert_eq!(map.descendants(&NodeId::from("n0")).count(), depth - 1);
    }
}
