// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document model as delivered by the host: nodes, flat records and links.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size};

/// Stable, opaque identifier of a node, unique within a document.
///
/// Cloning is cheap; ids are shared between the tree, layout output,
/// selection and emitted events.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Creates an id from any string.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:?})", &*self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A node of a nested document tree.
///
/// Each node exclusively owns its children, so a nested tree cannot contain
/// cycles. Hosts that keep nodes in a flat table should build
/// [`NodeRecord`]s instead; those are validated for duplicate ids, cycles and
/// dangling references.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Stable id.
    pub id: NodeId,
    /// Topic text.
    pub text: String,
    /// Opaque color token; part of the node's visual identity.
    pub color: String,
    /// Stored top-left world position; `None` lets the layout engine decide.
    pub stored: Option<Point>,
    /// Hides descendants from layout and interaction.
    pub collapsed: bool,
    /// Measured box size, if the host knows it.
    pub size: Option<Size>,
    /// Ordered children.
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a leaf with no text, no color and no stored position.
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            color: String::new(),
            stored: None,
            collapsed: false,
            size: None,
            children: Vec::new(),
        }
    }

    /// Sets the topic text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the color token.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the stored position.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.stored = Some(Point::new(x, y));
        self
    }

    /// Sets the collapsed flag.
    #[must_use]
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Sets the measured size.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Flattens this tree into records in pre-order.
    ///
    /// Uses an explicit stack, so arbitrarily deep trees are fine.
    #[must_use]
    pub fn into_records(self) -> Vec<NodeRecord> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![self];
        while let Some(node) = stack.pop() {
            let Self {
                id,
                text,
                color,
                stored,
                collapsed,
                size,
                children,
            } = node;
            out.push(NodeRecord {
                id,
                text,
                color,
                stored,
                collapsed,
                size,
                children: children.iter().map(|c| c.id.clone()).collect(),
            });
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

/// A node of a flat document table; children are referenced by id.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    /// Stable id.
    pub id: NodeId,
    /// Topic text.
    pub text: String,
    /// Opaque color token.
    pub color: String,
    /// Stored top-left world position; `None` lets the layout engine decide.
    pub stored: Option<Point>,
    /// Hides descendants from layout and interaction.
    pub collapsed: bool,
    /// Measured box size, if known.
    pub size: Option<Size>,
    /// Ordered child ids.
    pub children: Vec<NodeId>,
}

impl NodeRecord {
    /// Creates a record with no children.
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            color: String::new(),
            stored: None,
            collapsed: false,
            size: None,
            children: Vec::new(),
        }
    }

    /// Sets the child ids.
    #[must_use]
    pub fn with_children<I, T>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }
}

/// A non-hierarchical edge between two nodes.
///
/// Endpoints are weak references: either may fail to resolve against the
/// current tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    /// Stable link id.
    pub id: String,
    /// Source node.
    pub source: NodeId,
    /// Target node.
    pub target: NodeId,
    /// Free-form label.
    pub label: String,
}

impl Link {
    /// Creates an unlabeled link.
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: String::new(),
        }
    }

    /// Returns `true` if this link joins `a` and `b` in either direction.
    #[must_use]
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }
}

#[cfg(test)]
mod tests {
    use super::{Link, Node, NodeId};

    #[test]
    fn flatten_is_pre_order() {
        let tree = Node::new("r")
            .with_child(Node::new("a").with_child(Node::new("a1")))
            .with_child(Node::new("b"));
        let records = tree.into_records();
        let ids: alloc::vec::Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r", "a", "a1", "b"]);
        assert_eq!(records[0].children, [NodeId::from("a"), NodeId::from("b")]);
    }

    #[test]
    fn links_are_unordered_pairs() {
        let link = Link::new("l", "a", "b");
        assert!(link.connects(&NodeId::from("b"), &NodeId::from("a")));
        assert!(!link.connects(&NodeId::from("a"), &NodeId::from("c")));
    }
}
