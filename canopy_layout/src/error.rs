// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::NodeId;

/// Reasons a document snapshot is rejected before layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The snapshot holds no nodes at all.
    Empty,
    /// The declared root id does not name any node.
    MissingRoot(NodeId),
    /// Two records share an id.
    DuplicateId(NodeId),
    /// A record lists a child id that names no record.
    UnknownChild {
        /// The record holding the reference.
        parent: NodeId,
        /// The id that failed to resolve.
        child: NodeId,
    },
    /// A node was reached twice while walking child edges from the root.
    ///
    /// This covers both real cycles and nodes listed under two parents.
    Cycle(NodeId),
    /// A record cannot be reached from the root.
    Unreachable(NodeId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("document has no nodes"),
            Self::MissingRoot(id) => write!(f, "root node {id} does not exist"),
            Self::DuplicateId(id) => write!(f, "node id {id} appears more than once"),
            Self::UnknownChild { parent, child } => {
                write!(f, "node {parent} lists unknown child {child}")
            }
            Self::Cycle(id) => write!(f, "node {id} is reachable through more than one path"),
            Self::Unreachable(id) => write!(f, "node {id} is not reachable from the root"),
        }
    }
}

impl core::error::Error for TreeError {}
