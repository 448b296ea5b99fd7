// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use canopy_layout::NodeId;
use canopy_view2d::CameraTransform;
use kurbo::Point;

/// A notification for the host, returned from engine calls in the order it happened.
///
/// The host owns persistence and undo history. Events report user intent;
/// the engine does not apply structural edits itself and waits for the next
/// snapshot.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    /// The selection changed. Keys are in insertion order; the last is primary.
    SelectionChanged(Vec<NodeId>),
    /// The user dragged these nodes to these positions. One undo step.
    NodeGroupMoved(Vec<(NodeId, Point)>),
    /// The layout engine placed these nodes, which had no stored position.
    ///
    /// Persist them without recording an undo step.
    LayoutPositionsDiscovered(Vec<(NodeId, Point)>),
    /// The user dropped `source` onto `target`, asking for `source` to become
    /// its child. One undo step.
    NodeReparented {
        /// Moved node.
        source: NodeId,
        /// New parent.
        target: NodeId,
    },
    /// The user drew a link between two nodes.
    LinkCreated {
        /// Node the gesture started on.
        source: NodeId,
        /// Node the gesture ended on.
        target: NodeId,
    },
    /// The camera moved. Informational.
    CameraTransformChanged(CameraTransform),
    /// A collapse command flipped a node's collapsed flag locally.
    CollapseToggled {
        /// Toggled node.
        id: NodeId,
        /// New value.
        collapsed: bool,
    },
}

impl CanvasEvent {
    /// Returns `true` for edits that belong in the user's undo history.
    #[must_use]
    pub fn is_undoable(&self) -> bool {
        matches!(
            self,
            Self::NodeGroupMoved(_)
                | Self::NodeReparented { .. }
                | Self::LinkCreated { .. }
                | Self::CollapseToggled { .. }
        )
    }
}
