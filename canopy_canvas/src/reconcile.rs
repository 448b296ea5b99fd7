// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reporting engine-invented positions back to the host.
//!
//! Nodes without a stored position get one from the layout engine. The host
//! should persist those as layout-derived (outside undo history), and it
//! should hear about each one once: re-rendering an unchanged document must
//! not produce another report.

use alloc::vec::Vec;

use canopy_layout::{Layout, NodeId};
use hashbrown::HashMap;
use kurbo::Point;

/// Remembers which derived positions have been reported.
#[derive(Clone, Debug, Default)]
pub struct PositionReconciler {
    reported: HashMap<NodeId, Point>,
}

impl PositionReconciler {
    /// Creates a reconciler that has reported nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the derived positions in `layout` not yet reported with their current value.
    ///
    /// Output is in layout (pre-order) order. Nodes that stopped being
    /// derived, or are no longer laid out, are forgotten, so they are reported
    /// again if they come back without a stored position.
    pub fn reconcile(&mut self, layout: &Layout) -> Vec<(NodeId, Point)> {
        self.reported
            .retain(|id, _| layout.get(id).is_some_and(|p| p.is_derived()));

        let mut fresh = Vec::new();
        for point in layout.derived() {
            let position = point.position();
            if self.reported.get(&point.node_id) != Some(&position) {
                self.reported.insert(point.node_id.clone(), position);
                fresh.push((point.node_id.clone(), position));
            }
        }
        fresh
    }

    /// Returns the last reported position of `id`.
    #[must_use]
    pub fn reported(&self, id: &NodeId) -> Option<Point> {
        self.reported.get(id).copied()
    }
}
