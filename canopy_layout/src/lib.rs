// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Layout: the document model and layout engine of a mind-map canvas.
//!
//! - [`Node`], [`NodeRecord`] and [`Link`]: the snapshot a host hands over.
//! - [`MindMap`]: a validated, pre-order node arena with parent, child,
//!   descendant and visibility queries.
//! - [`LayoutEngine`]: turns a [`MindMap`] into world positions, honoring
//!   positions the user placed by hand and caching the last result.
//!
//! ## Layout rules
//!
//! The baseline is a horizontal tidy tree: every depth gets its own column,
//! leaves stack top to bottom in document order, and parents sit centered
//! on their children. The root's baseline is the origin.
//!
//! On top of that baseline:
//! - nodes with a stored position are placed exactly there, every time;
//! - nodes without one follow their parent wherever it was moved;
//! - a node without a position whose sibling has one joins that sibling's
//!   column, so newly added children line up with hand-placed ones.
//!
//! Collapsed nodes keep their descendants in the tree but out of the layout.
//!
//! ```rust
//! use canopy_layout::{LayoutEngine, MindMap, Node, NodeId, PositionMap};
//!
//! let tree = MindMap::from_root(
//!     Node::new("root")
//!         .with_child(Node::new("ideas").with_child(Node::new("one")))
//!         .with_child(Node::new("todo").collapsed(true).with_child(Node::new("hidden"))),
//! )
//! .unwrap();
//!
//! let mut engine = LayoutEngine::default();
//! let layout = engine.compute(&tree, &PositionMap::new());
//! assert_eq!(layout.len(), 4);
//! assert!(!layout.contains(&NodeId::from("hidden")));
//! ```
//!
//! Snapshots are validated on construction: duplicate ids, cycles, dangling
//! child references and unreachable records are reported as [`TreeError`].
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod error;
mod layout;
mod model;
mod tree;

pub use error::TreeError;
pub use layout::{
    Layout, LayoutConfig, LayoutEngine, LayoutPoint, PositionMap, PositionSource, compute_layout,
};
pub use model::{Link, Node, NodeId, NodeRecord};
pub use tree::{MindMap, NodeFlags, NodeRef};
