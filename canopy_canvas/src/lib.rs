// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Canvas: a headless mind-map canvas engine.
//!
//! [`CanvasEngine`] ties the other Canopy crates together for one open
//! canvas:
//!
//! - document snapshots are validated into a [`canopy_layout::MindMap`] and
//!   laid out by a [`canopy_layout::LayoutEngine`];
//! - positions the layout invents are reported once through a
//!   [`PositionReconciler`] as [`CanvasEvent::LayoutPositionsDiscovered`],
//!   kept apart from undoable edits;
//! - pointer input runs through the [`GestureState`] machine: clicks,
//!   Ctrl/Cmd toggles, Shift branch selection, box selection (with a
//!   long-press on touch), group drags with optional reparenting, link
//!   drawing and panning;
//! - commands move the [`canopy_view2d::Camera`] (zoom steps, fit, center,
//!   focus) and report [`CanvasEvent::CameraTransformChanged`].
//!
//! Rendering is left to the host: it reads the layout, the culled
//! [`CanvasEngine::visible_nodes`], drag previews and the box or link
//! preview after each call.
//!
//! ## Example
//!
//! ```rust
//! use canopy_canvas::{CanvasConfig, CanvasEngine, CanvasEvent, Key, PointerEvent};
//! use canopy_layout::{MindMap, Node};
//! use kurbo::Size;
//!
//! let mut engine = CanvasEngine::new(CanvasConfig::default(), Size::new(800.0, 600.0));
//! let tree = MindMap::from_root(
//!     Node::new("root").at(0.0, 0.0).with_child(Node::new("idea")),
//! )
//! .unwrap();
//!
//! // The child has no stored position; the engine places it and says so.
//! let events = engine.set_document(tree, Vec::new());
//! assert!(matches!(&events[..], [CanvasEvent::LayoutPositionsDiscovered(found)] if found.len() == 1));
//!
//! // Start a box selection on empty canvas, then think better of it.
//! engine.pointer_down(PointerEvent::mouse(700.0, 500.0));
//! engine.pointer_move(PointerEvent::mouse(-10.0, -10.0));
//! assert!(engine.box_select_rect().is_some());
//! engine.key_down(Key::Escape);
//! assert!(engine.selection().is_empty());
//! assert!(engine.gesture().is_idle());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod config;
mod engine;
mod event;
mod gesture;
mod input;
mod reconcile;

pub use config::{CanvasConfig, InitialView};
pub use engine::{CanvasEngine, LinkPreview};
pub use event::CanvasEvent;
pub use gesture::{BoxSelect, GestureState, LinkDraw, NodeDrag, NodePress, Pan, PendingBox};
pub use input::{Key, Modifiers, PointerEvent, PointerKind, ToolMode};
pub use reconcile::PositionReconciler;
