// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gestures: the state machine behind selection, drags, box
//! selection, panning and link drawing.
//!
//! Every gesture starts at a pointer-down, from [`GestureState::Idle`], and
//! ends back there on pointer-up or cancellation:
//!
//! ```text
//! down on connector ─────────────────────────────▶ DrawingLink
//! down on node ───────────▶ PressingNode ─(moved)─▶ DraggingNodes
//! down on canvas, Pan ────▶ Panning
//! down on canvas, Select ─▶ BoxSelecting (armed once moved)
//! touch on canvas, Select ▶ PendingBox ─(held)──▶ BoxSelecting
//!                                      └(moved)─▶ Panning
//! ```
//!
//! A press that never moves past the drag threshold is a click. Nothing is
//! committed before pointer-up, and cancelling restores the selection taken
//! at pointer-down.

use alloc::vec::Vec;
use core::iter;
use core::mem;

use canopy_event_state::drag::{DragState, GroupDrag};
use canopy_event_state::long_press::{LongPressState, PressMove};
use canopy_layout::{MindMap, NodeId};
use canopy_view2d::geometry::{contains, normalized_rect};
use hashbrown::HashSet;
use kurbo::{Point, Rect};

use crate::engine::CanvasEngine;
use crate::event::CanvasEvent;
use crate::input::{Key, Modifiers, PointerEvent, PointerKind, ToolMode};

/// The gesture in progress.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GestureState {
    /// No pointer is down.
    #[default]
    Idle,
    /// A node is pressed but the pointer has not moved far enough to drag.
    PressingNode(NodePress),
    /// Selected nodes follow the pointer.
    DraggingNodes(NodeDrag),
    /// The camera follows the pointer.
    Panning(Pan),
    /// A touch on empty canvas waits for a long press.
    PendingBox(PendingBox),
    /// A selection rectangle follows the pointer.
    BoxSelecting(BoxSelect),
    /// A link line follows the pointer.
    DrawingLink(LinkDraw),
}

/// A press on a node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePress {
    /// Pressed node.
    pub node: NodeId,
    /// Modifiers held at pointer-down.
    pub modifiers: Modifiers,
    /// World position of the pointer-down.
    pub grab: Point,
    press: DragState,
}

/// A group of nodes being dragged.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDrag {
    /// Dragged nodes and their offsets from the grab point.
    pub group: GroupDrag<NodeId>,
    /// Current world position of the pointer.
    pub pointer: Point,
    /// The dragged node when only one is selected; only such drags may reparent.
    pub reparent_source: Option<NodeId>,
}

/// A pan of the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Pan {
    last: Point,
    press: DragState,
    modifiers: Modifiers,
}

/// A touch on empty canvas, waiting to become a box selection or a pan.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingBox {
    /// World position of the touch.
    pub origin: Point,
    screen_origin: Point,
    wait: LongPressState,
    modifiers: Modifiers,
}

/// A selection rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSelect {
    /// World position where the rectangle is anchored.
    pub origin: Point,
    /// World position of the opposite corner.
    pub current: Point,
    /// Whether the rectangle is live. A mouse press arms it by moving past the
    /// drag threshold; a touch arms it by the long press.
    pub armed: bool,
    press: DragState,
    modifiers: Modifiers,
}

impl BoxSelect {
    /// Returns the rectangle, normalized to non-negative width and height.
    #[must_use]
    pub fn rect(&self) -> Rect {
        normalized_rect(self.origin, self.current)
    }
}

/// A link being drawn.
///
/// A connector press released without passing the drag threshold is a
/// click on its node.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkDraw {
    /// Node whose connector was pressed.
    pub source: NodeId,
    /// Current world position of the pointer.
    pub endpoint: Point,
    press: DragState,
    modifiers: Modifiers,
}

impl GestureState {
    /// Returns `true` when no gesture is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns a short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PressingNode(_) => "pressing-node",
            Self::DraggingNodes(_) => "dragging-nodes",
            Self::Panning(_) => "panning",
            Self::PendingBox(_) => "pending-box",
            Self::BoxSelecting(_) => "box-selecting",
            Self::DrawingLink(_) => "drawing-link",
        }
    }

    /// Returns `false` if the gesture names a node missing from `tree`.
    pub(crate) fn refers_only_to(&self, tree: &MindMap) -> bool {
        match self {
            Self::Idle | Self::Panning(_) | Self::PendingBox(_) | Self::BoxSelecting(_) => true,
            Self::PressingNode(p) => tree.contains(&p.node),
            Self::DraggingNodes(d) => d.group.keys().all(|k| tree.contains(k)),
            Self::DrawingLink(l) => tree.contains(&l.source),
        }
    }
}

impl CanvasEngine {
    /// Starts a gesture.
    ///
    /// A connector under the pointer starts a link; otherwise the top-most
    /// node starts a press that may become a drag; otherwise the tool mode
    /// decides between panning and box selection. A press while another
    /// gesture is active cancels that gesture first.
    pub fn pointer_down(&mut self, event: PointerEvent) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        if !self.gesture.is_idle() {
            self.cancel_into(&mut out);
        }
        if self.tree.is_none() {
            return out;
        }
        let world = self.camera.screen_to_world(event.position);
        self.gesture_snapshot = Some(self.selection.snapshot());

        let mut press = DragState::with_threshold(self.config.drag_threshold_px);
        press.start(event.position);
        let modifiers = event.modifiers;
        let next = if let Some(source) = self.connector_at(world) {
            GestureState::DrawingLink(LinkDraw {
                source,
                endpoint: world,
                press,
                modifiers,
            })
        } else if let Some(node) = self.layout.layout().hit_test(world).cloned() {
            GestureState::PressingNode(NodePress {
                node,
                modifiers,
                grab: world,
                press,
            })
        } else {
            match (self.tool, event.kind) {
                (ToolMode::Pan, _) => GestureState::Panning(Pan {
                    last: event.position,
                    press,
                    modifiers,
                }),
                (ToolMode::Select, PointerKind::Touch) => {
                    let mut wait = LongPressState::new(self.config.long_press);
                    wait.start(event.position, event.time_ms);
                    GestureState::PendingBox(PendingBox {
                        origin: world,
                        screen_origin: event.position,
                        wait,
                        modifiers,
                    })
                }
                (ToolMode::Select, _) => GestureState::BoxSelecting(BoxSelect {
                    origin: world,
                    current: world,
                    armed: false,
                    press,
                    modifiers,
                }),
            }
        };
        self.set_gesture(next);
        out
    }

    /// Advances the gesture in progress. Moves while idle are ignored.
    pub fn pointer_move(&mut self, event: PointerEvent) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        self.arm_pending_box(event.time_ms);
        let world = self.camera.screen_to_world(event.position);
        let next = match mem::take(&mut self.gesture) {
            GestureState::Idle => GestureState::Idle,
            GestureState::PressingNode(mut p) => {
                p.press.update(event.position);
                if p.press.is_dragging() && self.focused.as_ref() != Some(&p.node) {
                    self.begin_node_drag(&p.node, p.grab, world, &mut out)
                } else {
                    GestureState::PressingNode(p)
                }
            }
            GestureState::DraggingNodes(mut drag) => {
                drag.pointer = world;
                GestureState::DraggingNodes(drag)
            }
            GestureState::Panning(mut pan) => {
                pan.press.update(event.position);
                let delta = event.position - pan.last;
                pan.last = event.position;
                self.camera.pan_by(delta.x, delta.y);
                self.flush_camera(&mut out);
                GestureState::Panning(pan)
            }
            GestureState::PendingBox(mut pending) => match pending.wait.on_move(event.position) {
                PressMove::Abandoned => {
                    // Moving before the long press fires turns the touch into a pan.
                    let delta = event.position - pending.screen_origin;
                    self.camera.pan_by(delta.x, delta.y);
                    self.flush_camera(&mut out);
                    let mut press = DragState::with_threshold(0.0);
                    press.start(pending.screen_origin);
                    press.update(event.position);
                    GestureState::Panning(Pan {
                        last: event.position,
                        press,
                        modifiers: pending.modifiers,
                    })
                }
                _ => GestureState::PendingBox(pending),
            },
            GestureState::BoxSelecting(mut b) => {
                b.current = world;
                b.press.update(event.position);
                if b.press.is_dragging() {
                    b.armed = true;
                }
                if b.armed {
                    self.select_in_box(b.rect(), event.modifiers.contains(Modifiers::SHIFT));
                }
                GestureState::BoxSelecting(b)
            }
            GestureState::DrawingLink(mut link) => {
                link.endpoint = world;
                link.press.update(event.position);
                GestureState::DrawingLink(link)
            }
        };
        self.set_gesture(next);
        out
    }

    /// Finishes the gesture in progress and commits its result.
    ///
    /// A release without a matching press is ignored.
    pub fn pointer_up(&mut self, event: PointerEvent) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        self.arm_pending_box(event.time_ms);
        let world = self.camera.screen_to_world(event.position);
        match mem::take(&mut self.gesture) {
            GestureState::Idle => return out,
            GestureState::PressingNode(p) => {
                if !p.press.is_dragging() {
                    self.click_node(&p.node, p.modifiers);
                }
            }
            GestureState::DraggingNodes(drag) => self.commit_drag(drag, world, &mut out),
            GestureState::Panning(pan) => {
                if !pan.press.is_dragging() {
                    self.click_canvas(pan.modifiers);
                }
            }
            GestureState::PendingBox(pending) => self.click_canvas(pending.modifiers),
            GestureState::BoxSelecting(mut b) => {
                b.current = world;
                if b.armed {
                    self.commit_box(b.rect(), event.modifiers.contains(Modifiers::SHIFT));
                } else {
                    self.click_canvas(b.modifiers);
                }
            }
            GestureState::DrawingLink(mut link) => {
                link.press.update(event.position);
                if link.press.is_dragging() {
                    self.commit_link(link.source, world, &mut out);
                } else {
                    self.click_node(&link.source, link.modifiers);
                }
            }
        }
        self.gesture_snapshot = None;
        self.flush_selection(&mut out);
        out
    }

    /// Arms a pending touch box selection once the long press has been held.
    ///
    /// Pointer moves and releases check the delay against their own
    /// timestamps too, so hosts without a timer still get box selection.
    /// Returns `true` if a box selection started.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.arm_pending_box(now_ms)
    }

    fn arm_pending_box(&mut self, now_ms: u64) -> bool {
        let threshold = self.config.drag_threshold_px;
        let GestureState::PendingBox(pending) = &mut self.gesture else {
            return false;
        };
        if !pending.wait.poll(now_ms) {
            return false;
        }
        let mut press = DragState::with_threshold(threshold);
        press.start(pending.screen_origin);
        let next = GestureState::BoxSelecting(BoxSelect {
            origin: pending.origin,
            current: pending.origin,
            armed: true,
            press,
            modifiers: pending.modifiers,
        });
        self.set_gesture(next);
        true
    }

    /// Handles a key press. Escape cancels the gesture in progress.
    pub fn key_down(&mut self, key: Key) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        if key == Key::Escape {
            self.cancel_into(&mut out);
        }
        out
    }

    /// The platform took the pointer away; cancels the gesture in progress.
    pub fn pointer_cancel(&mut self) -> Vec<CanvasEvent> {
        self.cancel_gesture()
    }

    /// The window lost focus; cancels the gesture in progress.
    pub fn blur(&mut self) -> Vec<CanvasEvent> {
        self.cancel_gesture()
    }

    /// Abandons the gesture in progress without committing anything.
    ///
    /// The selection goes back to what it was at pointer-down. Camera moves
    /// made by a pan are kept.
    pub fn cancel_gesture(&mut self) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        self.cancel_into(&mut out);
        out
    }

    pub(crate) fn cancel_into(&mut self, out: &mut Vec<CanvasEvent>) {
        let previous = mem::take(&mut self.gesture);
        if let Some(snapshot) = self.gesture_snapshot.take() {
            self.selection.restore(snapshot);
        }
        #[cfg(feature = "tracing")]
        if !previous.is_idle() {
            tracing::debug!(gesture = previous.name(), "gesture cancelled");
        }
        drop(previous);
        self.flush_selection(out);
    }

    fn set_gesture(&mut self, next: GestureState) {
        #[cfg(feature = "tracing")]
        if self.gesture.name() != next.name() {
            tracing::trace!(from = self.gesture.name(), to = next.name(), "gesture");
        }
        self.gesture = next;
    }

    /// Returns the node whose link connector is under `world`, top-most first.
    fn connector_at(&self, world: Point) -> Option<NodeId> {
        let r = self.config.connector_radius_px / self.camera.scale();
        self.layout
            .layout()
            .iter()
            .rev()
            .find(|p| {
                let b = p.bounds();
                let c = Point::new(b.x1, b.center().y);
                contains(Rect::new(c.x - r, c.y - r, c.x + r, c.y + r), world)
            })
            .map(|p| p.node_id.clone())
    }

    fn click_node(&mut self, id: &NodeId, modifiers: Modifiers) {
        if modifiers.toggles() {
            self.selection.toggle(id.clone());
        } else if modifiers.contains(Modifiers::SHIFT) {
            let Some(tree) = &self.tree else {
                return;
            };
            // Descendants hidden by a collapsed node are not selectable.
            let branch = iter::once(id.clone()).chain(
                tree.descendants(id)
                    .filter(|n| n.is_visible())
                    .map(|n| n.id().clone()),
            );
            self.selection.replace_with_hashed(branch);
        } else {
            self.selection.select_only(id.clone());
        }
    }

    fn click_canvas(&mut self, modifiers: Modifiers) {
        if modifiers.is_empty() {
            self.selection.clear();
        }
    }

    /// Previews a box selection. Nothing is reported until release.
    fn select_in_box(&mut self, rect: Rect, union: bool) {
        let hits: Vec<NodeId> = self.layout.layout().positions_within(rect).cloned().collect();
        if union {
            if let Some(snapshot) = &self.gesture_snapshot {
                self.selection.restore(snapshot.clone());
            }
            self.selection.extend_with_hashed(hits);
        } else {
            self.selection.replace_with_hashed(hits);
        }
    }

    fn commit_box(&mut self, rect: Rect, union: bool) {
        let scale = self.camera.scale();
        let min = self.config.box_select_min_px;
        if rect.width() * scale < min || rect.height() * scale < min {
            // Too small to be deliberate; keep the selection from before the gesture.
            if let Some(snapshot) = self.gesture_snapshot.take() {
                self.selection.restore(snapshot);
            }
            return;
        }
        self.select_in_box(rect, union);
        #[cfg(feature = "tracing")]
        tracing::debug!(selected = self.selection.len(), "box selection committed");
    }

    /// Collects the drag group and switches to [`GestureState::DraggingNodes`].
    ///
    /// Pressing an unselected node selects it alone first. Selected nodes
    /// that are hidden or focused stay put; stored descendants of collapsed
    /// selected nodes come along.
    fn begin_node_drag(
        &mut self,
        node: &NodeId,
        grab: Point,
        pointer: Point,
        out: &mut Vec<CanvasEvent>,
    ) -> GestureState {
        if !self.selection.contains(node) {
            self.selection.select_only(node.clone());
            self.flush_selection(out);
        }
        let Some(tree) = &self.tree else {
            return GestureState::Idle;
        };
        let layout = self.layout.layout();
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for id in self.selection.iter() {
            if self.focused.as_ref() == Some(id) {
                continue;
            }
            let Some(point) = layout.get(id) else {
                continue;
            };
            if seen.insert(id.clone()) {
                items.push((id.clone(), point.position()));
            }
            if !tree.get(id).is_some_and(|n| n.is_collapsed()) {
                continue;
            }
            for hidden in tree.descendants(id) {
                let stored = self.overrides.get(hidden.id()).copied().or(hidden.stored());
                if let Some(position) = stored {
                    if seen.insert(hidden.id().clone()) {
                        items.push((hidden.id().clone(), position));
                    }
                }
            }
        }
        if items.is_empty() {
            return GestureState::Idle;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(nodes = items.len(), "node drag started");
        let reparent_source = (self.selection.len() == 1).then(|| node.clone());
        GestureState::DraggingNodes(NodeDrag {
            group: GroupDrag::new(grab, items),
            pointer,
            reparent_source,
        })
    }

    fn commit_drag(&mut self, drag: NodeDrag, world: Point, out: &mut Vec<CanvasEvent>) {
        if let Some(source) = &drag.reparent_source {
            if let Some(target) = self.reparent_target(source, world) {
                #[cfg(feature = "tracing")]
                tracing::debug!(%source, %target, "node reparented");
                out.push(CanvasEvent::NodeReparented {
                    source: source.clone(),
                    target,
                });
                return;
            }
        }
        if world == drag.group.grab_point() {
            return;
        }
        let moved: Vec<(NodeId, Point)> = drag
            .group
            .positions_at(world)
            .map(|(id, p)| (id.clone(), p))
            .collect();
        for (id, position) in &moved {
            self.overrides.insert(id.clone(), *position);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(nodes = moved.len(), "node group moved");
        out.push(CanvasEvent::NodeGroupMoved(moved));
        self.relayout(out);
    }

    /// Returns the node `source` would be reparented onto when dropped at `world`.
    ///
    /// The top-most node under the pointer (other than `source`) is the
    /// target, unless it is a descendant of `source` or already its parent.
    /// The root is never reparented.
    fn reparent_target(&self, source: &NodeId, world: Point) -> Option<NodeId> {
        let tree = self.tree.as_ref()?;
        let target = self
            .layout
            .layout()
            .hit_test_where(world, |id| id != source)?;
        if tree.is_ancestor(source, target) {
            return None;
        }
        let parent = tree.get(source)?.parent()?;
        if parent.id() == target {
            return None;
        }
        Some(target.clone())
    }

    fn commit_link(&mut self, source: NodeId, world: Point, out: &mut Vec<CanvasEvent>) {
        let Some(target) = self.layout.layout().hit_test(world).cloned() else {
            return;
        };
        if target == source {
            return;
        }
        let linked = self.links.iter().any(|l| l.connects(&source, &target))
            || self
                .pending_links
                .iter()
                .any(|(a, b)| (a == &source && b == &target) || (a == &target && b == &source));
        if linked {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(%source, %target, "link created");
        self.pending_links.push((source.clone(), target.clone()));
        out.push(CanvasEvent::LinkCreated { source, target });
    }
}
