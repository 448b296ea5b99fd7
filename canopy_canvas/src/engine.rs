// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-canvas engine: document, layout, camera, selection and gestures.

use alloc::vec::Vec;

use canopy_layout::{Layout, LayoutEngine, Link, MindMap, NodeId, PositionMap};
use canopy_selection::{Selection, SelectionSnapshot};
use canopy_view2d::geometry::node_box;
use canopy_view2d::{Camera, cull};
use kurbo::{Point, Rect, Size, Vec2};

use crate::config::{CanvasConfig, InitialView};
use crate::event::CanvasEvent;
use crate::gesture::GestureState;
use crate::input::{Modifiers, ToolMode};
use crate::reconcile::PositionReconciler;

/// The line drawn while a link gesture is in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkPreview {
    /// Node the link starts from.
    pub source: NodeId,
    /// World position of the source connector.
    pub from: Point,
    /// World position under the pointer.
    pub to: Point,
}

/// Everything one open canvas needs, owned in one place.
///
/// The host feeds document snapshots, pointer and keyboard input and
/// commands; every call returns the [`CanvasEvent`]s it produced, in order.
/// Render state is read back through the query methods.
///
/// Pointer moves only touch camera or gesture state. Layout runs again only
/// when a new snapshot, a collapse toggle or a committed drag changes its
/// inputs.
///
/// ## Example
///
/// ```rust
/// use canopy_canvas::{CanvasConfig, CanvasEngine, CanvasEvent, PointerEvent};
/// use canopy_layout::{MindMap, Node, NodeId};
/// use kurbo::Size;
///
/// let mut engine = CanvasEngine::new(CanvasConfig::default(), Size::new(800.0, 600.0));
/// let tree = MindMap::from_root(Node::new("root").at(0.0, 0.0)).unwrap();
/// engine.set_document(tree, Vec::new());
///
/// // Click the root node (its box spans 160x40 from the origin).
/// engine.pointer_down(PointerEvent::mouse(10.0, 10.0));
/// let events = engine.pointer_up(PointerEvent::mouse(10.0, 10.0));
/// assert_eq!(events, [CanvasEvent::SelectionChanged(vec![NodeId::from("root")])]);
/// ```
#[derive(Debug)]
pub struct CanvasEngine {
    pub(crate) config: CanvasConfig,
    pub(crate) tree: Option<MindMap>,
    pub(crate) links: Vec<Link>,
    pub(crate) layout: LayoutEngine,
    /// Positions committed by drags and not yet echoed back by a snapshot.
    pub(crate) overrides: PositionMap,
    /// Links created but not yet echoed back by a snapshot.
    pub(crate) pending_links: Vec<(NodeId, NodeId)>,
    pub(crate) camera: Camera,
    pub(crate) selection: Selection<NodeId>,
    pub(crate) gesture: GestureState,
    /// Selection at pointer-down; restored if the gesture is cancelled.
    pub(crate) gesture_snapshot: Option<SelectionSnapshot<NodeId>>,
    pub(crate) tool: ToolMode,
    pub(crate) focused: Option<NodeId>,
    reconciler: PositionReconciler,
    reported_selection: Vec<NodeId>,
    reported_camera: u64,
}

impl CanvasEngine {
    /// Creates an engine with no document for a viewport of `viewport` pixels.
    #[must_use]
    pub fn new(config: CanvasConfig, viewport: Size) -> Self {
        let mut camera = Camera::new(viewport);
        camera.set_scale_limits(config.min_scale, config.max_scale);
        camera.set_zoom_step(config.zoom_step);
        let reported_camera = camera.revision();
        Self {
            layout: LayoutEngine::new(config.layout),
            config,
            tree: None,
            links: Vec::new(),
            overrides: PositionMap::new(),
            pending_links: Vec::new(),
            camera,
            selection: Selection::new(),
            gesture: GestureState::Idle,
            gesture_snapshot: None,
            tool: ToolMode::default(),
            focused: None,
            reconciler: PositionReconciler::new(),
            reported_selection: Vec::new(),
            reported_camera,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Replaces the document with a new snapshot.
    ///
    /// Drag positions and links waiting to be echoed back are dropped: the
    /// snapshot is authoritative. Selected or focused ids that no longer
    /// exist are discarded, and a gesture that refers to a vanished node is
    /// cancelled. The first snapshot also places the camera as
    /// [`CanvasConfig::initial_view`] says.
    pub fn set_document(&mut self, tree: MindMap, links: Vec<Link>) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        let first = self.tree.is_none();
        #[cfg(feature = "tracing")]
        tracing::debug!(nodes = tree.len(), links = links.len(), first, "document replaced");

        if !self.gesture.refers_only_to(&tree) {
            self.cancel_into(&mut out);
        }
        self.overrides.clear();
        self.pending_links.clear();
        self.links = links;
        if self.focused.as_ref().is_some_and(|id| !tree.contains(id)) {
            self.focused = None;
        }
        self.tree = Some(tree);
        self.prune_selection(&mut out);
        self.relayout(&mut out);

        if first {
            match self.config.initial_view {
                InitialView::Fixed(transform) => {
                    self.camera.set_transform(transform);
                }
                InitialView::FitContent => {
                    self.fit_camera();
                }
            }
            self.flush_camera(&mut out);
        }
        out
    }

    /// Returns the working copy of the document, if one was set.
    #[must_use]
    pub fn tree(&self) -> Option<&MindMap> {
        self.tree.as_ref()
    }

    /// Returns the links of the current snapshot.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Iterates over links whose endpoints are both laid out.
    pub fn visible_links(&self) -> impl Iterator<Item = &Link> + '_ {
        let layout = self.layout.layout();
        self.links
            .iter()
            .filter(move |l| layout.contains(&l.source) && layout.contains(&l.target))
    }

    /// Returns the current tool mode.
    #[must_use]
    pub fn tool_mode(&self) -> ToolMode {
        self.tool
    }

    /// Switches the tool mode, cancelling any gesture in progress.
    pub fn set_tool_mode(&mut self, mode: ToolMode) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        if mode != self.tool {
            self.cancel_into(&mut out);
            self.tool = mode;
        }
        out
    }

    /// Updates the viewport size. The transform is left unchanged.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.camera.set_viewport_size(size);
    }

    /// Returns the most recent layout.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        self.layout.layout()
    }

    /// Returns the number of layout passes run so far.
    #[must_use]
    pub fn layout_passes(&self) -> u64 {
        self.layout.passes()
    }

    /// Returns the laid-out nodes whose boxes reach the viewport, in paint order.
    #[must_use]
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let boxes = self
            .layout
            .layout()
            .iter()
            .map(|p| (p.node_id.clone(), self.display_box(p.position(), p.size, &p.node_id)));
        cull::visible_keys(
            self.camera.transform(),
            self.camera.viewport_size(),
            boxes,
            self.config.cull_margin_px,
        )
    }

    /// Returns where a node should be drawn: its live drag position while it
    /// is being dragged, its layout position otherwise.
    #[must_use]
    pub fn display_position(&self, id: &NodeId) -> Option<Point> {
        self.drag_preview(id).or_else(|| self.layout.layout().position(id))
    }

    /// Returns the live position of a node being dragged.
    #[must_use]
    pub fn drag_preview(&self, id: &NodeId) -> Option<Point> {
        match &self.gesture {
            GestureState::DraggingNodes(drag) => drag.group.position_of(id, drag.pointer),
            _ => None,
        }
    }

    /// Returns the live positions of every dragged node.
    #[must_use]
    pub fn drag_previews(&self) -> Vec<(NodeId, Point)> {
        match &self.gesture {
            GestureState::DraggingNodes(drag) => drag
                .group
                .positions_at(drag.pointer)
                .map(|(id, p)| (id.clone(), p))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the world rectangle of an active box selection.
    #[must_use]
    pub fn box_select_rect(&self) -> Option<Rect> {
        match &self.gesture {
            GestureState::BoxSelecting(b) if b.armed => Some(b.rect()),
            _ => None,
        }
    }

    /// Returns the line of an active link gesture.
    #[must_use]
    pub fn link_preview(&self) -> Option<LinkPreview> {
        match &self.gesture {
            GestureState::DrawingLink(link) => Some(LinkPreview {
                source: link.source.clone(),
                from: self.connector_center(&link.source)?,
                to: link.endpoint,
            }),
            _ => None,
        }
    }

    /// Returns the selection.
    #[must_use]
    pub fn selection(&self) -> &Selection<NodeId> {
        &self.selection
    }

    /// Returns the camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Returns the gesture in progress.
    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Returns the focused node, which cannot be dragged.
    #[must_use]
    pub fn focused(&self) -> Option<&NodeId> {
        self.focused.as_ref()
    }

    /// Focuses a node and centers the camera on it, or clears focus with `None`.
    ///
    /// The focused node can still be selected but not dragged. Unknown ids
    /// are ignored.
    pub fn focus_node(&mut self, id: Option<NodeId>) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        match id {
            None => self.focused = None,
            Some(id) => {
                if self.tree.as_ref().is_some_and(|t| t.contains(&id)) {
                    self.center_camera_on(&id);
                    self.focused = Some(id);
                    self.flush_camera(&mut out);
                }
            }
        }
        out
    }

    /// Centers the camera on a laid-out node, keeping the scale.
    pub fn center_on_node(&mut self, id: &NodeId) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        self.center_camera_on(id);
        self.flush_camera(&mut out);
        out
    }

    /// Flips a node's collapsed flag in the working copy and lays out again.
    ///
    /// Emits [`CanvasEvent::CollapseToggled`] so the host can persist the
    /// flag. Selected nodes that become hidden are deselected. Unknown ids
    /// are ignored.
    pub fn toggle_collapse(&mut self, id: &NodeId) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        let Some(was) = self
            .tree
            .as_ref()
            .and_then(|t| t.get(id))
            .map(|n| n.is_collapsed())
        else {
            return out;
        };
        self.cancel_into(&mut out);
        if let Some(tree) = self.tree.as_mut() {
            tree.set_collapsed(id, !was);
        }
        out.push(CanvasEvent::CollapseToggled {
            id: id.clone(),
            collapsed: !was,
        });
        self.prune_selection(&mut out);
        self.relayout(&mut out);
        out
    }

    /// Zooms in one step about the viewport center.
    pub fn zoom_in(&mut self) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        self.camera.zoom_in();
        self.flush_camera(&mut out);
        out
    }

    /// Zooms out one step about the viewport center.
    pub fn zoom_out(&mut self) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        self.camera.zoom_out();
        self.flush_camera(&mut out);
        out
    }

    /// Fits every laid-out node into the viewport. No-op for degenerate bounds.
    pub fn zoom_to_fit(&mut self) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        self.fit_camera();
        self.flush_camera(&mut out);
        out
    }

    /// Handles a wheel or trackpad scroll of `delta` screen pixels at `anchor`.
    ///
    /// With Ctrl or Cmd held it zooms one step about the anchor (scrolling up
    /// zooms in); otherwise it pans.
    pub fn wheel(&mut self, delta: Vec2, anchor: Point, modifiers: Modifiers) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        if modifiers.toggles() {
            let step = self.config.zoom_step;
            if delta.y < 0.0 {
                self.camera.zoom_by(step, Some(anchor));
            } else if delta.y > 0.0 {
                self.camera.zoom_by(1.0 / step, Some(anchor));
            }
        } else {
            self.camera.pan_by(-delta.x, -delta.y);
        }
        self.flush_camera(&mut out);
        out
    }

    /// Returns the world box of a node as drawn, honoring drag previews.
    fn display_box(&self, position: Point, size: Size, id: &NodeId) -> Rect {
        node_box(self.drag_preview(id).unwrap_or(position), size)
    }

    /// World position of the link connector on a node's right edge.
    pub(crate) fn connector_center(&self, id: &NodeId) -> Option<Point> {
        let point = self.layout.layout().get(id)?;
        let bounds = point.bounds();
        Some(Point::new(bounds.x1, bounds.center().y))
    }

    fn center_camera_on(&mut self, id: &NodeId) {
        if let Some(point) = self.layout.layout().get(id) {
            let center = point.bounds().center();
            self.camera.center_on(center, None);
        }
    }

    fn fit_camera(&mut self) {
        if let Some(bounds) = self.layout.layout().bounds() {
            let viewport = self.camera.viewport_size();
            self.camera
                .zoom_to_fit(bounds, viewport, self.config.fit_padding);
        }
    }

    /// Lays out the working copy and reports newly derived positions.
    pub(crate) fn relayout(&mut self, out: &mut Vec<CanvasEvent>) {
        let Some(tree) = &self.tree else {
            return;
        };
        let layout = self.layout.compute(tree, &self.overrides);
        let discovered = self.reconciler.reconcile(layout);
        if !discovered.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(count = discovered.len(), "layout positions discovered");
            out.push(CanvasEvent::LayoutPositionsDiscovered(discovered));
        }
    }

    /// Drops selected ids that no longer exist or are hidden.
    ///
    /// The pointer-down snapshot is pruned too, so a cancelled gesture cannot
    /// bring them back. A live box selection is reported at release only.
    fn prune_selection(&mut self, out: &mut Vec<CanvasEvent>) {
        if let Some(tree) = &self.tree {
            self.selection.retain(|id| tree.is_visible(id));
            if let Some(snapshot) = self.gesture_snapshot.take() {
                let mut saved = Selection::new();
                saved.restore(snapshot);
                saved.retain(|id| tree.is_visible(id));
                self.gesture_snapshot = Some(saved.snapshot());
            }
        }
        if !matches!(self.gesture, GestureState::BoxSelecting(_)) {
            self.flush_selection(out);
        }
    }

    /// Emits [`CanvasEvent::SelectionChanged`] if the selection differs from the last report.
    pub(crate) fn flush_selection(&mut self, out: &mut Vec<CanvasEvent>) {
        if self.selection.items() != self.reported_selection.as_slice() {
            self.reported_selection = self.selection.items().to_vec();
            out.push(CanvasEvent::SelectionChanged(self.reported_selection.clone()));
        }
    }

    /// Emits [`CanvasEvent::CameraTransformChanged`] if the camera moved since the last report.
    pub(crate) fn flush_camera(&mut self, out: &mut Vec<CanvasEvent>) {
        let revision = self.camera.revision();
        if revision != self.reported_camera {
            self.reported_camera = revision;
            out.push(CanvasEvent::CameraTransformChanged(*self.camera.transform()));
        }
    }
}
