// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout engine: baseline tree layout plus stored-position overrides.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use canopy_view2d::geometry::{contains, node_box, union_bounds};
use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};

use crate::model::NodeId;
use crate::tree::{MindMap, NodeFlags, Slot};

/// Positions keyed by node id.
///
/// Passed to [`LayoutEngine::compute`] as stored positions that take
/// precedence over the ones inside the tree, for example positions the host
/// has accepted but not yet echoed back in a new snapshot.
pub type PositionMap = HashMap<NodeId, Point>;

/// Spacing and sizing used by the baseline pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal distance between consecutive depth columns.
    pub level_gap: f64,
    /// Vertical gap left between consecutive leaves.
    pub sibling_spacing: f64,
    /// Box size assumed for nodes without a measured size.
    pub default_size: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_gap: 240.0,
            sibling_spacing: 24.0,
            default_size: Size::new(160.0, 40.0),
        }
    }
}

/// Where a laid-out position came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PositionSource {
    /// The document (or an override) stores this position.
    Stored,
    /// The engine invented this position for a node without one.
    Derived,
}

/// One visible node's coordinates from a layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPoint {
    /// The node.
    pub node_id: NodeId,
    /// Left edge in world space.
    pub x: f64,
    /// Top edge in world space.
    pub y: f64,
    /// Depth below the root.
    pub depth: u32,
    /// Measured size, or the configured default.
    pub size: Size,
    /// Whether the position was stored or invented.
    pub source: PositionSource,
}

impl LayoutPoint {
    /// Returns the top-left position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the node's world-space box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        node_box(self.position(), self.size)
    }

    /// Returns `true` if the engine invented this position.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.source == PositionSource::Derived
    }
}

/// The output of one layout pass: a point per visible node, in pre-order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    points: Vec<LayoutPoint>,
    index: HashMap<NodeId, usize>,
    revision: u64,
}

impl Layout {
    /// Returns the number of laid-out nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if nothing was laid out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points in pre-order (paint order).
    #[must_use]
    pub fn points(&self) -> &[LayoutPoint] {
        &self.points
    }

    /// Iterates over the points in pre-order.
    pub fn iter(&self) -> core::slice::Iter<'_, LayoutPoint> {
        self.points.iter()
    }

    /// Returns the point of a visible node.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&LayoutPoint> {
        self.index.get(id).map(|&i| &self.points[i])
    }

    /// Returns the position of a visible node.
    #[must_use]
    pub fn position(&self, id: &NodeId) -> Option<Point> {
        self.get(id).map(LayoutPoint::position)
    }

    /// Returns `true` if the node was laid out (exists and is visible).
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates over the points whose position was invented by the engine.
    pub fn derived(&self) -> impl Iterator<Item = &LayoutPoint> + '_ {
        self.points.iter().filter(|p| p.is_derived())
    }

    /// Returns the pass counter of the engine that produced this layout.
    ///
    /// Equal revisions from the same engine mean identical layouts.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the union of every node box, or `None` for an empty layout.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        union_bounds(self.points.iter().map(LayoutPoint::bounds))
    }

    /// Returns the top-most node whose box contains `world_pt`.
    ///
    /// Nodes later in pre-order paint on top, so they win.
    #[must_use]
    pub fn hit_test(&self, world_pt: Point) -> Option<&NodeId> {
        self.hit_test_where(world_pt, |_| true)
    }

    /// Like [`Layout::hit_test`], skipping nodes for which `accept` returns `false`.
    #[must_use]
    pub fn hit_test_where(
        &self,
        world_pt: Point,
        mut accept: impl FnMut(&NodeId) -> bool,
    ) -> Option<&NodeId> {
        self.points
            .iter()
            .rev()
            .find(|p| contains(p.bounds(), world_pt) && accept(&p.node_id))
            .map(|p| &p.node_id)
    }

    /// Returns the ids whose position lies inside `rect`, edges included.
    pub fn positions_within(&self, rect: Rect) -> impl Iterator<Item = &NodeId> + '_ {
        self.points
            .iter()
            .filter(move |p| contains(rect, p.position()))
            .map(|p| &p.node_id)
    }
}

/// Computes a layout without caching.
///
/// The baseline pass places depth columns `level_gap` apart along x and
/// stacks visible leaves along y in pre-order, centering every parent
/// between its first and last child; the root's baseline is the origin.
///
/// Then, top-down:
/// - a node with a stored position (from `overrides`, else the tree) gets
///   exactly that position;
/// - any other node takes its baseline shifted by its parent's displacement
///   from the parent's own baseline, and if a sibling has a stored position,
///   the node's x snaps to the first such sibling's x so it joins the
///   sibling column.
///
/// Subtrees under collapsed nodes are skipped but stay in the tree.
#[must_use]
pub fn compute_layout(tree: &MindMap, overrides: &PositionMap, config: &LayoutConfig) -> Layout {
    let slots = tree.slots();
    let n = slots.len();
    let stored = |i: usize| -> Option<Point> {
        let slot = &slots[i];
        overrides.get(&slot.id).copied().or(slot.stored)
    };
    let size_of = |slot: &Slot| slot.size.unwrap_or(config.default_size);

    // Baseline spread coordinate: leaves top to bottom, then parents centered.
    let mut base_y = vec![0.0_f64; n];
    let mut cursor = 0.0;
    for (i, slot) in slots.iter().enumerate() {
        if is_visible(slot) && !spreads_children(slot) {
            base_y[i] = cursor;
            cursor += size_of(slot).height + config.sibling_spacing;
        }
    }
    for (i, slot) in slots.iter().enumerate().rev() {
        if is_visible(slot) && spreads_children(slot) {
            let first = slot.children[0] as usize;
            let last = slot.children[slot.children.len() - 1] as usize;
            base_y[i] = (base_y[first] + base_y[last]) / 2.0;
        }
    }
    let origin_y = base_y.first().copied().unwrap_or_default();
    let baseline = |i: usize| {
        Point::new(
            f64::from(slots[i].depth) * config.level_gap,
            base_y[i] - origin_y,
        )
    };

    let mut finals = vec![Point::ZERO; n];
    let mut points = Vec::with_capacity(n);
    let mut index = HashMap::with_capacity(n);
    for (i, slot) in slots.iter().enumerate() {
        if !is_visible(slot) {
            continue;
        }
        let (position, source) = match stored(i) {
            Some(p) => (p, PositionSource::Stored),
            None => {
                let mut candidate = baseline(i);
                if let Some(parent) = slot.parent {
                    let parent = parent as usize;
                    let displacement: Vec2 = finals[parent] - baseline(parent);
                    candidate += displacement;
                    let anchor = slots[parent]
                        .children
                        .iter()
                        .find_map(|&sibling| stored(sibling as usize));
                    if let Some(anchor) = anchor {
                        candidate.x = anchor.x;
                    }
                }
                (candidate, PositionSource::Derived)
            }
        };
        finals[i] = position;
        index.insert(slot.id.clone(), points.len());
        points.push(LayoutPoint {
            node_id: slot.id.clone(),
            x: position.x,
            y: position.y,
            depth: slot.depth,
            size: size_of(slot),
            source,
        });
    }

    Layout {
        points,
        index,
        revision: 0,
    }
}

fn is_visible(slot: &Slot) -> bool {
    !slot.flags.contains(NodeFlags::HIDDEN)
}

fn spreads_children(slot: &Slot) -> bool {
    !slot.children.is_empty() && !slot.flags.contains(NodeFlags::COLLAPSED)
}

/// Everything a layout pass reads. Two equal keys produce equal layouts.
#[derive(Clone, Debug, PartialEq)]
struct LayoutKey {
    config: LayoutConfig,
    entries: Vec<KeyEntry>,
}

#[derive(Clone, Debug, PartialEq)]
struct KeyEntry {
    id: NodeId,
    parent: Option<u32>,
    collapsed: bool,
    stored: Option<Point>,
    size: Option<Size>,
    // Not geometric; kept so downstream diffing sees recolored nodes as new output.
    color: String,
}

impl LayoutKey {
    fn new(tree: &MindMap, overrides: &PositionMap, config: &LayoutConfig) -> Self {
        let entries = tree
            .slots()
            .iter()
            .map(|slot| KeyEntry {
                id: slot.id.clone(),
                parent: slot.parent,
                collapsed: slot.flags.contains(NodeFlags::COLLAPSED),
                stored: overrides.get(&slot.id).copied().or(slot.stored),
                size: slot.size,
                color: slot.color.clone(),
            })
            .collect();
        Self {
            config: *config,
            entries,
        }
    }
}

/// Layout engine with a one-entry structural cache.
///
/// [`LayoutEngine::compute`] recomputes only when the tree shape, a
/// collapsed flag, a stored position, a size, a color or the config changed
/// since the previous call; otherwise it returns the cached layout. The
/// cache never changes results: [`compute_layout`] with the same inputs
/// gives the same points.
///
/// ## Example
///
/// ```rust
/// use canopy_layout::{LayoutConfig, LayoutEngine, MindMap, Node, NodeId, PositionMap};
///
/// let tree = MindMap::from_root(
///     Node::new("root").with_child(Node::new("a").at(300.0, -80.0)).with_child(Node::new("b")),
/// )
/// .unwrap();
///
/// let mut engine = LayoutEngine::new(LayoutConfig::default());
/// let layout = engine.compute(&tree, &PositionMap::new());
///
/// // Stored positions are used verbatim.
/// assert_eq!(layout.position(&NodeId::from("a")).unwrap().x, 300.0);
/// // A new sibling joins the column of the manually placed one.
/// assert_eq!(layout.position(&NodeId::from("b")).unwrap().x, 300.0);
/// assert!(layout.get(&NodeId::from("b")).unwrap().is_derived());
/// ```
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    key: Option<LayoutKey>,
    layout: Layout,
    passes: u64,
}

impl LayoutEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            key: None,
            layout: Layout::default(),
            passes: 0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replaces the configuration. The next [`LayoutEngine::compute`] recomputes.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// Returns the most recent layout.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns how many real (non-cached) passes have run.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Drops the cache key so the next call recomputes.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// Lays out `tree`, reusing the previous result if nothing relevant changed.
    pub fn compute(&mut self, tree: &MindMap, overrides: &PositionMap) -> &Layout {
        let key = LayoutKey::new(tree, overrides, &self.config);
        if self.key.as_ref() == Some(&key) {
            #[cfg(feature = "tracing")]
            tracing::trace!(revision = self.layout.revision, "layout cache hit");
            return &self.layout;
        }

        self.passes += 1;
        let mut layout = compute_layout(tree, overrides, &self.config);
        layout.revision = self.passes;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = tree.len(),
            visible = layout.len(),
            derived = layout.derived().count(),
            revision = layout.revision,
            "layout recomputed"
        );
        self.layout = layout;
        self.key = Some(key);
        &self.layout
    }
}
