// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout behavior across whole documents.

use canopy_layout::{
    LayoutConfig, LayoutEngine, MindMap, Node, NodeId, NodeRecord, PositionMap, PositionSource,
    TreeError, compute_layout,
};
use kurbo::Point;
use proptest::prelude::*;

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

fn sample() -> Node {
    Node::new("root")
        .with_child(
            Node::new("a")
                .with_child(Node::new("a1"))
                .with_child(Node::new("a2").with_child(Node::new("a2x"))),
        )
        .with_child(Node::new("b").at(400.0, 300.0))
        .with_child(Node::new("c"))
}

#[test]
fn stored_positions_survive_every_pass() {
    let tree = MindMap::from_root(sample()).unwrap();
    let mut engine = LayoutEngine::default();
    for _ in 0..3 {
        engine.invalidate();
        let layout = engine.compute(&tree, &PositionMap::new());
        let b = layout.get(&id("b")).unwrap();
        assert_eq!(b.position(), Point::new(400.0, 300.0));
        assert_eq!(b.source, PositionSource::Stored);
    }
    assert_eq!(engine.passes(), 3);
}

#[test]
fn new_sibling_joins_the_stored_column() {
    let tree = MindMap::from_root(
        Node::new("root")
            .with_child(Node::new("old").at(520.0, -60.0))
            .with_child(Node::new("new")),
    )
    .unwrap();
    let layout = compute_layout(&tree, &PositionMap::new(), &LayoutConfig::default());
    let old = layout.position(&id("old")).unwrap();
    let new = layout.position(&id("new")).unwrap();
    assert_eq!(new.x, old.x);
    assert!(layout.get(&id("new")).unwrap().is_derived());
    assert_eq!(layout.derived().count(), 2);
}

#[test]
fn first_positioned_sibling_wins() {
    let tree = MindMap::from_root(
        Node::new("root")
            .with_child(Node::new("free"))
            .with_child(Node::new("p1").at(700.0, 0.0))
            .with_child(Node::new("p2").at(900.0, 80.0)),
    )
    .unwrap();
    let layout = compute_layout(&tree, &PositionMap::new(), &LayoutConfig::default());
    assert_eq!(layout.position(&id("free")).unwrap().x, 700.0);
}

#[test]
fn flat_cycles_are_rejected() {
    let records = vec![
        NodeRecord::new("root").with_children(["a"]),
        NodeRecord::new("a").with_children(["b"]),
        NodeRecord::new("b").with_children(["root"]),
    ];
    assert_eq!(
        MindMap::from_records("root", records).unwrap_err(),
        TreeError::Cycle(id("root"))
    );
}

#[test]
fn points_come_out_in_pre_order() {
    let tree = MindMap::from_root(sample()).unwrap();
    let layout = compute_layout(&tree, &PositionMap::new(), &LayoutConfig::default());
    let order: Vec<&str> = layout.iter().map(|p| p.node_id.as_str()).collect();
    assert_eq!(order, ["root", "a", "a1", "a2", "a2x", "b", "c"]);
}

#[test]
fn collapse_changes_layout_without_losing_nodes() {
    let mut tree = MindMap::from_root(sample()).unwrap();
    let mut engine = LayoutEngine::default();
    let full = engine.compute(&tree, &PositionMap::new()).len();

    tree.set_collapsed(&id("a"), true);
    let folded = engine.compute(&tree, &PositionMap::new());
    assert_eq!(full, 7);
    assert_eq!(folded.len(), 4);
    assert_eq!(tree.len(), 7);

    tree.set_collapsed(&id("a"), false);
    assert_eq!(engine.compute(&tree, &PositionMap::new()).len(), 7);
    assert_eq!(engine.passes(), 3);
}

/// Builds a random tree from a parent choice per node; node `i` hangs under
/// some node `< i`, so the result is always a valid tree.
fn random_tree(parents: &[usize], stored: &[Option<(i16, i16)>], collapsed: &[bool]) -> MindMap {
    let n = parents.len() + 1;
    let mut records: Vec<NodeRecord> = (0..n).map(|i| NodeRecord::new(format!("n{i}"))).collect();
    for (i, &p) in parents.iter().enumerate() {
        let child = i + 1;
        let parent = p % child;
        records[parent].children.push(id(&format!("n{child}")));
    }
    for (i, record) in records.iter_mut().enumerate() {
        if let Some(Some((x, y))) = stored.get(i) {
            record.stored = Some(Point::new(f64::from(*x), f64::from(*y)));
        }
        record.collapsed = collapsed.get(i).copied().unwrap_or(false);
    }
    MindMap::from_records("n0", records).unwrap()
}

proptest! {
    #[test]
    fn layout_is_deterministic(
        parents in prop::collection::vec(any::<usize>(), 0..40),
        stored in prop::collection::vec(prop::option::of(any::<(i16, i16)>()), 0..41),
        collapsed in prop::collection::vec(any::<bool>(), 0..41),
    ) {
        let tree = random_tree(&parents, &stored, &collapsed);
        let config = LayoutConfig::default();
        let a = compute_layout(&tree, &PositionMap::new(), &config);
        let b = compute_layout(&tree.clone(), &PositionMap::new(), &config);
        prop_assert_eq!(a.points(), b.points());

        let mut engine = LayoutEngine::new(config);
        let cached = engine.compute(&tree, &PositionMap::new()).clone();
        prop_assert_eq!(cached.points(), a.points());
    }

    #[test]
    fn stored_nodes_never_move(
        parents in prop::collection::vec(any::<usize>(), 1..40),
        stored in prop::collection::vec(prop::option::of(any::<(i16, i16)>()), 0..41),
    ) {
        let tree = random_tree(&parents, &stored, &[]);
        let layout = compute_layout(&tree, &PositionMap::new(), &LayoutConfig::default());
        for node in tree.iter() {
            let point = layout.get(node.id()).unwrap();
            match node.stored() {
                Some(p) => {
                    prop_assert_eq!(point.position(), p);
                    prop_assert!(!point.is_derived());
                }
                None => prop_assert!(point.is_derived()),
            }
        }
    }
}
