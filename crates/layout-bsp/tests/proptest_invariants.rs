//! Property-based invariant tests for partition trees and region graphs.
//!
//! 1. Leaf areas sum to the root area.
//! 2. Every child sits one level below its parent.
//! 3. The frontier holds unique leaves; leaves outside it are terminal.
//! 4. Staged generation keeps the frontier invariants after every call.
//! 5. Adjacency built from a tree is symmetric and matches geometry.
//! 6. Division output is symmetric, matches geometry and conserves area.
//! 7. Disjointness is symmetric.
//! 8. Disconnect leaves no dangling references.

use std::collections::HashSet;

use layout_bsp::{
    DivisionConfig, GenerationConfig, PartitionTree, Rect, RectGraph, are_disjoint,
    divide_rectangle,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-50i32..=50, -50i32..=50, 1i32..=40, 1i32..=40)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h).unwrap())
}

fn config_strategy() -> impl Strategy<Value = GenerationConfig> {
    (
        1i32..=6,
        1i32..=6,
        proptest::option::of(0usize..=10),
        proptest::option::of(0usize..=40),
        any::<bool>(),
    )
        .prop_map(|(min_width, min_height, max_depth, max_iterations, allow)| {
            GenerationConfig {
                min_width,
                min_height,
                max_depth,
                max_iterations,
                allow_either_axis: allow,
            }
        })
}

fn assert_tree_invariants(tree: &PartitionTree, config: &GenerationConfig) {
    let leaf_area: i64 = tree
        .leaves()
        .iter()
        .map(|&id| tree.node(id).unwrap().rect().area())
        .sum();
    assert_eq!(leaf_area, tree.root_node().rect().area());

    for (_, node) in tree.iter() {
        if let Some(parent) = node.parent() {
            assert_eq!(node.depth(), tree.node(parent).unwrap().depth() + 1);
        }
        if let Some((first, second)) = node.children() {
            let a = tree.node(first).unwrap().rect().area();
            let b = tree.node(second).unwrap().rect().area();
            assert_eq!(a + b, node.rect().area());
        }
    }

    let frontier: HashSet<_> = tree.frontier().iter().copied().collect();
    assert_eq!(frontier.len(), tree.frontier().len(), "duplicate frontier entry");
    for &id in tree.frontier() {
        assert!(tree.node(id).unwrap().is_leaf());
    }
    for leaf in tree.leaves() {
        if !frontier.contains(&leaf) {
            let node = tree.node(leaf).unwrap();
            assert!(
                node.determine_split_axis(
                    config.min_width,
                    config.min_height,
                    config.allow_either_axis
                )
                .is_none(),
                "leaf {leaf} left the frontier while still splittable"
            );
        }
    }
}

fn assert_graph_matches_geometry<T>(graph: &RectGraph<T>) {
    assert!(graph.is_symmetric());
    for (a, node_a) in graph.iter() {
        assert!(!node_a.is_neighbour(a));
        for (b, node_b) in graph.iter() {
            if a != b {
                let touching = !are_disjoint(node_a.rect(), node_b.rect());
                assert_eq!(node_a.is_neighbour(b), touching, "{a} {b}");
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Tree invariants after one generation call
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn generated_tree_is_well_formed(
        rect in rect_strategy(),
        config in config_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let tree = PartitionTree::generate_random(rect, &config, &mut rng).unwrap();
        assert_tree_invariants(&tree, &config);
        prop_assert_eq!(tree.node_count(), tree.iter().count());
        prop_assert_eq!(tree.node_count(), 2 * tree.leaves().len() - 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Staged generation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn staged_generation_keeps_invariants(
        rect in rect_strategy(),
        min_size in 1i32..=4,
        steps in 1usize..=6,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tree = PartitionTree::generate_random(
            rect,
            &GenerationConfig::default().with_max_depth(0),
            &mut rng,
        )
        .unwrap();

        let mut nodes = tree.node_count();
        for depth in 1..=steps {
            let config = GenerationConfig::default()
                .with_min_size(min_size, min_size)
                .with_max_depth(depth)
                .with_max_iterations(3);
            tree.generate(&config, &mut rng).unwrap();
            assert_tree_invariants(&tree, &config);
            prop_assert!(tree.node_count() >= nodes);
            nodes = tree.node_count();
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Adjacency from a tree
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn adjacency_matches_geometry(
        rect in rect_strategy(),
        config in config_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let tree = PartitionTree::generate_random(rect, &config, &mut rng).unwrap();
        let graph = tree.adjacency(|r| r.area()).unwrap();
        prop_assert_eq!(graph.len(), tree.leaves().len());
        assert_graph_matches_geometry(&graph);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Division service
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn division_matches_geometry(
        rect in rect_strategy(),
        max_depth in 0usize..=8,
        min_width in 1i32..=5,
        min_height in 1i32..=5,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = DivisionConfig::<()>::default()
            .with_depth(0, max_depth)
            .with_min_size(min_width, min_height);
        let graph = divide_rectangle(rect, &config, &mut rng).unwrap();

        let area: i64 = graph.iter().map(|(_, node)| node.rect().area()).sum();
        prop_assert_eq!(area, rect.area());
        prop_assert!(graph.len() <= 1 << max_depth);
        assert_graph_matches_geometry(&graph);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Disjointness is symmetric
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn disjointness_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(are_disjoint(&a, &b), are_disjoint(&b, &a));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Disconnect correctness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn disconnect_leaves_no_references(
        rect in rect_strategy(),
        seed in any::<u64>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = GenerationConfig::default().with_min_size(2, 2);
        let tree = PartitionTree::generate_random(rect, &config, &mut rng).unwrap();
        let mut graph = tree.adjacency(|_| ()).unwrap();

        let ids: Vec<_> = graph.ids().collect();
        let victim = ids[pick.index(ids.len())];
        let edges_before = graph.edge_count();
        let degree = graph.get(victim).unwrap().degree();

        graph.disconnect(victim).unwrap();

        prop_assert_eq!(graph.get(victim).unwrap().degree(), 0);
        for (_, node) in graph.iter() {
            prop_assert!(!node.is_neighbour(victim));
        }
        prop_assert_eq!(graph.edge_count(), edges_before - degree);
        prop_assert!(graph.is_symmetric());
    }
}
