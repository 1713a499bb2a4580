//! Derives a region graph from a finished partition tree.
//!
//! The tree is walked depth-first while a working graph is rewritten in place:
//! every internal node is replaced by its two children, which inherit the
//! node's neighbours they still touch. When the walk ends only the leaves are
//! left and their neighbour sets match geometric adjacency.

use tracing::debug;

use crate::bsp::{NodeId, PartitionTree};
use crate::{PartitionError, Rect, Result};

use super::node::RegionId;
use super::region_graph::RectGraph;

/// Builds the adjacency graph of the leaves of `tree`.
///
/// Region `i` of the result wraps the `i`-th leaf of
/// [`PartitionTree::leaves`]. `payload` is called exactly once per leaf, in
/// that order, with the leaf's rectangle.
pub fn build_adjacency<P, T, F>(tree: &PartitionTree<P>, mut payload: F) -> Result<RectGraph<T>>
where
    F: FnMut(Rect) -> T,
{
    let mut working = RectGraph::with_capacity(tree.node_count());
    let root = tree.root();
    let start = working.insert_from_partition(*tree.root_node().rect(), (), root);

    let mut leaves = Vec::new();
    merge(tree, root, start, &mut working, &mut leaves)?;

    let graph = working.into_ordered(&leaves, |rect, ()| payload(*rect));
    debug!(
        regions = graph.len(),
        edges = graph.edge_count(),
        "adjacency graph built"
    );
    Ok(graph)
}

fn merge<P>(
    tree: &PartitionTree<P>,
    id: NodeId,
    region: RegionId,
    graph: &mut RectGraph<()>,
    leaves: &mut Vec<RegionId>,
) -> Result<()> {
    let Some((first, second)) = tree.node(id).and_then(|node| node.children()) else {
        leaves.push(region);
        return Ok(());
    };

    let first_rect = *child_rect(tree, first)?;
    let second_rect = *child_rect(tree, second)?;
    let first_region = graph.insert_from_partition(first_rect, (), first);
    let second_region = graph.insert_from_partition(second_rect, (), second);
    graph.connect(first_region, second_region)?;

    let outside: Vec<RegionId> = graph
        .get(region)
        .map(|node| node.neighbours().iter().copied().collect())
        .unwrap_or_default();
    graph.connect_adjacent(first_region, outside.iter().copied())?;
    graph.connect_adjacent(second_region, outside)?;
    graph.remove(region)?;

    merge(tree, first, first_region, graph, leaves)?;
    merge(tree, second, second_region, graph, leaves)
}

fn child_rect<P>(tree: &PartitionTree<P>, id: NodeId) -> Result<&Rect> {
    tree.node(id)
        .map(|node| node.rect())
        .ok_or(PartitionError::UnknownNode(id))
}

impl<P> PartitionTree<P> {
    /// Builds the adjacency graph of this tree's leaves.
    ///
    /// See [`build_adjacency`].
    pub fn adjacency<T, F>(&self, payload: F) -> Result<RectGraph<T>>
    where
        F: FnMut(Rect) -> T,
    {
        build_adjacency(self, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Axis, GenerationConfig};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    fn fully_expanded_2x2() -> PartitionTree {
        let mut tree = PartitionTree::new(rect(0, 0, 2, 2), Axis::Horizontal);
        let mut rng = StdRng::seed_from_u64(3);
        tree.generate(&GenerationConfig::default(), &mut rng).unwrap();
        tree
    }

    fn assert_matches_geometry<T>(graph: &RectGraph<T>) {
        assert!(graph.is_symmetric());
        for (a, node_a) in graph.iter() {
            for (b, node_b) in graph.iter() {
                if a == b {
                    continue;
                }
                let touching = !node_a.rect().is_disjoint_from(node_b.rect());
                assert_eq!(node_a.is_neighbour(b), touching, "{a} {b}");
            }
        }
    }

    #[test]
    fn lone_root_gives_single_region() {
        let tree = PartitionTree::new(rect(3, 4, 5, 6), Axis::None);
        let graph = tree.adjacency(|_| ()).unwrap();
        assert_eq!(graph.len(), 1);
        let (id, node) = graph.iter().next().unwrap();
        assert_eq!(id, RegionId(0));
        assert_eq!(*node.rect(), rect(3, 4, 5, 6));
        assert_eq!(node.degree(), 0);
        assert_eq!(node.partition_node(), Some(tree.root()));
    }

    #[test]
    fn fully_expanded_2x2_gives_four_unit_regions() {
        let tree = fully_expanded_2x2();
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.leaves().len(), 4);

        let graph = build_adjacency(&tree, |_| ()).unwrap();
        assert_eq!(graph.len(), 4);
        for (_, node) in graph.iter() {
            assert_eq!(node.rect().width(), 1);
            assert_eq!(node.rect().height(), 1);
            assert_eq!(node.degree(), 2);
        }
        assert_eq!(graph.edge_count(), 4);
        assert_matches_geometry(&graph);
    }

    #[test]
    fn payload_factory_runs_once_per_leaf_in_leaf_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = GenerationConfig::default().with_min_size(3, 3);
        let tree = PartitionTree::generate_random(rect(0, 0, 40, 30), &config, &mut rng).unwrap();

        let mut seen = Vec::new();
        let graph = tree
            .adjacency(|r| {
                seen.push(r);
                seen.len() - 1
            })
            .unwrap();

        let leaves = tree.leaves();
        assert_eq!(seen.len(), leaves.len());
        assert_eq!(graph.len(), leaves.len());
        for (index, &leaf) in leaves.iter().enumerate() {
            let node = graph.get(RegionId(index)).unwrap();
            assert_eq!(*node.payload(), index);
            assert_eq!(node.partition_node(), Some(leaf));
            assert_eq!(node.rect(), tree.node(leaf).unwrap().rect());
            assert_eq!(seen[index], *node.rect());
        }
        assert_matches_geometry(&graph);
    }

    #[test]
    fn strips_have_chain_adjacency() {
        let mut tree = PartitionTree::new(rect(0, 0, 4, 1), Axis::Vertical);
        let (a, rest) = tree.split(tree.root(), Axis::Vertical, 1).unwrap();
        let (b, rest) = tree.split(rest, Axis::Vertical, 1).unwrap();
        let (c, d) = tree.split(rest, Axis::Vertical, 1).unwrap();
        assert_eq!(tree.leaves(), vec![a, b, c, d]);

        let graph = tree.adjacency(|r| r.x()).unwrap();
        let degrees: Vec<_> = graph.iter().map(|(_, node)| node.degree()).collect();
        assert_eq!(degrees, vec![1, 2, 2, 1]);
        let xs: Vec<_> = graph.iter().map(|(_, node)| *node.payload()).collect();
        assert_eq!(xs, vec![0, 1, 2, 3]);
        assert_matches_geometry(&graph);
    }
}
