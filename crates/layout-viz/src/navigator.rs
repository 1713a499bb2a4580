//! Partition tree navigation for interactive visualization.

use layout_bsp::{NodeId, PartitionNode, PartitionTree};
use macroquad::prelude::*;

use crate::{Viewport, draw_outline};

/// Child taken at each node in the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Top or left half.
    First,
    /// Bottom or right half.
    Second,
}

/// Interactive navigator for exploring the partition tree structure.
///
/// The path is stored as directions rather than node ids so it stays valid
/// while the tree keeps growing underneath it.
#[derive(Debug, Default)]
pub struct TreeNavigator {
    path: Vec<Direction>,
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    /// Returns the current depth in the tree.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Descends to the first child. Returns true if successful.
    pub fn go_first<T>(&mut self, tree: &PartitionTree<T>) -> bool {
        self.descend(tree, Direction::First)
    }

    /// Descends to the second child. Returns true if successful.
    pub fn go_second<T>(&mut self, tree: &PartitionTree<T>) -> bool {
        self.descend(tree, Direction::Second)
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update<T>(&mut self, tree: &PartitionTree<T>) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::Key1) {
            changed = self.go_first(tree);
        }
        if is_key_pressed(KeyCode::Key2) {
            changed = self.go_second(tree);
        }
        if is_key_pressed(KeyCode::P) {
            changed = self.go_parent();
        }
        if is_key_pressed(KeyCode::Home) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        changed
    }

    /// Returns the id of the current node.
    ///
    /// Falls back to the deepest valid ancestor if the path no longer fits,
    /// e.g. after the tree was regenerated.
    pub fn current<T>(&self, tree: &PartitionTree<T>) -> NodeId {
        let mut current = tree.root();
        for &direction in &self.path {
            match child(tree, current, direction) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Returns the current node.
    pub fn current_node<'a, T>(&self, tree: &'a PartitionTree<T>) -> Option<&'a PartitionNode<T>> {
        tree.node(self.current(tree))
    }

    /// Outlines the rectangle of the current node.
    pub fn render<T>(&self, tree: &PartitionTree<T>, viewport: &Viewport) {
        if let Some(node) = self.current_node(tree) {
            draw_outline(viewport, node.rect(), 3.0, YELLOW);
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui<T>(&self, tree: &PartitionTree<T>, y_offset: f32) {
        let Some(node) = self.current_node(tree) else {
            return;
        };

        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|d| match d {
                    Direction::First => "1",
                    Direction::Second => "2",
                })
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        draw_text(&format!("Node: {node}"), 10.0, y_offset, 18.0, WHITE);
        draw_text(
            &format!("Path: {} (depth {})", path_str, node.depth()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            if node.is_leaf() {
                "(leaf)"
            } else {
                "Children: [1] first [2] second"
            },
            10.0,
            y_offset + 40.0,
            18.0,
            if node.is_leaf() { ORANGE } else { GREEN },
        );
        draw_text("[P]arent | [Home] root", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }

    fn descend<T>(&mut self, tree: &PartitionTree<T>, direction: Direction) -> bool {
        if child(tree, self.current(tree), direction).is_some() {
            self.path.push(direction);
            return true;
        }
        false
    }
}

fn child<T>(tree: &PartitionTree<T>, id: NodeId, direction: Direction) -> Option<NodeId> {
    let node = tree.node(id)?;
    match direction {
        Direction::First => node.left(),
        Direction::Second => node.right(),
    }
}
