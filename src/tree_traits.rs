//! Text rendering of a forest via termtree

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{TreeArena, TreeNode};

pub trait TreeNodeConvert {
    /// One `termtree` per root.
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl TreeNodeConvert for TreeArena {
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        self.roots()
            .iter()
            .filter_map(|&root_idx| {
                let root = self.get_node(root_idx)?;
                let mut tree = Tree::new(node_line(root));
                build_tree_representation(self, root_idx, &mut tree);
                Some(tree)
            })
            .collect()
    }
}

/// `[x] label (value)`
pub fn node_line(node: &TreeNode) -> String {
    format!("{} {} ({})", node.state.marker(), node.data.label, node.data.value)
}

/// Appends the children of `node_idx` (recursively) below `parent_tree`.
pub fn build_tree_representation(
    arena: &TreeArena,
    node_idx: Index,
    parent_tree: &mut Tree<String>,
) {
    if let Some(node) = arena.get_node(node_idx) {
        for &child_idx in node.children() {
            if let Some(child) = arena.get_node(child_idx) {
                let mut child_tree = Tree::new(node_line(child));
                build_tree_representation(arena, child_idx, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }
    }
}
