//! Read-only snapshots of nodes handed to renderers and listeners

use generational_arena::Index;
use serde::Serialize;

use crate::domain::{CheckState, NodePath, NodeValue, TreeArena, TreeResult};

/// A node as seen from outside the tree: where it is and what it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub path: NodePath,
    pub label: String,
    pub value: NodeValue,
    pub state: CheckState,
    pub has_children: bool,
}

impl NodeView {
    pub fn from_tree(tree: &TreeArena, idx: Index) -> TreeResult<Self> {
        let node = tree.node(idx)?;
        Ok(Self {
            path: tree.path_of(idx)?,
            label: node.data.label.clone(),
            value: node.data.value.clone(),
            state: node.state,
            has_children: !node.is_leaf(),
        })
    }

    /// Views of `indices`, in the given order.
    pub fn collect(tree: &TreeArena, indices: &[Index]) -> TreeResult<Vec<Self>> {
        indices.iter().map(|&idx| Self::from_tree(tree, idx)).collect()
    }
}
