use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::path::NodePath;
use crate::domain::state::CheckState;
use crate::domain::value::NodeValue;

/// Display payload of a node; never interpreted by the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub label: String,
    /// Identity key used for selection lookup; not required to be unique
    pub value: NodeValue,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Tree node in the arena-based forest.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    pub state: CheckState,
    /// Index of parent node in the arena, None for root nodes
    parent: Option<Index>,
    /// Indices of child nodes in the arena, in sibling order
    children: Vec<Index>,
}

impl TreeNode {
    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based forest of checkbox nodes.
///
/// Nodes are owned by the arena; parent links are plain indices, assigned once on
/// insertion. The shape is fixed after construction, only node states change.
#[derive(Debug, Default)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    /// Root nodes in sibling order
    roots: Vec<Index>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node as the last child of `parent`, or as the last root.
    ///
    /// Only the builder shapes a tree, so this stays crate-private.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(
        &mut self,
        data: NodeData,
        state: CheckState,
        parent: Option<Index>,
    ) -> TreeResult<Index> {
        if let Some(parent_idx) = parent {
            if !self.arena.contains(parent_idx) {
                return Err(DomainError::StaleNode);
            }
        }
        let node_idx = self.arena.insert(TreeNode {
            data,
            state,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }
        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Like [`get_node`](Self::get_node) but a foreign or stale index is an error.
    pub fn node(&self, idx: Index) -> TreeResult<&TreeNode> {
        self.arena.get(idx).ok_or(DomainError::StaleNode)
    }

    pub fn state(&self, idx: Index) -> TreeResult<CheckState> {
        self.node(idx).map(|n| n.state)
    }

    pub(crate) fn set_state(&mut self, idx: Index, state: CheckState) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.state = state;
        }
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// Children of `parent`, or the roots when `parent` is `None`.
    pub fn siblings_under(&self, parent: Option<Index>) -> &[Index] {
        match parent.and_then(|p| self.arena.get(p)) {
            Some(node) => &node.children,
            None => &self.roots,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Walks `path` from the roots down through children.
    #[instrument(level = "debug", skip(self, path), fields(path = %path))]
    pub fn lookup_by_path(&self, path: &NodePath) -> TreeResult<Index> {
        if path.is_empty() {
            return Err(DomainError::InvalidPath(path.to_string()));
        }
        let mut level: &[Index] = &self.roots;
        let mut current = None;
        for (depth, &index) in path.indices().iter().enumerate() {
            let idx = *level.get(index).ok_or_else(|| DomainError::PathOutOfRange {
                path: path.clone(),
                depth,
                index,
                len: level.len(),
            })?;
            current = Some(idx);
            level = &self.node(idx)?.children;
        }
        current.ok_or_else(|| DomainError::InvalidPath(path.to_string()))
    }

    /// Inverse of [`lookup_by_path`](Self::lookup_by_path).
    #[instrument(level = "trace", skip(self))]
    pub fn path_of(&self, idx: Index) -> TreeResult<NodePath> {
        let mut indices = Vec::new();
        let mut current = idx;
        loop {
            let parent = self.node(current)?.parent;
            let position = self
                .siblings_under(parent)
                .iter()
                .position(|&sibling| sibling == current)
                .ok_or_else(|| DomainError::InternalError("node missing from its parent".into()))?;
            indices.push(position);
            match parent {
                Some(p) => current = p,
                None => break,
            }
        }
        indices.reverse();
        Ok(NodePath::new(indices))
    }

    /// Nodes whose value is one of `values`, in pre-order.
    #[instrument(level = "debug", skip(self, values), fields(values = values.len()))]
    pub fn lookup_by_values(&self, values: &[NodeValue]) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| values.contains(&node.data.value))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// All `Checked` nodes in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn collect_checked(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.state.is_checked())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Ancestors of `idx`, nearest first.
    pub fn ancestors(&self, idx: Index) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: self.get_node(idx).and_then(|n| n.parent),
        }
    }

    /// Number of levels of the deepest root.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects all leaf nodes in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(idx, _)| idx)
            .collect()
    }
}

pub struct Ancestors<'a> {
    arena: &'a TreeArena,
    next: Option<Index>,
}

impl Iterator for Ancestors<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.get_node(current).and_then(|n| n.parent);
        Some(current)
    }
}

/// Pre-order traversal of the whole forest.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        // Reverse so the first root is popped first
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal of the whole forest: children before their parent.
pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
