//! Drill-down columns: which levels of the tree are currently open.

use serde::Serialize;
use tracing::debug;

use crate::application::view::NodeView;
use crate::domain::{NodePath, TreeArena, TreeResult};

/// One open level: the roots (column 0) or the children of `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub index: usize,
    pub parent: Option<NodePath>,
    pub rows: Vec<NodeView>,
}

/// Trail of opened nodes. Column 0 always lists the roots; column `i + 1`
/// lists the children of `trail[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrillDown {
    trail: Vec<NodePath>,
    close_deeper: bool,
}

impl DrillDown {
    pub fn new(close_deeper: bool) -> Self {
        Self {
            trail: Vec::new(),
            close_deeper,
        }
    }

    pub fn reset(&mut self) {
        self.trail.clear();
    }

    pub fn trail(&self) -> &[NodePath] {
        &self.trail
    }

    /// Number of open columns, including the root column.
    pub fn column_count(&self) -> usize {
        self.trail.len() + 1
    }

    /// Records activation of the row at `path`.
    ///
    /// Columns right of the row's column are closed, then the node's children
    /// open as a new column if it has any. Without `close_deeper`, re-activating
    /// a row whose children are already open leaves the columns alone.
    pub fn activate(&mut self, path: &NodePath, has_children: bool) {
        let column = path.len().saturating_sub(1);
        if !self.close_deeper && has_children && self.trail.get(column) == Some(path) {
            debug!(%path, "children already open");
            return;
        }

        // Ancestors of the row, so a row outside the open columns still gets its chain
        self.trail = (1..=column)
            .map(|depth| NodePath::from(&path.indices()[..depth]))
            .collect();
        if has_children {
            self.trail.push(path.clone());
        }
        debug!(%path, columns = self.column_count(), "drill-down");
    }

    /// Materialises the open columns against the current node states.
    pub fn columns(&self, tree: &TreeArena) -> TreeResult<Vec<Column>> {
        let mut columns = Vec::with_capacity(self.column_count());
        columns.push(Column {
            index: 0,
            parent: None,
            rows: NodeView::collect(tree, tree.roots())?,
        });
        for (i, parent) in self.trail.iter().enumerate() {
            let parent_idx = tree.lookup_by_path(parent)?;
            let children = tree.node(parent_idx)?.children();
            columns.push(Column {
                index: i + 1,
                parent: Some(parent.clone()),
                rows: NodeView::collect(tree, children)?,
            });
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(raw: &str) -> NodePath {
        raw.parse().unwrap()
    }

    #[test]
    fn given_open_columns_when_activating_shallower_row_then_deeper_closed() {
        let mut drill = DrillDown::new(true);
        drill.activate(&p("0"), true);
        drill.activate(&p("0-1"), true);
        assert_eq!(drill.trail(), &[p("0"), p("0-1")]);

        drill.activate(&p("2"), true);
        assert_eq!(drill.trail(), &[p("2")]);
    }

    #[test]
    fn given_leaf_row_when_activating_then_only_deeper_columns_close() {
        let mut drill = DrillDown::new(true);
        drill.activate(&p("0"), true);
        drill.activate(&p("0-1"), true);
        drill.activate(&p("0-0"), false);
        assert_eq!(drill.trail(), &[p("0")]);
        assert_eq!(drill.column_count(), 2);
    }

    #[test]
    fn given_keep_open_when_reactivating_open_ancestor_then_columns_kept() {
        let mut drill = DrillDown::new(false);
        drill.activate(&p("0"), true);
        drill.activate(&p("0-1"), true);

        drill.activate(&p("0"), true);
        assert_eq!(drill.trail(), &[p("0"), p("0-1")]);

        // a different row at the same level still replaces the deeper columns
        drill.activate(&p("1"), true);
        assert_eq!(drill.trail(), &[p("1")]);
    }

    #[test]
    fn given_close_deeper_when_reactivating_open_ancestor_then_columns_rebuilt() {
        let mut drill = DrillDown::new(true);
        drill.activate(&p("0"), true);
        drill.activate(&p("0-1"), true);

        drill.activate(&p("0"), true);
        assert_eq!(drill.trail(), &[p("0")]);
    }

    #[test]
    fn given_row_outside_open_columns_when_activating_then_chain_opened() {
        let mut drill = DrillDown::new(true);
        drill.activate(&p("1-2-0"), true);
        assert_eq!(drill.trail(), &[p("1"), p("1-2"), p("1-2-0")]);
    }
}
