//! Per-widget controller: one tree, one drill-down trail, one listener.

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::application::columns::{Column, DrillDown};
use crate::application::listener::{NoopListener, TreeListener};
use crate::application::view::NodeView;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    propagate, CheckState, DomainError, NodePath, NodeValue, TreeArena, TreeBuilder,
};

/// Checkbox tree widget state, independent of any rendering technology.
///
/// Every operation other than [`init`](Self::init) fails with
/// [`ApplicationError::NotInitialized`] until a tree has been supplied.
pub struct CheckboxTree {
    builder: TreeBuilder,
    tree: Option<TreeArena>,
    drill: DrillDown,
    listener: Box<dyn TreeListener>,
}

impl CheckboxTree {
    pub fn new(settings: &Settings) -> Self {
        Self::with_listener(settings, Box::new(NoopListener))
    }

    pub fn with_listener(settings: &Settings, listener: Box<dyn TreeListener>) -> Self {
        Self {
            builder: TreeBuilder::new(settings.fields.clone())
                .with_reconcile(settings.reconcile_on_build),
            tree: None,
            drill: DrillDown::new(settings.close_deeper_columns),
            listener,
        }
    }

    /// Builds the tree from root records, replacing any previous one.
    ///
    /// On error the previous tree (if any) is kept.
    #[instrument(level = "debug", skip(self, records), fields(roots = records.len()))]
    pub fn init(&mut self, records: &[Value]) -> ApplicationResult<()> {
        let tree = self.builder.build(records)?;
        info!(nodes = tree.len(), "checkbox tree initialized");
        self.tree = Some(tree);
        self.drill.reset();
        Ok(())
    }

    /// Parses a JSON array of root records and initializes from it.
    pub fn init_from_str(&mut self, json: &str) -> ApplicationResult<()> {
        let document: Value =
            serde_json::from_str(json).map_err(|e| ApplicationError::OperationFailed {
                context: "parse tree records".to_string(),
                source: Box::new(e),
            })?;
        match document {
            Value::Array(records) => self.init(&records),
            _ => Err(DomainError::invalid_input("expected an array of root records").into()),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.tree.is_some()
    }

    pub fn tree(&self) -> ApplicationResult<&TreeArena> {
        self.tree.as_ref().ok_or(ApplicationError::NotInitialized)
    }

    fn tree_mut(&mut self) -> ApplicationResult<&mut TreeArena> {
        self.tree.as_mut().ok_or(ApplicationError::NotInitialized)
    }

    /// Checked nodes in pre-order.
    pub fn get_selected(&self) -> ApplicationResult<Vec<NodeView>> {
        let tree = self.tree()?;
        Ok(NodeView::collect(tree, &tree.collect_checked())?)
    }

    /// Pre-checks every node whose value is in `values`; returns those nodes.
    ///
    /// Matching nodes are marked `Checked` without cascading to their
    /// descendants. Ancestors that are not themselves selected are re-derived
    /// from their children; a selected ancestor stays `Checked` even when its
    /// children disagree, so parent states need not follow their children until
    /// the next toggle below them. Reading the selection back with
    /// [`get_selected`](Self::get_selected) returns the same nodes, unless the
    /// set covers every child of an unselected parent, which then reads back too.
    ///
    /// Fires no events.
    #[instrument(level = "debug", skip(self, values), fields(values = values.len()))]
    pub fn set_selected(&mut self, values: &[NodeValue]) -> ApplicationResult<Vec<NodeView>> {
        let tree = self.tree_mut()?;
        let selected = propagate::apply_initial_selection(tree, values);
        debug!(matched = selected.len(), "selection applied");
        Ok(NodeView::collect(tree, &selected)?)
    }

    /// A user checked or unchecked the node at `path`.
    ///
    /// Propagates the change, then fires `on_selection_changed` once with the toggled node.
    #[instrument(level = "debug", skip(self), fields(path = %path))]
    pub fn toggle(&mut self, path: &NodePath, checked: bool) -> ApplicationResult<NodeView> {
        let tree = self.tree_mut()?;
        let idx = tree.lookup_by_path(path)?;
        propagate::toggle(tree, idx, checked)?;
        let view = NodeView::from_tree(tree, idx)?;
        self.listener.on_selection_changed(&view);
        Ok(view)
    }

    /// A user activated the row at `path` for drill-down.
    #[instrument(level = "debug", skip(self), fields(path = %path))]
    pub fn activate(&mut self, path: &NodePath) -> ApplicationResult<NodeView> {
        let tree = self.tree()?;
        let idx = tree.lookup_by_path(path)?;
        let view = NodeView::from_tree(tree, idx)?;
        self.drill.activate(path, view.has_children);
        self.listener.on_row_activated(&view);
        Ok(view)
    }

    /// Open columns with the current state of every row.
    pub fn columns(&self) -> ApplicationResult<Vec<Column>> {
        Ok(self.drill.columns(self.tree()?)?)
    }

    pub fn node_at(&self, path: &NodePath) -> ApplicationResult<NodeView> {
        let tree = self.tree()?;
        let idx = tree.lookup_by_path(path)?;
        Ok(NodeView::from_tree(tree, idx)?)
    }

    pub fn state_at(&self, path: &NodePath) -> ApplicationResult<CheckState> {
        let tree = self.tree()?;
        let idx = tree.lookup_by_path(path)?;
        Ok(tree.state(idx)?)
    }
}

impl std::fmt::Debug for CheckboxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckboxTree")
            .field("tree", &self.tree)
            .field("drill", &self.drill)
            .finish_non_exhaustive()
    }
}
