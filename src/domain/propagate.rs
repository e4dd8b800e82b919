//! Tri-state selection propagation.
//!
//! A direct toggle fully determines the subtree below the toggled node
//! (cascade down) and re-derives every ancestor from its children (cascade up).
//! Nothing is cached: each toggle walks the subtree and the ancestor chain.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::TreeArena;
use crate::domain::error::TreeResult;
use crate::domain::state::CheckState;
use crate::domain::value::NodeValue;

/// Ancestor rule: all checked → checked, all unchecked → unchecked, else indeterminate.
///
/// An empty set of children derives `Unchecked`; callers never apply it to leaves.
pub fn derive_state<I>(children: I) -> CheckState
where
    I: IntoIterator<Item = CheckState>,
{
    let mut all_checked = true;
    let mut all_unchecked = true;
    for state in children {
        match state {
            CheckState::Checked => all_unchecked = false,
            CheckState::Unchecked => all_checked = false,
            CheckState::Indeterminate => return CheckState::Indeterminate,
        }
        if !all_checked && !all_unchecked {
            return CheckState::Indeterminate;
        }
    }
    match (all_checked, all_unchecked) {
        (_, true) => CheckState::Unchecked,
        (true, false) => CheckState::Checked,
        (false, false) => CheckState::Indeterminate,
    }
}

/// Applies a direct user toggle of `node` and propagates it; returns `node`.
///
/// The node is validated before anything changes, so an error leaves the tree untouched.
#[instrument(level = "debug", skip(tree))]
pub fn toggle(tree: &mut TreeArena, node: Index, checked: bool) -> TreeResult<Index> {
    let previous = tree.state(node)?;
    let target = CheckState::from(checked);
    trace!(%previous, %target, "toggle");

    tree.set_state(node, target);
    let touched = cascade_down(tree, node, target);
    let changed = cascade_up(tree, node);
    debug!(descendants = touched, ancestors_changed = changed, "propagated");
    Ok(node)
}

/// Sets every descendant of `node` to `state`; returns how many were visited.
pub fn cascade_down(tree: &mut TreeArena, node: Index, state: CheckState) -> usize {
    let mut stack: Vec<Index> = tree
        .get_node(node)
        .map(|n| n.children().to_vec())
        .unwrap_or_default();
    let mut visited = 0;
    while let Some(current) = stack.pop() {
        tree.set_state(current, state);
        visited += 1;
        if let Some(n) = tree.get_node(current) {
            stack.extend_from_slice(n.children());
        }
    }
    visited
}

/// Re-derives each ancestor of `node`, nearest first, up to its root.
/// Returns how many ancestors changed state.
pub fn cascade_up(tree: &mut TreeArena, node: Index) -> usize {
    let ancestors: Vec<Index> = tree.ancestors(node).collect();
    let mut changed = 0;
    for ancestor in ancestors {
        if rederive(tree, ancestor) {
            changed += 1;
        }
    }
    changed
}

/// Recomputes `node` from its children; returns whether its state changed.
fn rederive(tree: &mut TreeArena, node: Index) -> bool {
    let Some(current) = tree.get_node(node) else {
        return false;
    };
    if current.is_leaf() {
        return false;
    }
    let derived = derive_state(
        current
            .children()
            .iter()
            .filter_map(|&c| tree.get_node(c))
            .map(|c| c.state),
    );
    let changed = derived != current.state;
    tree.set_state(node, derived);
    changed
}

/// Marks every node whose value is in `values` as `Checked`, then re-derives
/// their ancestors bottom-up.
///
/// Ancestors that are themselves selected stay `Checked`. The result does not
/// depend on traversal order, and applying the same set twice is a no-op the
/// second time. Returns the selected nodes in pre-order.
#[instrument(level = "debug", skip(tree, values), fields(values = values.len()))]
pub fn apply_initial_selection(tree: &mut TreeArena, values: &[NodeValue]) -> Vec<Index> {
    let selected = tree.lookup_by_values(values);
    for &idx in &selected {
        tree.set_state(idx, CheckState::Checked);
    }

    let selected_set: HashSet<Index> = selected.iter().copied().collect();
    let view: &TreeArena = tree;
    let pending: HashSet<Index> = selected
        .iter()
        .flat_map(|&idx| view.ancestors(idx))
        .filter(|idx| !selected_set.contains(idx))
        .collect();

    // Post-order visits children before parents, so each ancestor sees final children
    let order: Vec<Index> = tree
        .iter_postorder()
        .map(|(idx, _)| idx)
        .filter(|idx| pending.contains(idx))
        .collect();
    for idx in order {
        rederive(tree, idx);
    }
    debug!(selected = selected.len(), ancestors = pending.len(), "initial selection applied");
    selected
}

/// Re-derives every non-leaf node from its children, deepest first.
pub fn reconcile(tree: &mut TreeArena) -> usize {
    let order: Vec<Index> = tree
        .iter_postorder()
        .filter(|(_, node)| !node.is_leaf())
        .map(|(idx, _)| idx)
        .collect();
    order.into_iter().filter(|&idx| rederive(tree, idx)).count()
}

/// Checks the tri-state invariant for every non-leaf node.
///
/// Returns the first node whose state disagrees with its children.
pub fn find_inconsistent(tree: &TreeArena) -> Option<Index> {
    tree.iter()
        .filter(|(_, node)| !node.is_leaf())
        .find(|(_, node)| {
            let derived = derive_state(
                node.children()
                    .iter()
                    .filter_map(|&c| tree.get_node(c))
                    .map(|c| c.state),
            );
            derived != node.state
        })
        .map(|(idx, _)| idx)
}
