//! Property tests: the tri-state invariant survives arbitrary toggle sequences

mod common;

use proptest::prelude::*;
use proptest::sample::Index as Pick;

use common::{build, records_from_parents, states};
use tricheck::domain::propagate::{apply_initial_selection, find_inconsistent, toggle};
use tricheck::domain::{CheckState, NodeValue, TreeArena};

/// Parent table for up to 40 nodes; node 0 is always a root.
fn parents() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec((any::<bool>(), any::<Pick>()), 1..40).prop_map(|slots| {
        slots
            .into_iter()
            .enumerate()
            .map(|(i, (is_root, pick))| {
                if i == 0 || is_root {
                    None
                } else {
                    Some(pick.index(i))
                }
            })
            .collect()
    })
}

fn nth_node(tree: &TreeArena, pick: &Pick) -> generational_arena::Index {
    let n = pick.index(tree.len());
    tree.iter().nth(n).map(|(idx, _)| idx).unwrap()
}

proptest! {
    #[test]
    fn invariant_holds_after_every_toggle(
        parents in parents(),
        steps in prop::collection::vec((any::<Pick>(), any::<bool>()), 1..30),
    ) {
        let mut tree = build(&records_from_parents(&parents));
        for (pick, checked) in &steps {
            let node = nth_node(&tree, pick);
            toggle(&mut tree, node, *checked).unwrap();
            prop_assert!(find_inconsistent(&tree).is_none());
        }
    }

    #[test]
    fn toggle_fully_determines_subtree(
        parents in parents(),
        pick in any::<Pick>(),
        checked in any::<bool>(),
    ) {
        let mut tree = build(&records_from_parents(&parents));
        let node = nth_node(&tree, &pick);
        let prefix = tree.path_of(node).unwrap();

        toggle(&mut tree, node, checked).unwrap();

        for (idx, n) in tree.iter() {
            if prefix.is_prefix_of(&tree.path_of(idx).unwrap()) {
                prop_assert_eq!(n.state, CheckState::from(checked));
            }
        }
    }

    #[test]
    fn checking_twice_equals_checking_once(
        parents in parents(),
        pick in any::<Pick>(),
    ) {
        let mut tree = build(&records_from_parents(&parents));
        let node = nth_node(&tree, &pick);

        toggle(&mut tree, node, true).unwrap();
        let once = states(&tree);
        toggle(&mut tree, node, true).unwrap();

        prop_assert_eq!(states(&tree), once);
    }

    #[test]
    fn initial_selection_is_idempotent(
        parents in parents(),
        picks in prop::collection::vec(any::<Pick>(), 0..10),
    ) {
        let mut tree = build(&records_from_parents(&parents));
        let values: Vec<NodeValue> = picks
            .iter()
            .map(|p| NodeValue::from(p.index(parents.len()) as i64))
            .collect();

        apply_initial_selection(&mut tree, &values);
        let once = states(&tree);
        apply_initial_selection(&mut tree, &values);

        prop_assert_eq!(states(&tree), once);
    }

    #[test]
    fn single_leaf_selection_round_trips(
        parents in parents(),
        pick in any::<Pick>(),
    ) {
        let mut tree = build(&records_from_parents(&parents));
        let leaves = tree.leaf_nodes();
        let leaf = leaves[pick.index(leaves.len())];
        let leaf_node = tree.get_node(leaf).unwrap();
        // an only child would make its parent checked as well
        let siblings = tree.siblings_under(leaf_node.parent()).len();
        prop_assume!(leaf_node.parent().is_none() || siblings > 1);
        let value = leaf_node.data.value.clone();

        apply_initial_selection(&mut tree, std::slice::from_ref(&value));

        prop_assert_eq!(tree.collect_checked(), vec![leaf]);
    }
}
