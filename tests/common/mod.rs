//! Shared fixtures for integration tests
#![allow(dead_code)]

use serde_json::{json, Value};

use tricheck::domain::{CheckState, NodePath, TreeArena, TreeBuilder};

/// A
/// ├── a1
/// └── a2
///     ├── a2a
///     └── a2b
pub fn scenario_records() -> Value {
    json!([
        {"label": "A", "value": "A", "children": [
            {"label": "a1", "value": "a1"},
            {"label": "a2", "value": "a2", "children": [
                {"label": "a2a", "value": "a2a"},
                {"label": "a2b", "value": "a2b"},
            ]},
        ]},
    ])
}

/// Two roots, three levels, mixed fan-out; all values are numbers.
pub fn regions_records() -> Value {
    json!([
        {"label": "Europe", "value": 1, "children": [
            {"label": "Germany", "value": 11, "children": [
                {"label": "Berlin", "value": 111},
                {"label": "Hamburg", "value": 112},
                {"label": "Munich", "value": 113},
            ]},
            {"label": "France", "value": 12, "children": [
                {"label": "Paris", "value": 121},
            ]},
            {"label": "Iceland", "value": 13},
        ]},
        {"label": "Asia", "value": 2, "children": [
            {"label": "Japan", "value": 21, "children": [
                {"label": "Tokyo", "value": 211},
                {"label": "Osaka", "value": 212},
            ]},
        ]},
    ])
}

pub fn build(records: &Value) -> TreeArena {
    TreeBuilder::default().build_from_value(records).unwrap()
}

pub fn path(raw: &str) -> NodePath {
    raw.parse().unwrap()
}

pub fn state(tree: &TreeArena, raw: &str) -> CheckState {
    tree.state(tree.lookup_by_path(&path(raw)).unwrap()).unwrap()
}

pub fn states(tree: &TreeArena) -> Vec<CheckState> {
    tree.iter().map(|(_, node)| node.state).collect()
}

/// Builds nested records from a parent table: `parents[i]` is `None` for a root or
/// `Some(j)` with `j < i`.
pub fn records_from_parents(parents: &[Option<usize>]) -> Value {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); parents.len()];
    let mut roots = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    fn record(i: usize, children: &[Vec<usize>]) -> Value {
        let mut object = json!({"label": format!("n{}", i), "value": i});
        if !children[i].is_empty() {
            object["children"] =
                Value::Array(children[i].iter().map(|&c| record(c, children)).collect());
        }
        object
    }

    Value::Array(roots.iter().map(|&r| record(r, &children)).collect())
}
