//! Tree builder: turns caller-supplied records into a [`TreeArena`].

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::path::NodePath;
use crate::domain::propagate;
use crate::domain::state::CheckState;
use crate::domain::value::NodeValue;

/// Names of the record fields read during construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldNames {
    pub label: String,
    pub value: String,
    pub children: String,
    pub checked: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            label: "label".into(),
            value: "value".into(),
            children: "children".into(),
            checked: "checked".into(),
        }
    }
}

/// Constructs a forest from JSON records in a single pass.
///
/// Input is an owned JSON forest, so it is acyclic by construction. Records are
/// validated as they are visited; any malformed record aborts the build and no
/// tree is returned.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    fields: FieldNames,
    reconcile: bool,
}

impl TreeBuilder {
    pub fn new(fields: FieldNames) -> Self {
        Self {
            fields,
            reconcile: false,
        }
    }

    /// Re-derive every non-leaf state from its children after building.
    pub fn with_reconcile(mut self, reconcile: bool) -> Self {
        self.reconcile = reconcile;
        self
    }

    /// Parse a JSON document holding an array of root records.
    pub fn build_from_str(&self, json: &str) -> TreeResult<TreeArena> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| DomainError::invalid_input(format!("malformed JSON: {}", e)))?;
        self.build_from_value(&document)
    }

    /// Build from a JSON array of root records.
    pub fn build_from_value(&self, document: &Value) -> TreeResult<TreeArena> {
        match document {
            Value::Array(roots) => self.build(roots),
            other => Err(DomainError::invalid_input(format!(
                "expected an array of root records, found {}",
                json_kind(other)
            ))),
        }
    }

    #[instrument(level = "debug", skip(self, roots), fields(roots = roots.len()))]
    pub fn build(&self, roots: &[Value]) -> TreeResult<TreeArena> {
        let mut tree = TreeArena::new();
        let mut stack: Vec<(&Value, Option<Index>, NodePath)> = roots
            .iter()
            .enumerate()
            .rev()
            .map(|(i, record)| (record, None, NodePath::root(i)))
            .collect();

        while let Some((record, parent_idx, path)) = stack.pop() {
            let (data, state, children) = self.read_record(record, &path)?;
            let current_idx = tree.insert_node(data, state, parent_idx)?;

            // Reverse so siblings are inserted in input order
            for (i, child) in children.iter().enumerate().rev() {
                stack.push((child, Some(current_idx), path.child(i)));
            }
        }

        if self.reconcile {
            propagate::reconcile(&mut tree);
        }
        debug!(nodes = tree.len(), depth = tree.depth(), "tree built");
        Ok(tree)
    }

    fn read_record<'v>(
        &self,
        record: &'v Value,
        path: &NodePath,
    ) -> TreeResult<(NodeData, CheckState, &'v [Value])> {
        let object = record.as_object().ok_or_else(|| {
            DomainError::invalid_input(format!(
                "record at {} must be an object, found {}",
                path,
                json_kind(record)
            ))
        })?;

        let label = match object.get(&self.fields.label) {
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(other) => {
                return Err(DomainError::invalid_input(format!(
                    "field '{}' of record at {} must be a string, found {}",
                    self.fields.label,
                    path,
                    json_kind(other)
                )))
            }
            None => {
                return Err(DomainError::invalid_input(format!(
                    "record at {} has no '{}' field",
                    path, self.fields.label
                )))
            }
        };

        let raw_value = object.get(&self.fields.value).ok_or_else(|| {
            DomainError::invalid_input(format!(
                "record at {} has no '{}' field",
                path, self.fields.value
            ))
        })?;
        let value = NodeValue::from_json(raw_value).ok_or_else(|| {
            DomainError::invalid_input(format!(
                "field '{}' of record at {} must be a scalar, found {}",
                self.fields.value,
                path,
                json_kind(raw_value)
            ))
        })?;

        let state = match object.get(&self.fields.checked) {
            None | Some(Value::Null) => CheckState::Unchecked,
            Some(Value::Bool(b)) => CheckState::from(*b),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(CheckState::from_code)
                .ok_or_else(|| {
                    DomainError::invalid_input(format!(
                        "field '{}' of record at {} must be 0, 1 or 2, found {}",
                        self.fields.checked, path, n
                    ))
                })?,
            Some(other) => {
                return Err(DomainError::invalid_input(format!(
                    "field '{}' of record at {} must be a number or boolean, found {}",
                    self.fields.checked,
                    path,
                    json_kind(other)
                )))
            }
        };

        let children: &[Value] = match object.get(&self.fields.children) {
            None | Some(Value::Null) => &[],
            Some(Value::Array(children)) => children,
            Some(other) => {
                return Err(DomainError::invalid_input(format!(
                    "field '{}' of record at {} must be an array, found {}",
                    self.fields.children,
                    path,
                    json_kind(other)
                )))
            }
        };

        Ok((NodeData { label, value }, state, children))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_nested_records_when_building_then_sibling_order_and_parents_kept() {
        let records = json!([
            {"label": "A", "value": 1, "children": [
                {"label": "a1", "value": 11},
                {"label": "a2", "value": 12, "children": [
                    {"label": "a2a", "value": 121},
                ]},
            ]},
            {"label": "B", "value": 2},
        ]);

        let tree = TreeBuilder::default().build_from_value(&records).unwrap();

        let labels: Vec<_> = tree.iter().map(|(_, n)| n.data.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "a1", "a2", "a2a", "B"]);
        let a2a = tree.lookup_by_path(&NodePath::new(vec![0, 1, 0])).unwrap();
        let a2 = tree.lookup_by_path(&NodePath::new(vec![0, 1])).unwrap();
        assert_eq!(tree.get_node(a2a).unwrap().parent(), Some(a2));
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn given_checked_field_variants_when_building_then_states_decoded() {
        let records = json!([
            {"label": "n", "value": "n"},
            {"label": "z", "value": "z", "checked": 0},
            {"label": "o", "value": "o", "checked": 1},
            {"label": "t", "value": "t", "checked": 2},
            {"label": "b", "value": "b", "checked": true},
        ]);
        let tree = TreeBuilder::default().build_from_value(&records).unwrap();
        let states: Vec<_> = tree.iter().map(|(_, n)| n.state).collect();
        assert_eq!(
            states,
            vec![
                CheckState::Unchecked,
                CheckState::Unchecked,
                CheckState::Checked,
                CheckState::Indeterminate,
                CheckState::Checked,
            ]
        );
    }

    #[test]
    fn given_custom_field_names_when_building_then_they_are_used() {
        let fields = FieldNames {
            label: "name".into(),
            value: "id".into(),
            children: "items".into(),
            checked: "selected".into(),
        };
        let records = json!([{"name": "root", "id": 7, "selected": true, "items": [
            {"name": "leaf", "id": 8}
        ]}]);
        let tree = TreeBuilder::new(fields).build_from_value(&records).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.lookup_by_values(&[NodeValue::from(8)]).len(), 1);
    }

    #[test]
    fn given_malformed_records_when_building_then_invalid_input() {
        let cases = [
            json!({"label": "not an array", "value": 1}),
            json!([1]),
            json!([{"value": 1}]),
            json!([{"label": "x"}]),
            json!([{"label": "x", "value": [1]}]),
            json!([{"label": "x", "value": 1, "checked": 3}]),
            json!([{"label": "x", "value": 1, "checked": "yes"}]),
            json!([{"label": "x", "value": 1, "children": {"label": "y"}}]),
            json!([{"label": "x", "value": 1, "children": [{"label": "y"}]}]),
        ];
        for case in cases {
            let result = TreeBuilder::default().build_from_value(&case);
            assert!(
                matches!(result, Err(DomainError::InvalidInput { .. })),
                "expected invalid input for {}",
                case
            );
        }
    }

    #[test]
    fn given_bad_child_when_building_then_error_names_its_path() {
        let records = json!([{"label": "x", "value": 1, "children": [
            {"label": "ok", "value": 2},
            {"label": "bad"},
        ]}]);
        let err = TreeBuilder::default().build_from_value(&records).unwrap_err();
        assert!(err.to_string().contains("0-1"), "{}", err);
    }

    #[test]
    fn given_inconsistent_input_when_reconciling_then_parents_derived() {
        let records = json!([{"label": "p", "value": 1, "checked": 1, "children": [
            {"label": "c1", "value": 2, "checked": 1},
            {"label": "c2", "value": 3},
        ]}]);

        let kept = TreeBuilder::default().build_from_value(&records).unwrap();
        let reconciled = TreeBuilder::default()
            .with_reconcile(true)
            .build_from_value(&records)
            .unwrap();

        let root = |t: &TreeArena| t.state(t.roots()[0]).unwrap();
        assert_eq!(root(&kept), CheckState::Checked);
        assert_eq!(root(&reconciled), CheckState::Indeterminate);
    }

    #[test]
    fn given_malformed_json_text_when_building_then_invalid_input() {
        let result = TreeBuilder::default().build_from_str("[{");
        assert!(matches!(result, Err(DomainError::InvalidInput { .. })));
    }
}
