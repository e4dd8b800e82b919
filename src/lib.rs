//! Drill-down tri-state checkbox tree.
//!
//! The [`domain`] layer holds the arena-backed forest and the selection
//! propagator; the [`application`] layer wraps one forest per widget instance
//! with drill-down columns and event notifications. Rendering is left to the
//! caller: a renderer reads [`application::Column`]s and reports toggles and
//! activations back by [`domain::NodePath`].
//!
//! ```
//! use serde_json::json;
//! use tricheck::application::CheckboxTree;
//! use tricheck::config::Settings;
//! use tricheck::domain::{CheckState, NodePath};
//!
//! let mut widget = CheckboxTree::new(&Settings::default());
//! let records = json!([{"label": "A", "value": 1, "children": [
//!     {"label": "a1", "value": 2},
//!     {"label": "a2", "value": 3},
//! ]}]);
//! widget.init(records.as_array().unwrap()).unwrap();
//!
//! widget.toggle(&"0-0".parse().unwrap(), true).unwrap();
//! assert_eq!(widget.state_at(&NodePath::root(0)).unwrap(), CheckState::Indeterminate);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;
