//! Domain layer: tree model and selection propagation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod path;
pub mod propagate;
pub mod state;
pub mod value;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use builder::{FieldNames, TreeBuilder};
pub use error::{DomainError, TreeResult};
pub use path::NodePath;
pub use state::CheckState;
pub use value::NodeValue;
