//! Application layer: the widget controller and its collaborators
//!
//! This layer drives the domain model from discrete user events.

pub mod columns;
pub mod controller;
pub mod error;
pub mod listener;
pub mod view;

pub use columns::{Column, DrillDown};
pub use controller::CheckboxTree;
pub use error::{ApplicationError, ApplicationResult};
pub use listener::{CallbackListener, NoopListener, TreeListener};
pub use view::NodeView;
