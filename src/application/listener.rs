//! Outward event notifications

use crate::application::view::NodeView;

/// Receives the controller's events. Both methods default to doing nothing.
pub trait TreeListener {
    /// A row was activated for drill-down, whether or not it has children.
    fn on_row_activated(&mut self, _node: &NodeView) {}

    /// Fired once per toggle, after propagation, with the toggled node only.
    fn on_selection_changed(&mut self, _node: &NodeView) {}
}

/// Listener that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl TreeListener for NoopListener {}

type Callback = Box<dyn FnMut(&NodeView)>;

/// Listener built from optional closures.
#[derive(Default)]
pub struct CallbackListener {
    row_activated: Option<Callback>,
    selection_changed: Option<Callback>,
}

impl CallbackListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_row_activated(mut self, f: impl FnMut(&NodeView) + 'static) -> Self {
        self.row_activated = Some(Box::new(f));
        self
    }

    pub fn on_selection_changed(mut self, f: impl FnMut(&NodeView) + 'static) -> Self {
        self.selection_changed = Some(Box::new(f));
        self
    }
}

impl TreeListener for CallbackListener {
    fn on_row_activated(&mut self, node: &NodeView) {
        if let Some(f) = self.row_activated.as_mut() {
            f(node);
        }
    }

    fn on_selection_changed(&mut self, node: &NodeView) {
        if let Some(f) = self.selection_changed.as_mut() {
            f(node);
        }
    }
}

impl std::fmt::Debug for CallbackListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackListener")
            .field("row_activated", &self.row_activated.is_some())
            .field("selection_changed", &self.selection_changed.is_some())
            .finish()
    }
}
