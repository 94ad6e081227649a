//! Shared order state with a single merge-update entry point.

use tracing::debug;

use crate::model::{OrderPatch, OrderState};

/// What an update changed, so dependents can refresh derived state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreChange {
    /// The file was replaced or cleared.
    pub file_changed: bool,
    /// The file went from present to absent.
    pub file_cleared: bool,
    /// Any print setting changed value.
    pub settings_changed: bool,
}

impl StoreChange {
    /// Check if anything changed.
    pub fn any(&self) -> bool {
        self.file_changed || self.settings_changed
    }

    /// Check if price-relevant inputs changed.
    pub fn affects_price(&self) -> bool {
        self.any()
    }
}

/// Owner of the one [`OrderState`] every step reads and writes.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    state: OrderState,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current order state.
    pub fn state(&self) -> &OrderState {
        &self.state
    }

    /// Merge `patch` into the state. Only fields set in the patch are written.
    pub fn update(&mut self, patch: OrderPatch) -> StoreChange {
        let mut change = StoreChange::default();
        let had_file = self.state.has_file();

        if let Some(file) = patch.uploaded_file {
            change.file_changed = self.state.uploaded_file != file;
            self.state.uploaded_file = file;
        }

        let settings = &mut self.state.settings;
        macro_rules! merge {
            ($field:ident) => {
                if let Some(value) = patch.$field {
                    if settings.$field != value {
                        settings.$field = value;
                        change.settings_changed = true;
                    }
                }
            };
        }
        merge!(material);
        merge!(color);
        merge!(layer_height);
        merge!(infill);
        merge!(support_structure);

        change.file_cleared = had_file && !self.state.has_file();

        if change.any() {
            debug!(
                file_changed = change.file_changed,
                file_cleared = change.file_cleared,
                settings_changed = change.settings_changed,
                "Order state updated"
            );
        }

        change
    }
}
