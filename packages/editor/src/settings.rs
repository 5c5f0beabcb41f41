use serde::{Deserialize, Serialize};

use crate::undo_stack::DEFAULT_HISTORY_LIMIT;

/// Editor tunables loaded from the `folio.config.json` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Snapshots kept by the undo history
    pub history_limit: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}
