use serde::{Deserialize, Serialize};

/// Layout tunables loaded from the `folio.config.json` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSettings {
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub page_width: f64,
    pub page_height: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            grid_size: 10.0,
            snap_to_grid: false,
            page_width: 612.0,
            page_height: 792.0,
        }
    }
}
