use folio_editor::EditorSettings;
use folio_layout::LayoutSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Snap grid spacing in points
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,

    #[serde(default)]
    pub snap_to_grid: bool,

    /// Undo snapshots kept per session
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_page_width")]
    pub page_width: f64,

    #[serde(default = "default_page_height")]
    pub page_height: f64,

    /// Character advance as a fraction of the font size, used when paginating
    #[serde(default = "default_char_width_ratio")]
    pub char_width_ratio: f64,
}

fn default_grid_size() -> f64 {
    LayoutSettings::default().grid_size
}

fn default_history_limit() -> usize {
    EditorSettings::default().history_limit
}

fn default_page_width() -> f64 {
    LayoutSettings::default().page_width
}

fn default_page_height() -> f64 {
    LayoutSettings::default().page_height
}

fn default_char_width_ratio() -> f64 {
    0.5
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            debug!(path = %config_path.display(), "Loading config");
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn layout_settings(&self) -> LayoutSettings {
        LayoutSettings {
            grid_size: self.grid_size,
            snap_to_grid: self.snap_to_grid,
            page_width: self.page_width,
            page_height: self.page_height,
        }
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            history_limit: self.history_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            snap_to_grid: false,
            history_limit: default_history_limit(),
            page_width: default_page_width(),
            page_height: default_page_height(),
            char_width_ratio: default_char_width_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "gridSize": 12,
            "snapToGrid": true,
            "historyLimit": 25,
            "charWidthRatio": 0.6
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid_size, 12.0);
        assert!(config.snap_to_grid);
        assert_eq!(config.editor_settings().history_limit, 25);
        assert_eq!(config.page_width, 612.0);
        assert_eq!(config.char_width_ratio, 0.6);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layout_settings(), LayoutSettings::default());
        assert_eq!(config.editor_settings(), EditorSettings::default());
        assert_eq!(config.char_width_ratio, 0.5);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join("folio-config-missing");
        let config = Config::load(&dir.display().to_string()).unwrap();
        assert_eq!(config, Config::default());
    }
}
