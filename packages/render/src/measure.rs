//! Text measurement and asset lookup seams.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_FAMILY: &str = "Times";
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
        }
    }
}

impl FontSpec {
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Vertical advance of one line set in this font
    pub fn line_height(&self) -> f64 {
        self.size * 1.5
    }
}

/// Horizontal extent of text. Must be pure: equal input, equal output.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64;
}

/// Every character advances `font.size * ratio`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    pub ratio: f64,
}

impl MonospaceMeasurer {
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * font.size * self.ratio
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAsset {
    pub href: String,
    pub width: f64,
    pub height: f64,
}

/// Maps a graphic frame's `imageRef` to something paintable
pub trait AssetResolver {
    fn resolve(&self, reference: &str) -> Option<ResolvedAsset>;
}

/// Resolves nothing; every graphic renders as a placeholder
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetResolver for NoAssets {
    fn resolve(&self, _reference: &str) -> Option<ResolvedAsset> {
        None
    }
}

impl AssetResolver for HashMap<String, ResolvedAsset> {
    fn resolve(&self, reference: &str) -> Option<ResolvedAsset> {
        self.get(reference).cloned()
    }
}
