//! Persisted document payload and the named entities it carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::node::ContentNode;

/// Id of the built-in paragraph style used when a reference dangles
pub const DEFAULT_PARAGRAPH_STYLE_ID: &str = "default";

/// Id of the built-in character style used when a reference dangles
pub const DEFAULT_CHARACTER_STYLE_ID: &str = "default-char";

/// Serialized form of a whole document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub id: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub content: Vec<ContentNode>,
    #[serde(default)]
    pub paragraph_styles: Vec<ParagraphStyle>,
    #[serde(default)]
    pub character_styles: Vec<CharacterStyle>,
    #[serde(default)]
    pub master_pages: Vec<MasterPage>,
    #[serde(default)]
    pub variables: Vec<VariableDef>,
    #[serde(default)]
    pub conditions: Vec<ConditionTag>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub index_entries: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub id: String,
    pub name: String,
    pub font_family: String,
    pub font_size: f32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    #[serde(default)]
    pub space_before: f32,
    #[serde(default)]
    pub space_after: f32,
    #[serde(default)]
    pub first_indent: f32,
}

fn default_color() -> String {
    "#000000".to_string()
}

fn default_line_height() -> f32 {
    1.5
}

impl ParagraphStyle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            id: DEFAULT_PARAGRAPH_STYLE_ID.to_string(),
            name: "Body".to_string(),
            font_family: "Times".to_string(),
            font_size: 12.0,
            bold: false,
            italic: false,
            color: default_color(),
            alignment: Alignment::Left,
            line_height: default_line_height(),
            space_before: 0.0,
            space_after: 6.0,
            first_indent: 0.0,
        }
    }
}

/// Character style; unset fields inherit from the paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStyle {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CharacterStyle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            font_family: None,
            font_size: None,
            bold: None,
            italic: None,
            color: None,
        }
    }
}

impl Default for CharacterStyle {
    fn default() -> Self {
        Self::new(DEFAULT_CHARACTER_STYLE_ID, "Default")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(72.0)
    }
}

/// Page geometry plus repeating header/footer content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterPage {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub header: Vec<ContentNode>,
    #[serde(default)]
    pub footer: Vec<ContentNode>,
}

impl MasterPage {
    /// US Letter master at 72 units per inch
    pub fn letter(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width: 612.0,
            height: 792.0,
            margins: Margins::default(),
            header: Vec::new(),
            footer: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    Text,
    Date,
    Page,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: VariableType,
}

impl VariableDef {
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: VariableType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind,
        }
    }
}

/// Named condition controlling conditional text visibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTag {
    pub name: String,
    pub color: String,
    pub visible: bool,
}

impl ConditionTag {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: Vec<String>,
    pub language: String,
    pub version: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            subject: String::new(),
            keywords: Vec::new(),
            language: "en".to_string(),
            version: "1.0".to_string(),
        }
    }
}

/// Index entry; `terms` run from the primary term to the most specific one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    pub terms: Vec<String>,
    pub page_number: u32,
    pub sort_key: String,
}

impl IndexEntry {
    /// Entry whose sort key is its joined terms
    pub fn new(id: impl Into<String>, terms: Vec<String>, page_number: u32) -> Self {
        let sort_key = terms.join(", ");
        Self {
            id: id.into(),
            terms,
            page_number,
            sort_key,
        }
    }

    pub fn primary_term(&self) -> &str {
        self.terms.first().map(String::as_str).unwrap_or("")
    }
}
