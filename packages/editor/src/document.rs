//! # Document Aggregate
//!
//! A Document owns one content tree together with the named entities the
//! tree refers to: styles, master pages, variables, conditions and index
//! entries. All content edits go through [`Document::apply`], which keeps
//! the version, modification time and outline in step with the tree.
//!
//! ## Lifecycle
//!
//! ```text
//! new / load → apply mutations → save
//!      ↓              ↓            ↓
//!   payload     content tree    payload
//! ```

use chrono::{DateTime, Utc};
use folio_common::TextStats;
use folio_model::{
    get_document_id, validate_tree, CharacterStyle, ConditionTag, ContentNode, DocumentPayload, IDGenerator,
    IndexEntry, MasterPage, Metadata, ParagraphStyle, ValidationError, VariableDef, DEFAULT_CHARACTER_STYLE_ID,
    DEFAULT_PARAGRAPH_STYLE_ID,
};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::index::{group_entries, sorted_entries, IndexGroup};
use crate::outline::{build_outline, headings, OutlineEntry};
use crate::transforms::{self, normalize};
use crate::{EditorError, Mutation, MutationResult};

/// Editable Folio document
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub metadata: Metadata,

    /// Current version number (increments on each content change)
    pub version: u64,

    content: Vec<ContentNode>,
    paragraph_styles: Vec<ParagraphStyle>,
    character_styles: Vec<CharacterStyle>,
    master_pages: Vec<MasterPage>,
    variables: Vec<VariableDef>,
    conditions: Vec<ConditionTag>,
    index_entries: Vec<IndexEntry>,

    /// Derived from the headings in `content`
    outline: Vec<OutlineEntry>,
    ids: IDGenerator,
}

impl Document {
    /// Empty document with the built-in styles and a US Letter master page
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = get_document_id(&name);
        let now = Utc::now();
        Self {
            ids: IDGenerator::new(&id),
            id,
            name,
            created: now,
            modified: now,
            metadata: Metadata::default(),
            version: 0,
            content: vec![ContentNode::empty_paragraph()],
            paragraph_styles: vec![ParagraphStyle::default()],
            character_styles: vec![CharacterStyle::default()],
            master_pages: vec![MasterPage::letter("master-default", "Default")],
            variables: Vec::new(),
            conditions: Vec::new(),
            index_entries: Vec::new(),
            outline: Vec::new(),
        }
    }

    /// Build a document from a persisted payload.
    ///
    /// Fails with [`EditorError::LoadFailed`] when the content or a master
    /// page header/footer is not a valid tree, or when variable or condition
    /// names repeat.
    pub fn load(payload: DocumentPayload) -> Result<Self, EditorError> {
        if let Err(error) = check_payload(&payload) {
            warn!(document = %payload.id, error = %error, "rejected document payload");
            return Err(EditorError::load_failed(error));
        }

        let mut ids = IDGenerator::new(&payload.id);
        for (_, id, _) in headings(&payload.content) {
            ids.observe(&id);
        }
        for entry in &payload.index_entries {
            ids.observe(&entry.id);
        }

        let outline = build_outline(&payload.content);
        debug!(document = %payload.id, nodes = payload.content.len(), "loaded document");

        Ok(Self {
            id: payload.id,
            name: payload.name,
            created: payload.created,
            modified: payload.modified,
            metadata: payload.metadata,
            version: 0,
            content: payload.content,
            paragraph_styles: payload.paragraph_styles,
            character_styles: payload.character_styles,
            master_pages: payload.master_pages,
            variables: payload.variables,
            conditions: payload.conditions,
            index_entries: payload.index_entries,
            outline,
            ids,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let payload: DocumentPayload = serde_json::from_str(json).map_err(EditorError::load_failed)?;
        Self::load(payload)
    }

    /// Deep copy of the persisted state
    pub fn save(&self) -> DocumentPayload {
        DocumentPayload {
            id: self.id.clone(),
            name: self.name.clone(),
            created: self.created,
            modified: self.modified,
            content: self.content.clone(),
            paragraph_styles: self.paragraph_styles.clone(),
            character_styles: self.character_styles.clone(),
            master_pages: self.master_pages.clone(),
            variables: self.variables.clone(),
            conditions: self.conditions.clone(),
            metadata: self.metadata.clone(),
            index_entries: self.index_entries.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.save())?)
    }

    // Content

    pub fn content(&self) -> &[ContentNode] {
        &self.content
    }

    pub fn outline(&self) -> &[OutlineEntry] {
        &self.outline
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        if let Err(error) = mutation.apply(&mut self.content, &mut self.ids) {
            debug!(op = mutation.name(), error = %error, "mutation rejected");
            return Err(error.into());
        }
        self.touch();
        debug!(op = mutation.name(), version = self.version, "applied mutation");

        Ok(MutationResult { version: self.version })
    }

    /// Apply several mutations as one edit; none are kept if any fails
    pub fn apply_all(&mut self, mutations: &[Mutation]) -> Result<MutationResult, EditorError> {
        if mutations.is_empty() {
            return Ok(MutationResult { version: self.version });
        }
        for mutation in mutations {
            mutation.validate()?;
        }
        let ids = &mut self.ids;
        transforms::atomically(&mut self.content, |scratch| {
            mutations
                .iter()
                .try_for_each(|mutation| mutation.apply_unchecked(scratch, ids))
        })?;
        self.touch();
        debug!(count = mutations.len(), version = self.version, "applied mutation batch");

        Ok(MutationResult { version: self.version })
    }

    /// Replace the whole content tree; it is normalized then validated
    pub fn set_content(&mut self, mut content: Vec<ContentNode>) -> Result<MutationResult, EditorError> {
        normalize(&mut content);
        validate_tree(&content)?;
        for (_, id, _) in headings(&content) {
            self.ids.observe(&id);
        }
        self.content = content;
        self.touch();
        Ok(MutationResult { version: self.version })
    }

    /// Put back a snapshot previously taken from this document
    pub(crate) fn restore_content(&mut self, content: Vec<ContentNode>) {
        self.content = content;
        self.touch();
    }

    fn touch(&mut self) {
        self.version += 1;
        self.modified = Utc::now();
        self.outline = build_outline(&self.content);
    }

    pub fn headings(&self) -> Vec<(u8, String, String)> {
        headings(&self.content)
    }

    /// Words in visible and hidden text alike
    pub fn word_count(&self) -> usize {
        TextStats::of(&self.content).words
    }

    pub fn stats(&self) -> TextStats {
        TextStats::of(&self.content)
    }

    // Paragraph styles

    pub fn paragraph_styles(&self) -> &[ParagraphStyle] {
        &self.paragraph_styles
    }

    /// Returns false when the id is taken
    pub fn add_paragraph_style(&mut self, style: ParagraphStyle) -> bool {
        if self.paragraph_styles.iter().any(|s| s.id == style.id) {
            return false;
        }
        self.paragraph_styles.push(style);
        true
    }

    pub fn update_paragraph_style(&mut self, style: ParagraphStyle) -> bool {
        match self.paragraph_styles.iter_mut().find(|s| s.id == style.id) {
            Some(existing) => {
                *existing = style;
                true
            }
            None => false,
        }
    }

    pub fn remove_paragraph_style(&mut self, id: &str) -> bool {
        remove_where(&mut self.paragraph_styles, |s| s.id == id)
    }

    /// Style for a node's `styleId`, falling back to the default style when
    /// the reference is missing or dangling
    pub fn paragraph_style_for(&self, style_id: Option<&str>) -> ParagraphStyle {
        let lookup = |id: &str| self.paragraph_styles.iter().find(|s| s.id == id);
        style_id
            .and_then(lookup)
            .or_else(|| lookup(DEFAULT_PARAGRAPH_STYLE_ID))
            .cloned()
            .unwrap_or_default()
    }

    // Character styles

    pub fn character_styles(&self) -> &[CharacterStyle] {
        &self.character_styles
    }

    pub fn add_character_style(&mut self, style: CharacterStyle) -> bool {
        if self.character_styles.iter().any(|s| s.id == style.id) {
            return false;
        }
        self.character_styles.push(style);
        true
    }

    pub fn update_character_style(&mut self, style: CharacterStyle) -> bool {
        match self.character_styles.iter_mut().find(|s| s.id == style.id) {
            Some(existing) => {
                *existing = style;
                true
            }
            None => false,
        }
    }

    pub fn remove_character_style(&mut self, id: &str) -> bool {
        remove_where(&mut self.character_styles, |s| s.id == id)
    }

    pub fn character_style_for(&self, style_id: Option<&str>) -> CharacterStyle {
        let lookup = |id: &str| self.character_styles.iter().find(|s| s.id == id);
        style_id
            .and_then(lookup)
            .or_else(|| lookup(DEFAULT_CHARACTER_STYLE_ID))
            .cloned()
            .unwrap_or_default()
    }

    // Master pages

    pub fn master_pages(&self) -> &[MasterPage] {
        &self.master_pages
    }

    /// Rejects taken ids and invalid header/footer trees
    pub fn add_master_page(&mut self, master: MasterPage) -> bool {
        if self.master_pages.iter().any(|m| m.id == master.id) || check_master(&master).is_err() {
            return false;
        }
        self.master_pages.push(master);
        true
    }

    pub fn update_master_page(&mut self, master: MasterPage) -> bool {
        if check_master(&master).is_err() {
            return false;
        }
        match self.master_pages.iter_mut().find(|m| m.id == master.id) {
            Some(existing) => {
                *existing = master;
                true
            }
            None => false,
        }
    }

    pub fn remove_master_page(&mut self, id: &str) -> bool {
        remove_where(&mut self.master_pages, |m| m.id == id)
    }

    // Variables

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    /// Returns false when the name is taken
    pub fn add_variable(&mut self, variable: VariableDef) -> bool {
        if self.variables.iter().any(|v| v.name == variable.name) {
            return false;
        }
        self.variables.push(variable);
        true
    }

    pub fn set_variable_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.variables.iter_mut().find(|v| v.name == name) {
            Some(variable) => {
                variable.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_variable(&mut self, name: &str) -> bool {
        remove_where(&mut self.variables, |v| v.name == name)
    }

    pub fn resolve_variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }

    // Conditions

    pub fn conditions(&self) -> &[ConditionTag] {
        &self.conditions
    }

    pub fn add_condition(&mut self, condition: ConditionTag) -> bool {
        if self.conditions.iter().any(|c| c.name == condition.name) {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    pub fn remove_condition(&mut self, name: &str) -> bool {
        remove_where(&mut self.conditions, |c| c.name == name)
    }

    pub fn toggle_condition_visibility(&mut self, name: &str) -> bool {
        match self.conditions.iter_mut().find(|c| c.name == name) {
            Some(condition) => {
                condition.visible = !condition.visible;
                true
            }
            None => false,
        }
    }

    /// Names of conditions whose text is currently hidden
    pub fn hidden_conditions(&self) -> Vec<String> {
        self.conditions
            .iter()
            .filter(|c| !c.visible)
            .map(|c| c.name.clone())
            .collect()
    }

    // Index

    pub fn index_entries(&self) -> &[IndexEntry] {
        &self.index_entries
    }

    /// Store an entry, assigning an id when it has none; returns the id
    pub fn add_index_entry(&mut self, mut entry: IndexEntry) -> Option<String> {
        if entry.terms.is_empty() {
            return None;
        }
        if entry.id.is_empty() {
            entry.id = self.ids.new_id();
        } else if self.index_entries.iter().any(|e| e.id == entry.id) {
            return None;
        }
        let id = entry.id.clone();
        self.index_entries.push(entry);
        Some(id)
    }

    pub fn update_index_entry(&mut self, entry: IndexEntry) -> bool {
        if entry.terms.is_empty() {
            return false;
        }
        match self.index_entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => {
                *existing = entry;
                true
            }
            None => false,
        }
    }

    pub fn remove_index_entry(&mut self, id: &str) -> bool {
        remove_where(&mut self.index_entries, |e| e.id == id)
    }

    /// Entries in collation order of their sort keys
    pub fn generate_index(&self) -> Vec<IndexEntry> {
        sorted_entries(&self.index_entries)
    }

    pub fn grouped_index(&self) -> Vec<IndexGroup> {
        group_entries(&self.index_entries)
    }
}

fn remove_where<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}

fn check_master(master: &MasterPage) -> Result<(), ValidationError> {
    validate_tree(&master.header)?;
    validate_tree(&master.footer)
}

fn check_payload(payload: &DocumentPayload) -> Result<(), ValidationError> {
    validate_tree(&payload.content)?;
    for master in &payload.master_pages {
        check_master(master)?;
    }

    let mut names = HashSet::new();
    if let Some(dup) = payload.variables.iter().find(|v| !names.insert(v.name.as_str())) {
        return Err(ValidationError::duplicate("variable", &dup.name));
    }
    let mut names = HashSet::new();
    if let Some(dup) = payload.conditions.iter().find(|c| !names.insert(c.name.as_str())) {
        return Err(ValidationError::duplicate("condition", &dup.name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::{BlockFormat, Location};
    use folio_model::VariableType;

    #[test]
    fn test_new_document_is_valid() {
        let doc = Document::new("Manual");
        assert_eq!(doc.version, 0);
        assert!(validate_tree(doc.content()).is_ok());
        assert_eq!(doc.paragraph_style_for(None).id, DEFAULT_PARAGRAPH_STYLE_ID);
    }

    #[test]
    fn test_apply_bumps_version_and_outline() {
        let mut doc = Document::new("Manual");
        let result = doc
            .apply(Mutation::SetNodeType {
                at: Location::Path(vec![0]),
                format: BlockFormat::Heading { level: 1 },
            })
            .unwrap();
        assert_eq!(result.version, 1);
        assert_eq!(doc.outline().len(), 1);
    }

    #[test]
    fn test_failed_apply_keeps_version() {
        let mut doc = Document::new("Manual");
        let result = doc.apply(Mutation::Remove { path: vec![5] });
        assert!(result.is_err());
        assert_eq!(doc.version, 0);
    }

    #[test]
    fn test_duplicate_variable_names_are_rejected() {
        let mut doc = Document::new("Manual");
        assert!(doc.add_variable(VariableDef::new("Product", "Folio", VariableType::Custom)));
        assert!(!doc.add_variable(VariableDef::new("Product", "Other", VariableType::Text)));
        assert_eq!(doc.resolve_variable("Product"), Some("Folio"));
        assert!(!doc.remove_variable("Missing"));
    }

    #[test]
    fn test_deleted_style_falls_back_to_default() {
        let mut doc = Document::new("Manual");
        assert!(doc.add_paragraph_style(ParagraphStyle::new("quote", "Quote")));
        assert_eq!(doc.paragraph_style_for(Some("quote")).name, "Quote");

        assert!(doc.remove_paragraph_style("quote"));
        assert_eq!(doc.paragraph_style_for(Some("quote")).id, DEFAULT_PARAGRAPH_STYLE_ID);
        assert_eq!(doc.character_style_for(Some("gone")).id, DEFAULT_CHARACTER_STYLE_ID);
    }

    #[test]
    fn test_load_rejects_duplicate_conditions() {
        let mut payload = Document::new("Manual").save();
        payload.conditions = vec![ConditionTag::new("Draft", "#f00"), ConditionTag::new("Draft", "#0f0")];
        assert!(matches!(Document::load(payload), Err(EditorError::LoadFailed(_))));
    }

    #[test]
    fn test_index_entry_ids_are_assigned() {
        let mut doc = Document::new("Manual");
        let id = doc.add_index_entry(IndexEntry::new("", vec!["Frames".into()], 3)).unwrap();
        assert!(!id.is_empty());
        assert!(doc.add_index_entry(IndexEntry::new(id.clone(), vec!["Again".into()], 1)).is_none());
        assert!(doc.add_index_entry(IndexEntry::new("", vec![], 1)).is_none());
        assert_eq!(doc.generate_index().len(), 1);
    }
}
