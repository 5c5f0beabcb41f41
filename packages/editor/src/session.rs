//! # Edit Session Management
//!
//! An EditSession is the single-user editing surface over one Document: it
//! records history, drives find/replace and tells observers about changes.
//!
//! Every committed content change pushes a snapshot to the undo history and
//! notifies subscribers. Undo and redo restore snapshots without pushing.

use folio_model::ContentNode;
use tracing::debug;

use crate::search::{FindReplace, SearchOptions};
use crate::{Document, EditorError, EditorSettings, Mutation, MutationResult, UndoStack};

/// Handle returned by [`EditSession::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What changed in the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Content changed through an edit
    ContentChanged { version: u64 },
    /// Content restored from history
    HistoryRestored { version: u64 },
    /// A different document was loaded
    DocumentReplaced { id: String },
}

type Observer = Box<dyn FnMut(&SessionEvent, &Document)>;

/// Single-user edit session
pub struct EditSession {
    /// Document being edited
    document: Document,

    history: UndoStack<Vec<ContentNode>>,
    search: FindReplace,
    settings: EditorSettings,

    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl EditSession {
    /// Create new edit session
    pub fn new(document: Document) -> Self {
        Self::with_settings(document, EditorSettings::default())
    }

    pub fn with_settings(document: Document, settings: EditorSettings) -> Self {
        let history = UndoStack::with_max_levels(document.content().to_vec(), settings.history_limit);
        Self {
            document,
            history,
            search: FindReplace::new(),
            settings,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct access for edits that do not touch content (styles, variables,
    /// conditions, index entries). Content edits made here bypass history.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn history(&self) -> &UndoStack<Vec<ContentNode>> {
        &self.history
    }

    pub fn search(&self) -> &FindReplace {
        &self.search
    }

    /// Register an observer called after every change
    pub fn subscribe(&mut self, observer: impl FnMut(&SessionEvent, &Document) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false when the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn notify(&mut self, event: SessionEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event, &self.document);
        }
    }

    fn commit(&mut self, result: MutationResult) -> MutationResult {
        self.history.push(self.document.content().to_vec());
        self.search.refresh(self.document.content());
        self.notify(SessionEvent::ContentChanged { version: result.version });
        result
    }

    /// Apply one mutation and record it in history
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let result = self.document.apply(mutation)?;
        Ok(self.commit(result))
    }

    /// Apply mutations as one history entry
    pub fn apply_all(&mut self, mutations: &[Mutation]) -> Result<MutationResult, EditorError> {
        let result = self.document.apply_all(mutations)?;
        Ok(self.commit(result))
    }

    pub fn set_content(&mut self, content: Vec<ContentNode>) -> Result<MutationResult, EditorError> {
        let result = self.document.set_content(content)?;
        Ok(self.commit(result))
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    fn restore(&mut self, snapshot: Vec<ContentNode>) {
        self.document.restore_content(snapshot);
        self.search.refresh(self.document.content());
        debug!(version = self.document.version, "restored snapshot");
        let version = self.document.version;
        self.notify(SessionEvent::HistoryRestored { version });
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the document with one parsed from JSON. On failure the
    /// current document and history are kept.
    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        let document = Document::from_json(json)?;
        self.replace_document(document);
        Ok(())
    }

    pub fn replace_document(&mut self, document: Document) {
        self.history.reset(document.content().to_vec());
        self.document = document;
        self.search.clear();
        let id = self.document.id.clone();
        self.notify(SessionEvent::DocumentReplaced { id });
    }

    // Find / replace

    pub fn find(&mut self, query: &str, options: SearchOptions) -> usize {
        self.search.search(self.document.content(), query, options)
    }

    pub fn find_next(&mut self) -> bool {
        self.search.next().is_some()
    }

    pub fn find_previous(&mut self) -> bool {
        self.search.previous().is_some()
    }

    pub fn replace_current(&mut self, replacement: &str) -> Result<bool, EditorError> {
        let replaced = self.search.replace_current(&mut self.document, replacement)?;
        if replaced {
            let version = self.document.version;
            self.commit(MutationResult { version });
        }
        Ok(replaced)
    }

    pub fn replace_all(&mut self, replacement: &str) -> Result<usize, EditorError> {
        let count = self.search.replace_all(&mut self.document, replacement)?;
        if count > 0 {
            let version = self.document.version;
            self.commit(MutationResult { version });
        }
        Ok(count)
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::{Location, Point};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn typing(text: &str) -> Mutation {
        Mutation::InsertText {
            at: Point::new(vec![0], 0),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_session_creation() {
        let session = EditSession::new(Document::new("Notes"));
        assert!(!session.can_undo());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_undo_restores_previous_content() {
        let mut session = EditSession::new(Document::new("Notes"));
        session.apply(typing("one")).unwrap();
        session.apply(typing("two ")).unwrap();
        assert_eq!(session.document().content()[0].text_content(), "two one");

        assert!(session.undo());
        assert_eq!(session.document().content()[0].text_content(), "one");
        assert!(session.redo());
        assert_eq!(session.document().content()[0].text_content(), "two one");
        assert!(!session.redo());
    }

    #[test]
    fn test_observers_receive_events() {
        let mut session = EditSession::new(Document::new("Notes"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = session.subscribe(move |event, _doc| sink.borrow_mut().push(event.clone()));

        session.apply(typing("x")).unwrap();
        session.undo();
        assert!(session.unsubscribe(id));
        session.redo();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], SessionEvent::ContentChanged { .. }));
        assert!(matches!(seen[1], SessionEvent::HistoryRestored { .. }));
    }

    #[test]
    fn test_failed_load_keeps_document() {
        let mut session = EditSession::new(Document::new("Notes"));
        session.apply(typing("keep")).unwrap();
        assert!(session.load_json("{ not json").is_err());
        assert_eq!(session.document().content()[0].text_content(), "keep");
        assert!(session.can_undo());
    }

    #[test]
    fn test_replace_all_is_one_history_entry() {
        let mut session = EditSession::new(Document::new("Notes"));
        session
            .apply(Mutation::Insert {
                at: Location::Path(vec![1]),
                node: ContentNode::paragraph("cat and cat"),
            })
            .unwrap();
        session.find("cat", SearchOptions::default());
        assert_eq!(session.replace_all("dog").unwrap(), 2);
        assert_eq!(session.document().content()[1].text_content(), "dog and dog");

        session.undo();
        assert_eq!(session.document().content()[1].text_content(), "cat and cat");
    }

    #[test]
    fn test_find_navigation_and_direct_edits() {
        let mut session = EditSession::new(Document::new("Notes"));
        session.apply(typing("cat cat")).unwrap();
        assert!(!session.find_next());

        assert_eq!(session.find("cat", SearchOptions::default()), 2);
        assert!(session.find_next());
        assert_eq!(session.search().current_index(), Some(1));
        assert!(session.find_previous());
        assert_eq!(session.search().current_index(), Some(0));

        let year = folio_model::VariableDef::new("Year", "2025", folio_model::VariableType::Text);
        assert!(session.document_mut().add_variable(year));
        assert_eq!(session.history().len(), 2);
    }
}
