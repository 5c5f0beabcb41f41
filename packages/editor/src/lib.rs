//! # Folio Editor
//!
//! Core document editing engine for Folio.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: content tree + persisted payload     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document aggregate + mutations      │
//! │  - Load/save payloads                       │
//! │  - Apply structural edits atomically        │
//! │  - Derived outline, index and search        │
//! │  - Snapshot undo/redo                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ render: flows content into layout frames    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Content tree is the source of truth**: outline, index and search
//!    results are derived views
//! 2. **All-or-nothing edits**: a mutation either commits a valid tree or
//!    leaves the document untouched
//! 3. **Self-healing structure**: containers emptied by an edit are refilled
//!    or dropped before validation
//!
//! ## Usage
//!
//! ```rust
//! use folio_editor::{Document, EditSession, Mutation, Point};
//!
//! let mut session = EditSession::new(Document::new("Release notes"));
//! session.apply(Mutation::InsertText {
//!     at: Point::new(vec![0], 0),
//!     text: "Hello".to_string(),
//! })?;
//! assert_eq!(session.document().word_count(), 1);
//!
//! session.undo();
//! assert_eq!(session.document().word_count(), 0);
//! # Ok::<(), folio_editor::EditorError>(())
//! ```

mod document;
mod errors;
mod index;
mod mutations;
mod outline;
mod search;
mod session;
mod settings;
pub mod transforms;
mod undo_stack;

pub use document::Document;
pub use errors::EditorError;
pub use index::{collation_key, compare_sort_keys, IndexGroup};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use outline::{build_outline, OutlineEntry};
pub use search::{find_matches, FindReplace, SearchMatch, SearchOptions, SearchState};
pub use session::{EditSession, SessionEvent, SubscriptionId};
pub use settings::EditorSettings;
pub use transforms::{BlockFormat, ContainerKind, FormatPatch, Location, Point, Range};
pub use undo_stack::{UndoStack, DEFAULT_HISTORY_LIMIT};
