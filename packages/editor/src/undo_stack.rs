//! # Undo/Redo Stack
//!
//! Bounded linear history of snapshots.
//!
//! ## Design
//!
//! - The stack holds whole snapshots and an index to the current one
//! - Pushing drops everything after the index, so a new edit clears redo
//! - Beyond `max_levels` the oldest snapshot is evicted for good
//! - Undo/redo only move the index; the caller restores the snapshot
//!
//! ## Example
//!
//! ```rust
//! use folio_editor::UndoStack;
//!
//! let mut stack = UndoStack::new("v0");
//! stack.push("v1");
//! assert_eq!(stack.undo(), Some(&"v0"));
//! assert_eq!(stack.redo(), Some(&"v1"));
//! assert_eq!(stack.redo(), None);
//! ```

/// Default number of retained snapshots
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Undo/redo history for document editing
#[derive(Debug, Clone)]
pub struct UndoStack<T> {
    /// Snapshots, oldest first
    entries: Vec<T>,

    /// Index of the snapshot matching the live state
    index: usize,

    /// Maximum number of retained snapshots (at least 1)
    max_levels: usize,
}

impl<T> UndoStack<T> {
    /// Create a stack seeded with the initial state and the default bound
    pub fn new(initial: T) -> Self {
        Self::with_max_levels(initial, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_max_levels(initial: T, max_levels: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            max_levels: max_levels.max(1),
        }
    }

    /// Record a new current state
    pub fn push(&mut self, snapshot: T) {
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);

        // Trim if exceeded max levels
        if self.entries.len() > self.max_levels {
            let excess = self.entries.len() - self.max_levels;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back and return the snapshot to restore
    pub fn undo(&mut self) -> Option<&T> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward and return the snapshot to restore
    pub fn redo(&mut self) -> Option<&T> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.index)
    }

    /// Number of retained snapshots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the stack always holds the current state
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.index
    }

    pub fn redo_levels(&self) -> usize {
        self.entries.len() - self.index - 1
    }

    /// Forget all history, keeping `current` as the only entry
    pub fn reset(&mut self, current: T) {
        self.entries.clear();
        self.entries.push(current);
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new(0);
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_then_redo() {
        let mut stack = UndoStack::new("a");
        stack.push("b");
        stack.push("c");

        assert_eq!(stack.undo(), Some(&"b"));
        assert_eq!(stack.undo(), Some(&"a"));
        assert_eq!(stack.undo(), None);
        assert_eq!(stack.redo(), Some(&"b"));
        assert_eq!(stack.redo_levels(), 1);
    }

    #[test]
    fn test_new_push_clears_redo() {
        let mut stack = UndoStack::new(1);
        stack.push(2);
        stack.undo();
        assert!(stack.can_redo());

        stack.push(3);
        assert!(!stack.can_redo());
        assert_eq!(stack.current(), Some(&3));
        assert_eq!(stack.undo(), Some(&1));
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut stack = UndoStack::with_max_levels(0, 3);
        for i in 1..=5 {
            stack.push(i);
        }
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.undo(), Some(&4));
        assert_eq!(stack.undo(), Some(&3));
        assert_eq!(stack.undo(), None);
    }
}
