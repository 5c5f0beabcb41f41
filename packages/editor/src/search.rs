//! # Find / Replace
//!
//! Searches the text runs of a content tree and steps through the matches.
//!
//! ```text
//! Idle ──search──▶ Searching ──▶ HasMatches | NoMatches
//!   ▲                                   │
//!   └────────────── clear ◀─────────────┘
//! ```
//!
//! Every query or option change re-enters `Searching`. Matches never span
//! two runs.

use folio_common::Visitor;
use folio_model::{ContentNode, Path, TextRun};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Document, EditorError, Mutation};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub use_regex: bool,
}

/// One hit: the run it lives in and its character span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub path: Path,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Searching,
    HasMatches,
    NoMatches,
}

/// Compile the query. Regex mode takes the query as a pattern; whole-word
/// wraps whatever pattern results in word boundaries.
fn compile(query: &str, options: SearchOptions) -> Result<Regex, regex::Error> {
    let pattern = if options.use_regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    let pattern = if options.whole_word {
        format!(r"\b(?:{pattern})\b")
    } else {
        pattern
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()
}

struct MatchCollector<'a> {
    regex: &'a Regex,
    matches: Vec<SearchMatch>,
}

impl Visitor for MatchCollector<'_> {
    fn visit_text_run(&mut self, run: &TextRun, path: &[usize]) {
        for found in self.regex.find_iter(&run.text) {
            if found.as_str().is_empty() {
                continue;
            }
            self.matches.push(SearchMatch {
                path: path.to_vec(),
                offset: run.text[..found.start()].chars().count(),
                length: found.as_str().chars().count(),
            });
        }
    }
}

/// All matches of `query` in document order
pub fn find_matches(content: &[ContentNode], query: &str, options: SearchOptions) -> Result<Vec<SearchMatch>, regex::Error> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let regex = compile(query, options)?;
    let mut collector = MatchCollector {
        regex: &regex,
        matches: Vec::new(),
    };
    collector.visit_content(content);
    Ok(collector.matches)
}

/// Find/replace engine state
#[derive(Debug, Clone)]
pub struct FindReplace {
    query: String,
    options: SearchOptions,
    state: SearchState,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
}

impl Default for FindReplace {
    fn default() -> Self {
        Self::new()
    }
}

impl FindReplace {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            options: SearchOptions::default(),
            state: SearchState::Idle,
            matches: Vec::new(),
            current: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&SearchMatch> {
        self.current.and_then(|index| self.matches.get(index))
    }

    /// Run a new search; returns the number of matches
    pub fn search(&mut self, content: &[ContentNode], query: impl Into<String>, options: SearchOptions) -> usize {
        self.query = query.into();
        self.options = options;
        self.current = None;
        self.refresh(content)
    }

    pub fn set_options(&mut self, content: &[ContentNode], options: SearchOptions) -> usize {
        self.options = options;
        self.current = None;
        self.refresh(content)
    }

    /// Re-run the current query against (possibly edited) content, keeping
    /// the current position where it still exists
    pub fn refresh(&mut self, content: &[ContentNode]) -> usize {
        if self.query.is_empty() {
            self.clear();
            return 0;
        }

        self.state = SearchState::Searching;
        self.matches = match find_matches(content, &self.query, self.options) {
            Ok(matches) => matches,
            Err(error) => {
                debug!(query = %self.query, error = %error, "invalid search pattern");
                Vec::new()
            }
        };

        if self.matches.is_empty() {
            self.state = SearchState::NoMatches;
            self.current = None;
        } else {
            self.state = SearchState::HasMatches;
            let last = self.matches.len() - 1;
            self.current = Some(self.current.map_or(0, |index| index.min(last)));
        }
        self.matches.len()
    }

    /// Back to idle with no query
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current = None;
        self.state = SearchState::Idle;
    }

    /// Step forward, wrapping from the last match to the first
    pub fn next(&mut self) -> Option<&SearchMatch> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(0, |index| (index + 1) % count));
        self.current()
    }

    /// Step back, wrapping from the first match to the last
    pub fn previous(&mut self) -> Option<&SearchMatch> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(count - 1, |index| (index + count - 1) % count));
        self.current()
    }

    /// Replace the current match, then search again. Returns false when
    /// there is no current match. Matches are re-scanned first, since the
    /// document may have changed since the last search.
    pub fn replace_current(&mut self, document: &mut Document, replacement: &str) -> Result<bool, EditorError> {
        self.refresh(document.content());
        let Some(found) = self.current().cloned() else {
            return Ok(false);
        };
        document.apply(Mutation::ReplaceText {
            path: found.path,
            offset: found.offset,
            length: found.length,
            text: replacement.to_string(),
        })?;
        self.refresh(document.content());
        Ok(true)
    }

    /// Replace every match in one atomic edit, last match first so earlier
    /// offsets stay valid. Returns the number of replacements.
    pub fn replace_all(&mut self, document: &mut Document, replacement: &str) -> Result<usize, EditorError> {
        self.refresh(document.content());
        let edits: Vec<Mutation> = self
            .matches
            .iter()
            .rev()
            .map(|found| Mutation::ReplaceText {
                path: found.path.clone(),
                offset: found.offset,
                length: found.length,
                text: replacement.to_string(),
            })
            .collect();
        if edits.is_empty() {
            return Ok(0);
        }
        document.apply_all(&edits)?;
        self.current = None;
        self.refresh(document.content());
        Ok(edits.len())
    }
}
