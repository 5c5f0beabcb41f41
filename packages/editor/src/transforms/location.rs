//! Locations inside the content tree: paths, points and ranges.

use std::cmp::Ordering;

use folio_model::node::node_at;
use folio_model::{ContentNode, NodeKind, Path};
use serde::{Deserialize, Serialize};

use crate::mutations::MutationError;

/// A caret position: a path to a text run plus a character offset into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Document order of two points
    pub fn compare(&self, other: &Point) -> Ordering {
        self.path
            .cmp(&other.path)
            .then(self.offset.cmp(&other.offset))
    }
}

/// A selection between two points, in either direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    /// Range inside a single run
    pub fn within(path: Path, start: usize, end: usize) -> Self {
        Self {
            anchor: Point::new(path.clone(), start),
            focus: Point::new(path, end),
        }
    }

    /// Start and end in document order
    pub fn ordered(&self) -> (Point, Point) {
        if self.anchor.compare(&self.focus) == Ordering::Greater {
            (self.focus.clone(), self.anchor.clone())
        } else {
            (self.anchor.clone(), self.focus.clone())
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Where an operation applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Path(Path),
    Point(Point),
    Range(Range),
}

impl Location {
    /// First and last path covered by the location
    pub fn span(&self) -> (Path, Path) {
        match self {
            Location::Path(path) => (path.clone(), path.clone()),
            Location::Point(point) => (point.path.clone(), point.path.clone()),
            Location::Range(range) => {
                let (start, end) = range.ordered();
                (start.path, end.path)
            }
        }
    }

    /// Caret where insertions happen; ranges collapse to their start
    pub fn start_point(&self) -> Option<Point> {
        match self {
            Location::Path(_) => None,
            Location::Point(point) => Some(point.clone()),
            Location::Range(range) => Some(range.ordered().0),
        }
    }
}

impl From<Point> for Location {
    fn from(point: Point) -> Self {
        Location::Point(point)
    }
}

impl From<Range> for Location {
    fn from(range: Range) -> Self {
        Location::Range(range)
    }
}

pub fn is_ancestor(ancestor: &[usize], path: &[usize]) -> bool {
    ancestor.len() < path.len() && path.starts_with(ancestor)
}

/// Whether the subtree at `path` overlaps the span `start..=end`
pub fn intersects(path: &[usize], start: &[usize], end: &[usize]) -> bool {
    let before = path < start && !is_ancestor(path, start);
    let after = path > end && !is_ancestor(end, path);
    !before && !after
}

pub fn parent_of(path: &[usize]) -> Option<(&[usize], usize)> {
    let (last, parent) = path.split_last()?;
    Some((parent, *last))
}

/// Paths of all text blocks intersecting `start..=end`, in document order
pub fn text_blocks_in(content: &[ContentNode], start: &[usize], end: &[usize]) -> Vec<Path> {
    let mut found = Vec::new();
    let mut path = Vec::new();
    collect_blocks(content, start, end, &mut path, &mut found);
    found
}

fn collect_blocks(
    nodes: &[ContentNode],
    start: &[usize],
    end: &[usize],
    path: &mut Vec<usize>,
    found: &mut Vec<Path>,
) {
    for (index, node) in nodes.iter().enumerate() {
        path.push(index);
        if intersects(path, start, end) {
            if node.kind().is_text_block() {
                found.push(path.clone());
            } else if let Some(children) = node.children() {
                collect_blocks(children, start, end, path, found);
            }
        }
        path.pop();
    }
}

/// Paths of all text runs between two leaf paths, inclusive
pub fn text_runs_in(content: &[ContentNode], start: &[usize], end: &[usize]) -> Vec<Path> {
    let mut found = Vec::new();
    let mut path = Vec::new();
    collect_runs(content, start, end, &mut path, &mut found);
    found
}

fn collect_runs(
    nodes: &[ContentNode],
    start: &[usize],
    end: &[usize],
    path: &mut Vec<usize>,
    found: &mut Vec<Path>,
) {
    for (index, node) in nodes.iter().enumerate() {
        path.push(index);
        if intersects(path, start, end) {
            match node {
                ContentNode::TextRun(_) => found.push(path.clone()),
                other => {
                    if let Some(children) = other.children() {
                        collect_runs(children, start, end, path, found);
                    }
                }
            }
        }
        path.pop();
    }
}

/// Deepest text block containing (or equal to) `path`
pub fn enclosing_text_block(content: &[ContentNode], path: &[usize]) -> Option<Path> {
    (1..=path.len())
        .rev()
        .map(|len| &path[..len])
        .find(|prefix| {
            node_at(content, prefix)
                .map(|node| node.kind().is_text_block())
                .unwrap_or(false)
        })
        .map(<[usize]>::to_vec)
}

/// Nearest ancestor-or-self of `path` whose kind satisfies `matches`
pub fn find_ancestor(
    content: &[ContentNode],
    path: &[usize],
    matches: impl Fn(NodeKind) -> bool,
) -> Option<Path> {
    (1..=path.len())
        .rev()
        .map(|len| &path[..len])
        .find(|prefix| {
            node_at(content, prefix)
                .map(|node| matches(node.kind()))
                .unwrap_or(false)
        })
        .map(<[usize]>::to_vec)
}

/// Turn a point into one addressing a text run.
///
/// Points may address a text-bearing container directly, in which case the
/// offset counts characters across its runs.
pub fn resolve_point(content: &[ContentNode], point: &Point) -> Result<Point, MutationError> {
    let node = node_at(content, &point.path).ok_or_else(|| MutationError::NodeNotFound(point.path.clone()))?;

    match node {
        ContentNode::TextRun(run) => {
            if point.offset > run.char_len() {
                return Err(MutationError::OutOfBounds {
                    path: point.path.clone(),
                    offset: point.offset,
                });
            }
            Ok(point.clone())
        }
        container if container.kind().is_text_bearing() => {
            let runs = text_runs_in(content, &point.path, &point.path);
            let mut remaining = point.offset;
            for run_path in &runs {
                let len = node_at(content, run_path)
                    .and_then(ContentNode::as_text_run)
                    .map(|run| run.char_len())
                    .unwrap_or(0);
                if remaining <= len {
                    return Ok(Point::new(run_path.clone(), remaining));
                }
                remaining -= len;
            }
            Err(MutationError::OutOfBounds {
                path: point.path.clone(),
                offset: point.offset,
            })
        }
        _ => Err(MutationError::NotText(point.path.clone())),
    }
}

/// Character offset of a run-addressed point from the start of `block`
pub fn offset_in_block(content: &[ContentNode], block: &[usize], point: &Point) -> usize {
    let before: usize = text_runs_in(content, block, block)
        .iter()
        .take_while(|run| run.as_slice() < point.path.as_slice())
        .filter_map(|run| node_at(content, run).and_then(ContentNode::as_text_run))
        .map(|run| run.char_len())
        .sum();
    before + point.offset
}
