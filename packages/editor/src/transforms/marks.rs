//! Inline formatting over a range of text runs.

use folio_model::node::{node_at, node_at_mut};
use folio_model::{ContentNode, Mark, Path, TextRun};
use serde::{Deserialize, Serialize};

use super::location::{parent_of, resolve_point, text_runs_in, Range};
use crate::mutations::MutationError;

/// Scalar run attributes to overwrite; `None` leaves the attribute alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_style_id: Option<String>,
}

impl FormatPatch {
    pub fn is_empty(&self) -> bool {
        self == &FormatPatch::default()
    }

    fn apply(&self, run: &mut TextRun) {
        if let Some(color) = &self.color {
            run.color = Some(color.clone());
        }
        if let Some(background) = &self.background_color {
            run.background_color = Some(background.clone());
        }
        if let Some(size) = self.font_size {
            run.font_size = Some(size);
        }
        if let Some(family) = &self.font_family {
            run.font_family = Some(family.clone());
        }
        if let Some(style) = &self.character_style_id {
            run.character_style_id = Some(style.clone());
        }
    }
}

/// Part of one run covered by a range: `path`, char span `start..end`
struct Segment {
    path: Path,
    start: usize,
    end: usize,
}

fn segments(content: &[ContentNode], range: &Range) -> Result<Vec<Segment>, MutationError> {
    let (start, end) = range.ordered();
    let start = resolve_point(content, &start)?;
    let end = resolve_point(content, &end)?;

    let segments = text_runs_in(content, &start.path, &end.path)
        .into_iter()
        .filter_map(|path| {
            let len = node_at(content, &path)?.as_text_run()?.char_len();
            let from = if path == start.path { start.offset } else { 0 };
            let to = if path == end.path { end.offset } else { len };
            (from < to).then_some(Segment {
                path,
                start: from,
                end: to,
            })
        })
        .collect();
    Ok(segments)
}

fn run_at<'a>(content: &'a [ContentNode], path: &[usize]) -> Option<&'a TextRun> {
    node_at(content, path)?.as_text_run()
}

/// Isolate `segment` into its own run and hand it to `edit`
fn edit_segment(
    content: &mut [ContentNode],
    segment: &Segment,
    edit: &impl Fn(&mut TextRun),
) -> Result<(), MutationError> {
    let (parent, index) = parent_of(&segment.path).ok_or_else(|| MutationError::NodeNotFound(segment.path.clone()))?;
    let siblings = node_at_mut(content, parent)
        .and_then(ContentNode::children_mut)
        .ok_or_else(|| MutationError::ParentNotFound(parent.to_vec()))?;
    let run = siblings
        .get(index)
        .and_then(ContentNode::as_text_run)
        .ok_or_else(|| MutationError::NotText(segment.path.clone()))?;

    let (head, rest) = run.split_at(segment.start);
    let (mut middle, tail) = rest.split_at(segment.end - segment.start);
    edit(&mut middle);

    let pieces: Vec<ContentNode> = [head, middle, tail]
        .into_iter()
        .filter(|piece| !piece.text.is_empty())
        .map(ContentNode::TextRun)
        .collect();
    siblings.splice(index..=index, pieces);
    Ok(())
}

fn edit_range(content: &mut [ContentNode], range: &Range, edit: impl Fn(&mut TextRun)) -> Result<(), MutationError> {
    let segments = segments(content, range)?;
    // Back to front so earlier paths stay valid while runs split.
    for segment in segments.iter().rev() {
        edit_segment(content, segment, &edit)?;
    }
    Ok(())
}

/// Whether every run touched by `range` carries `mark`.
///
/// A collapsed range reads the run under the caret.
pub fn is_mark_active(content: &[ContentNode], range: &Range, mark: Mark) -> bool {
    if range.is_collapsed() {
        return resolve_point(content, &range.anchor)
            .ok()
            .and_then(|point| run_at(content, &point.path))
            .map(|run| run.has_mark(mark))
            .unwrap_or(false);
    }
    match segments(content, range) {
        Ok(segments) if !segments.is_empty() => segments
            .iter()
            .all(|segment| run_at(content, &segment.path).map(|run| run.has_mark(mark)).unwrap_or(false)),
        _ => false,
    }
}

/// Flip `mark` over the range: off everywhere when uniformly on, on otherwise
pub fn toggle_mark(content: &mut [ContentNode], range: &Range, mark: Mark) -> Result<(), MutationError> {
    if range.is_collapsed() {
        return Ok(());
    }
    let value = !is_mark_active(content, range, mark);
    edit_range(content, range, |run| run.set_mark(mark, value))
}

pub fn set_format(content: &mut [ContentNode], range: &Range, patch: &FormatPatch) -> Result<(), MutationError> {
    if range.is_collapsed() || patch.is_empty() {
        return Ok(());
    }
    edit_range(content, range, |run| patch.apply(run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::location::Point;

    fn marks_of(node: &ContentNode) -> Vec<(String, bool)> {
        node.children()
            .unwrap()
            .iter()
            .filter_map(ContentNode::as_text_run)
            .map(|run| (run.text.clone(), run.bold))
            .collect()
    }

    #[test]
    fn test_toggle_bold_inside_run() {
        let mut content = vec![ContentNode::paragraph("Hello world")];
        toggle_mark(&mut content, &Range::within(vec![0, 0], 0, 5), Mark::Bold).unwrap();

        assert_eq!(
            marks_of(&content[0]),
            vec![("Hello".to_string(), true), (" world".to_string(), false)]
        );
    }

    #[test]
    fn test_mixed_selection_turns_mark_on() {
        let mut content = vec![ContentNode::Paragraph {
            style_id: None,
            children: vec![
                ContentNode::TextRun(TextRun {
                    bold: true,
                    ..TextRun::new("ab")
                }),
                ContentNode::text("cd"),
            ],
        }];
        let range = Range::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 1], 2));
        assert!(!is_mark_active(&content, &range, Mark::Bold));

        toggle_mark(&mut content, &range, Mark::Bold).unwrap();
        assert!(marks_of(&content[0]).iter().all(|(_, bold)| *bold));
    }

    #[test]
    fn test_superscript_clears_subscript() {
        let mut content = vec![ContentNode::paragraph("x2")];
        let range = Range::within(vec![0, 0], 1, 2);
        toggle_mark(&mut content, &range, Mark::Subscript).unwrap();
        let range = Range::within(vec![0, 1], 0, 1);
        toggle_mark(&mut content, &range, Mark::Superscript).unwrap();

        let run = content[0].children().unwrap()[1].as_text_run().unwrap();
        assert!(run.superscript);
        assert!(!run.subscript);
    }

    #[test]
    fn test_collapsed_toggle_is_noop() {
        let mut content = vec![ContentNode::paragraph("abc")];
        let before = content.clone();
        toggle_mark(&mut content, &Range::within(vec![0, 0], 1, 1), Mark::Italic).unwrap();
        assert_eq!(content, before);
    }

    #[test]
    fn test_set_format_across_blocks() {
        let mut content = vec![ContentNode::paragraph("one"), ContentNode::paragraph("two")];
        let patch = FormatPatch {
            color: Some("#ff0000".to_string()),
            ..FormatPatch::default()
        };
        let range = Range::new(Point::new(vec![0, 0], 1), Point::new(vec![1, 0], 1));
        set_format(&mut content, &range, &patch).unwrap();

        let first = content[0].children().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].as_text_run().unwrap().color.as_deref(), Some("#ff0000"));
        let second = content[1].children().unwrap();
        assert_eq!(second[0].as_text_run().unwrap().text, "t");
        assert_eq!(second[0].as_text_run().unwrap().color.as_deref(), Some("#ff0000"));
        assert_eq!(second[1].as_text_run().unwrap().color, None);
    }

    #[test]
    fn test_out_of_bounds_range_errors() {
        let mut content = vec![ContentNode::paragraph("abc")];
        let result = toggle_mark(&mut content, &Range::within(vec![0, 0], 0, 9), Mark::Bold);
        assert!(matches!(result, Err(MutationError::OutOfBounds { .. })));
    }
}
