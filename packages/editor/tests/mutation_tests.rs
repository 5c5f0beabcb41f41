//! Comprehensive mutation tests

use folio_editor::{BlockFormat, ContainerKind, Document, Location, Mutation, Point, Range};
use folio_model::{validate_tree, ContentNode, Mark, NodeKind};

fn document(paragraphs: &[&str]) -> Document {
    let mut doc = Document::new("Test");
    doc.set_content(paragraphs.iter().map(|text| ContentNode::paragraph(*text)).collect())
        .unwrap();
    doc
}

#[test]
fn test_insert_table_builds_empty_grid() {
    let mut doc = document(&["before"]);
    doc.apply(Mutation::InsertTable {
        at: Location::Point(Point::new(vec![0, 0], 6)),
        rows: 3,
        cols: 3,
    })
    .unwrap();

    let table = &doc.content()[1];
    assert_eq!(table.kind(), NodeKind::Table);
    let cells: Vec<&ContentNode> = table
        .children()
        .unwrap()
        .iter()
        .flat_map(|row| row.children().unwrap().iter())
        .collect();
    assert_eq!(cells.len(), 9);
    for cell in cells {
        let blocks = cell.children().unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind(), NodeKind::Paragraph);
        assert_eq!(blocks[0].text_content(), "");
    }
}

#[test]
fn test_toggle_mark_twice_restores_content() {
    let mut doc = document(&["Hello world"]);
    let original = doc.content().to_vec();
    let toggle = Mutation::ToggleMark {
        range: Range::within(vec![0, 0], 2, 7),
        mark: Mark::Bold,
    };

    doc.apply(toggle).unwrap();
    assert_eq!(doc.content()[0].children().unwrap().len(), 3);

    // The bold run sits at [0, 1] after the first split.
    let second = Mutation::ToggleMark {
        range: Range::within(vec![0, 1], 0, 5),
        mark: Mark::Bold,
    };
    doc.apply(second).unwrap();
    assert_eq!(doc.content(), original.as_slice());
}

#[test]
fn test_heading_conversion_across_range() {
    let mut doc = document(&["one", "two", "three"]);
    doc.apply(Mutation::SetNodeType {
        at: Location::Range(Range::new(Point::new(vec![0, 0], 1), Point::new(vec![1, 0], 1))),
        format: BlockFormat::Heading { level: 2 },
    })
    .unwrap();

    let kinds: Vec<NodeKind> = doc.content().iter().map(ContentNode::kind).collect();
    assert_eq!(kinds, vec![NodeKind::Heading, NodeKind::Heading, NodeKind::Paragraph]);
    let ids: Vec<String> = doc.headings().into_iter().map(|(_, id, _)| id).collect();
    assert_ne!(ids[0], ids[1]);
    assert_eq!(doc.outline().len(), 2);
}

#[test]
fn test_invalid_heading_level_is_rejected() {
    let mut doc = document(&["one"]);
    let before = doc.content().to_vec();
    let result = doc.apply(Mutation::SetNodeType {
        at: Location::Path(vec![0]),
        format: BlockFormat::Heading { level: 7 },
    });
    assert!(result.is_err());
    assert_eq!(doc.content(), before.as_slice());
}

#[test]
fn test_wrap_then_toggle_back() {
    let mut doc = document(&["a", "b"]);
    let original = doc.content().to_vec();
    let both = Location::Range(Range::new(Point::new(vec![0, 0], 0), Point::new(vec![1, 0], 1)));

    doc.apply(Mutation::Wrap {
        at: both,
        container: ContainerKind::BulletedList,
    })
    .unwrap();
    assert_eq!(doc.content().len(), 1);
    assert_eq!(doc.content()[0].children().unwrap().len(), 2);

    let inside = Location::Range(Range::new(
        Point::new(vec![0, 0, 0, 0], 0),
        Point::new(vec![0, 1, 0, 0], 1),
    ));
    doc.apply(Mutation::ToggleWrap {
        at: inside,
        container: ContainerKind::BulletedList,
    })
    .unwrap();
    assert_eq!(doc.content(), original.as_slice());
}

#[test]
fn test_inline_insert_inside_table_cell() {
    let mut doc = document(&["intro"]);
    doc.apply(Mutation::Insert {
        at: Location::Path(vec![1]),
        node: ContentNode::table(1, 2),
    })
    .unwrap();
    doc.apply(Mutation::InsertText {
        at: Point::new(vec![1, 0, 1, 0], 0),
        text: "See page".to_string(),
    })
    .unwrap();
    doc.apply(Mutation::Insert {
        at: Location::Point(Point::new(vec![1, 0, 1, 0, 0], 4)),
        node: ContentNode::cross_reference("intro", "page"),
    })
    .unwrap();

    let paragraph = &doc.content()[1].children().unwrap()[0].children().unwrap()[1].children().unwrap()[0];
    let kinds: Vec<NodeKind> = paragraph.children().unwrap().iter().map(ContentNode::kind).collect();
    assert_eq!(kinds, vec![NodeKind::TextRun, NodeKind::CrossReference, NodeKind::TextRun]);
    assert!(validate_tree(doc.content()).is_ok());
}

#[test]
fn test_inline_node_at_root_is_rejected() {
    let mut doc = document(&["x"]);
    let result = doc.apply(Mutation::Insert {
        at: Location::Path(vec![0]),
        node: ContentNode::variable("Product"),
    });
    assert!(result.is_err());
    assert_eq!(doc.content().len(), 1);
}

#[test]
fn test_remove_cell_content_self_heals() {
    let mut doc = document(&["x"]);
    doc.apply(Mutation::Insert {
        at: Location::Path(vec![1]),
        node: ContentNode::table(1, 1),
    })
    .unwrap();
    doc.apply(Mutation::Remove {
        path: vec![1, 0, 0, 0],
    })
    .unwrap();

    let cell = &doc.content()[1].children().unwrap()[0].children().unwrap()[0];
    assert_eq!(cell.children().unwrap().len(), 1);
    assert_eq!(cell.children().unwrap()[0].kind(), NodeKind::Paragraph);
}

#[test]
fn test_split_and_merge() {
    let mut doc = document(&["firstsecond"]);
    doc.apply(Mutation::Split {
        at: Point::new(vec![0, 0], 5),
    })
    .unwrap();
    assert_eq!(doc.content().len(), 2);
    assert_eq!(doc.content()[1].text_content(), "second");

    doc.apply(Mutation::Merge { path: vec![1] }).unwrap();
    assert_eq!(doc.content().len(), 1);
    assert_eq!(doc.content()[0].text_content(), "firstsecond");
    assert_eq!(doc.content()[0].children().unwrap().len(), 1);
}
