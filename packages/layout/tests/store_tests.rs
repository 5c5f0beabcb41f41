use folio_layout::{FrameKind, LayoutError, LayoutSettings, LayoutStore, Rect, Tool};
use folio_model::TextRun;

fn snapping() -> LayoutStore {
    LayoutStore::new(LayoutSettings {
        snap_to_grid: true,
        ..LayoutSettings::default()
    })
}

fn page_id(store: &LayoutStore) -> String {
    store.current_page().id.clone()
}

#[test]
fn test_links_survive_save_and_load() {
    let mut store = LayoutStore::default();
    let page = page_id(&store);
    let a = store.add_frame(&page, FrameKind::Text, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    let second = store.add_page();
    let b = store.add_frame(&second, FrameKind::Text, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    assert!(store.connect(&a, &b));
    store.set_text_runs(&a, vec![TextRun::new("flowing text")]);

    let json = store.to_json().unwrap();
    let reloaded = LayoutStore::from_json(&json, LayoutSettings::default()).unwrap();

    assert_eq!(reloaded.frame(&a).unwrap().next_frame_id(), Some(b.as_str()));
    assert_eq!(reloaded.frame(&b).unwrap().prev_frame_id(), Some(a.as_str()));
    assert_eq!(reloaded.save(), store.save());
}

#[test]
fn test_load_rejects_duplicate_frame_ids() {
    let json = r#"{
        "version": 1,
        "pages": [{
            "id": "p1", "pageNumber": 1, "width": 612, "height": 792,
            "frames": [
                { "id": "f", "type": "unanchored", "x": 0, "y": 0, "width": 10, "height": 10 },
                { "id": "f", "type": "unanchored", "x": 5, "y": 5, "width": 10, "height": 10 }
            ]
        }]
    }"#;
    let mut store = LayoutStore::default();
    let before = store.save();
    let err = store.load_json(json).unwrap_err();
    assert!(matches!(err, LayoutError::DuplicateId { what: "frame", .. }));
    assert_eq!(store.save(), before);
}

#[test]
fn test_load_rejects_ring_of_frames() {
    let json = r#"{
        "version": 1,
        "pages": [{
            "id": "p1", "pageNumber": 1, "width": 612, "height": 792,
            "frames": [
                { "id": "a", "type": "text", "x": 0, "y": 0, "width": 10, "height": 10,
                  "columns": 1, "columnGap": 12, "nextFrameId": "b", "prevFrameId": "b" },
                { "id": "b", "type": "text", "x": 0, "y": 0, "width": 10, "height": 10,
                  "columns": 1, "columnGap": 12, "nextFrameId": "a", "prevFrameId": "a" }
            ]
        }]
    }"#;
    let mut store = LayoutStore::default();
    assert!(matches!(store.load_json(json), Err(LayoutError::Cycle(_))));
}

#[test]
fn test_load_renumbers_pages() {
    let json = r#"{
        "version": 1,
        "pages": [
            { "id": "x", "pageNumber": 7, "width": 612, "height": 792 },
            { "id": "y", "pageNumber": 3, "width": 612, "height": 792 }
        ]
    }"#;
    let mut store = LayoutStore::default();
    store.load_json(json).unwrap();
    let numbers: Vec<u32> = store.pages().iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn test_duplicate_is_unlinked_copy() {
    let mut store = LayoutStore::default();
    let page = page_id(&store);
    let a = store.add_frame(&page, FrameKind::Text, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    let b = store.add_frame(&page, FrameKind::Text, Rect::new(200.0, 0.0, 100.0, 100.0)).unwrap();
    store.connect(&a, &b);

    let copy = store.duplicate_frame(&a).unwrap();
    let frame = store.frame(&copy).unwrap();
    assert_eq!(frame.next_frame_id(), None);
    assert_eq!(frame.rect(), Rect::new(10.0, 10.0, 100.0, 100.0));
    assert_eq!(store.frame(&b).unwrap().prev_frame_id(), Some(a.as_str()));
}

#[test]
fn test_copy_paste_selects_copy() {
    let mut store = LayoutStore::default();
    let page = page_id(&store);
    let a = store.add_frame(&page, FrameKind::Graphic, Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
    assert!(!store.copy_selected());

    store.select_frame(Some(&a));
    assert!(store.copy_selected());
    let pasted = store.paste().unwrap();
    assert_ne!(pasted, a);
    assert_eq!(store.selected_frame().unwrap().id, pasted);
    assert_eq!(store.current_page().frames.len(), 2);
}

#[test]
fn test_z_order_operations() {
    let mut store = LayoutStore::default();
    let page = page_id(&store);
    let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
    let a = store.add_frame(&page, FrameKind::Unanchored, rect).unwrap();
    let b = store.add_frame(&page, FrameKind::Unanchored, rect).unwrap();
    let c = store.add_frame(&page, FrameKind::Unanchored, rect).unwrap();

    assert!(store.send_to_back(&c));
    assert_eq!(store.frame(&c).unwrap().z_index, -1);
    assert!(store.bring_to_front(&a));
    assert_eq!(store.frame(&a).unwrap().z_index, 2);
    assert!(store.send_backward(&b));
    assert_eq!(store.frame(&b).unwrap().z_index, 0);

    let order: Vec<&str> = store.current_page().paint_order().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(order, vec![c.as_str(), b.as_str(), a.as_str()]);
}

#[test]
fn test_snapping_on_add_and_move() {
    let mut store = snapping();
    let page = page_id(&store);
    let id = store.add_frame(&page, FrameKind::Text, Rect::new(12.0, 17.0, 3.0, 44.0)).unwrap();
    assert_eq!(store.frame(&id).unwrap().rect(), Rect::new(10.0, 20.0, 10.0, 40.0));

    store.move_frame(&id, -8.0, 26.0);
    assert_eq!(store.frame(&id).unwrap().rect(), Rect::new(0.0, 30.0, 10.0, 40.0));
}

#[test]
fn test_small_drawings_are_discarded() {
    let mut store = LayoutStore::default();
    store.set_tool(Tool::DrawText);
    store.pointer_down(0.0, 0.0);
    assert_eq!(store.pointer_up(20.0, 200.0), None);
    assert!(store.current_page().frames.is_empty());
    assert_eq!(store.tool(), Tool::Select);

    store.set_tool(Tool::DrawText);
    store.pointer_down(0.0, 0.0);
    assert!(store.pointer_up(21.0, 21.0).is_some());
}

#[test]
fn test_move_gesture_cancel_restores_geometry() {
    let mut store = LayoutStore::default();
    let page = page_id(&store);
    let id = store.add_frame(&page, FrameKind::Text, Rect::new(100.0, 100.0, 80.0, 60.0)).unwrap();

    store.pointer_down(140.0, 130.0);
    store.pointer_move(190.0, 150.0);
    assert_eq!(store.frame(&id).unwrap().rect(), Rect::new(150.0, 120.0, 80.0, 60.0));

    store.pointer_leave();
    assert_eq!(store.frame(&id).unwrap().rect(), Rect::new(100.0, 100.0, 80.0, 60.0));
}

#[test]
fn test_resize_from_handle() {
    let mut store = LayoutStore::default();
    let page = page_id(&store);
    let id = store.add_frame(&page, FrameKind::Text, Rect::new(100.0, 100.0, 80.0, 60.0)).unwrap();
    store.select_frame(Some(&id));

    store.pointer_down(180.0, 160.0);
    store.pointer_up(220.0, 200.0);
    assert_eq!(store.frame(&id).unwrap().rect(), Rect::new(100.0, 100.0, 120.0, 100.0));
}

#[test]
fn test_locked_frame_is_selected_but_not_dragged() {
    let mut store = LayoutStore::default();
    let page = page_id(&store);
    let id = store.add_frame(&page, FrameKind::Text, Rect::new(0.0, 0.0, 80.0, 60.0)).unwrap();
    store.set_locked(&id, true);

    store.pointer_down(40.0, 30.0);
    store.pointer_move(90.0, 90.0);
    store.pointer_up(90.0, 90.0);
    assert_eq!(store.selected_frame().unwrap().id, id);
    assert_eq!(store.frame(&id).unwrap().rect(), Rect::new(0.0, 0.0, 80.0, 60.0));
}

#[test]
fn test_remove_page_drops_cross_page_links() {
    let mut store = LayoutStore::default();
    let first = page_id(&store);
    let a = store.add_frame(&first, FrameKind::Text, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    let second = store.add_page();
    let b = store.add_frame(&second, FrameKind::Text, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    store.connect(&a, &b);

    assert!(store.remove_page(&second));
    assert_eq!(store.frame(&a).unwrap().next_frame_id(), None);
    assert!(store.frame(&b).is_none());
}

#[test]
fn test_page_switching_and_lookup() {
    let mut store = LayoutStore::default();
    let first = page_id(&store);
    let second = store.add_page();
    let frame = store.add_frame(&second, FrameKind::Text, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();

    assert!(store.set_current_page(&second));
    assert_eq!(page_id(&store), second);
    assert!(!store.set_current_page("missing"));
    assert_eq!(store.page_of(&frame).unwrap().id, second);
    assert!(store.page_of("missing").is_none());

    assert!(store.set_current_page(&first));
    assert!(store.current_page().frames.is_empty());
}

#[test]
fn test_bring_forward_and_settings_change() {
    let mut store = LayoutStore::default();
    let page = page_id(&store);
    let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
    let a = store.add_frame(&page, FrameKind::Unanchored, rect).unwrap();
    let b = store.add_frame(&page, FrameKind::Unanchored, rect).unwrap();

    assert!(store.bring_forward(&a));
    assert_eq!(store.frame(&a).unwrap().z_index, 1);
    assert_eq!(store.frame(&b).unwrap().z_index, 1);

    let revision = store.revision();
    store.set_settings(LayoutSettings {
        snap_to_grid: true,
        ..LayoutSettings::default()
    });
    assert!(store.revision() > revision);
    assert!(store.move_frame(&a, 23.0, 48.0));
    let moved = store.frame(&a).unwrap();
    assert_eq!((moved.x, moved.y), (20.0, 50.0));
}

#[test]
fn test_rotated_frame_is_hit_where_painted() {
    let mut store = LayoutStore::default();
    let page = page_id(&store);
    let id = store.add_frame(&page, FrameKind::Graphic, Rect::new(100.0, 100.0, 100.0, 20.0)).unwrap();
    assert!(store.rotate_frame(&id, 90.0));
    store.select_frame(None);

    // Inside the unrotated box, outside the painted one
    store.pointer_down(190.0, 110.0);
    store.pointer_up(190.0, 110.0);
    assert!(store.selected_frame().is_none());

    store.pointer_down(150.0, 150.0);
    assert_eq!(store.selected_frame().map(|f| f.id.clone()), Some(id.clone()));
    store.pointer_leave();
    assert_eq!(store.frame(&id).unwrap().rect(), Rect::new(100.0, 100.0, 100.0, 20.0));
}
