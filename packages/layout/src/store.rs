//! # Layout Store
//!
//! Owns every page and frame plus the interactive state around them
//! (selection, active tool, viewport, clipboard).
//!
//! ## Design
//!
//! ```text
//! caller ──► LayoutStore::op(..) ──► guard (exists? locked? kind?) ──► mutate ──► revision += 1
//!                                        │
//!                                        └─ rejected: return false / None, state untouched
//! ```
//!
//! Text frame chains are doubly linked through `nextFrameId`/`prevFrameId`.
//! Only `connect`, `disconnect` and the removal paths touch those fields, and
//! each writes both halves, so `a.next == b` holds exactly when
//! `b.prev == a`.

use std::collections::HashSet;

use folio_model::{IDGenerator, TextRun};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LayoutError, LayoutResult};
use crate::frame::{Frame, FrameContent, FrameKind, GraphicFrame, TableFrame, TextFrame, UnanchoredFrame};
use crate::geometry::{snap_rect, Rect};
use crate::page::Page;
use crate::settings::LayoutSettings;
use crate::tool::{Gesture, Tool};

/// Current persisted layout format
pub const LAYOUT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPayload {
    pub version: u32,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutStore {
    pages: Vec<Page>,
    current_page: usize,
    selected: Option<String>,
    pub(crate) tool: Tool,
    pub(crate) gesture: Gesture,
    pub(crate) viewport: Viewport,
    settings: LayoutSettings,
    clipboard: Option<Frame>,
    ids: IDGenerator,
    revision: u64,
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

impl LayoutStore {
    /// Store with a single empty page sized from the settings
    pub fn new(settings: LayoutSettings) -> Self {
        let mut ids = IDGenerator::new("layout");
        let first = Page::new(ids.new_id(), 1, settings.page_width, settings.page_height);
        Self {
            pages: vec![first],
            current_page: 0,
            selected: None,
            tool: Tool::Select,
            gesture: Gesture::Idle,
            viewport: Viewport::default(),
            settings,
            clipboard: None,
            ids,
            revision: 0,
        }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: LayoutSettings) {
        self.settings = settings;
        self.bump();
    }

    /// Bumped by every accepted mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn grid(&self) -> Option<f64> {
        self.settings.snap_to_grid.then_some(self.settings.grid_size)
    }

    // ---------------------------------------------------------------------
    // Pages
    // ---------------------------------------------------------------------

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn add_page(&mut self) -> String {
        let id = self.ids.new_id();
        let number = self.pages.len() as u32 + 1;
        self.pages.push(Page::new(
            id.clone(),
            number,
            self.settings.page_width,
            self.settings.page_height,
        ));
        debug!(page_id = %id, page_number = number, "Added page");
        self.bump();
        id
    }

    /// Remove a page and its frames. The last remaining page is kept.
    pub fn remove_page(&mut self, page_id: &str) -> bool {
        if self.pages.len() <= 1 {
            return false;
        }
        let Some(index) = self.pages.iter().position(|p| p.id == page_id) else {
            return false;
        };

        let frame_ids: Vec<String> = self.pages[index].frames.iter().map(|f| f.id.clone()).collect();
        for id in &frame_ids {
            self.unlink(id);
        }
        if self.selected.as_ref().is_some_and(|s| frame_ids.contains(s)) {
            self.selected = None;
        }

        self.pages.remove(index);
        self.renumber();
        if self.current_page >= self.pages.len() || self.current_page > index {
            self.current_page = self.current_page.saturating_sub(1).min(self.pages.len() - 1);
        }
        debug!(page_id = %page_id, remaining = self.pages.len(), "Removed page");
        self.bump();
        true
    }

    pub fn set_current_page(&mut self, page_id: &str) -> bool {
        let Some(index) = self.pages.iter().position(|p| p.id == page_id) else {
            return false;
        };
        if index != self.current_page {
            self.cancel_gesture();
            self.current_page = index;
            self.bump();
        }
        true
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current_page]
    }

    fn renumber(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.page_number = i as u32 + 1;
        }
    }

    // ---------------------------------------------------------------------
    // Frames
    // ---------------------------------------------------------------------

    fn locate(&self, frame_id: &str) -> Option<(usize, usize)> {
        self.pages.iter().enumerate().find_map(|(p, page)| {
            page.frames
                .iter()
                .position(|f| f.id == frame_id)
                .map(|f| (p, f))
        })
    }

    pub fn frame(&self, frame_id: &str) -> Option<&Frame> {
        let (p, f) = self.locate(frame_id)?;
        Some(&self.pages[p].frames[f])
    }

    fn frame_mut(&mut self, frame_id: &str) -> Option<&mut Frame> {
        let (p, f) = self.locate(frame_id)?;
        Some(&mut self.pages[p].frames[f])
    }

    /// Page holding the frame
    pub fn page_of(&self, frame_id: &str) -> Option<&Page> {
        let (p, _) = self.locate(frame_id)?;
        Some(&self.pages[p])
    }

    pub fn add_frame(&mut self, page_id: &str, kind: FrameKind, rect: Rect) -> Option<String> {
        let grid = self.grid();
        let index = self.pages.iter().position(|p| p.id == page_id)?;
        let id = self.ids.new_id();

        let mut frame = Frame::new(id.clone(), kind, snap_rect(rect, grid));
        let page = &mut self.pages[index];
        frame.z_index = page.max_z().map_or(0, |z| z.saturating_add(1));
        page.frames.push(frame);

        debug!(frame_id = %id, page_id = %page_id, kind = ?kind, "Added frame");
        self.bump();
        Some(id)
    }

    pub fn remove_frame(&mut self, frame_id: &str) -> bool {
        let Some((p, _)) = self.locate(frame_id) else {
            return false;
        };
        self.unlink(frame_id);
        self.pages[p].frames.retain(|f| f.id != frame_id);
        if self.selected.as_deref() == Some(frame_id) {
            self.selected = None;
        }
        if self.gesture.frame_id() == Some(frame_id) {
            self.gesture = Gesture::Idle;
        }
        debug!(frame_id = %frame_id, "Removed frame");
        self.bump();
        true
    }

    pub fn select_frame(&mut self, frame_id: Option<&str>) -> bool {
        if let Some(id) = frame_id {
            if self.locate(id).is_none() {
                return false;
            }
        }
        self.selected = frame_id.map(str::to_string);
        self.bump();
        true
    }

    pub fn selected_frame(&self) -> Option<&Frame> {
        self.selected.as_deref().and_then(|id| self.frame(id))
    }

    pub fn set_locked(&mut self, frame_id: &str, locked: bool) -> bool {
        self.edit_frame(frame_id, |frame| {
            frame.locked = locked;
            true
        })
    }

    pub fn set_visible(&mut self, frame_id: &str, visible: bool) -> bool {
        self.edit_frame(frame_id, |frame| {
            frame.visible = visible;
            true
        })
    }

    pub fn rename_frame(&mut self, frame_id: &str, name: impl Into<String>) -> bool {
        let name = name.into();
        self.edit_frame(frame_id, |frame| {
            frame.name = name;
            true
        })
    }

    pub fn set_text_runs(&mut self, frame_id: &str, runs: Vec<TextRun>) -> bool {
        self.update_text(frame_id, |text| text.runs = runs)
    }

    /// Zero columns are refused
    pub fn set_columns(&mut self, frame_id: &str, columns: u32, gap: f64) -> bool {
        if columns == 0 || gap < 0.0 {
            return false;
        }
        self.update_text(frame_id, |text| {
            text.columns = columns;
            text.column_gap = gap;
        })
    }

    pub fn update_text(&mut self, frame_id: &str, update: impl FnOnce(&mut TextFrame)) -> bool {
        self.edit_frame(frame_id, |frame| match &mut frame.content {
            FrameContent::Text(text) => {
                update(text);
                true
            }
            _ => false,
        })
    }

    pub fn update_graphic(&mut self, frame_id: &str, update: impl FnOnce(&mut GraphicFrame)) -> bool {
        self.edit_frame(frame_id, |frame| match &mut frame.content {
            FrameContent::Graphic(graphic) => {
                update(graphic);
                true
            }
            _ => false,
        })
    }

    pub fn update_table(&mut self, frame_id: &str, update: impl FnOnce(&mut TableFrame)) -> bool {
        self.edit_frame(frame_id, |frame| match &mut frame.content {
            FrameContent::Table(table) => {
                update(table);
                true
            }
            _ => false,
        })
    }

    pub fn update_unanchored(&mut self, frame_id: &str, update: impl FnOnce(&mut UnanchoredFrame)) -> bool {
        self.edit_frame(frame_id, |frame| match &mut frame.content {
            FrameContent::Unanchored(boxed) => {
                update(boxed);
                true
            }
            _ => false,
        })
    }

    /// Record whether the last flow pass overflowed this text frame
    pub fn set_overflow(&mut self, frame_id: &str, overflow: bool) -> bool {
        let changed = match self.frame_mut(frame_id).and_then(Frame::as_text_mut) {
            Some(text) if text.overflow != overflow => {
                text.overflow = overflow;
                true
            }
            Some(_) => return true,
            None => return false,
        };
        if changed {
            self.bump();
        }
        true
    }

    fn edit_frame(&mut self, frame_id: &str, edit: impl FnOnce(&mut Frame) -> bool) -> bool {
        let Some(frame) = self.frame_mut(frame_id) else {
            return false;
        };
        if !edit(frame) {
            return false;
        }
        self.bump();
        true
    }

    /// Copy a frame onto its own page, on top, without chain links
    pub fn duplicate_frame(&mut self, frame_id: &str) -> Option<String> {
        let (p, f) = self.locate(frame_id)?;
        let id = self.ids.new_id();
        let mut copy = self.pages[p].frames[f].duplicate(id.clone());
        copy.z_index = self.pages[p].max_z().map_or(0, |z| z.saturating_add(1));
        self.pages[p].frames.push(copy);
        debug!(frame_id = %frame_id, copy_id = %id, "Duplicated frame");
        self.bump();
        Some(id)
    }

    pub fn copy_selected(&mut self) -> bool {
        let Some(frame) = self.selected_frame().cloned() else {
            return false;
        };
        self.clipboard = Some(frame);
        true
    }

    /// Paste the clipboard onto the current page and select the copy
    pub fn paste(&mut self) -> Option<String> {
        let source = self.clipboard.clone()?;
        let id = self.ids.new_id();
        let mut copy = source.duplicate(id.clone());
        let page = &mut self.pages[self.current_page];
        copy.z_index = page.max_z().map_or(0, |z| z.saturating_add(1));
        page.frames.push(copy);
        self.selected = Some(id.clone());
        self.bump();
        Some(id)
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    pub fn move_frame(&mut self, frame_id: &str, x: f64, y: f64) -> bool {
        let Some(frame) = self.frame(frame_id) else {
            return false;
        };
        let rect = Rect { x, y, ..frame.rect() };
        self.set_frame_rect(frame_id, rect)
    }

    pub fn resize_frame(&mut self, frame_id: &str, width: f64, height: f64) -> bool {
        let Some(frame) = self.frame(frame_id) else {
            return false;
        };
        let rect = Rect {
            width,
            height,
            ..frame.rect()
        };
        self.set_frame_rect(frame_id, rect)
    }

    /// Rotation in degrees, kept in `[0, 360)`
    pub fn rotate_frame(&mut self, frame_id: &str, degrees: f64) -> bool {
        let Some(frame) = self.frame_mut(frame_id) else {
            return false;
        };
        if frame.locked || !degrees.is_finite() {
            return false;
        }
        frame.rotation = degrees.rem_euclid(360.0);
        self.bump();
        true
    }

    /// Snapped placement; locked frames refuse
    pub(crate) fn set_frame_rect(&mut self, frame_id: &str, rect: Rect) -> bool {
        let grid = self.grid();
        let Some(frame) = self.frame_mut(frame_id) else {
            return false;
        };
        if frame.locked {
            debug!(frame_id = %frame_id, "Ignoring geometry change on locked frame");
            return false;
        }
        frame.set_rect(snap_rect(rect, grid));
        self.bump();
        true
    }

    /// Unsnapped placement used to roll back a cancelled gesture
    pub(crate) fn restore_frame_rect(&mut self, frame_id: &str, rect: Rect) {
        if let Some(frame) = self.frame_mut(frame_id) {
            frame.set_rect(rect);
            self.bump();
        }
    }

    // ---------------------------------------------------------------------
    // Text frame chains
    // ---------------------------------------------------------------------

    /// Link `source → target`. Both must be distinct text frames, the source
    /// without a successor, the target without a predecessor, and the new
    /// link must not close a loop.
    pub fn connect(&mut self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        let (Some(src), Some(dst)) = (
            self.frame(source).and_then(Frame::as_text),
            self.frame(target).and_then(Frame::as_text),
        ) else {
            return false;
        };
        if src.next_frame_id.is_some() || dst.prev_frame_id.is_some() {
            return false;
        }
        if self.chain_from(target).iter().any(|f| f.id == source) {
            debug!(source = %source, target = %target, "Refusing link that closes a loop");
            return false;
        }

        if let Some(text) = self.frame_mut(source).and_then(Frame::as_text_mut) {
            text.next_frame_id = Some(target.to_string());
        }
        if let Some(text) = self.frame_mut(target).and_then(Frame::as_text_mut) {
            text.prev_frame_id = Some(source.to_string());
        }
        debug!(source = %source, target = %target, "Linked text frames");
        self.bump();
        true
    }

    /// Drop both links of a frame, repairing the neighbours' halves
    pub fn disconnect(&mut self, frame_id: &str) -> bool {
        if self.frame(frame_id).and_then(Frame::as_text).is_none() {
            return false;
        }
        self.unlink(frame_id);
        self.bump();
        true
    }

    fn unlink(&mut self, frame_id: &str) {
        let Some(text) = self.frame_mut(frame_id).and_then(Frame::as_text_mut) else {
            return;
        };
        let next = text.next_frame_id.take();
        let prev = text.prev_frame_id.take();

        if let Some(next) = next {
            if let Some(neighbour) = self.frame_mut(&next).and_then(Frame::as_text_mut) {
                neighbour.prev_frame_id = None;
            }
        }
        if let Some(prev) = prev {
            if let Some(neighbour) = self.frame_mut(&prev).and_then(Frame::as_text_mut) {
                neighbour.next_frame_id = None;
            }
        }
    }

    /// Frames reachable from `head` by following next links, head first
    pub fn chain_from(&self, head: &str) -> Vec<&Frame> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = self.frame(head);
        while let Some(frame) = cursor {
            if !seen.insert(frame.id.as_str()) {
                break;
            }
            chain.push(frame);
            cursor = frame.next_frame_id().and_then(|id| self.frame(id));
        }
        chain
    }

    /// Text frames with no predecessor, in page then creation order
    pub fn chain_heads(&self) -> Vec<&Frame> {
        self.pages
            .iter()
            .flat_map(|page| page.frames.iter())
            .filter(|frame| frame.as_text().is_some_and(|t| t.prev_frame_id.is_none()))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Z-order
    // ---------------------------------------------------------------------

    pub fn bring_to_front(&mut self, frame_id: &str) -> bool {
        self.restack(frame_id, |page, _| page.max_z().unwrap_or(0).saturating_add(1))
    }

    pub fn send_to_back(&mut self, frame_id: &str) -> bool {
        self.restack(frame_id, |page, _| page.min_z().unwrap_or(0).saturating_sub(1))
    }

    pub fn bring_forward(&mut self, frame_id: &str) -> bool {
        self.restack(frame_id, |_, z| z.saturating_add(1))
    }

    pub fn send_backward(&mut self, frame_id: &str) -> bool {
        self.restack(frame_id, |_, z| z.saturating_sub(1))
    }

    fn restack(&mut self, frame_id: &str, next_z: impl FnOnce(&Page, i32) -> i32) -> bool {
        let Some((p, f)) = self.locate(frame_id) else {
            return false;
        };
        let page = &mut self.pages[p];
        let z = next_z(page, page.frames[f].z_index);
        page.frames[f].z_index = z;
        debug!(frame_id = %frame_id, z_index = z, "Restacked frame");
        self.bump();
        true
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    pub fn save(&self) -> LayoutPayload {
        LayoutPayload {
            version: LAYOUT_VERSION,
            pages: self.pages.clone(),
        }
    }

    pub fn to_json(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string_pretty(&self.save())?)
    }

    /// Replace the layout. On error nothing changes.
    pub fn load(&mut self, payload: LayoutPayload) -> LayoutResult<()> {
        if let Err(e) = check_payload(&payload) {
            warn!(error = %e, "Rejected layout payload");
            return Err(e);
        }

        let mut pages = payload.pages;
        for (i, page) in pages.iter_mut().enumerate() {
            page.page_number = i as u32 + 1;
            self.ids.observe(&page.id);
            for frame in &page.frames {
                self.ids.observe(&frame.id);
            }
        }

        self.pages = pages;
        self.current_page = 0;
        self.selected = None;
        self.gesture = Gesture::Idle;
        self.bump();
        debug!(pages = self.pages.len(), "Loaded layout");
        Ok(())
    }

    pub fn load_json(&mut self, json: &str) -> LayoutResult<()> {
        let payload: LayoutPayload = serde_json::from_str(json)?;
        self.load(payload)
    }

    pub fn from_json(json: &str, settings: LayoutSettings) -> LayoutResult<Self> {
        let mut store = Self::new(settings);
        store.load_json(json)?;
        Ok(store)
    }
}

fn check_payload(payload: &LayoutPayload) -> LayoutResult<()> {
    if payload.version > LAYOUT_VERSION {
        return Err(LayoutError::Version(payload.version));
    }
    if payload.pages.is_empty() {
        return Err(LayoutError::NoPages);
    }

    let mut page_ids = HashSet::new();
    for page in &payload.pages {
        if !page_ids.insert(page.id.as_str()) {
            return Err(LayoutError::DuplicateId {
                what: "page",
                id: page.id.clone(),
            });
        }
    }

    let frames: Vec<&Frame> = payload.pages.iter().flat_map(|p| p.frames.iter()).collect();
    let mut frame_ids = HashSet::new();
    for frame in &frames {
        if !frame_ids.insert(frame.id.as_str()) {
            return Err(LayoutError::DuplicateId {
                what: "frame",
                id: frame.id.clone(),
            });
        }
    }

    let text = |id: &str| {
        frames
            .iter()
            .find(|f| f.id == id)
            .and_then(|f| f.as_text())
    };

    for frame in &frames {
        if let Some(next) = frame.next_frame_id() {
            let target = text(next).ok_or_else(|| LayoutError::DanglingLink {
                from: frame.id.clone(),
                to: next.to_string(),
            })?;
            if target.prev_frame_id() != Some(frame.id.as_str()) {
                return Err(LayoutError::AsymmetricLink {
                    from: frame.id.clone(),
                    to: next.to_string(),
                });
            }
        }
        if let Some(prev) = frame.prev_frame_id() {
            let source = text(prev).ok_or_else(|| LayoutError::DanglingLink {
                from: frame.id.clone(),
                to: prev.to_string(),
            })?;
            if source.next_frame_id() != Some(frame.id.as_str()) {
                return Err(LayoutError::AsymmetricLink {
                    from: prev.to_string(),
                    to: frame.id.clone(),
                });
            }
        }
    }

    // Symmetric links with no head form closed rings.
    for frame in &frames {
        let mut seen = HashSet::new();
        let mut cursor = Some(frame.id.as_str());
        while let Some(id) = cursor {
            if !seen.insert(id) {
                return Err(LayoutError::Cycle(frame.id.clone()));
            }
            cursor = text(id).and_then(TextFrame::next_frame_id);
        }
    }
    Ok(())
}
