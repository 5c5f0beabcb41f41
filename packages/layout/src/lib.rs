//! # Folio Layout
//!
//! Pages, frames and the interactive placement tool.
//!
//! A [`LayoutStore`] owns the page collection. Frames are positioned boxes on
//! a page: text frames hold runs (or flow the document) and may be linked
//! into chains, graphic frames reference an image, table frames carry an
//! explicit cell grid and unanchored frames are plain decorated boxes.
//!
//! All mutations go through the store so that link symmetry, grid snapping
//! and locking hold at every observation point. Rejected operations are
//! silent no-ops that return `false` or `None`.

pub mod error;
pub mod frame;
pub mod geometry;
pub mod page;
pub mod settings;
pub mod store;
pub mod tool;

pub use error::{LayoutError, LayoutResult};
pub use frame::{
    Border, FitMode, Frame, FrameContent, FrameKind, GraphicFrame, Insets, TableCellSpec, TableFrame, TextFrame,
    UnanchoredFrame,
};
pub use geometry::{rotate_point, snap, Rect};
pub use page::Page;
pub use settings::LayoutSettings;
pub use store::{LayoutPayload, LayoutStore, Viewport, LAYOUT_VERSION};
pub use tool::{Gesture, Handle, Tool, MIN_DRAW_SIZE};
