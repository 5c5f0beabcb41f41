//! # Folio Render
//!
//! Turns a [`folio_layout::LayoutStore`] (optionally paired with a
//! [`folio_editor::Document`]) into per-page display lists.
//!
//! ## Architecture
//!
//! ```text
//! TextFrame runs ─┐
//!                 ├─► content ──► flow (chains, columns) ──┐
//! Document ───────┘                                        ├─► renderer ──► RenderOutput
//! Page frames (z-order) ───────────────────────────────────┘
//! ```
//!
//! Measurement and asset lookup sit behind the [`TextMeasurer`] and
//! [`AssetResolver`] traits so callers can plug in real font metrics and
//! image loading.
//!
//! ## Example
//!
//! ```
//! use folio_layout::{FrameKind, LayoutStore, Rect};
//! use folio_model::TextRun;
//! use folio_render::{MonospaceMeasurer, NoAssets, Renderer};
//!
//! let mut store = LayoutStore::default();
//! let page = store.current_page().id.clone();
//! let frame = store.add_frame(&page, FrameKind::Text, Rect::new(0.0, 0.0, 200.0, 100.0)).unwrap();
//! store.set_text_runs(&frame, vec![TextRun::new("Hello frames")]);
//!
//! let measurer = MonospaceMeasurer::default();
//! let output = Renderer::new(&measurer, &NoAssets).paginate(&mut store, None);
//! assert_eq!(output.pages[0].text(), vec!["Hello frames"]);
//! assert!(output.overflowed.is_empty());
//! ```

pub mod content;
pub mod flow;
pub mod measure;
pub mod paint;
pub mod renderer;

pub use content::{from_document, from_runs, from_text, FlowItem, Piece, Word};
pub use flow::{column_rects, flow_box, flow_chain, ChainLayout, Fragment, FrameLines, Line};
pub use measure::{AssetResolver, FontSpec, MonospaceMeasurer, NoAssets, ResolvedAsset, TextMeasurer};
pub use paint::{PaintOp, RasterPage, RenderOutput};
pub use renderer::Renderer;
