//! Printable report documents
//!
//! - `columns`: list-view columns per report kind
//! - `layout`: page splitting and location grouping
//! - `stamp`: stamp offset clamping and the drag state machine
//! - `document`: per-kind print model built from a record
//! - `render`: plain-text pages

pub mod columns;
pub mod document;
pub mod layout;
pub mod render;
pub mod stamp;

pub use columns::{list_columns, record_key};
pub use document::{PrintCell, PrintColumn, PrintPage, PrintRow, ReportDocument};
pub use layout::{annotate, group_page, paginate, split_pages, GroupedRow, PageCapacity, PageChunk};
pub use render::render_text;
pub use stamp::{clamp_offset, DragOutcome, PointerEvent, StampDrag};
