//! Components: props in, `Element` tree out

pub mod app;
pub mod data_table;
pub mod preview;

pub use app::{App, AppProps};
pub use data_table::{DataTable, DataTableMsg, DataTableProps, DataTableState};
pub use preview::{preview_frame, PreviewFrame, ReportPreview, ReportPreviewProps};
