//! Leaf widgets rendered by `Element::Widget`

pub mod data_table;
pub mod report_page;
pub mod status_bar;
pub mod tab_bar;

#[cfg(test)]
pub mod testing;

pub use data_table::DataTableWidget;
pub use report_page::{pointer_points, ReportPageWidget, PAGE_MARGIN};
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
