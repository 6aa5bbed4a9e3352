//! Generic paginated, filterable, sortable data table
//!
//! Column descriptors turn records into `TableRow`s; `TableModel` holds the
//! view state and produces a `TableView` per frame. Server-driven tables hand
//! `ListQuery` navigations back to the caller, client-driven tables do all
//! the work in memory.

pub mod column;
pub mod filter;
pub mod model;
pub mod pagination;
pub mod query;
pub mod sort;
pub mod timing;

pub use column::{
    column_metas, extract_rows, Alignment, CellValue, ColumnDef, ColumnMeta, FilterVariant, Pin,
    TableRow,
};
pub use filter::{ColumnFilter, ColumnFilterState, RangeSide};
pub use model::{
    select_options, TableCommand, TableMode, TableModel, TableTiming, TableView, ViewColumn,
    ViewRow, EMPTY_MESSAGE,
};
pub use pagination::{PageSize, PaginationControls};
pub use query::{ListQuery, DEFAULT_PAGE_SIZE};
pub use sort::{next_sort, SortBy, SortDirection};
pub use timing::{Debounced, LoadingWindow};
