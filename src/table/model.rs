/// Generic data table state
///
/// A `TableModel` owns one table's rows plus all of its view state (sort,
/// filters, pagination, pins, visibility, expansion, focus). The data
/// strategy is chosen once at construction:
///
/// - `ServerPaged`: the `ListQuery` (from the URL / navigation state) is
///   authoritative. Sort, search and page changes are returned as
///   `TableCommand::Navigate` for the caller to fetch; rows are shown as
///   delivered.
/// - `ClientPaged`: the full row set is in memory and filtered, sorted and
///   sliced locally.
///
/// All operations are pure over explicit `Instant`s; `tick` advances the
/// debouncers and the loading window.
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::column::{CellValue, ColumnMeta, FilterVariant, Pin, TableRow};
use super::filter::{row_matches_columns, row_matches_global, ColumnFilter, ColumnFilterState};
use super::pagination::{page_count, rescale_page_index, PageSize, PaginationControls};
use super::query::ListQuery;
use super::sort::{next_sort, sort_indices, SortBy, SortDirection};
use super::timing::{Debounced, LoadingWindow, DEFAULT_DEBOUNCE, DEFAULT_MIN_LOADING};
use super::Alignment;

pub const EMPTY_MESSAGE: &str = "No results.";

/// What the caller has to do after a table operation
#[derive(Debug, Clone, PartialEq)]
pub enum TableCommand {
    /// Handled inside the model
    Local,
    /// Server-driven table wants this query fetched and made authoritative
    Navigate(ListQuery),
}

#[derive(Debug, Clone)]
pub struct ServerPaging {
    pub query: ListQuery,
    pub total_pages: usize,
    pub total_elements: usize,
    /// Text in the search box; becomes `query.query` once navigated
    pub search_input: String,
}

#[derive(Debug, Clone)]
pub struct ClientPaging {
    pub sort: Option<SortBy>,
    pub global: Debounced<String>,
    pub page_index: usize,
    pub page_size: PageSize,
}

#[derive(Debug, Clone)]
pub enum TableMode {
    ServerPaged(ServerPaging),
    ClientPaged(ClientPaging),
}

/// Delays used by the model
#[derive(Debug, Clone, Copy)]
pub struct TableTiming {
    pub debounce: Duration,
    pub min_loading: Duration,
}

impl Default for TableTiming {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_loading: DEFAULT_MIN_LOADING,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableModel {
    columns: Vec<ColumnMeta>,
    rows: Vec<TableRow>,
    mode: TableMode,
    hidden: HashSet<String>,
    pins: HashMap<String, Pin>,
    expanded: HashSet<String>,
    column_filters: HashMap<String, ColumnFilterState>,
    show_filters: bool,
    loading_window: LoadingWindow,
    timing: TableTiming,
    focused_row: usize,
    focused_column: usize,
}

/// One visible column, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct ViewColumn {
    pub id: String,
    pub header: String,
    pub width: usize,
    pub align: Alignment,
    pub pin: Option<Pin>,
    pub sort: Option<SortDirection>,
    /// Filter row text (pending input included)
    pub filter: String,
    pub filter_pending: bool,
}

/// One visible row; cells follow the `ViewColumn` order
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub key: String,
    pub cells: Vec<CellValue>,
    pub expandable: bool,
    /// Content of the full-width row under this one, when expanded
    pub expanded: Option<String>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<ViewColumn>,
    pub rows: Vec<ViewRow>,
    pub skeleton: bool,
    pub empty: bool,
    pub error: Option<String>,
    pub search_text: String,
    pub search_pending: bool,
    pub show_filters: bool,
    pub controls: PaginationControls,
    pub page_size: usize,
    pub focused_row: usize,
    pub focused_column: usize,
}

impl TableModel {
    /// Server-driven table starting from `query`
    pub fn server(columns: Vec<ColumnMeta>, query: ListQuery) -> Self {
        let search_input = query.query.clone().unwrap_or_default();
        Self::with_mode(
            columns,
            TableMode::ServerPaged(ServerPaging {
                query,
                total_pages: 0,
                total_elements: 0,
                search_input,
            }),
            TableTiming::default(),
        )
    }

    /// Client-driven table over an in-memory row set
    pub fn client(columns: Vec<ColumnMeta>, page_size: PageSize) -> Self {
        let timing = TableTiming::default();
        Self::with_mode(
            columns,
            TableMode::ClientPaged(ClientPaging {
                sort: None,
                global: Debounced::new(String::new(), timing.debounce),
                page_index: 0,
                page_size,
            }),
            timing,
        )
    }

    fn with_mode(columns: Vec<ColumnMeta>, mode: TableMode, timing: TableTiming) -> Self {
        let column_filters = columns
            .iter()
            .map(|c| {
                (
                    c.id.clone(),
                    ColumnFilterState::for_variant(&c.filter, timing.debounce),
                )
            })
            .collect();
        Self {
            columns,
            rows: Vec::new(),
            mode,
            hidden: HashSet::new(),
            pins: HashMap::new(),
            expanded: HashSet::new(),
            column_filters,
            show_filters: false,
            loading_window: LoadingWindow::new(timing.min_loading),
            timing,
            focused_row: 0,
            focused_column: 0,
        }
    }

    /// Replace the debounce and loading delays
    pub fn with_timing(mut self, timing: TableTiming) -> Self {
        self.timing = timing;
        self.loading_window = LoadingWindow::new(timing.min_loading);
        if let TableMode::ClientPaged(client) = &mut self.mode {
            client.global = Debounced::new(client.global.applied().clone(), timing.debounce);
        }
        for column in &self.columns {
            self.column_filters.insert(
                column.id.clone(),
                ColumnFilterState::for_variant(&column.filter, timing.debounce),
            );
        }
        self
    }

    pub fn mode(&self) -> &TableMode {
        &self.mode
    }

    pub fn is_server_paged(&self) -> bool {
        matches!(self.mode, TableMode::ServerPaged(_))
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Query a server-driven table is showing
    pub fn query(&self) -> Option<&ListQuery> {
        match &self.mode {
            TableMode::ServerPaged(server) => Some(&server.query),
            TableMode::ClientPaged(_) => None,
        }
    }

    // Lifecycle

    pub fn mount(&mut self, now: Instant) {
        self.loading_window.start(now);
    }

    /// Cancel every pending timer
    pub fn unmount(&mut self) {
        self.loading_window.cancel();
        if let TableMode::ClientPaged(client) = &mut self.mode {
            client.global.cancel();
        }
        for state in self.column_filters.values_mut() {
            state.cancel();
        }
    }

    /// Advance debouncers and the loading window
    ///
    /// Returns true when anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut filters_changed = false;
        if let TableMode::ClientPaged(client) = &mut self.mode {
            filters_changed |= client.global.poll(now);
        }
        for state in self.column_filters.values_mut() {
            filters_changed |= state.poll(now);
        }
        if filters_changed {
            trace!("TABLE: debounced filter applied");
            self.reset_client_page();
        }
        let window_closed = self.loading_window.poll(now);
        filters_changed || window_closed
    }

    pub fn is_loading_window_active(&self, now: Instant) -> bool {
        self.loading_window.is_active(now)
    }

    // Data

    /// Replace the in-memory rows (client mode, or a server page)
    pub fn set_rows(&mut self, rows: Vec<TableRow>) {
        let keys: HashSet<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        self.expanded.retain(|key| keys.contains(key.as_str()));
        self.rows = rows;
        self.clamp_client_page();
        self.clamp_focus();
    }

    /// Rows and metadata of one server page
    pub fn set_server_page(&mut self, rows: Vec<TableRow>, total_pages: usize, total_elements: usize) {
        if let TableMode::ServerPaged(server) = &mut self.mode {
            server.total_pages = total_pages;
            server.total_elements = total_elements;
        }
        self.set_rows(rows);
    }

    /// Adopt `query` as the authoritative server query
    pub fn sync_query(&mut self, query: ListQuery) {
        if let TableMode::ServerPaged(server) = &mut self.mode {
            if server.query != query {
                debug!("TABLE: sync query {}", query.to_query_string());
            }
            server.search_input = query.query.clone().unwrap_or_default();
            server.query = query;
        }
    }

    // Sorting

    pub fn toggle_sort(&mut self, column: &str) -> TableCommand {
        if !self.columns.iter().any(|c| c.id == column && c.sortable) {
            return TableCommand::Local;
        }
        match &mut self.mode {
            TableMode::ServerPaged(server) => {
                let next = next_sort(server.query.sort_by.as_ref(), column);
                TableCommand::Navigate(server.query.with_sort(next))
            }
            TableMode::ClientPaged(client) => {
                client.sort = next_sort(client.sort.as_ref(), column);
                TableCommand::Local
            }
        }
    }

    pub fn sort(&self) -> Option<&SortBy> {
        match &self.mode {
            TableMode::ServerPaged(server) => server.query.sort_by.as_ref(),
            TableMode::ClientPaged(client) => client.sort.as_ref(),
        }
    }

    // Filtering

    /// Free-text search input
    pub fn input_global(&mut self, text: &str, now: Instant) -> TableCommand {
        match &mut self.mode {
            TableMode::ServerPaged(server) => {
                server.search_input = text.to_string();
                TableCommand::Navigate(server.query.with_search(text))
            }
            TableMode::ClientPaged(client) => {
                if !client.global.is_pending() && text != client.global.applied() {
                    self.loading_window.start(now);
                }
                client.global.input(text.to_string(), now);
                TableCommand::Local
            }
        }
    }

    pub fn search_text(&self) -> &str {
        match &self.mode {
            TableMode::ServerPaged(server) => &server.search_input,
            TableMode::ClientPaged(client) => client.global.current(),
        }
    }

    /// Column filter input; server-driven tables do not filter by column
    pub fn set_column_filter(&mut self, column: &str, input: &str, now: Instant) -> TableCommand {
        if self.is_server_paged() {
            return TableCommand::Local;
        }
        if let Some(state) = self.column_filters.get_mut(column) {
            if state.input(input, now) {
                self.reset_client_page();
            }
        }
        TableCommand::Local
    }

    pub fn column_filter(&self, column: &str) -> Option<&ColumnFilterState> {
        self.column_filters.get(column)
    }

    pub fn toggle_filter_row(&mut self) {
        self.show_filters = !self.show_filters;
    }

    pub fn show_filters(&self) -> bool {
        self.show_filters
    }

    // Pagination

    pub fn first_page(&mut self) -> TableCommand {
        self.go_to_page(|_, _| 0)
    }

    pub fn prev_page(&mut self) -> TableCommand {
        self.go_to_page(|current, _| current.saturating_sub(1))
    }

    pub fn next_page(&mut self) -> TableCommand {
        self.go_to_page(|current, count| (current + 1).min(count.saturating_sub(1)))
    }

    pub fn last_page(&mut self) -> TableCommand {
        self.go_to_page(|_, count| count.saturating_sub(1))
    }

    fn go_to_page<F>(&mut self, target: F) -> TableCommand
    where
        F: Fn(usize, usize) -> usize,
    {
        let controls = self.controls();
        let page = target(controls.page_index, controls.page_count);
        if page == controls.page_index {
            return TableCommand::Local;
        }
        self.focused_row = 0;
        match &mut self.mode {
            TableMode::ServerPaged(server) => TableCommand::Navigate(server.query.with_page(page)),
            TableMode::ClientPaged(client) => {
                client.page_index = page;
                TableCommand::Local
            }
        }
    }

    pub fn page_size(&self) -> usize {
        match &self.mode {
            TableMode::ServerPaged(server) => server.query.size,
            TableMode::ClientPaged(client) => client.page_size.value(),
        }
    }

    pub fn set_page_size(&mut self, size: PageSize) -> TableCommand {
        match &mut self.mode {
            TableMode::ServerPaged(server) => {
                if server.query.size == size.value() {
                    return TableCommand::Local;
                }
                TableCommand::Navigate(ListQuery {
                    page: 0,
                    size: size.value(),
                    ..server.query.clone()
                })
            }
            TableMode::ClientPaged(client) => {
                client.page_index =
                    rescale_page_index(client.page_index, client.page_size.value(), size.value());
                client.page_size = size;
                self.clamp_client_page();
                self.clamp_focus();
                TableCommand::Local
            }
        }
    }

    // Column visibility and pinning

    /// Hide or show a column; the last visible column cannot be hidden
    pub fn toggle_visibility(&mut self, column: &str) {
        if !self.columns.iter().any(|c| c.id == column) {
            return;
        }
        if self.hidden.remove(column) {
            return;
        }
        let visible = self.columns.len() - self.hidden.len();
        if visible > 1 {
            self.hidden.insert(column.to_string());
            let count = self.display_columns().len();
            self.focused_column = self.focused_column.min(count.saturating_sub(1));
        }
    }

    pub fn is_hidden(&self, column: &str) -> bool {
        self.hidden.contains(column)
    }

    pub fn pin(&mut self, column: &str, pin: Option<Pin>) {
        match pin {
            Some(pin) => {
                self.pins.insert(column.to_string(), pin);
            }
            None => {
                self.pins.remove(column);
            }
        }
    }

    pub fn pin_of(&self, column: &str) -> Option<Pin> {
        self.pins.get(column).copied()
    }

    /// Visible columns: left-pinned, unpinned, right-pinned
    fn display_columns(&self) -> Vec<usize> {
        let visible = |i: &usize| !self.hidden.contains(&self.columns[*i].id);
        let with_pin = |want: Option<Pin>| {
            (0..self.columns.len())
                .filter(visible)
                .filter(move |i| self.pins.get(&self.columns[*i].id).copied() == want)
                .collect::<Vec<_>>()
        };
        let mut order = with_pin(Some(Pin::Left));
        order.extend(with_pin(None));
        order.extend(with_pin(Some(Pin::Right)));
        order
    }

    // Expansion

    /// Expand or collapse a row; rows without expanded content are ignored
    pub fn toggle_expanded(&mut self, row_key: &str) -> bool {
        let expandable = self
            .rows
            .iter()
            .any(|r| r.key == row_key && r.expanded.is_some());
        if !expandable {
            return false;
        }
        if !self.expanded.remove(row_key) {
            self.expanded.insert(row_key.to_string());
        }
        true
    }

    pub fn is_expanded(&self, row_key: &str) -> bool {
        self.expanded.contains(row_key)
    }

    // Focus

    pub fn focus_next_row(&mut self) {
        let rows = self.visible_indices().len();
        if self.focused_row + 1 < rows {
            self.focused_row += 1;
        }
    }

    pub fn focus_prev_row(&mut self) {
        self.focused_row = self.focused_row.saturating_sub(1);
    }

    pub fn focus_next_column(&mut self) {
        let count = self.display_columns().len();
        if self.focused_column + 1 < count {
            self.focused_column += 1;
        }
    }

    pub fn focus_prev_column(&mut self) {
        self.focused_column = self.focused_column.saturating_sub(1);
    }

    pub fn focused_column_id(&self) -> Option<&str> {
        self.display_columns()
            .get(self.focused_column)
            .map(|&i| self.columns[i].id.as_str())
    }

    pub fn focused_column_meta(&self) -> Option<&ColumnMeta> {
        self.display_columns()
            .get(self.focused_column)
            .map(|&i| &self.columns[i])
    }

    pub fn focused_row(&self) -> Option<&TableRow> {
        self.visible_indices()
            .get(self.focused_row)
            .map(|&i| &self.rows[i])
    }

    fn clamp_focus(&mut self) {
        let rows = self.visible_indices().len();
        self.focused_row = self.focused_row.min(rows.saturating_sub(1));
    }

    // Client pipeline

    /// Global filter, then column filters, then sort
    fn filtered_indices(&self) -> Vec<usize> {
        let client = match &self.mode {
            TableMode::ClientPaged(client) => client,
            TableMode::ServerPaged(_) => return (0..self.rows.len()).collect(),
        };

        let active_filters: Vec<(usize, ColumnFilter)> = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(i, column)| {
                let filter = self.column_filters.get(&column.id)?.applied();
                filter.is_active().then_some((i, filter))
            })
            .collect();

        let needle = client.global.applied();
        let mut indices: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row_matches_global(row, needle))
            .filter(|(_, row)| row_matches_columns(row, &active_filters))
            .map(|(i, _)| i)
            .collect();

        if let Some(sort) = &client.sort {
            if let Some(column) = self.columns.iter().position(|c| c.id == sort.column) {
                sort_indices(&mut indices, &self.rows, column, sort.direction);
            }
        }
        indices
    }

    /// Row indices shown on the current page
    fn visible_indices(&self) -> Vec<usize> {
        match &self.mode {
            TableMode::ServerPaged(_) => (0..self.rows.len()).collect(),
            TableMode::ClientPaged(client) => {
                let size = client.page_size.value();
                let start = client.page_index * size;
                self.filtered_indices()
                    .into_iter()
                    .skip(start)
                    .take(size)
                    .collect()
            }
        }
    }

    fn controls(&self) -> PaginationControls {
        match &self.mode {
            TableMode::ServerPaged(server) => PaginationControls::server(
                server.query.page,
                server.total_pages,
                server.total_elements,
            ),
            TableMode::ClientPaged(client) => {
                let total = self.filtered_indices().len();
                let count = page_count(total, client.page_size.value());
                PaginationControls::client(client.page_index, count, total)
            }
        }
    }

    fn reset_client_page(&mut self) {
        if let TableMode::ClientPaged(client) = &mut self.mode {
            client.page_index = 0;
        }
        self.focused_row = 0;
    }

    fn clamp_client_page(&mut self) {
        let total = self.filtered_indices().len();
        if let TableMode::ClientPaged(client) = &mut self.mode {
            let count = page_count(total, client.page_size.value());
            client.page_index = client.page_index.min(count - 1);
        }
    }

    // View

    /// Build the frame for rendering
    ///
    /// `loading` and `error` come from whoever fetches the rows; the error is
    /// only forwarded.
    pub fn view(&self, now: Instant, loading: bool, error: Option<&str>) -> TableView {
        let order = self.display_columns();
        let sort = self.sort();
        let server = self.is_server_paged();

        let columns = order
            .iter()
            .map(|&i| {
                let meta = &self.columns[i];
                let (filter, filter_pending) = match self.column_filters.get(&meta.id) {
                    Some(state) if !server => (state.display(), state.is_pending()),
                    _ => (String::new(), false),
                };
                ViewColumn {
                    id: meta.id.clone(),
                    header: meta.header.clone(),
                    width: meta.width,
                    align: meta.align,
                    pin: self.pins.get(&meta.id).copied(),
                    sort: sort
                        .filter(|s| s.column == meta.id)
                        .map(|s| s.direction),
                    filter,
                    filter_pending,
                }
            })
            .collect();

        let skeleton = loading || self.loading_window.is_active(now);
        let rows: Vec<ViewRow> = if skeleton {
            Vec::new()
        } else {
            self.visible_indices()
                .into_iter()
                .map(|i| {
                    let row = &self.rows[i];
                    ViewRow {
                        key: row.key.clone(),
                        cells: order
                            .iter()
                            .map(|&c| row.cells.get(c).cloned().unwrap_or(CellValue::Empty))
                            .collect(),
                        expandable: row.expanded.is_some(),
                        expanded: row
                            .expanded
                            .clone()
                            .filter(|_| self.expanded.contains(&row.key)),
                    }
                })
                .collect()
        };

        let search_pending = match &self.mode {
            TableMode::ClientPaged(client) => client.global.is_pending(),
            TableMode::ServerPaged(_) => false,
        };

        TableView {
            columns,
            empty: !skeleton && rows.is_empty(),
            rows,
            skeleton,
            error: error.map(str::to_string),
            search_text: self.search_text().to_string(),
            search_pending,
            show_filters: self.show_filters && !server,
            controls: self.controls(),
            page_size: self.page_size(),
            focused_row: self.focused_row,
            focused_column: self.focused_column,
        }
    }
}

/// Options a select filter cycles through, for the focused column
pub fn select_options(meta: &ColumnMeta) -> &[String] {
    match &meta.filter {
        FilterVariant::Select(options) => options,
        _ => &[],
    }
}
