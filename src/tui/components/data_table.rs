use std::any::Any;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::report::{list_columns, record_key};
use crate::table::{
    column_metas, extract_rows, select_options, ColumnFilterState, FilterVariant, ListQuery,
    PageSize, Pin, TableCommand, TableModel, TableTiming,
};
use crate::tui::action::{Action, ComponentMessageTrait, ListPayload};
use crate::tui::component::{Component, Effect, Element};
use crate::tui::error::TuiError;
use crate::tui::state::AppState;
use crate::tui::widgets::DataTableWidget;
use crate::types::ReportKind;

/// Data table hosted by a report tab
///
/// The `TableModel` lives in the component store under `table_path(kind)`;
/// key presses reach it as `DataTableMsg`s.
pub struct DataTable;

#[derive(Clone, Debug)]
pub struct DataTableProps {
    pub kind: ReportKind,
    pub server: bool,
    pub query: ListQuery,
    pub page_size: PageSize,
    pub timing: TableTiming,
    pub loading: bool,
    pub error: Option<String>,
    pub focused: bool,
    pub now: Instant,
}

impl DataTableProps {
    pub fn from_state(state: &AppState, kind: ReportKind, now: Instant) -> Self {
        let tables = &state.system.config.tables;
        let repo = state.data.lists.get(&kind);
        Self {
            kind,
            server: tables.is_server_paged(kind),
            query: repo
                .map(|r| r.query.clone())
                .unwrap_or_else(|| ListQuery::with_size(tables.page_size)),
            page_size: tables.client_page_size(),
            timing: TableTiming {
                debounce: Duration::from_millis(tables.search_debounce_ms),
                min_loading: Duration::from_millis(tables.min_loading_ms),
            },
            // Nothing fetched yet counts as loading
            loading: repo.map_or(true, |r| r.loading),
            error: repo.and_then(|r| r.error.clone()),
            focused: state.navigation.content_focused,
            now,
        }
    }
}

/// Which input the table is capturing keystrokes for
#[derive(Clone, Debug, PartialEq)]
pub enum EditTarget {
    Search,
    Filter(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Editing {
    pub target: EditTarget,
    pub buffer: String,
}

#[derive(Clone, Debug)]
pub struct DataTableState {
    pub kind: ReportKind,
    pub model: TableModel,
    pub editing: Option<Editing>,
}

impl DataTableState {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Push fetched records into the model
    pub fn load(&mut self, payload: &ListPayload) {
        let columns = list_columns(self.kind);
        let rows = extract_rows(&columns, payload.records(), record_key);
        match payload {
            ListPayload::Page(page) => {
                self.model
                    .set_server_page(rows, page.total_pages, page.total_elements)
            }
            ListPayload::All(_) => self.model.set_rows(rows),
        }
    }

    /// Apply one message; a server-driven navigation comes back as an action
    pub fn handle(&mut self, msg: DataTableMsg) -> Effect {
        let command = match msg {
            DataTableMsg::FocusNextRow => {
                self.model.focus_next_row();
                TableCommand::Local
            }
            DataTableMsg::FocusPrevRow => {
                self.model.focus_prev_row();
                TableCommand::Local
            }
            DataTableMsg::FocusNextColumn => {
                self.model.focus_next_column();
                TableCommand::Local
            }
            DataTableMsg::FocusPrevColumn => {
                self.model.focus_prev_column();
                TableCommand::Local
            }
            DataTableMsg::SortFocused => match self.model.focused_column_id().map(str::to_string) {
                Some(column) => self.model.toggle_sort(&column),
                None => TableCommand::Local,
            },
            DataTableMsg::ToggleExpanded => {
                if let Some(key) = self.model.focused_row().map(|r| r.key.clone()) {
                    self.model.toggle_expanded(&key);
                }
                TableCommand::Local
            }
            DataTableMsg::ToggleFilterRow => {
                self.model.toggle_filter_row();
                TableCommand::Local
            }
            DataTableMsg::HideFocusedColumn => {
                if let Some(column) = self.model.focused_column_id().map(str::to_string) {
                    self.model.toggle_visibility(&column);
                }
                TableCommand::Local
            }
            DataTableMsg::ShowAllColumns => {
                let hidden: Vec<String> = self
                    .model
                    .columns()
                    .iter()
                    .filter(|c| self.model.is_hidden(&c.id))
                    .map(|c| c.id.clone())
                    .collect();
                for column in hidden {
                    self.model.toggle_visibility(&column);
                }
                TableCommand::Local
            }
            DataTableMsg::CyclePin => {
                if let Some(column) = self.model.focused_column_id().map(str::to_string) {
                    let next = match self.model.pin_of(&column) {
                        None => Some(Pin::Left),
                        Some(Pin::Left) => Some(Pin::Right),
                        Some(Pin::Right) => None,
                    };
                    self.model.pin(&column, next);
                }
                TableCommand::Local
            }
            DataTableMsg::FirstPage => self.model.first_page(),
            DataTableMsg::PrevPage => self.model.prev_page(),
            DataTableMsg::NextPage => self.model.next_page(),
            DataTableMsg::LastPage => self.model.last_page(),
            DataTableMsg::GrowPageSize => {
                let size = PageSize::at_least(self.model.page_size()).next();
                self.model.set_page_size(size)
            }
            DataTableMsg::ShrinkPageSize => {
                let size = PageSize::at_least(self.model.page_size()).prev();
                self.model.set_page_size(size)
            }
            DataTableMsg::StartSearch => {
                self.editing = Some(Editing {
                    target: EditTarget::Search,
                    buffer: self.model.search_text().to_string(),
                });
                TableCommand::Local
            }
            DataTableMsg::StartFilter { at } => return self.start_filter(at),
            DataTableMsg::Input { c, at } => match self.editing.as_mut() {
                Some(editing) => {
                    editing.buffer.push(c);
                    self.apply_edit(at)
                }
                None => TableCommand::Local,
            },
            DataTableMsg::Backspace { at } => match self.editing.as_mut() {
                Some(editing) => {
                    editing.buffer.pop();
                    self.apply_edit(at)
                }
                None => TableCommand::Local,
            },
            DataTableMsg::FinishEdit => {
                self.editing = None;
                TableCommand::Local
            }
            DataTableMsg::OpenFocused => return self.open_focused(),
        };
        self.command_effect(command)
    }

    fn command_effect(&self, command: TableCommand) -> Effect {
        match command {
            TableCommand::Local => Effect::None,
            TableCommand::Navigate(query) => {
                debug!("TABLE: {} navigates to {}", self.kind, query.to_query_string());
                Effect::Action(Action::Navigate {
                    kind: self.kind,
                    query,
                })
            }
        }
    }

    fn apply_edit(&mut self, at: Instant) -> TableCommand {
        let Some(editing) = self.editing.clone() else {
            return TableCommand::Local;
        };
        match editing.target {
            EditTarget::Search => self.model.input_global(&editing.buffer, at),
            EditTarget::Filter(column) => self.model.set_column_filter(&column, &editing.buffer, at),
        }
    }

    /// Select filters cycle through their options; text and range filters
    /// start capturing input
    fn start_filter(&mut self, at: Instant) -> Effect {
        if self.model.is_server_paged() {
            return Effect::Action(Action::SetStatusMessage {
                message: "Column filters are not available on server-paged lists".to_string(),
                is_error: false,
            });
        }
        let Some(meta) = self.model.focused_column_meta().cloned() else {
            return Effect::None;
        };
        if !self.model.show_filters() {
            self.model.toggle_filter_row();
        }
        match &meta.filter {
            FilterVariant::Select(_) => {
                let current = match self.model.column_filter(&meta.id) {
                    Some(ColumnFilterState::Select(selected)) => selected.clone(),
                    _ => None,
                };
                let next = next_select_value(select_options(&meta), current.as_deref());
                let command = self.model.set_column_filter(&meta.id, &next, at);
                self.command_effect(command)
            }
            FilterVariant::Search | FilterVariant::Range => {
                let buffer = self
                    .model
                    .column_filter(&meta.id)
                    .map(|f| f.display())
                    .unwrap_or_default();
                self.editing = Some(Editing {
                    target: EditTarget::Filter(meta.id),
                    buffer,
                });
                Effect::None
            }
        }
    }

    fn open_focused(&self) -> Effect {
        let result = match self.model.focused_row() {
            None => Err(TuiError::NoSelection),
            Some(row) => row
                .key
                .parse::<i64>()
                .map_err(|_| TuiError::UnsavedRow(row.key.clone())),
        };
        match result {
            Ok(id) => Effect::Action(Action::OpenPreview { kind: self.kind, id }),
            Err(e) => Effect::Action(Action::SetStatusMessage {
                message: e.to_string(),
                is_error: true,
            }),
        }
    }
}

/// Next option after `current`; past the last option the filter clears
fn next_select_value(options: &[String], current: Option<&str>) -> String {
    match current.and_then(|c| options.iter().position(|o| o == c)) {
        None => options.first().cloned().unwrap_or_default(),
        Some(i) => options.get(i + 1).cloned().unwrap_or_default(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DataTableMsg {
    FocusNextRow,
    FocusPrevRow,
    FocusNextColumn,
    FocusPrevColumn,
    SortFocused,
    ToggleExpanded,
    ToggleFilterRow,
    HideFocusedColumn,
    ShowAllColumns,
    CyclePin,
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    GrowPageSize,
    ShrinkPageSize,
    StartSearch,
    StartFilter { at: Instant },
    Input { c: char, at: Instant },
    Backspace { at: Instant },
    FinishEdit,
    OpenFocused,
}

impl ComponentMessageTrait for DataTableMsg {
    fn apply(&self, state: &mut dyn Any) -> Effect {
        match state.downcast_mut::<DataTableState>() {
            Some(table) => table.handle(self.clone()),
            None => Effect::None,
        }
    }

    fn clone_box(&self) -> Box<dyn ComponentMessageTrait> {
        Box::new(self.clone())
    }
}

impl Component for DataTable {
    type Props = DataTableProps;
    type State = DataTableState;

    fn init(props: &Self::Props) -> Self::State {
        let metas = column_metas(&list_columns(props.kind));
        let mut model = if props.server {
            TableModel::server(metas, props.query.clone())
        } else {
            TableModel::client(metas, props.page_size)
        }
        .with_timing(props.timing);
        model.mount(props.now);
        debug!("TABLE: mounted {} table (server={})", props.kind, props.server);
        DataTableState {
            kind: props.kind,
            model,
            editing: None,
        }
    }

    fn view(&self, props: &Self::Props, state: &Self::State) -> Element {
        Element::Widget(Box::new(DataTableWidget {
            title: props.kind.title().to_string(),
            view: state
                .model
                .view(props.now, props.loading, props.error.as_deref()),
            editing: state.editing.clone(),
            focused: props.focused,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::table::SortBy;

    fn props(kind: ReportKind, server: bool, now: Instant) -> DataTableProps {
        DataTableProps {
            kind,
            server,
            query: ListQuery::default(),
            page_size: PageSize::Five,
            timing: TableTiming {
                debounce: Duration::from_millis(500),
                min_loading: Duration::ZERO,
            },
            loading: false,
            error: None,
            focused: true,
            now,
        }
    }

    fn client_table(now: Instant) -> DataTableState {
        let mut state = DataTable::init(&props(ReportKind::OilFiltration, false, now));
        state.load(&ListPayload::All(fixtures::reports(ReportKind::OilFiltration)));
        state
    }

    #[test]
    fn test_sort_on_server_table_navigates() {
        let now = Instant::now();
        let mut state = DataTable::init(&props(ReportKind::Acb, true, now));
        match state.handle(DataTableMsg::SortFocused) {
            Effect::Action(Action::Navigate { kind, query }) => {
                assert_eq!(kind, ReportKind::Acb);
                assert_eq!(query.sort_by, Some(SortBy::asc("reportNo")));
            }
            other => panic!("expected navigation, got {:?}", other),
        }
    }

    #[test]
    fn test_sort_on_client_table_is_local() {
        let now = Instant::now();
        let mut state = client_table(now);
        assert!(matches!(state.handle(DataTableMsg::SortFocused), Effect::None));
        assert_eq!(state.model.sort(), Some(&SortBy::asc("reportNo")));
    }

    #[test]
    fn test_server_search_navigates_per_keystroke() {
        let now = Instant::now();
        let mut state = DataTable::init(&props(ReportKind::EarthTest, true, now));
        state.handle(DataTableMsg::StartSearch);
        let effect = state.handle(DataTableMsg::Input { c: 'h', at: now });
        match effect {
            Effect::Action(Action::Navigate { query, .. }) => {
                assert_eq!(query.query.as_deref(), Some("h"));
                assert_eq!(query.page, 0);
            }
            other => panic!("expected navigation, got {:?}", other),
        }
        state.handle(DataTableMsg::FinishEdit);
        assert!(!state.is_editing());
    }

    #[test]
    fn test_client_search_is_debounced() {
        let now = Instant::now();
        let mut state = client_table(now);
        state.handle(DataTableMsg::StartSearch);
        for c in "Harbor".chars() {
            state.handle(DataTableMsg::Input { c, at: now });
        }
        assert!(state.model.view(now, false, None).search_pending);
        assert_eq!(state.model.view(now, false, None).controls.total_rows, 12);

        let later = now + Duration::from_millis(600);
        assert!(state.model.tick(later));
        let view = state.model.view(later, false, None);
        assert!(!view.search_pending);
        assert_eq!(view.controls.total_rows, 3);
    }

    #[test]
    fn test_backspace_edits_buffer() {
        let now = Instant::now();
        let mut state = client_table(now);
        state.handle(DataTableMsg::StartSearch);
        state.handle(DataTableMsg::Input { c: 'a', at: now });
        state.handle(DataTableMsg::Input { c: 'b', at: now });
        state.handle(DataTableMsg::Backspace { at: now });
        assert_eq!(state.editing.as_ref().map(|e| e.buffer.as_str()), Some("a"));
        assert_eq!(state.model.search_text(), "a");
    }

    #[test]
    fn test_server_table_rejects_column_filters() {
        let now = Instant::now();
        let mut state = DataTable::init(&props(ReportKind::Acb, true, now));
        let effect = state.handle(DataTableMsg::StartFilter { at: now });
        assert!(matches!(
            effect,
            Effect::Action(Action::SetStatusMessage { is_error: false, .. })
        ));
        assert!(!state.is_editing());
    }

    #[test]
    fn test_text_filter_starts_editing_and_shows_row() {
        let now = Instant::now();
        let mut state = client_table(now);
        state.handle(DataTableMsg::StartFilter { at: now });
        assert!(state.model.show_filters());
        assert_eq!(
            state.editing.as_ref().map(|e| e.target.clone()),
            Some(EditTarget::Filter("reportNo".to_string()))
        );
    }

    #[test]
    fn test_next_select_value_cycles_and_clears() {
        let options = vec!["Sunny".to_string(), "Cloudy".to_string()];
        assert_eq!(next_select_value(&options, None), "Sunny");
        assert_eq!(next_select_value(&options, Some("Sunny")), "Cloudy");
        assert_eq!(next_select_value(&options, Some("Cloudy")), "");
        assert_eq!(next_select_value(&[], None), "");
    }

    #[test]
    fn test_open_focused_row() {
        let now = Instant::now();
        let mut state = client_table(now);
        state.handle(DataTableMsg::FocusNextRow);
        match state.handle(DataTableMsg::OpenFocused) {
            Effect::Action(Action::OpenPreview { kind, id }) => {
                assert_eq!(kind, ReportKind::OilFiltration);
                assert_eq!(id, 2);
            }
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[test]
    fn test_open_without_rows_reports_error() {
        let now = Instant::now();
        let mut state = DataTable::init(&props(ReportKind::OilFiltration, false, now));
        match state.handle(DataTableMsg::OpenFocused) {
            Effect::Action(Action::SetStatusMessage { message, is_error }) => {
                assert!(is_error);
                assert_eq!(message, "No report under the cursor");
            }
            other => panic!("expected status, got {:?}", other),
        }
    }

    #[test]
    fn test_page_size_steps() {
        let now = Instant::now();
        let mut state = client_table(now);
        state.handle(DataTableMsg::GrowPageSize);
        assert_eq!(state.model.page_size(), 10);
        state.handle(DataTableMsg::ShrinkPageSize);
        state.handle(DataTableMsg::ShrinkPageSize);
        assert_eq!(state.model.page_size(), 5);
    }

    #[test]
    fn test_hide_and_restore_columns() {
        let now = Instant::now();
        let mut state = client_table(now);
        state.handle(DataTableMsg::HideFocusedColumn);
        assert!(state.model.is_hidden("reportNo"));
        state.handle(DataTableMsg::ShowAllColumns);
        assert!(!state.model.is_hidden("reportNo"));
    }

    #[test]
    fn test_cycle_pin() {
        let now = Instant::now();
        let mut state = client_table(now);
        state.handle(DataTableMsg::FocusNextColumn);
        let column = state.model.focused_column_id().map(str::to_string).unwrap();
        state.handle(DataTableMsg::CyclePin);
        assert_eq!(state.model.pin_of(&column), Some(Pin::Left));
    }

    #[test]
    fn test_apply_ignores_foreign_state() {
        let mut other = 5u8;
        let effect = DataTableMsg::NextPage.apply(&mut other);
        assert!(matches!(effect, Effect::None));
    }
}
