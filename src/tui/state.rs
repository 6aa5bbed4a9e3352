use std::collections::HashMap;

use crate::config::Config;
use crate::report::StampDrag;
use crate::table::ListQuery;
use crate::types::{AnyReport, ReportKind};

use super::action::ListPayload;
use super::types::{Panel, Tab};

/// Root application state - single source of truth
///
/// All state changes happen through the reducer. Table view state lives in
/// the component store; this holds what the reducers and effects share.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub navigation: NavigationState,
    pub data: DataState,
    pub ui: UiState,
    pub system: SystemState,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let mut state = Self::default();
        state.system.config = config;
        state
    }

    /// The open preview panel, if any
    pub fn preview_panel(&self) -> Option<(ReportKind, i64)> {
        match self.navigation.panel_stack.last() {
            Some(Panel::Preview { kind, id }) => Some((*kind, *id)),
            None => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavigationState {
    pub current_tab: Tab,
    pub panel_stack: Vec<Panel>,
    /// Whether focus is on content (true) or tab bar (false)
    pub content_focused: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current_tab: ReportKind::Acb,
            panel_stack: Vec::new(),
            content_focused: false, // Start with tab bar focused
        }
    }
}

/// Last fetch of one tab's list
///
/// Created on the first fetch, replaced on every refetch and dropped when
/// the tab is left.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRepository {
    pub kind: ReportKind,
    /// Server-driven lists fetch one page per query
    pub server: bool,
    pub query: ListQuery,
    pub payload: Option<ListPayload>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ListRepository {
    pub fn new(kind: ReportKind, server: bool, query: ListQuery) -> Self {
        Self {
            kind,
            server,
            query,
            payload: None,
            loading: false,
            error: None,
        }
    }

    /// Query sent with the fetch; client lists fetch everything
    pub fn fetch_query(&self) -> Option<ListQuery> {
        self.server.then(|| self.query.clone())
    }

    /// Find a fetched record by id
    pub fn record(&self, id: i64) -> Option<&AnyReport> {
        self.payload
            .as_ref()?
            .records()
            .iter()
            .find(|r| r.id() == Some(id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataState {
    pub lists: HashMap<ReportKind, ListRepository>,
    /// Full reports fetched for the preview
    pub reports: HashMap<(ReportKind, i64), AnyReport>,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub preview: Option<PreviewState>,
}

/// Print preview of one report
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewState {
    pub kind: ReportKind,
    pub id: i64,
    pub page_index: usize,
    pub scroll: u16,
    /// Set once the report is loaded
    pub drag: Option<StampDrag>,
    pub loading: bool,
    pub saving: bool,
    pub error: Option<String>,
}

impl PreviewState {
    pub fn new(kind: ReportKind, id: i64) -> Self {
        Self {
            kind,
            id,
            page_index: 0,
            scroll: 0,
            drag: None,
            loading: true,
            saving: false,
            error: None,
        }
    }
}

/// Default help message shown in the status bar
pub const DEFAULT_STATUS_MESSAGE: &str =
    "Keys: ←→ tabs | ↓ enter | ESC back | 1-4 jump to tab | r reload | q quit";

/// Help shown while a table has focus
pub const TABLE_STATUS_MESSAGE: &str =
    "↑↓←→ move | Enter open | s sort | / search | f filters | e edit filter | PgUp/PgDn page | +/- size";

/// Help shown in the preview
pub const PREVIEW_STATUS_MESSAGE: &str =
    "PgUp/PgDn page | ↑↓ scroll | drag the stamp on the last page | ESC back";

#[derive(Debug, Clone, Default)]
pub struct SystemState {
    pub config: Config,
    pub status_message: Option<String>,
    pub status_is_error: bool,
}

impl SystemState {
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_is_error = false;
    }

    pub fn set_status_error_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_is_error = true;
    }

    /// Fall back to the help text for the focused area
    pub fn reset_status_message(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }
}
