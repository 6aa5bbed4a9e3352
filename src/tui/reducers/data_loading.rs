use std::time::Instant;

use tracing::{debug, warn};

use crate::report::StampDrag;
use crate::table::ListQuery;
use crate::tui::action::{Action, ListPayload};
use crate::tui::component::Effect;
use crate::tui::component_store::ComponentStateStore;
use crate::tui::components::data_table::{DataTable, DataTableProps, DataTableState};
use crate::tui::state::{AppState, ListRepository};
use crate::tui::types::table_path;
use crate::types::{AnyReport, ReportKind};

/// Handle list fetches and report load/save results
pub fn reduce_data_loading(
    state: AppState,
    action: &Action,
    component_states: &mut ComponentStateStore,
) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::RefreshList => {
            let kind = state.navigation.current_tab;
            let query = component_states
                .get::<DataTableState>(&table_path(kind))
                .and_then(|t| t.model.query().cloned())
                .or_else(|| state.data.lists.get(&kind).map(|r| r.query.clone()))
                .unwrap_or_else(|| ListQuery::with_size(state.system.config.tables.page_size));
            Ok(start_list_fetch(state, kind, query, component_states))
        }
        Action::Navigate { kind, query } => Ok(navigate(state, *kind, query.clone(), component_states)),
        Action::ListLoaded { kind, query, result } => Ok(list_loaded(
            state,
            *kind,
            query.as_ref(),
            result,
            component_states,
        )),
        Action::ReportLoaded { kind, id, result } => Ok(report_loaded(state, *kind, *id, result)),
        Action::ReportSaved { kind, id, result } => Ok(report_saved(state, *kind, *id, result)),
        _ => Err(state),
    }
}

/// Mark `kind`'s list as loading and ask for rows
///
/// The table is mounted here if nothing has rendered it yet, so the
/// response always has a model to land in.
pub fn start_list_fetch(
    state: AppState,
    kind: ReportKind,
    query: ListQuery,
    component_states: &mut ComponentStateStore,
) -> (AppState, Effect) {
    let mut new_state = state;
    let server = new_state.system.config.tables.is_server_paged(kind);
    let mut repo = ListRepository::new(kind, server, query);
    repo.loading = true;
    let fetch_query = repo.fetch_query();
    new_state.data.lists.insert(kind, repo);

    let props = DataTableProps::from_state(&new_state, kind, Instant::now());
    component_states.get_or_init::<DataTable>(&table_path(kind), &props);

    debug!("DATA: fetching {} list ({:?})", kind, fetch_query.as_ref().map(|q| q.to_query_string()));
    (new_state, Effect::FetchList { kind, query: fetch_query })
}

fn navigate(
    state: AppState,
    kind: ReportKind,
    query: ListQuery,
    component_states: &mut ComponentStateStore,
) -> (AppState, Effect) {
    if kind != state.navigation.current_tab {
        debug!("DATA: ignoring navigation for inactive tab {}", kind);
        return (state, Effect::None);
    }
    if let Some(table) = component_states.get_mut::<DataTableState>(&table_path(kind)) {
        table.model.sync_query(query.clone());
    }
    start_list_fetch(state, kind, query, component_states)
}

fn list_loaded(
    state: AppState,
    kind: ReportKind,
    query: Option<&ListQuery>,
    result: &Result<ListPayload, String>,
    component_states: &mut ComponentStateStore,
) -> (AppState, Effect) {
    let mut new_state = state;
    let Some(repo) = new_state.data.lists.get_mut(&kind) else {
        debug!("DATA: dropping {} list for a closed tab", kind);
        return (new_state, Effect::None);
    };
    if repo.fetch_query().as_ref() != query {
        debug!("DATA: dropping stale {} list", kind);
        return (new_state, Effect::None);
    }

    repo.loading = false;
    match result {
        Ok(payload) => {
            debug!("DATA: {} list loaded ({} rows)", kind, payload.records().len());
            repo.error = None;
            repo.payload = Some(payload.clone());
            if let Some(table) = component_states.get_mut::<DataTableState>(&table_path(kind)) {
                table.load(payload);
            }
        }
        Err(e) => {
            warn!("DATA: {} list failed: {}", kind, e);
            repo.error = Some(e.clone());
            new_state
                .system
                .set_status_error_message(format!("Failed to load {} reports: {}", kind.label(), e));
        }
    }
    (new_state, Effect::None)
}

/// Drag state at the stored offset of `report`
fn idle_drag(state: &AppState, report: &AnyReport) -> StampDrag {
    let print = &state.system.config.print;
    StampDrag::new(
        report.header().stamp_offset_x,
        print.page_width_pt,
        print.stamp_width_pt,
    )
}

fn report_loaded(
    state: AppState,
    kind: ReportKind,
    id: i64,
    result: &Result<AnyReport, String>,
) -> (AppState, Effect) {
    let mut new_state = state;
    match result {
        Ok(report) => {
            let drag = idle_drag(&new_state, report);
            new_state.data.reports.insert((kind, id), report.clone());
            if let Some(preview) = new_state.ui.preview.as_mut().filter(|p| p.kind == kind && p.id == id) {
                preview.loading = false;
                preview.error = None;
                preview.drag = Some(drag);
            }
        }
        Err(e) => {
            warn!("DATA: {} report {} failed: {}", kind, id, e);
            if let Some(preview) = new_state.ui.preview.as_mut().filter(|p| p.kind == kind && p.id == id) {
                preview.loading = false;
                preview.error = Some(e.clone());
            }
            new_state.system.set_status_error_message(e.clone());
        }
    }
    (new_state, Effect::None)
}

fn report_saved(
    state: AppState,
    kind: ReportKind,
    id: i64,
    result: &Result<AnyReport, String>,
) -> (AppState, Effect) {
    let mut new_state = state;
    match result {
        Ok(report) => {
            let drag = idle_drag(&new_state, report);
            new_state.data.reports.insert((kind, id), report.clone());
            if let Some(preview) = new_state.ui.preview.as_mut().filter(|p| p.kind == kind && p.id == id) {
                preview.saving = false;
                preview.drag = Some(drag);
            }
            new_state
                .system
                .set_status_message(format!("Stamp position saved for {} #{}", kind.label(), id));
        }
        Err(e) => {
            warn!("DATA: saving {} report {} failed: {}", kind, id, e);
            let restored = new_state
                .data
                .reports
                .get(&(kind, id))
                .map(|stored| idle_drag(&new_state, stored));
            if let Some(preview) = new_state.ui.preview.as_mut().filter(|p| p.kind == kind && p.id == id) {
                preview.saving = false;
                if restored.is_some() {
                    preview.drag = restored;
                }
            }
            new_state
                .system
                .set_status_error_message(format!("Failed to save stamp position: {}", e));
        }
    }
    (new_state, Effect::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::tui::state::PreviewState;
    use crate::tui::testing::create_state;

    fn reduce(state: AppState, action: Action, store: &mut ComponentStateStore) -> (AppState, Effect) {
        match reduce_data_loading(state, &action, store) {
            Ok(result) => result,
            Err(_) => panic!("action not handled"),
        }
    }

    fn acb_page(query: &ListQuery) -> ListPayload {
        let content: Vec<AnyReport> = (1..=3).map(|id| fixtures::report(ReportKind::Acb, id)).collect();
        ListPayload::Page(crate::types::PageEnvelope {
            number_of_elements: content.len(),
            content,
            pageable: crate::types::Pageable {
                page_number: query.page,
                page_size: query.size,
            },
            total_pages: 4,
            total_elements: 12,
            first: true,
            last: false,
        })
    }

    #[test]
    fn test_refresh_starts_server_fetch_and_mounts_table() {
        let mut store = ComponentStateStore::new();
        let (state, effect) = reduce(create_state(), Action::RefreshList, &mut store);

        let repo = &state.data.lists[&ReportKind::Acb];
        assert!(repo.loading);
        assert!(store.get::<DataTableState>(&table_path(ReportKind::Acb)).is_some());
        match effect {
            Effect::FetchList { kind, query } => {
                assert_eq!(kind, ReportKind::Acb);
                assert_eq!(query, Some(ListQuery::with_size(10)));
            }
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_client_list_fetches_everything() {
        let mut store = ComponentStateStore::new();
        let mut state = create_state();
        state.navigation.current_tab = ReportKind::OilFiltration;
        let (_, effect) = reduce(state, Action::RefreshList, &mut store);
        assert!(matches!(
            effect,
            Effect::FetchList { kind: ReportKind::OilFiltration, query: None }
        ));
    }

    #[test]
    fn test_list_loaded_fills_table() {
        let mut store = ComponentStateStore::new();
        let (state, _) = reduce(create_state(), Action::RefreshList, &mut store);
        let query = ListQuery::with_size(10);
        let (state, _) = reduce(
            state,
            Action::ListLoaded {
                kind: ReportKind::Acb,
                query: Some(query.clone()),
                result: Ok(acb_page(&query)),
            },
            &mut store,
        );

        let repo = &state.data.lists[&ReportKind::Acb];
        assert!(!repo.loading);
        assert!(repo.payload.is_some());
        let table = store.get::<DataTableState>(&table_path(ReportKind::Acb)).unwrap();
        assert_eq!(table.model.rows().len(), 3);
        let view = table.model.view(Instant::now() + std::time::Duration::from_secs(5), false, None);
        assert_eq!(view.controls.page_count, 4);
        assert_eq!(view.controls.total_rows, 12);
    }

    #[test]
    fn test_stale_list_is_dropped() {
        let mut store = ComponentStateStore::new();
        let (state, _) = reduce(create_state(), Action::RefreshList, &mut store);
        let stale = ListQuery::with_size(10).with_page(3);
        let (state, _) = reduce(
            state,
            Action::ListLoaded {
                kind: ReportKind::Acb,
                query: Some(stale.clone()),
                result: Ok(acb_page(&stale)),
            },
            &mut store,
        );
        assert!(state.data.lists[&ReportKind::Acb].loading);
        assert!(state.data.lists[&ReportKind::Acb].payload.is_none());
    }

    #[test]
    fn test_list_error_sets_status() {
        let mut store = ComponentStateStore::new();
        let (state, _) = reduce(create_state(), Action::RefreshList, &mut store);
        let (state, _) = reduce(
            state,
            Action::ListLoaded {
                kind: ReportKind::Acb,
                query: Some(ListQuery::with_size(10)),
                result: Err("connection refused".to_string()),
            },
            &mut store,
        );
        assert_eq!(
            state.data.lists[&ReportKind::Acb].error.as_deref(),
            Some("connection refused")
        );
        assert!(state.system.status_is_error);
    }

    #[test]
    fn test_navigate_syncs_table_query() {
        let mut store = ComponentStateStore::new();
        let (state, _) = reduce(create_state(), Action::RefreshList, &mut store);
        let query = ListQuery::with_size(10).with_search("harbor");
        let (state, effect) = reduce(
            state,
            Action::Navigate { kind: ReportKind::Acb, query: query.clone() },
            &mut store,
        );
        assert_eq!(state.data.lists[&ReportKind::Acb].query, query);
        let table = store.get::<DataTableState>(&table_path(ReportKind::Acb)).unwrap();
        assert_eq!(table.model.query(), Some(&query));
        assert!(matches!(effect, Effect::FetchList { query: Some(_), .. }));
    }

    #[test]
    fn test_navigate_for_inactive_tab_is_ignored() {
        let mut store = ComponentStateStore::new();
        let (state, effect) = reduce(
            create_state(),
            Action::Navigate { kind: ReportKind::EarthTest, query: ListQuery::default() },
            &mut store,
        );
        assert!(matches!(effect, Effect::None));
        assert!(state.data.lists.is_empty());
    }

    #[test]
    fn test_report_loaded_initializes_drag() {
        let mut store = ComponentStateStore::new();
        let mut state = create_state();
        state.ui.preview = Some(PreviewState::new(ReportKind::Acb, 6));
        let mut report = fixtures::report(ReportKind::Acb, 6);
        report.header_mut().stamp_offset_x = 1000.0;

        let (state, _) = reduce(
            state,
            Action::ReportLoaded { kind: ReportKind::Acb, id: 6, result: Ok(report) },
            &mut store,
        );
        let preview = state.ui.preview.as_ref().unwrap();
        assert!(!preview.loading);
        // Clamped to page width minus stamp width
        assert_eq!(preview.drag.map(|d| d.offset()), Some(400.0));
        assert!(state.data.reports.contains_key(&(ReportKind::Acb, 6)));
    }

    #[test]
    fn test_report_error_shown_in_preview() {
        let mut store = ComponentStateStore::new();
        let mut state = create_state();
        state.ui.preview = Some(PreviewState::new(ReportKind::Acb, 6));
        let (state, _) = reduce(
            state,
            Action::ReportLoaded { kind: ReportKind::Acb, id: 6, result: Err("not found".to_string()) },
            &mut store,
        );
        assert_eq!(state.ui.preview.as_ref().unwrap().error.as_deref(), Some("not found"));
    }

    #[test]
    fn test_failed_save_restores_stored_offset() {
        let mut store = ComponentStateStore::new();
        let mut state = create_state();
        let mut report = fixtures::report(ReportKind::Acb, 6);
        report.header_mut().stamp_offset_x = 50.0;
        state.data.reports.insert((ReportKind::Acb, 6), report);
        let mut preview = PreviewState::new(ReportKind::Acb, 6);
        preview.saving = true;
        preview.drag = Some(StampDrag::new(300.0, 510.0, 110.0));
        state.ui.preview = Some(preview);

        let (state, _) = reduce(
            state,
            Action::ReportSaved { kind: ReportKind::Acb, id: 6, result: Err("timeout".to_string()) },
            &mut store,
        );
        let preview = state.ui.preview.as_ref().unwrap();
        assert!(!preview.saving);
        assert_eq!(preview.drag.map(|d| d.offset()), Some(50.0));
        assert!(state.system.status_is_error);
    }

    #[test]
    fn test_unrelated_action_passes_through() {
        let mut store = ComponentStateStore::new();
        assert!(reduce_data_loading(create_state(), &Action::Quit, &mut store).is_err());
    }
}
