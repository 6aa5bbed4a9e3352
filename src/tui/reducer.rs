use tracing::{debug, info};

use super::action::Action;
use super::component::Effect;
use super::component_store::ComponentStateStore;
use super::components::data_table::DataTableState;
use super::state::AppState;
use super::types::table_path;
use crate::tui::reducers::{reduce_data_loading, reduce_navigation, reduce_preview};
use crate::types::ReportKind;

/// Pure state reducer - like Redux reducer
///
/// Takes current state, component state store, and an action, returns new
/// state and optional effect. All I/O is returned as an `Effect` to be
/// executed by the runtime.
///
/// Ownership is passed through the sub-reducer chain to avoid cloning:
/// - Each sub-reducer returns Ok((state, effect)) if it handled the action
/// - Or Err(state) to pass ownership back for the next reducer to try
pub fn reduce(
    state: AppState,
    action: Action,
    component_states: &mut ComponentStateStore,
) -> (AppState, Effect) {
    // Component message dispatch
    if let Action::ComponentMessage { path, message } = &action {
        if let Some(component_state) = component_states.get_mut_any(path) {
            debug!("COMPONENT: Dispatching message to {}: {:?}", path, message);
            let effect = message.apply(component_state);
            return (state, effect);
        } else {
            debug!("COMPONENT: No state found for path: {}", path);
            return (state, Effect::None);
        }
    }

    let state = match reduce_navigation(state, &action, component_states) {
        Ok(result) => return result,
        Err(state) => state,
    };

    let state = match reduce_data_loading(state, &action, component_states) {
        Ok(result) => return result,
        Err(state) => state,
    };

    let state = match reduce_preview(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    match action {
        Action::Tick(now) => {
            for kind in ReportKind::all() {
                if let Some(table) = component_states.get_mut::<DataTableState>(&table_path(kind)) {
                    table.model.tick(now);
                }
            }
            (state, Effect::None)
        }

        Action::SetStatusMessage { message, is_error } => {
            let mut new_state = state;
            if is_error {
                new_state.system.set_status_error_message(message);
            } else {
                new_state.system.set_status_message(message);
            }
            (new_state, Effect::None)
        }

        Action::Quit => {
            info!("Quit requested");
            (state, Effect::None)
        }

        _ => (state, Effect::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::tui::action::ListPayload;
    use crate::tui::components::data_table::DataTableMsg;
    use crate::tui::testing::create_state;
    use std::time::{Duration, Instant};

    #[test]
    fn test_navigation_actions_are_handled() {
        let mut store = ComponentStateStore::new();
        let (state, effect) = reduce(create_state(), Action::NavigateTab(ReportKind::OilFiltration), &mut store);
        assert_eq!(state.navigation.current_tab, ReportKind::OilFiltration);
        assert!(matches!(effect, Effect::FetchList { query: None, .. }));
    }

    #[test]
    fn test_component_message_reaches_table() {
        let mut store = ComponentStateStore::new();
        let (state, _) = reduce(create_state(), Action::RefreshList, &mut store);
        let effect = reduce(
            state,
            Action::ComponentMessage {
                path: table_path(ReportKind::Acb),
                message: Box::new(DataTableMsg::SortFocused),
            },
            &mut store,
        )
        .1;
        assert!(matches!(effect, Effect::Action(Action::Navigate { kind: ReportKind::Acb, .. })));
    }

    #[test]
    fn test_component_message_without_state_is_dropped() {
        let mut store = ComponentStateStore::new();
        let (_, effect) = reduce(
            create_state(),
            Action::ComponentMessage {
                path: "app/nowhere/table".to_string(),
                message: Box::new(DataTableMsg::NextPage),
            },
            &mut store,
        );
        assert!(matches!(effect, Effect::None));
    }

    #[test]
    fn test_tick_applies_debounced_search() {
        let mut store = ComponentStateStore::new();
        let (state, _) = reduce(create_state(), Action::NavigateTab(ReportKind::OilFiltration), &mut store);
        let (state, _) = reduce(
            state,
            Action::ListLoaded {
                kind: ReportKind::OilFiltration,
                query: None,
                result: Ok(ListPayload::All(fixtures::reports(ReportKind::OilFiltration))),
            },
            &mut store,
        );
        let path = table_path(ReportKind::OilFiltration);
        let start = Instant::now();
        let table = store.get_mut::<DataTableState>(&path).unwrap();
        table.model.input_global("Metro", start);
        assert!(table.model.view(start, false, None).search_pending);

        reduce(state, Action::Tick(start + Duration::from_secs(1)), &mut store);
        let table = store.get::<DataTableState>(&path).unwrap();
        let view = table.model.view(start + Duration::from_secs(1), false, None);
        assert!(!view.search_pending);
        assert_eq!(view.controls.total_rows, 3);
    }

    #[test]
    fn test_status_message() {
        let mut store = ComponentStateStore::new();
        let (state, _) = reduce(
            create_state(),
            Action::SetStatusMessage { message: "Saved".to_string(), is_error: false },
            &mut store,
        );
        assert_eq!(state.system.status_message.as_deref(), Some("Saved"));
        assert!(!state.system.status_is_error);
    }
}
