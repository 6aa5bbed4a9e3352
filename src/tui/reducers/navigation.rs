use tracing::{debug, trace};

use super::data_loading::start_list_fetch;
use crate::table::ListQuery;
use crate::tui::action::Action;
use crate::tui::component::Effect;
use crate::tui::component_store::ComponentStateStore;
use crate::tui::components::data_table::DataTableState;
use crate::tui::state::AppState;
use crate::tui::types::{table_path, Tab};

/// Handle all navigation-related actions
pub fn reduce_navigation(
    state: AppState,
    action: &Action,
    component_states: &mut ComponentStateStore,
) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::NavigateTab(tab) => Ok(navigate_to_tab(state, *tab, component_states)),
        Action::NavigateTabLeft => {
            let tab = state.navigation.current_tab.prev();
            Ok(navigate_to_tab(state, tab, component_states))
        }
        Action::NavigateTabRight => {
            let tab = state.navigation.current_tab.next();
            Ok(navigate_to_tab(state, tab, component_states))
        }
        Action::EnterContentFocus => Ok(enter_content_focus(state)),
        Action::ExitContentFocus => Ok(exit_content_focus(state)),
        Action::NavigateUp => Ok(navigate_up(state)),
        _ => Err(state),
    }
}

/// Switch tabs: the old tab's list and table are dropped and the new tab's
/// list is fetched from scratch
fn navigate_to_tab(
    state: AppState,
    tab: Tab,
    component_states: &mut ComponentStateStore,
) -> (AppState, Effect) {
    trace!("Navigating to tab: {:?}", tab);
    let mut new_state = state;
    let previous = new_state.navigation.current_tab;
    new_state.navigation.panel_stack.clear();
    new_state.ui.preview = None;
    new_state.navigation.content_focused = false; // Return focus to tab bar
    new_state.system.reset_status_message();

    if previous == tab {
        return (new_state, Effect::None);
    }

    let path = table_path(previous);
    if let Some(table) = component_states.get_mut::<DataTableState>(&path) {
        table.model.unmount();
    }
    component_states.remove(&path);
    new_state.data.lists.remove(&previous);
    debug!("NAV: unmounted {} table", previous);

    new_state.navigation.current_tab = tab;
    let query = ListQuery::with_size(new_state.system.config.tables.page_size);
    start_list_fetch(new_state, tab, query, component_states)
}

fn enter_content_focus(state: AppState) -> (AppState, Effect) {
    debug!("FOCUS: Entering content focus (Down key from tab bar)");
    let mut new_state = state;
    new_state.navigation.content_focused = true;
    new_state.system.reset_status_message();
    (new_state, Effect::None)
}

fn exit_content_focus(state: AppState) -> (AppState, Effect) {
    debug!("FOCUS: Exiting content focus");
    let mut new_state = state;
    new_state.navigation.content_focused = false;
    new_state.system.reset_status_message();
    (new_state, Effect::None)
}

/// ESC: close the preview if one is open, otherwise return to the tab bar
fn navigate_up(state: AppState) -> (AppState, Effect) {
    let mut new_state = state;
    if new_state.navigation.panel_stack.pop().is_some() {
        debug!("NAV: closing preview");
        new_state.ui.preview = None;
        new_state.system.reset_status_message();
        return (new_state, Effect::None);
    }
    exit_content_focus(new_state)
}
