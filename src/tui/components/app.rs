use std::time::Instant;

use tracing::trace;

use super::data_table::{DataTable, DataTableProps};
use super::preview::{ReportPreview, ReportPreviewProps};
use crate::tui::component::{vertical, Component, Constraint, Element};
use crate::tui::component_store::ComponentStateStore;
use crate::tui::state::{
    AppState, DEFAULT_STATUS_MESSAGE, PREVIEW_STATUS_MESSAGE, TABLE_STATUS_MESSAGE,
};
use crate::tui::types::table_path;
use crate::tui::widgets::{StatusBar, TabBar};

/// Root App component
///
/// Tab bar on top, the active tab's table (or the open preview) in the
/// middle and the status bar at the bottom.
pub struct App;

#[derive(Clone)]
pub struct AppProps {
    pub tab_bar: TabBar,
    pub content: Element,
    pub status: StatusBar,
}

impl AppProps {
    /// Gather props from global state; mounts the active table on first use
    pub fn build(state: &AppState, store: &mut ComponentStateStore, now: Instant) -> Self {
        let tab = state.navigation.current_tab;
        trace!(
            "APP: building frame for {} (panels={})",
            tab,
            state.navigation.panel_stack.len()
        );

        let content = match (state.preview_panel(), &state.ui.preview) {
            (Some((kind, id)), Some(preview)) => ReportPreview.view(
                &ReportPreviewProps {
                    preview: preview.clone(),
                    report: state.data.reports.get(&(kind, id)).cloned(),
                    print: state.system.config.print.clone(),
                    box_chars: state.system.config.display.box_chars.clone(),
                },
                &(),
            ),
            _ => {
                let props = DataTableProps::from_state(state, tab, now);
                let table = store.get_or_init::<DataTable>(&table_path(tab), &props);
                DataTable.view(&props, table)
            }
        };

        Self {
            tab_bar: TabBar::new(tab, !state.navigation.content_focused),
            content,
            status: status_bar(state),
        }
    }
}

fn status_bar(state: &AppState) -> StatusBar {
    let system = &state.system;
    let message = match &system.status_message {
        Some(message) => message.clone(),
        None if state.preview_panel().is_some() => PREVIEW_STATUS_MESSAGE.to_string(),
        None if state.navigation.content_focused => TABLE_STATUS_MESSAGE.to_string(),
        None => DEFAULT_STATUS_MESSAGE.to_string(),
    };
    let tab = state.navigation.current_tab;
    let hint = if state.ui.preview.as_ref().is_some_and(|p| p.saving) {
        "saving".to_string()
    } else if system.config.tables.is_server_paged(tab) {
        "server paging".to_string()
    } else {
        "client paging".to_string()
    };
    StatusBar::new(message, system.status_is_error, hint)
}

impl Component for App {
    type Props = AppProps;
    type State = ();

    fn init(_props: &Self::Props) -> Self::State {}

    fn view(&self, props: &Self::Props, _state: &Self::State) -> Element {
        vertical(
            [
                Constraint::Length(2), // TabBar (labels + rule)
                Constraint::Min(0),    // Table or preview
                Constraint::Length(2), // StatusBar (rule + message)
            ],
            vec![
                Element::Widget(Box::new(props.tab_bar.clone())),
                props.content.clone(),
                Element::Widget(Box::new(props.status.clone())),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::component::ContainerLayout;
    use crate::tui::components::data_table::DataTableState;
    use crate::tui::state::PreviewState;
    use crate::tui::testing::create_state;
    use crate::tui::types::Panel;
    use crate::types::ReportKind;

    #[test]
    fn test_layout_has_three_rows() {
        let state = create_state();
        let mut store = ComponentStateStore::new();
        let props = AppProps::build(&state, &mut store, Instant::now());
        match App.view(&props, &()) {
            Element::Container { children, layout } => {
                assert_eq!(children.len(), 3);
                assert_eq!(
                    layout,
                    ContainerLayout::Vertical(vec![
                        Constraint::Length(2),
                        Constraint::Min(0),
                        Constraint::Length(2),
                    ])
                );
            }
            _ => panic!("Expected Container element"),
        }
    }

    #[test]
    fn test_table_mounted_for_active_tab() {
        let state = create_state();
        let mut store = ComponentStateStore::new();
        AppProps::build(&state, &mut store, Instant::now());
        let table = store.get::<DataTableState>(&table_path(ReportKind::Acb));
        assert!(table.is_some_and(|t| t.model.is_server_paged()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_preview_replaces_table() {
        let mut state = create_state();
        state
            .navigation
            .panel_stack
            .push(Panel::Preview { kind: ReportKind::Acb, id: 5 });
        state.ui.preview = Some(PreviewState::new(ReportKind::Acb, 5));
        let mut store = ComponentStateStore::new();
        AppProps::build(&state, &mut store, Instant::now());
        assert!(store.is_empty());
    }

    #[test]
    fn test_status_hint_reflects_mode() {
        let mut state = create_state();
        assert_eq!(status_bar(&state).hint, "server paging");
        state.navigation.current_tab = ReportKind::OilFiltration;
        assert_eq!(status_bar(&state).hint, "client paging");
        state.system.set_status_error_message("boom".to_string());
        let bar = status_bar(&state);
        assert!(bar.is_error);
        assert_eq!(bar.message, "boom");
    }
}
