/// Keyboard and mouse event to action mapping
///
/// Key handling is layered: an active text edit swallows printable keys,
/// then global keys, then the preview, the tab bar and finally the table.
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

use super::action::Action;
use super::component_store::ComponentStateStore;
use super::components::data_table::{DataTableMsg, DataTableState};
use super::components::preview::preview_frame;
use super::state::AppState;
use super::types::{table_path, PageStep};
use super::widgets::pointer_points;
use crate::report::PointerEvent;
use crate::types::ReportKind;

/// First screen row of preview page text: tab bar (2) plus preview heading (2)
const PREVIEW_BODY_TOP: u16 = 4;

fn table_message(state: &AppState, msg: DataTableMsg) -> Action {
    Action::ComponentMessage {
        path: table_path(state.navigation.current_tab),
        message: Box::new(msg),
    }
}

fn is_editing(state: &AppState, component_states: &ComponentStateStore) -> bool {
    state.preview_panel().is_none()
        && component_states
            .get::<DataTableState>(&table_path(state.navigation.current_tab))
            .is_some_and(|t| t.is_editing())
}

/// Keys while the search box or a filter cell captures input
fn handle_editing_keys(state: &AppState, key: KeyEvent, now: Instant) -> Option<Action> {
    let msg = match key.code {
        KeyCode::Char(c) => DataTableMsg::Input { c, at: now },
        KeyCode::Backspace => DataTableMsg::Backspace { at: now },
        KeyCode::Enter | KeyCode::Esc => DataTableMsg::FinishEdit,
        _ => return None,
    };
    Some(table_message(state, msg))
}

/// Handle global keys that work regardless of tab or focus state
fn handle_global_keys(state: &AppState, key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::RefreshList),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            ReportKind::all().get(index).copied().map(Action::NavigateTab)
        }
        KeyCode::Esc => {
            if state.preview_panel().is_some() || state.navigation.content_focused {
                Some(Action::NavigateUp)
            } else {
                debug!("KEY: ESC pressed at tab bar - ignoring (use 'q' to quit)");
                None
            }
        }
        _ => None,
    }
}

fn handle_preview_keys(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::PageDown | KeyCode::Right => Some(Action::PreviewPage(PageStep::Next)),
        KeyCode::PageUp | KeyCode::Left => Some(Action::PreviewPage(PageStep::Prev)),
        KeyCode::Home => Some(Action::PreviewPage(PageStep::First)),
        KeyCode::End => Some(Action::PreviewPage(PageStep::Last)),
        KeyCode::Down => Some(Action::PreviewScroll(1)),
        KeyCode::Up => Some(Action::PreviewScroll(-1)),
        _ => None,
    }
}

/// Handle navigation when tab bar is focused (Left/Right/Down)
fn handle_tab_bar_navigation(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Left => Some(Action::NavigateTabLeft),
        KeyCode::Right => Some(Action::NavigateTabRight),
        KeyCode::Down | KeyCode::Enter => {
            debug!("KEY: entering content focus");
            Some(Action::EnterContentFocus)
        }
        _ => None,
    }
}

fn handle_table_keys(state: &AppState, key_code: KeyCode, now: Instant) -> Option<Action> {
    let msg = match key_code {
        KeyCode::Down => DataTableMsg::FocusNextRow,
        KeyCode::Up => DataTableMsg::FocusPrevRow,
        KeyCode::Right => DataTableMsg::FocusNextColumn,
        KeyCode::Left => DataTableMsg::FocusPrevColumn,
        KeyCode::Enter => DataTableMsg::OpenFocused,
        KeyCode::Char(' ') => DataTableMsg::ToggleExpanded,
        KeyCode::Char('s') => DataTableMsg::SortFocused,
        KeyCode::Char('/') => DataTableMsg::StartSearch,
        KeyCode::Char('f') => DataTableMsg::ToggleFilterRow,
        KeyCode::Char('e') => DataTableMsg::StartFilter { at: now },
        KeyCode::Char('h') => DataTableMsg::HideFocusedColumn,
        KeyCode::Char('H') => DataTableMsg::ShowAllColumns,
        KeyCode::Char('p') => DataTableMsg::CyclePin,
        KeyCode::PageDown => DataTableMsg::NextPage,
        KeyCode::PageUp => DataTableMsg::PrevPage,
        KeyCode::Home => DataTableMsg::FirstPage,
        KeyCode::End => DataTableMsg::LastPage,
        KeyCode::Char('+') => DataTableMsg::GrowPageSize,
        KeyCode::Char('-') => DataTableMsg::ShrinkPageSize,
        _ => return None,
    };
    Some(table_message(state, msg))
}

/// Convert a key press into an action
pub fn key_to_action(
    key: KeyEvent,
    state: &AppState,
    component_states: &ComponentStateStore,
    now: Instant,
) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if is_editing(state, component_states) {
        return handle_editing_keys(state, key, now);
    }

    if let Some(action) = handle_global_keys(state, key.code) {
        return Some(action);
    }

    if state.preview_panel().is_some() {
        return handle_preview_keys(key.code);
    }

    if !state.navigation.content_focused {
        return handle_tab_bar_navigation(key.code);
    }

    handle_table_keys(state, key.code, now)
}

/// Turn left-button mouse events over the preview into stamp pointer events
///
/// A drag has to start on the stamp line of the last page; moves and the
/// release are forwarded as long as the preview stays open.
pub fn mouse_to_action(mouse: MouseEvent, state: &AppState) -> Option<Action> {
    let preview = state.ui.preview.as_ref()?;
    let report = state.data.reports.get(&(preview.kind, preview.id))?;
    let frame = preview_frame(
        report,
        preview,
        &state.system.config.print,
        &state.system.config.display.box_chars,
    );
    let stamp_line = frame.stamp_line?;
    let x = pointer_points(&frame.document, mouse.column);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let line = mouse.row.checked_sub(PREVIEW_BODY_TOP)? as usize + preview.scroll as usize;
            (line == stamp_line).then_some(Action::StampPointer(PointerEvent::Down { x }))
        }
        MouseEventKind::Drag(MouseButton::Left) => Some(Action::StampPointer(PointerEvent::Move { x })),
        MouseEventKind::Up(MouseButton::Left) => Some(Action::StampPointer(PointerEvent::Up)),
        _ => None,
    }
}
