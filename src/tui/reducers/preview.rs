use tracing::debug;

use crate::report::{DragOutcome, PointerEvent};
use crate::tui::action::Action;
use crate::tui::component::Effect;
use crate::tui::components::preview::{preview_frame, PreviewFrame};
use crate::tui::state::{AppState, PreviewState};
use crate::tui::types::{PageStep, Panel};
use crate::types::ReportKind;

/// Handle the print preview: opening, paging, scrolling and stamp drags
pub fn reduce_preview(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::OpenPreview { kind, id } => Ok(open_preview(state, *kind, *id)),
        Action::PreviewPage(step) => Ok(step_page(state, *step)),
        Action::PreviewScroll(delta) => Ok(scroll(state, *delta)),
        Action::StampPointer(event) => Ok(stamp_pointer(state, *event)),
        _ => Err(state),
    }
}

fn open_preview(state: AppState, kind: ReportKind, id: i64) -> (AppState, Effect) {
    debug!("PREVIEW: opening {} #{}", kind, id);
    let mut new_state = state;
    new_state.navigation.panel_stack.push(Panel::Preview { kind, id });
    new_state.navigation.content_focused = true;
    new_state.ui.preview = Some(PreviewState::new(kind, id));
    new_state.system.reset_status_message();
    (new_state, Effect::FetchReport { kind, id })
}

/// Frame for the open preview, once its report is loaded
fn current_frame(state: &AppState) -> Option<PreviewFrame> {
    let preview = state.ui.preview.as_ref()?;
    let report = state.data.reports.get(&(preview.kind, preview.id))?;
    Some(preview_frame(
        report,
        preview,
        &state.system.config.print,
        &state.system.config.display.box_chars,
    ))
}

fn step_page(state: AppState, step: PageStep) -> (AppState, Effect) {
    let Some(frame) = current_frame(&state) else {
        return (state, Effect::None);
    };
    let last = frame.document.last_page();
    let mut new_state = state;
    if let Some(preview) = new_state.ui.preview.as_mut() {
        let index = match step {
            PageStep::Next => (frame.page_index + 1).min(last),
            PageStep::Prev => frame.page_index.saturating_sub(1),
            PageStep::First => 0,
            PageStep::Last => last,
        };
        if index != preview.page_index {
            preview.scroll = 0;
        }
        preview.page_index = index;
    }
    (new_state, Effect::None)
}

fn scroll(state: AppState, delta: i16) -> (AppState, Effect) {
    let Some(frame) = current_frame(&state) else {
        return (state, Effect::None);
    };
    let max = frame.lines.len().saturating_sub(1) as i32;
    let mut new_state = state;
    if let Some(preview) = new_state.ui.preview.as_mut() {
        let next = (preview.scroll as i32 + delta as i32).clamp(0, max);
        preview.scroll = next as u16;
    }
    (new_state, Effect::None)
}

/// Feed a pointer event to the stamp drag; a release at a new offset saves
/// the report with that offset
fn stamp_pointer(state: AppState, event: PointerEvent) -> (AppState, Effect) {
    let Some(frame) = current_frame(&state) else {
        return (state, Effect::None);
    };
    if !frame.is_last_page() || frame.stamp_line.is_none() {
        return (state, Effect::None);
    }
    let (page_width, stamp_width) = (
        state.system.config.print.page_width_pt,
        state.system.config.print.stamp_width_pt,
    );

    let mut new_state = state;
    let Some(preview) = new_state.ui.preview.as_mut() else {
        return (new_state, Effect::None);
    };
    if preview.saving {
        return (new_state, Effect::None);
    }
    let Some(drag) = preview.drag else {
        return (new_state, Effect::None);
    };

    let (next, outcome) = drag.reduce(event, page_width, stamp_width);
    preview.drag = Some(next);
    match outcome {
        DragOutcome::Released { offset } => {
            let key = (preview.kind, preview.id);
            let Some(mut report) = new_state.data.reports.get(&key).cloned() else {
                return (new_state, Effect::None);
            };
            debug!("PREVIEW: stamp released at {:.1}pt, saving {} #{}", offset, key.0, key.1);
            report.header_mut().stamp_offset_x = offset;
            preview.saving = true;
            (new_state, Effect::SaveReport(Box::new(report)))
        }
        DragOutcome::Moved | DragOutcome::Unchanged => (new_state, Effect::None),
    }
}
