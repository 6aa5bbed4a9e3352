use std::any::Any;
use std::time::Instant;

use super::component::Effect;
use super::types::{PageStep, Tab};
use crate::report::PointerEvent;
use crate::table::ListQuery;
use crate::types::{AnyReport, PageEnvelope, ReportKind};

/// Trait for type-erased component messages
///
/// This allows messages to be dispatched to components without knowing
/// their concrete type at the call site. The message carries its own
/// logic for updating component state.
pub trait ComponentMessageTrait: Send + Sync + std::fmt::Debug {
    /// Apply this message to a component state, returning an effect
    fn apply(&self, state: &mut dyn Any) -> Effect;

    /// Clone this message into a Box (for cloning Action enum)
    fn clone_box(&self) -> Box<dyn ComponentMessageTrait>;
}

/// Rows delivered for one list fetch
#[derive(Debug, Clone, PartialEq)]
pub enum ListPayload {
    /// One server page with its pagination metadata
    Page(PageEnvelope<AnyReport>),
    /// Every record, for client-side paging
    All(Vec<AnyReport>),
}

impl ListPayload {
    pub fn records(&self) -> &[AnyReport] {
        match self {
            Self::Page(page) => &page.content,
            Self::All(records) => records,
        }
    }
}

/// Global actions - like Redux actions
///
/// All state changes in the application happen through actions.
/// Actions are dispatched from:
/// - User input (key and mouse events)
/// - Effects (async data loading)
/// - The render loop (ticks)
#[derive(Debug)]
pub enum Action {
    // Navigation actions
    NavigateTab(Tab),
    NavigateTabLeft,
    NavigateTabRight,
    EnterContentFocus, // Down key: move focus from tab bar to content
    ExitContentFocus,
    /// ESC: close the preview, else leave content focus
    NavigateUp,

    /// A server-driven table asked for a new query
    Navigate { kind: ReportKind, query: ListQuery },
    RefreshList,

    // Data loaded (from effects)
    ListLoaded {
        kind: ReportKind,
        /// Query the fetch was made with; `None` for a full list
        query: Option<ListQuery>,
        result: Result<ListPayload, String>,
    },
    ReportLoaded {
        kind: ReportKind,
        id: i64,
        result: Result<AnyReport, String>,
    },
    ReportSaved {
        kind: ReportKind,
        id: i64,
        result: Result<AnyReport, String>,
    },

    // Preview actions
    OpenPreview { kind: ReportKind, id: i64 },
    PreviewPage(PageStep),
    PreviewScroll(i16),
    StampPointer(PointerEvent),

    /// Dispatch a message to a specific component
    ComponentMessage {
        /// Component path (e.g., "app/acb/table")
        path: String,
        /// Type-erased message to dispatch
        message: Box<dyn ComponentMessageTrait>,
    },

    /// Advance debouncers and loading windows
    Tick(Instant),

    // System actions
    Quit,
    SetStatusMessage { message: String, is_error: bool },
}

impl Clone for Action {
    fn clone(&self) -> Self {
        match self {
            Self::NavigateTab(tab) => Self::NavigateTab(*tab),
            Self::NavigateTabLeft => Self::NavigateTabLeft,
            Self::NavigateTabRight => Self::NavigateTabRight,
            Self::EnterContentFocus => Self::EnterContentFocus,
            Self::ExitContentFocus => Self::ExitContentFocus,
            Self::NavigateUp => Self::NavigateUp,
            Self::Navigate { kind, query } => Self::Navigate {
                kind: *kind,
                query: query.clone(),
            },
            Self::RefreshList => Self::RefreshList,
            Self::ListLoaded { kind, query, result } => Self::ListLoaded {
                kind: *kind,
                query: query.clone(),
                result: result.clone(),
            },
            Self::ReportLoaded { kind, id, result } => Self::ReportLoaded {
                kind: *kind,
                id: *id,
                result: result.clone(),
            },
            Self::ReportSaved { kind, id, result } => Self::ReportSaved {
                kind: *kind,
                id: *id,
                result: result.clone(),
            },
            Self::OpenPreview { kind, id } => Self::OpenPreview { kind: *kind, id: *id },
            Self::PreviewPage(step) => Self::PreviewPage(*step),
            Self::PreviewScroll(delta) => Self::PreviewScroll(*delta),
            Self::StampPointer(event) => Self::StampPointer(*event),
            Self::ComponentMessage { path, message } => Self::ComponentMessage {
                path: path.clone(),
                message: message.clone_box(),
            },
            Self::Tick(now) => Self::Tick(*now),
            Self::Quit => Self::Quit,
            Self::SetStatusMessage { message, is_error } => Self::SetStatusMessage {
                message: message.clone(),
                is_error: *is_error,
            },
        }
    }
}

impl Action {
    /// Ticks fire continuously and are kept out of trace logs
    pub fn is_tick(&self) -> bool {
        matches!(self, Self::Tick(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_is_tick() {
        assert!(Action::Tick(Instant::now()).is_tick());
        assert!(!Action::RefreshList.is_tick());
        assert!(!Action::Quit.is_tick());
    }

    #[test]
    fn test_payload_records() {
        let records = fixtures::reports(ReportKind::Acb);
        let all = ListPayload::All(records.clone());
        assert_eq!(all.records().len(), records.len());
    }

    #[test]
    fn test_clone_keeps_payload() {
        let action = Action::ReportLoaded {
            kind: ReportKind::OilFiltration,
            id: 3,
            result: Err("boom".to_string()),
        };
        match action.clone() {
            Action::ReportLoaded { kind, id, result } => {
                assert_eq!(kind, ReportKind::OilFiltration);
                assert_eq!(id, 3);
                assert_eq!(result, Err("boom".to_string()));
            }
            other => panic!("unexpected clone {:?}", other),
        }
    }
}
