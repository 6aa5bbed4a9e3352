/// Core type definitions used across the framework
use crate::types::ReportKind;

/// Tabs are the report kinds, in `ReportKind::all()` order
pub type Tab = ReportKind;

/// Drill-down views pushed over a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Preview { kind: ReportKind, id: i64 },
}

impl Panel {
    /// Get the display label for this panel (for breadcrumbs)
    pub fn label(&self) -> String {
        match self {
            Self::Preview { kind, id } => format!("{} #{}", kind.label(), id),
        }
    }
}

/// Direction for stepping through print pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    Next,
    Prev,
    First,
    Last,
}

/// Component store path of the data table hosted by a tab
pub fn table_path(kind: ReportKind) -> String {
    format!("app/{}/table", kind.slug())
}
