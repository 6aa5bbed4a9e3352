/// Client-side row filtering
///
/// The global filter is a case-insensitive substring match over every cell
/// of a row. Column filters depend on the column's `FilterVariant`.
use std::time::{Duration, Instant};

use super::column::{CellValue, FilterVariant, TableRow};
use super::timing::Debounced;

/// Applied filter for one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Case-insensitive contains
    Text(String),
    /// Exact (case-insensitive) match against one option
    Select(String),
    /// Inclusive numeric bounds; either side may be open
    Range { min: Option<f64>, max: Option<f64> },
}

impl ColumnFilter {
    pub fn is_active(&self) -> bool {
        match self {
            Self::Text(text) | Self::Select(text) => !text.trim().is_empty(),
            Self::Range { min, max } => min.is_some() || max.is_some(),
        }
    }

    pub fn matches(&self, cell: &CellValue) -> bool {
        if !self.is_active() {
            return true;
        }
        match self {
            Self::Text(needle) => contains_ignore_case(&cell.display_text(), needle.trim()),
            Self::Select(option) => cell.display_text().eq_ignore_ascii_case(option.trim()),
            Self::Range { min, max } => match cell.as_number() {
                Some(value) => {
                    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
                }
                None => false,
            },
        }
    }

    /// Short form shown in the filter row
    pub fn summary(&self) -> String {
        match self {
            Self::Text(text) | Self::Select(text) => text.clone(),
            Self::Range { min, max } => format_range(*min, *max),
        }
    }
}

/// Edit state of one column filter
///
/// Text and range inputs are debounced; a select applies immediately. The
/// two sides of a range debounce independently.
#[derive(Debug, Clone)]
pub enum ColumnFilterState {
    Text(Debounced<String>),
    Select(Option<String>),
    Range {
        min: Debounced<Option<f64>>,
        max: Debounced<Option<f64>>,
    },
}

/// Numeric bounds of a range filter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSide {
    Min,
    Max,
}

impl ColumnFilterState {
    pub fn for_variant(variant: &FilterVariant, delay: Duration) -> Self {
        match variant {
            FilterVariant::Search => Self::Text(Debounced::new(String::new(), delay)),
            FilterVariant::Select(_) => Self::Select(None),
            FilterVariant::Range => Self::Range {
                min: Debounced::new(None, delay),
                max: Debounced::new(None, delay),
            },
        }
    }

    /// Feed raw input text; returns true when the applied filter changed
    /// immediately (select filters)
    ///
    /// Range input is split into its bounds and only a side whose value
    /// changed restarts its quiet period.
    pub fn input(&mut self, raw: &str, now: Instant) -> bool {
        match self {
            Self::Text(text) => {
                text.input(raw.to_string(), now);
                false
            }
            Self::Select(selected) => {
                let next = Some(raw.trim().to_string()).filter(|s| !s.is_empty());
                let changed = *selected != next;
                *selected = next;
                changed
            }
            Self::Range { .. } => {
                let RangeBounds { min, max } = parse_range(raw);
                self.input_bound(RangeSide::Min, min, now);
                self.input_bound(RangeSide::Max, max, now);
                false
            }
        }
    }

    /// Edit one side of a range filter; other variants ignore it
    pub fn input_bound(&mut self, side: RangeSide, value: Option<f64>, now: Instant) {
        if let Self::Range { min, max } = self {
            let bound = match side {
                RangeSide::Min => min,
                RangeSide::Max => max,
            };
            if *bound.current() != value {
                bound.input(value, now);
            }
        }
    }

    /// Apply matured debounces; returns true when the applied filter changed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self {
            Self::Text(text) => text.poll(now),
            Self::Select(_) => false,
            Self::Range { min, max } => {
                let min_changed = min.poll(now);
                let max_changed = max.poll(now);
                min_changed || max_changed
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            Self::Text(text) => text.is_pending(),
            Self::Select(_) => false,
            Self::Range { min, max } => min.is_pending() || max.is_pending(),
        }
    }

    /// Drop pending input without applying it
    pub fn cancel(&mut self) {
        match self {
            Self::Text(text) => text.cancel(),
            Self::Select(_) => {}
            Self::Range { min, max } => {
                min.cancel();
                max.cancel();
            }
        }
    }

    pub fn applied(&self) -> ColumnFilter {
        match self {
            Self::Text(text) => ColumnFilter::Text(text.applied().clone()),
            Self::Select(selected) => ColumnFilter::Select(selected.clone().unwrap_or_default()),
            Self::Range { min, max } => ColumnFilter::Range {
                min: *min.applied(),
                max: *max.applied(),
            },
        }
    }

    /// What the filter row shows, including not-yet-applied input
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.current().clone(),
            Self::Select(selected) => selected.clone().unwrap_or_default(),
            Self::Range { min, max } => format_range(*min.current(), *max.current()),
        }
    }
}

/// Parse `min..max`, `min..`, `..max` or a single number (exact match)
///
/// Unparseable bounds are treated as open.
pub fn parse_range(raw: &str) -> RangeBounds {
    let parse = |s: &str| s.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    match raw.split_once("..") {
        Some((min, max)) => RangeBounds {
            min: parse(min),
            max: parse(max),
        },
        None => {
            let value = parse(raw);
            RangeBounds { min: value, max: value }
        }
    }
}

fn format_range(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (None, None) => String::new(),
        (Some(min), Some(max)) if min == max => format!("{}", min),
        (min, max) => format!(
            "{}..{}",
            min.map(|v| v.to_string()).unwrap_or_default(),
            max.map(|v| v.to_string()).unwrap_or_default()
        ),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Global filter: any cell contains the needle
pub fn row_matches_global(row: &TableRow, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    row.cells
        .iter()
        .any(|cell| cell.display_text().to_lowercase().contains(&needle))
}

/// Every active column filter matches its cell
pub fn row_matches_columns(row: &TableRow, filters: &[(usize, ColumnFilter)]) -> bool {
    filters.iter().all(|(column, filter)| {
        row.cells
            .get(*column)
            .map_or(false, |cell| filter.matches(cell))
    })
}
