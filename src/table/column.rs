/// Column and cell types for the generic data table
///
/// - CellValue: typed cell content (text, number, date, empty)
/// - ColumnDef: column definition with cell extraction function
/// - ColumnMeta: the closure-free part of a column, kept by the table model
/// - TableRow: one record flattened into cells
use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

/// Value types that can appear in table cells
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }

    pub fn number(value: Option<f64>) -> Self {
        value.map(Self::Number).unwrap_or(Self::Empty)
    }

    pub fn date(value: Option<NaiveDate>) -> Self {
        value.map(Self::Date).unwrap_or(Self::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get the display text for this cell
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format!("{}", n),
            Self::Date(d) => d.format("%d/%m/%Y").to_string(),
            Self::Empty => String::new(),
        }
    }

    /// Ordering used by client-side sorting
    ///
    /// Empty cells compare greater than everything so that an ascending sort
    /// puts them last; callers keep them last for descending sorts too.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::Empty, _) => Ordering::Greater,
            (_, Self::Empty) => Ordering::Less,
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (a, b) => a
                .display_text()
                .to_lowercase()
                .cmp(&b.display_text().to_lowercase()),
        }
    }
}

/// Text alignment for table cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// How a column's filter input behaves
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterVariant {
    /// Free-text contains match
    #[default]
    Search,
    /// Pick one of a fixed set of options
    Select(Vec<String>),
    /// Numeric min/max bounds
    Range,
}

/// Edge a column can be pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    Left,
    Right,
}

/// Static column configuration without the extraction closures
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    /// Accessor key; also the `sortBy` column id on the wire
    pub id: String,
    pub header: String,
    pub width: usize,
    pub align: Alignment,
    pub filter: FilterVariant,
    pub sortable: bool,
}

/// Column definition for a table
///
/// Defines how to extract and display a column's data from row items.
///
/// # Example
/// ```ignore
/// let columns = vec![
///     ColumnDef::new("reportNo", "Report No", 12, Alignment::Left, |r: &AcbReport| {
///         CellValue::text(&r.header.report_no)
///     })
///     .with_expanded(|r| r.header.note.clone()),
///     ColumnDef::new("ratedCurrentA", "Rating (A)", 10, Alignment::Right, |r: &AcbReport| {
///         CellValue::number(r.rated_current_a)
///     })
///     .with_filter(FilterVariant::Range),
/// ];
/// ```
pub struct ColumnDef<T> {
    pub meta: ColumnMeta,

    /// Function to extract cell value from row data
    pub cell_fn: Box<dyn Fn(&T) -> CellValue + Send + Sync>,

    /// Content shown in the extra row under an expanded row; rows for
    /// which this returns None cannot be expanded
    pub expanded_fn: Option<Box<dyn Fn(&T) -> Option<String> + Send + Sync>>,
}

impl<T> ColumnDef<T> {
    pub fn new<F>(
        id: impl Into<String>,
        header: impl Into<String>,
        width: usize,
        align: Alignment,
        cell_fn: F,
    ) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self {
            meta: ColumnMeta {
                id: id.into(),
                header: header.into(),
                width,
                align,
                filter: FilterVariant::Search,
                sortable: true,
            },
            cell_fn: Box::new(cell_fn),
            expanded_fn: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterVariant) -> Self {
        self.meta.filter = filter;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.meta.sortable = false;
        self
    }

    pub fn with_expanded<F>(mut self, expanded_fn: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.expanded_fn = Some(Box::new(expanded_fn));
        self
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("meta", &self.meta)
            .field("expandable", &self.expanded_fn.is_some())
            .finish()
    }
}

/// One record flattened into cells, in column definition order
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Stable identity used for expansion and focus
    pub key: String,
    pub cells: Vec<CellValue>,
    pub expanded: Option<String>,
}

pub fn column_metas<T>(columns: &[ColumnDef<T>]) -> Vec<ColumnMeta> {
    columns.iter().map(|c| c.meta.clone()).collect()
}

/// Extract all cell data upfront from the records using the column definitions
pub fn extract_rows<T, K>(columns: &[ColumnDef<T>], records: &[T], key_fn: K) -> Vec<TableRow>
where
    K: Fn(&T, usize) -> String,
{
    records
        .iter()
        .enumerate()
        .map(|(i, record)| TableRow {
            key: key_fn(record, i),
            cells: columns.iter().map(|col| (col.cell_fn)(record)).collect(),
            expanded: columns
                .iter()
                .filter_map(|col| col.expanded_fn.as_ref())
                .find_map(|f| f(record))
                .filter(|content| !content.trim().is_empty()),
        })
        .collect()
}
