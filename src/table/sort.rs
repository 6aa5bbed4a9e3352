use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::column::TableRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Single-column sort, serialized as `<column>,<asc|desc>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    pub column: String,
    pub direction: SortDirection,
}

impl SortBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.column, self.direction.as_str())
    }
}

/// Column ids travel unencoded in the query string, so they are limited to
/// characters that never need escaping
fn is_valid_column_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = s
            .split_once(',')
            .ok_or_else(|| format!("sortBy '{}' is missing a direction", s))?;
        let column = column.trim();
        if !is_valid_column_id(column) {
            return Err(format!("invalid sort column '{}'", column));
        }
        let direction = match direction.trim().to_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(format!("invalid sort direction '{}'", other)),
        };
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }
}

/// Three-state sort cycle for a header click
///
/// unsorted → ascending → descending → unsorted. Clicking a different column
/// than the one currently sorted starts that column at ascending.
pub fn next_sort(current: Option<&SortBy>, column: &str) -> Option<SortBy> {
    match current {
        Some(sort) if sort.column == column => match sort.direction {
            SortDirection::Asc => Some(SortBy::desc(column)),
            SortDirection::Desc => None,
        },
        _ => Some(SortBy::asc(column)),
    }
}

/// Stable sort of row indices by one column
///
/// Empty cells stay at the end in both directions.
pub fn sort_indices(indices: &mut [usize], rows: &[TableRow], column: usize, direction: SortDirection) {
    indices.sort_by(|&a, &b| {
        let left = rows[a].cells.get(column);
        let right = rows[b].cells.get(column);
        match (left, right) {
            (Some(l), Some(r)) => {
                if l.is_empty() || r.is_empty() {
                    return l.compare(r);
                }
                match direction {
                    SortDirection::Asc => l.compare(r),
                    SortDirection::Desc => r.compare(l),
                }
            }
            _ => Ordering::Equal,
        }
    });
}
