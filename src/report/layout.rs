//! Print pagination with location grouping
//!
//! Report rows are laid out on pages of fixed capacity: the first page holds
//! fewer rows because it also carries the letterhead, the client block and
//! the column headers. Consecutive rows sharing a location are drawn as one
//! merged cell, recomputed per page so a run crossing a page break becomes
//! two runs.
//!
//! The pipeline is `annotate` (whole document) → `split_pages` →
//! `group_page` (per page); `paginate` runs all three. Row order never
//! changes.

/// Rows per page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCapacity {
    pub first: usize,
    pub rest: usize,
}

impl PageCapacity {
    /// Zero capacities are raised to one row so splitting always progresses
    pub fn new(first: usize, rest: usize) -> Self {
        Self {
            first: first.max(1),
            rest: rest.max(1),
        }
    }

    pub fn for_page(&self, index: usize) -> usize {
        if index == 0 {
            self.first
        } else {
            self.rest
        }
    }
}

impl Default for PageCapacity {
    fn default() -> Self {
        Self::new(20, 37)
    }
}

/// Index of the row that carries a run's label
pub fn middle_index(run_len: usize) -> usize {
    run_len.saturating_sub(1) / 2
}

/// A row after the whole-document pass
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRow<T> {
    pub record: T,
    /// One-based running number across the document
    pub serial: usize,
    /// Grouping key; None for report kinds that do not group
    pub location: Option<String>,
    /// Size of the document-wide run this row belongs to
    pub global_run_size: usize,
    pub is_global_middle: bool,
}

/// A row placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedRow<T> {
    pub row: AnnotatedRow<T>,
    /// First row of its page-local run (top border)
    pub is_page_first: bool,
    /// Last row of its page-local run (bottom border)
    pub is_page_last: bool,
    /// The row that renders the run's location text
    pub is_page_middle: bool,
    pub page_group_size: usize,
    /// Location text to draw in this row's cell; only set on the middle row
    pub group_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageChunk<T> {
    /// Zero-based page index
    pub index: usize,
    pub rows: Vec<GroupedRow<T>>,
    pub is_first: bool,
    pub is_last: bool,
}

/// Lengths of maximal runs of equal keys, in order
fn run_lengths<'a, I>(keys: I) -> Vec<usize>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut runs: Vec<usize> = Vec::new();
    let mut previous: Option<Option<&str>> = None;
    for key in keys {
        // Rows without a key never merge
        let continues = key.is_some() && previous == Some(key);
        match runs.last_mut() {
            Some(len) if continues => *len += 1,
            _ => runs.push(1),
        }
        previous = Some(key);
    }
    runs
}

/// Whole-document pass: serial numbers and document-wide runs
pub fn annotate<T, F>(records: Vec<T>, location_of: F) -> Vec<AnnotatedRow<T>>
where
    F: Fn(&T) -> Option<String>,
{
    let locations: Vec<Option<String>> = records.iter().map(&location_of).collect();
    let runs = run_lengths(locations.iter().map(|l| l.as_deref()));

    let mut run_info = Vec::with_capacity(records.len());
    for len in runs {
        let middle = middle_index(len);
        run_info.extend((0..len).map(|i| (len, i == middle)));
    }

    records
        .into_iter()
        .zip(locations)
        .zip(run_info)
        .enumerate()
        .map(|(i, ((record, location), (global_run_size, is_global_middle)))| AnnotatedRow {
            record,
            serial: i + 1,
            location,
            global_run_size,
            is_global_middle,
        })
        .collect()
}

/// Slice rows into page-sized chunks
///
/// Empty input yields one empty page so the header and footer still print.
pub fn split_pages<T>(rows: Vec<T>, capacity: PageCapacity) -> Vec<Vec<T>> {
    let mut pages = Vec::new();
    let mut rest = rows.into_iter().peekable();
    while rest.peek().is_some() {
        let take = capacity.for_page(pages.len());
        pages.push(rest.by_ref().take(take).collect::<Vec<_>>());
    }
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    pages
}

/// Page-local grouping of one chunk
pub fn group_page<T>(chunk: Vec<AnnotatedRow<T>>) -> Vec<GroupedRow<T>> {
    let runs = run_lengths(chunk.iter().map(|r| r.location.as_deref()));
    let mut positions = Vec::with_capacity(chunk.len());
    for len in runs {
        positions.extend((0..len).map(|i| (i, len)));
    }

    chunk
        .into_iter()
        .zip(positions)
        .map(|(row, (i, len))| {
            let is_page_middle = i == middle_index(len);
            let group_location = if is_page_middle {
                row.location.clone()
            } else {
                None
            };
            GroupedRow {
                row,
                is_page_first: i == 0,
                is_page_last: i + 1 == len,
                is_page_middle,
                page_group_size: len,
                group_location,
            }
        })
        .collect()
}

/// annotate → split → group
pub fn paginate<T, F>(records: Vec<T>, capacity: PageCapacity, location_of: F) -> Vec<PageChunk<T>>
where
    F: Fn(&T) -> Option<String>,
{
    let pages = split_pages(annotate(records, location_of), capacity);
    let last = pages.len() - 1;
    pages
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| PageChunk {
            index,
            rows: group_page(chunk),
            is_first: index == 0,
            is_last: index == last,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn by_location(records: &[&'static str]) -> Vec<PageChunk<&'static str>> {
        paginate(records.to_vec(), PageCapacity::default(), |r| loc(r))
    }

    fn labels<T>(page: &PageChunk<T>) -> Vec<(usize, String)> {
        page.rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.group_location.clone().map(|l| (i, l)))
            .collect()
    }

    #[test]
    fn test_middle_index_uses_lower_middle() {
        assert_eq!(middle_index(1), 0);
        assert_eq!(middle_index(2), 0);
        assert_eq!(middle_index(3), 1);
        assert_eq!(middle_index(4), 1);
        assert_eq!(middle_index(20), 9);
        assert_eq!(middle_index(25), 12);
    }

    #[test]
    fn test_split_respects_capacities() {
        let pages = split_pages((0..100).collect::<Vec<_>>(), PageCapacity::default());
        let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![20, 37, 37, 6]);

        let exact = split_pages((0..57).collect::<Vec<_>>(), PageCapacity::default());
        assert_eq!(exact.len(), 2);

        let small = split_pages(vec![1, 2, 3], PageCapacity::default());
        assert_eq!(small, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_empty_input_yields_single_empty_page() {
        let pages = by_location(&[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].rows.is_empty());
        assert!(pages[0].is_first && pages[0].is_last);
    }

    #[test]
    fn test_pages_partition_the_input() {
        let records: Vec<usize> = (0..131).collect();
        let pages = paginate(records.clone(), PageCapacity::default(), |r| {
            Some(format!("L{}", r / 7))
        });
        let flattened: Vec<usize> = pages
            .iter()
            .flat_map(|p| p.rows.iter().map(|r| r.row.record))
            .collect();
        assert_eq!(flattened, records);

        assert!(pages[0].rows.len() <= 20);
        for page in &pages[1..] {
            assert!(page.rows.len() <= 37);
        }
        for page in &pages[..pages.len() - 1] {
            let cap = PageCapacity::default().for_page(page.index);
            assert_eq!(page.rows.len(), cap);
        }
        let serials: Vec<usize> = pages
            .iter()
            .flat_map(|p| p.rows.iter().map(|r| r.row.serial))
            .collect();
        assert_eq!(serials, (1..=131).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_location_gets_one_label_per_page() {
        let records = vec!["Substation"; 45];
        let pages = by_location(&records);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].rows.len(), 20);
        assert_eq!(pages[1].rows.len(), 25);

        assert_eq!(labels(&pages[0]), vec![(9, "Substation".to_string())]);
        assert_eq!(labels(&pages[1]), vec![(12, "Substation".to_string())]);

        // Global pass saw one run of 45
        assert_eq!(pages[1].rows[0].row.global_run_size, 45);
        assert!(pages[1].rows[2].row.is_global_middle);

        assert!(pages[0].rows[0].is_page_first);
        assert!(pages[0].rows[19].is_page_last);
        assert!(pages[1].rows[0].is_page_first);
        assert!(pages[1].rows[24].is_page_last);
        assert!(pages[0].is_first && !pages[0].is_last);
        assert!(!pages[1].is_first && pages[1].is_last);
    }

    #[test]
    fn test_two_then_one_run_borders() {
        let pages = by_location(&["A", "A", "B"]);
        let rows = &pages[0].rows;

        // Two-row run: label on floor((2 - 1) / 2) = row 0
        assert!(rows[0].is_page_first && !rows[0].is_page_last);
        assert_eq!(rows[0].group_location.as_deref(), Some("A"));
        assert!(!rows[1].is_page_first && rows[1].is_page_last);
        assert_eq!(rows[1].group_location, None);
        assert_eq!(rows[1].page_group_size, 2);

        assert!(rows[2].is_page_first && rows[2].is_page_last && rows[2].is_page_middle);
        assert_eq!(rows[2].group_location.as_deref(), Some("B"));
    }

    #[test]
    fn test_isolated_row_has_both_borders() {
        let pages = by_location(&["A", "B", "A"]);
        for row in &pages[0].rows {
            assert!(row.is_page_first && row.is_page_last);
            assert_eq!(row.page_group_size, 1);
            assert!(row.group_location.is_some());
        }
    }

    #[test]
    fn test_empty_location_is_a_group_key() {
        let pages = by_location(&["", "", "Yard"]);
        assert_eq!(pages[0].rows[0].page_group_size, 2);
        assert_eq!(pages[0].rows[0].group_location.as_deref(), Some(""));
    }

    #[test]
    fn test_rows_without_location_never_merge() {
        let pages = paginate(vec![1, 2, 3], PageCapacity::default(), |_| None);
        for row in &pages[0].rows {
            assert_eq!(row.page_group_size, 1);
            assert_eq!(row.group_location, None);
        }
    }

    #[test]
    fn test_zero_capacity_still_progresses() {
        let pages = split_pages(vec![1, 2], PageCapacity::new(0, 0));
        assert_eq!(pages, vec![vec![1], vec![2]]);
    }
}
