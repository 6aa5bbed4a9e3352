use std::fmt;

/// Page sizes offered by the page-size selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    Twenty,
    Thirty,
    Forty,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 6] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Thirty,
        PageSize::Forty,
        PageSize::Fifty,
    ];

    pub fn value(self) -> usize {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Thirty => 30,
            Self::Forty => 40,
            Self::Fifty => 50,
        }
    }

    /// Smallest choice holding at least `n` rows, capped at fifty
    pub fn at_least(n: usize) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|size| size.value() >= n)
            .unwrap_or(Self::Fifty)
    }

    /// Exact choice for `n`, if `n` is one of the offered sizes
    pub fn from_value(n: usize) -> Option<Self> {
        Self::ALL.iter().copied().find(|size| size.value() == n)
    }

    pub fn next(self) -> Self {
        let i = self.index();
        Self::ALL[(i + 1).min(Self::ALL.len() - 1)]
    }

    pub fn prev(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Number of pages needed for `rows` rows; never less than one
pub fn page_count(rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    rows.div_ceil(page_size).max(1)
}

/// Rescale a page index when the page size changes so the first row of the
/// old page stays on screen
pub fn rescale_page_index(page_index: usize, old_size: usize, new_size: usize) -> usize {
    if new_size == 0 {
        return 0;
    }
    (page_index * old_size) / new_size
}

/// Enabled state of the first/prev/next/last controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationControls {
    pub can_first: bool,
    pub can_prev: bool,
    pub can_next: bool,
    pub can_last: bool,
    /// Zero-based current page
    pub page_index: usize,
    pub page_count: usize,
    /// Rows across all pages (after filtering in client mode)
    pub total_rows: usize,
}

impl PaginationControls {
    /// Controls for a server-driven table, from the response metadata
    pub fn server(current_page: usize, total_pages: usize, total_elements: usize) -> Self {
        let can_prev = current_page > 0;
        let can_next = current_page + 1 < total_pages;
        Self {
            can_first: can_prev,
            can_prev,
            can_next,
            can_last: can_next,
            page_index: current_page,
            page_count: total_pages,
            total_rows: total_elements,
        }
    }

    /// Controls for a client-driven table
    pub fn client(page_index: usize, page_count: usize, total_rows: usize) -> Self {
        let can_prev = page_index > 0;
        let can_next = page_index + 1 < page_count;
        Self {
            can_first: can_prev,
            can_prev,
            can_next,
            can_last: can_next,
            page_index,
            page_count,
            total_rows,
        }
    }

    /// "Page X of Y" with a one-based page number
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least_rounds_up_to_allowed_size() {
        assert_eq!(PageSize::at_least(0), PageSize::Five);
        assert_eq!(PageSize::at_least(10), PageSize::Ten);
        assert_eq!(PageSize::at_least(25), PageSize::Thirty);
        assert_eq!(PageSize::at_least(500), PageSize::Fifty);
    }

    #[test]
    fn test_next_prev_saturate() {
        assert_eq!(PageSize::Five.prev(), PageSize::Five);
        assert_eq!(PageSize::Five.next(), PageSize::Ten);
        assert_eq!(PageSize::Fifty.next(), PageSize::Fifty);
        assert_eq!(PageSize::from_value(40), Some(PageSize::Forty));
        assert_eq!(PageSize::from_value(15), None);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }

    #[test]
    fn test_rescale_page_index() {
        // Page 3 at size 10 starts at row 30; at size 20 that row is on page 1
        assert_eq!(rescale_page_index(3, 10, 20), 1);
        assert_eq!(rescale_page_index(1, 20, 5), 4);
        assert_eq!(rescale_page_index(0, 50, 5), 0);
    }

    #[test]
    fn test_server_controls_from_metadata() {
        let first = PaginationControls::server(0, 3, 25);
        assert!(!first.can_prev && !first.can_first);
        assert!(first.can_next && first.can_last);

        let last = PaginationControls::server(2, 3, 25);
        assert!(last.can_prev);
        assert!(!last.can_next);
        assert_eq!(last.label(), "Page 3 of 3");

        let empty = PaginationControls::server(0, 0, 0);
        assert!(!empty.can_next && !empty.can_prev);
        assert_eq!(empty.label(), "Page 1 of 1");
    }
}
