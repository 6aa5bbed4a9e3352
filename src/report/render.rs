//! Plain-text rendering of a `ReportDocument`
//!
//! Borders are decided per cell so a merged location run shows a single
//! label with no separators inside it. Pages are joined with form feeds.
use unicode_width::UnicodeWidthStr;

use super::document::{
    signature_agency, PrintCell, PrintPage, ReportDocument, AGENCY_TAGLINE, SIGNATURE_CLIENT,
};
use crate::formatting::{fit_cell, BoxChars};
use crate::table::Alignment;
use crate::types::AGENCY_NAME;

pub const PAGE_BREAK: char = '\x0c';
pub const STAMP_LABEL: &str = "[ STAMP ]";

/// Text width of the table (and of every page line)
pub fn table_width(doc: &ReportDocument) -> usize {
    doc.columns.iter().map(|c| c.width + 3).sum::<usize>() + 1
}

/// Points per text column, for mapping pointer columns onto the page
pub fn points_per_column(doc: &ReportDocument) -> f32 {
    doc.page_width / table_width(doc).max(1) as f32
}

/// Text column where a stamp at `offset` points starts
pub fn stamp_column(doc: &ReportDocument, offset: f32) -> usize {
    let free_cols = table_width(doc).saturating_sub(STAMP_LABEL.width());
    let free_pts = (doc.page_width - doc.stamp_width).max(0.0);
    if free_pts <= 0.0 {
        return 0;
    }
    let ratio = (offset / free_pts).clamp(0.0, 1.0);
    (ratio * free_cols as f32).round() as usize
}

pub fn render_text(doc: &ReportDocument, box_chars: &BoxChars) -> String {
    doc.pages
        .iter()
        .map(|page| render_page(doc, page, box_chars).join("\n"))
        .collect::<Vec<_>>()
        .join(&format!("\n{}", PAGE_BREAK))
}

/// Lines of one page, optionally with the stamp at a different offset
pub fn render_page(doc: &ReportDocument, page: &PrintPage, box_chars: &BoxChars) -> Vec<String> {
    render_page_with_stamp(doc, page, box_chars, page.stamp_x)
}

pub fn render_page_with_stamp(
    doc: &ReportDocument,
    page: &PrintPage,
    box_chars: &BoxChars,
    stamp_x: Option<f32>,
) -> Vec<String> {
    let width = table_width(doc);
    let mut lines = Vec::new();

    if page.show_header {
        lines.push(fit_cell(AGENCY_NAME, width, Alignment::Center));
        lines.push(fit_cell(AGENCY_TAGLINE, width, Alignment::Center));
        lines.push(box_chars.double_horizontal.repeat(width));
        lines.push(fit_cell(&doc.title.to_uppercase(), width, Alignment::Center));
        lines.push(String::new());
        lines.extend(metadata_lines(doc, width));
        lines.push(String::new());
        lines.push(rule(doc, box_chars, Edge::Top, &[]));
        lines.push(content_line(
            doc,
            box_chars,
            doc.columns.iter().map(|c| c.header.as_str()).collect(),
        ));
        lines.push(rule(doc, box_chars, Edge::Inner, &vec![true; doc.columns.len()]));
    } else {
        lines.push(rule(doc, box_chars, Edge::Top, &[]));
    }

    for (i, row) in page.rows.iter().enumerate() {
        lines.push(content_line(
            doc,
            box_chars,
            row.cells.iter().map(|c| c.text.as_str()).collect(),
        ));
        match page.rows.get(i + 1) {
            Some(next) => {
                let separators = separators(&row.cells, &next.cells);
                lines.push(rule(doc, box_chars, Edge::Inner, &separators));
            }
            None => lines.push(rule(doc, box_chars, Edge::Bottom, &[])),
        }
    }

    if page.rows.is_empty() && !page.show_header {
        lines.push(rule(doc, box_chars, Edge::Bottom, &[]));
    } else if page.rows.is_empty() {
        lines.pop();
        lines.push(rule(doc, box_chars, Edge::Bottom, &[]));
    }

    if page.show_footer {
        if let Some(note) = &doc.note {
            lines.push(String::new());
            lines.push(format!("Note: {}", note));
        }
        lines.push(String::new());
        lines.push(String::new());
        let agency = signature_agency();
        let gap = width.saturating_sub(SIGNATURE_CLIENT.width() + agency.width());
        lines.push(format!("{}{}{}", SIGNATURE_CLIENT, " ".repeat(gap), agency));
        if let Some(x) = stamp_x {
            lines.push(String::new());
            lines.push(format!("{}{}", " ".repeat(stamp_column(doc, x)), STAMP_LABEL));
        }
    }

    lines.push(String::new());
    lines.push(fit_cell(
        &format!("Page {} of {}", page.number, doc.page_count()),
        width,
        Alignment::Right,
    ));
    lines
}

fn metadata_lines(doc: &ReportDocument, width: usize) -> Vec<String> {
    let half = width / 2;
    doc.metadata
        .chunks(2)
        .map(|pair| {
            let cell = |(label, value): &(String, String)| format!("{}: {}", label, value);
            match pair {
                [left, right] => format!("{}{}", fit_cell(&cell(left), half, Alignment::Left), cell(right)),
                [only] => cell(only),
                _ => String::new(),
            }
        })
        .collect()
}

/// Which columns get a horizontal line between two rows
fn separators(above: &[PrintCell], below: &[PrintCell]) -> Vec<bool> {
    above
        .iter()
        .zip(below)
        .map(|(a, b)| a.bottom_border || b.top_border)
        .collect()
}

#[derive(Clone, Copy, PartialEq)]
enum Edge {
    Top,
    Inner,
    Bottom,
}

fn rule(doc: &ReportDocument, box_chars: &BoxChars, edge: Edge, separators: &[bool]) -> String {
    let lined = |i: usize| edge != Edge::Inner || separators.get(i).copied().unwrap_or(true);
    let mut line = String::new();

    let n = doc.columns.len();
    for (i, column) in doc.columns.iter().enumerate() {
        let joint = if i == 0 {
            match edge {
                Edge::Top => &box_chars.top_left,
                Edge::Bottom => &box_chars.bottom_left,
                Edge::Inner if lined(0) => &box_chars.left_junction,
                Edge::Inner => &box_chars.vertical,
            }
        } else {
            match edge {
                Edge::Top => &box_chars.top_junction,
                Edge::Bottom => &box_chars.bottom_junction,
                Edge::Inner => match (lined(i - 1), lined(i)) {
                    (true, true) => &box_chars.cross,
                    (true, false) => &box_chars.right_junction,
                    (false, true) => &box_chars.left_junction,
                    (false, false) => &box_chars.vertical,
                },
            }
        };
        line.push_str(joint);
        let fill = if lined(i) { box_chars.horizontal.as_str() } else { " " };
        line.push_str(&fill.repeat(column.width + 2));
    }

    let end = match edge {
        Edge::Top => &box_chars.top_right,
        Edge::Bottom => &box_chars.bottom_right,
        Edge::Inner if n > 0 && lined(n - 1) => &box_chars.right_junction,
        Edge::Inner => &box_chars.vertical,
    };
    line.push_str(end);
    line
}

fn content_line(doc: &ReportDocument, box_chars: &BoxChars, texts: Vec<&str>) -> String {
    let mut line = String::new();
    for (column, text) in doc.columns.iter().zip(texts) {
        line.push_str(&box_chars.vertical);
        line.push(' ');
        line.push_str(&fit_cell(text, column.width, column.align));
        line.push(' ');
    }
    line.push_str(&box_chars.vertical);
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrintConfig;
    use crate::fixtures;
    use crate::types::AnyReport;

    fn earth_doc(locations: &[&str]) -> ReportDocument {
        let report = AnyReport::EarthTest(fixtures::earth_test_report(1, locations));
        ReportDocument::build(&report, &PrintConfig::default())
    }

    #[test]
    fn test_lines_share_table_width() {
        let doc = earth_doc(&["A", "A", "B"]);
        let lines = render_page(&doc, &doc.pages[0], &BoxChars::ascii());
        let width = table_width(&doc);
        for line in lines.iter().filter(|l| l.starts_with('|') || l.starts_with('+')) {
            assert_eq!(line.width(), width, "line: {}", line);
        }
    }

    #[test]
    fn test_merged_location_has_no_inner_separator() {
        let doc = earth_doc(&["A", "A", "B"]);
        let lines = render_page(&doc, &doc.pages[0], &BoxChars::ascii());
        let first_row = lines
            .iter()
            .position(|l| l.starts_with("|    1 |"))
            .expect("first row rendered");

        // Between rows 1 and 2 the location segment stays open
        let separator = &lines[first_row + 1];
        let location_segment = &separator[8..8 + 18];
        assert!(location_segment.trim().is_empty(), "separator: {}", separator);

        // Between rows 2 and 3 the location column closes
        let closing = &lines[first_row + 3];
        assert!(closing[8..8 + 18].chars().all(|c| c == '-'));
    }

    #[test]
    fn test_merged_cell_edges_use_t_junctions() {
        let doc = earth_doc(&["A", "A", "B"]);
        let lines = render_page(&doc, &doc.pages[0], &BoxChars::unicode());
        let first_row = lines
            .iter()
            .position(|l| l.starts_with("│    1 │"))
            .expect("first row rendered");

        let open: Vec<char> = lines[first_row + 1].chars().collect();
        assert_eq!(open[0], '├');
        assert_eq!(open[7], '┤');
        assert_eq!(open[26], '├');

        let closed: Vec<char> = lines[first_row + 3].chars().collect();
        assert_eq!(closed[7], '┼');
        assert_eq!(closed[26], '┼');
    }

    #[test]
    fn test_pages_separated_by_form_feed() {
        let doc = earth_doc(&vec!["Yard"; 45]);
        let text = render_text(&doc, &BoxChars::unicode());
        assert_eq!(text.matches(PAGE_BREAK).count(), 1);
        assert_eq!(text.matches(AGENCY_NAME).count(), 2); // letterhead + signature
        assert!(text.contains("Page 2 of 2"));
        assert!(text.contains(STAMP_LABEL));
    }

    #[test]
    fn test_stamp_column_tracks_offset() {
        let doc = earth_doc(&["A"]);
        let free = table_width(&doc) - STAMP_LABEL.width();
        assert_eq!(stamp_column(&doc, 0.0), 0);
        assert_eq!(stamp_column(&doc, 400.0), free);
        assert_eq!(stamp_column(&doc, 10_000.0), free);
    }
}
