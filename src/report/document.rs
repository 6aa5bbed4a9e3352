//! Print document model for a single report
//!
//! `ReportDocument::build` turns a record into letterhead metadata, a column
//! set and laid-out pages. Rendering (text or terminal) reads this model and
//! never re-derives the layout.
use tracing::debug;

use super::layout::{paginate, PageChunk};
use super::stamp::clamp_offset;
use crate::config::PrintConfig;
use crate::formatting::{format_date, format_reading};
use crate::table::Alignment;
use crate::types::{
    AcbReport, AnyReport, EarthTestReport, HtBreakerReport, OilFiltrationReport, ReportKind,
    AGENCY_NAME,
};

pub const AGENCY_TAGLINE: &str = "Electrical Testing, Inspection & Commissioning";
pub const SIGNATURE_CLIENT: &str = "For Client";

pub fn signature_agency() -> String {
    format!("For {}", AGENCY_NAME)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintColumn {
    pub header: String,
    pub width: usize,
    pub align: Alignment,
    /// Location column: equal neighbours are drawn as one cell
    pub merges: bool,
}

impl PrintColumn {
    fn new(header: &str, width: usize, align: Alignment) -> Self {
        Self {
            header: header.to_string(),
            width,
            align,
            merges: false,
        }
    }

    fn merging(mut self) -> Self {
        self.merges = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintCell {
    pub text: String,
    pub top_border: bool,
    pub bottom_border: bool,
}

impl PrintCell {
    fn boxed(text: String) -> Self {
        Self {
            text,
            top_border: true,
            bottom_border: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintRow {
    pub serial: usize,
    pub cells: Vec<PrintCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintPage {
    /// One-based page number
    pub number: usize,
    /// Letterhead, metadata block and column headers
    pub show_header: bool,
    pub rows: Vec<PrintRow>,
    /// Note, signature block and stamp
    pub show_footer: bool,
    /// Clamped stamp offset in points, on the last page only
    pub stamp_x: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub kind: ReportKind,
    pub title: String,
    /// Label/value pairs of the client and equipment block
    pub metadata: Vec<(String, String)>,
    pub columns: Vec<PrintColumn>,
    pub pages: Vec<PrintPage>,
    pub note: Option<String>,
    pub page_width: f32,
    pub stamp_width: f32,
}

/// One source row before layout: cell texts (without the serial column) and
/// an optional grouping key
struct SourceRow {
    cells: Vec<String>,
    location: Option<String>,
}

impl ReportDocument {
    pub fn build(report: &AnyReport, print: &PrintConfig) -> Self {
        let (columns, rows, metadata) = match report {
            AnyReport::Acb(r) => acb_layout(r),
            AnyReport::HtBreaker(r) => ht_breaker_layout(r),
            AnyReport::EarthTest(r) => earth_test_layout(r),
            AnyReport::OilFiltration(r) => oil_filtration_layout(r),
        };
        let header = report.header();

        let mut all_columns = vec![PrintColumn::new("S.No", 4, Alignment::Right)];
        all_columns.extend(columns);

        let chunks = paginate(rows, print.capacity(), |row: &SourceRow| row.location.clone());
        let stamp_x = clamp_offset(header.stamp_offset_x, print.page_width_pt, print.stamp_width_pt);
        let pages: Vec<PrintPage> = chunks
            .into_iter()
            .map(|chunk| print_page(chunk, &all_columns, stamp_x))
            .collect();

        debug!(
            "DOCUMENT: {} '{}' laid out on {} page(s)",
            report.kind(),
            header.report_no,
            pages.len()
        );

        let mut block = vec![
            ("Report No".to_string(), header.report_no.clone()),
            ("Date".to_string(), format_date(header.report_date)),
            ("Client".to_string(), header.client_name.clone()),
            ("Site".to_string(), header.site_location.clone()),
        ];
        block.extend(metadata);

        Self {
            kind: report.kind(),
            title: report.kind().title().to_string(),
            metadata: block,
            columns: all_columns,
            pages,
            note: header.note.clone().filter(|n| !n.trim().is_empty()),
            page_width: print.page_width_pt,
            stamp_width: print.stamp_width_pt,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn last_page(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }
}

fn print_page(chunk: PageChunk<SourceRow>, columns: &[PrintColumn], stamp_x: f32) -> PrintPage {
    let rows = chunk
        .rows
        .into_iter()
        .map(|grouped| {
            let mut cells = vec![PrintCell::boxed(grouped.row.serial.to_string())];
            for (i, text) in grouped.row.record.cells.into_iter().enumerate() {
                let merges = columns.get(i + 1).is_some_and(|c| c.merges);
                if merges && grouped.row.location.is_some() {
                    cells.push(PrintCell {
                        text: grouped.group_location.clone().unwrap_or_default(),
                        top_border: grouped.is_page_first,
                        bottom_border: grouped.is_page_last,
                    });
                } else {
                    cells.push(PrintCell::boxed(text));
                }
            }
            PrintRow {
                serial: grouped.row.serial,
                cells,
            }
        })
        .collect();

    PrintPage {
        number: chunk.index + 1,
        show_header: chunk.is_first,
        rows,
        show_footer: chunk.is_last,
        stamp_x: chunk.is_last.then_some(stamp_x),
    }
}

type Layout = (Vec<PrintColumn>, Vec<SourceRow>, Vec<(String, String)>);

fn meta(label: &str, value: String) -> (String, String) {
    (label.to_string(), value)
}

fn acb_layout(report: &AcbReport) -> Layout {
    let columns = vec![
        PrintColumn::new("Parameter", 24, Alignment::Left),
        PrintColumn::new("R", 8, Alignment::Right),
        PrintColumn::new("Y", 8, Alignment::Right),
        PrintColumn::new("B", 8, Alignment::Right),
        PrintColumn::new("Remarks", 18, Alignment::Left),
    ];
    let rows = report
        .tests
        .iter()
        .map(|t| SourceRow {
            cells: vec![
                t.parameter.clone(),
                format_reading(t.r_phase, 2),
                format_reading(t.y_phase, 2),
                format_reading(t.b_phase, 2),
                t.remarks.clone(),
            ],
            location: None,
        })
        .collect();
    let metadata = vec![
        meta("Make", report.make.clone()),
        meta("Type", report.breaker_type.clone()),
        meta("Serial No", report.serial_no.clone()),
        meta("Rating (A)", format_reading(report.rated_current_a, 0)),
    ];
    (columns, rows, metadata)
}

fn ht_breaker_layout(report: &HtBreakerReport) -> Layout {
    let columns = vec![
        PrintColumn::new("Phase", 8, Alignment::Center),
        PrintColumn::new("Contact (µΩ)", 13, Alignment::Right),
        PrintColumn::new("IR (MΩ)", 10, Alignment::Right),
        PrintColumn::new("Close (ms)", 10, Alignment::Right),
        PrintColumn::new("Open (ms)", 10, Alignment::Right),
    ];
    let rows = report
        .rows
        .iter()
        .map(|r| SourceRow {
            cells: vec![
                r.phase.clone(),
                format_reading(r.contact_resistance_micro_ohm, 1),
                format_reading(r.insulation_resistance_mega_ohm, 0),
                format_reading(r.closing_time_ms, 1),
                format_reading(r.opening_time_ms, 1),
            ],
            location: None,
        })
        .collect();
    let metadata = vec![
        meta("Panel", report.panel_name.clone()),
        meta("Make", report.make.clone()),
        meta("Voltage (kV)", format_reading(report.rated_voltage_kv, 1)),
    ];
    (columns, rows, metadata)
}

fn earth_test_layout(report: &EarthTestReport) -> Layout {
    let columns = vec![
        PrintColumn::new("Location", 16, Alignment::Center).merging(),
        PrintColumn::new("Description", 20, Alignment::Left),
        PrintColumn::new("Open Pit (Ω)", 12, Alignment::Right),
        PrintColumn::new("Connected (Ω)", 13, Alignment::Right),
        PrintColumn::new("Remarks", 14, Alignment::Left),
    ];
    let rows = report
        .rows
        .iter()
        .map(|r| SourceRow {
            cells: vec![
                r.location.clone(),
                r.description.clone(),
                format_reading(r.resistance.open_pit, 2),
                format_reading(r.resistance.connected, 2),
                r.remarks.clone(),
            ],
            location: Some(r.location.clone()),
        })
        .collect();
    let metadata = vec![
        meta("Instrument", report.instrument.clone()),
        meta("Weather", report.weather.clone()),
    ];
    (columns, rows, metadata)
}

fn oil_filtration_layout(report: &OilFiltrationReport) -> Layout {
    let columns = vec![
        PrintColumn::new("Time", 8, Alignment::Center),
        PrintColumn::new("BDV Before (kV)", 15, Alignment::Right),
        PrintColumn::new("BDV After (kV)", 14, Alignment::Right),
        PrintColumn::new("Moisture (ppm)", 14, Alignment::Right),
        PrintColumn::new("Temp (°C)", 9, Alignment::Right),
    ];
    let rows = report
        .readings
        .iter()
        .map(|r| SourceRow {
            cells: vec![
                r.time.clone(),
                format_reading(r.bdv_before_kv, 1),
                format_reading(r.bdv_after_kv, 1),
                format_reading(r.moisture_ppm, 1),
                format_reading(r.temperature_c, 1),
            ],
            location: None,
        })
        .collect();
    let metadata = vec![meta(
        "Transformer (kVA)",
        format_reading(report.transformer_rating_kva, 0),
    )];
    (columns, rows, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_earth_document_merges_location_cells() {
        let report = AnyReport::EarthTest(fixtures::earth_test_report(1, &["A", "A", "B"]));
        let doc = ReportDocument::build(&report, &PrintConfig::default());

        assert_eq!(doc.pages.len(), 1);
        let page = &doc.pages[0];
        assert!(page.show_header && page.show_footer);

        let location: Vec<&PrintCell> = page.rows.iter().map(|r| &r.cells[1]).collect();
        assert_eq!(location[0].text, "A");
        assert!(location[0].top_border && !location[0].bottom_border);
        assert_eq!(location[1].text, "");
        assert!(!location[1].top_border && location[1].bottom_border);
        assert_eq!(location[2].text, "B");
        assert!(location[2].top_border && location[2].bottom_border);

        // Other columns are fully boxed
        assert!(page.rows[1].cells[2].top_border);
        assert_eq!(page.rows[2].cells[0].text, "3");
    }

    #[test]
    fn test_long_report_splits_header_and_footer() {
        let locations = vec!["Substation"; 45];
        let report = AnyReport::EarthTest(fixtures::earth_test_report(2, &locations));
        let doc = ReportDocument::build(&report, &PrintConfig::default());

        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].show_header && !doc.pages[0].show_footer);
        assert!(!doc.pages[1].show_header && doc.pages[1].show_footer);
        assert_eq!(doc.pages[0].stamp_x, None);
        assert!(doc.pages[1].stamp_x.is_some());
        assert_eq!(doc.pages[1].rows[0].serial, 21);
    }

    #[test]
    fn test_stamp_offset_is_clamped() {
        let mut report = fixtures::earth_test_report(3, &["A"]);
        report.header.stamp_offset_x = 1000.0;
        let doc = ReportDocument::build(&AnyReport::EarthTest(report.clone()), &PrintConfig::default());
        assert_eq!(doc.pages[0].stamp_x, Some(400.0));

        report.header.stamp_offset_x = -50.0;
        let doc = ReportDocument::build(&AnyReport::EarthTest(report), &PrintConfig::default());
        assert_eq!(doc.pages[0].stamp_x, Some(0.0));
    }

    #[test]
    fn test_non_grouping_kinds_box_every_cell() {
        let report = AnyReport::Acb(fixtures::acb_report(4));
        let doc = ReportDocument::build(&report, &PrintConfig::default());
        assert!(doc.columns.iter().all(|c| !c.merges));
        for row in &doc.pages[0].rows {
            assert!(row.cells.iter().all(|c| c.top_border && c.bottom_border));
        }
        assert!(doc.metadata.iter().any(|(k, _)| k == "Make"));
    }

    #[test]
    fn test_empty_report_still_has_one_page() {
        let report = AnyReport::EarthTest(fixtures::earth_test_report(5, &[]));
        let doc = ReportDocument::build(&report, &PrintConfig::default());
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].show_header && doc.pages[0].show_footer);
        assert!(doc.pages[0].rows.is_empty());
    }
}
