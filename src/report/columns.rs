//! List-view column sets, one per report kind
use crate::table::{Alignment, CellValue, ColumnDef, FilterVariant};
use crate::types::{AnyReport, ReportKind};

pub const WEATHER_OPTIONS: [&str; 3] = ["Dry", "Humid", "Wet"];

fn header_columns() -> Vec<ColumnDef<AnyReport>> {
    vec![
        ColumnDef::new("reportNo", "Report No", 20, Alignment::Left, |r: &AnyReport| {
            CellValue::text(&r.header().report_no)
        })
        .with_expanded(|r| r.header().note.clone()),
        ColumnDef::new("clientName", "Client", 22, Alignment::Left, |r: &AnyReport| {
            CellValue::text(&r.header().client_name)
        }),
        ColumnDef::new("siteLocation", "Site", 18, Alignment::Left, |r: &AnyReport| {
            CellValue::text(&r.header().site_location)
        }),
        ColumnDef::new("reportDate", "Date", 10, Alignment::Center, |r: &AnyReport| {
            CellValue::date(r.header().report_date)
        }),
    ]
}

fn rows_column(header: &str) -> ColumnDef<AnyReport> {
    ColumnDef::new("rowCount", header, 6, Alignment::Right, |r: &AnyReport| {
        CellValue::Number(r.row_count() as f64)
    })
    .with_filter(FilterVariant::Range)
    .unsortable()
}

/// Columns of the list table for `kind`
///
/// Every set starts with the shared header fields; the report number column
/// expands to the report note.
pub fn list_columns(kind: ReportKind) -> Vec<ColumnDef<AnyReport>> {
    let mut columns = header_columns();
    match kind {
        ReportKind::Acb => {
            columns.push(ColumnDef::new("make", "Make", 12, Alignment::Left, |r: &AnyReport| {
                match r {
                    AnyReport::Acb(acb) => CellValue::text(&acb.make),
                    _ => CellValue::Empty,
                }
            }));
            columns.push(
                ColumnDef::new("ratedCurrentA", "Rating (A)", 10, Alignment::Right, |r: &AnyReport| {
                    match r {
                        AnyReport::Acb(acb) => CellValue::number(acb.rated_current_a),
                        _ => CellValue::Empty,
                    }
                })
                .with_filter(FilterVariant::Range),
            );
            columns.push(rows_column("Tests"));
        }
        ReportKind::HtBreaker => {
            columns.push(ColumnDef::new("panelName", "Panel", 14, Alignment::Left, |r: &AnyReport| {
                match r {
                    AnyReport::HtBreaker(ht) => CellValue::text(&ht.panel_name),
                    _ => CellValue::Empty,
                }
            }));
            columns.push(
                ColumnDef::new("ratedVoltageKv", "kV", 6, Alignment::Right, |r: &AnyReport| match r {
                    AnyReport::HtBreaker(ht) => CellValue::number(ht.rated_voltage_kv),
                    _ => CellValue::Empty,
                })
                .with_filter(FilterVariant::Range),
            );
        }
        ReportKind::EarthTest => {
            columns.push(ColumnDef::new("instrument", "Instrument", 16, Alignment::Left, |r: &AnyReport| {
                match r {
                    AnyReport::EarthTest(et) => CellValue::text(&et.instrument),
                    _ => CellValue::Empty,
                }
            }));
            columns.push(
                ColumnDef::new("weather", "Weather", 8, Alignment::Left, |r: &AnyReport| match r {
                    AnyReport::EarthTest(et) => CellValue::text(&et.weather),
                    _ => CellValue::Empty,
                })
                .with_filter(FilterVariant::Select(
                    WEATHER_OPTIONS.iter().map(|s| s.to_string()).collect(),
                )),
            );
            columns.push(rows_column("Pits"));
        }
        ReportKind::OilFiltration => {
            columns.push(
                ColumnDef::new("transformerRatingKva", "kVA", 7, Alignment::Right, |r: &AnyReport| {
                    match r {
                        AnyReport::OilFiltration(oil) => CellValue::number(oil.transformer_rating_kva),
                        _ => CellValue::Empty,
                    }
                })
                .with_filter(FilterVariant::Range),
            );
            columns.push(rows_column("Readings"));
        }
    }
    columns
}

/// Stable row key: the record id, or its position for unsaved records
pub fn record_key(report: &AnyReport, index: usize) -> String {
    match report.id() {
        Some(id) => id.to_string(),
        None => format!("new-{}", index),
    }
}
