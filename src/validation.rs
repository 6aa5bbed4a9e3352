//! Record validation before submission
//!
//! Every failure names the offending field (camelCase, as in the JSON form)
//! so the caller can show it next to the input.
use std::fmt;

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::types::{AnyReport, ReportHeader};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} invalid field(s): {}", .errors.len(), summary(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
    }

    fn non_negative(&mut self, field: String, value: Option<f64>) {
        match value {
            Some(v) if !v.is_finite() => self.push(field, "must be a number"),
            Some(v) if v < 0.0 => self.push(field, "must not be negative"),
            _ => {}
        }
    }
}

/// Validate against today's date
pub fn validate(report: &AnyReport) -> Result<(), ValidationErrors> {
    validate_on(report, Local::now().date_naive())
}

/// Validate with an explicit "today" for report date checks
pub fn validate_on(report: &AnyReport, today: NaiveDate) -> Result<(), ValidationErrors> {
    let mut c = Collector::default();
    validate_header(&mut c, report.header(), today);

    if report.row_count() == 0 {
        let field = match report {
            AnyReport::Acb(_) => "tests",
            AnyReport::OilFiltration(_) => "readings",
            _ => "rows",
        };
        c.push(field, "at least one row is required");
    }

    match report {
        AnyReport::Acb(r) => {
            c.non_negative("ratedCurrentA".to_string(), r.rated_current_a);
            for (i, t) in r.tests.iter().enumerate() {
                c.required(&format!("tests[{}].parameter", i), &t.parameter);
                c.non_negative(format!("tests[{}].rPhase", i), t.r_phase);
                c.non_negative(format!("tests[{}].yPhase", i), t.y_phase);
                c.non_negative(format!("tests[{}].bPhase", i), t.b_phase);
            }
        }
        AnyReport::HtBreaker(r) => {
            c.non_negative("ratedVoltageKv".to_string(), r.rated_voltage_kv);
            for (i, row) in r.rows.iter().enumerate() {
                c.required(&format!("rows[{}].phase", i), &row.phase);
                c.non_negative(
                    format!("rows[{}].contactResistanceMicroOhm", i),
                    row.contact_resistance_micro_ohm,
                );
                c.non_negative(
                    format!("rows[{}].insulationResistanceMegaOhm", i),
                    row.insulation_resistance_mega_ohm,
                );
                c.non_negative(format!("rows[{}].closingTimeMs", i), row.closing_time_ms);
                c.non_negative(format!("rows[{}].openingTimeMs", i), row.opening_time_ms);
            }
        }
        AnyReport::EarthTest(r) => {
            for (i, row) in r.rows.iter().enumerate() {
                c.non_negative(format!("rows[{}].resistance.openPit", i), row.resistance.open_pit);
                c.non_negative(
                    format!("rows[{}].resistance.connected", i),
                    row.resistance.connected,
                );
            }
        }
        AnyReport::OilFiltration(r) => {
            c.non_negative("transformerRatingKva".to_string(), r.transformer_rating_kva);
            for (i, reading) in r.readings.iter().enumerate() {
                c.required(&format!("readings[{}].time", i), &reading.time);
                c.non_negative(format!("readings[{}].bdvBeforeKv", i), reading.bdv_before_kv);
                c.non_negative(format!("readings[{}].bdvAfterKv", i), reading.bdv_after_kv);
                c.non_negative(format!("readings[{}].moisturePpm", i), reading.moisture_ppm);
            }
        }
    }

    if c.errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors: c.errors })
    }
}

fn validate_header(c: &mut Collector, header: &ReportHeader, today: NaiveDate) {
    c.required("reportNo", &header.report_no);
    c.required("clientName", &header.client_name);
    match header.report_date {
        None => c.push("reportDate", "is required"),
        Some(date) if date > today => c.push("reportDate", "must not be in the future"),
        Some(_) => {}
    }
    if !header.stamp_offset_x.is_finite() {
        c.push("stampOffsetX", "must be a number");
    }
}
