/// Shared types used across the application
///
/// This module contains the report record schemas exchanged with the backend
/// and shared between the library (commands, tui, report layout) and the
/// binary (main.rs).
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Company name printed on every letterhead
pub const AGENCY_NAME: &str = "OK AGENCY";

/// The four inspection report families handled by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Acb,
    HtBreaker,
    EarthTest,
    OilFiltration,
}

/// Slug lookup used by the CLI, the config file and the REST layer
static REPORT_KINDS: phf::Map<&'static str, ReportKind> = phf::phf_map! {
    "acb" => ReportKind::Acb,
    "ht-breaker" => ReportKind::HtBreaker,
    "earth-test" => ReportKind::EarthTest,
    "oil-filtration" => ReportKind::OilFiltration,
};

impl ReportKind {
    pub fn all() -> [Self; 4] {
        [
            Self::Acb,
            Self::HtBreaker,
            Self::EarthTest,
            Self::OilFiltration,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Acb => "acb",
            Self::HtBreaker => "ht-breaker",
            Self::EarthTest => "earth-test",
            Self::OilFiltration => "oil-filtration",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Acb => "ACB Test Report",
            Self::HtBreaker => "HT Breaker Test Report",
            Self::EarthTest => "Earth Resistance Test Report",
            Self::OilFiltration => "Oil Filtration Report",
        }
    }

    /// Short label for tab bars
    pub fn label(&self) -> &'static str {
        match self {
            Self::Acb => "ACB",
            Self::HtBreaker => "HT Breaker",
            Self::EarthTest => "Earth Test",
            Self::OilFiltration => "Oil Filtration",
        }
    }

    /// REST resource path below the API base URL
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Acb => "acb-report",
            Self::HtBreaker => "ht-breaker-report",
            Self::EarthTest => "earth-test-report",
            Self::OilFiltration => "oil-filtration-report",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        REPORT_KINDS.get(slug.trim().to_lowercase().as_str()).copied()
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|k| k == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| {
            format!(
                "unknown report kind '{}' (expected one of: {})",
                s,
                Self::all().map(|k| k.slug()).join(", ")
            )
        })
    }
}

/// Fields shared by every report record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub report_no: String,
    pub client_name: String,
    pub site_location: String,
    pub report_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Horizontal stamp offset saved from the last drag, in points
    pub stamp_offset_x: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcbTestRow {
    pub parameter: String,
    pub r_phase: Option<f64>,
    pub y_phase: Option<f64>,
    pub b_phase: Option<f64>,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcbReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub make: String,
    pub breaker_type: String,
    pub serial_no: String,
    pub rated_current_a: Option<f64>,
    pub tests: Vec<AcbTestRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HtBreakerRow {
    pub phase: String,
    pub contact_resistance_micro_ohm: Option<f64>,
    pub insulation_resistance_mega_ohm: Option<f64>,
    pub closing_time_ms: Option<f64>,
    pub opening_time_ms: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HtBreakerReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub panel_name: String,
    pub make: String,
    pub rated_voltage_kv: Option<f64>,
    pub rows: Vec<HtBreakerRow>,
}

/// Earth pit resistance measured with the electrode isolated and connected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EarthResistance {
    pub open_pit: Option<f64>,
    pub connected: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EarthTestRow {
    pub location: String,
    pub description: String,
    pub resistance: EarthResistance,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EarthTestReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub instrument: String,
    pub weather: String,
    pub rows: Vec<EarthTestRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OilReading {
    pub time: String,
    pub bdv_before_kv: Option<f64>,
    pub bdv_after_kv: Option<f64>,
    pub moisture_ppm: Option<f64>,
    pub temperature_c: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OilFiltrationReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub transformer_rating_kva: Option<f64>,
    pub readings: Vec<OilReading>,
}

/// Any report record, tagged by kind on our side only
///
/// The backend serves each kind from its own resource, so the JSON carries
/// no discriminator; use [`AnyReport::from_json`] with the known kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyReport {
    Acb(AcbReport),
    HtBreaker(HtBreakerReport),
    EarthTest(EarthTestReport),
    OilFiltration(OilFiltrationReport),
}

impl AnyReport {
    pub fn from_json(kind: ReportKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            ReportKind::Acb => Self::Acb(serde_json::from_value(value)?),
            ReportKind::HtBreaker => Self::HtBreaker(serde_json::from_value(value)?),
            ReportKind::EarthTest => Self::EarthTest(serde_json::from_value(value)?),
            ReportKind::OilFiltration => Self::OilFiltration(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Acb(_) => ReportKind::Acb,
            Self::HtBreaker(_) => ReportKind::HtBreaker,
            Self::EarthTest(_) => ReportKind::EarthTest,
            Self::OilFiltration(_) => ReportKind::OilFiltration,
        }
    }

    pub fn header(&self) -> &ReportHeader {
        match self {
            Self::Acb(r) => &r.header,
            Self::HtBreaker(r) => &r.header,
            Self::EarthTest(r) => &r.header,
            Self::OilFiltration(r) => &r.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut ReportHeader {
        match self {
            Self::Acb(r) => &mut r.header,
            Self::HtBreaker(r) => &mut r.header,
            Self::EarthTest(r) => &mut r.header,
            Self::OilFiltration(r) => &mut r.header,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.header().id
    }

    /// Number of table rows the printed report will carry
    pub fn row_count(&self) -> usize {
        match self {
            Self::Acb(r) => r.tests.len(),
            Self::HtBreaker(r) => r.rows.len(),
            Self::EarthTest(r) => r.rows.len(),
            Self::OilFiltration(r) => r.readings.len(),
        }
    }
}

/// Pageable block of a server page response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pageable {
    pub page_number: usize,
    pub page_size: usize,
}

/// One page of a server-side search, as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub pageable: Pageable,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub total_elements: usize,
    #[serde(default)]
    pub number_of_elements: usize,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> PageEnvelope<T> {
    /// Convert the content while keeping the pagination metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageEnvelope<U> {
        PageEnvelope {
            content: self.content.into_iter().map(f).collect(),
            pageable: self.pageable,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<PageEnvelope<U>, E> {
        let content = self.content.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(PageEnvelope {
            content,
            pageable: self.pageable,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
        })
    }

    pub fn current_page(&self) -> usize {
        self.pageable.page_number
    }
}
