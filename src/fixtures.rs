/// Mock fixture data for testing and development
///
/// This module provides consistent, deterministic fixture data that can be used for:
/// 1. Unit tests - ensuring tests have predictable data
/// 2. Development mock mode - running the app without a backend
/// 3. Benchmarks - providing consistent data for performance testing
///
/// The fixtures model a small client base with a dozen reports per kind.
use chrono::NaiveDate;

use crate::types::{
    AcbReport, AcbTestRow, AnyReport, EarthResistance, EarthTestReport, EarthTestRow,
    HtBreakerReport, HtBreakerRow, OilFiltrationReport, OilReading, ReportHeader, ReportKind,
};

/// Reports per kind served by the mock client
pub const REPORTS_PER_KIND: i64 = 12;

const CLIENTS: [&str; 4] = [
    "Sunrise Textile Mills",
    "Harbor Cold Storage",
    "Green Valley Hospital",
    "Metro Water Works",
];

const SITES: [&str; 3] = ["Plant 1, Ring Road", "Main Substation", "Pump House"];

const EARTH_LOCATIONS: [&str; 4] = ["DG Room", "Transformer Yard", "LT Panel Room", "Lightning Arrester"];

fn date(day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 6, day.clamp(1, 28))
}

/// Shared header for fixture `id` of `kind`
pub fn header(kind: ReportKind, id: i64) -> ReportHeader {
    let i = id.unsigned_abs() as usize;
    ReportHeader {
        id: Some(id),
        report_no: format!("{}-{:04}", kind.slug().to_uppercase(), id),
        client_name: CLIENTS[i % CLIENTS.len()].to_string(),
        site_location: SITES[i % SITES.len()].to_string(),
        report_date: date(id as u32),
        note: (id % 3 == 0).then(|| format!("Follow-up inspection due for report {}", id)),
        stamp_offset_x: 0.0,
    }
}

pub fn acb_report(id: i64) -> AcbReport {
    let base = id as f64;
    let test = |parameter: &str, value: f64, remarks: &str| AcbTestRow {
        parameter: parameter.to_string(),
        r_phase: Some(value),
        y_phase: Some(value + 0.1),
        b_phase: Some(value + 0.2),
        remarks: remarks.to_string(),
    };
    AcbReport {
        header: header(ReportKind::Acb, id),
        make: "Schneider".to_string(),
        breaker_type: "MasterPact NW".to_string(),
        serial_no: format!("SN{:06}", 1000 + id),
        rated_current_a: Some(1600.0 + base * 100.0),
        tests: vec![
            test("Contact resistance (µΩ)", 20.0 + base, "OK"),
            test("Insulation resistance (GΩ)", 5.0, "OK"),
            test("Trip time (ms)", 40.0, "Within limit"),
            AcbTestRow {
                parameter: "Spring charging".to_string(),
                r_phase: None,
                y_phase: None,
                b_phase: None,
                remarks: "Smooth".to_string(),
            },
        ],
    }
}

pub fn ht_breaker_report(id: i64) -> HtBreakerReport {
    let rows = ["R", "Y", "B"]
        .iter()
        .enumerate()
        .map(|(i, phase)| HtBreakerRow {
            phase: phase.to_string(),
            contact_resistance_micro_ohm: Some(35.0 + i as f64),
            insulation_resistance_mega_ohm: Some(2000.0 + 100.0 * i as f64),
            closing_time_ms: Some(55.0 + id as f64 / 10.0),
            opening_time_ms: Some(32.0),
        })
        .collect();
    HtBreakerReport {
        header: header(ReportKind::HtBreaker, id),
        panel_name: format!("Incomer {}", id),
        make: "ABB".to_string(),
        rated_voltage_kv: Some(11.0),
        rows,
    }
}

/// Earth test report with one pit per entry of `locations`
pub fn earth_test_report(id: i64, locations: &[&str]) -> EarthTestReport {
    let rows = locations
        .iter()
        .enumerate()
        .map(|(i, location)| EarthTestRow {
            location: location.to_string(),
            description: format!("Pit {}", i + 1),
            resistance: EarthResistance {
                open_pit: Some(1.5 + (i % 5) as f64 * 0.25),
                connected: Some(0.8 + (i % 4) as f64 * 0.1),
            },
            remarks: if i % 7 == 6 { "Re-treat pit".to_string() } else { "OK".to_string() },
        })
        .collect();
    EarthTestReport {
        header: header(ReportKind::EarthTest, id),
        instrument: "Kyoritsu 4105A".to_string(),
        weather: "Dry".to_string(),
        rows,
    }
}

/// Location-major pit list of `n` rows
pub fn earth_locations(n: usize) -> Vec<&'static str> {
    (0..n)
        .map(|i| EARTH_LOCATIONS[(i * EARTH_LOCATIONS.len()) / n.max(1)])
        .collect()
}

pub fn oil_filtration_report(id: i64) -> OilFiltrationReport {
    let readings = (0..6)
        .map(|hour| OilReading {
            time: format!("{:02}:00", 9 + hour),
            bdv_before_kv: Some(28.0 + hour as f64),
            bdv_after_kv: Some(55.0 + hour as f64 * 1.5),
            moisture_ppm: Some(40.0 - hour as f64 * 4.0),
            temperature_c: Some(55.0 + hour as f64),
        })
        .collect();
    OilFiltrationReport {
        header: header(ReportKind::OilFiltration, id),
        transformer_rating_kva: Some(1000.0 + 250.0 * (id % 4) as f64),
        readings,
    }
}

/// One fixture report of `kind`
pub fn report(kind: ReportKind, id: i64) -> AnyReport {
    match kind {
        ReportKind::Acb => AnyReport::Acb(acb_report(id)),
        ReportKind::HtBreaker => AnyReport::HtBreaker(ht_breaker_report(id)),
        ReportKind::EarthTest => {
            let pits = 6 + (id as usize % 4) * 14;
            AnyReport::EarthTest(earth_test_report(id, &earth_locations(pits)))
        }
        ReportKind::OilFiltration => AnyReport::OilFiltration(oil_filtration_report(id)),
    }
}

/// All fixture reports of `kind`, ordered by id
pub fn reports(kind: ReportKind) -> Vec<AnyReport> {
    (1..=REPORTS_PER_KIND).map(|id| report(kind, id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_ids_and_kinds() {
        for kind in ReportKind::all() {
            let all = reports(kind);
            assert_eq!(all.len(), REPORTS_PER_KIND as usize);
            assert!(all.iter().all(|r| r.kind() == kind));
            assert_eq!(all[0].id(), Some(1));
        }
    }

    #[test]
    fn test_earth_locations_are_location_major() {
        let locations = earth_locations(8);
        assert_eq!(locations.len(), 8);
        assert_eq!(locations[0], locations[1]);
        assert_ne!(locations[1], locations[2]);
        assert_eq!(locations[7], "Lightning Arrester");
    }
}
