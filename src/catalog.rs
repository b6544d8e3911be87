//! Reference tables consulted by the normalizer and orchestrator.
//!
//! The tables are reached through the `ReferenceTables` trait so a
//! deployment or a test can substitute its own fixtures without touching
//! the fetch or normalization logic. `KmaTables` is the built-in set.

use crate::model::{CategoryMeta, GridPoint, NumericKind, ObservationGroup};
use crate::regions;

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

/// `getUltraSrtNcst` categories: label, unit, group and numeric kind.
pub static CATEGORY_TABLE: &[CategoryMeta] = &[
    CategoryMeta {
        code: "T1H",
        label: "기온",
        unit: Some("℃"),
        group: ObservationGroup::Temperature,
        kind: NumericKind::Real,
    },
    CategoryMeta {
        code: "REH",
        label: "습도",
        unit: Some("%"),
        group: ObservationGroup::Humidity,
        kind: NumericKind::Integer,
    },
    CategoryMeta {
        code: "RN1",
        label: "1시간 강수량",
        unit: Some("mm"),
        group: ObservationGroup::Precipitation,
        kind: NumericKind::Real,
    },
    CategoryMeta {
        code: "PTY",
        label: "강수형태",
        unit: Some("코드"),
        group: ObservationGroup::Precipitation,
        kind: NumericKind::Integer,
    },
    CategoryMeta {
        code: "VEC",
        label: "풍향",
        unit: Some("deg"),
        group: ObservationGroup::Wind,
        kind: NumericKind::Integer,
    },
    CategoryMeta {
        code: "WSD",
        label: "풍속",
        unit: Some("m/s"),
        group: ObservationGroup::Wind,
        kind: NumericKind::Real,
    },
    CategoryMeta {
        code: "UUU",
        label: "동서바람성분",
        unit: Some("m/s"),
        group: ObservationGroup::Wind,
        kind: NumericKind::Real,
    },
    CategoryMeta {
        code: "VVV",
        label: "남북바람성분",
        unit: Some("m/s"),
        group: ObservationGroup::Wind,
        kind: NumericKind::Real,
    },
];

/// PTY (precipitation type) codes for the ultra-short-term products.
/// 4 (소나기) only appears in some feeds but is kept for completeness.
pub static PRECIPITATION_TYPES: &[(i64, &str)] = &[
    (0, "없음"),
    (1, "비"),
    (2, "비/눈"),
    (3, "눈"),
    (4, "소나기"),
    (5, "빗방울"),
    (6, "빗방울/눈날림"),
    (7, "눈날림"),
];

/// 16-point compass labels, clockwise from north.
pub static COMPASS_16: [&str; 16] = [
    "북", "북북동", "북동", "동북동", "동", "동남동", "남동", "남남동", "남", "남남서", "남서",
    "서남서", "서", "서북서", "북서", "북북서",
];

// ---------------------------------------------------------------------------
// Lookup capability
// ---------------------------------------------------------------------------

/// Read-only lookups the core consults.
pub trait ReferenceTables {
    /// Grid point for a normalized region key.
    fn region(&self, key: &str) -> Option<GridPoint>;
    /// Supported region keys, sorted.
    fn region_keys(&self) -> Vec<String>;
    /// Metadata for a category code.
    fn category(&self, code: &str) -> Option<&CategoryMeta>;
    /// Description for a precipitation-type code.
    fn precipitation_label(&self, code: i64) -> Option<&str>;
    /// Compass labels clockwise from north; the sector count is the length.
    fn compass_points(&self) -> &[&'static str];
}

/// The built-in KMA tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct KmaTables;

impl ReferenceTables for KmaTables {
    fn region(&self, key: &str) -> Option<GridPoint> {
        regions::find_region(key).map(|r| r.grid)
    }

    fn region_keys(&self) -> Vec<String> {
        regions::all_region_keys()
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn category(&self, code: &str) -> Option<&CategoryMeta> {
        CATEGORY_TABLE.iter().find(|meta| meta.code == code)
    }

    fn precipitation_label(&self, code: i64) -> Option<&str> {
        PRECIPITATION_TYPES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }

    fn compass_points(&self) -> &[&'static str] {
        &COMPASS_16
    }
}

// ---------------------------------------------------------------------------
// Decoders
// ---------------------------------------------------------------------------

/// Description for a PTY value: the table entry, or `알 수 없음(n)`.
pub fn describe_precipitation<R: ReferenceTables + ?Sized>(tables: &R, code: i64) -> String {
    tables
        .precipitation_label(code)
        .map(String::from)
        .unwrap_or_else(|| format!("알 수 없음({})", code))
}

/// Maps a wind direction in degrees to a compass label.
///
/// Degrees wrap modulo 360 and each sector is centred on its direction, so
/// 0 and 360 are both north and a boundary rounds to the next direction
/// clockwise (348.75 is north again).
pub fn compass_label<R: ReferenceTables + ?Sized>(tables: &R, degrees: f64) -> Option<&'static str> {
    let points = tables.compass_points();
    if points.is_empty() || !degrees.is_finite() {
        return None;
    }
    let sector = 360.0 / points.len() as f64;
    let wrapped = degrees.rem_euclid(360.0);
    let index = ((wrapped + sector / 2.0) / sector).floor() as usize % points.len();
    points.get(index).copied()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_code_is_distinct() {
        let mut seen = std::collections::HashSet::new();
        for meta in CATEGORY_TABLE {
            assert!(seen.insert(meta.code), "duplicate category '{}'", meta.code);
        }
        assert_eq!(CATEGORY_TABLE.len(), 8);
    }

    #[test]
    fn test_category_lookup_and_kinds() {
        let tables = KmaTables;
        let reh = tables.category("REH").expect("REH should be known");
        assert_eq!(reh.kind, NumericKind::Integer);
        assert_eq!(reh.group, ObservationGroup::Humidity);
        let t1h = tables.category("T1H").expect("T1H should be known");
        assert_eq!(t1h.kind, NumericKind::Real);
        assert_eq!(t1h.unit, Some("℃"));
        assert!(tables.category("LGT").is_none());
    }

    #[test]
    fn test_precipitation_code_zero_is_none() {
        assert_eq!(describe_precipitation(&KmaTables, 0), "없음");
        assert_eq!(describe_precipitation(&KmaTables, 7), "눈날림");
    }

    #[test]
    fn test_unrecognized_precipitation_code_reports_the_code() {
        assert_eq!(describe_precipitation(&KmaTables, 9), "알 수 없음(9)");
        assert_eq!(describe_precipitation(&KmaTables, -1), "알 수 없음(-1)");
    }

    #[test]
    fn test_compass_cardinal_points() {
        assert_eq!(compass_label(&KmaTables, 0.0), Some("북"));
        assert_eq!(compass_label(&KmaTables, 90.0), Some("동"));
        assert_eq!(compass_label(&KmaTables, 180.0), Some("남"));
        assert_eq!(compass_label(&KmaTables, 270.0), Some("서"));
    }

    #[test]
    fn test_compass_wraps_360_and_rounds_boundaries() {
        assert_eq!(compass_label(&KmaTables, 360.0), Some("북"));
        assert_eq!(compass_label(&KmaTables, 348.75), Some("북"));
        assert_eq!(compass_label(&KmaTables, 348.7), Some("북북서"));
        assert_eq!(compass_label(&KmaTables, 11.25), Some("북북동"));
        assert_eq!(compass_label(&KmaTables, 11.2), Some("북"));
    }

    #[test]
    fn test_compass_is_invariant_under_full_turns() {
        for deg in [0.0, 22.5, 45.0, 90.0, 135.5, 200.0, 348.75, 359.0] {
            let base = compass_label(&KmaTables, deg);
            assert_eq!(compass_label(&KmaTables, deg + 360.0), base, "deg {} + 360", deg);
            assert_eq!(compass_label(&KmaTables, deg - 360.0), base, "deg {} - 360", deg);
        }
    }

    #[test]
    fn test_compass_rejects_non_finite_degrees() {
        assert_eq!(compass_label(&KmaTables, f64::NAN), None);
        assert_eq!(compass_label(&KmaTables, f64::INFINITY), None);
    }

    #[test]
    fn test_region_lookup_goes_through_registry() {
        assert_eq!(KmaTables.region("서울"), Some(GridPoint::new(60, 127)));
        assert_eq!(KmaTables.region("서울특별시"), None);
        assert_eq!(KmaTables.region_keys().len(), 8);
    }
}
