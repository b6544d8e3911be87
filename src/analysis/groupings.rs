//! Organizes a flat upstream item list into the five display groups.
//!
//! Each item is looked up in the reference tables, its value cast to the
//! declared numeric kind, and the result filed under its group keyed by
//! the Korean label. PTY and VEC get a decoded description and compass
//! label respectively. Nothing is ever dropped: unknown codes go to 기타
//! and colliding labels are qualified with the raw code.

use indexmap::IndexMap;

use crate::catalog::{compass_label, describe_precipitation, ReferenceTables};
use crate::model::{
    GroupedObservations, NormalizedEntry, NumericKind, ObservationCode, ObservationGroup,
    ObservationValue, RawObservation,
};

/// Label used when an item arrives without a category code.
const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Description used when a PTY value cannot be read as an integer.
const UNKNOWN_PRECIPITATION: &str = "알 수 없음";

// ---------------------------------------------------------------------------
// Value casting
// ---------------------------------------------------------------------------

/// Casts an `obsrValue` string to the declared kind.
///
/// Integers are parsed as reals first and truncated, so "3.0" in an integer
/// field becomes 3. A value that does not parse, or an integer outside the
/// i64 range, keeps its original string; an absent or blank value becomes
/// `Missing`.
pub fn cast_value(kind: NumericKind, raw: Option<&str>) -> ObservationValue {
    let Some(raw) = raw else {
        return ObservationValue::Missing;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ObservationValue::Missing;
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => match kind {
            NumericKind::Integer if fits_i64(v.trunc()) => ObservationValue::Integer(v.trunc() as i64),
            NumericKind::Integer => ObservationValue::Text(raw.to_string()),
            NumericKind::Real => ObservationValue::Real(v),
        },
        _ => ObservationValue::Text(raw.to_string()),
    }
}

/// `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
fn fits_i64(v: f64) -> bool {
    v >= i64::MIN as f64 && v < i64::MAX as f64
}

/// Value for a code the tables do not know: bare JSON numbers stay numbers,
/// everything else is passed through as text.
fn passthrough_value(item: &RawObservation) -> ObservationValue {
    match item.value.as_deref() {
        None => ObservationValue::Missing,
        Some(v) if item.numeric => {
            if let Ok(n) = v.parse::<i64>() {
                ObservationValue::Integer(n)
            } else {
                match v.parse::<f64>() {
                    Ok(f) => ObservationValue::Real(f),
                    Err(_) => ObservationValue::Text(v.to_string()),
                }
            }
        }
        Some(v) => ObservationValue::Text(v.to_string()),
    }
}

/// Integer reading of a value, recasting the raw string when the declared
/// kind was not integer.
fn integer_reading(value: &ObservationValue, raw: Option<&str>) -> Option<i64> {
    value
        .as_integer()
        .or_else(|| cast_value(NumericKind::Integer, raw).as_integer())
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Normalizes a list of raw items into grouped, labeled entries.
pub fn normalize_observations<R: ReferenceTables + ?Sized>(
    items: &[RawObservation],
    tables: &R,
) -> GroupedObservations {
    let mut grouped = GroupedObservations::default();

    for item in items {
        let code = item.category.trim();
        let raw = item.value.as_deref();

        let (label, unit, group, value) = match tables.category(code) {
            Some(meta) => (
                meta.label.to_string(),
                meta.unit.map(String::from),
                meta.group,
                cast_value(meta.kind, raw),
            ),
            None => (
                if code.is_empty() { UNKNOWN_LABEL } else { code }.to_string(),
                None,
                ObservationGroup::Other,
                passthrough_value(item),
            ),
        };

        let mut entry = NormalizedEntry {
            code: code.to_string(),
            value,
            unit,
            description: None,
            compass: None,
        };

        match ObservationCode::parse(code) {
            ObservationCode::PrecipitationType => {
                entry.description = Some(match integer_reading(&entry.value, raw) {
                    Some(pty) => describe_precipitation(tables, pty),
                    None => UNKNOWN_PRECIPITATION.to_string(),
                });
            }
            ObservationCode::WindDirection => {
                entry.compass = integer_reading(&entry.value, raw)
                    .and_then(|deg| compass_label(tables, deg as f64))
                    .map(String::from);
            }
            _ => {}
        }

        let bucket = grouped.group_mut(group);
        let key = unique_key(bucket, &label, code);
        bucket.insert(key, entry);
    }

    grouped
}

/// Display key for a new entry: the label, or `label(code)` if the label is
/// taken, or `label(code)#n` if that is taken too.
fn unique_key(bucket: &IndexMap<String, NormalizedEntry>, label: &str, code: &str) -> String {
    if !bucket.contains_key(label) {
        return label.to_string();
    }
    let qualified = format!("{}({})", label, code);
    if !bucket.contains_key(&qualified) {
        return qualified;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}#{}", qualified, n);
        if !bucket.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
