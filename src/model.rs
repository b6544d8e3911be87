//! Core data types for the KMA nowcast service.
//!
//! This module defines the shared domain model imported by all other modules:
//! grid coordinates, observation codes and groups, query windows, raw and
//! normalized observations, attempt records, and the terminal result payloads.
//! It contains no I/O. Serialized field names follow the wire format the
//! service has always emitted (Korean keys for the human-facing parts).

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Upstream constants
// ---------------------------------------------------------------------------

/// `resultCode` the KMA API uses to signal a normal response.
pub const RESULT_CODE_OK: &str = "00";

/// Name of the environment variable holding the data.go.kr service key.
pub const SERVICE_KEY_ENV: &str = "KMA_SERVICE_KEY";

// ---------------------------------------------------------------------------
// Regions and grid coordinates
// ---------------------------------------------------------------------------

/// A point on the KMA 5 km forecast grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPoint {
    pub nx: i32,
    pub ny: i32,
}

impl GridPoint {
    pub const fn new(nx: i32, ny: i32) -> Self {
        Self { nx, ny }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.nx, self.ny)
    }
}

// ---------------------------------------------------------------------------
// Observation codes
// ---------------------------------------------------------------------------

/// Category codes returned by `getUltraSrtNcst`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObservationCode {
    /// T1H, air temperature.
    Temperature,
    /// REH, relative humidity.
    Humidity,
    /// RN1, precipitation over the last hour.
    Precipitation1h,
    /// PTY, precipitation type code.
    PrecipitationType,
    /// VEC, wind direction in degrees.
    WindDirection,
    /// WSD, wind speed.
    WindSpeed,
    /// UUU, east-west wind component.
    WindEastWest,
    /// VVV, north-south wind component.
    WindNorthSouth,
    /// Anything the reference table does not know about.
    Unknown(String),
}

impl ObservationCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "T1H" => Self::Temperature,
            "REH" => Self::Humidity,
            "RN1" => Self::Precipitation1h,
            "PTY" => Self::PrecipitationType,
            "VEC" => Self::WindDirection,
            "WSD" => Self::WindSpeed,
            "UUU" => Self::WindEastWest,
            "VVV" => Self::WindNorthSouth,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Display groups for normalized observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationGroup {
    Temperature,
    Humidity,
    Precipitation,
    Wind,
    Other,
}

impl ObservationGroup {
    pub const ALL: [ObservationGroup; 5] = [
        ObservationGroup::Temperature,
        ObservationGroup::Humidity,
        ObservationGroup::Precipitation,
        ObservationGroup::Wind,
        ObservationGroup::Other,
    ];
}

/// How an observation value string should be cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Real,
}

/// Reference metadata for one known category code.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMeta {
    pub code: &'static str,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub group: ObservationGroup,
    pub kind: NumericKind,
}

// ---------------------------------------------------------------------------
// Query windows
// ---------------------------------------------------------------------------

/// One candidate (base_date, base_time) pair for an upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub date: NaiveDate,
    /// Hour of day, 0..=23.
    pub hour: u32,
}

impl QueryWindow {
    /// `YYYYMMDD`, as the API expects in `base_date`.
    pub fn base_date(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// `HH00`, as the API expects in `base_time`.
    pub fn base_time(&self) -> String {
        format!("{:02}00", self.hour)
    }
}

impl fmt::Display for QueryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base_date(), self.base_time())
    }
}

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single `item` from the `getUltraSrtNcst` response.
///
/// The upstream echoes `baseDate`, `baseTime`, `nx` and `ny` on every item;
/// they are kept for debugging but the service reports the values it
/// requested instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawObservation {
    pub category: String,
    /// `obsrValue` as a string, `None` when absent or null.
    pub value: Option<String>,
    /// `obsrValue` arrived as a bare JSON number rather than a string.
    pub numeric: bool,
    pub base_date: Option<String>,
    pub base_time: Option<String>,
    pub nx: Option<i64>,
    pub ny: Option<i64>,
}

impl RawObservation {
    pub fn new(category: &str, value: &str) -> Self {
        Self {
            category: category.to_string(),
            value: Some(value.to_string()),
            ..Self::default()
        }
    }
}

/// A cast observation value. Serializes as a bare number, string or null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObservationValue {
    Integer(i64),
    Real(f64),
    /// The original string, kept when casting failed or the code is unknown.
    Text(String),
    Missing,
}

impl ObservationValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ObservationValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

/// The decoded form of one `RawObservation`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEntry {
    #[serde(rename = "코드")]
    pub code: String,
    #[serde(rename = "값")]
    pub value: ObservationValue,
    #[serde(rename = "단위")]
    pub unit: Option<String>,
    /// Precipitation-type description, PTY only.
    #[serde(rename = "설명", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 16-point compass label, VEC only.
    #[serde(rename = "16방위", skip_serializing_if = "Option::is_none")]
    pub compass: Option<String>,
}

/// Normalized observations keyed by display label, one map per group.
/// Maps keep upstream item order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GroupedObservations {
    #[serde(rename = "기온")]
    pub temperature: IndexMap<String, NormalizedEntry>,
    #[serde(rename = "습도")]
    pub humidity: IndexMap<String, NormalizedEntry>,
    #[serde(rename = "강수")]
    pub precipitation: IndexMap<String, NormalizedEntry>,
    #[serde(rename = "바람")]
    pub wind: IndexMap<String, NormalizedEntry>,
    #[serde(rename = "기타")]
    pub other: IndexMap<String, NormalizedEntry>,
}

impl GroupedObservations {
    pub fn group(&self, group: ObservationGroup) -> &IndexMap<String, NormalizedEntry> {
        match group {
            ObservationGroup::Temperature => &self.temperature,
            ObservationGroup::Humidity => &self.humidity,
            ObservationGroup::Precipitation => &self.precipitation,
            ObservationGroup::Wind => &self.wind,
            ObservationGroup::Other => &self.other,
        }
    }

    pub fn group_mut(&mut self, group: ObservationGroup) -> &mut IndexMap<String, NormalizedEntry> {
        match group {
            ObservationGroup::Temperature => &mut self.temperature,
            ObservationGroup::Humidity => &mut self.humidity,
            ObservationGroup::Precipitation => &mut self.precipitation,
            ObservationGroup::Wind => &mut self.wind,
            ObservationGroup::Other => &mut self.other,
        }
    }

    /// Total number of entries across all groups.
    pub fn len(&self) -> usize {
        ObservationGroup::ALL.iter().map(|g| self.group(*g).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Attempt trail and results
// ---------------------------------------------------------------------------

/// Audit entry for one query window that was actually tried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptRecord {
    pub base_date: String,
    pub base_time: String,
    #[serde(rename = "resultCode", skip_serializing_if = "Option::is_none")]
    pub result_code: Option<String>,
    #[serde(rename = "resultMsg", skip_serializing_if = "Option::is_none")]
    pub result_msg: Option<String>,
    pub count: usize,
    /// Transport-level failure detail, when no envelope was parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `발표` block of a successful result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuedWindow {
    pub base_date: String,
    pub base_time: String,
}

/// `발표` block of an exhausted result: the windows that were eligible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateWindows {
    pub base_date: String,
    pub candidate_times: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NowcastReport {
    pub ok: bool,
    #[serde(rename = "지역")]
    pub region: String,
    #[serde(rename = "격자")]
    pub grid: GridPoint,
    #[serde(rename = "발표")]
    pub issued: IssuedWindow,
    #[serde(rename = "실황")]
    pub observations: GroupedObservations,
    pub attempts: Vec<AttemptRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NowcastFailure {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_cities: Option<Vec<String>>,
    #[serde(rename = "지역", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "격자", skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridPoint>,
    #[serde(rename = "발표", skip_serializing_if = "Option::is_none")]
    pub candidates: Option<CandidateWindows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<Vec<AttemptRecord>>,
}

/// Terminal outcome of `get_now_weather`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NowcastResult {
    Success(NowcastReport),
    Failure(NowcastFailure),
}

impl NowcastResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, NowcastResult::Success(_))
    }

    pub fn attempts(&self) -> &[AttemptRecord] {
        match self {
            NowcastResult::Success(report) => &report.attempts,
            NowcastResult::Failure(failure) => failure.attempts.as_deref().unwrap_or(&[]),
        }
    }
}

/// Result of `list_supported_cities`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportedRegions {
    pub supported_cities: Vec<String>,
    pub examples: Vec<String>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from a single upstream request. All of them are recorded in the
/// attempt trail and move the orchestrator on to the next window.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpstreamError {
    /// Non-2xx HTTP response from the KMA API.
    #[error("HTTPStatusError: upstream returned status {0}")]
    HttpStatus(u16),
    /// DNS, connect, timeout or reset.
    #[error("RequestError: {0}")]
    Network(String),
    /// The body was not JSON (the portal answers some key errors in XML).
    #[error("DecodeError: {0}")]
    Decode(String),
}

/// Call-scoped errors that end an invocation before or outside the
/// window loop.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NowcastError {
    #[error("{0} 환경변수가 비어 있습니다.")]
    MissingCredential(String),
    #[error("지원하지 않는 지역입니다.")]
    UnsupportedRegion { input: String, normalized: String },
    #[error("설정 오류: {0}")]
    Config(String),
    #[error("HTTP 클라이언트를 만들 수 없습니다: {0}")]
    Client(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_window_formats_base_date_and_time() {
        let window = QueryWindow {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            hour: 7,
        };
        assert_eq!(window.base_date(), "20240501");
        assert_eq!(window.base_time(), "0700");
        assert_eq!(window.to_string(), "20240501 0700");
    }

    #[test]
    fn test_observation_code_parse_recognizes_known_codes() {
        for code in ["T1H", "REH", "RN1", "PTY", "VEC", "WSD", "UUU", "VVV"] {
            let parsed = ObservationCode::parse(code);
            assert!(
                !matches!(parsed, ObservationCode::Unknown(_)),
                "'{}' should be a known code",
                code
            );
        }
        assert_eq!(
            ObservationCode::parse("LGT"),
            ObservationCode::Unknown("LGT".to_string())
        );
    }

    #[test]
    fn test_observation_value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&ObservationValue::Integer(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&ObservationValue::Real(1.5)).unwrap(), "1.5");
        assert_eq!(
            serde_json::to_string(&ObservationValue::Text("abc".into())).unwrap(),
            "\"abc\""
        );
        assert_eq!(serde_json::to_string(&ObservationValue::Missing).unwrap(), "null");
    }

    #[test]
    fn test_entry_omits_absent_decorations_but_keeps_null_unit() {
        let entry = NormalizedEntry {
            code: "LGT".into(),
            value: ObservationValue::Text("0".into()),
            unit: None,
            description: None,
            compass: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["코드"], "LGT");
        assert!(json["단위"].is_null(), "unit key must be present as null");
        assert!(json.get("설명").is_none());
        assert!(json.get("16방위").is_none());
    }

    #[test]
    fn test_grouped_observations_serialize_all_five_groups_in_order() {
        let json = serde_json::to_string(&GroupedObservations::default()).unwrap();
        assert_eq!(json, r#"{"기온":{},"습도":{},"강수":{},"바람":{},"기타":{}}"#);
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(
            NowcastError::MissingCredential(SERVICE_KEY_ENV.into()).to_string(),
            "KMA_SERVICE_KEY 환경변수가 비어 있습니다."
        );
        assert!(UpstreamError::HttpStatus(500).to_string().contains("500"));
    }
}
