//! KMA ultra-short-term observation (초단기실황) API client.
//!
//! Calls `getUltraSrtNcst` on the data.go.kr gateway for one grid cell and
//! one (base_date, base_time) window, and pulls the header and item list
//! out of the JSON envelope:
//!
//! ```text
//! {"response": {"header": {"resultCode": "00", "resultMsg": "NORMAL_SERVICE"},
//!               "body": {"items": {"item": [{"category": "T1H", "obsrValue": "21.3", ...}]}}}}
//! ```
//!
//! API guide: 기상청41_단기예보 조회서비스_오픈API활용가이드 (data.go.kr 15084084).
//!
//! The client never retries; falling back to an earlier window is the
//! orchestrator's job.

use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::model::{GridPoint, NowcastError, QueryWindow, RawObservation, UpstreamError};

/// Default `getUltraSrtNcst` endpoint.
pub const ULTRA_SRT_NCST_URL: &str =
    "https://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getUltraSrtNcst";

/// Longest slice of a non-JSON body echoed into a decode error.
const BODY_SNIPPET_CHARS: usize = 120;

// ============================================================================
// Response types
// ============================================================================

/// The parts of one upstream response the orchestrator looks at.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpstreamResponse {
    pub result_code: String,
    pub result_msg: String,
    pub items: Vec<RawObservation>,
}

/// Anything that can answer one observation request. `KmaClient` is the
/// real implementation; tests script their own.
pub trait ObservationSource {
    fn fetch(&self, window: &QueryWindow, grid: GridPoint) -> Result<UpstreamResponse, UpstreamError>;
}

// ============================================================================
// API Client
// ============================================================================

/// Blocking client for one invocation. Holds the credential; never log it.
pub struct KmaClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    service_key: String,
    page_size: u32,
}

impl KmaClient {
    /// Builds a client with the configured per-request timeout.
    pub fn new(config: &UpstreamConfig, service_key: &str) -> Result<Self, NowcastError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("kma_nowcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NowcastError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            service_key: service_key.to_string(),
            page_size: config.page_size,
        })
    }

    /// Query parameters for one request. One page sized to hold every
    /// category, JSON negotiated explicitly.
    pub fn query_params(&self, window: &QueryWindow, grid: GridPoint) -> Vec<(&'static str, String)> {
        vec![
            ("serviceKey", self.service_key.clone()),
            ("numOfRows", self.page_size.to_string()),
            ("pageNo", "1".to_string()),
            ("dataType", "JSON".to_string()),
            ("base_date", window.base_date()),
            ("base_time", window.base_time()),
            ("nx", grid.nx.to_string()),
            ("ny", grid.ny.to_string()),
        ]
    }
}

impl ObservationSource for KmaClient {
    fn fetch(&self, window: &QueryWindow, grid: GridPoint) -> Result<UpstreamResponse, UpstreamError> {
        debug!(window = %window, grid = %grid, "requesting getUltraSrtNcst");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.query_params(window, grid))
            .header(ACCEPT, "application/json")
            .send()
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::HttpStatus(status.as_u16()));
        }

        let body = response.text().map_err(network_error)?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Decode(format!("{} (body: {})", e, snippet(&body))))?;

        Ok(parse_envelope(&json))
    }
}

/// Maps a reqwest error without the request URL, which carries the
/// service key.
fn network_error(err: reqwest::Error) -> UpstreamError {
    let err = err.without_url();
    if err.is_timeout() {
        UpstreamError::Network(format!("request timed out: {}", err))
    } else {
        UpstreamError::Network(err.to_string())
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("{}…", cut)
    }
}

// ============================================================================
// Envelope parsing
// ============================================================================

/// Extracts the result code, message and items from a decoded envelope.
///
/// Missing header fields become empty strings; the orchestrator treats any
/// code other than "00" as "not available yet".
pub fn parse_envelope(json: &Value) -> UpstreamResponse {
    let header = json.pointer("/response/header");
    let header_text = |field: &str| {
        header
            .and_then(|h| h.get(field))
            .and_then(value_as_text)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    UpstreamResponse {
        result_code: header_text("resultCode"),
        result_msg: header_text("resultMsg"),
        items: extract_items(json),
    }
}

/// Pulls `response.body.items.item` out of the envelope.
///
/// `item` may be a list, a single object, or absent (the gateway sends
/// `"items": ""` when there is nothing). Every structural surprise degrades
/// to an empty list rather than an error.
pub fn extract_items(json: &Value) -> Vec<RawObservation> {
    match json.pointer("/response/body/items/item") {
        Some(Value::Array(items)) => items.iter().filter_map(parse_item).collect(),
        Some(item @ Value::Object(_)) => parse_item(item).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn parse_item(item: &Value) -> Option<RawObservation> {
    let fields = item.as_object()?;
    let text = |key: &str| fields.get(key).and_then(value_as_text);

    Some(RawObservation {
        category: text("category").map(|s| s.trim().to_string()).unwrap_or_default(),
        value: text("obsrValue"),
        numeric: matches!(fields.get("obsrValue"), Some(Value::Number(_))),
        base_date: text("baseDate"),
        base_time: text("baseTime"),
        nx: fields.get("nx").and_then(value_as_i64),
        ny: fields.get("ny").and_then(value_as_i64),
    })
}

/// Scalars as text; the gateway sends numbers both quoted and bare.
fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
