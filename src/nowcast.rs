//! Current-weather orchestration.
//!
//! Resolves the requested city, walks the planned query windows in order,
//! classifies each upstream answer, and stops at the first usable one:
//!
//! ```text
//! ResolvingRegion ──unsupported──▶ Done(failure)
//!        │
//!        ▼
//! TryingWindow(0) ──accepted──▶ Done(success)
//!        │ empty / transport failure
//!        ▼
//! TryingWindow(1) ──accepted──▶ Done(success)
//!        │ empty / transport failure
//!        ▼
//! Done(failure)
//! ```
//!
//! Every path yields a `NowcastResult`; nothing here returns `Err` or panics.

use chrono::{DateTime, FixedOffset};

use crate::analysis::normalize_observations;
use crate::catalog::{KmaTables, ReferenceTables};
use crate::config::Config;
use crate::ingest::{KmaClient, ObservationSource, UpstreamResponse};
use crate::logging::{log_empty_window, log_fetch_summary, log_upstream_failure};
use crate::model::{
    AttemptRecord, CandidateWindows, GridPoint, IssuedWindow, NowcastError, NowcastFailure,
    NowcastReport, NowcastResult, QueryWindow, SupportedRegions, UpstreamError, RESULT_CODE_OK,
};
use crate::regions::{normalize_region_name, EXAMPLE_INPUTS};
use crate::schedule::{now_kst, plan_windows_at};

/// Error reported when every window failed without recording a reason.
const UNKNOWN_ERROR: &str = "알 수 없는 오류";

// ---------------------------------------------------------------------------
// Attempt classification
// ---------------------------------------------------------------------------

/// What one upstream call amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Success code and at least one item.
    Accepted(UpstreamResponse),
    /// Parsed, but a non-success code or no items.
    Empty {
        result_code: String,
        result_msg: String,
        count: usize,
    },
    /// HTTP status, network or decode failure.
    TransportFailure(UpstreamError),
}

pub fn classify(result: Result<UpstreamResponse, UpstreamError>) -> AttemptOutcome {
    match result {
        Ok(response) if response.result_code == RESULT_CODE_OK && !response.items.is_empty() => {
            AttemptOutcome::Accepted(response)
        }
        Ok(response) => AttemptOutcome::Empty {
            count: response.items.len(),
            result_code: response.result_code,
            result_msg: response.result_msg,
        },
        Err(err) => AttemptOutcome::TransportFailure(err),
    }
}

/// Last-error message for a window that parsed but had nothing usable.
pub fn empty_data_message(result_code: &str, count: usize) -> String {
    format!(
        "empty data: 정상 응답이지만 데이터가 비어있습니다(resultCode={}, count={})",
        result_code, count
    )
}

fn attempt_record(window: &QueryWindow) -> AttemptRecord {
    AttemptRecord {
        base_date: window.base_date(),
        base_time: window.base_time(),
        result_code: None,
        result_msg: None,
        count: 0,
        error: None,
    }
}

// ---------------------------------------------------------------------------
// Failure payloads
// ---------------------------------------------------------------------------

impl NowcastFailure {
    fn from_error(err: &NowcastError) -> Self {
        Self {
            ok: false,
            error: err.to_string(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Reads a variable from the process environment.
pub type KeyLookup = fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Entry point for the two inbound operations.
pub struct Nowcaster<R = KmaTables> {
    config: Config,
    tables: R,
    key_lookup: KeyLookup,
}

impl Nowcaster<KmaTables> {
    pub fn new(config: Config) -> Self {
        Self::with_tables(config, KmaTables)
    }
}

impl<R: ReferenceTables> Nowcaster<R> {
    pub fn with_tables(config: Config, tables: R) -> Self {
        Self {
            config,
            tables,
            key_lookup: process_env,
        }
    }

    /// Replaces the environment lookup used to find `KMA_SERVICE_KEY`.
    pub fn with_key_lookup(mut self, lookup: KeyLookup) -> Self {
        self.key_lookup = lookup;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Supported region keys (sorted) and example inputs that resolve to them.
    pub fn list_supported_regions(&self) -> SupportedRegions {
        SupportedRegions {
            supported_cities: self.tables.region_keys(),
            examples: EXAMPLE_INPUTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Fetches the latest observation for `city` from the KMA API.
    ///
    /// The credential is resolved per call and a fresh client is built per
    /// call; nothing is shared between invocations.
    pub fn get_now_weather(&self, city: &str) -> NowcastResult {
        let service_key = match self.config.resolve_service_key_with(self.key_lookup) {
            Ok(key) => key,
            Err(err) => {
                tracing::error!("{}", err);
                return NowcastResult::Failure(NowcastFailure::from_error(&err));
            }
        };

        if let Err(failure) = self.resolve_region(city) {
            return NowcastResult::Failure(failure);
        }

        let client = match KmaClient::new(&self.config.upstream, &service_key) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!("{}", err);
                return NowcastResult::Failure(NowcastFailure::from_error(&err));
            }
        };

        self.get_now_weather_with(&client, city, now_kst())
    }

    /// Same as `get_now_weather` but with an injected source and clock, and
    /// no credential check.
    pub fn get_now_weather_with<S: ObservationSource + ?Sized>(
        &self,
        source: &S,
        city: &str,
        now: DateTime<FixedOffset>,
    ) -> NowcastResult {
        let (region, grid) = match self.resolve_region(city) {
            Ok(resolved) => resolved,
            Err(failure) => return NowcastResult::Failure(failure),
        };

        let windows = plan_windows_at(now);
        let base_date = windows
            .first()
            .map(QueryWindow::base_date)
            .unwrap_or_default();

        let mut attempts: Vec<AttemptRecord> = Vec::with_capacity(windows.len());
        let mut last_error: Option<String> = None;

        for window in &windows {
            let mut record = attempt_record(window);

            match classify(source.fetch(window, grid)) {
                AttemptOutcome::Accepted(response) => {
                    record.result_code = Some(response.result_code);
                    record.result_msg = Some(response.result_msg);
                    record.count = response.items.len();
                    attempts.push(record);

                    log_fetch_summary(&region, &attempts, Some(window));
                    return NowcastResult::Success(NowcastReport {
                        ok: true,
                        observations: normalize_observations(&response.items, &self.tables),
                        region,
                        grid,
                        issued: IssuedWindow {
                            base_date: window.base_date(),
                            base_time: window.base_time(),
                        },
                        attempts,
                    });
                }
                AttemptOutcome::Empty {
                    result_code,
                    result_msg,
                    count,
                } => {
                    log_empty_window(&region, window, &result_code, count);
                    last_error = Some(empty_data_message(&result_code, count));
                    record.result_code = Some(result_code);
                    record.result_msg = Some(result_msg);
                    record.count = count;
                    attempts.push(record);
                }
                AttemptOutcome::TransportFailure(err) => {
                    log_upstream_failure(&region, window, &err);
                    record.error = Some(err.to_string());
                    last_error = Some(err.to_string());
                    attempts.push(record);
                }
            }
        }

        log_fetch_summary(&region, &attempts, None);
        NowcastResult::Failure(NowcastFailure {
            ok: false,
            error: last_error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            region: Some(region),
            grid: Some(grid),
            candidates: Some(CandidateWindows {
                base_date,
                candidate_times: windows.iter().map(QueryWindow::base_time).collect(),
            }),
            attempts: Some(attempts),
            ..NowcastFailure::default()
        })
    }

    /// Normalizes `city` and looks it up. The failure carries the original
    /// input, the normalized form and the supported set.
    fn resolve_region(&self, city: &str) -> Result<(String, GridPoint), NowcastFailure> {
        let normalized = normalize_region_name(city);
        match self.tables.region(&normalized) {
            Some(grid) => Ok((normalized, grid)),
            None => {
                let err = NowcastError::UnsupportedRegion {
                    input: city.to_string(),
                    normalized: normalized.clone(),
                };
                tracing::info!(input = city, normalized = %normalized, "unsupported region");
                Err(NowcastFailure {
                    input: Some(city.to_string()),
                    normalized: Some(normalized),
                    supported_cities: Some(self.tables.region_keys()),
                    ..NowcastFailure::from_error(&err)
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
