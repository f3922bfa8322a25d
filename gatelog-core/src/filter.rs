// Copyright 2025 Gatelog (https://github.com/gatelog)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Filter normalization
//!
//! Callers hand in raw, optional, untrusted strings ([`FilterInput`] for
//! the full filter surface, [`DateRange`] for reports that only take a
//! time window). Normalization produces a typed [`Filters`] set: blank
//! and absent keys are dropped silently, dates are re-emitted in the
//! store's native timestamp format, the status code is strictly numeric,
//! and the HTTP method is upper-cased. Malformed non-blank dates and
//! non-numeric status values fail the request before any query runs.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{GatelogError, Result};

/// Timestamp format of the enhanced table's time column
///
/// Zero-padded and all-numeric, so byte-wise comparison of two formatted
/// values matches chronological order across month and year boundaries.
pub const STORE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_T_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Raw filter values as received from the caller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterInput {
    pub ip: Option<String>,
    pub status: Option<String>,
    pub method: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub developer_id: Option<String>,
    pub broker_id: Option<String>,
}

/// Raw date window for the traffic and API reports
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated, canonicalized filter set
///
/// Every present value has passed validation; absent keys impose no
/// predicate. Constructed fresh per request and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Substring to match against the remote address
    pub ip: Option<String>,
    pub status: Option<u16>,
    /// Upper-cased HTTP method, matched exactly
    pub method: Option<String>,
    /// Inclusive lower time bound in [`STORE_TIME_FORMAT`]
    pub start_time: Option<String>,
    /// Inclusive upper time bound in [`STORE_TIME_FORMAT`]
    pub end_time: Option<String>,
    pub developer_id: Option<String>,
    pub broker_id: Option<String>,
}

enum DayBound {
    Start,
    End,
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a caller-supplied calendar date and re-emit it in the store
/// format. Date-only input snaps to the start or end of that day.
fn normalize_date(raw: &str, bound: DayBound) -> Result<String> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, STORE_TIME_FORMAT) {
        return Ok(dt.format(STORE_TIME_FORMAT).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, DATE_TIME_T_FORMAT) {
        return Ok(dt.format(STORE_TIME_FORMAT).to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT) {
        let dt = match bound {
            DayBound::Start => date.and_hms_opt(0, 0, 0),
            DayBound::End => date.and_hms_opt(23, 59, 59),
        };
        // and_hms_opt only fails for out-of-range times, which these are not
        let dt = dt.ok_or_else(|| GatelogError::InvalidDate(raw.to_string()))?;
        return Ok(dt.format(STORE_TIME_FORMAT).to_string());
    }
    Err(GatelogError::InvalidDate(raw.to_string()))
}

impl Filters {
    /// Normalize the full filter surface
    pub fn from_input(input: &FilterInput) -> Result<Self> {
        let status = match present(&input.status) {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .map_err(|_| GatelogError::InvalidStatus(raw.to_string()))?,
            ),
            None => None,
        };

        let start_time = match present(&input.start_date) {
            Some(raw) => Some(normalize_date(raw, DayBound::Start)?),
            None => None,
        };
        let end_time = match present(&input.end_date) {
            Some(raw) => Some(normalize_date(raw, DayBound::End)?),
            None => None,
        };

        Ok(Filters {
            ip: present(&input.ip).map(str::to_string),
            status,
            method: present(&input.method).map(str::to_uppercase),
            start_time,
            end_time,
            developer_id: present(&input.developer_id).map(str::to_string),
            broker_id: present(&input.broker_id).map(str::to_string),
        })
    }

    /// Normalize a bare date window
    pub fn from_range(range: &DateRange) -> Result<Self> {
        Filters::from_input(&FilterInput {
            start_date: range.start_date.clone(),
            end_date: range.end_date.clone(),
            ..FilterInput::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.ip.is_none()
            && self.status.is_none()
            && self.method.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.developer_id.is_none()
            && self.broker_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_absent_keys_are_dropped() {
        let input = FilterInput {
            ip: Some("   ".to_string()),
            status: Some(String::new()),
            method: None,
            ..FilterInput::default()
        };
        let filters = Filters::from_input(&input).unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_method_is_upper_cased() {
        let input = FilterInput {
            method: Some("post".to_string()),
            ..FilterInput::default()
        };
        let filters = Filters::from_input(&input).unwrap();
        assert_eq!(filters.method.as_deref(), Some("POST"));
    }

    #[test]
    fn test_status_requires_numeric_input() {
        let input = FilterInput {
            status: Some("404".to_string()),
            ..FilterInput::default()
        };
        assert_eq!(Filters::from_input(&input).unwrap().status, Some(404));

        let input = FilterInput {
            status: Some("4xx".to_string()),
            ..FilterInput::default()
        };
        assert!(matches!(
            Filters::from_input(&input),
            Err(GatelogError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_date_only_bounds_snap_to_day_edges() {
        let input = FilterInput {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-02".to_string()),
            ..FilterInput::default()
        };
        let filters = Filters::from_input(&input).unwrap();
        assert_eq!(filters.start_time.as_deref(), Some("2024-01-01 00:00:00"));
        assert_eq!(filters.end_time.as_deref(), Some("2024-01-02 23:59:59"));
    }

    #[test]
    fn test_datetime_inputs_pass_through() {
        let input = FilterInput {
            start_date: Some("2024-03-05 08:30:00".to_string()),
            end_date: Some("2024-03-05T09:00:00".to_string()),
            ..FilterInput::default()
        };
        let filters = Filters::from_input(&input).unwrap();
        assert_eq!(filters.start_time.as_deref(), Some("2024-03-05 08:30:00"));
        assert_eq!(filters.end_time.as_deref(), Some("2024-03-05 09:00:00"));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let input = FilterInput {
            start_date: Some("01/Jan/2024".to_string()),
            ..FilterInput::default()
        };
        assert!(matches!(
            Filters::from_input(&input),
            Err(GatelogError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_month_boundary_stays_byte_wise_monotonic() {
        // The formatted representation must order chronologically under
        // plain byte comparison, including across month and year edges.
        let pairs = [
            ("2024-01-31", "2024-02-01"),
            ("2023-12-31", "2024-01-01"),
            ("2024-09-30", "2024-10-01"),
        ];
        for (earlier, later) in pairs {
            let a = normalize_date(earlier, DayBound::End).unwrap();
            let b = normalize_date(later, DayBound::Start).unwrap();
            assert!(a < b, "{a} should sort before {b}");
        }
    }

    #[test]
    fn test_from_range_only_sets_time_bounds() {
        let range = DateRange {
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        };
        let filters = Filters::from_range(&range).unwrap();
        assert!(filters.start_time.is_some());
        assert!(filters.end_time.is_none());
        assert!(filters.ip.is_none() && filters.status.is_none());
    }
}
