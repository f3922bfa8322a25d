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

//! Typed aggregate results
//!
//! One struct per report row, each built from a store [`Row`] through the
//! lenient accessors, so quoted 64-bit integers and degenerate float
//! values (null/nan/inf from empty aggregates) never surface to callers.

use gatelog_core::Row;
use serde::{Deserialize, Serialize};

/// Global request totals and error split
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_requests: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    pub avg_response_time: f64,
    pub unique_ips: u64,
}

impl BasicStats {
    pub fn from_row(row: &Row) -> Self {
        Self {
            total_requests: row.u64_field("total_requests"),
            client_errors: row.u64_field("client_errors"),
            server_errors: row.u64_field("server_errors"),
            avg_response_time: row.f64_field("avg_response_time"),
            unique_ips: row.u64_field("unique_ips"),
        }
    }
}

/// One row of the developer listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeveloperSummary {
    pub developer_id: String,
    pub total_requests: u64,
    pub total_brokers: u64,
    pub avg_response_time: f64,
    pub error_count: u64,
    pub error_rate: f64,
}

impl DeveloperSummary {
    pub fn from_row(row: &Row) -> Self {
        Self {
            developer_id: row.str_field("developer_id"),
            total_requests: row.u64_field("total_requests"),
            total_brokers: row.u64_field("total_brokers"),
            avg_response_time: row.f64_field("avg_response_time"),
            error_count: row.u64_field("error_count"),
            error_rate: row.f64_field("error_rate"),
        }
    }
}

/// Single-developer totals with first/last-seen timestamps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeveloperProfile {
    pub developer_id: String,
    pub total_requests: u64,
    pub total_brokers: u64,
    pub avg_response_time: f64,
    pub error_count: u64,
    pub first_seen: String,
    pub last_seen: String,
}

impl DeveloperProfile {
    pub fn from_row(row: &Row) -> Self {
        Self {
            developer_id: row.str_field("developer_id"),
            total_requests: row.u64_field("total_requests"),
            total_brokers: row.u64_field("total_brokers"),
            avg_response_time: row.f64_field("avg_response_time"),
            error_count: row.u64_field("error_count"),
            first_seen: row.str_field("first_seen"),
            last_seen: row.str_field("last_seen"),
        }
    }
}

/// Single-developer usage breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeveloperUsage {
    pub developer_id: String,
    pub total_requests: u64,
    pub total_brokers: u64,
    pub unique_ips: u64,
    pub avg_response_time: f64,
    pub total_bytes_sent: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    pub error_rate: f64,
    pub api_requests: u64,
}

impl DeveloperUsage {
    pub fn from_row(row: &Row) -> Self {
        Self {
            developer_id: row.str_field("developer_id"),
            total_requests: row.u64_field("total_requests"),
            total_brokers: row.u64_field("total_brokers"),
            unique_ips: row.u64_field("unique_ips"),
            avg_response_time: row.f64_field("avg_response_time"),
            total_bytes_sent: row.u64_field("total_bytes_sent"),
            client_errors: row.u64_field("client_errors"),
            server_errors: row.u64_field("server_errors"),
            error_rate: row.f64_field("error_rate"),
            api_requests: row.u64_field("api_requests"),
        }
    }
}

/// One row of the broker listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrokerSummary {
    pub broker_id: String,
    pub developer_id: String,
    pub total_requests: u64,
    pub avg_response_time: f64,
    pub error_count: u64,
    pub error_rate: f64,
}

impl BrokerSummary {
    pub fn from_row(row: &Row) -> Self {
        Self {
            broker_id: row.str_field("broker_id"),
            developer_id: row.str_field("developer_id"),
            total_requests: row.u64_field("total_requests"),
            avg_response_time: row.f64_field("avg_response_time"),
            error_count: row.u64_field("error_count"),
            error_rate: row.f64_field("error_rate"),
        }
    }
}

/// Single-broker totals with first/last-seen timestamps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrokerProfile {
    pub broker_id: String,
    pub developer_id: String,
    pub total_requests: u64,
    pub avg_response_time: f64,
    pub error_count: u64,
    pub first_seen: String,
    pub last_seen: String,
}

impl BrokerProfile {
    pub fn from_row(row: &Row) -> Self {
        Self {
            broker_id: row.str_field("broker_id"),
            developer_id: row.str_field("developer_id"),
            total_requests: row.u64_field("total_requests"),
            avg_response_time: row.f64_field("avg_response_time"),
            error_count: row.u64_field("error_count"),
            first_seen: row.str_field("first_seen"),
            last_seen: row.str_field("last_seen"),
        }
    }
}

/// Request count for one of a broker's endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointCount {
    pub uri: String,
    pub count: u64,
}

impl EndpointCount {
    pub fn from_row(row: &Row) -> Self {
        Self {
            uri: row.str_field("uri"),
            count: row.u64_field("count"),
        }
    }
}

/// Single-broker usage breakdown, including its busiest endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrokerUsage {
    pub broker_id: String,
    pub developer_id: String,
    pub total_requests: u64,
    pub unique_ips: u64,
    pub avg_response_time: f64,
    pub total_bytes_sent: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    pub error_rate: f64,
    pub top_endpoints: Vec<EndpointCount>,
}

impl BrokerUsage {
    /// The endpoint breakdown comes from a second query; the engine
    /// fills it in after building the base row.
    pub fn from_row(row: &Row) -> Self {
        Self {
            broker_id: row.str_field("broker_id"),
            developer_id: row.str_field("developer_id"),
            total_requests: row.u64_field("total_requests"),
            unique_ips: row.u64_field("unique_ips"),
            avg_response_time: row.f64_field("avg_response_time"),
            total_bytes_sent: row.u64_field("total_bytes_sent"),
            client_errors: row.u64_field("client_errors"),
            server_errors: row.u64_field("server_errors"),
            error_rate: row.f64_field("error_rate"),
            top_endpoints: Vec::new(),
        }
    }
}

/// Global traffic totals over an optional date window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficOverview {
    pub total_requests: u64,
    pub unique_ips: u64,
    pub unique_brokers: u64,
    pub unique_developers: u64,
    pub avg_response_time: f64,
    pub total_bytes_sent: u64,
    pub total_errors: u64,
    pub error_rate: f64,
}

impl TrafficOverview {
    pub fn from_row(row: &Row) -> Self {
        Self {
            total_requests: row.u64_field("total_requests"),
            unique_ips: row.u64_field("unique_ips"),
            unique_brokers: row.u64_field("unique_brokers"),
            unique_developers: row.u64_field("unique_developers"),
            avg_response_time: row.f64_field("avg_response_time"),
            total_bytes_sent: row.u64_field("total_bytes_sent"),
            total_errors: row.u64_field("total_errors"),
            error_rate: row.f64_field("error_rate"),
        }
    }
}

/// One hour-of-day bucket of the traffic breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlyTraffic {
    pub hour: u8,
    pub total_requests: u64,
    pub avg_response_time: f64,
    pub errors: u64,
}

impl HourlyTraffic {
    pub fn from_row(row: &Row) -> Self {
        Self {
            hour: row.u64_field("hour") as u8,
            total_requests: row.u64_field("total_requests"),
            avg_response_time: row.f64_field("avg_response_time"),
            errors: row.u64_field("errors"),
        }
    }
}

/// One country bucket of the traffic breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryTraffic {
    pub country: String,
    pub total_requests: u64,
    pub unique_ips: u64,
    pub avg_response_time: f64,
}

impl CountryTraffic {
    pub fn from_row(row: &Row) -> Self {
        Self {
            country: row.str_field("country"),
            total_requests: row.u64_field("total_requests"),
            unique_ips: row.u64_field("unique_ips"),
            avg_response_time: row.f64_field("avg_response_time"),
        }
    }
}

/// One (URI, method) bucket of the top-endpoints report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointStats {
    pub uri: String,
    pub method: String,
    pub total_requests: u64,
    pub avg_response_time: f64,
    pub errors: u64,
    pub error_rate: f64,
}

impl EndpointStats {
    pub fn from_row(row: &Row) -> Self {
        Self {
            uri: row.str_field("uri"),
            method: row.str_field("method"),
            total_requests: row.u64_field("total_requests"),
            avg_response_time: row.f64_field("avg_response_time"),
            errors: row.u64_field("errors"),
            error_rate: row.f64_field("error_rate"),
        }
    }
}

/// Latency percentiles and error rate for API traffic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPerformance {
    pub total_requests: u64,
    pub unique_developers: u64,
    pub unique_brokers: u64,
    pub avg_response_time: f64,
    pub p50_response_time: f64,
    pub p95_response_time: f64,
    pub p99_response_time: f64,
    pub errors: u64,
    pub error_rate: f64,
}

impl ApiPerformance {
    pub fn from_row(row: &Row) -> Self {
        Self {
            total_requests: row.u64_field("total_requests"),
            unique_developers: row.u64_field("unique_developers"),
            unique_brokers: row.u64_field("unique_brokers"),
            avg_response_time: row.f64_field("avg_response_time"),
            p50_response_time: row.f64_field("p50_response_time"),
            p95_response_time: row.f64_field("p95_response_time"),
            p99_response_time: row.f64_field("p99_response_time"),
            errors: row.u64_field("errors"),
            error_rate: row.f64_field("error_rate"),
        }
    }
}
