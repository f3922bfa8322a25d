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

//! Aggregation catalog
//!
//! The closed set of canned reports. Each [`Report`] variant is a
//! descriptor: it declares its projection, fixed predicates, group-by
//! keys, default ordering and limit, and hands the combination to the
//! one generic [`SelectQuery`] assembler. Caller filters compose with
//! the fixed predicates; pagination windows are applied by the engine on
//! top of the descriptor's defaults.

use gatelog_core::{Column, Filters};

use crate::predicate::{build, Predicate, QueryScope};
use crate::sql::{Direction, GroupKey, Projection, SelectExpr, SelectQuery, SortKey};

pub const DEFAULT_TOP_ENDPOINT_LIMIT: u64 = 10;
pub const DEFAULT_SLOW_REQUEST_LIMIT: u64 = 50;
/// Duration threshold (seconds) above which a request counts as slow
pub const DEFAULT_SLOW_THRESHOLD_SECS: f64 = 1.0;
pub const DEFAULT_API_ERROR_LIMIT: u64 = 50;
pub const COUNTRY_BREAKDOWN_LIMIT: u64 = 20;
pub const BROKER_TOP_ENDPOINT_LIMIT: u64 = 10;

/// URI prefix that marks a record as API traffic
const API_URI_PREFIX: &str = "/api";

fn any_error() -> Vec<Predicate> {
    vec![Predicate::ge_int(Column::Status, 400)]
}

fn client_error() -> Vec<Predicate> {
    vec![
        Predicate::ge_int(Column::Status, 400),
        Predicate::lt_int(Column::Status, 500),
    ]
}

fn server_error() -> Vec<Predicate> {
    vec![Predicate::ge_int(Column::Status, 500)]
}

/// Named aggregate reports over the enhanced log table
#[derive(Debug, Clone)]
pub enum Report {
    /// Global request totals, error split, average duration, distinct IPs
    BasicStats,
    /// Per-developer request count, broker count, duration, error rate
    DeveloperList,
    /// Distinct developer count under the current filters
    DeveloperCount,
    /// Single-developer totals with first/last-seen timestamps
    DeveloperProfile { developer_id: String },
    /// Single-developer usage breakdown (IPs, bytes, error split, API share)
    DeveloperUsage { developer_id: String },
    /// Per-broker request count, duration, error rate
    BrokerList,
    /// Distinct broker count under the current filters
    BrokerCount,
    /// Single-broker totals with first/last-seen timestamps
    BrokerProfile { broker_id: String },
    /// Single-broker usage breakdown (IPs, bytes, error split)
    BrokerUsage { broker_id: String },
    /// A broker's most-requested URIs
    BrokerTopEndpoints { broker_id: String, limit: u64 },
    /// Global traffic totals and distinct identity counts
    TrafficOverview,
    /// Request volume grouped by hour of day
    TrafficByHour,
    /// Request volume grouped by geo country, blanks excluded
    TrafficByCountry,
    /// Busiest (URI, method) pairs
    TopEndpoints { limit: u64 },
    /// Requests slower than a duration threshold
    SlowRequests { threshold: f64, limit: u64 },
    /// Latency percentiles and error rate for API traffic
    ApiPerformance,
    /// Most recent API requests that failed
    ApiErrors { limit: u64 },
}

impl Report {
    /// Assemble this report's query against the given table
    pub fn query(&self, table: &str, filters: &Filters) -> SelectQuery {
        match self {
            Report::BasicStats => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::count("total_requests"),
                    SelectExpr::count_if(&client_error(), "client_errors"),
                    SelectExpr::count_if(&server_error(), "server_errors"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::count_distinct(Column::RemoteAddr, "unique_ips"),
                ]),
            )
            .filtered(build(filters, QueryScope::All)),

            Report::DeveloperList => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::column(Column::DeveloperId),
                    SelectExpr::count("total_requests"),
                    SelectExpr::count_distinct(Column::BrokerId, "total_brokers"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::count_if(&any_error(), "error_count"),
                    SelectExpr::ratio_if(&any_error(), "error_rate"),
                ]),
            )
            .filtered(build(filters, QueryScope::Developers))
            .group_by(vec![GroupKey::Column(Column::DeveloperId)])
            .order_by(SortKey::Alias("total_requests"), Direction::Desc),

            Report::DeveloperCount => SelectQuery::new(
                table,
                Projection::Exprs(vec![SelectExpr::count_distinct(
                    Column::DeveloperId,
                    "total_developers",
                )]),
            )
            .filtered(build(filters, QueryScope::Developers)),

            Report::DeveloperProfile { developer_id } => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::column(Column::DeveloperId),
                    SelectExpr::count("total_requests"),
                    SelectExpr::count_distinct(Column::BrokerId, "total_brokers"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::count_if(&any_error(), "error_count"),
                    SelectExpr::min(Column::TimeLocal, "first_seen"),
                    SelectExpr::max(Column::TimeLocal, "last_seen"),
                ]),
            )
            .and_where(Predicate::eq_str(Column::DeveloperId, developer_id))
            .group_by(vec![GroupKey::Column(Column::DeveloperId)]),

            Report::DeveloperUsage { developer_id } => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::column(Column::DeveloperId),
                    SelectExpr::count("total_requests"),
                    SelectExpr::count_distinct(Column::BrokerId, "total_brokers"),
                    SelectExpr::count_distinct(Column::RemoteAddr, "unique_ips"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::sum(Column::BodyBytesSent, "total_bytes_sent"),
                    SelectExpr::count_if(&client_error(), "client_errors"),
                    SelectExpr::count_if(&server_error(), "server_errors"),
                    SelectExpr::ratio_if(&any_error(), "error_rate"),
                    SelectExpr::count_if(
                        &[Predicate::prefix(Column::RequestUri, API_URI_PREFIX)],
                        "api_requests",
                    ),
                ]),
            )
            .and_where(Predicate::eq_str(Column::DeveloperId, developer_id))
            .group_by(vec![GroupKey::Column(Column::DeveloperId)]),

            Report::BrokerList => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::column(Column::BrokerId),
                    SelectExpr::column(Column::DeveloperId),
                    SelectExpr::count("total_requests"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::count_if(&any_error(), "error_count"),
                    SelectExpr::ratio_if(&any_error(), "error_rate"),
                ]),
            )
            .filtered(build(filters, QueryScope::Brokers))
            .group_by(vec![
                GroupKey::Column(Column::BrokerId),
                GroupKey::Column(Column::DeveloperId),
            ])
            .order_by(SortKey::Alias("total_requests"), Direction::Desc),

            Report::BrokerCount => SelectQuery::new(
                table,
                Projection::Exprs(vec![SelectExpr::count_distinct(
                    Column::BrokerId,
                    "total_brokers",
                )]),
            )
            .filtered(build(filters, QueryScope::Brokers)),

            Report::BrokerProfile { broker_id } => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::column(Column::BrokerId),
                    SelectExpr::column(Column::DeveloperId),
                    SelectExpr::count("total_requests"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::count_if(&any_error(), "error_count"),
                    SelectExpr::min(Column::TimeLocal, "first_seen"),
                    SelectExpr::max(Column::TimeLocal, "last_seen"),
                ]),
            )
            .and_where(Predicate::eq_str(Column::BrokerId, broker_id))
            .group_by(vec![
                GroupKey::Column(Column::BrokerId),
                GroupKey::Column(Column::DeveloperId),
            ]),

            Report::BrokerUsage { broker_id } => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::column(Column::BrokerId),
                    SelectExpr::column(Column::DeveloperId),
                    SelectExpr::count("total_requests"),
                    SelectExpr::count_distinct(Column::RemoteAddr, "unique_ips"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::sum(Column::BodyBytesSent, "total_bytes_sent"),
                    SelectExpr::count_if(&client_error(), "client_errors"),
                    SelectExpr::count_if(&server_error(), "server_errors"),
                    SelectExpr::ratio_if(&any_error(), "error_rate"),
                ]),
            )
            .and_where(Predicate::eq_str(Column::BrokerId, broker_id))
            .group_by(vec![
                GroupKey::Column(Column::BrokerId),
                GroupKey::Column(Column::DeveloperId),
            ]),

            Report::BrokerTopEndpoints { broker_id, limit } => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::column_as(Column::RequestUri, "uri"),
                    SelectExpr::count("count"),
                ]),
            )
            .and_where(Predicate::eq_str(Column::BrokerId, broker_id))
            .group_by(vec![GroupKey::Column(Column::RequestUri)])
            .order_by(SortKey::Alias("count"), Direction::Desc)
            .limit(*limit),

            Report::TrafficOverview => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::count("total_requests"),
                    SelectExpr::count_distinct(Column::RemoteAddr, "unique_ips"),
                    SelectExpr::count_distinct(Column::BrokerId, "unique_brokers"),
                    SelectExpr::count_distinct(Column::DeveloperId, "unique_developers"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::sum(Column::BodyBytesSent, "total_bytes_sent"),
                    SelectExpr::count_if(&any_error(), "total_errors"),
                    SelectExpr::ratio_if(&any_error(), "error_rate"),
                ]),
            )
            .filtered(build(filters, QueryScope::All)),

            Report::TrafficByHour => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::hour_of(Column::TimeLocal, "hour"),
                    SelectExpr::count("total_requests"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::count_if(&any_error(), "errors"),
                ]),
            )
            .filtered(build(filters, QueryScope::All))
            .group_by(vec![GroupKey::Alias("hour")])
            .order_by(SortKey::Alias("hour"), Direction::Asc),

            Report::TrafficByCountry => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::column_as(Column::GeoCountry, "country"),
                    SelectExpr::count("total_requests"),
                    SelectExpr::count_distinct(Column::RemoteAddr, "unique_ips"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                ]),
            )
            .filtered(build(filters, QueryScope::All))
            .and_where(Predicate::ne_str(Column::GeoCountry, ""))
            .group_by(vec![GroupKey::Column(Column::GeoCountry)])
            .order_by(SortKey::Alias("total_requests"), Direction::Desc)
            .limit(COUNTRY_BREAKDOWN_LIMIT),

            Report::TopEndpoints { limit } => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::column_as(Column::RequestUri, "uri"),
                    SelectExpr::column_as(Column::RequestMethod, "method"),
                    SelectExpr::count("total_requests"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::count_if(&any_error(), "errors"),
                    SelectExpr::ratio_if(&any_error(), "error_rate"),
                ]),
            )
            .filtered(build(filters, QueryScope::All))
            .group_by(vec![
                GroupKey::Column(Column::RequestUri),
                GroupKey::Column(Column::RequestMethod),
            ])
            .order_by(SortKey::Alias("total_requests"), Direction::Desc)
            .limit(*limit),

            Report::SlowRequests { threshold, limit } => SelectQuery::new(
                table,
                Projection::Columns(vec![
                    Column::TimeLocal,
                    Column::RemoteAddr,
                    Column::RequestMethod,
                    Column::RequestUri,
                    Column::Status,
                    Column::RequestTime,
                    Column::BrokerId,
                    Column::DeveloperId,
                ]),
            )
            .and_where(Predicate::gt_parsed(Column::RequestTime, *threshold))
            .filtered(build(filters, QueryScope::All))
            .order_by(SortKey::Parsed(Column::RequestTime), Direction::Desc)
            .limit(*limit),

            Report::ApiPerformance => SelectQuery::new(
                table,
                Projection::Exprs(vec![
                    SelectExpr::count("total_requests"),
                    SelectExpr::count_distinct(Column::DeveloperId, "unique_developers"),
                    SelectExpr::count_distinct(Column::BrokerId, "unique_brokers"),
                    SelectExpr::avg_parsed(Column::RequestTime, "avg_response_time"),
                    SelectExpr::quantile_parsed(0.5, Column::RequestTime, "p50_response_time"),
                    SelectExpr::quantile_parsed(0.95, Column::RequestTime, "p95_response_time"),
                    SelectExpr::quantile_parsed(0.99, Column::RequestTime, "p99_response_time"),
                    SelectExpr::count_if(&any_error(), "errors"),
                    SelectExpr::ratio_if(&any_error(), "error_rate"),
                ]),
            )
            .and_where(Predicate::prefix(Column::RequestUri, API_URI_PREFIX))
            .filtered(build(filters, QueryScope::All)),

            Report::ApiErrors { limit } => SelectQuery::new(
                table,
                Projection::Columns(vec![
                    Column::TimeLocal,
                    Column::RequestId,
                    Column::BrokerId,
                    Column::DeveloperId,
                    Column::RequestMethod,
                    Column::RequestUri,
                    Column::Status,
                    Column::RequestTime,
                    Column::HttpUserAgent,
                ]),
            )
            .and_where(Predicate::ge_int(Column::Status, 400))
            .and_where(Predicate::prefix(Column::RequestUri, API_URI_PREFIX))
            .filtered(build(filters, QueryScope::All))
            .order_by(SortKey::Column(Column::TimeLocal), Direction::Desc)
            .limit(*limit),
        }
    }
}
