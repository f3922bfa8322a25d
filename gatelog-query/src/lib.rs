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

//! Gatelog Query Engine
//!
//! High-level API for querying access-log analytics: filter predicates,
//! SQL assembly, the canned report catalog, pagination, and the
//! [`Gatelog`] engine tying them to a store client.

pub mod engine;
pub mod metrics;
pub mod paginate;
pub mod predicate;
pub mod reports;
pub mod sql;

pub use engine::Gatelog;
pub use metrics::{
    ApiPerformance, BasicStats, BrokerProfile, BrokerSummary, BrokerUsage, CountryTraffic,
    DeveloperProfile, DeveloperSummary, DeveloperUsage, EndpointCount, EndpointStats,
    HourlyTraffic, TrafficOverview,
};
pub use paginate::{
    Page, PageMeta, PageRequest, DEFAULT_IDENTITY_PAGE_SIZE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use predicate::{build, Literal, Predicate, QueryScope};
pub use reports::{
    Report, DEFAULT_API_ERROR_LIMIT, DEFAULT_SLOW_REQUEST_LIMIT, DEFAULT_SLOW_THRESHOLD_SECS,
    DEFAULT_TOP_ENDPOINT_LIMIT,
};
pub use sql::{Direction, GroupKey, Projection, SelectExpr, SelectQuery, SortKey};
