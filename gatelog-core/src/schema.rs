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

//! Schema of the enhanced access-log table
//!
//! The enhanced table is the enriched record store (gateway access logs
//! plus derived identity and geo fields) that every query in this crate
//! family targets. Queryable columns are closed under the [`Column`]
//! enum: generated SQL never contains an identifier that did not come
//! from here.

use serde::{Deserialize, Serialize};

use crate::row::Row;

/// Base name of the enhanced access-log table
pub const ENHANCED_LOG_TABLE: &str = "access_logs_enhanced";

/// Columns of the enhanced table this layer is allowed to reference
///
/// Filter values, group keys, and order keys all resolve through this
/// allow-list; user input never supplies a column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    /// Request time, stored as a `%Y-%m-%d %H:%M:%S` string
    TimeLocal,
    RemoteAddr,
    RequestMethod,
    RequestUri,
    Status,
    /// Request duration in seconds, stored as a string that may be
    /// unparsable for short-circuited requests
    RequestTime,
    BodyBytesSent,
    BrokerId,
    DeveloperId,
    GeoCountry,
    HttpUserAgent,
    RequestId,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::TimeLocal => "time_local",
            Column::RemoteAddr => "remote_addr",
            Column::RequestMethod => "request_method",
            Column::RequestUri => "request_uri",
            Column::Status => "status",
            Column::RequestTime => "request_time",
            Column::BodyBytesSent => "body_bytes_sent",
            Column::BrokerId => "broker_id",
            Column::DeveloperId => "developer_id",
            Column::GeoCountry => "geo_country",
            Column::HttpUserAgent => "http_user_agent",
            Column::RequestId => "request_id",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One access-log record as read back from the enhanced table
///
/// Records are immutable once written; the ingestion path owns them
/// entirely. Listings project either the full row or the subset a report
/// declares, so every field defaults to its zero value when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogRecord {
    pub time_local: String,
    pub remote_addr: String,
    pub request_method: String,
    pub request_uri: String,
    pub status: u16,
    pub request_time: String,
    pub body_bytes_sent: u64,
    pub broker_id: String,
    pub developer_id: String,
    pub geo_country: String,
    pub http_user_agent: String,
    pub request_id: String,
}

impl LogRecord {
    /// Build a record from a store row, tolerating missing columns
    pub fn from_row(row: &Row) -> Self {
        Self {
            time_local: row.str_field(Column::TimeLocal.as_str()),
            remote_addr: row.str_field(Column::RemoteAddr.as_str()),
            request_method: row.str_field(Column::RequestMethod.as_str()),
            request_uri: row.str_field(Column::RequestUri.as_str()),
            status: row.u64_field(Column::Status.as_str()) as u16,
            request_time: row.str_field(Column::RequestTime.as_str()),
            body_bytes_sent: row.u64_field(Column::BodyBytesSent.as_str()),
            broker_id: row.str_field(Column::BrokerId.as_str()),
            developer_id: row.str_field(Column::DeveloperId.as_str()),
            geo_country: row.str_field(Column::GeoCountry.as_str()),
            http_user_agent: row.str_field(Column::HttpUserAgent.as_str()),
            request_id: row.str_field(Column::RequestId.as_str()),
        }
    }
}
