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

//! ClickHouse HTTP client
//!
//! Executes rendered SQL over ClickHouse's HTTP interface and maps the
//! JSONEachRow response to [`Row`] values. The client owns connection
//! lifecycle, credentials, and timeouts; it performs no retries — a
//! query either returns rows or fails with a store error the caller
//! propagates as-is.

use async_trait::async_trait;
use gatelog_core::{GatelogError, Result, Row, StoreConfig};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Opaque "run query, get rows" service the query layer consumes
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Execute a SELECT and return its rows as ordered field mappings
    async fn select(&self, sql: &str) -> Result<Vec<Row>>;
}

/// [`LogStore`] implementation speaking the ClickHouse HTTP protocol
pub struct ClickHouseHttpClient {
    http: reqwest::Client,
    url: String,
    database: String,
    username: Option<String>,
    password: Option<String>,
}

impl ClickHouseHttpClient {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.query_timeout_secs))
            .build()
            .map_err(GatelogError::store)?;

        info!(url = %config.url, database = %config.database, "store client ready");

        Ok(Self {
            http,
            url: config.url.clone(),
            database: config.database.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

/// Parse a JSONEachRow response body into rows
fn parse_rows(body: &str) -> Result<Vec<Row>> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let value = serde_json::from_str(line).map_err(GatelogError::store)?;
            Row::from_value(value)
                .ok_or_else(|| GatelogError::Store(format!("unexpected row shape: {line}")))
        })
        .collect()
}

#[async_trait]
impl LogStore for ClickHouseHttpClient {
    async fn select(&self, sql: &str) -> Result<Vec<Row>> {
        debug!(sql = %sql, "executing store query");

        let mut request = self
            .http
            .post(&self.url)
            .query(&[
                ("database", self.database.as_str()),
                // 64-bit integers as JSON numbers, not quoted strings
                ("output_format_json_quote_64bit_integers", "0"),
            ])
            .body(format!("{sql} FORMAT JSONEachRow"));

        if let Some(user) = &self.username {
            request = request.header("X-ClickHouse-User", user);
        }
        if let Some(password) = &self.password {
            request = request.header("X-ClickHouse-Key", password);
        }

        let response = request.send().await.map_err(GatelogError::store)?;
        let status = response.status();
        let body = response.text().await.map_err(GatelogError::store)?;

        if !status.is_success() {
            warn!(status = %status, "store query failed");
            return Err(GatelogError::Store(format!(
                "query failed with status {status}: {}",
                body.trim()
            )));
        }

        parse_rows(&body)
    }
}
