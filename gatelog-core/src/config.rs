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

//! Store connection configuration
//!
//! All connection and table-name state is carried explicitly in
//! [`StoreConfig`] and passed into the components that need it; there is
//! no ambient global. Table names resolve once, at engine construction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GatelogError, Result};

/// Default per-query timeout toward the store
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// ClickHouse connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// HTTP endpoint of the store (e.g., "http://127.0.0.1:8123")
    #[serde(default = "default_url")]
    pub url: String,

    /// Database holding the access-log tables
    #[serde(default = "default_database")]
    pub database: String,

    /// Credentials, sent as ClickHouse HTTP headers when present
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,

    /// Prefix prepended to every resolved table name
    #[serde(default)]
    pub table_prefix: String,

    /// Per-query timeout in seconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_url() -> String {
    "http://127.0.0.1:8123".to_string()
}

fn default_database() -> String {
    "default".to_string()
}

fn default_query_timeout() -> u64 {
    DEFAULT_QUERY_TIMEOUT_SECS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            database: default_database(),
            username: None,
            password: None,
            table_prefix: String::new(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatelogError::Config(format!("failed to read config file: {e}"))
        })?;
        toml::from_str(&content)
            .map_err(|e| GatelogError::Config(format!("failed to parse config file: {e}")))
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - GATELOG_STORE_URL: store HTTP endpoint (default: http://127.0.0.1:8123)
    /// - GATELOG_STORE_DATABASE: database name (default: default)
    /// - GATELOG_STORE_USER / GATELOG_STORE_PASSWORD: credentials
    /// - GATELOG_TABLE_PREFIX: table-name prefix
    /// - GATELOG_QUERY_TIMEOUT: per-query timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("GATELOG_STORE_URL") {
            config.url = url;
        }
        if let Ok(database) = std::env::var("GATELOG_STORE_DATABASE") {
            config.database = database;
        }
        if let Ok(user) = std::env::var("GATELOG_STORE_USER") {
            config.username = Some(user);
        }
        if let Ok(password) = std::env::var("GATELOG_STORE_PASSWORD") {
            config.password = Some(password);
        }
        if let Ok(prefix) = std::env::var("GATELOG_TABLE_PREFIX") {
            config.table_prefix = prefix;
        }
        if let Ok(timeout) = std::env::var("GATELOG_QUERY_TIMEOUT") {
            if let Ok(val) = timeout.parse() {
                config.query_timeout_secs = val;
            }
        }

        config
    }

    /// Resolve a base table name against the configured prefix
    pub fn table_name(&self, base: &str) -> String {
        format!("{}{}", self.table_prefix, base)
    }
}
