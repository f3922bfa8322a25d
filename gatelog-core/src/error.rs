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

//! Error types shared across the Gatelog crates

use thiserror::Error;

/// Result type for Gatelog operations
pub type Result<T> = std::result::Result<T, GatelogError>;

/// Errors surfaced by the analytics layer
///
/// Validation variants are raised before any query executes; `Store`
/// wraps whatever the store client reported and is never retried here.
#[derive(Debug, Error)]
pub enum GatelogError {
    /// Date filter that is present but not parseable
    #[error("invalid date filter: {0}")]
    InvalidDate(String),

    /// Status filter that is present but not numeric
    #[error("invalid status filter: {0}")]
    InvalidStatus(String),

    /// Detail lookup by id matched no rows
    ///
    /// Distinct from an empty listing, which is a success with `total = 0`.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Query execution failure reported by the store client
    #[error("store error: {0}")]
    Store(String),

    /// Configuration file or environment failure
    #[error("configuration error: {0}")]
    Config(String),
}

impl GatelogError {
    /// Wrap a store-side failure, preserving its message
    pub fn store(err: impl std::fmt::Display) -> Self {
        GatelogError::Store(err.to_string())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        GatelogError::NotFound {
            kind,
            id: id.into(),
        }
    }
}
