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

//! Gatelog Core
//!
//! Fundamental data structures for access-log analytics: the enhanced
//! log schema and its column allow-list, typed filter sets, store
//! configuration, the shared error type, and the generic row mapping
//! returned by the store.

pub mod config;
pub mod error;
pub mod filter;
pub mod row;
pub mod schema;

pub use config::{StoreConfig, DEFAULT_QUERY_TIMEOUT_SECS};
pub use error::{GatelogError, Result};
pub use filter::{DateRange, FilterInput, Filters, STORE_TIME_FORMAT};
pub use row::Row;
pub use schema::{Column, LogRecord, ENHANCED_LOG_TABLE};
