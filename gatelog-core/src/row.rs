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

//! Generic result rows returned by the store
//!
//! ClickHouse's JSON output renders 64-bit integers as quoted strings
//! depending on server settings, and aggregate columns over empty inputs
//! come back as `null`, `nan`, or `inf`. The accessors here absorb all of
//! that: numeric reads accept numbers or numeric strings, and non-finite
//! values collapse to zero so degenerate rates never leak to callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row: an ordered field-value mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new(fields: Map<String, Value>) -> Self {
        Row(fields)
    }

    /// Build a row from a JSON value; anything but an object is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Row(map)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String field, empty when absent or null
    pub fn str_field(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Unsigned integer field, accepting quoted 64-bit integers
    pub fn u64_field(&self, field: &str) -> u64 {
        match self.0.get(field) {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(Value::String(s)) => s.parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Float field; null, unparsable, and non-finite values read as 0.0
    pub fn f64_field(&self, field: &str) -> f64 {
        let parsed = match self.0.get(field) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        };
        if parsed.is_finite() {
            parsed
        } else {
            0.0
        }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Row(fields)
    }
}
