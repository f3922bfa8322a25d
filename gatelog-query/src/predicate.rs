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

//! Predicate construction
//!
//! Turns a normalized filter set into an ordered conjunction of column
//! predicates. The injection-safety boundary lives in [`Literal`]:
//! user-supplied strings are escaped at render time, numeric literals are
//! internally computed integers/floats rendered as digits, and no code
//! path accepts a raw SQL fragment for either. Identifiers only ever come
//! from the [`Column`] allow-list.

use gatelog_core::{Column, Filters};

/// Which fixed identity predicate a query appends
///
/// The identity scopes exclude records with a blank identity field, used
/// when listing or counting distinct developers/brokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    All,
    Developers,
    Brokers,
}

/// Escape a string for embedding in a single-quoted SQL literal
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape for LIKE patterns: quote escaping plus wildcard neutralization,
/// so a user value containing `%` or `_` still matches as a substring
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            _ => out.push(c),
        }
    }
    out
}

/// Value side of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// User-supplied string; escaped when rendered
    Str(String),
    /// Trusted integer computed by this layer
    Int(i64),
    /// Trusted float computed by this layer
    Float(f64),
}

impl Literal {
    fn render(&self) -> String {
        match self {
            Literal::Str(s) => format!("'{}'", escape(s)),
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) => v.to_string(),
        }
    }
}

/// Column side of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Col(Column),
    /// The column parsed as a float: `toFloat32OrNull(column)`.
    /// Unparsable values become NULL and fail every comparison.
    Parsed(Column),
}

impl Operand {
    pub(crate) fn render(&self) -> String {
        match self {
            Operand::Col(col) => col.as_str().to_string(),
            Operand::Parsed(col) => format!("toFloat32OrNull({})", col.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cmp {
    Eq,
    Ne,
    Lt,
    Ge,
    Le,
    Gt,
    /// `LIKE '%value%'` with wildcards escaped
    Substring,
    /// `LIKE 'value%'` with wildcards escaped
    Prefix,
}

/// A single column comparison contributed to a query's WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    lhs: Operand,
    cmp: Cmp,
    value: Literal,
}

impl Predicate {
    pub fn eq_str(col: Column, value: &str) -> Self {
        Self {
            lhs: Operand::Col(col),
            cmp: Cmp::Eq,
            value: Literal::Str(value.to_string()),
        }
    }

    pub fn ne_str(col: Column, value: &str) -> Self {
        Self {
            lhs: Operand::Col(col),
            cmp: Cmp::Ne,
            value: Literal::Str(value.to_string()),
        }
    }

    pub fn ge_str(col: Column, value: &str) -> Self {
        Self {
            lhs: Operand::Col(col),
            cmp: Cmp::Ge,
            value: Literal::Str(value.to_string()),
        }
    }

    pub fn le_str(col: Column, value: &str) -> Self {
        Self {
            lhs: Operand::Col(col),
            cmp: Cmp::Le,
            value: Literal::Str(value.to_string()),
        }
    }

    pub fn eq_int(col: Column, value: i64) -> Self {
        Self {
            lhs: Operand::Col(col),
            cmp: Cmp::Eq,
            value: Literal::Int(value),
        }
    }

    pub fn ge_int(col: Column, value: i64) -> Self {
        Self {
            lhs: Operand::Col(col),
            cmp: Cmp::Ge,
            value: Literal::Int(value),
        }
    }

    pub fn lt_int(col: Column, value: i64) -> Self {
        Self {
            lhs: Operand::Col(col),
            cmp: Cmp::Lt,
            value: Literal::Int(value),
        }
    }

    /// Case-sensitive substring match against the column
    pub fn substring(col: Column, value: &str) -> Self {
        Self {
            lhs: Operand::Col(col),
            cmp: Cmp::Substring,
            value: Literal::Str(value.to_string()),
        }
    }

    /// Case-sensitive prefix match against the column
    pub fn prefix(col: Column, value: &str) -> Self {
        Self {
            lhs: Operand::Col(col),
            cmp: Cmp::Prefix,
            value: Literal::Str(value.to_string()),
        }
    }

    /// Parsed-float comparison, e.g. duration above a threshold
    pub fn gt_parsed(col: Column, value: f64) -> Self {
        Self {
            lhs: Operand::Parsed(col),
            cmp: Cmp::Gt,
            value: Literal::Float(value),
        }
    }

    pub fn render(&self) -> String {
        let lhs = self.lhs.render();
        match (self.cmp, &self.value) {
            (Cmp::Substring, Literal::Str(s)) => {
                format!("{lhs} LIKE '%{}%'", escape_like(s))
            }
            (Cmp::Prefix, Literal::Str(s)) => format!("{lhs} LIKE '{}%'", escape_like(s)),
            (cmp, value) => {
                let op = match cmp {
                    Cmp::Eq => "=",
                    Cmp::Ne => "!=",
                    Cmp::Lt => "<",
                    Cmp::Ge => ">=",
                    Cmp::Le => "<=",
                    Cmp::Gt => ">",
                    Cmp::Substring | Cmp::Prefix => unreachable!("handled above"),
                };
                format!("{lhs} {op} {}", value.render())
            }
        }
    }
}

/// Build the predicate conjunction for a filter set
///
/// Order is insertion order; no predicate depends on its position.
pub fn build(filters: &Filters, scope: QueryScope) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    if let Some(start) = &filters.start_time {
        predicates.push(Predicate::ge_str(Column::TimeLocal, start));
    }
    if let Some(end) = &filters.end_time {
        predicates.push(Predicate::le_str(Column::TimeLocal, end));
    }
    if let Some(ip) = &filters.ip {
        predicates.push(Predicate::substring(Column::RemoteAddr, ip));
    }
    if let Some(status) = filters.status {
        predicates.push(Predicate::eq_int(Column::Status, i64::from(status)));
    }
    if let Some(method) = &filters.method {
        predicates.push(Predicate::eq_str(Column::RequestMethod, method));
    }
    if let Some(developer_id) = &filters.developer_id {
        predicates.push(Predicate::eq_str(Column::DeveloperId, developer_id));
    }
    if let Some(broker_id) = &filters.broker_id {
        predicates.push(Predicate::eq_str(Column::BrokerId, broker_id));
    }

    match scope {
        QueryScope::All => {}
        QueryScope::Developers => predicates.push(Predicate::ne_str(Column::DeveloperId, "")),
        QueryScope::Brokers => predicates.push(Predicate::ne_str(Column::BrokerId, "")),
    }

    predicates
}
