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

//! Query assembly
//!
//! [`SelectQuery`] combines a projection, predicate conjunction, grouping,
//! ordering, and limit/offset into one of the three supported shapes (row
//! listing, scalar count, grouped aggregate) and renders it as a single
//! line of SQL. Every identifier comes from the [`Column`] allow-list or
//! an internal static alias; LIMIT, OFFSET, and every aggregate argument
//! are integers or floats computed by this layer, never caller strings.

use gatelog_core::Column;

use crate::predicate::{Operand, Predicate};

/// One projected expression with its result alias
#[derive(Debug, Clone)]
pub struct SelectExpr {
    sql: String,
    alias: &'static str,
}

impl SelectExpr {
    /// Bare column projection
    pub fn column(col: Column) -> Self {
        Self {
            sql: col.as_str().to_string(),
            alias: col.as_str(),
        }
    }

    /// Column projected under a different name
    pub fn column_as(col: Column, alias: &'static str) -> Self {
        Self {
            sql: col.as_str().to_string(),
            alias,
        }
    }

    /// `count()`
    pub fn count(alias: &'static str) -> Self {
        Self {
            sql: "count()".to_string(),
            alias,
        }
    }

    /// `countIf(cond AND cond ...)`
    pub fn count_if(conditions: &[Predicate], alias: &'static str) -> Self {
        Self {
            sql: format!("countIf({})", render_conjunction(conditions)),
            alias,
        }
    }

    /// Exact distinct count of a column
    pub fn count_distinct(col: Column, alias: &'static str) -> Self {
        Self {
            sql: format!("uniqExact({})", col.as_str()),
            alias,
        }
    }

    /// Average of the column parsed as a float; unparsable rows drop out
    pub fn avg_parsed(col: Column, alias: &'static str) -> Self {
        Self {
            sql: format!("avg(toFloat32OrNull({}))", col.as_str()),
            alias,
        }
    }

    /// Quantile of the column parsed as a float
    pub fn quantile_parsed(q: f64, col: Column, alias: &'static str) -> Self {
        Self {
            sql: format!("quantile({q})(toFloat32OrNull({}))", col.as_str()),
            alias,
        }
    }

    pub fn sum(col: Column, alias: &'static str) -> Self {
        Self {
            sql: format!("sum({})", col.as_str()),
            alias,
        }
    }

    pub fn min(col: Column, alias: &'static str) -> Self {
        Self {
            sql: format!("min({})", col.as_str()),
            alias,
        }
    }

    pub fn max(col: Column, alias: &'static str) -> Self {
        Self {
            sql: format!("max({})", col.as_str()),
            alias,
        }
    }

    /// Matching-over-total ratio, pinned to 0 when the total is 0
    pub fn ratio_if(conditions: &[Predicate], alias: &'static str) -> Self {
        let cond = render_conjunction(conditions);
        Self {
            sql: format!("if(count() = 0, 0, countIf({cond}) / count())"),
            alias,
        }
    }

    /// Hour of day extracted by parsing the embedded timestamp
    pub fn hour_of(col: Column, alias: &'static str) -> Self {
        Self {
            sql: format!("toHour(parseDateTimeBestEffortOrZero({}))", col.as_str()),
            alias,
        }
    }

    fn render(&self) -> String {
        if self.sql == self.alias {
            self.sql.clone()
        } else {
            format!("{} AS {}", self.sql, self.alias)
        }
    }
}

fn render_conjunction(conditions: &[Predicate]) -> String {
    conditions
        .iter()
        .map(Predicate::render)
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// What the query selects
#[derive(Debug, Clone)]
pub enum Projection {
    /// `SELECT *` row listing
    All,
    /// Listing restricted to named columns
    Columns(Vec<Column>),
    /// Scalar or grouped aggregate expressions
    Exprs(Vec<SelectExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// ORDER BY target
#[derive(Debug, Clone, Copy)]
pub enum SortKey {
    Column(Column),
    /// Alias of a projected aggregate
    Alias(&'static str),
    /// The column parsed as a float, so numeric strings sort numerically
    Parsed(Column),
}

impl SortKey {
    fn render(&self) -> String {
        match self {
            SortKey::Column(col) => col.as_str().to_string(),
            SortKey::Alias(alias) => (*alias).to_string(),
            SortKey::Parsed(col) => Operand::Parsed(*col).render(),
        }
    }
}

/// GROUP BY key
#[derive(Debug, Clone, Copy)]
pub enum GroupKey {
    Column(Column),
    /// Alias of a projected expression (e.g. an extracted hour)
    Alias(&'static str),
}

impl GroupKey {
    fn render(&self) -> String {
        match self {
            GroupKey::Column(col) => col.as_str().to_string(),
            GroupKey::Alias(alias) => (*alias).to_string(),
        }
    }
}

/// One assembled query, built once and rendered once
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: String,
    projection: Projection,
    predicates: Vec<Predicate>,
    group_by: Vec<GroupKey>,
    order_by: Option<(SortKey, Direction)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    pub fn new(table: &str, projection: Projection) -> Self {
        Self {
            table: table.to_string(),
            projection,
            predicates: Vec::new(),
            group_by: Vec::new(),
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    /// Append a predicate conjunction
    pub fn filtered(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn group_by(mut self, keys: Vec<GroupKey>) -> Self {
        self.group_by = keys;
        self
    }

    pub fn order_by(mut self, key: SortKey, direction: Direction) -> Self {
        self.order_by = Some((key, direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Window for a paginated listing
    pub fn paged(mut self, limit: u64, offset: u64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Render the query as a single line of SQL
    pub fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");

        match &self.projection {
            Projection::All => sql.push('*'),
            Projection::Columns(cols) => {
                let cols: Vec<&str> = cols.iter().map(Column::as_str).collect();
                sql.push_str(&cols.join(", "));
            }
            Projection::Exprs(exprs) => {
                let exprs: Vec<String> = exprs.iter().map(SelectExpr::render).collect();
                sql.push_str(&exprs.join(", "));
            }
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.table);

        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&render_conjunction(&self.predicates));
        }

        if !self.group_by.is_empty() {
            let keys: Vec<String> = self.group_by.iter().map(GroupKey::render).collect();
            sql.push_str(" GROUP BY ");
            sql.push_str(&keys.join(", "));
        }

        if let Some((key, direction)) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(&key.render());
            sql.push(' ');
            sql.push_str(direction.as_str());
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{build, QueryScope};
    use gatelog_core::{FilterInput, Filters};

    #[test]
    fn test_listing_shape() {
        let input = FilterInput {
            status: Some("404".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-02".to_string()),
            ..FilterInput::default()
        };
        let filters = Filters::from_input(&input).unwrap();
        let sql = SelectQuery::new("access_logs_enhanced", Projection::All)
            .filtered(build(&filters, QueryScope::All))
            .order_by(SortKey::Column(Column::TimeLocal), Direction::Desc)
            .paged(10, 10)
            .to_sql();

        assert_eq!(
            sql,
            "SELECT * FROM access_logs_enhanced \
             WHERE time_local >= '2024-01-01 00:00:00' \
             AND time_local <= '2024-01-02 23:59:59' \
             AND status = 404 \
             ORDER BY time_local DESC LIMIT 10 OFFSET 10"
        );
    }

    #[test]
    fn test_count_shape() {
        let sql = SelectQuery::new(
            "access_logs_enhanced",
            Projection::Exprs(vec![SelectExpr::count("total")]),
        )
        .to_sql();
        assert_eq!(sql, "SELECT count() AS total FROM access_logs_enhanced");
    }

    #[test]
    fn test_grouped_aggregate_shape() {
        let sql = SelectQuery::new(
            "access_logs_enhanced",
            Projection::Exprs(vec![
                SelectExpr::column(Column::GeoCountry),
                SelectExpr::count("total_requests"),
            ]),
        )
        .and_where(Predicate::ne_str(Column::GeoCountry, ""))
        .group_by(vec![GroupKey::Column(Column::GeoCountry)])
        .order_by(SortKey::Alias("total_requests"), Direction::Desc)
        .limit(20)
        .to_sql();

        assert_eq!(
            sql,
            "SELECT geo_country, count() AS total_requests \
             FROM access_logs_enhanced \
             WHERE geo_country != '' \
             GROUP BY geo_country \
             ORDER BY total_requests DESC LIMIT 20"
        );
    }

    #[test]
    fn test_ratio_expression_guards_zero_denominator() {
        let expr = SelectExpr::ratio_if(
            &[Predicate::ge_int(Column::Status, 400)],
            "error_rate",
        );
        let sql = SelectQuery::new("t", Projection::Exprs(vec![expr])).to_sql();
        assert_eq!(
            sql,
            "SELECT if(count() = 0, 0, countIf(status >= 400) / count()) AS error_rate FROM t"
        );
    }

    #[test]
    fn test_hour_extraction_parses_embedded_time() {
        let expr = SelectExpr::hour_of(Column::TimeLocal, "hour");
        let sql = SelectQuery::new("t", Projection::Exprs(vec![expr]))
            .group_by(vec![GroupKey::Alias("hour")])
            .order_by(SortKey::Alias("hour"), Direction::Asc)
            .to_sql();
        assert_eq!(
            sql,
            "SELECT toHour(parseDateTimeBestEffortOrZero(time_local)) AS hour \
             FROM t GROUP BY hour ORDER BY hour ASC"
        );
    }

    #[test]
    fn test_column_projection_shape() {
        let sql = SelectQuery::new(
            "t",
            Projection::Columns(vec![Column::TimeLocal, Column::Status]),
        )
        .to_sql();
        assert_eq!(sql, "SELECT time_local, status FROM t");
    }

    #[test]
    fn test_bare_column_has_no_redundant_alias() {
        let sql = SelectQuery::new(
            "t",
            Projection::Exprs(vec![
                SelectExpr::column(Column::DeveloperId),
                SelectExpr::column_as(Column::RequestUri, "uri"),
            ]),
        )
        .to_sql();
        assert_eq!(sql, "SELECT developer_id, request_uri AS uri FROM t");
    }
}
