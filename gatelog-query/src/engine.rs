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

//! Analytics engine
//!
//! High-level query API over the enhanced access-log table: one method
//! per report, each normalizing caller input, assembling its query, and
//! mapping rows to typed results. The engine holds no per-request state;
//! it is safe to share across tasks via `Arc`. The only I/O suspension
//! point is the store round trip.

use std::sync::Arc;

use gatelog_core::{
    Column, DateRange, FilterInput, Filters, GatelogError, LogRecord, Result, Row, StoreConfig,
    ENHANCED_LOG_TABLE,
};
use gatelog_store::LogStore;
use tracing::info;

use crate::metrics::{
    ApiPerformance, BasicStats, BrokerProfile, BrokerSummary, BrokerUsage, CountryTraffic,
    DeveloperProfile, DeveloperSummary, DeveloperUsage, EndpointCount, EndpointStats,
    HourlyTraffic, TrafficOverview,
};
use crate::paginate::{Page, PageMeta, PageRequest, MAX_PAGE_SIZE};
use crate::predicate::{build, QueryScope};
use crate::reports::{
    Report, BROKER_TOP_ENDPOINT_LIMIT, DEFAULT_API_ERROR_LIMIT, DEFAULT_SLOW_REQUEST_LIMIT,
    DEFAULT_SLOW_THRESHOLD_SECS, DEFAULT_TOP_ENDPOINT_LIMIT,
};
use crate::sql::{Direction, Projection, SelectExpr, SelectQuery, SortKey};

/// Main analytics interface over one enhanced log table
///
/// Table names resolve once here, from the store configuration; requests
/// are independent and stateless, so concurrent use needs no coordination
/// beyond the store client's own connection handling.
pub struct Gatelog {
    store: Arc<dyn LogStore>,
    table: String,
}

impl Gatelog {
    pub fn new(store: Arc<dyn LogStore>, config: &StoreConfig) -> Self {
        let table = config.table_name(ENHANCED_LOG_TABLE);
        info!(table = %table, "analytics engine ready");
        Self { store, table }
    }

    async fn rows(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        self.store.select(&query.to_sql()).await
    }

    async fn first_row(&self, query: &SelectQuery) -> Result<Option<Row>> {
        Ok(self.rows(query).await?.into_iter().next())
    }

    async fn scalar(&self, query: &SelectQuery, field: &str) -> Result<u64> {
        Ok(self
            .first_row(query)
            .await?
            .map(|row| row.u64_field(field))
            .unwrap_or(0))
    }

    fn clamp_limit(limit: Option<u64>, default: u64) -> u64 {
        limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
    }

    // ---- Raw log listings ----

    /// Paginated raw listing, newest first
    pub async fn logs(&self, input: &FilterInput, page: PageRequest) -> Result<Page<LogRecord>> {
        let filters = Filters::from_input(input)?;
        self.listing(&filters, page).await
    }

    /// Total row count under the given filters
    pub async fn count_logs(&self, input: &FilterInput) -> Result<u64> {
        let filters = Filters::from_input(input)?;
        self.count_filtered(&filters).await
    }

    /// Paginated raw listing scoped to one broker, filters applied on top
    pub async fn broker_requests(
        &self,
        broker_id: &str,
        input: &FilterInput,
        page: PageRequest,
    ) -> Result<Page<LogRecord>> {
        let mut filters = Filters::from_input(input)?;
        filters.broker_id = Some(broker_id.to_string());
        self.listing(&filters, page).await
    }

    pub async fn count_broker_requests(&self, broker_id: &str, input: &FilterInput) -> Result<u64> {
        let mut filters = Filters::from_input(input)?;
        filters.broker_id = Some(broker_id.to_string());
        self.count_filtered(&filters).await
    }

    async fn listing(&self, filters: &Filters, page: PageRequest) -> Result<Page<LogRecord>> {
        let total = self.count_filtered(filters).await?;
        let query = SelectQuery::new(&self.table, Projection::All)
            .filtered(build(filters, QueryScope::All))
            .order_by(SortKey::Column(Column::TimeLocal), Direction::Desc)
            .paged(page.per_page(), page.offset());
        let rows = self.rows(&query).await?;
        let items: Vec<LogRecord> = rows.iter().map(LogRecord::from_row).collect();
        let meta = PageMeta::new(total, page, items.len());
        Ok(Page { items, meta })
    }

    async fn count_filtered(&self, filters: &Filters) -> Result<u64> {
        let query = SelectQuery::new(
            &self.table,
            Projection::Exprs(vec![SelectExpr::count("total")]),
        )
        .filtered(build(filters, QueryScope::All));
        self.scalar(&query, "total").await
    }

    // ---- Global statistics ----

    pub async fn basic_stats(&self) -> Result<BasicStats> {
        let query = Report::BasicStats.query(&self.table, &Filters::default());
        Ok(self
            .first_row(&query)
            .await?
            .map(|row| BasicStats::from_row(&row))
            .unwrap_or_default())
    }

    // ---- Developer dimension ----

    /// Paginated developer listing ordered by request volume
    pub async fn developers(
        &self,
        input: &FilterInput,
        page: PageRequest,
    ) -> Result<Page<DeveloperSummary>> {
        let filters = Filters::from_input(input)?;
        let total = self.developer_count_filtered(&filters).await?;
        let query = Report::DeveloperList
            .query(&self.table, &filters)
            .paged(page.per_page(), page.offset());
        let rows = self.rows(&query).await?;
        let items: Vec<DeveloperSummary> = rows.iter().map(DeveloperSummary::from_row).collect();
        let meta = PageMeta::new(total, page, items.len());
        Ok(Page { items, meta })
    }

    pub async fn developer_count(&self, input: &FilterInput) -> Result<u64> {
        let filters = Filters::from_input(input)?;
        self.developer_count_filtered(&filters).await
    }

    async fn developer_count_filtered(&self, filters: &Filters) -> Result<u64> {
        let query = Report::DeveloperCount.query(&self.table, filters);
        self.scalar(&query, "total_developers").await
    }

    /// Detail lookup by exact id; zero matching rows is a NotFound error
    pub async fn developer_profile(&self, developer_id: &str) -> Result<DeveloperProfile> {
        let report = Report::DeveloperProfile {
            developer_id: developer_id.to_string(),
        };
        let query = report.query(&self.table, &Filters::default());
        self.first_row(&query)
            .await?
            .map(|row| DeveloperProfile::from_row(&row))
            .ok_or_else(|| GatelogError::not_found("developer", developer_id))
    }

    /// Usage breakdown by exact id; zero matching rows is an empty result
    pub async fn developer_usage(&self, developer_id: &str) -> Result<Option<DeveloperUsage>> {
        let report = Report::DeveloperUsage {
            developer_id: developer_id.to_string(),
        };
        let query = report.query(&self.table, &Filters::default());
        Ok(self
            .first_row(&query)
            .await?
            .map(|row| DeveloperUsage::from_row(&row)))
    }

    // ---- Broker dimension ----

    /// Paginated broker listing ordered by request volume
    pub async fn brokers(
        &self,
        input: &FilterInput,
        page: PageRequest,
    ) -> Result<Page<BrokerSummary>> {
        let filters = Filters::from_input(input)?;
        let total = self.broker_count_filtered(&filters).await?;
        let query = Report::BrokerList
            .query(&self.table, &filters)
            .paged(page.per_page(), page.offset());
        let rows = self.rows(&query).await?;
        let items: Vec<BrokerSummary> = rows.iter().map(BrokerSummary::from_row).collect();
        let meta = PageMeta::new(total, page, items.len());
        Ok(Page { items, meta })
    }

    pub async fn broker_count(&self, input: &FilterInput) -> Result<u64> {
        let filters = Filters::from_input(input)?;
        self.broker_count_filtered(&filters).await
    }

    async fn broker_count_filtered(&self, filters: &Filters) -> Result<u64> {
        let query = Report::BrokerCount.query(&self.table, filters);
        self.scalar(&query, "total_brokers").await
    }

    /// Detail lookup by exact id; zero matching rows is a NotFound error
    pub async fn broker_profile(&self, broker_id: &str) -> Result<BrokerProfile> {
        let report = Report::BrokerProfile {
            broker_id: broker_id.to_string(),
        };
        let query = report.query(&self.table, &Filters::default());
        self.first_row(&query)
            .await?
            .map(|row| BrokerProfile::from_row(&row))
            .ok_or_else(|| GatelogError::not_found("broker", broker_id))
    }

    /// Usage breakdown by exact id, including the broker's top endpoints;
    /// zero matching rows is an empty result
    pub async fn broker_usage(&self, broker_id: &str) -> Result<Option<BrokerUsage>> {
        let report = Report::BrokerUsage {
            broker_id: broker_id.to_string(),
        };
        let query = report.query(&self.table, &Filters::default());
        let Some(row) = self.first_row(&query).await? else {
            return Ok(None);
        };

        let mut usage = BrokerUsage::from_row(&row);
        let endpoints = Report::BrokerTopEndpoints {
            broker_id: broker_id.to_string(),
            limit: BROKER_TOP_ENDPOINT_LIMIT,
        };
        let rows = self
            .rows(&endpoints.query(&self.table, &Filters::default()))
            .await?;
        usage.top_endpoints = rows.iter().map(EndpointCount::from_row).collect();
        Ok(Some(usage))
    }

    // ---- Traffic analytics ----

    pub async fn traffic_overview(&self, range: &DateRange) -> Result<TrafficOverview> {
        let filters = Filters::from_range(range)?;
        let query = Report::TrafficOverview.query(&self.table, &filters);
        Ok(self
            .first_row(&query)
            .await?
            .map(|row| TrafficOverview::from_row(&row))
            .unwrap_or_default())
    }

    pub async fn traffic_by_hour(&self, range: &DateRange) -> Result<Vec<HourlyTraffic>> {
        let filters = Filters::from_range(range)?;
        let query = Report::TrafficByHour.query(&self.table, &filters);
        let rows = self.rows(&query).await?;
        Ok(rows.iter().map(HourlyTraffic::from_row).collect())
    }

    pub async fn traffic_by_country(&self, range: &DateRange) -> Result<Vec<CountryTraffic>> {
        let filters = Filters::from_range(range)?;
        let query = Report::TrafficByCountry.query(&self.table, &filters);
        let rows = self.rows(&query).await?;
        Ok(rows.iter().map(CountryTraffic::from_row).collect())
    }

    pub async fn top_endpoints(
        &self,
        range: &DateRange,
        limit: Option<u64>,
    ) -> Result<Vec<EndpointStats>> {
        let filters = Filters::from_range(range)?;
        let report = Report::TopEndpoints {
            limit: Self::clamp_limit(limit, DEFAULT_TOP_ENDPOINT_LIMIT),
        };
        let rows = self.rows(&report.query(&self.table, &filters)).await?;
        Ok(rows.iter().map(EndpointStats::from_row).collect())
    }

    /// Requests whose parsed duration exceeds the threshold, slowest first
    pub async fn slow_requests(
        &self,
        range: &DateRange,
        threshold: Option<f64>,
        limit: Option<u64>,
    ) -> Result<Vec<LogRecord>> {
        let filters = Filters::from_range(range)?;
        let report = Report::SlowRequests {
            threshold: threshold.unwrap_or(DEFAULT_SLOW_THRESHOLD_SECS),
            limit: Self::clamp_limit(limit, DEFAULT_SLOW_REQUEST_LIMIT),
        };
        let rows = self.rows(&report.query(&self.table, &filters)).await?;
        Ok(rows.iter().map(LogRecord::from_row).collect())
    }

    // ---- API traffic ----

    pub async fn api_performance(&self, range: &DateRange) -> Result<ApiPerformance> {
        let filters = Filters::from_range(range)?;
        let query = Report::ApiPerformance.query(&self.table, &filters);
        Ok(self
            .first_row(&query)
            .await?
            .map(|row| ApiPerformance::from_row(&row))
            .unwrap_or_default())
    }

    pub async fn api_errors(
        &self,
        range: &DateRange,
        limit: Option<u64>,
    ) -> Result<Vec<LogRecord>> {
        let filters = Filters::from_range(range)?;
        let report = Report::ApiErrors {
            limit: Self::clamp_limit(limit, DEFAULT_API_ERROR_LIMIT),
        };
        let rows = self.rows(&report.query(&self.table, &filters)).await?;
        Ok(rows.iter().map(LogRecord::from_row).collect())
    }
}
