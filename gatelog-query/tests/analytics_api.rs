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

//! Engine-level tests against an in-memory store client

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gatelog_core::{DateRange, FilterInput, GatelogError, Result, Row, StoreConfig};
use gatelog_query::{Gatelog, PageRequest};
use gatelog_store::LogStore;
use serde_json::{json, Value};

/// Store client double: pops canned responses in order and records every
/// executed statement for assertions.
struct MockStore {
    responses: Mutex<VecDeque<Vec<Row>>>,
    queries: Mutex<Vec<String>>,
}

impl MockStore {
    fn new(responses: Vec<Vec<Row>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogStore for MockStore {
    async fn select(&self, sql: &str) -> Result<Vec<Row>> {
        self.queries.lock().unwrap().push(sql.to_string());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

fn rows(values: &[Value]) -> Vec<Row> {
    values
        .iter()
        .map(|v| Row::from_value(v.clone()).unwrap())
        .collect()
}

fn engine(store: Arc<MockStore>) -> Gatelog {
    Gatelog::new(store, &StoreConfig::default())
}

fn log_row(time: &str, status: u64) -> Value {
    json!({
        "time_local": time,
        "remote_addr": "10.0.0.1",
        "request_method": "GET",
        "request_uri": "/api/users",
        "status": status,
        "request_time": "0.120",
        "body_bytes_sent": 512,
        "broker_id": "b1",
        "developer_id": "d1",
    })
}

#[tokio::test]
async fn logs_listing_paginates_and_filters() {
    let listing: Vec<Value> = (0..10)
        .map(|i| log_row(&format!("2024-01-01 10:00:{i:02}"), 404))
        .collect();
    let store = MockStore::new(vec![rows(&[json!({"total": 45})]), rows(&listing)]);
    let gatelog = engine(store.clone());

    let input = FilterInput {
        status: Some("404".to_string()),
        start_date: Some("2024-01-01".to_string()),
        end_date: Some("2024-01-02".to_string()),
        ..FilterInput::default()
    };
    let page = gatelog.logs(&input, PageRequest::new(2, 10)).await.unwrap();

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.items[0].status, 404);
    assert_eq!(page.meta.total, 45);
    assert_eq!(page.meta.total_pages, 5);
    assert_eq!(page.meta.from, 11);
    assert_eq!(page.meta.to, 20);
    assert!(page.meta.has_more);

    let queries = store.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(
        queries[0],
        "SELECT count() AS total FROM access_logs_enhanced \
         WHERE time_local >= '2024-01-01 00:00:00' \
         AND time_local <= '2024-01-02 23:59:59' \
         AND status = 404"
    );
    assert!(queries[1].ends_with("ORDER BY time_local DESC LIMIT 10 OFFSET 10"));
}

#[tokio::test]
async fn last_page_meta_reflects_returned_rows() {
    let listing: Vec<Value> = (0..5)
        .map(|i| log_row(&format!("2024-01-01 10:00:{i:02}"), 200))
        .collect();
    let store = MockStore::new(vec![rows(&[json!({"total": 45})]), rows(&listing)]);
    let gatelog = engine(store);

    let page = gatelog
        .logs(&FilterInput::default(), PageRequest::new(5, 10))
        .await
        .unwrap();

    assert_eq!(page.meta.from, 41);
    assert_eq!(page.meta.to, 45);
    assert!(!page.meta.has_more);
}

#[tokio::test]
async fn empty_listing_is_success_with_zero_total() {
    let store = MockStore::new(vec![rows(&[json!({"total": 0})]), Vec::new()]);
    let gatelog = engine(store);

    let page = gatelog
        .logs(&FilterInput::default(), PageRequest::default())
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.meta.total, 0);
    assert_eq!(page.meta.total_pages, 0);
    assert!(page.meta.to < page.meta.from);
    assert!(!page.meta.has_more);
}

#[tokio::test]
async fn invalid_date_fails_before_any_query() {
    let store = MockStore::new(Vec::new());
    let gatelog = engine(store.clone());

    let input = FilterInput {
        start_date: Some("01/Jan/2024".to_string()),
        ..FilterInput::default()
    };
    let err = gatelog
        .logs(&input, PageRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GatelogError::InvalidDate(_)));
    assert!(store.queries().is_empty());
}

#[tokio::test]
async fn developer_listing_excludes_blank_identities() {
    let store = MockStore::new(vec![
        rows(&[json!({"total_developers": 2})]),
        rows(&[
            json!({"developer_id": "d1", "total_requests": 90, "error_rate": 0.1}),
            json!({"developer_id": "d2", "total_requests": 10, "error_rate": 0.0}),
        ]),
    ]);
    let gatelog = engine(store.clone());

    let page = gatelog
        .developers(&FilterInput::default(), PageRequest::new(1, 20))
        .await
        .unwrap();

    assert_eq!(page.meta.total, 2);
    assert_eq!(page.items[0].developer_id, "d1");
    assert_eq!(page.items[0].total_requests, 90);

    for sql in store.queries() {
        assert!(
            sql.contains("developer_id != ''"),
            "identity scope missing in: {sql}"
        );
    }
}

#[tokio::test]
async fn broker_profile_distinguishes_not_found_from_empty_listing() {
    let store = MockStore::new(Vec::new());
    let gatelog = engine(store);

    let err = gatelog.broker_profile("b1").await.unwrap_err();
    assert!(matches!(
        err,
        GatelogError::NotFound { kind: "broker", .. }
    ));
}

#[tokio::test]
async fn broker_usage_with_no_rows_is_empty_not_an_error() {
    let store = MockStore::new(Vec::new());
    let gatelog = engine(store.clone());

    let usage = gatelog.broker_usage("b1").await.unwrap();
    assert!(usage.is_none());
    // No endpoint breakdown query when the base aggregate is empty
    assert_eq!(store.queries().len(), 1);
}

#[tokio::test]
async fn broker_usage_includes_top_endpoints() {
    let store = MockStore::new(vec![
        rows(&[json!({
            "broker_id": "b1",
            "developer_id": "d1",
            "total_requests": 100,
            "unique_ips": 4,
            "error_rate": 0.05,
        })]),
        rows(&[
            json!({"uri": "/api/orders", "count": 60}),
            json!({"uri": "/api/users", "count": 40}),
        ]),
    ]);
    let gatelog = engine(store.clone());

    let usage = gatelog.broker_usage("b1").await.unwrap().unwrap();
    assert_eq!(usage.total_requests, 100);
    assert_eq!(usage.top_endpoints.len(), 2);
    assert_eq!(usage.top_endpoints[0].uri, "/api/orders");
    assert_eq!(usage.top_endpoints[0].count, 60);

    let queries = store.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[1].contains("GROUP BY request_uri"));
}

#[tokio::test]
async fn broker_requests_are_scoped_to_the_broker() {
    let store = MockStore::new(vec![rows(&[json!({"total": 1})]), rows(&[log_row(
        "2024-01-01 09:00:00",
        200,
    )])]);
    let gatelog = engine(store.clone());

    let input = FilterInput {
        method: Some("get".to_string()),
        ..FilterInput::default()
    };
    let page = gatelog
        .broker_requests("b7", &input, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.meta.total, 1);
    for sql in store.queries() {
        assert!(sql.contains("broker_id = 'b7'"), "broker scope missing in: {sql}");
        assert!(sql.contains("request_method = 'GET'"));
    }
}

#[tokio::test]
async fn traffic_overview_over_empty_store_has_zero_rates() {
    // A store with no matching rows still answers aggregate queries with
    // a single row of degenerate values.
    let store = MockStore::new(vec![rows(&[json!({
        "total_requests": 0,
        "unique_ips": 0,
        "avg_response_time": null,
        "total_errors": 0,
        "error_rate": "nan",
    })])]);
    let gatelog = engine(store);

    let overview = gatelog.traffic_overview(&DateRange::default()).await.unwrap();
    assert_eq!(overview.total_requests, 0);
    assert_eq!(overview.error_rate, 0.0);
    assert_eq!(overview.avg_response_time, 0.0);
}

#[tokio::test]
async fn top_endpoints_returns_only_existing_groups() {
    let store = MockStore::new(vec![rows(&[
        json!({"uri": "/api/orders", "method": "GET", "total_requests": 50}),
        json!({"uri": "/api/users", "method": "GET", "total_requests": 30}),
        json!({"uri": "/health", "method": "GET", "total_requests": 7}),
    ])]);
    let gatelog = engine(store.clone());

    let endpoints = gatelog
        .top_endpoints(&DateRange::default(), Some(5))
        .await
        .unwrap();

    assert_eq!(endpoints.len(), 3);
    assert!(endpoints[0].total_requests >= endpoints[1].total_requests);
    assert!(store.queries()[0].ends_with("LIMIT 5"));
}

#[tokio::test]
async fn slow_requests_use_threshold_and_duration_ordering() {
    let store = MockStore::new(vec![rows(&[log_row("2024-01-01 12:00:00", 200)])]);
    let gatelog = engine(store.clone());

    let slow = gatelog
        .slow_requests(&DateRange::default(), Some(2.0), None)
        .await
        .unwrap();

    assert_eq!(slow.len(), 1);
    let queries = store.queries();
    let sql = &queries[0];
    assert!(sql.contains("WHERE toFloat32OrNull(request_time) > 2"));
    assert!(sql.contains("ORDER BY toFloat32OrNull(request_time) DESC"));
    assert!(sql.ends_with("LIMIT 50"));
}

#[tokio::test]
async fn api_errors_restrict_status_and_prefix() {
    let store = MockStore::new(vec![rows(&[log_row("2024-01-01 12:00:00", 503)])]);
    let gatelog = engine(store.clone());

    let errors = gatelog.api_errors(&DateRange::default(), None).await.unwrap();
    assert_eq!(errors[0].status, 503);

    let queries = store.queries();
    let sql = &queries[0];
    assert!(sql.contains("status >= 400"));
    assert!(sql.contains("request_uri LIKE '/api%'"));
    assert!(sql.ends_with("ORDER BY time_local DESC LIMIT 50"));
}

#[tokio::test]
async fn store_failures_propagate_unchanged() {
    struct FailingStore;

    #[async_trait]
    impl LogStore for FailingStore {
        async fn select(&self, _sql: &str) -> Result<Vec<Row>> {
            Err(GatelogError::Store("connection refused".to_string()))
        }
    }

    let gatelog = Gatelog::new(Arc::new(FailingStore), &StoreConfig::default());
    let err = gatelog.basic_stats().await.unwrap_err();
    assert!(matches!(err, GatelogError::Store(_)));
}

#[tokio::test]
async fn table_prefix_applies_to_every_query() {
    let store = MockStore::new(vec![rows(&[json!({"total_requests": 1})])]);
    let config = StoreConfig {
        table_prefix: "gw_".to_string(),
        ..StoreConfig::default()
    };
    let gatelog = Gatelog::new(store.clone(), &config);

    gatelog.basic_stats().await.unwrap();
    assert!(store.queries()[0].contains("FROM gw_access_logs_enhanced"));
}
