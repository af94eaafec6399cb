// src/api/stub.rs

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use super::{parse_feed, ApiError, DistributionApi, FeedPage, FeedSource};
use crate::models::{Officer, ReassignmentRequest, SubItems, TargetStatus, WorkItem};

/// Queued responses and recorded calls, one queue per endpoint.
#[derive(Debug, Default)]
pub(crate) struct StubApi {
    feeds: Mutex<VecDeque<(Duration, Result<FeedPage, ApiError>)>>,
    officers: Mutex<VecDeque<Result<Vec<Officer>, ApiError>>>,
    passes: Mutex<VecDeque<(Duration, Result<(), ApiError>)>>,
    feed_calls: Mutex<Vec<FeedSource>>,
    pass_calls: Mutex<Vec<(i64, ReassignmentRequest)>>,
    panic_next_pass: AtomicBool,
}

impl StubApi {
    pub(crate) async fn push_feed(&self, items: Vec<WorkItem>) {
        self.push_feed_delayed(Duration::ZERO, items).await;
    }

    pub(crate) async fn push_feed_delayed(&self, delay: Duration, items: Vec<WorkItem>) {
        let body = serde_json::to_string(&items).expect("serialize feed");
        let page = parse_feed(&body).expect("parse feed");
        self.feeds.lock().await.push_back((delay, Ok(page)));
    }

    pub(crate) async fn push_feed_error(&self, error: ApiError) {
        self.feeds.lock().await.push_back((Duration::ZERO, Err(error)));
    }

    pub(crate) async fn push_officers(&self, response: Result<Vec<Officer>, ApiError>) {
        self.officers.lock().await.push_back(response);
    }

    pub(crate) async fn push_pass(&self, response: Result<(), ApiError>) {
        self.push_pass_delayed(Duration::ZERO, response).await;
    }

    pub(crate) async fn push_pass_delayed(&self, delay: Duration, response: Result<(), ApiError>) {
        self.passes.lock().await.push_back((delay, response));
    }

    pub(crate) fn panic_on_next_pass(&self) {
        self.panic_next_pass.store(true, Ordering::SeqCst);
    }

    pub(crate) async fn feed_calls(&self) -> Vec<FeedSource> {
        self.feed_calls.lock().await.clone()
    }

    pub(crate) async fn pass_calls(&self) -> Vec<(i64, ReassignmentRequest)> {
        self.pass_calls.lock().await.clone()
    }
}

#[async_trait]
impl DistributionApi for StubApi {
    async fn fetch_targets(&self, source: FeedSource) -> Result<FeedPage, ApiError> {
        self.feed_calls.lock().await.push(source);
        let next = self.feeds.lock().await.pop_front();
        match next {
            Some((delay, response)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            None => Err(ApiError::Network("stub has no queued feed".into())),
        }
    }

    async fn fetch_distribution_officers(&self) -> Result<Vec<Officer>, ApiError> {
        self.officers
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("stub has no queued officers".into())))
    }

    async fn pass_targets(
        &self,
        source_officer_id: i64,
        request: &ReassignmentRequest,
    ) -> Result<(), ApiError> {
        self.pass_calls
            .lock()
            .await
            .push((source_officer_id, request.clone()));
        if self.panic_next_pass.swap(false, Ordering::SeqCst) {
            panic!("stub pass handler crashed");
        }
        let next = self.passes.lock().await.pop_front();
        match next {
            Some((delay, response)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            None => Err(ApiError::Network("stub has no queued pass".into())),
        }
    }
}

// ───────────────────────────────────────
// Fixtures
// ───────────────────────────────────────

pub(crate) fn sub(total: u32, status: Option<TargetStatus>) -> SubItems {
    SubItems {
        total,
        packed: 0,
        pending: total,
        status,
    }
}

/// A plain (non-package) order whose additional items are all pending.
pub(crate) fn pending_item(item_id: i64) -> WorkItem {
    WorkItem {
        item_id,
        order_id: item_id + 1000,
        invoice_number: format!("INV-{item_id:04}"),
        overall_selected_status: TargetStatus::Pending,
        is_package_order: false,
        additional_items: Some(sub(3, Some(TargetStatus::Pending))),
        package_items: None,
        is_complete: None,
        completed_at: None,
    }
}

pub(crate) fn opened_item(item_id: i64) -> WorkItem {
    WorkItem {
        overall_selected_status: TargetStatus::Opened,
        additional_items: Some(sub(3, Some(TargetStatus::Opened))),
        ..pending_item(item_id)
    }
}

pub(crate) fn completed_item(item_id: i64) -> WorkItem {
    WorkItem {
        overall_selected_status: TargetStatus::Completed,
        additional_items: Some(sub(3, Some(TargetStatus::Completed))),
        is_complete: Some(true),
        ..pending_item(item_id)
    }
}

pub(crate) fn officer(id: i64, emp_id: &str, first: &str, last: &str) -> Officer {
    serde_json::from_value(json!({
        "id": id,
        "empId": emp_id,
        "firstNameEnglish": first,
        "lastNameEnglish": last,
        "jobRole": "Distribution Officer"
    }))
    .expect("officer fixture")
}
