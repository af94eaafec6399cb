// src/engine/feed.rs
//
// Target feed: fetch, classify, and periodic refresh.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::status::{bucket_of, unknown_statuses, Bucket};
use crate::api::{ApiError, DistributionApi, FeedSource};
use crate::config::MAX_POLL_SECS;
use crate::error::AllocationError;
use crate::models::WorkItem;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub items: Vec<WorkItem>,
    pub revision: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct BucketCounts {
    pub todo: usize,
    pub completed: usize,
}

impl FeedSnapshot {
    pub fn counts(&self) -> BucketCounts {
        self.items
            .iter()
            .fold(BucketCounts::default(), |mut acc, item| {
                match bucket_of(item) {
                    Bucket::Todo => acc.todo += 1,
                    Bucket::Completed => acc.completed += 1,
                }
                acc
            })
    }

    pub fn in_bucket(&self, bucket: Bucket) -> impl Iterator<Item = &WorkItem> + '_ {
        self.items.iter().filter(move |i| bucket_of(i) == bucket)
    }
}

#[derive(Clone)]
pub struct TargetFeed {
    api: Arc<dyn DistributionApi>,
    source: FeedSource,
}

impl TargetFeed {
    pub fn new(api: Arc<dyn DistributionApi>, source: FeedSource) -> Self {
        Self { api, source }
    }

    pub fn source(&self) -> FeedSource {
        self.source
    }

    pub async fn fetch(&self) -> Result<FeedSnapshot, AllocationError> {
        let page = self.api.fetch_targets(self.source).await.map_err(|e| {
            warn!(source = ?self.source, error = %e, "target feed fetch failed");
            match e {
                ApiError::Malformed(detail) => AllocationError::MalformedResponse(detail),
                other => AllocationError::FeedUnavailable(other.user_message()),
            }
        })?;

        for item in &page.items {
            for (field, raw) in unknown_statuses(item) {
                warn!(item_id = item.item_id, field, status = raw, "unrecognised target status from backend");
            }
        }

        debug!(source = ?self.source, items = page.items.len(), "target feed fetched");
        Ok(FeedSnapshot {
            items: page.items,
            revision: page.revision,
            fetched_at: Utc::now(),
        })
    }
}

/// Refresh period clamped to the convergence bound.
pub fn poll_period(requested: Duration) -> Duration {
    requested.clamp(Duration::from_secs(1), Duration::from_secs(MAX_POLL_SECS))
}

/// Runs `tick` every `period` until the returned handle is aborted or `tick`
/// returns `false`. The first tick fires after one full period.
pub fn spawn_poller<F, Fut>(period: Duration, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send,
{
    let period = poll_period(period);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if !tick().await {
                debug!("target poller stopping");
                break;
            }
        }
    })
}
