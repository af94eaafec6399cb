// src/api/mod.rs
//
// Boundary to the distribution backend. Everything that crosses it is parsed
// into the typed models here; nothing downstream sees raw JSON.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::error::GENERIC_FAILURE_MESSAGE;
use crate::models::{ErrorPayload, ListPayload, Officer, ReassignmentRequest, WorkItem};

mod http;

#[cfg(test)]
pub(crate) mod stub;

pub use http::HttpDistributionApi;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("backend returned status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("backend reported failure")]
    Rejected { message: Option<String> },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// The message to surface to the caller: the backend's own text when it sent
    /// one, otherwise a generic failure string.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } | ApiError::Rejected { message } => message
                .as_deref()
                .filter(|m| !m.is_empty())
                .map(str::to_owned)
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned()),
            ApiError::Network(detail) | ApiError::Malformed(detail) => detail.clone(),
        }
    }
}

/// Where a target feed is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    /// GET /distribution/officer-target
    Own,
    /// GET /distribution-manager/distribution-officer/{id}
    Officer(i64),
}

/// A parsed feed response plus a digest of the bytes it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub items: Vec<WorkItem>,
    pub revision: String,
}

#[async_trait]
pub trait DistributionApi: Send + Sync {
    async fn fetch_targets(&self, source: FeedSource) -> Result<FeedPage, ApiError>;

    async fn fetch_distribution_officers(&self) -> Result<Vec<Officer>, ApiError>;

    /// POST /distribution-manager/target-pass/{source_officer_id}
    async fn pass_targets(
        &self,
        source_officer_id: i64,
        request: &ReassignmentRequest,
    ) -> Result<(), ApiError>;
}

pub fn revision_of(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn parse_feed(body: &str) -> Result<FeedPage, ApiError> {
    let items: Vec<WorkItem> = parse_list(body)?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(item.item_id) {
            return Err(ApiError::Malformed(format!(
                "duplicate itemId {} in target feed",
                item.item_id
            )));
        }
    }

    Ok(FeedPage {
        items,
        revision: revision_of(body),
    })
}

pub fn parse_officers(body: &str) -> Result<Vec<Officer>, ApiError> {
    parse_list(body)
}

fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    let payload: ListPayload<T> = serde_json::from_str(body)
        .map_err(|e| ApiError::Malformed(format!("unexpected list payload: {e}")))?;
    match payload {
        ListPayload::Bare(items) => Ok(items),
        ListPayload::Envelope {
            success: Some(false),
            message,
            ..
        } => Err(ApiError::Rejected { message }),
        ListPayload::Envelope { data: Some(data), .. } => Ok(data),
        ListPayload::Envelope { data: None, .. } => Err(ApiError::Malformed(
            "list envelope carries no data".to_owned(),
        )),
    }
}

/// Pulls `message` out of an error body, if the body is JSON and has one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|p| p.message)
        .filter(|m| !m.is_empty())
}
