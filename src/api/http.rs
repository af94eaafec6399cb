// src/api/http.rs

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use tracing::debug;

use super::{error_message, parse_feed, parse_officers, ApiError, DistributionApi, FeedPage, FeedSource};
use crate::config::Config;
use crate::error::AllocationError;
use crate::models::{Officer, ReassignmentRequest, TargetPassResponse};

#[derive(Clone)]
pub struct HttpDistributionApi {
    base_url: String,
    client: Client,
}

impl fmt::Debug for HttpDistributionApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDistributionApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpDistributionApi {
    pub fn new(config: &Config) -> Result<Self, AllocationError> {
        Self::with_settings(
            &config.api_base,
            config.api_token.as_deref(),
            config.request_timeout,
        )
    }

    pub fn with_settings(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, AllocationError> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(AllocationError::Configuration(
                "distribution API base URL is empty".into(),
            ));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| AllocationError::Configuration(format!("API token is invalid: {e}")))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| AllocationError::Configuration(format!("reqwest build error: {e}")))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn request_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("response read failed: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl DistributionApi for HttpDistributionApi {
    async fn fetch_targets(&self, source: FeedSource) -> Result<FeedPage, ApiError> {
        let url = match source {
            FeedSource::Own => self.endpoint("distribution/officer-target"),
            FeedSource::Officer(id) => {
                self.endpoint(&format!("distribution-manager/distribution-officer/{id}"))
            }
        };
        debug!(%url, "fetching targets");
        let body = self.request_text(self.client.get(&url)).await?;
        parse_feed(&body)
    }

    async fn fetch_distribution_officers(&self) -> Result<Vec<Officer>, ApiError> {
        let url = self.endpoint("distribution-manager/get-all-distributionOfficer");
        let body = self.request_text(self.client.get(&url)).await?;
        parse_officers(&body)
    }

    async fn pass_targets(
        &self,
        source_officer_id: i64,
        request: &ReassignmentRequest,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!(
            "distribution-manager/target-pass/{source_officer_id}"
        ));
        let builder = self
            .client
            .post(&url)
            .header("X-Request-Id", request.submission_id().to_string())
            .json(&request.to_body());

        let body = self.request_text(builder).await?;
        let resp: TargetPassResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Malformed(format!("unexpected target-pass response: {e}")))?;
        if resp.success {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                message: resp.message,
            })
        }
    }
}
