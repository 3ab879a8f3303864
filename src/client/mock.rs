//! Mock Security Command Center client for testing
//!
//! Provides a counting fake implementation of [`SecurityCenterApi`] for unit
//! testing without making real API calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::models::{Finding, ListFindingsRequest, ListFindingsResponse, ListFindingsResult};
use super::SecurityCenterApi;
use crate::error::ApiError;

/// Mock API client for testing.
///
/// Configure page responses and failures via builder methods, then use in
/// tests. Requests are captured for assertions, and call counts (including
/// `close`) verify the acquire/release bracket.
///
/// # Example
/// ```ignore
/// let mock = MockSecurityCenterClient::new()
///     .with_findings(vec![finding])
///     .await;
///
/// let mut it = FindingsIter::new(&mock, ListFindingsRequest::all_sources("1"));
/// assert!(it.next().await?.is_some());
/// ```
pub struct MockSecurityCenterClient {
    /// Pages to return from list_findings_page, in order
    pages: Arc<Mutex<Vec<ListFindingsResponse>>>,
    /// Fail the n-th fetch (1-indexed) with this error
    error_on_fetch: Arc<Mutex<Option<(usize, ApiError)>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl Default for MockSecurityCenterClient {
    fn default() -> Self {
        Self {
            pages: Arc::new(Mutex::new(Vec::new())),
            error_on_fetch: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub list_findings: usize,
    pub close: usize,
}

/// A captured listing request for test assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Parent resource path of the request
    pub parent: String,
    /// Read-time carried by the request, if any
    pub read_time: Option<DateTime<Utc>>,
    /// Continuation token, if resuming
    pub page_token: Option<String>,
}

impl MockSecurityCenterClient {
    /// Create a new mock client with no pages configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a single page holding the given findings, with no
    /// continuation.
    pub async fn with_findings(self, findings: Vec<Finding>) -> Self {
        let page = ListFindingsResponse {
            list_findings_results: findings
                .into_iter()
                .map(|finding| ListFindingsResult {
                    finding,
                    ..ListFindingsResult::default()
                })
                .collect(),
            ..ListFindingsResponse::default()
        };
        self.with_pages(vec![page]).await
    }

    /// Configure the exact sequence of pages to serve.
    pub async fn with_pages(self, pages: Vec<ListFindingsResponse>) -> Self {
        *self.pages.lock().await = pages;
        self
    }

    /// Fail the n-th page fetch (1-indexed) with the given error.
    pub async fn with_error_on_fetch(self, nth: usize, error: ApiError) -> Self {
        *self.error_on_fetch.lock().await = Some((nth, error));
        self
    }

    /// Get the call counts recorded so far.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get the captured listing requests.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }
}

#[async_trait]
impl SecurityCenterApi for MockSecurityCenterClient {
    async fn list_findings_page(
        &self,
        request: &ListFindingsRequest,
        page_token: Option<&str>,
    ) -> std::result::Result<ListFindingsResponse, ApiError> {
        let fetch_number = {
            let mut counts = self.call_count.lock().await;
            counts.list_findings += 1;
            counts.list_findings
        };

        self.captured_requests.lock().await.push(CapturedRequest {
            parent: request.parent.clone(),
            read_time: request.read_time,
            page_token: page_token.map(str::to_string),
        });

        let mut injected = self.error_on_fetch.lock().await;
        if let Some((nth, _)) = injected.as_ref() {
            if *nth == fetch_number {
                let (_, error) = injected.take().unwrap();
                return Err(error);
            }
        }
        drop(injected);

        let mut pages = self.pages.lock().await;
        if pages.is_empty() {
            // Out of configured pages: an empty terminal page
            return Ok(ListFindingsResponse::default());
        }
        Ok(pages.remove(0))
    }

    async fn close(&self) {
        self.call_count.lock().await.close += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_pages_in_order() {
        let mock = MockSecurityCenterClient::new()
            .with_pages(vec![
                ListFindingsResponse {
                    next_page_token: Some("t1".to_string()),
                    ..ListFindingsResponse::default()
                },
                ListFindingsResponse::default(),
            ])
            .await;

        let req = ListFindingsRequest::all_sources("1");
        let first = mock.list_findings_page(&req, None).await.unwrap();
        assert_eq!(first.continuation(), Some("t1"));

        let second = mock.list_findings_page(&req, Some("t1")).await.unwrap();
        assert!(second.continuation().is_none());

        let counts = mock.call_counts().await;
        assert_eq!(counts.list_findings, 2);
    }

    #[tokio::test]
    async fn test_mock_injects_error_once() {
        let mock = MockSecurityCenterClient::new()
            .with_error_on_fetch(1, ApiError::ServerError("boom".to_string()))
            .await;

        let req = ListFindingsRequest::all_sources("1");
        assert!(mock.list_findings_page(&req, None).await.is_err());
        // Error is consumed; the next fetch serves an empty page
        assert!(mock.list_findings_page(&req, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_counts_close() {
        let mock = MockSecurityCenterClient::new();
        mock.close().await;
        mock.close().await;
        assert_eq!(mock.call_counts().await.close, 2);
    }
}
