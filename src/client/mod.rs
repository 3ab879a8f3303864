//! Security Command Center API client

use async_trait::async_trait;

use crate::error::ApiError;

#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod securitycenter;

#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockSecurityCenterClient;
pub use models::{
    Finding, ListFindingsRequest, ListFindingsResponse, ListFindingsResult, Resource,
};
pub use pagination::FindingsIter;
pub use securitycenter::SecurityCenterClient;

/// Security Command Center API trait.
///
/// Covers the slice of the service the listing snippets need: page-at-a-time
/// finding retrieval plus an explicit release hook. The lazy item-level view
/// lives in [`FindingsIter`], which drives this trait.
#[async_trait]
pub trait SecurityCenterApi: Send + Sync {
    /// Fetch one page of findings for the request's parent.
    ///
    /// `page_token` is `None` for the first page, then the previous page's
    /// `next_page_token`. An absent token in the response marks the end of
    /// the sequence.
    async fn list_findings_page(
        &self,
        request: &ListFindingsRequest,
        page_token: Option<&str>,
    ) -> std::result::Result<ListFindingsResponse, ApiError>;

    /// Release the client handle.
    ///
    /// Callers must invoke this on every exit path, success or error, so
    /// background resources are cleaned up.
    async fn close(&self);
}
