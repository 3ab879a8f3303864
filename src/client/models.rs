//! Request and response models for the findings listing API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size requested from the service.
/// The v1 API caps pages at 1000 elements; asking for the cap minimizes calls.
pub const MAX_PAGE_SIZE: usize = 1000;

/// A security finding recorded by the service.
///
/// The snippets consume `name`, `resource_name` and `category`; the other
/// attributes are part of the v1 wire schema and are carried through as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Fully qualified resource path of the finding, e.g.
    /// `organizations/{org}/sources/{source}/findings/{finding}`
    #[serde(default)]
    pub name: String,

    /// Resource name of the source this finding belongs to
    #[serde(default)]
    pub parent: String,

    /// Full resource name of the resource the finding concerns
    #[serde(default)]
    pub resource_name: String,

    /// Finding state (ACTIVE, INACTIVE)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Short classification tag, e.g. "XSS"
    #[serde(default)]
    pub category: String,

    /// URI pointing to a web page with more finding context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_uri: Option<String>,

    /// Severity assigned by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Time the event that produced the finding took place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<DateTime<Utc>>,

    /// Time the finding was created in the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
}

/// One element of a listing response: a finding plus result metadata.
///
/// The metadata fields describe the result relative to the request's
/// read-time window and are ignored by the snippets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFindingsResult {
    /// The finding itself
    #[serde(default)]
    pub finding: Finding,

    /// State change of the finding between the points in time (UNUSED,
    /// CHANGED, ADDED, REMOVED)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_change: Option<String>,

    /// Snapshot of the resource associated with the finding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
}

/// Resource snapshot attached to a listing result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Full resource name of the resource
    #[serde(default)]
    pub name: String,

    /// Resource name of the project the resource belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// Human readable name of the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_display_name: Option<String>,
}

/// Parameters for a findings listing request.
///
/// `parent` scopes the listing; `read_time` pins it to a past snapshot.
///
/// # Example
/// ```ignore
/// let req = ListFindingsRequest::all_sources("12321311");
/// let req = ListFindingsRequest::new("organizations/1/sources/1234")
///     .read_time(five_days_ago);
/// ```
#[derive(Debug, Clone)]
pub struct ListFindingsRequest {
    /// Resource path identifying the scope of the listing, either a specific
    /// source or the all-sources wildcard
    pub parent: String,

    /// Instant at which the listing reflects the state of findings; the
    /// service defaults to "now" when absent
    pub read_time: Option<DateTime<Utc>>,

    /// Elements per page (default: [`MAX_PAGE_SIZE`])
    pub page_size: Option<usize>,
}

impl ListFindingsRequest {
    /// Create a request scoped to the given parent.
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            read_time: None,
            page_size: None,
        }
    }

    /// Create a request spanning all sources of an organization.
    ///
    /// Uses the service's documented wildcard grammar `sources/-`.
    pub fn all_sources(org_id: &str) -> Self {
        Self::new(format!("organizations/{}/sources/-", org_id))
    }

    /// Pin the listing to a past snapshot.
    pub fn read_time(mut self, at: DateTime<Utc>) -> Self {
        self.read_time = Some(at);
        self
    }

    /// Set the page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Convert to query string parameters for the REST surface.
    ///
    /// Returns (key, value) pairs suitable for URL encoding:
    /// - `pageSize`: elements per page, defaulting to the API cap
    /// - `pageToken`: continuation cursor, when resuming
    /// - `readTime`: RFC 3339 timestamp, when pinned
    pub fn to_query_params(&self, page_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let size = self.page_size.unwrap_or(MAX_PAGE_SIZE);
        params.push(("pageSize", size.to_string()));

        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        if let Some(at) = self.read_time {
            params.push(("readTime", at.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)));
        }

        params
    }
}

/// One page of a findings listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFindingsResponse {
    /// Results for this page
    #[serde(default)]
    pub list_findings_results: Vec<ListFindingsResult>,

    /// Continuation cursor; absent or empty on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,

    /// Total number of results across all pages, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<i64>,

    /// The instant the listing reflects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<DateTime<Utc>>,
}

impl ListFindingsResponse {
    /// Continuation token for the next page, if any.
    ///
    /// The REST surface marks the last page either by omitting the token or
    /// by sending an empty string; both read as end-of-sequence.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}
