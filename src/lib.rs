//! Listing snippets for Security Command Center findings
//!
//! Two entry points mirror the service's listing API:
//! - [`list_all_findings`] walks every finding across all sources of an
//!   organization and writes one line per finding to a sink.
//! - [`list_findings_at_time`] does the same for a single source, as the
//!   findings existed five days before the call.
//!
//! Both are thin drivers over the [`client`] layer, which owns transport,
//! authentication and pagination. Embedders with their own backend can use
//! the `_with` variants together with [`client::SecurityCenterApi`].

pub mod client;
pub mod error;
pub mod findings;

pub use client::{
    Finding, FindingsIter, ListFindingsRequest, ListFindingsResponse, ListFindingsResult,
    SecurityCenterApi, SecurityCenterClient,
};
pub use error::{ApiError, Error, Result};
pub use findings::{
    list_all_findings, list_all_findings_with, list_findings_at_time, list_findings_at_time_with,
};
