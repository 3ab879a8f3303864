//! Listing snippets for findings and their parent resource "sources"

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::client::{FindingsIter, ListFindingsRequest, SecurityCenterApi, SecurityCenterClient};
use crate::error::{ApiError, Error, Result};

/// Print all findings in `org_id` to `w` and return the count of findings
/// found. `org_id` is the numeric identifier of the organization.
pub async fn list_all_findings<W: Write>(w: &mut W, org_id: &str) -> Result<usize> {
    list_all_findings_from(SecurityCenterClient::new(), w, org_id).await
}

/// [`list_all_findings`] over the outcome of a client construction.
///
/// A construction failure surfaces as a client-setup error before anything
/// touches the sink.
async fn list_all_findings_from<C, W>(
    client: std::result::Result<C, ApiError>,
    w: &mut W,
    org_id: &str,
) -> Result<usize>
where
    C: SecurityCenterApi,
    W: Write,
{
    let client = client.map_err(Error::ClientInit)?;
    list_all_findings_with(&client, w, org_id).await
}

/// [`list_all_findings`] over any [`SecurityCenterApi`] backend.
///
/// Closes `client` on every exit path.
pub async fn list_all_findings_with<C, W>(client: &C, w: &mut W, org_id: &str) -> Result<usize>
where
    C: SecurityCenterApi + ?Sized,
    W: Write,
{
    let request = ListFindingsRequest::all_sources(org_id);
    let result = write_findings(client, w, request).await;
    client.close().await;
    result
}

/// Print findings that were present for a specific source as of five days
/// ago to `w`. `source_name` is the full resource name of the source to
/// search for findings under.
pub async fn list_findings_at_time<W: Write>(w: &mut W, source_name: &str) -> Result<()> {
    list_findings_at_time_from(SecurityCenterClient::new(), w, source_name).await
}

/// [`list_findings_at_time`] over the outcome of a client construction.
async fn list_findings_at_time_from<C, W>(
    client: std::result::Result<C, ApiError>,
    w: &mut W,
    source_name: &str,
) -> Result<()>
where
    C: SecurityCenterApi,
    W: Write,
{
    let client = client.map_err(Error::ClientInit)?;
    list_findings_at_time_with(&client, w, source_name).await
}

/// [`list_findings_at_time`] over any [`SecurityCenterApi`] backend.
///
/// Closes `client` on every exit path. The wall-clock is read once, at
/// entry.
pub async fn list_findings_at_time_with<C, W>(
    client: &C,
    w: &mut W,
    source_name: &str,
) -> Result<()>
where
    C: SecurityCenterApi + ?Sized,
    W: Write,
{
    let result = async {
        let read_time = five_days_ago(Utc::now())?;
        let request = ListFindingsRequest::new(source_name).read_time(read_time);
        write_findings(client, w, request).await.map(|_| ())
    }
    .await;
    client.close().await;
    result
}

/// Compute `now − 5 days`, failing if the instant cannot be represented.
fn five_days_ago(now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    now.checked_sub_signed(chrono::Duration::days(5))
        .ok_or_else(|| Error::TimeConversion("timestamp out of range".to_string()))
}

/// Walk the listing and format one line per finding.
///
/// Fields are emitted verbatim; the first error short-circuits iteration
/// and lines already written stay written.
async fn write_findings<C, W>(client: &C, w: &mut W, request: ListFindingsRequest) -> Result<usize>
where
    C: SecurityCenterApi + ?Sized,
    W: Write,
{
    let mut it = FindingsIter::new(client, request);
    let mut findings_found = 0;
    while let Some(result) = it.next().await? {
        let finding = result.finding;
        write!(w, "Finding Name: {}, ", finding.name)?;
        write!(w, "Resource Name {}, ", finding.resource_name)?;
        writeln!(w, "Category: {}", finding.category)?;
        findings_found += 1;
    }
    Ok(findings_found)
}
