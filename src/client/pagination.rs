//! Lazy page-at-a-time iteration over findings listings
//!
//! The remote listing is a forward-only, non-restartable sequence. The
//! iterator here surfaces it as a `next -> {item | end | error}` primitive:
//! `Ok(Some(_))` yields an item, `Ok(None)` is the end-of-sequence signal
//! (not an error), and `Err` is a listing failure that exhausts the
//! iterator.

use std::collections::VecDeque;

use log::debug;

use super::models::{ListFindingsRequest, ListFindingsResult};
use super::SecurityCenterApi;
use crate::error::{Error, Result};

/// Lazy iterator over the results of a findings listing.
///
/// Pages are fetched on demand from the backing [`SecurityCenterApi`];
/// the continuation cursor is followed until the service stops returning
/// one. After the end or a failure the iterator stays exhausted.
pub struct FindingsIter<'a, C: ?Sized> {
    client: &'a C,
    request: ListFindingsRequest,
    buffered: VecDeque<ListFindingsResult>,
    next_page_token: Option<String>,
    state: IterState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IterState {
    /// No page fetched yet
    Fresh,
    /// At least one page fetched, cursor may continue
    Running,
    /// End-of-sequence reached or an error surfaced
    Exhausted,
}

impl<'a, C: SecurityCenterApi + ?Sized> FindingsIter<'a, C> {
    /// Start a listing for `request` against `client`.
    ///
    /// No remote call happens until the first [`next`](Self::next).
    pub fn new(client: &'a C, request: ListFindingsRequest) -> Self {
        Self {
            client,
            request,
            buffered: VecDeque::new(),
            next_page_token: None,
            state: IterState::Fresh,
        }
    }

    /// Advance to the next listing result.
    ///
    /// Fetches further pages as needed. Errors are wrapped as listing
    /// failures and permanently exhaust the iterator.
    pub async fn next(&mut self) -> Result<Option<ListFindingsResult>> {
        loop {
            if let Some(result) = self.buffered.pop_front() {
                return Ok(Some(result));
            }

            match self.state {
                IterState::Exhausted => return Ok(None),
                IterState::Running if self.next_page_token.is_none() => {
                    self.state = IterState::Exhausted;
                    return Ok(None);
                }
                IterState::Fresh | IterState::Running => {}
            }

            let token = self.next_page_token.take();
            debug!(
                "fetching findings page for {} (continuation: {})",
                self.request.parent,
                token.is_some()
            );
            let page = self
                .client
                .list_findings_page(&self.request, token.as_deref())
                .await
                .map_err(|err| {
                    self.state = IterState::Exhausted;
                    Error::Listing(err)
                })?;

            self.next_page_token = page.continuation().map(str::to_string);
            self.state = IterState::Running;
            self.buffered.extend(page.list_findings_results);
        }
    }
}
