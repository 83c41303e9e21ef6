//! Cursor Paginator
//!
//! Drives a single-page read call forward by its continuation cursor.
//! Limits are soft caps checked after each page completes; the page that
//! crosses a limit is kept whole and no further page is requested.

use std::future::Future;
use tracing::debug;

use super::CancelSignal;
use crate::error::{ClientError, ClientResult};
use crate::logging::log_page_operation;
use crate::types::ReadPageOutput;

/// Soft caps on a paginated read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLimits {
    /// Stop once this many items have been evaluated by the store
    pub scanned_limit: Option<u64>,
    /// Stop once this many items have been returned
    pub item_limit: Option<u64>,
}

impl PageLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Whether running totals still allow another page
    ///
    /// An unset limit never blocks; a limit of zero blocks as soon as the
    /// first page is in.
    pub fn permit_another_page(&self, scanned_count: u64, count: u64) -> bool {
        let under_scanned = match self.scanned_limit {
            None => true,
            Some(limit) => scanned_count < limit,
        };
        let under_items = match self.item_limit {
            None => true,
            Some(limit) => count < limit,
        };
        under_scanned && under_items
    }
}

/// Paginator states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    FirstPage,
    Continuing,
    Done,
}

impl PaginatorState {
    fn after_page<I>(result: &ReadPageOutput<I>, limits: &PageLimits) -> Self {
        if result.last_evaluated_key.is_some()
            && limits.permit_another_page(result.scanned_count, result.count)
        {
            PaginatorState::Continuing
        } else {
            PaginatorState::Done
        }
    }
}

/// Fetch pages until the cursor runs out or a limit is reached
///
/// `fetch` receives the cursor to start from (`None` for the first page).
/// The returned result carries running totals and never a cursor.
pub async fn paginate<I, F, Fut>(
    operation: &'static str,
    mut fetch: F,
    limits: PageLimits,
    cancel: Option<&CancelSignal>,
) -> ClientResult<ReadPageOutput<I>>
where
    I: Clone,
    F: FnMut(Option<I>) -> Fut,
    Fut: Future<Output = ClientResult<ReadPageOutput<I>>>,
{
    let mut state = PaginatorState::FirstPage;
    let mut result = ReadPageOutput::default();
    let mut pages = 0;

    while state != PaginatorState::Done {
        if cancel.is_some_and(CancelSignal::is_cancelled) {
            return Err(ClientError::Cancelled {
                operation,
                remaining: None,
            });
        }

        let cursor = match state {
            PaginatorState::FirstPage => None,
            _ => result.last_evaluated_key.clone(),
        };
        let page = fetch(cursor).await?;
        pages += 1;
        let page_items = page.items.len();

        if state == PaginatorState::FirstPage {
            result = page;
        } else {
            result.absorb(page);
        }
        state = PaginatorState::after_page(&result, &limits);
        log_page_operation(operation, pages, page_items, 0, 0);
    }

    debug!(
        operation,
        pages,
        count = result.count,
        scanned_count = result.scanned_count,
        "Pagination complete"
    );
    result.last_evaluated_key = None;
    Ok(result)
}
