//! # Paginated Batch Operation Engine
//!
//! Three loops built on one primitive:
//!
//! - [`slicer`]: carves a bounded [`Page`] out of a multi-table [`WorkPool`]
//! - [`write_drainer`]: submits write pages and requeues unprocessed requests
//! - [`read_drainer`]: submits key pages, accumulates items, requeues unprocessed keys
//! - [`paginator`]: follows continuation cursors under scan/item soft limits
//!
//! Every loop awaits one transport call at a time. Pools are owned by a
//! single drain call (`&mut` borrow), so no locking is involved.

pub mod paginator;
pub mod read_drainer;
pub mod slicer;
pub mod write_drainer;

pub use paginator::{paginate, PageLimits, PaginatorState};
pub use read_drainer::{drain_reads, BatchReader, ReadAccumulator, ReadDrainOutcome};
pub use slicer::{slice, KeyPool, Page, PageEntry, RequestPool, TableQueue, WorkPool};
pub use write_drainer::{drain_writes, BatchWriter};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::{ClientOptions, DEFAULT_PAGE_SIZE};
use crate::error::{ClientError, ClientResult};

/// Cooperative cancellation flag shared between a caller and a running loop
///
/// Checked before each page's transport call; a call already in flight is
/// left to the transport.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Knobs for a single drain call
#[derive(Debug, Clone)]
pub struct DrainOptions {
    pub page_size: usize,
    pub max_pages: Option<usize>,
    pub cancel: Option<CancelSignal>,
}

impl Default for DrainOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
            cancel: None,
        }
    }
}

impl DrainOptions {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Options for one call, falling back to client-wide settings
    pub fn resolve(
        client: &ClientOptions,
        page_size: Option<usize>,
        cancel: Option<CancelSignal>,
    ) -> Self {
        Self {
            page_size: page_size.unwrap_or(client.page_size),
            max_pages: client.max_pages,
            cancel,
        }
    }

    /// Gate run before every page submission
    pub(crate) fn ensure_may_submit(
        &self,
        operation: &'static str,
        pages_submitted: usize,
        remaining: usize,
    ) -> ClientResult<()> {
        if self.cancel.as_ref().is_some_and(CancelSignal::is_cancelled) {
            return Err(ClientError::Cancelled {
                operation,
                remaining: Some(remaining),
            });
        }
        if self.max_pages.is_some_and(|max| pages_submitted >= max) {
            return Err(ClientError::IterationLimitExceeded {
                operation,
                pages: pages_submitted,
                remaining,
            });
        }
        Ok(())
    }
}

/// What a drain call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Pages submitted to the transport
    pub pages: usize,
    /// Entries submitted, counting resubmissions
    pub submitted: usize,
    /// Entries the transport reported unprocessed and that were requeued
    pub requeued: usize,
}
