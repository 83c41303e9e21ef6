//! Inputs for the draining operations.

use crate::pagination::CancelSignal;
use crate::types::{KeysAndAttributes, QueryInput, ScanInput, TableMap, WriteRequest};

/// Query every page, optionally stopping at soft limits
#[derive(Debug, Clone)]
pub struct QueryAllInput {
    pub input: QueryInput,
    /// Stop requesting pages once this many items were evaluated
    pub query_limit: Option<u64>,
    /// Stop requesting pages once this many items were returned
    pub item_limit: Option<u64>,
    pub cancel: Option<CancelSignal>,
}

impl QueryAllInput {
    pub fn new(input: QueryInput) -> Self {
        Self {
            input,
            query_limit: None,
            item_limit: None,
            cancel: None,
        }
    }

    pub fn with_query_limit(mut self, limit: u64) -> Self {
        self.query_limit = Some(limit);
        self
    }

    pub fn with_item_limit(mut self, limit: u64) -> Self {
        self.item_limit = Some(limit);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Scan every page, optionally stopping at soft limits
#[derive(Debug, Clone)]
pub struct ScanAllInput {
    pub input: ScanInput,
    pub scan_limit: Option<u64>,
    pub item_limit: Option<u64>,
    pub cancel: Option<CancelSignal>,
}

impl ScanAllInput {
    pub fn new(input: ScanInput) -> Self {
        Self {
            input,
            scan_limit: None,
            item_limit: None,
            cancel: None,
        }
    }

    pub fn with_scan_limit(mut self, limit: u64) -> Self {
        self.scan_limit = Some(limit);
        self
    }

    pub fn with_item_limit(mut self, limit: u64) -> Self {
        self.item_limit = Some(limit);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Read any number of keys across tables
#[derive(Debug, Clone, Default)]
pub struct BatchGetAllInput {
    pub request_items: TableMap<KeysAndAttributes>,
    /// Overrides the client's page size for this call
    pub page_size: Option<usize>,
    pub cancel: Option<CancelSignal>,
}

impl BatchGetAllInput {
    pub fn new(request_items: TableMap<KeysAndAttributes>) -> Self {
        Self {
            request_items,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Write any number of requests across tables
#[derive(Debug, Clone, Default)]
pub struct BatchWriteAllInput {
    pub request_items: TableMap<Vec<WriteRequest>>,
    pub page_size: Option<usize>,
    pub cancel: Option<CancelSignal>,
}

impl BatchWriteAllInput {
    pub fn new(request_items: TableMap<Vec<WriteRequest>>) -> Self {
        Self {
            request_items,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }
}
