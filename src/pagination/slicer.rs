//! Page Slicer
//!
//! Removes up to `capacity` entries from a multi-table pool and returns them
//! as one page. Tables are visited in insertion order and the first table is
//! filled before capacity rolls over to the next. Pages are built by
//! removal, so an entry is never in two pages at once.

use std::collections::VecDeque;

use crate::error::{ClientError, ClientResult};
use crate::types::{
    BatchGetInput, BatchWriteInput, KeysAndAttributes, NativeItem, ReadOptions, TableMap,
    WriteRequest,
};

/// Pending entries for one table plus the options attached to them
///
/// Backed by a `VecDeque` so taking from the front and requeueing at the
/// back stay O(1) per entry even when a store keeps rejecting part of
/// every page.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQueue<T, O = ()> {
    entries: VecDeque<T>,
    options: O,
}

impl<T, O> TableQueue<T, O> {
    pub fn new(entries: impl IntoIterator<Item = T>, options: O) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn options(&self) -> &O {
        &self.options
    }

    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    fn take_front(&mut self, count: usize) -> Vec<T> {
        let count = count.min(self.entries.len());
        self.entries.drain(..count).collect()
    }

    fn push_back(&mut self, entries: impl IntoIterator<Item = T>) {
        self.entries.extend(entries);
    }
}

/// All pending work of one logical batch call, keyed by table
///
/// Drained tables stay in the map with an empty queue; the slicer skips them.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPool<T, O = ()> {
    tables: TableMap<TableQueue<T, O>>,
}

/// Pending batch writes
pub type RequestPool = WorkPool<WriteRequest<NativeItem>>;

/// Pending batch reads; each table carries its [`ReadOptions`]
pub type KeyPool = WorkPool<NativeItem, ReadOptions>;

impl<T, O> Default for WorkPool<T, O> {
    fn default() -> Self {
        Self {
            tables: TableMap::new(),
        }
    }
}

impl<T, O> WorkPool<T, O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add entries for a table; an existing table keeps its options and
    /// gets the entries appended
    pub fn insert_table(
        &mut self,
        table: impl Into<String>,
        entries: impl IntoIterator<Item = T>,
        options: O,
    ) {
        let table = table.into();
        match self.tables.get_mut(&table) {
            Some(queue) => queue.push_back(entries),
            None => {
                self.tables.insert(table, TableQueue::new(entries, options));
            }
        }
    }

    /// Append entries to the end of a known table's queue
    ///
    /// Returns `false` (and drops nothing into the pool) when the table is unknown.
    pub fn requeue(&mut self, table: &str, entries: impl IntoIterator<Item = T>) -> bool {
        match self.tables.get_mut(table) {
            Some(queue) => {
                queue.push_back(entries);
                true
            }
            None => false,
        }
    }

    pub fn table(&self, table: &str) -> Option<&TableQueue<T, O>> {
        self.tables.get(table)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Entries not yet carved into a page
    pub fn pending(&self) -> usize {
        self.tables.values().map(TableQueue::len).sum()
    }

    /// True iff every table's queue is empty
    pub fn is_drained(&self) -> bool {
        self.tables.values().all(TableQueue::is_empty)
    }
}

impl From<TableMap<Vec<WriteRequest<NativeItem>>>> for RequestPool {
    fn from(request_items: TableMap<Vec<WriteRequest<NativeItem>>>) -> Self {
        let mut pool = Self::new();
        for (table, requests) in request_items {
            pool.insert_table(table, requests, ());
        }
        pool
    }
}

impl From<TableMap<KeysAndAttributes<NativeItem>>> for KeyPool {
    fn from(request_items: TableMap<KeysAndAttributes<NativeItem>>) -> Self {
        let mut pool = Self::new();
        for (table, keys) in request_items {
            pool.insert_table(table, keys.keys, keys.options);
        }
        pool
    }
}

/// Entries for one table inside a page
#[derive(Debug, Clone, PartialEq)]
pub struct PageEntry<T, O = ()> {
    pub entries: Vec<T>,
    pub options: O,
}

/// One bounded batch of entries, ready for a single transport call
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, O = ()> {
    tables: TableMap<PageEntry<T, O>>,
}

impl<T, O> Default for Page<T, O> {
    fn default() -> Self {
        Self {
            tables: TableMap::new(),
        }
    }
}

impl<T, O> Page<T, O> {
    /// Total entries across all tables
    pub fn len(&self) -> usize {
        self.tables.values().map(|entry| entry.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn table(&self, table: &str) -> Option<&PageEntry<T, O>> {
        self.tables.get(table)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Number of entries submitted per table
    pub fn table_counts(&self) -> TableMap<usize> {
        self.tables
            .iter()
            .map(|(table, entry)| (table.clone(), entry.entries.len()))
            .collect()
    }

    pub fn into_tables(self) -> TableMap<PageEntry<T, O>> {
        self.tables
    }
}

impl From<Page<WriteRequest<NativeItem>>> for BatchWriteInput<NativeItem> {
    fn from(page: Page<WriteRequest<NativeItem>>) -> Self {
        Self {
            request_items: page
                .into_tables()
                .into_iter()
                .map(|(table, entry)| (table, entry.entries))
                .collect(),
        }
    }
}

impl From<Page<NativeItem, ReadOptions>> for BatchGetInput<NativeItem> {
    fn from(page: Page<NativeItem, ReadOptions>) -> Self {
        Self {
            request_items: page
                .into_tables()
                .into_iter()
                .map(|(table, entry)| {
                    (
                        table,
                        KeysAndAttributes {
                            keys: entry.entries,
                            options: entry.options,
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Carve the next page out of `pool`
///
/// Returns `Ok(None)` once every table is empty. A zero `capacity` against a
/// pool that still holds entries is a configuration error; looping on it
/// would never make progress.
pub fn slice<T, O: Clone>(
    pool: &mut WorkPool<T, O>,
    capacity: usize,
) -> ClientResult<Option<Page<T, O>>> {
    if pool.is_drained() {
        return Ok(None);
    }
    if capacity == 0 {
        return Err(ClientError::config_error(format!(
            "page capacity must be greater than zero ({} entries pending)",
            pool.pending()
        )));
    }

    let mut page = Page::default();
    let mut taken = 0;
    for (table, queue) in pool.tables.iter_mut() {
        if taken == capacity {
            break;
        }
        if queue.is_empty() {
            continue;
        }
        let entries = queue.take_front(capacity - taken);
        taken += entries.len();
        page.tables
            .entry(table.clone())
            .or_insert_with(|| PageEntry {
                entries: Vec::new(),
                options: queue.options.clone(),
            })
            .entries
            .extend(entries);
    }

    Ok(Some(page))
}
