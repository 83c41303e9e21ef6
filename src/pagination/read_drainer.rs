//! Read Drainer
//!
//! Submits a [`KeyPool`] one page at a time, folds returned items into a
//! per-table accumulator and requeues unprocessed keys. The table's read
//! options live in the pool, so requeued keys are always resubmitted with
//! the caller's options, never with whatever the response echoed back.

use async_trait::async_trait;
use tracing::debug;

use super::slicer::{slice, KeyPool};
use super::{DrainOptions, DrainReport};
use crate::error::{ClientError, ClientResult};
use crate::logging::{log_drain_aborted, log_page_operation};
use crate::types::{BatchGetInput, BatchGetOutput, NativeItem, TableMap};

const OPERATION: &str = "batch_get_all";

/// Single batch read call consumed by the drainer
#[async_trait]
pub trait BatchReader: Send + Sync {
    async fn read_batch(&self, input: BatchGetInput) -> ClientResult<BatchGetOutput>;
}

/// Items returned so far, grouped by table
///
/// Tables appear the first time any page returns items for them. Within a
/// table, items are in arrival order, which need not match key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadAccumulator {
    responses: TableMap<Vec<NativeItem>>,
}

impl ReadAccumulator {
    pub fn absorb(&mut self, table: String, items: Vec<NativeItem>) {
        self.responses.entry(table).or_default().extend(items);
    }

    pub fn table(&self, table: &str) -> Option<&[NativeItem]> {
        self.responses.get(table).map(Vec::as_slice)
    }

    /// Total items across all tables
    pub fn len(&self) -> usize {
        self.responses.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_responses(self) -> TableMap<Vec<NativeItem>> {
        self.responses
    }
}

/// Result of draining a key pool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadDrainOutcome {
    pub responses: TableMap<Vec<NativeItem>>,
    pub report: DrainReport,
}

/// Drain every key in `pool`, returning all fetched items
pub async fn drain_reads<R: BatchReader + ?Sized>(
    reader: &R,
    pool: &mut KeyPool,
    options: &DrainOptions,
) -> ClientResult<ReadDrainOutcome> {
    let mut report = DrainReport::default();
    let mut accumulator = ReadAccumulator::default();

    while !pool.is_drained() {
        // Gate before slicing so a refused page stays in the pool
        options.ensure_may_submit(OPERATION, report.pages, pool.pending())?;
        let Some(page) = slice(pool, options.page_size)? else {
            break;
        };
        let page_items = page.len();

        let submitted = page.table_counts();
        report.pages += 1;
        report.submitted += page_items;

        let output = match reader.read_batch(BatchGetInput::from(page)).await {
            Ok(output) => output,
            Err(e) => {
                log_drain_aborted(
                    OPERATION,
                    report.pages,
                    pool.pending() + page_items,
                    &e.to_string(),
                );
                return Err(e);
            }
        };

        let unprocessed = absorb_page(pool, &mut accumulator, &submitted, output)?;
        report.requeued += unprocessed;
        log_page_operation(OPERATION, report.pages, page_items, pool.pending(), unprocessed);
    }

    debug!(
        pages = report.pages,
        submitted = report.submitted,
        requeued = report.requeued,
        items = accumulator.len(),
        "Key pool drained"
    );
    Ok(ReadDrainOutcome {
        responses: accumulator.into_responses(),
        report,
    })
}

fn absorb_page(
    pool: &mut KeyPool,
    accumulator: &mut ReadAccumulator,
    submitted: &TableMap<usize>,
    output: BatchGetOutput,
) -> ClientResult<usize> {
    for (table, items) in output.responses {
        let sent = submitted_for(submitted, &table, "items returned")?;
        if items.len() > sent {
            return Err(ClientError::protocol_violation(
                OPERATION,
                format!(
                    "{} items returned for table '{table}' but only {sent} keys were requested",
                    items.len()
                ),
            ));
        }
        accumulator.absorb(table, items);
    }

    let mut requeued = 0;
    for (table, unprocessed) in output.unprocessed_keys {
        if unprocessed.keys.is_empty() {
            continue;
        }
        let sent = submitted_for(submitted, &table, "unprocessed keys reported")?;
        if unprocessed.keys.len() > sent {
            return Err(ClientError::protocol_violation(
                OPERATION,
                format!(
                    "{} unprocessed keys reported for table '{table}' but only {sent} were requested",
                    unprocessed.keys.len()
                ),
            ));
        }
        requeued += unprocessed.keys.len();
        pool.requeue(&table, unprocessed.keys);
    }
    Ok(requeued)
}

fn submitted_for(submitted: &TableMap<usize>, table: &str, what: &str) -> ClientResult<usize> {
    submitted.get(table).copied().ok_or_else(|| {
        ClientError::protocol_violation(
            OPERATION,
            format!("{what} for table '{table}' which was not in the page"),
        )
    })
}
