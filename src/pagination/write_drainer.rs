//! Write Drainer
//!
//! Submits a [`RequestPool`] one page at a time and puts every request the
//! store reports as unprocessed back at the end of its table's queue.
//! Resubmission is immediate: no delay is inserted between pages.

use async_trait::async_trait;
use tracing::debug;

use super::slicer::{slice, RequestPool};
use super::{DrainOptions, DrainReport};
use crate::error::{ClientError, ClientResult};
use crate::logging::{log_drain_aborted, log_page_operation};
use crate::types::{BatchWriteInput, BatchWriteOutput, TableMap};

const OPERATION: &str = "batch_write_all";

/// Single batch write call consumed by the drainer
#[async_trait]
pub trait BatchWriter: Send + Sync {
    async fn write_batch(&self, input: BatchWriteInput) -> ClientResult<BatchWriteOutput>;
}

/// Drain every write request in `pool`
///
/// Returns once the pool is empty. A transport failure aborts immediately;
/// whatever was still pending is logged and dropped with the pool.
pub async fn drain_writes<W: BatchWriter + ?Sized>(
    writer: &W,
    pool: &mut RequestPool,
    options: &DrainOptions,
) -> ClientResult<DrainReport> {
    let mut report = DrainReport::default();

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

        let output = match writer.write_batch(BatchWriteInput::from(page)).await {
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

        let unprocessed = requeue_unprocessed(pool, &submitted, output)?;
        report.requeued += unprocessed;
        log_page_operation(OPERATION, report.pages, page_items, pool.pending(), unprocessed);
    }

    debug!(
        pages = report.pages,
        submitted = report.submitted,
        requeued = report.requeued,
        "Write pool drained"
    );
    Ok(report)
}

fn requeue_unprocessed(
    pool: &mut RequestPool,
    submitted: &TableMap<usize>,
    output: BatchWriteOutput,
) -> ClientResult<usize> {
    let mut requeued = 0;
    for (table, requests) in output.unprocessed_items {
        if requests.is_empty() {
            continue;
        }
        let Some(&sent) = submitted.get(&table) else {
            return Err(ClientError::protocol_violation(
                OPERATION,
                format!("unprocessed items reported for table '{table}' which was not in the page"),
            ));
        };
        if requests.len() > sent {
            return Err(ClientError::protocol_violation(
                OPERATION,
                format!(
                    "{} unprocessed items reported for table '{table}' but only {sent} were submitted",
                    requests.len()
                ),
            ));
        }
        requeued += requests.len();
        pool.requeue(&table, requests);
    }
    Ok(requeued)
}
