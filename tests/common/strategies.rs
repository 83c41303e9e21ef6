//! Proptest strategies for multi-table workloads.

use proptest::prelude::*;

use butter_core::types::{TableMap, WriteRequest};

use super::payload_item;

/// Per-table entry counts for up to four tables, each up to 80 entries
pub fn table_sizes_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..80, 1..=4)
}

/// Page capacity between 1 and the service limit
pub fn capacity_strategy() -> impl Strategy<Value = usize> {
    1usize..=25
}

/// Per-call throttle; `None` processes everything
pub fn throttle_strategy() -> impl Strategy<Value = Option<usize>> {
    prop_oneof![Just(None), (1usize..=25).prop_map(Some)]
}

/// Put requests with globally unique ids, grouped into `t0`, `t1`, ...
pub fn write_workload(sizes: &[usize]) -> TableMap<Vec<WriteRequest>> {
    let mut next_id = 0u64;
    sizes
        .iter()
        .enumerate()
        .map(|(index, size)| {
            let requests = (0..*size)
                .map(|_| {
                    next_id += 1;
                    WriteRequest::put(payload_item(next_id))
                })
                .collect();
            (format!("t{index}"), requests)
        })
        .collect()
}
