//! In-memory store that behaves like the real service under throttling.
//!
//! Items are keyed by their `id` attribute. Batch calls reject pages larger
//! than the service limit and leave everything past `throttle` entries
//! unprocessed. Query and scan walk items in key order, `page_items` at a time.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use butter_core::config::DEFAULT_PAGE_SIZE;
use butter_core::error::{ClientError, ClientResult};
use butter_core::transport::{
    DynamoTransport, WireBatchGetInput, WireBatchGetOutput, WireBatchWriteInput,
    WireBatchWriteOutput, WireDeleteItemInput, WireGetItemInput, WirePutItemInput,
    WireQueryInput, WireReadPage, WireScanInput, WireUpdateItemInput,
};
use butter_core::types::{
    AttributeValue, DeleteItemOutput, GetItemOutput, KeysAndAttributes, PutItemOutput, TableMap,
    UpdateItemOutput, WireItem, WriteRequest,
};

type Table = BTreeMap<String, WireItem>;

#[derive(Debug, Default)]
struct StoreState {
    tables: BTreeMap<String, Table>,
    batch_calls: usize,
    largest_batch: usize,
}

#[derive(Debug, Clone)]
pub struct InMemoryTransport {
    state: Arc<Mutex<StoreState>>,
    throttle: Option<usize>,
    page_items: usize,
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            throttle: None,
            page_items: 10,
        }
    }
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process at most `limit` entries per batch call
    pub fn with_throttle(mut self, limit: usize) -> Self {
        self.throttle = Some(limit);
        self
    }

    /// Return at most `items` items per query/scan page
    pub fn with_page_items(mut self, items: usize) -> Self {
        self.page_items = items;
        self
    }

    pub fn seed(&self, table: &str, items: impl IntoIterator<Item = WireItem>) {
        let mut state = self.state.lock().unwrap();
        let stored = state.tables.entry(table.to_string()).or_default();
        for item in items {
            stored.insert(key_of(&item), item);
        }
    }

    pub fn table_len(&self, table: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map_or(0, BTreeMap::len)
    }

    pub fn contains(&self, table: &str, key: &WireItem) -> bool {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .is_some_and(|stored| stored.contains_key(&key_of(key)))
    }

    pub fn batch_calls(&self) -> usize {
        self.state.lock().unwrap().batch_calls
    }

    pub fn largest_batch(&self) -> usize {
        self.state.lock().unwrap().largest_batch
    }

    fn record_batch(&self, state: &mut StoreState, size: usize) -> ClientResult<()> {
        state.batch_calls += 1;
        state.largest_batch = state.largest_batch.max(size);
        if size > DEFAULT_PAGE_SIZE {
            return Err(ClientError::transport(
                "batch",
                format!("ValidationException: {size} entries exceed the batch limit"),
            ));
        }
        Ok(())
    }

    fn read_page(
        &self,
        table: &str,
        start: Option<&WireItem>,
        limit: Option<u32>,
        partition: Option<&AttributeValue>,
    ) -> ClientResult<WireReadPage> {
        let state = self.state.lock().unwrap();
        let stored = state.tables.get(table).ok_or_else(|| {
            ClientError::transport("read", format!("ResourceNotFoundException: {table}"))
        })?;

        let per_page = limit.map_or(self.page_items, |limit| limit as usize).min(self.page_items);
        let start = start.map(key_of);
        let mut remaining = stored
            .iter()
            .filter(|(key, _)| start.as_ref().map_or(true, |start| *key > start))
            .map(|(_, item)| item);

        let evaluated: Vec<&WireItem> = remaining.by_ref().take(per_page).collect();
        let more = remaining.next().is_some();
        let items: Vec<WireItem> = evaluated
            .iter()
            .filter(|item| partition.map_or(true, |pk| item.get("pk") == Some(pk)))
            .map(|item| (*item).clone())
            .collect();

        Ok(WireReadPage {
            count: items.len() as u64,
            scanned_count: evaluated.len() as u64,
            last_evaluated_key: if more {
                evaluated.last().map(|item| key_only(item))
            } else {
                None
            },
            items,
        })
    }
}

#[async_trait]
impl DynamoTransport for InMemoryTransport {
    fn transport_name(&self) -> &'static str {
        "in-memory"
    }

    async fn query(&self, input: WireQueryInput) -> ClientResult<WireReadPage> {
        let partition = input
            .expression_attribute_values
            .as_ref()
            .and_then(|values| values.get(":pk"));
        self.read_page(
            &input.table_name,
            input.exclusive_start_key.as_ref(),
            input.limit,
            partition,
        )
    }

    async fn scan(&self, input: WireScanInput) -> ClientResult<WireReadPage> {
        self.read_page(
            &input.table_name,
            input.exclusive_start_key.as_ref(),
            input.limit,
            None,
        )
    }

    async fn get_item(&self, input: WireGetItemInput) -> ClientResult<GetItemOutput<WireItem>> {
        let state = self.state.lock().unwrap();
        Ok(GetItemOutput {
            item: state
                .tables
                .get(&input.table_name)
                .and_then(|stored| stored.get(&key_of(&input.key)))
                .cloned(),
        })
    }

    async fn put_item(&self, input: WirePutItemInput) -> ClientResult<PutItemOutput<WireItem>> {
        let mut state = self.state.lock().unwrap();
        let previous = state
            .tables
            .entry(input.table_name)
            .or_default()
            .insert(key_of(&input.item), input.item);
        Ok(PutItemOutput {
            attributes: previous,
        })
    }

    async fn update_item(
        &self,
        input: WireUpdateItemInput,
    ) -> ClientResult<UpdateItemOutput<WireItem>> {
        let mut state = self.state.lock().unwrap();
        let stored = state.tables.entry(input.table_name).or_default();
        let item = stored
            .entry(key_of(&input.key))
            .or_insert_with(|| input.key.clone());
        for (name, update) in input.attribute_updates.unwrap_or_default() {
            match update.value {
                Some(value) => {
                    item.insert(name, value);
                }
                None => {
                    item.remove(&name);
                }
            }
        }
        Ok(UpdateItemOutput {
            attributes: Some(item.clone()),
        })
    }

    async fn delete_item(
        &self,
        input: WireDeleteItemInput,
    ) -> ClientResult<DeleteItemOutput<WireItem>> {
        let mut state = self.state.lock().unwrap();
        let previous = state
            .tables
            .get_mut(&input.table_name)
            .and_then(|stored| stored.remove(&key_of(&input.key)));
        Ok(DeleteItemOutput {
            attributes: previous,
        })
    }

    async fn batch_get_item(&self, input: WireBatchGetInput) -> ClientResult<WireBatchGetOutput> {
        let mut state = self.state.lock().unwrap();
        self.record_batch(&mut state, input.len())?;

        let mut budget = self.throttle.unwrap_or(usize::MAX);
        let mut output = WireBatchGetOutput::default();
        for (table, keys) in input.request_items {
            let mut found = Vec::new();
            let mut unprocessed = Vec::new();
            for key in keys.keys {
                if budget == 0 {
                    unprocessed.push(key);
                    continue;
                }
                budget -= 1;
                let stored = state.tables.get(&table);
                if let Some(item) = stored.and_then(|stored| stored.get(&key_of(&key))) {
                    found.push(item.clone());
                }
            }
            output.responses.insert(table.clone(), found);
            if !unprocessed.is_empty() {
                output.unprocessed_keys.insert(
                    table,
                    KeysAndAttributes::new(unprocessed).with_options(keys.options),
                );
            }
        }
        Ok(output)
    }

    async fn batch_write_item(
        &self,
        input: WireBatchWriteInput,
    ) -> ClientResult<WireBatchWriteOutput> {
        let mut state = self.state.lock().unwrap();
        self.record_batch(&mut state, input.len())?;

        let mut budget = self.throttle.unwrap_or(usize::MAX);
        let mut unprocessed_items = TableMap::new();
        for (table, requests) in input.request_items {
            let mut unprocessed = Vec::new();
            for request in requests {
                if budget == 0 {
                    unprocessed.push(request);
                    continue;
                }
                budget -= 1;
                let stored = state.tables.entry(table.clone()).or_default();
                match request {
                    WriteRequest::Put { item } => {
                        stored.insert(key_of(&item), item);
                    }
                    WriteRequest::Delete { key } => {
                        stored.remove(&key_of(&key));
                    }
                }
            }
            if !unprocessed.is_empty() {
                unprocessed_items.insert(table, unprocessed);
            }
        }
        Ok(WireBatchWriteOutput { unprocessed_items })
    }
}

/// Sort key for an item: its `id` attribute, zero padded when numeric
fn key_of(item: &WireItem) -> String {
    match item.get("id") {
        Some(AttributeValue::N(n)) => format!("{n:0>20}"),
        Some(AttributeValue::S(s)) => s.clone(),
        other => panic!("item without usable id: {other:?}"),
    }
}

fn key_only(item: &WireItem) -> WireItem {
    item.iter()
        .filter(|(name, _)| name.as_str() == "id")
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
