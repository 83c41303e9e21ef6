//! Scripted transport for asserting on the exact calls a client makes.
//!
//! Responses are queued per operation; once a queue runs dry the mock falls
//! back to "everything processed" (writes), "echo the keys" (batch reads) and
//! "one empty page" (query/scan).

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use butter_core::error::{ClientError, ClientResult};
use butter_core::transport::{
    DynamoTransport, WireBatchGetInput, WireBatchGetOutput, WireBatchWriteInput,
    WireBatchWriteOutput, WireDeleteItemInput, WireGetItemInput, WirePutItemInput,
    WireQueryInput, WireReadPage, WireScanInput, WireUpdateItemInput,
};
use butter_core::types::{
    DeleteItemOutput, GetItemOutput, PutItemOutput, TableMap, UpdateItemOutput, WireItem,
};

/// Everything the mock has seen, plus what it still has to say
#[derive(Debug, Default)]
pub struct MockTransportState {
    pub batch_write_calls: Vec<WireBatchWriteInput>,
    pub batch_get_calls: Vec<WireBatchGetInput>,
    pub query_calls: Vec<WireQueryInput>,
    pub scan_calls: Vec<WireScanInput>,
    pub get_calls: Vec<WireGetItemInput>,
    pub put_calls: Vec<WirePutItemInput>,
    pub update_calls: Vec<WireUpdateItemInput>,
    pub delete_calls: Vec<WireDeleteItemInput>,

    pub write_responses: VecDeque<ClientResult<WireBatchWriteOutput>>,
    pub get_responses: VecDeque<ClientResult<WireBatchGetOutput>>,
    pub read_pages: VecDeque<ClientResult<WireReadPage>>,
    pub item_response: Option<WireItem>,
}

/// Mock transport recording every call
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next batch write call
    pub fn push_write_response(&self, response: ClientResult<WireBatchWriteOutput>) {
        self.state.lock().unwrap().write_responses.push_back(response);
    }

    /// Queue the result of the next batch get call
    pub fn push_get_response(&self, response: ClientResult<WireBatchGetOutput>) {
        self.state.lock().unwrap().get_responses.push_back(response);
    }

    /// Queue the result of the next query or scan call
    pub fn push_read_page(&self, page: ClientResult<WireReadPage>) {
        self.state.lock().unwrap().read_pages.push_back(page);
    }

    /// Item handed back by get/put/update/delete
    pub fn set_item_response(&self, item: WireItem) {
        self.state.lock().unwrap().item_response = Some(item);
    }

    /// Inspect the recorded state
    pub fn with_state<R>(&self, f: impl FnOnce(&MockTransportState) -> R) -> R {
        f(&self.state.lock().unwrap())
    }

    /// Sizes of the submitted batch write pages, in call order
    pub fn write_page_sizes(&self) -> Vec<usize> {
        self.with_state(|state| state.batch_write_calls.iter().map(|call| call.len()).collect())
    }

    /// Sizes of the submitted batch get pages, in call order
    pub fn get_page_sizes(&self) -> Vec<usize> {
        self.with_state(|state| state.batch_get_calls.iter().map(|call| call.len()).collect())
    }

    fn next_read_page(&self) -> ClientResult<WireReadPage> {
        self.state
            .lock()
            .unwrap()
            .read_pages
            .pop_front()
            .unwrap_or_else(|| Ok(WireReadPage::default()))
    }
}

#[async_trait]
impl DynamoTransport for MockTransport {
    fn transport_name(&self) -> &'static str {
        "mock"
    }

    async fn query(&self, input: WireQueryInput) -> ClientResult<WireReadPage> {
        self.state.lock().unwrap().query_calls.push(input);
        self.next_read_page()
    }

    async fn scan(&self, input: WireScanInput) -> ClientResult<WireReadPage> {
        self.state.lock().unwrap().scan_calls.push(input);
        self.next_read_page()
    }

    async fn get_item(&self, input: WireGetItemInput) -> ClientResult<GetItemOutput<WireItem>> {
        let mut state = self.state.lock().unwrap();
        state.get_calls.push(input);
        Ok(GetItemOutput {
            item: state.item_response.clone(),
        })
    }

    async fn put_item(&self, input: WirePutItemInput) -> ClientResult<PutItemOutput<WireItem>> {
        let mut state = self.state.lock().unwrap();
        state.put_calls.push(input);
        Ok(PutItemOutput {
            attributes: state.item_response.clone(),
        })
    }

    async fn update_item(
        &self,
        input: WireUpdateItemInput,
    ) -> ClientResult<UpdateItemOutput<WireItem>> {
        let mut state = self.state.lock().unwrap();
        state.update_calls.push(input);
        Ok(UpdateItemOutput {
            attributes: state.item_response.clone(),
        })
    }

    async fn delete_item(
        &self,
        input: WireDeleteItemInput,
    ) -> ClientResult<DeleteItemOutput<WireItem>> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls.push(input);
        Ok(DeleteItemOutput {
            attributes: state.item_response.clone(),
        })
    }

    async fn batch_get_item(&self, input: WireBatchGetInput) -> ClientResult<WireBatchGetOutput> {
        let mut state = self.state.lock().unwrap();
        state.batch_get_calls.push(input.clone());
        match state.get_responses.pop_front() {
            Some(response) => response,
            None => Ok(WireBatchGetOutput {
                responses: input
                    .request_items
                    .into_iter()
                    .map(|(table, keys)| (table, keys.keys))
                    .collect(),
                unprocessed_keys: TableMap::new(),
            }),
        }
    }

    async fn batch_write_item(
        &self,
        input: WireBatchWriteInput,
    ) -> ClientResult<WireBatchWriteOutput> {
        let mut state = self.state.lock().unwrap();
        state.batch_write_calls.push(input);
        state
            .write_responses
            .pop_front()
            .unwrap_or_else(|| Ok(WireBatchWriteOutput::default()))
    }
}

/// A transport failure as the mock reports it
pub fn throttled(operation: &'static str) -> ClientError {
    ClientError::transport(operation, "ProvisionedThroughputExceededException")
}
