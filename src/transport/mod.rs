//! # Transport Abstraction
//!
//! The remote store as seen by this crate: one async call per request, wire
//! types in and out. Connection pooling, credentials, backoff and timeouts
//! all live behind this trait.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use butter_core::{ButterClient, ClientSource, ClientOptions};
//!
//! let transport: Arc<dyn DynamoTransport> = Arc::new(MyHttpTransport::new(endpoint));
//! let client = ButterClient::up(ClientSource::FromClient(transport), ClientOptions::default()).await?;
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::error::ClientResult;
use crate::types::{
    AttributeValue, BatchGetInput, BatchGetOutput, BatchWriteInput, BatchWriteOutput,
    DeleteItemInput, DeleteItemOutput, GetItemInput, GetItemOutput, PutItemInput, PutItemOutput,
    QueryInput, ReadPageOutput, ScanInput, UpdateItemInput, UpdateItemOutput, WireItem,
};

pub type WireQueryInput = QueryInput<WireItem>;
pub type WireScanInput = ScanInput<WireItem>;
pub type WireReadPage = ReadPageOutput<WireItem>;
pub type WireGetItemInput = GetItemInput<WireItem>;
pub type WirePutItemInput = PutItemInput<WireItem>;
pub type WireUpdateItemInput = UpdateItemInput<WireItem, AttributeValue>;
pub type WireDeleteItemInput = DeleteItemInput<WireItem>;
pub type WireBatchGetInput = BatchGetInput<WireItem>;
pub type WireBatchGetOutput = BatchGetOutput<WireItem>;
pub type WireBatchWriteInput = BatchWriteInput<WireItem>;
pub type WireBatchWriteOutput = BatchWriteOutput<WireItem>;

/// Common interface for store transports.
///
/// Implementations report their own failures as
/// [`ClientError::Transport`](crate::error::ClientError::Transport); the
/// client never retries them.
#[async_trait]
pub trait DynamoTransport: Send + Sync + std::fmt::Debug {
    /// Get the transport name for debugging/logging.
    fn transport_name(&self) -> &'static str;

    // ===================================================================================
    // READ OPERATIONS
    // ===================================================================================

    /// Fetch one page of a query.
    async fn query(&self, input: WireQueryInput) -> ClientResult<WireReadPage>;

    /// Fetch one page of a scan.
    async fn scan(&self, input: WireScanInput) -> ClientResult<WireReadPage>;

    async fn get_item(&self, input: WireGetItemInput) -> ClientResult<GetItemOutput<WireItem>>;

    // ===================================================================================
    // WRITE OPERATIONS
    // ===================================================================================

    async fn put_item(&self, input: WirePutItemInput) -> ClientResult<PutItemOutput<WireItem>>;

    async fn update_item(
        &self,
        input: WireUpdateItemInput,
    ) -> ClientResult<UpdateItemOutput<WireItem>>;

    async fn delete_item(
        &self,
        input: WireDeleteItemInput,
    ) -> ClientResult<DeleteItemOutput<WireItem>>;

    // ===================================================================================
    // BATCH OPERATIONS
    // ===================================================================================

    /// Read up to one page of keys across tables; may leave keys unprocessed.
    async fn batch_get_item(&self, input: WireBatchGetInput) -> ClientResult<WireBatchGetOutput>;

    /// Write up to one page of requests across tables; may leave requests unprocessed.
    async fn batch_write_item(
        &self,
        input: WireBatchWriteInput,
    ) -> ClientResult<WireBatchWriteOutput>;
}

/// Builds a transport from connection parameters
///
/// Used when a client is brought up from configuration instead of an
/// existing transport handle.
#[async_trait]
pub trait TransportConnector: Send + Sync {
    async fn connect(&self, config: &ConnectionConfig) -> ClientResult<Arc<dyn DynamoTransport>>;
}
