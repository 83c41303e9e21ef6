//! # Butter Client
//!
//! Native-typed facade over a [`DynamoTransport`]. Single-page calls marshal
//! their inputs and unmarshal their outputs; the `*_all` calls hand those
//! single-page calls to the pagination engine.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use butter_core::client::{BatchWriteAllInput, ButterClient, ClientSource};
//! use butter_core::types::{TableMap, WriteRequest};
//!
//! let client = ButterClient::up(ClientSource::FromClient(transport), Default::default()).await?;
//!
//! let requests = items.into_iter().map(WriteRequest::put).collect();
//! let report = client
//!     .batch_write_all(BatchWriteAllInput::new(TableMap::from([("orders".to_string(), requests)])))
//!     .await?;
//! ```

mod marshal;
pub mod requests;

pub use requests::{BatchGetAllInput, BatchWriteAllInput, QueryAllInput, ScanAllInput};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::codec::{AttributeCodec, Marshaller};
use crate::config::{ButterConfig, ClientOptions, ConnectionConfig};
use crate::error::{ClientError, ClientResult};
use crate::pagination::{
    drain_reads, drain_writes, paginate, BatchReader, BatchWriter, DrainOptions, DrainReport,
    KeyPool, PageLimits, ReadDrainOutcome, RequestPool,
};
use crate::transport::{DynamoTransport, TransportConnector};
use crate::types::{
    BatchGetInput, BatchGetOutput, BatchWriteInput, BatchWriteOutput, DeleteItemInput,
    DeleteItemOutput, GetItemInput, GetItemOutput, NativeItem, PutItemInput, PutItemOutput,
    QueryInput, ReadPageOutput, ScanInput, UpdateItemInput, UpdateItemOutput, WireItem,
};

/// Where the client's transport comes from, resolved once in [`ButterClient::up`]
pub enum ClientSource {
    /// An already constructed transport handle
    FromClient(Arc<dyn DynamoTransport>),
    /// Connection parameters plus the connector that turns them into a transport
    FromConfig {
        connection: ConnectionConfig,
        connector: Arc<dyn TransportConnector>,
    },
}

/// Client for paginated and batched access to the store
#[derive(Debug, Clone)]
pub struct ButterClient {
    transport: Arc<dyn DynamoTransport>,
    codec: Arc<dyn AttributeCodec>,
    options: ClientOptions,
}

impl ButterClient {
    /// Bring up a client from a transport handle or from connection parameters
    ///
    /// Configuration problems (zero page size, missing region) fail here,
    /// before any transport call is made.
    pub async fn up(source: ClientSource, options: ClientOptions) -> ClientResult<Self> {
        options.validate()?;

        let transport = match source {
            ClientSource::FromClient(transport) => transport,
            ClientSource::FromConfig {
                connection,
                connector,
            } => {
                connection.validate()?;
                connector.connect(&connection).await?
            }
        };

        info!(
            transport = transport.transport_name(),
            page_size = options.page_size,
            max_pages = ?options.max_pages,
            "Butter client ready"
        );

        Ok(Self {
            codec: Arc::new(Marshaller::new(options.marshalling)),
            transport,
            options,
        })
    }

    /// Bring up a client from a loaded [`ButterConfig`]
    pub async fn from_config(
        config: &ButterConfig,
        connector: Arc<dyn TransportConnector>,
    ) -> ClientResult<Self> {
        Self::up(
            ClientSource::FromConfig {
                connection: config.connection.clone(),
                connector,
            },
            config.client.clone(),
        )
        .await
    }

    /// Replace the value codec
    pub fn with_codec(mut self, codec: Arc<dyn AttributeCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn transport(&self) -> &Arc<dyn DynamoTransport> {
        &self.transport
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn marshall(&self, item: &NativeItem) -> ClientResult<WireItem> {
        self.codec.encode_item(item)
    }

    pub fn unmarshall(&self, item: &WireItem) -> ClientResult<NativeItem> {
        self.codec.decode_item(item)
    }

    // ===================================================================================
    // SINGLE-PAGE READS
    // ===================================================================================

    /// Fetch one page of a query
    pub async fn query(&self, input: QueryInput) -> ClientResult<ReadPageOutput> {
        require_table_name("query", &input.table_name)?;
        let codec = self.codec.as_ref();
        let wire = input.try_map_items(|item| marshal::encode(codec, item))?;
        let page = self.transport.query(wire).await?;
        page.try_map_items(|item| marshal::decode(codec, item))
    }

    /// Fetch one page of a scan
    pub async fn scan(&self, input: ScanInput) -> ClientResult<ReadPageOutput> {
        require_table_name("scan", &input.table_name)?;
        let codec = self.codec.as_ref();
        let wire = input.try_map_items(|item| marshal::encode(codec, item))?;
        let page = self.transport.scan(wire).await?;
        page.try_map_items(|item| marshal::decode(codec, item))
    }

    // ===================================================================================
    // PAGINATED READS
    // ===================================================================================

    /// Query every page until the cursor runs out or a limit is reached
    ///
    /// Starts from the input's `exclusive_start_key` when one is given. The
    /// result holds running totals and no cursor.
    pub async fn query_all(&self, request: QueryAllInput) -> ClientResult<ReadPageOutput> {
        require_table_name("query_all", &request.input.table_name)?;
        let QueryAllInput {
            input,
            query_limit,
            item_limit,
            cancel,
        } = request;
        let limits = PageLimits {
            scanned_limit: query_limit,
            item_limit,
        };

        paginate(
            "query_all",
            |cursor| {
                let mut page_input = input.clone();
                if cursor.is_some() {
                    page_input.exclusive_start_key = cursor;
                }
                self.query(page_input)
            },
            limits,
            cancel.as_ref(),
        )
        .await
    }

    /// Scan every page until the cursor runs out or a limit is reached
    pub async fn scan_all(&self, request: ScanAllInput) -> ClientResult<ReadPageOutput> {
        require_table_name("scan_all", &request.input.table_name)?;
        let ScanAllInput {
            input,
            scan_limit,
            item_limit,
            cancel,
        } = request;
        let limits = PageLimits {
            scanned_limit: scan_limit,
            item_limit,
        };

        paginate(
            "scan_all",
            |cursor| {
                let mut page_input = input.clone();
                if cursor.is_some() {
                    page_input.exclusive_start_key = cursor;
                }
                self.scan(page_input)
            },
            limits,
            cancel.as_ref(),
        )
        .await
    }

    // ===================================================================================
    // SINGLE-ITEM OPERATIONS
    // ===================================================================================

    pub async fn get(&self, input: GetItemInput) -> ClientResult<GetItemOutput> {
        require_table_name("get", &input.table_name)?;
        let codec = self.codec.as_ref();
        let wire = GetItemInput {
            table_name: input.table_name,
            key: marshal::encode(codec, input.key)?,
            consistent_read: input.consistent_read,
            projection_expression: input.projection_expression,
            expression_attribute_names: input.expression_attribute_names,
        };
        let output = self.transport.get_item(wire).await?;
        Ok(GetItemOutput {
            item: output.item.map(|item| marshal::decode(codec, item)).transpose()?,
        })
    }

    pub async fn put(&self, input: PutItemInput) -> ClientResult<PutItemOutput> {
        require_table_name("put", &input.table_name)?;
        let codec = self.codec.as_ref();
        let wire = PutItemInput {
            table_name: input.table_name,
            item: marshal::encode(codec, input.item)?,
            condition_expression: input.condition_expression,
            expression_attribute_names: input.expression_attribute_names,
            expression_attribute_values: input
                .expression_attribute_values
                .map(|values| marshal::encode(codec, values))
                .transpose()?,
            return_values: input.return_values,
        };
        let output = self.transport.put_item(wire).await?;
        Ok(PutItemOutput {
            attributes: output
                .attributes
                .map(|item| marshal::decode(codec, item))
                .transpose()?,
        })
    }

    pub async fn update(&self, input: UpdateItemInput) -> ClientResult<UpdateItemOutput> {
        require_table_name("update", &input.table_name)?;
        let codec = self.codec.as_ref();
        let wire = marshal::encode_update(codec, input)?;
        let output = self.transport.update_item(wire).await?;
        Ok(UpdateItemOutput {
            attributes: output
                .attributes
                .map(|item| marshal::decode(codec, item))
                .transpose()?,
        })
    }

    pub async fn delete(&self, input: DeleteItemInput) -> ClientResult<DeleteItemOutput> {
        require_table_name("delete", &input.table_name)?;
        let codec = self.codec.as_ref();
        let wire = DeleteItemInput {
            table_name: input.table_name,
            key: marshal::encode(codec, input.key)?,
            condition_expression: input.condition_expression,
            expression_attribute_names: input.expression_attribute_names,
            expression_attribute_values: input
                .expression_attribute_values
                .map(|values| marshal::encode(codec, values))
                .transpose()?,
            return_values: input.return_values,
        };
        let output = self.transport.delete_item(wire).await?;
        Ok(DeleteItemOutput {
            attributes: output
                .attributes
                .map(|item| marshal::decode(codec, item))
                .transpose()?,
        })
    }

    // ===================================================================================
    // BATCH OPERATIONS
    // ===================================================================================

    /// One batch read call; unprocessed keys are returned, not retried
    pub async fn batch_get(&self, input: BatchGetInput) -> ClientResult<BatchGetOutput> {
        for table in input.request_items.keys() {
            require_table_name("batch_get", table)?;
        }
        let codec = self.codec.as_ref();
        let wire = marshal::encode_batch_get(codec, input)?;
        let output = self.transport.batch_get_item(wire).await?;
        marshal::decode_batch_get(codec, output)
    }

    /// Read every key, paging and resubmitting unprocessed keys until done
    pub async fn batch_get_all(&self, request: BatchGetAllInput) -> ClientResult<ReadDrainOutcome> {
        for table in request.request_items.keys() {
            require_table_name("batch_get_all", table)?;
        }
        let options = DrainOptions::resolve(&self.options, request.page_size, request.cancel);
        let mut pool = KeyPool::from(request.request_items);
        debug!(
            tables = pool.table_names().count(),
            keys = pool.pending(),
            page_size = options.page_size,
            "Draining batch get"
        );
        drain_reads(self, &mut pool, &options).await
    }

    /// One batch write call; unprocessed requests are returned, not retried
    pub async fn batch_write(&self, input: BatchWriteInput) -> ClientResult<BatchWriteOutput> {
        for table in input.request_items.keys() {
            require_table_name("batch_write", table)?;
        }
        let codec = self.codec.as_ref();
        let wire = marshal::encode_batch_write(codec, input)?;
        let output = self.transport.batch_write_item(wire).await?;
        marshal::decode_batch_write(codec, output)
    }

    /// Submit every write request, paging and resubmitting unprocessed ones until done
    pub async fn batch_write_all(&self, request: BatchWriteAllInput) -> ClientResult<DrainReport> {
        for table in request.request_items.keys() {
            require_table_name("batch_write_all", table)?;
        }
        let options = DrainOptions::resolve(&self.options, request.page_size, request.cancel);
        let mut pool = RequestPool::from(request.request_items);
        debug!(
            tables = pool.table_names().count(),
            requests = pool.pending(),
            page_size = options.page_size,
            "Draining batch write"
        );
        drain_writes(self, &mut pool, &options).await
    }
}

#[async_trait]
impl BatchWriter for ButterClient {
    async fn write_batch(&self, input: BatchWriteInput) -> ClientResult<BatchWriteOutput> {
        self.batch_write(input).await
    }
}

#[async_trait]
impl BatchReader for ButterClient {
    async fn read_batch(&self, input: BatchGetInput) -> ClientResult<BatchGetOutput> {
        self.batch_get(input).await
    }
}

fn require_table_name(operation: &str, table: &str) -> ClientResult<()> {
    if table.trim().is_empty() {
        return Err(ClientError::config_error(format!(
            "{operation} requires a non-empty table name"
        )));
    }
    Ok(())
}
