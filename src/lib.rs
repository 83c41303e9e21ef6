#![allow(clippy::doc_markdown)] // Allow technical terms like DynamoDB in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Butter Core Rust
//!
//! Pagination and retry layer over a batch-capable key-value store.
//!
//! ## Overview
//!
//! The store caps every batch call at a fixed number of entries and may hand
//! back part of a batch as "unprocessed". Reads come back one page at a time
//! behind a continuation cursor. This crate hides both behaviours: callers
//! submit arbitrarily large multi-table batches or ask for every page, and
//! get back one consolidated result.
//!
//! ## Module Organization
//!
//! - [`pagination`] - Page slicer, write/read drainers and cursor paginator
//! - [`client`] - Native-typed client wrapping a transport
//! - [`transport`] - The remote store collaborator trait
//! - [`codec`] - Native <-> wire attribute value conversion
//! - [`types`] - Request and response shapes
//! - [`config`] - Layered configuration loading
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use butter_core::{BatchWriteAllInput, ButterClient, ClientOptions, ClientSource, TableMap};
//! use butter_core::types::WriteRequest;
//!
//! # async fn example(transport: std::sync::Arc<dyn butter_core::DynamoTransport>)
//! #     -> butter_core::ClientResult<()> {
//! let client = ButterClient::up(ClientSource::FromClient(transport), ClientOptions::default()).await?;
//!
//! let requests = (0..60)
//!     .map(|id| WriteRequest::put(butter_core::codec::to_item(&serde_json::json!({ "id": id }))?))
//!     .collect::<butter_core::ClientResult<Vec<_>>>()?;
//! let report = client
//!     .batch_write_all(BatchWriteAllInput::new(TableMap::from([("orders".to_string(), requests)])))
//!     .await?;
//! assert_eq!(report.pages, 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit, integration and property tests
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod transport;
pub mod types;

pub use client::{
    BatchGetAllInput, BatchWriteAllInput, ButterClient, ClientSource, QueryAllInput, ScanAllInput,
};
pub use codec::{AttributeCodec, MarshallOptions, Marshaller};
pub use config::{ButterConfig, ClientOptions, ConfigLoader, ConnectionConfig, DEFAULT_PAGE_SIZE};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use pagination::{
    CancelSignal, DrainOptions, DrainReport, KeyPool, PageLimits, ReadDrainOutcome, RequestPool,
};
pub use transport::{DynamoTransport, TransportConnector};
pub use types::TableMap;
