//! # Request and Response Types
//!
//! Shapes exchanged with the transport collaborator. Every operation type is
//! generic over its item representation so the same struct carries both the
//! native form handed to callers ([`NativeItem`]) and the wire form sent to
//! the store ([`WireItem`]).

pub mod attribute;
pub mod batch;
pub mod operations;

pub use attribute::{AttributeValue, NativeItem, WireItem};
pub use batch::{
    BatchGetInput, BatchGetOutput, BatchWriteInput, BatchWriteOutput, KeysAndAttributes,
    ReadOptions, WriteRequest,
};
pub use operations::{
    AttributeAction, AttributeValueUpdate, DeleteItemInput, DeleteItemOutput, GetItemInput,
    GetItemOutput, PutItemInput, PutItemOutput, QueryInput, ReadPageOutput, ReturnValues,
    ScanInput, UpdateItemInput, UpdateItemOutput,
};

use indexmap::IndexMap;

/// Table name to value mapping that preserves insertion order
///
/// Pools and pages are walked in the order tables were added, so a plain
/// hash map is not enough here.
pub type TableMap<V> = IndexMap<String, V>;
