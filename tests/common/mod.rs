//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod in_memory;
pub mod mock_transport;
pub mod strategies;

#[allow(unused_imports)]
pub use in_memory::*;
#[allow(unused_imports)]
pub use mock_transport::*;
#[allow(unused_imports)]
pub use strategies::*;

use butter_core::types::{AttributeValue, NativeItem, WireItem};
use butter_core::{ButterClient, ClientOptions, ClientSource, DynamoTransport};
use serde_json::json;
use std::sync::Arc;

/// Native item `{"id": id}`
pub fn id_item(id: u64) -> NativeItem {
    let mut item = NativeItem::new();
    item.insert("id".to_string(), json!(id));
    item
}

/// Native item `{"id": id, "payload": "item-<id>"}`
pub fn payload_item(id: u64) -> NativeItem {
    let mut item = id_item(id);
    item.insert("payload".to_string(), json!(format!("item-{id}")));
    item
}

/// Wire item `{"id": {"N": id}}`
pub fn wire_id(id: u64) -> WireItem {
    WireItem::from([("id".to_string(), AttributeValue::N(id.to_string()))])
}

/// Numeric `id` of a native item, panicking on anything else
pub fn id_of(item: &NativeItem) -> u64 {
    item.get("id")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or_else(|| panic!("item without numeric id: {item:?}"))
}

/// Client over `transport` with default options
pub async fn client_for(transport: impl DynamoTransport + 'static) -> ButterClient {
    client_with_options(transport, ClientOptions::default()).await
}

pub async fn client_with_options(
    transport: impl DynamoTransport + 'static,
    options: ClientOptions,
) -> ButterClient {
    ButterClient::up(ClientSource::FromClient(Arc::new(transport)), options)
        .await
        .expect("client should come up from a transport handle")
}
