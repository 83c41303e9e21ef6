//! # Value Codec
//!
//! Bidirectional conversion between native JSON values and wire attribute
//! values. The pagination core treats the codec as opaque and only runs it
//! over the fields it must look at (cursors, keys, expression values) plus
//! the items it returns to callers.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{ClientError, ClientResult};
use crate::types::{AttributeValue, NativeItem, WireItem};

/// Options controlling how native values are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshallOptions {
    /// Encode empty strings as `NULL` instead of rejecting them at the store
    pub convert_empty_values: bool,
    /// Drop `null` members of maps instead of encoding them as `NULL`
    pub remove_null_values: bool,
}

impl Default for MarshallOptions {
    fn default() -> Self {
        Self {
            convert_empty_values: true,
            remove_null_values: true,
        }
    }
}

/// Native <-> wire value conversion
pub trait AttributeCodec: Send + Sync + std::fmt::Debug {
    fn encode(&self, value: &Value) -> ClientResult<AttributeValue>;

    fn decode(&self, value: &AttributeValue) -> ClientResult<Value>;

    fn encode_item(&self, item: &NativeItem) -> ClientResult<WireItem>;

    fn decode_item(&self, item: &WireItem) -> ClientResult<NativeItem> {
        item.iter()
            .map(|(name, value)| -> ClientResult<(String, Value)> {
                Ok((name.clone(), self.decode(value)?))
            })
            .collect()
    }

    fn encode_items(&self, items: &[NativeItem]) -> ClientResult<Vec<WireItem>> {
        items.iter().map(|item| self.encode_item(item)).collect()
    }

    fn decode_items(&self, items: &[WireItem]) -> ClientResult<Vec<NativeItem>> {
        items.iter().map(|item| self.decode_item(item)).collect()
    }
}

/// Default codec following the store's JSON conventions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marshaller {
    options: MarshallOptions,
}

impl Marshaller {
    pub fn new(options: MarshallOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> MarshallOptions {
        self.options
    }
}

impl AttributeCodec for Marshaller {
    fn encode(&self, value: &Value) -> ClientResult<AttributeValue> {
        Ok(match value {
            Value::Null => AttributeValue::Null(true),
            Value::Bool(b) => AttributeValue::Bool(*b),
            Value::Number(n) => AttributeValue::N(n.to_string()),
            Value::String(s) if s.is_empty() && self.options.convert_empty_values => {
                AttributeValue::Null(true)
            }
            Value::String(s) => AttributeValue::S(s.clone()),
            Value::Array(values) => AttributeValue::L(
                values
                    .iter()
                    .map(|v| self.encode(v))
                    .collect::<ClientResult<_>>()?,
            ),
            Value::Object(map) => AttributeValue::M(self.encode_item(map)?),
        })
    }

    fn decode(&self, value: &AttributeValue) -> ClientResult<Value> {
        Ok(match value {
            AttributeValue::S(s) => Value::String(s.clone()),
            AttributeValue::N(n) => Value::Number(parse_number(n)?),
            AttributeValue::B(bytes) => bytes_to_value(bytes),
            AttributeValue::Bool(b) => Value::Bool(*b),
            AttributeValue::Null(_) => Value::Null,
            AttributeValue::M(map) => Value::Object(self.decode_item(map)?),
            AttributeValue::L(values) => Value::Array(
                values
                    .iter()
                    .map(|v| self.decode(v))
                    .collect::<ClientResult<_>>()?,
            ),
            AttributeValue::Ss(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
            AttributeValue::Ns(values) => Value::Array(
                values
                    .iter()
                    .map(|n| parse_number(n).map(Value::Number))
                    .collect::<ClientResult<_>>()?,
            ),
            AttributeValue::Bs(values) => {
                Value::Array(values.iter().map(|b| bytes_to_value(b)).collect())
            }
        })
    }

    fn encode_item(&self, item: &NativeItem) -> ClientResult<WireItem> {
        item.iter()
            .filter(|(_, value)| !(value.is_null() && self.options.remove_null_values))
            .map(|(name, value)| -> ClientResult<(String, AttributeValue)> {
                Ok((name.clone(), self.encode(value)?))
            })
            .collect()
    }
}

fn parse_number(raw: &str) -> ClientResult<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| ClientError::codec(format!("'{raw}' is not a valid number attribute")))
}

fn bytes_to_value(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())
}

/// Serialize a typed record into a native item
pub fn to_item<T: Serialize>(value: &T) -> ClientResult<NativeItem> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ClientError::codec(format!(
            "items must serialize to a JSON object, got {other}"
        ))),
    }
}

/// Deserialize a native item into a typed record
pub fn from_item<T: DeserializeOwned>(item: NativeItem) -> ClientResult<T> {
    Ok(serde_json::from_value(Value::Object(item))?)
}
