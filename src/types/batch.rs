//! Multi-table batch request and response shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{NativeItem, TableMap};

/// A single entry of a batch write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WriteRequest<I = NativeItem> {
    #[serde(rename = "PutRequest")]
    Put { item: I },
    #[serde(rename = "DeleteRequest")]
    Delete { key: I },
}

impl<I> WriteRequest<I> {
    pub fn put(item: I) -> Self {
        Self::Put { item }
    }

    pub fn delete(key: I) -> Self {
        Self::Delete { key }
    }

    /// Convert the carried item or key, keeping the variant
    pub fn try_map<J, E>(self, f: impl FnOnce(I) -> Result<J, E>) -> Result<WriteRequest<J>, E> {
        Ok(match self {
            WriteRequest::Put { item } => WriteRequest::Put { item: f(item)? },
            WriteRequest::Delete { key } => WriteRequest::Delete { key: f(key)? },
        })
    }
}

/// Table-scoped read options that travel alongside a table's keys
///
/// These must be reattached to every page carved from the table's keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<BTreeMap<String, String>>,
}

/// Keys to read from one table plus that table's read options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysAndAttributes<I = NativeItem> {
    pub keys: Vec<I>,
    #[serde(default)]
    pub options: ReadOptions,
}

impl<I> KeysAndAttributes<I> {
    pub fn new(keys: Vec<I>) -> Self {
        Self {
            keys,
            options: ReadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn try_map<J, E>(
        self,
        f: impl FnMut(I) -> Result<J, E>,
    ) -> Result<KeysAndAttributes<J>, E> {
        Ok(KeysAndAttributes {
            keys: self.keys.into_iter().map(f).collect::<Result<_, _>>()?,
            options: self.options,
        })
    }
}

/// One batch write call: up to a page of write requests across tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchWriteInput<I = NativeItem> {
    pub request_items: TableMap<Vec<WriteRequest<I>>>,
}

impl<I> Default for BatchWriteInput<I> {
    fn default() -> Self {
        Self {
            request_items: TableMap::new(),
        }
    }
}

impl<I> BatchWriteInput<I> {
    /// Total number of write requests across all tables
    pub fn len(&self) -> usize {
        self.request_items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of one batch write call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchWriteOutput<I = NativeItem> {
    #[serde(default)]
    pub unprocessed_items: TableMap<Vec<WriteRequest<I>>>,
}

impl<I> Default for BatchWriteOutput<I> {
    fn default() -> Self {
        Self {
            unprocessed_items: TableMap::new(),
        }
    }
}

/// One batch read call: up to a page of keys across tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchGetInput<I = NativeItem> {
    pub request_items: TableMap<KeysAndAttributes<I>>,
}

impl<I> Default for BatchGetInput<I> {
    fn default() -> Self {
        Self {
            request_items: TableMap::new(),
        }
    }
}

impl<I> BatchGetInput<I> {
    /// Total number of keys across all tables
    pub fn len(&self) -> usize {
        self.request_items.values().map(|table| table.keys.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of one batch read call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchGetOutput<I = NativeItem> {
    #[serde(default)]
    pub responses: TableMap<Vec<I>>,
    #[serde(default)]
    pub unprocessed_keys: TableMap<KeysAndAttributes<I>>,
}

impl<I> Default for BatchGetOutput<I> {
    fn default() -> Self {
        Self {
            responses: TableMap::new(),
            unprocessed_keys: TableMap::new(),
        }
    }
}
