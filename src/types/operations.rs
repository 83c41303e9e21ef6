//! Single-table operation shapes: query, scan and the single-item calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::NativeItem;

/// Which item image a write call should hand back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnValues {
    None,
    AllOld,
    UpdatedOld,
    AllNew,
    UpdatedNew,
}

/// Legacy per-attribute update action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeAction {
    Put,
    Add,
    Delete,
}

/// Single-page query against a table or index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInput<I = NativeItem> {
    pub table_name: String,
    pub index_name: Option<String>,
    pub key_condition_expression: Option<String>,
    pub filter_expression: Option<String>,
    pub projection_expression: Option<String>,
    pub expression_attribute_names: Option<BTreeMap<String, String>>,
    pub expression_attribute_values: Option<I>,
    /// Continuation cursor from a previous page
    pub exclusive_start_key: Option<I>,
    /// Maximum items the store evaluates for this single page
    pub limit: Option<u32>,
    pub consistent_read: Option<bool>,
    pub scan_index_forward: Option<bool>,
}

impl<I> QueryInput<I> {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: None,
            key_condition_expression: None,
            filter_expression: None,
            projection_expression: None,
            expression_attribute_names: None,
            expression_attribute_values: None,
            exclusive_start_key: None,
            limit: None,
            consistent_read: None,
            scan_index_forward: None,
        }
    }

    pub fn with_key_condition(mut self, expression: impl Into<String>, values: I) -> Self {
        self.key_condition_expression = Some(expression.into());
        self.expression_attribute_values = Some(values);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Convert expression values and the start key, keeping everything else
    pub fn try_map_items<J, E>(
        self,
        mut f: impl FnMut(I) -> Result<J, E>,
    ) -> Result<QueryInput<J>, E> {
        Ok(QueryInput {
            table_name: self.table_name,
            index_name: self.index_name,
            key_condition_expression: self.key_condition_expression,
            filter_expression: self.filter_expression,
            projection_expression: self.projection_expression,
            expression_attribute_names: self.expression_attribute_names,
            expression_attribute_values: self.expression_attribute_values.map(&mut f).transpose()?,
            exclusive_start_key: self.exclusive_start_key.map(&mut f).transpose()?,
            limit: self.limit,
            consistent_read: self.consistent_read,
            scan_index_forward: self.scan_index_forward,
        })
    }
}

/// Single-page scan, optionally one segment of a parallel scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanInput<I = NativeItem> {
    pub table_name: String,
    pub index_name: Option<String>,
    pub filter_expression: Option<String>,
    pub projection_expression: Option<String>,
    pub expression_attribute_names: Option<BTreeMap<String, String>>,
    pub expression_attribute_values: Option<I>,
    pub exclusive_start_key: Option<I>,
    pub limit: Option<u32>,
    pub consistent_read: Option<bool>,
    pub segment: Option<u32>,
    pub total_segments: Option<u32>,
}

impl<I> ScanInput<I> {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: None,
            filter_expression: None,
            projection_expression: None,
            expression_attribute_names: None,
            expression_attribute_values: None,
            exclusive_start_key: None,
            limit: None,
            consistent_read: None,
            segment: None,
            total_segments: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn try_map_items<J, E>(
        self,
        mut f: impl FnMut(I) -> Result<J, E>,
    ) -> Result<ScanInput<J>, E> {
        Ok(ScanInput {
            table_name: self.table_name,
            index_name: self.index_name,
            filter_expression: self.filter_expression,
            projection_expression: self.projection_expression,
            expression_attribute_names: self.expression_attribute_names,
            expression_attribute_values: self.expression_attribute_values.map(&mut f).transpose()?,
            exclusive_start_key: self.exclusive_start_key.map(&mut f).transpose()?,
            limit: self.limit,
            consistent_read: self.consistent_read,
            segment: self.segment,
            total_segments: self.total_segments,
        })
    }
}

/// One page of query or scan results
///
/// After a paginated call completes, `count`/`scanned_count` hold running
/// totals and `last_evaluated_key` is always `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadPageOutput<I = NativeItem> {
    pub items: Vec<I>,
    pub count: u64,
    pub scanned_count: u64,
    pub last_evaluated_key: Option<I>,
}

impl<I> Default for ReadPageOutput<I> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            scanned_count: 0,
            last_evaluated_key: None,
        }
    }
}

impl<I> ReadPageOutput<I> {
    /// Fold a later page into this running result
    pub fn absorb(&mut self, page: ReadPageOutput<I>) {
        self.count += page.count;
        self.scanned_count += page.scanned_count;
        self.items.extend(page.items);
        self.last_evaluated_key = page.last_evaluated_key;
    }

    pub fn try_map_items<J, E>(
        self,
        mut f: impl FnMut(I) -> Result<J, E>,
    ) -> Result<ReadPageOutput<J>, E> {
        Ok(ReadPageOutput {
            items: self.items.into_iter().map(&mut f).collect::<Result<_, _>>()?,
            count: self.count,
            scanned_count: self.scanned_count,
            last_evaluated_key: self.last_evaluated_key.map(&mut f).transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetItemInput<I = NativeItem> {
    pub table_name: String,
    pub key: I,
    pub consistent_read: Option<bool>,
    pub projection_expression: Option<String>,
    pub expression_attribute_names: Option<BTreeMap<String, String>>,
}

impl<I> GetItemInput<I> {
    pub fn new(table_name: impl Into<String>, key: I) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            consistent_read: None,
            projection_expression: None,
            expression_attribute_names: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetItemOutput<I = NativeItem> {
    pub item: Option<I>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutItemInput<I = NativeItem> {
    pub table_name: String,
    pub item: I,
    pub condition_expression: Option<String>,
    pub expression_attribute_names: Option<BTreeMap<String, String>>,
    pub expression_attribute_values: Option<I>,
    pub return_values: Option<ReturnValues>,
}

impl<I> PutItemInput<I> {
    pub fn new(table_name: impl Into<String>, item: I) -> Self {
        Self {
            table_name: table_name.into(),
            item,
            condition_expression: None,
            expression_attribute_names: None,
            expression_attribute_values: None,
            return_values: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutItemOutput<I = NativeItem> {
    pub attributes: Option<I>,
}

/// Legacy attribute update; `value` is a single attribute, not an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValueUpdate<V = serde_json::Value> {
    pub value: Option<V>,
    pub action: Option<AttributeAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemInput<I = NativeItem, V = serde_json::Value> {
    pub table_name: String,
    pub key: I,
    pub update_expression: Option<String>,
    pub condition_expression: Option<String>,
    pub expression_attribute_names: Option<BTreeMap<String, String>>,
    pub expression_attribute_values: Option<I>,
    pub attribute_updates: Option<BTreeMap<String, AttributeValueUpdate<V>>>,
    pub return_values: Option<ReturnValues>,
}

impl<I, V> UpdateItemInput<I, V> {
    pub fn new(table_name: impl Into<String>, key: I) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            update_expression: None,
            condition_expression: None,
            expression_attribute_names: None,
            expression_attribute_values: None,
            attribute_updates: None,
            return_values: None,
        }
    }

    pub fn with_update_expression(mut self, expression: impl Into<String>, values: I) -> Self {
        self.update_expression = Some(expression.into());
        self.expression_attribute_values = Some(values);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemOutput<I = NativeItem> {
    pub attributes: Option<I>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteItemInput<I = NativeItem> {
    pub table_name: String,
    pub key: I,
    pub condition_expression: Option<String>,
    pub expression_attribute_names: Option<BTreeMap<String, String>>,
    pub expression_attribute_values: Option<I>,
    pub return_values: Option<ReturnValues>,
}

impl<I> DeleteItemInput<I> {
    pub fn new(table_name: impl Into<String>, key: I) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            condition_expression: None,
            expression_attribute_names: None,
            expression_attribute_values: None,
            return_values: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteItemOutput<I = NativeItem> {
    pub attributes: Option<I>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_accumulates_counts_and_items() {
        let mut running = ReadPageOutput {
            items: vec![1, 2],
            count: 2,
            scanned_count: 100,
            last_evaluated_key: Some(2),
        };
        running.absorb(ReadPageOutput {
            items: vec![3],
            count: 1,
            scanned_count: 50,
            last_evaluated_key: None,
        });
        assert_eq!(running.items, vec![1, 2, 3]);
        assert_eq!(running.count, 3);
        assert_eq!(running.scanned_count, 150);
        assert_eq!(running.last_evaluated_key, None);
    }

    #[test]
    fn test_query_map_converts_only_item_fields() {
        let input = QueryInput::new("orders")
            .with_key_condition("pk = :pk", 1)
            .with_limit(10);
        let mapped = input.try_map_items(|v| Ok::<_, ()>(v + 1)).unwrap();
        assert_eq!(mapped.table_name, "orders");
        assert_eq!(mapped.expression_attribute_values, Some(2));
        assert_eq!(mapped.exclusive_start_key, None);
        assert_eq!(mapped.limit, Some(10));
    }
}
