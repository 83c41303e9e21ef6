//! Native <-> wire conversion of whole requests and responses.
//!
//! Only the fields that carry items or attribute values pass through the
//! codec; everything else is moved across untouched.

use std::collections::BTreeMap;

use crate::codec::AttributeCodec;
use crate::error::ClientResult;
use crate::transport::{
    WireBatchGetInput, WireBatchGetOutput, WireBatchWriteInput, WireBatchWriteOutput,
    WireUpdateItemInput,
};
use crate::types::{
    AttributeValue, AttributeValueUpdate, BatchGetInput, BatchGetOutput, BatchWriteInput,
    BatchWriteOutput, KeysAndAttributes, NativeItem, UpdateItemInput, WireItem, WriteRequest,
};

type WireAttributeUpdate = AttributeValueUpdate<AttributeValue>;

pub(crate) fn encode(codec: &dyn AttributeCodec, item: NativeItem) -> ClientResult<WireItem> {
    codec.encode_item(&item)
}

pub(crate) fn decode(codec: &dyn AttributeCodec, item: WireItem) -> ClientResult<NativeItem> {
    codec.decode_item(&item)
}

pub(crate) fn encode_update(
    codec: &dyn AttributeCodec,
    input: UpdateItemInput,
) -> ClientResult<WireUpdateItemInput> {
    let attribute_updates = input
        .attribute_updates
        .map(|updates| -> ClientResult<BTreeMap<String, WireAttributeUpdate>> {
            updates
                .into_iter()
                .map(|(name, update)| -> ClientResult<(String, WireAttributeUpdate)> {
                    let value = update.value.as_ref().map(|v| codec.encode(v)).transpose()?;
                    Ok((
                        name,
                        AttributeValueUpdate {
                            value,
                            action: update.action,
                        },
                    ))
                })
                .collect::<ClientResult<_>>()
        })
        .transpose()?;

    Ok(UpdateItemInput {
        table_name: input.table_name,
        key: encode(codec, input.key)?,
        update_expression: input.update_expression,
        condition_expression: input.condition_expression,
        expression_attribute_names: input.expression_attribute_names,
        expression_attribute_values: input
            .expression_attribute_values
            .map(|values| encode(codec, values))
            .transpose()?,
        attribute_updates,
        return_values: input.return_values,
    })
}

pub(crate) fn encode_batch_write(
    codec: &dyn AttributeCodec,
    input: BatchWriteInput,
) -> ClientResult<WireBatchWriteInput> {
    Ok(BatchWriteInput {
        request_items: input
            .request_items
            .into_iter()
            .map(|(table, requests)| -> ClientResult<(String, Vec<WriteRequest<WireItem>>)> {
                let requests = requests
                    .into_iter()
                    .map(|request| request.try_map(|item| encode(codec, item)))
                    .collect::<ClientResult<_>>()?;
                Ok((table, requests))
            })
            .collect::<ClientResult<_>>()?,
    })
}

pub(crate) fn decode_batch_write(
    codec: &dyn AttributeCodec,
    output: WireBatchWriteOutput,
) -> ClientResult<BatchWriteOutput> {
    Ok(BatchWriteOutput {
        unprocessed_items: output
            .unprocessed_items
            .into_iter()
            .map(|(table, requests)| -> ClientResult<(String, Vec<WriteRequest>)> {
                let requests = requests
                    .into_iter()
                    .map(|request| request.try_map(|item| decode(codec, item)))
                    .collect::<ClientResult<_>>()?;
                Ok((table, requests))
            })
            .collect::<ClientResult<_>>()?,
    })
}

pub(crate) fn encode_batch_get(
    codec: &dyn AttributeCodec,
    input: BatchGetInput,
) -> ClientResult<WireBatchGetInput> {
    Ok(BatchGetInput {
        request_items: input
            .request_items
            .into_iter()
            .map(|(table, keys)| -> ClientResult<(String, KeysAndAttributes<WireItem>)> {
                Ok((table, keys.try_map(|key| encode(codec, key))?))
            })
            .collect::<ClientResult<_>>()?,
    })
}

pub(crate) fn decode_batch_get(
    codec: &dyn AttributeCodec,
    output: WireBatchGetOutput,
) -> ClientResult<BatchGetOutput> {
    Ok(BatchGetOutput {
        responses: output
            .responses
            .into_iter()
            .map(|(table, items)| -> ClientResult<(String, Vec<NativeItem>)> {
                Ok((table, codec.decode_items(&items)?))
            })
            .collect::<ClientResult<_>>()?,
        unprocessed_keys: output
            .unprocessed_keys
            .into_iter()
            .map(|(table, keys)| -> ClientResult<(String, KeysAndAttributes)> {
                Ok((table, keys.try_map(|key| decode(codec, key))?))
            })
            .collect::<ClientResult<_>>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Marshaller;
    use crate::types::{AttributeAction, ReadOptions, TableMap};
    use serde_json::json;

    fn native(value: serde_json::Value) -> NativeItem {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_batch_get_round_trip_keeps_options() {
        let codec = Marshaller::default();
        let options = ReadOptions {
            consistent_read: Some(true),
            ..ReadOptions::default()
        };
        let input = BatchGetInput {
            request_items: TableMap::from([(
                "users".to_string(),
                KeysAndAttributes::new(vec![native(json!({"id": "u1"}))])
                    .with_options(options.clone()),
            )]),
        };

        let wire = encode_batch_get(&codec, input).unwrap();
        let keys = &wire.request_items["users"];
        assert_eq!(keys.options, options);
        assert_eq!(keys.keys[0]["id"], AttributeValue::S("u1".to_string()));
    }

    #[test]
    fn test_decode_unprocessed_writes() {
        let codec = Marshaller::default();
        let wire_key = BTreeMap::from([("id".to_string(), AttributeValue::N("4".to_string()))]);
        let output = WireBatchWriteOutput {
            unprocessed_items: TableMap::from([(
                "t".to_string(),
                vec![WriteRequest::delete(wire_key)],
            )]),
        };

        let native_output = decode_batch_write(&codec, output).unwrap();
        assert_eq!(
            native_output.unprocessed_items["t"],
            vec![WriteRequest::delete(native(json!({"id": 4})))]
        );
    }

    #[test]
    fn test_update_encodes_attribute_update_values() {
        let codec = Marshaller::default();
        let mut input: UpdateItemInput = UpdateItemInput::new("t", native(json!({"id": 1})));
        input.attribute_updates = Some(BTreeMap::from([(
            "visits".to_string(),
            AttributeValueUpdate {
                value: Some(json!(1)),
                action: Some(AttributeAction::Add),
            },
        )]));

        let wire = encode_update(&codec, input).unwrap();
        let updates = wire.attribute_updates.unwrap();
        let update = &updates["visits"];
        assert_eq!(update.value, Some(AttributeValue::N("1".to_string())));
        assert_eq!(update.action, Some(AttributeAction::Add));
    }
}
