use serde_json::{Map, Value};

use super::models::{Collection, Item};
use crate::error::DecodeError;

/// Turn a stored document into an ordered collection.
///
/// Older data may hold the records as an object keyed by position instead of
/// an array. Object values are ordered by key: numeric keys first in numeric
/// order, then the remaining keys lexically. `null` slots are skipped in both
/// shapes, as are absent documents.
pub fn decode_collection(value: Value) -> Result<Collection, DecodeError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(entries) => entries
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(idx, v)| decode_record(idx.to_string(), v))
            .collect(),
        Value::Object(map) => ordered_values(map)
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(key, v)| decode_record(key, v))
            .collect(),
        other => Err(DecodeError::UnexpectedShape {
            found: shape_name(&other),
        }),
    }
}

fn decode_record(position: String, value: Value) -> Result<Item, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Record { position, source })
}

fn ordered_values(map: Map<String, Value>) -> Vec<(String, Value)> {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });
    entries
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
