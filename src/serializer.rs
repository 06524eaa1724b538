//! Conversion between typed entities and HubSpot wire payloads.
//!
//! HubSpot's legacy endpoints wrap entity fields in a property bag:
//!
//! ```json
//! {"dealId": 42, "properties": [{"name": "dealname", "value": "Test"}]}
//! ```
//!
//! while newer endpoints and most request bodies use plain JSON objects.
//! Every conversion takes an explicit [`SchemaMode`] so the call site
//! decides which shape is on the wire.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::traits::{ListModel, PropertyBag};

const PROPERTIES_KEY: &str = "properties";

/// Wire shape of an entity payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaMode {
    /// Fields are top-level JSON keys.
    #[default]
    Plain,
    /// Fields travel in a `properties` array of `{name, value}` pairs.
    Properties,
}

/// Serialize an entity to a JSON string.
pub fn serialize<B: PropertyBag>(entity: &B, mode: SchemaMode) -> Result<String> {
    let value = to_wire_value(entity, mode)?;
    Ok(serde_json::to_string(&value)?)
}

/// Serialize a list of entities as a JSON array, converting each element.
pub fn serialize_batch<B: PropertyBag>(entities: &[B], mode: SchemaMode) -> Result<String> {
    let values = entities
        .iter()
        .map(|entity| to_wire_value(entity, mode))
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::to_string(&values)?)
}

/// Deserialize a single entity.
///
/// Unknown fields are ignored and missing optional fields keep their
/// defaults, as long as `T` is declared that way.
pub fn deserialize<T: DeserializeOwned>(json: &str, mode: SchemaMode) -> Result<T> {
    let value: Value = serde_json::from_str(json)?;
    let value = match mode {
        SchemaMode::Plain => value,
        SchemaMode::Properties => lift_properties(value),
    };
    Ok(serde_json::from_value(value)?)
}

/// Deserialize a list wrapper.
///
/// In properties mode only the elements under `L::RESULTS_KEY` are
/// converted; paging fields are read from the top level as-is. A bare
/// top-level array is taken as the results sequence.
pub fn deserialize_list<L: ListModel>(json: &str, mode: SchemaMode) -> Result<L> {
    let value: Value = serde_json::from_str(json)?;

    let mut map = match value {
        Value::Object(map) => map,
        Value::Array(items) => {
            let mut map = Map::new();
            map.insert(L::RESULTS_KEY.to_string(), Value::Array(items));
            map
        }
        other => return Ok(serde_json::from_value(other)?),
    };

    if mode == SchemaMode::Properties {
        if let Some(Value::Array(items)) = map.get_mut(L::RESULTS_KEY) {
            for item in items.iter_mut() {
                *item = lift_properties(item.take());
            }
        }
    }

    Ok(serde_json::from_value(Value::Object(map))?)
}

fn to_wire_value<B: PropertyBag>(entity: &B, mode: SchemaMode) -> Result<Value> {
    let value = serde_json::to_value(entity)?;
    Ok(match mode {
        SchemaMode::Plain => value,
        SchemaMode::Properties => into_property_bag(value, B::ENVELOPE_FIELDS),
    })
}

/// Move every non-envelope field into a `properties` array. Nulls are dropped.
fn into_property_bag(value: Value, envelope: &[&str]) -> Value {
    let Value::Object(fields) = value else {
        return value;
    };

    let mut wire = Map::new();
    let mut properties = Vec::new();

    for (name, value) in fields {
        if value.is_null() {
            continue;
        }
        if envelope.contains(&name.as_str()) {
            wire.insert(name, value);
        } else {
            properties.push(serde_json::json!({ "name": name, "value": value }));
        }
    }

    wire.insert(PROPERTIES_KEY.to_string(), Value::Array(properties));
    Value::Object(wire)
}

/// Inverse of [`into_property_bag`].
///
/// Accepts `[{name|property, value}]` arrays as well as the object form
/// `{name: value}` / `{name: {value, timestamp, versions, ..}}` returned by
/// the v1 and v3 read endpoints. Keys already at the top level win.
fn lift_properties(value: Value) -> Value {
    let Value::Object(mut fields) = value else {
        return value;
    };

    match fields.remove(PROPERTIES_KEY) {
        Some(Value::Array(entries)) => {
            for entry in entries {
                let Value::Object(mut entry) = entry else {
                    continue;
                };
                let name = entry.remove("name").or_else(|| entry.remove("property"));
                if let Some(Value::String(name)) = name {
                    let value = entry.remove("value").unwrap_or(Value::Null);
                    fields.entry(name).or_insert(value);
                }
            }
        }
        Some(Value::Object(entries)) => {
            for (name, entry) in entries {
                let value = match entry {
                    Value::Object(mut record) if record.contains_key("value") => {
                        record.remove("value").unwrap_or(Value::Null)
                    }
                    other => other,
                };
                fields.entry(name).or_insert(value);
            }
        }
        Some(other) => {
            fields.insert(PROPERTIES_KEY.to_string(), other);
        }
        None => {}
    }

    Value::Object(fields)
}
