//! Conversion between plain JSON and Firestore typed values.
//!
//! Lossy only where JSON cannot express the Firestore type: timestamps,
//! bytes, and document references all come back as plain strings, and a
//! geo point becomes a `{latitude, longitude}` object. Large `u64` values
//! that do not fit an `i64` take the double path.

use std::collections::BTreeMap;

use serde_json::Number;

use super::JsonMap;
use super::types::{ArrayValue, LatLng, MapValue, Value};

/// Convert a plain JSON value into a Firestore typed value.
#[must_use]
pub fn json_to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null(()),
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => n.as_i64().map_or_else(
            || n.as_f64().map_or(Value::Null(()), Value::Double),
            Value::Integer,
        ),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Array(ArrayValue {
            values: items.iter().map(json_to_value).collect(),
        }),
        serde_json::Value::Object(map) => Value::Map(MapValue {
            fields: map
                .iter()
                .map(|(k, v)| (k.clone(), json_to_value(v)))
                .collect(),
        }),
    }
}

/// Convert a Firestore typed value into plain JSON.
#[must_use]
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null(()) => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number(Number::from(*i)),
        Value::Double(d) => {
            Number::from_f64(*d).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Value::Timestamp(s) | Value::String(s) | Value::Bytes(s) | Value::Reference(s) => {
            serde_json::Value::String(s.clone())
        }
        Value::GeoPoint(LatLng {
            latitude,
            longitude,
        }) => serde_json::json!({
            "latitude": latitude,
            "longitude": longitude,
        }),
        Value::Array(array) => {
            serde_json::Value::Array(array.values.iter().map(value_to_json).collect())
        }
        Value::Map(map) => serde_json::Value::Object(
            map.fields
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert a whole document field map into a plain JSON object.
#[must_use]
pub fn fields_to_json(fields: &BTreeMap<String, Value>) -> JsonMap {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect()
}

/// Convert a plain JSON object into a document field map.
#[must_use]
pub fn json_to_fields(json: &JsonMap) -> BTreeMap<String, Value> {
    json.iter()
        .map(|(k, v)| (k.clone(), json_to_value(v)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_scalars_to_values() {
        assert_eq!(json_to_value(&json!(null)), Value::Null(()));
        assert_eq!(json_to_value(&json!(true)), Value::Boolean(true));
        assert_eq!(json_to_value(&json!(42)), Value::Integer(42));
        assert_eq!(json_to_value(&json!(1.5)), Value::Double(1.5));
        assert_eq!(
            json_to_value(&json!("hi")),
            Value::String("hi".to_string())
        );
    }

    #[test]
    fn test_huge_u64_takes_double_path() {
        let value = json_to_value(&json!(u64::MAX));
        assert!(matches!(value, Value::Double(_)));
    }

    #[test]
    fn test_nested_structure_round_trip() {
        let original = json!({
            "name": "Maya",
            "age": 34,
            "tags": ["vip", "beta"],
            "address": {"city": "Lisbon", "zip": 1100},
            "note": null
        });

        let value = json_to_value(&original);
        assert_eq!(value_to_json(&value), original);
    }

    #[test]
    fn test_timestamp_flattens_to_string() {
        let value = Value::Timestamp("2026-01-15T12:00:00Z".to_string());
        assert_eq!(value_to_json(&value), json!("2026-01-15T12:00:00Z"));
    }

    #[test]
    fn test_geo_point_becomes_object() {
        let value = Value::GeoPoint(LatLng {
            latitude: 38.72,
            longitude: -9.14,
        });
        assert_eq!(
            value_to_json(&value),
            json!({"latitude": 38.72, "longitude": -9.14})
        );
    }

    #[test]
    fn test_fields_round_trip() {
        let mut json = JsonMap::new();
        json.insert("status".to_string(), json!("pending"));
        json.insert("total".to_string(), json!(19.5));

        let fields = json_to_fields(&json);
        assert_eq!(fields_to_json(&fields), json);
    }
}
