//! Firestore REST wire types.
//!
//! Firestore does not store plain JSON: every field value is wrapped in a
//! single-key envelope naming its type (`{"stringValue": "x"}`,
//! `{"integerValue": "42"}`, ...). These types model that envelope exactly;
//! [`super::convert`] translates to and from plain JSON at the client
//! boundary so the rest of the crate never sees it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A document as sent to and returned by the Firestore REST API.
///
/// Write bodies serialize only `fields`; the remaining fields are
/// output-only and populated by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, e.g.
    /// `projects/{p}/databases/(default)/documents/users/{id}`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// The document's field values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// Returns the document ID (the last segment of the resource name).
    #[must_use]
    pub fn doc_id(&self) -> Option<&str> {
        self.name.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

/// A single Firestore field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A null value. Serializes as `{"nullValue": null}`.
    #[serde(rename = "nullValue")]
    Null(()),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    /// Firestore transports 64-bit integers as decimal strings.
    #[serde(rename = "integerValue", with = "int_as_string")]
    Integer(i64),
    #[serde(rename = "doubleValue")]
    Double(f64),
    /// RFC 3339 timestamp, kept as a string (documents store their own
    /// timestamps as strings, so nothing in this crate needs the parsed form).
    #[serde(rename = "timestampValue")]
    Timestamp(String),
    #[serde(rename = "stringValue")]
    String(String),
    /// Base64-encoded bytes, passed through undecoded.
    #[serde(rename = "bytesValue")]
    Bytes(String),
    /// Full resource name of another document.
    #[serde(rename = "referenceValue")]
    Reference(String),
    #[serde(rename = "geoPointValue")]
    GeoPoint(LatLng),
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),
    #[serde(rename = "mapValue")]
    Map(MapValue),
}

/// An array of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Firestore omits this key entirely for empty arrays.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

/// A nested map of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    /// Firestore omits this key entirely for empty maps.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

/// A geographic point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

mod int_as_string {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
