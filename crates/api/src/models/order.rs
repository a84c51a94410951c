//! Order documents.

use guava_market_core::OrderId;
use serde::Serialize;

use crate::firebase::JsonMap;

/// Document fields managed by the server, never writable by clients.
const RESERVED_FIELDS: &[&str] = &["id", "createdAt", "updatedAt"];

/// An order document, shaped for API responses.
///
/// Orders are schemaless: whatever fields were stored come back verbatim,
/// flattened next to the document ID.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Document ID.
    pub id: OrderId,
    /// The stored fields, returned as-is.
    #[serde(flatten)]
    pub fields: JsonMap,
}

impl Order {
    /// Build an order from a stored document's fields.
    #[must_use]
    pub fn from_fields(id: OrderId, fields: &JsonMap) -> Self {
        let mut fields = fields.clone();
        // A stored "id" field would collide with the document ID when
        // flattened; the document ID wins.
        fields.remove("id");
        Self { id, fields }
    }
}

/// Client-supplied order fields with server-managed keys stripped.
///
/// Orders carry no schema, so any JSON object is accepted; only the
/// reserved ID and timestamp keys are dropped before writing.
#[derive(Debug, Clone, Default)]
pub struct OrderFields(JsonMap);

impl OrderFields {
    /// Strip reserved keys from a client payload.
    #[must_use]
    pub fn parse(payload: &JsonMap) -> Self {
        let mut fields = payload.clone();
        for key in RESERVED_FIELDS {
            fields.remove(*key);
        }
        Self(fields)
    }

    /// The fields to write, as document JSON.
    #[must_use]
    pub fn into_map(self) -> JsonMap {
        self.0
    }
}
