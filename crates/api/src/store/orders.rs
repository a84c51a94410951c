//! Order store for the `orders` collection.

use std::sync::Arc;

use guava_market_core::{IdError, OrderId};

use super::{ORDERS_COLLECTION, StoreError};
use crate::clock::{Clock, format_timestamp};
use crate::firebase::{DocumentStore, FirebaseError, JsonMap};
use crate::models::Order;

/// Store for order documents.
#[derive(Clone)]
pub struct OrderStore {
    documents: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl OrderStore {
    /// Create a new order store.
    #[must_use]
    pub const fn new(documents: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { documents, clock }
    }

    /// Create an order with a store-generated ID.
    ///
    /// Stamps `createdAt` and `updatedAt` with the same instant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend request fails.
    pub async fn create(&self, mut fields: JsonMap) -> Result<OrderId, StoreError> {
        let now = format_timestamp(self.clock.now());
        fields.insert("createdAt".to_string(), now.clone().into());
        fields.insert("updatedAt".to_string(), now.into());

        let doc = self.documents.add(ORDERS_COLLECTION, &fields).await?;
        OrderId::parse(&doc.id).map_err(bad_id)
    }

    /// Fetch an order, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend request fails.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        let doc = self.documents.get(ORDERS_COLLECTION, id.as_str()).await?;
        Ok(doc.map(|d| Order::from_fields(id.clone(), &d.fields)))
    }

    /// List every order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend request fails.
    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        let docs = self.documents.list(ORDERS_COLLECTION).await?;
        docs.into_iter()
            .map(|doc| {
                let id = OrderId::parse(&doc.id).map_err(bad_id)?;
                Ok(Order::from_fields(id, &doc.fields))
            })
            .collect()
    }

    /// Merge fields into an existing order, stamping `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist.
    pub async fn update(&self, id: &OrderId, mut fields: JsonMap) -> Result<(), StoreError> {
        fields.insert(
            "updatedAt".to_string(),
            format_timestamp(self.clock.now()).into(),
        );

        self.documents
            .update(ORDERS_COLLECTION, id.as_str(), &fields)
            .await?;
        Ok(())
    }

    /// Delete an order. Succeeds whether or not it existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend request fails.
    pub async fn delete(&self, id: &OrderId) -> Result<(), StoreError> {
        self.documents
            .delete(ORDERS_COLLECTION, id.as_str())
            .await?;
        Ok(())
    }
}

fn bad_id(err: IdError) -> StoreError {
    StoreError::Backend(FirebaseError::UnexpectedResponse(format!(
        "bad document id in {ORDERS_COLLECTION}: {err}"
    )))
}
