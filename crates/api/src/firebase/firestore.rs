//! Firestore REST client: document CRUD, listing, and equality queries.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use super::convert::{fields_to_json, json_to_fields};
use super::types::Document;
use super::{FirebaseError, JsonMap, api_error_message};
use crate::config::FirebaseConfig;

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// Page size for collection listing. The handlers return whole collections,
/// so the client walks `nextPageToken` until the end.
const LIST_PAGE_SIZE: u32 = 300;

/// A document read back from the store, with its fields as plain JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// The document ID within its collection.
    pub id: String,
    /// The document's fields, converted out of the wire envelope.
    pub fields: JsonMap,
}

/// The subset of the document database this API uses.
///
/// Injected into [`crate::state::AppState`] as a trait object so tests can
/// substitute an in-memory implementation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document, `None` if it does not exist.
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, FirebaseError>;

    /// Create a document with a store-generated ID.
    async fn add(
        &self,
        collection: &str,
        fields: &JsonMap,
    ) -> Result<StoredDocument, FirebaseError>;

    /// Merge fields into a document, creating it if absent.
    ///
    /// Only the given fields are written; other fields on an existing
    /// document are left untouched. `fields` must be non-empty.
    async fn set_merge(
        &self,
        collection: &str,
        id: &str,
        fields: &JsonMap,
    ) -> Result<StoredDocument, FirebaseError>;

    /// Merge fields into an existing document.
    ///
    /// Fails with [`FirebaseError::NotFound`] when the document does not
    /// exist. `fields` must be non-empty.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &JsonMap,
    ) -> Result<StoredDocument, FirebaseError>;

    /// Delete a document. Succeeds whether or not it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), FirebaseError>;

    /// List every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, FirebaseError>;

    /// Find the first document whose `field` equals the string `value`.
    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, FirebaseError>;
}

/// REST client for the Firestore API.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: reqwest::Client,
    base_url: String,
    /// `projects/{project}/databases/(default)/documents`
    root: String,
    access_token: Option<SecretString>,
}

impl FirestoreClient {
    /// Build a client from configuration.
    ///
    /// Points at the Firestore emulator when `FIRESTORE_EMULATOR_HOST` is set.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        let base_url = config.firestore_emulator_host.as_ref().map_or_else(
            || FIRESTORE_URL.to_string(),
            |host| format!("http://{host}/v1"),
        );
        let root = format!(
            "projects/{}/databases/(default)/documents",
            config.project_id
        );

        Self {
            client: reqwest::Client::new(),
            base_url,
            root,
            access_token: config.firestore_token.clone(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            self.root,
            urlencoding::encode(collection)
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            urlencoding::encode(id)
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request whose success body is a single document.
    ///
    /// When `not_found` is given, a 404 becomes [`FirebaseError::NotFound`]
    /// with that context; otherwise it is reported like any other API error.
    async fn send_document(
        &self,
        request: reqwest::RequestBuilder,
        not_found: Option<&str>,
    ) -> Result<Document, FirebaseError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            if let Some(context) = not_found {
                return Err(FirebaseError::NotFound(context.to_string()));
            }
        }
        if !status.is_success() {
            return Err(FirebaseError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, FirebaseError> {
        let context = format!("document {collection}/{id}");
        let request = self.client.get(self.document_url(collection, id));

        match self.send_document(request, Some(&context)).await {
            Ok(doc) => Ok(Some(stored(collection, doc)?)),
            Err(FirebaseError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn add(
        &self,
        collection: &str,
        fields: &JsonMap,
    ) -> Result<StoredDocument, FirebaseError> {
        let body = Document {
            fields: json_to_fields(fields),
            ..Document::default()
        };
        let request = self.client.post(self.collection_url(collection)).json(&body);
        let doc = self.send_document(request, None).await?;
        stored(collection, doc)
    }

    async fn set_merge(
        &self,
        collection: &str,
        id: &str,
        fields: &JsonMap,
    ) -> Result<StoredDocument, FirebaseError> {
        let body = Document {
            fields: json_to_fields(fields),
            ..Document::default()
        };
        // Masking the patch to its own keys is what makes this a merge
        // rather than a full overwrite.
        let params: Vec<(&str, &str)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.as_str()))
            .collect();
        let request = self
            .client
            .patch(self.document_url(collection, id))
            .query(&params)
            .json(&body);
        let doc = self.send_document(request, None).await?;
        stored(collection, doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &JsonMap,
    ) -> Result<StoredDocument, FirebaseError> {
        let context = format!("document {collection}/{id}");
        let body = Document {
            fields: json_to_fields(fields),
            ..Document::default()
        };
        let mut params: Vec<(&str, &str)> = vec![("currentDocument.exists", "true")];
        params.extend(fields.keys().map(|key| ("updateMask.fieldPaths", key.as_str())));
        let request = self
            .client
            .patch(self.document_url(collection, id))
            .query(&params)
            .json(&body);
        let doc = self.send_document(request, Some(&context)).await?;
        stored(collection, doc)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), FirebaseError> {
        let request = self.client.delete(self.document_url(collection, id));
        let response = self.authorize(request).send().await?;
        let status = response.status();

        // Firestore already succeeds on deleting a missing document; 404
        // here would mean a bad path, which callers treat the same way.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        let text = response.text().await?;
        Err(FirebaseError::Api {
            status: status.as_u16(),
            message: api_error_message(&text),
        })
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, FirebaseError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let page_size = LIST_PAGE_SIZE.to_string();

        loop {
            let mut params: Vec<(&str, &str)> = vec![("pageSize", page_size.as_str())];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let request = self
                .client
                .get(self.collection_url(collection))
                .query(&params);
            let response = self.authorize(request).send().await?;
            let status = response.status();
            let text = response.text().await?;

            if !status.is_success() {
                return Err(FirebaseError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&text),
                });
            }

            let page: ListDocumentsResponse = serde_json::from_str(&text)?;
            for doc in page.documents {
                documents.push(stored(collection, doc)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, FirebaseError> {
        let request = self
            .client
            .post(format!("{}/{}:runQuery", self.base_url, self.root))
            .json(&equality_query(collection, field, value));
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(FirebaseError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        // runQuery streams one result object per line; an empty query still
        // yields a single entry carrying only a readTime.
        let results: Vec<RunQueryResult> = serde_json::from_str(&text)?;
        results
            .into_iter()
            .find_map(|result| result.document)
            .map(|doc| stored(collection, doc))
            .transpose()
    }
}

/// Convert a wire document into a [`StoredDocument`].
fn stored(collection: &str, doc: Document) -> Result<StoredDocument, FirebaseError> {
    let id = doc
        .doc_id()
        .ok_or_else(|| {
            FirebaseError::UnexpectedResponse(format!("document without a name in {collection}"))
        })?
        .to_string();

    Ok(StoredDocument {
        id,
        fields: fields_to_json(&doc.fields),
    })
}

/// Build a `runQuery` body matching documents where `field == value`.
fn equality_query(collection: &str, field: &str, value: &str) -> serde_json::Value {
    json!({
        "structuredQuery": {
            "from": [{"collectionId": collection}],
            "where": {
                "fieldFilter": {
                    "field": {"fieldPath": field},
                    "op": "EQUAL",
                    "value": {"stringValue": value}
                }
            },
            "limit": 1
        }
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct RunQueryResult {
    #[serde(default)]
    document: Option<Document>,
}
