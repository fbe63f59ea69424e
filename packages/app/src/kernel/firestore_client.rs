//! Firestore REST client implementation of BaseDocumentStore.
//!
//! Talks to the Firestore v1 REST API directly. Documents are translated
//! between plain JSON and Firestore's typed-value envelope
//! (`integerValue`, `stringValue`, `arrayValue`, ...) at this boundary so the
//! rest of the crate only ever sees ordinary `serde_json::Value` objects.
//!
//! Merge-writes use a PATCH with an `updateMask` listing the written fields,
//! which matches the provider SDK's `set(..., { merge: true })`: untouched
//! fields are preserved and the document is created if it does not exist.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{BaseDocumentStore, DocumentStoreError};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Firestore REST client for a single project's default database.
pub struct FirestoreClient {
    project_id: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    pub fn new(project_id: String, api_key: Option<String>) -> Result<Self, DocumentStoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            project_id,
            api_key,
            client,
        })
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}/{}",
            FIRESTORE_BASE_URL,
            self.project_id,
            urlencoding::encode(collection),
            urlencoding::encode(document_id),
        )
    }

    fn key_query(&self) -> Vec<(&'static str, String)> {
        self.api_key
            .iter()
            .map(|k| ("key", k.clone()))
            .collect()
    }
}

#[async_trait]
impl BaseDocumentStore for FirestoreClient {
    async fn get(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Value>, DocumentStoreError> {
        let url = self.document_url(collection, document_id);
        let path = format!("{}/{}", collection, document_id);

        debug!(path = %path, "Fetching document");

        let response = self
            .client
            .get(&url)
            .query(&self.key_query())
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(DocumentStoreError::Rejected {
                operation: "get",
                path,
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let fields = decode_document(&body).map_err(|reason| DocumentStoreError::Malformed {
            path,
            reason,
        })?;

        Ok(Some(fields))
    }

    async fn set(
        &self,
        collection: &str,
        document_id: &str,
        fields: Value,
        merge: bool,
    ) -> Result<(), DocumentStoreError> {
        let url = self.document_url(collection, document_id);
        let path = format!("{}/{}", collection, document_id);

        let object = match fields.as_object() {
            Some(object) => object.clone(),
            None => {
                return Err(DocumentStoreError::Malformed {
                    path,
                    reason: "set payload must be a JSON object".to_string(),
                })
            }
        };

        debug!(path = %path, merge, field_count = object.len(), "Writing document");

        let mut query = self.key_query();
        if merge {
            // The update mask limits the write to the provided fields; fields
            // outside the mask keep their stored value.
            for field_name in object.keys() {
                query.push(("updateMask.fieldPaths", field_name.clone()));
            }
        }

        let body = json!({ "fields": encode_fields(&object) });

        let response = self
            .client
            .patch(&url)
            .query(&query)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DocumentStoreError::Rejected {
                operation: "set",
                path,
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

// =============================================================================
// JSON <-> Firestore typed-value mapping
// =============================================================================

/// Encode a plain JSON object as a Firestore `fields` map.
fn encode_fields(object: &Map<String, Value>) -> Value {
    let mut fields = Map::new();
    for (name, value) in object {
        fields.insert(name.clone(), encode_value(value));
    }
    Value::Object(fields)
}

/// Encode a single JSON value as a Firestore typed value.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Firestore transports integers as decimal strings.
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(object) => json!({ "mapValue": { "fields": encode_fields(object) } }),
    }
}

/// Decode a Firestore document body into a plain JSON object.
fn decode_document(body: &Value) -> Result<Value, String> {
    let fields = match body.get("fields") {
        Some(Value::Object(fields)) => fields,
        // A document that exists but has no fields decodes to an empty object.
        None => return Ok(Value::Object(Map::new())),
        Some(other) => return Err(format!("unexpected fields shape: {}", other)),
    };

    let mut object = Map::new();
    for (name, typed) in fields {
        object.insert(name.clone(), decode_value(typed)?);
    }
    Ok(Value::Object(object))
}

/// Decode a single Firestore typed value into plain JSON.
fn decode_value(typed: &Value) -> Result<Value, String> {
    let object = typed
        .as_object()
        .ok_or_else(|| format!("expected typed value object, got {}", typed))?;

    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| "empty typed value".to_string())?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(inner.clone()),
        "integerValue" => {
            let raw = inner
                .as_str()
                .map(|s| s.parse::<i64>())
                .or_else(|| inner.as_i64().map(Ok))
                .ok_or_else(|| format!("unexpected integerValue: {}", inner))?
                .map_err(|e| format!("bad integerValue: {}", e))?;
            Ok(json!(raw))
        }
        "doubleValue" => Ok(inner.clone()),
        "stringValue" => Ok(inner.clone()),
        // Timestamps surface as RFC 3339 strings; chrono parses them on the
        // model side.
        "timestampValue" => Ok(inner.clone()),
        "arrayValue" => {
            let items = inner
                .get("values")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let decoded: Result<Vec<Value>, String> = items.iter().map(decode_value).collect();
            Ok(Value::Array(decoded?))
        }
        "mapValue" => decode_document(inner),
        other => Err(format!("unsupported value kind: {}", other)),
    }
}
