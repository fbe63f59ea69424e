// TestDependencies - mock implementations for testing
//
// Provides an in-memory document store that can be injected into
// PreferenceService for tests, with call recording and scripted failures.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BaseDocumentStore, DocumentStoreError};

/// Arguments captured from a set call
#[derive(Debug, Clone)]
pub struct SetCallArgs {
    pub collection: String,
    pub document_id: String,
    pub fields: Value,
    pub merge: bool,
}

/// In-memory BaseDocumentStore with merge-write semantics.
///
/// Records every call and can be scripted to fail, so tests can drive the
/// reconciliation paths without a live backend.
#[derive(Clone, Default)]
pub struct MockDocumentStore {
    documents: Arc<Mutex<HashMap<(String, String), Value>>>,
    get_calls: Arc<Mutex<Vec<(String, String)>>>,
    set_calls: Arc<Mutex<Vec<SetCallArgs>>>,
    fail_sets: Arc<Mutex<u32>>,
    fail_gets: Arc<Mutex<bool>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document before the test runs.
    pub fn with_document(self, collection: &str, document_id: &str, fields: Value) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert((collection.to_string(), document_id.to_string()), fields);
        self
    }

    /// Make the next `n` set calls fail. The writes are not applied.
    pub fn fail_next_sets(&self, n: u32) {
        *self.fail_sets.lock().unwrap() = n;
    }

    /// Make all get calls fail until cleared.
    pub fn fail_gets(&self, fail: bool) {
        *self.fail_gets.lock().unwrap() = fail;
    }

    /// Directly read a stored document (bypasses call recording).
    pub fn document(&self, collection: &str, document_id: &str) -> Option<Value> {
        self.documents
            .lock()
            .unwrap()
            .get(&(collection.to_string(), document_id.to_string()))
            .cloned()
    }

    /// Directly overwrite a stored document (simulates out-of-band writes).
    pub fn put_document(&self, collection: &str, document_id: &str, fields: Value) {
        self.documents
            .lock()
            .unwrap()
            .insert((collection.to_string(), document_id.to_string()), fields);
    }

    /// All (collection, id) pairs that were fetched.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.get_calls.lock().unwrap().clone()
    }

    /// All set calls with their arguments, in issuance order.
    pub fn set_calls(&self) -> Vec<SetCallArgs> {
        self.set_calls.lock().unwrap().clone()
    }

    fn rejected(operation: &'static str, collection: &str, document_id: &str) -> DocumentStoreError {
        DocumentStoreError::Rejected {
            operation,
            path: format!("{}/{}", collection, document_id),
            status: 503,
        }
    }
}

#[async_trait]
impl BaseDocumentStore for MockDocumentStore {
    async fn get(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Value>, DocumentStoreError> {
        self.get_calls
            .lock()
            .unwrap()
            .push((collection.to_string(), document_id.to_string()));

        if *self.fail_gets.lock().unwrap() {
            return Err(Self::rejected("get", collection, document_id));
        }

        Ok(self.document(collection, document_id))
    }

    async fn set(
        &self,
        collection: &str,
        document_id: &str,
        fields: Value,
        merge: bool,
    ) -> Result<(), DocumentStoreError> {
        self.set_calls.lock().unwrap().push(SetCallArgs {
            collection: collection.to_string(),
            document_id: document_id.to_string(),
            fields: fields.clone(),
            merge,
        });

        {
            let mut remaining = self.fail_sets.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Self::rejected("set", collection, document_id));
            }
        }

        let incoming = match fields {
            Value::Object(object) => object,
            _ => {
                return Err(DocumentStoreError::Malformed {
                    path: format!("{}/{}", collection, document_id),
                    reason: "set payload must be a JSON object".to_string(),
                })
            }
        };

        let key = (collection.to_string(), document_id.to_string());
        let mut documents = self.documents.lock().unwrap();

        if merge {
            // Top-level field merge, creating the document if absent.
            let entry = documents.entry(key).or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(existing) = entry {
                for (name, value) in incoming {
                    existing.insert(name, value);
                }
            }
        } else {
            documents.insert(key, Value::Object(incoming));
        }

        Ok(())
    }
}
