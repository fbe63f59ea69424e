// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "toggle a saved resource") lives in domain services
// that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore)

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Error taxonomy for the remote document store.
///
/// Not-found is NOT an error: `get` returns `Ok(None)` for a missing
/// document. These variants cover genuinely failed operations; callers in
/// the preferences domain recover from all of them locally.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// The store could not be reached or the request did not complete.
    #[error("document store unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The store rejected the request (bad payload, permissions, quota).
    #[error("document store rejected {operation} on {path}: {status}")]
    Rejected {
        operation: &'static str,
        path: String,
        status: u16,
    },

    /// The store returned a document we could not decode.
    #[error("malformed document at {path}: {reason}")]
    Malformed { path: String, reason: String },
}

// =============================================================================
// Document Store Trait (Infrastructure - opaque document database)
// =============================================================================

#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Fetch a document. Returns `Ok(None)` when the document does not exist.
    async fn get(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Value>, DocumentStoreError>;

    /// Write a document. `fields` must be a JSON object.
    ///
    /// With `merge = true` only the provided top-level fields are updated and
    /// the document is created if absent (merge-write). With `merge = false`
    /// the document is replaced wholesale.
    async fn set(
        &self,
        collection: &str,
        document_id: &str,
        fields: Value,
        merge: bool,
    ) -> Result<(), DocumentStoreError>;
}
