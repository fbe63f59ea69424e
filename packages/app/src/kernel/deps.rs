//! Application dependencies (using traits for testability)
//!
//! This module provides the central dependency container constructed once at
//! application start and handed to domain services. All external services use
//! trait abstractions to enable testing.

use std::sync::Arc;

use crate::config::Config;
use crate::domains::auth::AuthSession;
use crate::kernel::{BaseDocumentStore, DocumentStoreError, FirestoreClient};

/// Application dependencies accessible to domain services.
#[derive(Clone)]
pub struct AppDeps {
    /// Remote document store holding per-user preference documents.
    pub store: Arc<dyn BaseDocumentStore>,
    /// Auth-provider session handle (current user id + state changes).
    pub session: AuthSession,
}

impl AppDeps {
    /// Create new AppDeps with the given dependencies.
    pub fn new(store: Arc<dyn BaseDocumentStore>, session: AuthSession) -> Self {
        Self { store, session }
    }

    /// Wire up production dependencies from configuration.
    pub fn from_config(config: &Config) -> Result<Self, DocumentStoreError> {
        let store = FirestoreClient::new(
            config.firestore_project_id.clone(),
            config.firestore_api_key.clone(),
        )?;

        Ok(Self::new(Arc::new(store), AuthSession::new()))
    }
}
