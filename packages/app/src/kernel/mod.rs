//! Kernel module - infrastructure and dependencies.

pub mod deps;
pub mod firestore_client;
pub mod test_dependencies;
pub mod traits;

pub use deps::AppDeps;
pub use firestore_client::FirestoreClient;
pub use test_dependencies::{MockDocumentStore, SetCallArgs};
pub use traits::{BaseDocumentStore, DocumentStoreError};
