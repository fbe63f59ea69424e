//! Preferences domain - saved resources and event registrations, kept
//! optimistically in sync with the remote document store.

pub mod models;
pub mod service;

pub use models::{UserDocument, USERS_COLLECTION};
pub use service::{PreferenceService, WriteOutcome, WriteTicket};
