// Community Compass - Application Core
//
// State-synchronization and filtering core behind the community resource
// directory: a static catalog of local services and events, per-user saved
// items and event registrations persisted to a remote document store, and
// pure filter functions for the directory views. Presentation (routing,
// markup, theming) lives elsewhere and consumes this crate through
// PreferenceService and the directory functions.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
