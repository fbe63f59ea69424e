//! Auth domain - session state from the external auth provider.

pub mod session;

pub use session::{AuthSession, SessionUser};
