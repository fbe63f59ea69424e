//! Auth-provider session handle.
//!
//! The auth provider itself (credential flows, token refresh) is an external
//! collaborator; this crate only needs the current user and a way to observe
//! sign-in/sign-out transitions. The session is a cloneable handle around a
//! `tokio::sync::watch` channel: producers call `sign_in`/`sign_out` as the
//! provider reports state changes, consumers read the current user or
//! subscribe to transitions.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use crate::common::UserId;

/// The authenticated user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
}

impl SessionUser {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Cloneable session handle. `None` means signed out.
#[derive(Clone)]
pub struct AuthSession {
    tx: Arc<watch::Sender<Option<SessionUser>>>,
}

impl AuthSession {
    /// Create a signed-out session.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// The current user, if any.
    pub fn current_user(&self) -> Option<SessionUser> {
        self.tx.borrow().clone()
    }

    /// The current user id, if any.
    pub fn current_user_id(&self) -> Option<UserId> {
        self.tx.borrow().as_ref().map(|user| user.id.clone())
    }

    /// Report a sign-in from the auth provider.
    pub fn sign_in(&self, user: SessionUser) {
        info!(user_id = %user.id, "Session signed in");
        let _ = self.tx.send(Some(user));
    }

    /// Report a sign-out from the auth provider.
    pub fn sign_out(&self) {
        info!("Session signed out");
        let _ = self.tx.send(None);
    }

    /// Subscribe to auth state changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.tx.subscribe()
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}
