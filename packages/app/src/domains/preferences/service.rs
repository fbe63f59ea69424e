//! Preference service - saved resources and event registrations.
//!
//! Owns the in-memory reflection of the current user's saved resource ids and
//! registered event ids, kept optimistically in sync with the remote document
//! store. Toggles apply locally first (the UI stays responsive), then a
//! per-user write worker persists the new list as a merge-write. A failed
//! write triggers reconciliation-by-reload: the full document is re-fetched
//! and overwrites local state, rather than rolling back by diff.
//!
//! Constructed once at application start and passed by handle (clone) to
//! consumers; there is no ambient global instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use indexmap::IndexSet;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::common::{EventId, ResourceId, UserId};
use crate::domains::auth::AuthSession;
use crate::domains::catalog::{EventRecord, ResourceRecord};
use crate::kernel::BaseDocumentStore;

use super::models::{UserDocument, USERS_COLLECTION};

/// Final consistency result of a toggle's remote phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The merge-write reached the store.
    Persisted,
    /// The write failed; local state was reconciled from the store.
    Reconciled,
    /// No remote write was issued (unauthenticated, or the service shut
    /// down before the write ran).
    Skipped,
}

/// Awaitable handle on a toggle's remote phase.
///
/// Toggles return immediately after the optimistic local update; awaiting the
/// ticket observes the outcome of the queued write. Dropping the ticket is
/// fine - the write still runs.
pub struct WriteTicket {
    rx: oneshot::Receiver<WriteOutcome>,
}

impl WriteTicket {
    pub async fn outcome(self) -> WriteOutcome {
        self.rx.await.unwrap_or(WriteOutcome::Skipped)
    }

    fn resolved(outcome: WriteOutcome) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(outcome);
        Self { rx }
    }
}

struct WriteCommand {
    user_id: UserId,
    fields: serde_json::Value,
    done: oneshot::Sender<WriteOutcome>,
}

#[derive(Default)]
struct PreferenceState {
    saved_resources: IndexSet<ResourceId>,
    registered_events: IndexSet<EventId>,
}

struct Shared {
    state: RwLock<PreferenceState>,
    loading: AtomicBool,
    store: Arc<dyn BaseDocumentStore>,
    session: AuthSession,
}

impl Shared {
    /// Adopt a fetched document into local state, unless the session has
    /// moved on since the request was issued. An in-flight load that
    /// completes after a sign-out or user switch must not clobber state.
    fn adopt_if_current(&self, user_id: &UserId, doc: UserDocument) -> bool {
        if self.session.current_user_id().as_ref() != Some(user_id) {
            info!(user_id = %user_id, "Discarding preference load for stale session");
            return false;
        }

        let mut state = self.state.write().unwrap();
        state.saved_resources = doc.saved_items.into_iter().collect();
        state.registered_events = doc.user_events.into_iter().collect();
        true
    }

    fn clear_state(&self) {
        let mut state = self.state.write().unwrap();
        state.saved_resources.clear();
        state.registered_events.clear();
    }

    /// Re-fetch the user's document and force local state into agreement
    /// with the store. Fetch failures leave local state at its prior value.
    async fn reconcile(&self, user_id: &UserId) {
        match self.store.get(USERS_COLLECTION, user_id.as_str()).await {
            Ok(Some(value)) => match serde_json::from_value::<UserDocument>(value) {
                Ok(doc) => {
                    self.adopt_if_current(user_id, doc);
                }
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "Preference document failed to decode");
                }
            },
            Ok(None) => {
                // Store has no document: the authoritative state is empty.
                self.adopt_if_current(user_id, UserDocument::default());
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Preference reload failed");
            }
        }
    }
}

/// Sets the loading flag for a scope and clears it on every exit path.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Cloneable handle on the per-session preference state.
#[derive(Clone)]
pub struct PreferenceService {
    shared: Arc<Shared>,
    write_tx: mpsc::UnboundedSender<WriteCommand>,
}

impl PreferenceService {
    /// Create the service and spawn its write worker.
    ///
    /// The worker drains queued merge-writes strictly in issuance order, so
    /// concurrent toggles for the same user cannot lose updates. It exits
    /// when the last service handle is dropped.
    pub fn new(store: Arc<dyn BaseDocumentStore>, session: AuthSession) -> Self {
        let shared = Arc::new(Shared {
            state: RwLock::new(PreferenceState::default()),
            loading: AtomicBool::new(false),
            store,
            session,
        });

        let (write_tx, write_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_write_worker(shared.clone(), write_rx));

        Self { shared, write_tx }
    }

    /// Fetch the user's preference document and adopt it locally.
    ///
    /// A missing document is created (merge-write) with empty lists, the
    /// user's email, and a creation timestamp. Store failures are logged and
    /// swallowed; local state is left at its prior value. The loading flag is
    /// set for the duration of the call and cleared on every path.
    pub async fn load(&self, user_id: &UserId) {
        let shared = &self.shared;
        let _guard = LoadingGuard::engage(&shared.loading);

        debug!(user_id = %user_id, "Loading preference document");

        match shared.store.get(USERS_COLLECTION, user_id.as_str()).await {
            Ok(Some(value)) => match serde_json::from_value::<UserDocument>(value) {
                Ok(doc) => {
                    shared.adopt_if_current(user_id, doc);
                }
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "Preference document failed to decode");
                }
            },
            Ok(None) => {
                let email = shared
                    .session
                    .current_user()
                    .filter(|user| &user.id == user_id)
                    .map(|user| user.email)
                    .unwrap_or_default();

                let fresh = UserDocument::fresh(email);
                let fields = match serde_json::to_value(&fresh) {
                    Ok(fields) => fields,
                    Err(err) => {
                        warn!(user_id = %user_id, error = %err, "Failed to encode fresh document");
                        return;
                    }
                };

                match shared
                    .store
                    .set(USERS_COLLECTION, user_id.as_str(), fields, true)
                    .await
                {
                    Ok(()) => {
                        info!(user_id = %user_id, "Created preference document");
                        shared.adopt_if_current(user_id, fresh);
                    }
                    Err(err) => {
                        warn!(user_id = %user_id, error = %err, "Failed to create preference document");
                    }
                }
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Failed to load preference document");
            }
        }
    }

    /// Reset both sets to empty. Synchronous; no remote call.
    pub fn clear(&self) {
        debug!("Clearing preference state");
        self.shared.clear_state();
    }

    /// Toggle a resource in the saved set.
    ///
    /// No-op when unauthenticated. Otherwise the local set is updated
    /// immediately and the new list is queued as a merge-write of
    /// `savedItems`; a failed write reconciles local state from the store.
    pub fn toggle_saved_resource(&self, resource_id: ResourceId) -> WriteTicket {
        let Some(user_id) = self.shared.session.current_user_id() else {
            debug!(resource_id = %resource_id, "Ignoring saved-resource toggle while signed out");
            return WriteTicket::resolved(WriteOutcome::Skipped);
        };

        let new_list: Vec<ResourceId> = {
            let mut state = self.shared.state.write().unwrap();
            if !state.saved_resources.shift_remove(&resource_id) {
                state.saved_resources.insert(resource_id);
            }
            state.saved_resources.iter().copied().collect()
        };

        self.enqueue_write(user_id, json!({ "savedItems": new_list }))
    }

    /// Toggle an event in the registered set.
    ///
    /// The local set is updated even when unauthenticated; only the remote
    /// write is skipped without a user. Failed writes reconcile from the
    /// store, same policy as saved resources.
    pub fn toggle_registered_event(&self, event_id: EventId) -> WriteTicket {
        let new_list: Vec<EventId> = {
            let mut state = self.shared.state.write().unwrap();
            if !state.registered_events.shift_remove(&event_id) {
                state.registered_events.insert(event_id);
            }
            state.registered_events.iter().copied().collect()
        };

        match self.shared.session.current_user_id() {
            Some(user_id) => self.enqueue_write(user_id, json!({ "userEvents": new_list })),
            None => {
                debug!(event_id = %event_id, "Event toggle kept local; signed out");
                WriteTicket::resolved(WriteOutcome::Skipped)
            }
        }
    }

    /// Saved resources as full records, in catalog order.
    pub fn saved_resources<'a>(&self, catalog: &'a [ResourceRecord]) -> Vec<&'a ResourceRecord> {
        let state = self.shared.state.read().unwrap();
        catalog
            .iter()
            .filter(|resource| state.saved_resources.contains(&resource.id))
            .collect()
    }

    /// Registered events as full records, in catalog order.
    pub fn registered_events<'a>(&self, catalog: &'a [EventRecord]) -> Vec<&'a EventRecord> {
        let state = self.shared.state.read().unwrap();
        catalog
            .iter()
            .filter(|event| state.registered_events.contains(&event.id))
            .collect()
    }

    /// Snapshot of the saved resource ids, in insertion order.
    pub fn saved_resource_ids(&self) -> IndexSet<ResourceId> {
        self.shared.state.read().unwrap().saved_resources.clone()
    }

    /// Snapshot of the registered event ids, in insertion order.
    pub fn registered_event_ids(&self) -> IndexSet<EventId> {
        self.shared.state.read().unwrap().registered_events.clone()
    }

    /// True while a `load` call is in flight.
    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::SeqCst)
    }

    /// Follow auth state changes: load on sign-in, clear on sign-out.
    ///
    /// The stale guard inside `load`/`reconcile` covers the race where a
    /// sign-out (or user switch) lands while a previous user's load is still
    /// in flight.
    pub fn spawn_session_watcher(&self) -> JoinHandle<()> {
        let service = self.clone();
        let mut rx = self.shared.session.subscribe();

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let current = rx.borrow_and_update().clone();
                match current {
                    Some(user) => service.load(&user.id).await,
                    None => service.clear(),
                }
            }
        })
    }

    fn enqueue_write(&self, user_id: UserId, fields: serde_json::Value) -> WriteTicket {
        let (done, rx) = oneshot::channel();
        let command = WriteCommand {
            user_id,
            fields,
            done,
        };

        if self.write_tx.send(command).is_err() {
            warn!("Write worker is gone; preference write dropped");
            return WriteTicket::resolved(WriteOutcome::Skipped);
        }

        WriteTicket { rx }
    }
}

/// Drains queued preference writes one at a time, in issuance order.
async fn run_write_worker(shared: Arc<Shared>, mut rx: mpsc::UnboundedReceiver<WriteCommand>) {
    while let Some(command) = rx.recv().await {
        let outcome = match shared
            .store
            .set(
                USERS_COLLECTION,
                command.user_id.as_str(),
                command.fields,
                true,
            )
            .await
        {
            Ok(()) => WriteOutcome::Persisted,
            Err(err) => {
                warn!(user_id = %command.user_id, error = %err, "Preference write failed; reconciling");
                shared.reconcile(&command.user_id).await;
                WriteOutcome::Reconciled
            }
        };

        // Receiver may have been dropped; the write already happened.
        let _ = command.done.send(outcome);
    }
}
