//! Test fixtures: a preference-service harness over the mock document store,
//! plus small deterministic catalogs for filter tests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use app_core::common::{EventId, ResourceId};
use app_core::domains::auth::{AuthSession, SessionUser};
use app_core::domains::catalog::{EventRecord, ResourceRecord};
use app_core::domains::preferences::PreferenceService;
use app_core::kernel::MockDocumentStore;

/// Preference service wired to an in-memory store and a fresh session.
pub struct TestHarness {
    pub store: MockDocumentStore,
    pub session: AuthSession,
    pub service: PreferenceService,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_store(MockDocumentStore::new())
    }

    pub fn with_store(store: MockDocumentStore) -> Self {
        // Respect RUST_LOG when debugging tests; ignore double-init.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let session = AuthSession::new();
        let service = PreferenceService::new(Arc::new(store.clone()), session.clone());

        Self {
            store,
            session,
            service,
        }
    }

    /// Seed a user document before constructing the harness.
    pub fn with_user_document(user_id: &str, fields: Value) -> Self {
        Self::with_store(MockDocumentStore::new().with_document("users", user_id, fields))
    }

    /// Sign in and load the user's document.
    pub async fn sign_in_and_load(&self, user_id: &str) {
        self.session
            .sign_in(SessionUser::new(user_id, format!("{}@example.org", user_id)));
        self.service
            .load(&app_core::common::UserId::new(user_id))
            .await;
    }
}

/// Poll a condition until it holds or the timeout elapses.
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within timeout"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub fn resource_id(raw: i64) -> ResourceId {
    ResourceId::from_raw(raw)
}

pub fn event_id(raw: i64) -> EventId {
    EventId::from_raw(raw)
}

/// A small resource catalog with known categories and descriptions.
pub fn sample_resources() -> Vec<ResourceRecord> {
    let make = |id: i64, category: &str, title: &str, description: &str| ResourceRecord {
        id: resource_id(id),
        category: category.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        address: None,
        phone: None,
        website: None,
    };

    vec![
        make(1, "Health", "Downtown Clinic", "Walk-in medical clinic with free screenings."),
        make(2, "Health", "Wellness Counseling", "Sliding-scale therapy and support groups."),
        make(3, "Food", "Community Food Shelf", "Weekly groceries, no documentation required."),
        make(4, "Housing", "Rent Assistance Office", "Emergency rent help and eviction counseling."),
        make(5, "Food", "Hot Meals Program", "Free lunch served weekdays at the clinic annex."),
    ]
}

/// A small event catalog with known categories and dates.
pub fn sample_events() -> Vec<EventRecord> {
    let make = |id: i64, category: &str, name: &str, description: &str, date: &str| EventRecord {
        id: event_id(id),
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        date: date.parse().unwrap(),
        time: "6:00 PM".to_string(),
        location: "Community Center".to_string(),
        attendees: 10,
        website: None,
    };

    vec![
        make(1, "Health", "Flu Shot Clinic", "No-cost vaccinations for all ages.", "2026-10-01"),
        make(2, "Volunteer", "Park Cleanup", "Gloves and bags provided.", "2026-10-08"),
        make(3, "Health", "Health Fair", "Screenings and wellness booths.", "2026-10-15"),
    ]
}
