//! Integration tests for the preference service.
//!
//! Covers the optimistic-update-then-reconcile contract against the mock
//! document store: toggles, sign-in/sign-out lifecycle, failed-write
//! reconciliation, and the stale-load guard.

mod common;

use common::{event_id, resource_id, sample_resources, wait_until, TestHarness};

use app_core::common::UserId;
use app_core::domains::auth::SessionUser;
use app_core::domains::preferences::WriteOutcome;
use indexmap::IndexSet;
use serde_json::json;

// =============================================================================
// Toggle semantics
// =============================================================================

/// Toggling the same resource twice returns the set to its original value.
#[tokio::test]
async fn toggle_is_idempotent_over_two_applications() {
    let ctx = TestHarness::new();
    ctx.sign_in_and_load("u1").await;

    let before = ctx.service.saved_resource_ids();

    ctx.service.toggle_saved_resource(resource_id(7)).outcome().await;
    ctx.service.toggle_saved_resource(resource_id(7)).outcome().await;

    assert_eq!(ctx.service.saved_resource_ids(), before);
}

/// No sequence of toggles can produce a duplicate id.
#[tokio::test]
async fn toggles_never_produce_duplicates() {
    let ctx = TestHarness::new();
    ctx.sign_in_and_load("u1").await;

    for raw in [3, 5, 3, 3, 5, 9, 3] {
        ctx.service.toggle_saved_resource(resource_id(raw)).outcome().await;
        let snapshot = ctx.service.saved_resource_ids();
        assert_eq!(snapshot.len(), snapshot.iter().collect::<IndexSet<_>>().len());
    }

    // 3 toggled four times and 5 twice (both end absent); 9 toggled once.
    let expected: IndexSet<_> = [resource_id(9)].into_iter().collect();
    assert_eq!(ctx.service.saved_resource_ids(), expected);
}

/// Appends preserve insertion order on the transport list.
#[tokio::test]
async fn appends_preserve_insertion_order() {
    let ctx = TestHarness::new();
    ctx.sign_in_and_load("u1").await;

    ctx.service.toggle_saved_resource(resource_id(9)).outcome().await;
    ctx.service.toggle_saved_resource(resource_id(2)).outcome().await;
    ctx.service.toggle_saved_resource(resource_id(5)).outcome().await;

    let last_write = ctx.store.set_calls().pop().unwrap();
    assert_eq!(last_write.fields, json!({ "savedItems": [9, 2, 5] }));
}

/// Unauthenticated saved-resource toggles change nothing and write nothing.
#[tokio::test]
async fn unauthenticated_saved_toggle_is_a_noop() {
    let ctx = TestHarness::new();

    let outcome = ctx.service.toggle_saved_resource(resource_id(3)).outcome().await;

    assert_eq!(outcome, WriteOutcome::Skipped);
    assert!(ctx.service.saved_resource_ids().is_empty());
    assert!(ctx.store.set_calls().is_empty());
}

/// Event toggles record locally while signed out; only the write is skipped.
#[tokio::test]
async fn unauthenticated_event_toggle_is_local_only() {
    let ctx = TestHarness::new();

    let outcome = ctx.service.toggle_registered_event(event_id(2)).outcome().await;

    assert_eq!(outcome, WriteOutcome::Skipped);
    assert!(ctx.service.registered_event_ids().contains(&event_id(2)));
    assert!(ctx.store.set_calls().is_empty());
}

/// Saved-resource toggles issue a merge-write of savedItems for the user.
#[tokio::test]
async fn toggle_issues_merge_write_to_users_collection() {
    let ctx = TestHarness::new();
    ctx.sign_in_and_load("u1").await;

    let outcome = ctx.service.toggle_saved_resource(resource_id(3)).outcome().await;
    assert_eq!(outcome, WriteOutcome::Persisted);

    let write = ctx.store.set_calls().pop().unwrap();
    assert_eq!(write.collection, "users");
    assert_eq!(write.document_id, "u1");
    assert!(write.merge);
    assert_eq!(write.fields, json!({ "savedItems": [3] }));
}

/// Concurrent toggles serialize through the write queue in issuance order.
#[tokio::test]
async fn writes_are_serialized_in_issuance_order() {
    let ctx = TestHarness::new();
    ctx.sign_in_and_load("u1").await;
    let created = ctx.store.set_calls().len();

    // Issue toggles without awaiting any ticket.
    let t1 = ctx.service.toggle_saved_resource(resource_id(1));
    let t2 = ctx.service.toggle_saved_resource(resource_id(2));
    let t3 = ctx.service.toggle_registered_event(event_id(4));

    assert_eq!(t1.outcome().await, WriteOutcome::Persisted);
    assert_eq!(t2.outcome().await, WriteOutcome::Persisted);
    assert_eq!(t3.outcome().await, WriteOutcome::Persisted);

    let writes = ctx.store.set_calls().split_off(created);
    assert_eq!(writes[0].fields, json!({ "savedItems": [1] }));
    assert_eq!(writes[1].fields, json!({ "savedItems": [1, 2] }));
    assert_eq!(writes[2].fields, json!({ "userEvents": [4] }));
}

// =============================================================================
// Reconciliation
// =============================================================================

/// A failed write reloads the authoritative state from the store.
#[tokio::test]
async fn failed_write_reconciles_from_store() {
    let ctx = TestHarness::with_user_document("u1", json!({ "savedItems": [3] }));
    ctx.sign_in_and_load("u1").await;

    let before: IndexSet<_> = [resource_id(3)].into_iter().collect();
    assert_eq!(ctx.service.saved_resource_ids(), before);

    ctx.store.fail_next_sets(1);
    let ticket = ctx.service.toggle_saved_resource(resource_id(5));

    // Optimistic update is visible before the write resolves.
    assert!(ctx.service.saved_resource_ids().contains(&resource_id(5)));

    assert_eq!(ticket.outcome().await, WriteOutcome::Reconciled);
    assert_eq!(ctx.service.saved_resource_ids(), before);
}

/// Failed event-registration writes reconcile under the same policy.
#[tokio::test]
async fn failed_event_write_reconciles_from_store() {
    let ctx = TestHarness::with_user_document("u1", json!({ "userEvents": [1] }));
    ctx.sign_in_and_load("u1").await;

    ctx.store.fail_next_sets(1);
    let outcome = ctx.service.toggle_registered_event(event_id(8)).outcome().await;

    assert_eq!(outcome, WriteOutcome::Reconciled);
    let expected: IndexSet<_> = [event_id(1)].into_iter().collect();
    assert_eq!(ctx.service.registered_event_ids(), expected);
}

// =============================================================================
// Load / lifecycle
// =============================================================================

/// Loading an existing document adopts its lists, defaulting absent fields.
#[tokio::test]
async fn load_adopts_existing_document() {
    let ctx = TestHarness::with_user_document("u1", json!({ "savedItems": [3, 5] }));
    ctx.sign_in_and_load("u1").await;

    let expected: IndexSet<_> = [resource_id(3), resource_id(5)].into_iter().collect();
    assert_eq!(ctx.service.saved_resource_ids(), expected);
    assert!(ctx.service.registered_event_ids().is_empty());
    assert!(!ctx.service.is_loading());
}

/// First load of a new user creates the document with empty lists and email.
#[tokio::test]
async fn load_creates_missing_document() {
    let ctx = TestHarness::new();
    ctx.sign_in_and_load("newcomer").await;

    let created = ctx.store.document("users", "newcomer").unwrap();
    assert_eq!(created["email"], "newcomer@example.org");
    assert_eq!(created["savedItems"], json!([]));
    assert_eq!(created["userEvents"], json!([]));
    assert!(created.get("createdAt").is_some());

    let write = &ctx.store.set_calls()[0];
    assert!(write.merge);

    assert!(ctx.service.saved_resource_ids().is_empty());
}

/// A failing store leaves local state untouched and clears the loading flag.
#[tokio::test]
async fn load_failure_is_swallowed() {
    let ctx = TestHarness::with_user_document("u1", json!({ "savedItems": [3] }));
    ctx.sign_in_and_load("u1").await;

    ctx.store.fail_gets(true);
    ctx.service.load(&UserId::new("u1")).await;

    // Prior state retained, no panic, flag released.
    let expected: IndexSet<_> = [resource_id(3)].into_iter().collect();
    assert_eq!(ctx.service.saved_resource_ids(), expected);
    assert!(!ctx.service.is_loading());
}

/// A load that completes after sign-out must not repopulate state.
#[tokio::test]
async fn stale_load_after_sign_out_is_discarded() {
    let ctx = TestHarness::with_user_document("u1", json!({ "savedItems": [3] }));
    ctx.session.sign_in(SessionUser::new("u1", "u1@example.org"));
    ctx.session.sign_out();

    // The fetch succeeds, but the session no longer matches the issuing user.
    ctx.service.load(&UserId::new("u1")).await;

    assert!(ctx.service.saved_resource_ids().is_empty());
}

/// A load issued for one user must not land after a switch to another.
#[tokio::test]
async fn stale_load_after_user_switch_is_discarded() {
    let store = app_core::kernel::MockDocumentStore::new()
        .with_document("users", "u1", json!({ "savedItems": [3] }))
        .with_document("users", "u2", json!({ "savedItems": [9] }));
    let ctx = TestHarness::with_store(store);

    ctx.sign_in_and_load("u2").await;

    // A stray completion for u1 arrives while u2 is signed in.
    ctx.service.load(&UserId::new("u1")).await;

    let expected: IndexSet<_> = [resource_id(9)].into_iter().collect();
    assert_eq!(ctx.service.saved_resource_ids(), expected);
}

/// clear() empties both sets without any remote call.
#[tokio::test]
async fn clear_empties_both_sets_without_remote_calls() {
    let ctx = TestHarness::with_user_document(
        "u1",
        json!({ "savedItems": [3, 5], "userEvents": [2] }),
    );
    ctx.sign_in_and_load("u1").await;

    let gets_before = ctx.store.get_calls().len();
    let sets_before = ctx.store.set_calls().len();

    ctx.service.clear();

    assert!(ctx.service.saved_resource_ids().is_empty());
    assert!(ctx.service.registered_event_ids().is_empty());
    assert_eq!(ctx.store.get_calls().len(), gets_before);
    assert_eq!(ctx.store.set_calls().len(), sets_before);
}

/// The session watcher loads on sign-in and clears on sign-out.
#[tokio::test]
async fn session_watcher_follows_auth_state() {
    let ctx = TestHarness::with_user_document("u1", json!({ "savedItems": [3] }));
    let _watcher = ctx.service.spawn_session_watcher();

    ctx.session.sign_in(SessionUser::new("u1", "u1@example.org"));
    let service = ctx.service.clone();
    wait_until(move || service.saved_resource_ids().contains(&resource_id(3))).await;

    ctx.session.sign_out();
    let service = ctx.service.clone();
    wait_until(move || service.saved_resource_ids().is_empty()).await;
}

// =============================================================================
// Derived views
// =============================================================================

/// saved_resources returns full records in catalog order.
#[tokio::test]
async fn saved_resources_derive_records_in_catalog_order() {
    let ctx = TestHarness::new();
    ctx.sign_in_and_load("u1").await;

    let catalog = sample_resources();

    // Save out of catalog order.
    ctx.service.toggle_saved_resource(resource_id(4)).outcome().await;
    ctx.service.toggle_saved_resource(resource_id(1)).outcome().await;

    let saved = ctx.service.saved_resources(&catalog);
    let titles: Vec<&str> = saved.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Downtown Clinic", "Rent Assistance Office"]);
}

/// The derived view is empty when nothing is saved.
#[tokio::test]
async fn saved_resources_empty_when_nothing_saved() {
    let ctx = TestHarness::new();
    let catalog = sample_resources();
    assert!(ctx.service.saved_resources(&catalog).is_empty());
}
