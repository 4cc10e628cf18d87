//! Bindings driving a recording store under virtual time.

use std::sync::Arc;
use std::time::Duration;

use contacts_fields::{FieldTypeRegistry, Record, RecordId};
use contacts_forms::{FieldBinding, FormContext, FormError, NewField, RecordHandle, SaveEvent};
use contacts_test_utils::{RecordingStore, StoreCall};
use tokio::time;

const DELAY: Duration = Duration::from_millis(1000);

fn ann() -> Record {
    Record::new()
        .with_id(1)
        .with_field("firstName", "Ann", "text")
        .with_field("email", "ann@example.com", "email")
        .with_field("website", "", "url")
}

async fn setup() -> (Arc<RecordingStore>, FormContext, RecordHandle) {
    let store = Arc::new(RecordingStore::seeded(vec![ann()]));
    let ctx =
        FormContext::new(store.clone(), FieldTypeRegistry::builtin()).with_autosave_delay(DELAY);
    let record = RecordHandle::new(store.stored(RecordId(1)).await.unwrap());
    (store, ctx, record)
}

async fn wait_for_updates(store: &RecordingStore, count: usize) {
    while store.update_count() < count {
        tokio::task::yield_now().await;
    }
}

#[test_log::test(tokio::test(start_paused = true))]
async fn live_edit_autosaves_once_after_delay() {
    let (store, ctx, record) = setup().await;
    let mut events = record.save_events();
    let mut binding = FieldBinding::new(&ctx, record, "firstName");

    binding.edit("Anna").await.unwrap();
    assert_eq!(store.update_count(), 0);
    assert!(binding.has_pending_save());

    time::advance(DELAY).await;
    assert!(matches!(events.recv().await.unwrap(), SaveEvent::Saved { .. }));

    let updates = store.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].value_of("firstName"), Some("Anna"));

    time::sleep(DELAY * 3).await;
    assert_eq!(store.update_count(), 1);
    let stored = store.stored(RecordId(1)).await.unwrap();
    assert_eq!(stored.value_of("firstName"), Some("Anna"));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn rapid_edits_send_the_last_value() {
    let (store, ctx, record) = setup().await;
    let mut events = record.save_events();
    let mut binding = FieldBinding::new(&ctx, record, "firstName");

    for value in ["A", "An", "Ann", "Anna"] {
        binding.edit(value).await.unwrap();
        time::sleep(Duration::from_millis(200)).await;
    }
    assert_eq!(store.update_count(), 0);

    events.recv().await.unwrap();
    time::sleep(DELAY * 2).await;

    let updates = store.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].value_of("firstName"), Some("Anna"));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn teardown_discards_pending_autosave() {
    let (store, ctx, record) = setup().await;
    let mut binding = FieldBinding::new(&ctx, record.clone(), "firstName");

    binding.edit("Anna").await.unwrap();
    time::sleep(Duration::from_millis(300)).await;
    binding.teardown();
    time::sleep(DELAY * 2).await;

    assert_eq!(store.update_count(), 0);
    assert_eq!(record.snapshot().await.value_of("firstName"), Some("Anna"));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn dropping_binding_discards_pending_autosave() {
    let (store, ctx, record) = setup().await;
    let mut binding = FieldBinding::new(&ctx, record, "email");

    binding.edit("anna@example.com").await.unwrap();
    drop(binding);
    time::sleep(DELAY * 2).await;

    assert!(store.calls().is_empty());
}

#[test_log::test(tokio::test(start_paused = true))]
async fn edits_that_are_not_live_stay_local() {
    let (store, ctx, record) = setup().await;
    let mut binding = FieldBinding::new(&ctx, record.clone(), "firstName").with_live(false);

    binding.edit("Anna").await.unwrap();
    binding.flush().await.unwrap();
    time::sleep(DELAY * 2).await;

    assert!(store.calls().is_empty());
    assert_eq!(record.snapshot().await.value_of("firstName"), Some("Anna"));
    assert!(binding.render().await.unwrap().dirty);
}

#[test_log::test(tokio::test)]
async fn edit_of_missing_field_is_not_found() {
    let (store, ctx, record) = setup().await;
    let mut binding = FieldBinding::new(&ctx, record, "nickname");

    let err = binding.edit("Annie").await.unwrap_err();

    assert_eq!(err, FormError::field_not_found("nickname"));
    assert!(!binding.has_pending_save());
    assert!(store.calls().is_empty());
}

#[test_log::test(tokio::test(start_paused = true))]
async fn flush_persists_without_waiting() {
    let (store, ctx, record) = setup().await;
    let mut binding = FieldBinding::new(&ctx, record, "firstName");

    binding.edit("Anna").await.unwrap();
    binding.flush().await.unwrap();
    assert_eq!(store.update_count(), 1);

    time::sleep(DELAY * 2).await;
    assert_eq!(store.update_count(), 1);
}

#[test_log::test(tokio::test)]
async fn remove_persists_immediately() {
    let (store, ctx, record) = setup().await;
    let mut binding = FieldBinding::new(&ctx, record.clone(), "email");

    binding.remove().await.unwrap();

    let updates = store.updates();
    assert_eq!(updates.len(), 1);
    assert!(!updates[0].contains("email"));
    assert!(!record.snapshot().await.contains("email"));
    assert!(!store.stored(RecordId(1)).await.unwrap().contains("email"));
}

#[test_log::test(tokio::test)]
async fn failed_removal_restores_field_in_place() {
    let (store, ctx, record) = setup().await;
    store.fail_next_updates(1);
    let mut binding = FieldBinding::new(&ctx, record.clone(), "email");

    let err = binding.remove().await.unwrap_err();

    assert!(err.is_persistence());
    let local = record.snapshot().await;
    assert_eq!(
        local.field_names().collect::<Vec<_>>(),
        vec!["firstName", "email", "website"]
    );
    assert_eq!(local.value_of("email"), Some("ann@example.com"));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn failed_autosave_is_published() {
    let (store, ctx, record) = setup().await;
    store.fail_next_updates(1);
    let mut events = record.save_events();
    let mut binding = FieldBinding::new(&ctx, record.clone(), "firstName");

    binding.edit("Anna").await.unwrap();
    time::advance(DELAY).await;

    match events.recv().await.unwrap() {
        SaveEvent::Failed { error, .. } => assert!(error.is_persistence()),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(record.snapshot().await.value_of("firstName"), Some("Anna"));
    let stored = store.stored(RecordId(1)).await.unwrap();
    assert_eq!(stored.value_of("firstName"), Some("Ann"));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn stale_response_does_not_clobber_newer_edit() {
    let (store, ctx, record) = setup().await;
    store.delay_next_update(Duration::from_secs(5));
    let mut events = record.save_events();
    let mut binding = FieldBinding::new(&ctx, record.clone(), "firstName");

    binding.edit("A1").await.unwrap();
    time::advance(DELAY).await;
    wait_for_updates(&store, 1).await;

    // First update is stalled in the store; edit again.
    binding.edit("A2").await.unwrap();

    let first = events.recv().await.unwrap();
    let second = events.recv().await.unwrap();
    assert!(matches!(first, SaveEvent::Superseded { .. }), "{first:?}");
    assert!(matches!(second, SaveEvent::Saved { .. }), "{second:?}");

    let sent: Vec<_> = store
        .updates()
        .iter()
        .map(|r| r.value_of("firstName").unwrap_or_default().to_string())
        .collect();
    assert_eq!(sent, vec!["A1", "A2"]);
    assert_eq!(record.snapshot().await.value_of("firstName"), Some("A2"));
    let stored = store.stored(RecordId(1)).await.unwrap();
    assert_eq!(stored.value_of("firstName"), Some("A2"));
}

#[test_log::test(tokio::test)]
async fn bindings_share_one_record() {
    let (_store, ctx, record) = setup().await;
    let mut first = FieldBinding::new(&ctx, record.clone(), "firstName").with_live(false);
    let second = FieldBinding::new(&ctx, record.clone(), "firstName");
    let mut snapshots = record.subscribe();

    first.edit("Anna").await.unwrap();

    assert_eq!(second.render().await.unwrap().value, "Anna");
    snapshots.changed().await.unwrap();
    assert_eq!(snapshots.borrow().value_of("firstName"), Some("Anna"));
}

#[test_log::test(tokio::test)]
async fn live_new_field_is_persisted() {
    let (store, ctx, record) = setup().await;
    let mut creator = NewField::new(&ctx, record.clone());
    creator.show("tel").unwrap();
    creator.set_name("Home Phone");
    creator.set_value("+1 555 0100");

    let key = creator.add(false).await.unwrap();

    assert_eq!(key, "homePhone");
    let calls = store.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        StoreCall::Update(sent) => assert_eq!(sent.value_of("homePhone"), Some("+1 555 0100")),
        other => panic!("expected update, got {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn rejected_new_field_is_reverted() {
    let (store, ctx, record) = setup().await;
    store.fail_next_updates(1);
    let mut creator = NewField::new(&ctx, record.clone());
    creator.show("text").unwrap();
    creator.set_name("Nickname");
    creator.set_value("Annie");

    let err = creator.add(false).await.unwrap_err();

    assert!(err.is_persistence());
    assert!(!record.snapshot().await.contains("nickname"));
    assert_eq!(creator.draft().value, "Annie");
}
