use notevault_core::{ManualClock, NoteServiceError, NoteStore, Principal};
use std::collections::HashSet;

fn store() -> NoteStore<notevault_core::InMemoryNoteRepository, ManualClock> {
    NoteStore::in_memory(ManualClock::new(1_000, 10))
}

#[test]
fn create_sets_owner_timestamps_and_empty_collections() {
    let mut store = store();
    let alice = Principal::from("alice");

    let id = store.create(&alice, "Hi", "v1").unwrap();
    let note = store.get(&alice, id).unwrap();

    assert_eq!(id, 1);
    assert_eq!(note.id(), id);
    assert_eq!(note.owner(), &alice);
    assert_eq!(note.title(), "Hi");
    assert_eq!(note.content(), "v1");
    assert!(!note.is_markdown());
    assert_eq!(note.created_at(), 1_000);
    assert_eq!(note.updated_at(), 1_000);
    assert!(note.shared_with().is_empty());
    assert!(note.versions().is_empty());
}

#[test]
fn ids_are_strictly_increasing_and_never_reused_after_delete() {
    let mut store = store();
    let alice = Principal::from("alice");

    let ids: Vec<u64> = (0..5)
        .map(|idx| store.create(&alice, format!("n{idx}"), "body").unwrap())
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());

    let deleted = ids[2];
    store.delete(&alice, deleted).unwrap();
    let next = store.create(&alice, "after delete", "body").unwrap();

    assert!(next > *ids.last().unwrap());
    assert_ne!(next, deleted);
}

#[test]
fn get_rejects_strangers_and_missing_ids() {
    let mut store = store();
    let alice = Principal::from("alice");
    let eve = Principal::from("eve");
    let id = store.create(&alice, "private", "secret").unwrap();

    assert!(matches!(
        store.get(&eve, id),
        Err(NoteServiceError::AccessDenied { .. })
    ));
    assert_eq!(
        store.get(&eve, 999).unwrap_err(),
        NoteServiceError::NoteNotFound(999)
    );
}

#[test]
fn list_visible_returns_owned_and_shared_notes_only() {
    let mut store = store();
    let alice = Principal::from("alice");
    let bob = Principal::from("bob");

    let own = store.create(&alice, "mine", "a").unwrap();
    let shared = store.create(&bob, "shared", "b").unwrap();
    let _hidden = store.create(&bob, "hidden", "c").unwrap();
    store
        .share(&bob, shared, alice.clone(), notevault_core::Permission::Read)
        .unwrap();

    let mut visible: Vec<u64> = store
        .list_visible(&alice)
        .into_iter()
        .map(|note| note.id())
        .collect();
    visible.sort_unstable();

    assert_eq!(visible, vec![own, shared]);
    assert!(store.list_visible(&Principal::from("eve")).is_empty());
}

#[test]
fn toggle_markdown_refreshes_timestamp_without_versioning() {
    let mut store = store();
    let alice = Principal::from("alice");
    let id = store.create(&alice, "t", "c").unwrap();

    let note = store.toggle_markdown(&alice, id).unwrap();
    assert!(note.is_markdown());
    assert_eq!(note.updated_at(), 1_010);
    assert!(note.versions().is_empty());

    let note = store.toggle_markdown(&alice, id).unwrap();
    assert!(!note.is_markdown());
    assert_eq!(note.updated_at(), 1_020);
}

#[test]
fn delete_returns_pre_delete_snapshot_and_removes_note() {
    let mut store = store();
    let alice = Principal::from("alice");
    let id = store.create(&alice, "t", "v1").unwrap();
    store.update(&alice, id, "t", "v2").unwrap();
    let before = store.get(&alice, id).unwrap().clone();

    let removed = store.delete(&alice, id).unwrap();

    assert_eq!(removed, before);
    assert_eq!(store.note_count(), 0);
    assert_eq!(
        store.get(&alice, id).unwrap_err(),
        NoteServiceError::NoteNotFound(id)
    );
    assert_eq!(
        store.delete(&alice, id).unwrap_err(),
        NoteServiceError::NoteNotFound(id)
    );
}

#[test]
fn update_missing_note_reports_not_found() {
    let mut store = store();
    let err = store
        .update(&Principal::from("alice"), 42, "t", "c")
        .unwrap_err();
    assert_eq!(err, NoteServiceError::NoteNotFound(42));
}

#[test]
fn closure_clock_can_drive_the_store() {
    let mut store = NoteStore::in_memory(|| 77_u64);
    let alice = Principal::from("alice");
    let id = store.create(&alice, "t", "c").unwrap();
    assert_eq!(store.get(&alice, id).unwrap().created_at(), 77);
}
