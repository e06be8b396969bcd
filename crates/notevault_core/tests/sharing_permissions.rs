use notevault_core::{
    Access, InMemoryNoteRepository, ManualClock, NoteServiceError, NoteStore, Permission,
    Principal,
};

type Store = NoteStore<InMemoryNoteRepository, ManualClock>;

fn shared_note(permission: Permission) -> (Store, u64, Principal, Principal) {
    let mut store = NoteStore::in_memory(ManualClock::new(0, 1));
    let owner = Principal::from("alice");
    let grantee = Principal::from("bob");
    let id = store.create(&owner, "Hi", "v1").unwrap();
    store.update(&owner, id, "Hi", "v2").unwrap();
    store
        .share(&owner, id, grantee.clone(), permission)
        .unwrap();
    (store, id, owner, grantee)
}

fn is_denied<T>(result: Result<T, NoteServiceError>) -> bool {
    matches!(result, Err(NoteServiceError::AccessDenied { .. }))
}

#[test]
fn read_grantee_can_only_read() {
    let (mut store, id, _owner, bob) = shared_note(Permission::Read);
    let before = store.get(&bob, id).unwrap().clone();

    assert!(store.get(&bob, id).is_ok());
    assert_eq!(store.get_versions(&bob, id).unwrap().len(), 1);

    assert!(is_denied(store.update(&bob, id, "x", "y")));
    assert!(is_denied(store.toggle_markdown(&bob, id)));
    assert!(is_denied(store.revert(&bob, id, 0)));
    assert!(is_denied(store.share(
        &bob,
        id,
        Principal::from("carol"),
        Permission::Read
    )));
    assert!(is_denied(store.revoke(&bob, id, &bob)));
    assert!(is_denied(store.delete(&bob, id)));

    let owner = Principal::from("alice");
    assert_eq!(store.get(&owner, id).unwrap(), &before);
}

#[test]
fn write_grantee_can_edit_but_not_administer() {
    let (mut store, id, _owner, bob) = shared_note(Permission::Write);

    assert!(store.update(&bob, id, "Hi", "v3").is_ok());
    assert!(store.toggle_markdown(&bob, id).is_ok());
    assert!(store.revert(&bob, id, 0).is_ok());

    assert_eq!(
        store.delete(&bob, id).unwrap_err(),
        NoteServiceError::AccessDenied {
            id,
            required: Access::Owner
        }
    );
    assert!(is_denied(store.share(
        &bob,
        id,
        Principal::from("carol"),
        Permission::Write
    )));
    assert!(is_denied(store.revoke(&bob, id, &bob)));
}

#[test]
fn share_overwrites_instead_of_merging() {
    let (mut store, id, owner, bob) = shared_note(Permission::Write);

    let note = store
        .share(&owner, id, bob.clone(), Permission::Read)
        .unwrap();
    assert_eq!(note.shared_with().len(), 1);
    assert_eq!(note.shared_with().get(&bob), Some(Permission::Read));
    assert!(is_denied(store.update(&bob, id, "x", "y")));
}

#[test]
fn share_and_revoke_leave_timestamp_and_history_alone() {
    let (mut store, id, owner, bob) = shared_note(Permission::Read);
    let before = store.get(&owner, id).unwrap().clone();

    let shared = store
        .share(&owner, id, Principal::from("carol"), Permission::Write)
        .unwrap();
    assert_eq!(shared.updated_at(), before.updated_at());
    assert_eq!(shared.versions(), before.versions());

    let revoked = store.revoke(&owner, id, &bob).unwrap();
    assert_eq!(revoked.updated_at(), before.updated_at());
    assert_eq!(revoked.versions(), before.versions());
    assert!(!revoked.shared_with().contains(&bob));
}

#[test]
fn revoke_is_idempotent_for_absent_principal() {
    let (mut store, id, owner, _bob) = shared_note(Permission::Read);
    let stranger = Principal::from("nobody");
    let before = store.get(&owner, id).unwrap().clone();

    let first = store.revoke(&owner, id, &stranger).unwrap().clone();
    let second = store.revoke(&owner, id, &stranger).unwrap().clone();

    assert_eq!(first, before);
    assert_eq!(second, before);
}

#[test]
fn revoked_grantee_loses_visibility() {
    let (mut store, id, owner, bob) = shared_note(Permission::Write);
    store.revoke(&owner, id, &bob).unwrap();

    assert!(is_denied(store.get(&bob, id)));
    assert!(store.list_visible(&bob).is_empty());
}

#[test]
fn sharing_with_owner_never_creates_self_entry() {
    let (mut store, id, owner, _bob) = shared_note(Permission::Read);

    let err = store
        .share(&owner, id, owner.clone(), Permission::Write)
        .unwrap_err();
    assert_eq!(err, NoteServiceError::InvalidShareTarget(id));
    assert!(!store.get(&owner, id).unwrap().shared_with().contains(&owner));
}

#[test]
fn identity_matching_is_exact() {
    let (store, id, _owner, _bob) = shared_note(Permission::Read);
    assert!(is_denied(store.get(&Principal::from("Bob"), id)));
    assert!(is_denied(store.get(&Principal::from("bob "), id)));
}
