use quicknote_core::{
    AutoConfirm, BlobStorage, ControllerError, FormState, MemoryStorage, NoteAction, NoteEvent,
    NoteId, NoteInput, NoteListController, NoteStore, StoreError, NOTES_QUERY_KEY,
};

fn controller() -> NoteListController<MemoryStorage> {
    NoteListController::new(NoteStore::new(MemoryStorage::new()))
}

fn create(controller: &mut NoteListController<MemoryStorage>, title: &str) -> quicknote_core::Note {
    controller.new_note();
    controller.save(NoteInput::new(title, "")).unwrap()
}

#[test]
fn view_starts_loading_and_empty_then_loads() {
    let mut controller = controller();
    assert!(controller.cache().is_loading(NOTES_QUERY_KEY));

    let view = controller.view();
    assert!(view.notes.is_empty());
    assert!(!view.is_loading);
    assert_eq!(view.form, FormState::Closed);
}

#[test]
fn create_flow_closes_form_emits_created_and_refreshes_view() {
    let mut controller = controller();
    assert!(controller.view().notes.is_empty());

    controller.new_note();
    assert!(matches!(controller.form(), FormState::OpenForCreate { .. }));
    let note = controller.save(NoteInput::new("First", "body")).unwrap();

    assert_eq!(controller.form(), &FormState::Closed);
    assert_eq!(controller.drain_events(), vec![NoteEvent::Created(note.clone())]);
    assert_eq!(controller.view().notes, vec![note]);
}

#[test]
fn save_without_open_form_is_rejected() {
    let mut controller = controller();
    let err = controller.save(NoteInput::new("x", "")).unwrap_err();
    assert!(matches!(err, ControllerError::FormClosed));
    assert!(controller.drain_events().is_empty());
}

#[test]
fn failed_save_keeps_form_open_with_draft() {
    let mut controller = controller();
    controller.new_note();

    let rejected = NoteInput::new("  ", "typed body");
    let err = controller.save(rejected.clone()).unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Store(StoreError::Validation(_))
    ));
    assert_eq!(controller.form().draft(), Some(&rejected));
    assert!(matches!(
        controller.drain_events().as_slice(),
        [NoteEvent::Failed {
            action: NoteAction::Create,
            ..
        }]
    ));
    assert!(controller.view().notes.is_empty());
}

#[test]
fn edit_flow_prefills_draft_and_updates_note() {
    let mut controller = controller();
    let note = create(&mut controller, "Draft");
    controller.drain_events();

    controller.edit(note.clone());
    assert_eq!(controller.form().editing(), Some(&note));
    assert_eq!(controller.form().draft().map(|d| d.title.as_str()), Some("Draft"));

    let updated = controller
        .save(NoteInput::new("Final", "done"))
        .unwrap();
    assert_eq!(updated.id, note.id);
    assert_eq!(updated.title, "Final");
    assert_eq!(controller.form(), &FormState::Closed);
    assert_eq!(controller.drain_events(), vec![NoteEvent::Updated(updated.clone())]);
    assert_eq!(controller.view().notes, vec![updated]);
}

#[test]
fn editing_a_note_deleted_elsewhere_fails_and_keeps_form() {
    let storage = MemoryStorage::new();
    let mut controller = NoteListController::new(NoteStore::new(storage.clone()));
    let note = create(&mut controller, "Gone soon");
    controller.edit(note.clone());

    let mut other = NoteStore::new(storage);
    other.delete(&note.id).unwrap();

    let err = controller.save(NoteInput::new("Edited", "")).unwrap_err();
    assert!(matches!(err, ControllerError::Store(StoreError::NotFound(_))));
    assert_eq!(controller.form().editing(), Some(&note));
    assert_eq!(
        controller.form().draft().map(|d| d.title.as_str()),
        Some("Edited")
    );
}

#[test]
fn cancel_closes_any_open_form() {
    let mut controller = controller();
    controller.new_note();
    controller.cancel();
    assert_eq!(controller.form(), &FormState::Closed);

    let note = create(&mut controller, "n");
    controller.edit(note);
    controller.cancel();
    assert!(!controller.form().is_open());
}

#[test]
fn edit_replaces_an_open_edit_form() {
    let mut controller = controller();
    let first = create(&mut controller, "first");
    let second = create(&mut controller, "second");

    controller.edit(first);
    controller.edit(second.clone());
    assert_eq!(controller.form().editing(), Some(&second));
}

#[test]
fn declined_delete_is_a_no_op() {
    let storage = MemoryStorage::new();
    let mut controller = NoteListController::new(NoteStore::new(storage.clone()));
    let note = create(&mut controller, "keep me");
    controller.drain_events();
    let before = storage.read("user_notes").unwrap();

    let mut prompts = Vec::new();
    let mut gate = |prompt: &str| {
        prompts.push(prompt.to_string());
        false
    };
    assert_eq!(controller.delete(&note.id, &mut gate).unwrap(), None);

    assert_eq!(prompts.len(), 1);
    assert_eq!(storage.read("user_notes").unwrap(), before);
    assert!(controller.drain_events().is_empty());
    assert_eq!(controller.view().notes.len(), 1);
}

#[test]
fn confirmed_delete_removes_note_and_refreshes() {
    let mut controller = controller();
    let note = create(&mut controller, "bye");
    assert_eq!(controller.view().notes.len(), 1);
    controller.drain_events();

    let removed = controller
        .delete(&note.id, &mut AutoConfirm(true))
        .unwrap();
    assert_eq!(removed, Some(note.clone()));
    assert_eq!(controller.drain_events(), vec![NoteEvent::Deleted(note)]);
    assert!(controller.view().notes.is_empty());
}

#[test]
fn delete_of_missing_note_emits_failed() {
    let mut controller = controller();
    let err = controller
        .delete(&NoteId::new("missing-id"), &mut AutoConfirm(true))
        .unwrap_err();
    assert!(matches!(err, ControllerError::Store(StoreError::NotFound(_))));
    assert_eq!(controller.drain_events()[0].name(), "failed");
}

#[test]
fn mutations_invalidate_the_notes_query() {
    let mut controller = controller();
    controller.view();
    assert!(!controller.cache().is_stale(NOTES_QUERY_KEY));

    let note = create(&mut controller, "n");
    assert!(controller.cache().is_stale(NOTES_QUERY_KEY));

    controller.view();
    controller.toggle_pin(&note.id).unwrap();
    assert!(controller.cache().is_stale(NOTES_QUERY_KEY));
}

#[test]
fn view_is_sorted_pinned_first_then_newest() {
    let mut controller = controller();
    let oldest = create(&mut controller, "oldest");
    let middle = create(&mut controller, "middle");
    let newest = create(&mut controller, "newest");
    controller.toggle_pin(&oldest.id).unwrap();

    let order: Vec<_> = controller
        .view()
        .notes
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(order, vec![oldest.id, newest.id, middle.id]);
}

#[test]
fn toggle_pin_flips_back_and_forth() {
    let mut controller = controller();
    let note = create(&mut controller, "pin me");

    assert!(controller.toggle_pin(&note.id).unwrap().is_pinned);
    assert!(!controller.toggle_pin(&note.id).unwrap().is_pinned);
    assert!(matches!(
        controller.toggle_pin(&NoteId::new("nope")),
        Err(ControllerError::Store(StoreError::NotFound(_)))
    ));
}

#[test]
fn create_two_pin_one_delete_other() {
    let mut controller = controller();
    let a = create(&mut controller, "A");
    let b = create(&mut controller, "B");

    controller.toggle_pin(&b.id).unwrap();
    controller.delete(&a.id, &mut AutoConfirm(true)).unwrap();

    let listed = controller.store().list().unwrap();
    assert_eq!(listed.count, 1);
    assert_eq!(listed.data[0].id, b.id);
    assert!(listed.data[0].is_pinned);

    let names: Vec<_> = controller
        .drain_events()
        .iter()
        .map(|event| event.name())
        .collect();
    assert_eq!(names, vec!["created", "created", "updated", "deleted"]);
}

#[test]
fn corrupt_storage_in_surface_mode_reports_failed_load() {
    use quicknote_core::{CorruptBlobPolicy, StoreConfig};

    let storage = MemoryStorage::new().with_slot("user_notes", "][");
    let config = StoreConfig::default().with_corrupt_policy(CorruptBlobPolicy::Surface);
    let mut controller = NoteListController::new(NoteStore::with_config(storage, config));

    let view = controller.view();
    assert!(view.notes.is_empty());
    assert!(view.is_loading);
    assert!(matches!(
        controller.drain_events().as_slice(),
        [NoteEvent::Failed {
            action: NoteAction::Load,
            ..
        }]
    ));
}

#[test]
fn clear_all_requires_confirmation_and_empties_the_view() {
    let mut controller = controller();
    create(&mut controller, "a");
    create(&mut controller, "b");
    assert_eq!(controller.view().notes.len(), 2);

    assert!(!controller.clear_all(&mut AutoConfirm(false)).unwrap());
    assert_eq!(controller.view().notes.len(), 2);

    assert!(controller.clear_all(&mut AutoConfirm(true)).unwrap());
    assert!(controller.view().notes.is_empty());
    assert_eq!(controller.store().list().unwrap().count, 0);
}
