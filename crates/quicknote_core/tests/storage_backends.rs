use quicknote_core::db::migrations::latest_version;
use quicknote_core::db::{open_db, open_db_in_memory, DbError};
use quicknote_core::{
    BlobStorage, FileStorage, NoteInput, NotePatch, NoteStore, SqliteStorage, StorageError,
    StoreError,
};
use rusqlite::Connection;
use std::collections::HashSet;
use std::thread;

#[test]
fn file_storage_reads_missing_slot_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("not-yet-created"));

    assert_eq!(storage.read("user_notes").unwrap(), None);
}

#[test]
fn file_storage_writes_one_file_per_slot_and_removes_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path().join("slots"));

    storage.write("user_notes", r#"{"data":[],"count":0}"#).unwrap();
    let path = storage.slot_path("user_notes").unwrap();
    assert!(path.ends_with("user_notes.json"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"data":[],"count":0}"#
    );

    storage.remove("user_notes").unwrap();
    assert!(!path.exists());
    storage.remove("user_notes").unwrap();
}

#[test]
fn file_storage_rejects_path_like_slots() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());

    let err = storage.write("../escape", "x").unwrap_err();
    assert!(matches!(err, StorageError::InvalidSlot(_)));
}

#[test]
fn notes_survive_reopening_a_file_store() {
    let dir = tempfile::tempdir().unwrap();

    let created = {
        let mut store = NoteStore::new(FileStorage::new(dir.path()));
        store.create(NoteInput::new("persisted", "body")).unwrap()
    };

    let store = NoteStore::new(FileStorage::new(dir.path()));
    let listed = store.list().unwrap();
    assert_eq!(listed.count, 1);
    assert_eq!(listed.data[0], created);
}

#[test]
fn file_compare_and_swap_rejects_stale_expectation() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = FileStorage::new(dir.path());
    let mut second = FileStorage::new(dir.path());

    first.write("user_notes", "v1").unwrap();
    let observed = first.read("user_notes").unwrap();
    second.write("user_notes", "v2").unwrap();

    assert!(!first
        .compare_and_swap("user_notes", observed.as_deref(), "v3")
        .unwrap());
    assert_eq!(first.read("user_notes").unwrap().as_deref(), Some("v2"));
    assert!(first
        .compare_and_swap("user_notes", Some("v2"), "v3")
        .unwrap());
}

#[test]
fn concurrent_file_writers_never_lose_an_acknowledged_create() {
    const WRITERS: usize = 4;
    const CREATES_PER_WRITER: usize = 25;

    let dir = tempfile::tempdir().unwrap();
    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let path = dir.path().to_path_buf();
            thread::spawn(move || {
                let mut store = NoteStore::new(FileStorage::new(path));
                let mut created = Vec::new();
                for n in 0..CREATES_PER_WRITER {
                    match store.create(NoteInput::new(format!("w{writer}-{n}"), "")) {
                        Ok(note) => created.push(note.id),
                        Err(StoreError::Conflict { .. }) => {}
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
                created
            })
        })
        .collect();

    let acknowledged: Vec<_> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    assert!(!acknowledged.is_empty());

    let persisted = NoteStore::new(FileStorage::new(dir.path())).list().unwrap();
    assert_eq!(persisted.count, acknowledged.len());
    for id in &acknowledged {
        assert!(persisted.find(id).is_some(), "acknowledged note {id} was lost");
    }
    let unique: HashSet<_> = persisted.data.iter().map(|note| &note.id).collect();
    assert_eq!(unique.len(), persisted.count);
}

#[test]
fn sqlite_storage_round_trips_and_upserts() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();

    assert_eq!(storage.read("user_notes").unwrap(), None);
    storage.write("user_notes", "v1").unwrap();
    storage.write("user_notes", "v2").unwrap();
    assert_eq!(storage.read("user_notes").unwrap().as_deref(), Some("v2"));

    storage.remove("user_notes").unwrap();
    assert_eq!(storage.read("user_notes").unwrap(), None);
}

#[test]
fn sqlite_compare_and_swap_detects_writes_from_another_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");
    let mut first = SqliteStorage::open(&path).unwrap();
    let mut second = SqliteStorage::open(&path).unwrap();

    first.write("user_notes", "v1").unwrap();
    let observed = first.read("user_notes").unwrap();
    second.write("user_notes", "v2").unwrap();

    assert!(!first
        .compare_and_swap("user_notes", observed.as_deref(), "v3")
        .unwrap());
    assert_eq!(first.read("user_notes").unwrap().as_deref(), Some("v2"));
    assert!(first
        .compare_and_swap("user_notes", Some("v2"), "v3")
        .unwrap());
}

#[test]
fn note_store_runs_on_sqlite_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");

    let id = {
        let mut store = NoteStore::new(SqliteStorage::open(&path).unwrap());
        let note = store.create(NoteInput::new("sql", "")).unwrap();
        store
            .update(&note.id, &NotePatch::default().pinned(true))
            .unwrap();
        note.id
    };

    let store = NoteStore::new(SqliteStorage::open(&path).unwrap());
    let note = store.get(&id).unwrap();
    assert!(note.is_pinned);
    assert_eq!(store.list().unwrap().count, 1);
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_slots");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slots.db");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_slots");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        SqliteStorage::open(&path),
        Err(StorageError::Db(DbError::UnsupportedSchemaVersion { .. }))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
