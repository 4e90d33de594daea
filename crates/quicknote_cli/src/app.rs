//! Wires CLI commands to the notes controller.

use crate::cli::{Backend, Cli, Command, GlobalArgs};
use anyhow::{bail, Context, Result};
use quicknote_core::{
    AutoConfirm, BlobStorage, ConfirmationGate, CorruptBlobPolicy, FileStorage, MemoryStorage,
    Note, NoteId, NoteInput, NoteListController, NoteStore, SqliteStorage, StoreConfig,
};
use std::io::{BufRead, Write};

const SQLITE_FILE_NAME: &str = "quicknote.sqlite3";

type Controller = NoteListController<Box<dyn BlobStorage>>;

/// Runs one command, writing human-readable output to `out`.
///
/// `confirm` answers delete/clear prompts unless `--yes` was given.
pub fn run(cli: Cli, out: &mut impl Write, confirm: &mut impl ConfirmationGate) -> Result<()> {
    let mut controller = open_controller(&cli.global)?;

    match cli.command {
        Command::List { skip, limit } => {
            if skip > 0 || limit.is_some() {
                let page = controller.store().list_page(skip, limit)?;
                let notes = quicknote_core::controller::ordering::sorted_for_display(&page.data);
                print_notes(out, &notes)?;
            } else {
                let view = controller.view();
                print_notes(out, &view.notes)?;
            }
        }
        Command::Show { id } => {
            let note = controller.store().get(&NoteId::new(id))?;
            print_note(out, &note, true)?;
        }
        Command::Create {
            title,
            content,
            pinned,
        } => {
            controller.new_note();
            let input = NoteInput {
                title,
                content,
                is_pinned: pinned,
            };
            let note = controller.save(input)?;
            writeln!(out, "{}", note.id)?;
        }
        Command::Update {
            id,
            title,
            content,
            pinned,
        } => {
            if title.is_none() && content.is_none() && pinned.is_none() {
                bail!("nothing to update; pass --title, --content or --pinned");
            }
            let current = controller.store().get(&NoteId::new(id))?;
            let mut draft = NoteInput::from(&current);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(content) = content {
                draft.content = content;
            }
            if let Some(pinned) = pinned {
                draft.is_pinned = pinned;
            }
            controller.edit(current);
            controller.save(draft)?;
        }
        Command::Pin { id } => {
            let note = controller.toggle_pin(&NoteId::new(id))?;
            writeln!(out, "{} pinned={}", note.id, note.is_pinned)?;
        }
        Command::Delete { id, yes } => {
            let id = NoteId::new(id);
            let deleted = if yes {
                controller.delete(&id, &mut AutoConfirm(true))?
            } else {
                controller.delete(&id, confirm)?
            };
            if deleted.is_none() {
                writeln!(out, "Kept {id}.")?;
            }
        }
        Command::Clear { yes } => {
            let cleared = if yes {
                controller.clear_all(&mut AutoConfirm(true))?
            } else {
                controller.clear_all(confirm)?
            };
            if cleared {
                writeln!(out, "All notes removed.")?;
            }
        }
    }

    for event in controller.drain_events() {
        writeln!(out, "{event}")?;
    }
    Ok(())
}

/// Prompts on stdin, accepting `y`/`yes`.
pub fn stdin_confirm(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn open_controller(global: &GlobalArgs) -> Result<Controller> {
    let config = load_store_config(global)?;
    let store = NoteStore::with_config(build_storage(global)?, config);
    Ok(NoteListController::new(store))
}

/// Config file first, then `--owner` and `--strict` on top.
fn load_store_config(global: &GlobalArgs) -> Result<StoreConfig> {
    let mut config = match &global.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config `{}`", path.display()))?;
            StoreConfig::from_json_str(&raw)
                .with_context(|| format!("invalid config `{}`", path.display()))?
        }
        None => StoreConfig::default(),
    };
    if let Some(owner) = &global.owner {
        config = config.with_owner_id(owner.as_str()).normalized()?;
    }
    if global.strict {
        config = config.with_corrupt_policy(CorruptBlobPolicy::Surface);
    }
    Ok(config)
}

fn build_storage(global: &GlobalArgs) -> Result<Box<dyn BlobStorage>> {
    let storage: Box<dyn BlobStorage> = match global.backend {
        Backend::File => Box::new(FileStorage::new(&global.data_dir)),
        Backend::Sqlite => {
            std::fs::create_dir_all(&global.data_dir).with_context(|| {
                format!("failed to create data dir `{}`", global.data_dir.display())
            })?;
            Box::new(SqliteStorage::open(global.data_dir.join(SQLITE_FILE_NAME))?)
        }
        Backend::Memory => Box::new(MemoryStorage::new()),
    };
    Ok(storage)
}

fn print_notes(out: &mut impl Write, notes: &[Note]) -> Result<()> {
    if notes.is_empty() {
        writeln!(out, "No notes yet. Create your first note!")?;
        return Ok(());
    }
    for note in notes {
        print_note(out, note, false)?;
    }
    Ok(())
}

fn print_note(out: &mut impl Write, note: &Note, full: bool) -> Result<()> {
    let pin = if note.is_pinned { "*" } else { " " };
    writeln!(out, "{pin} {}  {}", note.id, note.title)?;
    if full && !note.content.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", note.content)?;
    }
    Ok(())
}
