//! Command-line surface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "quicknote", version, about = "Pinned-first notes kept in a local slot")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Directory holding the notes slot.
    #[arg(long, global = true, env = "QUICKNOTE_DATA_DIR", default_value = ".quicknote")]
    pub data_dir: PathBuf,

    #[arg(long, global = true, env = "QUICKNOTE_BACKEND", value_enum, default_value_t = Backend::File)]
    pub backend: Backend,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true, env = "QUICKNOTE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, global = true, env = "QUICKNOTE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// JSON store config with optional `slot`, `owner_id` and `corrupt_policy`.
    #[arg(long, global = true, env = "QUICKNOTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Owner whose notes are shown and changed. Overrides the config file.
    #[arg(long, global = true, env = "QUICKNOTE_OWNER")]
    pub owner: Option<String>,

    /// Fail instead of starting over when the stored notes are unreadable.
    #[arg(long, global = true, env = "QUICKNOTE_STRICT")]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// `<data-dir>/<slot>.json`
    File,
    /// `<data-dir>/quicknote.sqlite3`
    Sqlite,
    /// Process memory; nothing survives the command.
    Memory,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print notes, pinned first then newest.
    List {
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print one note.
    Show { id: String },
    /// Add a note.
    Create {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long)]
        pinned: bool,
    },
    /// Change some fields of a note; the others are kept.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        pinned: Option<bool>,
    },
    /// Flip the pinned flag of a note.
    Pin { id: String },
    /// Remove a note after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Remove every note.
    Clear {
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::{Backend, Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn update_accepts_partial_fields() {
        let cli = Cli::try_parse_from([
            "quicknote",
            "--backend",
            "sqlite",
            "update",
            "note-1",
            "--pinned",
            "true",
        ])
        .unwrap();

        assert_eq!(cli.global.backend, Backend::Sqlite);
        match cli.command {
            Command::Update {
                id,
                title,
                content,
                pinned,
            } => {
                assert_eq!(id, "note-1");
                assert_eq!(title, None);
                assert_eq!(content, None);
                assert_eq!(pinned, Some(true));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
