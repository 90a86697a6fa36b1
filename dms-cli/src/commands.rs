//! One-shot subcommands and the session state they run against.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use dms_core::config::ExportLayout;
use dms_core::export;
use dms_core::import;
use dms_core::{CharacterStore, DmsConfig, RankingEngine, RecordId};
use tracing::info;

use crate::output;
use crate::shell;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List active records, ascending by id
    List,

    /// Search active records by handle, server or occupation
    Search {
        /// Case-insensitive substring; omit to match everything
        query: Option<String>,
    },

    /// Look up one record by id or handle
    Find {
        /// Record id
        #[arg(long, conflicts_with = "handle", required_unless_present = "handle")]
        id: Option<i64>,

        /// Handle (case-insensitive)
        #[arg(long)]
        handle: Option<String>,
    },

    /// Rank active records by threat score
    Top {
        /// Number of entries (defaults to `ranking.default_top_n`)
        n: Option<i64>,

        /// Write the ranking as CSV to this file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Export column layout (defaults to `ranking.layout`)
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
    },

    /// Import CSV files and report what was added or skipped
    Import {
        /// Files to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Interactive line-oriented shell
    Shell,
}

/// Export layout as a command-line value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    /// Record fields without `active`, then `score`
    Report,
    /// All record fields, then `score`
    Full,
}

impl From<LayoutArg> for ExportLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Report => Self::Report,
            LayoutArg::Full => Self::Full,
        }
    }
}

/// The store plus everything needed to drive it.
pub struct Session {
    pub store: CharacterStore,
    pub config: DmsConfig,
    pub engine: RankingEngine,
    pub json: bool,
}

impl Session {
    pub fn new(store: CharacterStore, config: DmsConfig, json: bool) -> Self {
        let engine = RankingEngine::new(config.ranking.clone());
        Self {
            store,
            config,
            engine,
            json,
        }
    }

    /// Import a CSV file, printing the summary to stdout.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let mut out = io::stdout().lock();
        self.load_into(path, &mut out)
    }

    pub fn load_into<W: Write>(&mut self, path: &Path, out: &mut W) -> Result<()> {
        let report = import::import_path(&mut self.store, path, &self.config.import)
            .with_context(|| format!("reading {}", path.display()))?;
        output::import_report(out, &report)
    }

    pub fn run(mut self, command: Command) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match command {
            Command::List => output::records(&mut out, &self.store.list_active(), self.json),
            Command::Search { query } => output::records(
                &mut out,
                &self.store.search(query.as_deref().unwrap_or_default()),
                self.json,
            ),
            Command::Find { id, handle } => {
                let found = match (id, handle) {
                    (Some(id), _) => self.store.find_by_id(RecordId(id)),
                    (None, Some(handle)) => self.store.find_by_handle(&handle),
                    (None, None) => None,
                };
                output::lookup(&mut out, found, self.json)
            }
            Command::Top { n, out: path, layout } => {
                self.top(&mut out, n, path.as_deref(), layout.map(Into::into))
            }
            Command::Import { paths } => {
                for path in &paths {
                    self.load_into(path, &mut out)?;
                }
                writeln!(out, "{} records in store.", self.store.len())?;
                Ok(())
            }
            Command::Shell => {
                let stdin = io::stdin();
                shell::run(&mut self, stdin.lock(), &mut out)
            }
        }
    }

    /// Rank active records, print them, and optionally export to `path`.
    pub fn top<W: Write>(
        &self,
        out: &mut W,
        n: Option<i64>,
        path: Option<&Path>,
        layout: Option<ExportLayout>,
    ) -> Result<()> {
        let active = self.store.list_active();
        let entries = match n {
            Some(n) => self.engine.top_n(n, active),
            None => self.engine.top_default(active),
        };
        output::entries(out, &entries, self.json)?;

        if let Some(path) = path {
            let layout = layout.unwrap_or(self.engine.config().layout);
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            export::write_export(BufWriter::new(file), &entries, layout)?;
            info!(path = %path.display(), entries = entries.len(), "ranking written");
            writeln!(out, "Exported {} entries to {}", entries.len(), path.display())?;
        }
        Ok(())
    }
}
