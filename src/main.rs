//! versepad - Entry Point

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::info;
use versepad::app::App;
use versepad::config::SettingsStore;
use versepad::loader::{LoadPhase, LoadProgress};
use versepad::model::{catalog, Book, Dataset, SourceId};
use versepad::state::{ClipboardSink, MemorySink, SystemClipboard};

/// versepad - read scripture datasets and collect verses on the clipboard
#[derive(Parser, Debug)]
#[command(name = "versepad")]
#[command(version)]
#[command(about = "Read scripture datasets and copy verses to the clipboard")]
pub struct Args {
    /// Dataset id to open (e.g. en_kjv); defaults to the last one used
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Base URL serving `<source>.json` documents
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory for the dataset cache
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Download the dataset even if it is cached
    #[arg(long, global = true)]
    pub refresh: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List the books of the dataset
    Books,
    /// Print one chapter
    Read {
        /// Book abbreviation (e.g. gn, jo, 1co)
        book: String,
        /// Chapter number, starting at 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        chapter: u32,
    },
    /// Copy verses to the system clipboard
    Copy {
        /// Book abbreviation
        book: String,
        /// Chapter number, starting at 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        chapter: u32,
        /// Verse numbers, starting at 1, in the order they should be copied
        #[arg(required = true, value_parser = clap::value_parser!(u32).range(1..))]
        verses: Vec<u32>,
    },
    /// List known dataset ids
    Sources,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = versepad::config::load_config_with_precedence(args.config.clone())?;
        let merged = versepad::config::merge_config(config_file)?;
        let with_env = versepad::config::apply_env_overrides(merged);
        versepad::config::apply_cli_overrides(with_env, args.base_url.clone(), args.cache_dir.clone())
    };

    let _log_guard = versepad::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    if args.command == Command::Sources {
        print!("{}", format_sources());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args, config))
}

async fn run(
    args: Args,
    config: versepad::config::ResolvedConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let sink: Box<dyn ClipboardSink> = match &args.command {
        Command::Copy { .. } => Box::new(SystemClipboard::new()?),
        _ => Box::new(MemorySink::new()),
    };
    let settings = SettingsStore::new(versepad::config::default_settings_path());
    let mut app = App::with_http(config, settings, sink)?;
    app.set_source_override(args.source.map(SourceId::new).transpose()?);

    let source = app.startup_source();
    let reporter = std::io::stderr()
        .is_terminal()
        .then(|| tokio::spawn(report_progress(app.loader().subscribe())));

    let opened = if args.refresh {
        app.refresh(&source).await
    } else {
        app.open(&source).await
    };
    if let Some(reporter) = reporter {
        reporter.abort();
        eprint!("\r\x1b[2K");
    }
    let dataset = opened?;

    match args.command {
        Command::Books => print!("{}", format_books(&dataset)),
        Command::Read { book, chapter } => {
            let chapter = chapter as usize - 1;
            let found = dataset
                .book(&book)
                .ok_or_else(|| versepad::model::NavigationError::UnknownBook(book.clone()))?;
            let text = format_chapter(found, chapter).ok_or(
                versepad::model::NavigationError::ChapterOutOfRange {
                    book: book.clone(),
                    chapter,
                },
            )?;
            print!("{text}");
        }
        Command::Copy {
            book,
            chapter,
            verses,
        } => {
            for verse in verses {
                app.copy_verse(&book, chapter as usize - 1, verse as usize - 1)?;
            }
            println!("{}", app.clipboard().serialize());
        }
        Command::Sources => print!("{}", format_sources()),
    }

    Ok(())
}

/// Draw a one-line progress indicator on stderr until aborted.
async fn report_progress(mut rx: watch::Receiver<LoadProgress>) {
    while rx.changed().await.is_ok() {
        let progress = rx.borrow_and_update().clone();
        let Some(source) = progress.source else {
            continue;
        };
        let label = match progress.phase {
            LoadPhase::CheckingCache => "checking cache",
            LoadPhase::Downloading => "downloading",
            LoadPhase::Complete => "done",
            LoadPhase::Failed => "failed",
            LoadPhase::Idle => continue,
        };
        eprint!("\r\x1b[2K{source}: {label} {:>3}%", progress.percent);
    }
}

fn format_books(dataset: &Dataset) -> String {
    dataset
        .books()
        .iter()
        .map(|book| {
            format!(
                "{:<4} {} ({} chapters)\n",
                book.abbreviation(),
                book.display_name(),
                book.chapters().len()
            )
        })
        .collect()
}

/// Numbered verses of the 0-based `chapter`, or `None` if it does not exist.
fn format_chapter(book: &Book, chapter: usize) -> Option<String> {
    let verses = book.chapter(chapter)?;
    let mut out = format!("{} {}\n", book.display_name(), chapter + 1);
    for (index, verse) in verses.iter().enumerate() {
        out.push_str(&format!("{:>3} {}\n", index + 1, verse));
    }
    Some(out)
}

fn format_sources() -> String {
    catalog::KNOWN_SOURCES
        .iter()
        .map(|source| format!("{:<14} {}\n", source.id, source.label))
        .collect()
}
