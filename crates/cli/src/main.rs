use anyhow::Context;
use archive_core::application::ArchiveService;
use archive_core::catalog::{BrowseQuery, SortOption};
use archive_core::domain::{Author, AUTHOR_PROFILES};
use archive_core::ports::ArchiveWriter;
use archive_core::utils::export_file_name;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use json_adapter::JsonArchiveWriter;
use markdown_adapter::MarkdownArchiveWriter;
use sqlite_adapter::SqliteArchiveStore;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Archive of wordplay jokes collected from a WhatsApp group
#[derive(Parser, Debug)]
#[command(name = "wordplay-archive")]
#[command(about = "Imports, browses and exports the wordplay joke archive")]
struct Cli {
    /// Path to the SQLite archive file
    #[arg(long = "db", env = "WORDPLAY_DB", default_value = "wordplay.db", global = true)]
    db: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import jokes from a WhatsApp chat export (reads stdin when no file is given)
    Import {
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },
    /// List jokes, optionally filtered and sorted
    List {
        /// Case-insensitive text to look for in the joke content
        #[arg(short, long)]
        search: Option<String>,
        /// Only show jokes by this author (any accepted name fragment)
        #[arg(short, long)]
        author: Option<Author>,
        /// newest, oldest, az or za
        #[arg(long, default_value = "newest")]
        sort: SortOption,
        /// Only show favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Star or unstar a joke
    Favorite { id: Uuid },
    /// Print a joke in shareable form
    Share { id: Uuid },
    /// Export the archive as JSON or Markdown
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// File (json) or folder (markdown) to write
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Show the known authors and the names they are matched by
    Authors,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Json,
    Markdown,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn build_service(db: &Path) -> ArchiveService {
    ArchiveService::new(
        Box::new(SqliteArchiveStore::new(db)),
        Box::new(SqliteArchiveStore::new(db)),
    )
}

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let service = build_service(&cli.db);

    match cli.command {
        Command::Import { input } => {
            let text = read_input(input.as_deref())?;
            let summary = service.import_chat(&text).context("import failed")?;
            if summary.imported.is_empty() {
                println!("No valid jokes found. Check the format.");
                return Ok(());
            }
            for joke in &summary.imported {
                println!("{}  {}: {}", joke.date, joke.author.first_name(), joke.content);
            }
            println!(
                "Imported {} jokes (skipped {} media messages, {} messages from unknown speakers, {} lines before the first message)",
                summary.imported.len(),
                summary.media_skipped,
                summary.unknown_speakers,
                summary.orphan_lines
            );
        }
        Command::List { search, author, sort, favorites } => {
            let query = BrowseQuery {
                search,
                author,
                favorites_only: favorites,
                sort,
            };
            let result = service.browse(&query).context("failed to load jokes")?;

            let counts: Vec<String> = result
                .author_counts
                .iter()
                .map(|(author, count)| format!("{} {}", author.first_name(), count))
                .collect();
            let noun = if result.jokes.len() == 1 { "joke" } else { "jokes" };
            println!("{} {} (all {}: {})", result.jokes.len(), noun, result.total, counts.join(", "));

            for (joke, favorite) in &result.jokes {
                let star = if *favorite { "*" } else { " " };
                println!();
                println!("{} {}  {}  {}", star, joke.date, joke.author.first_name(), joke.id);
                for line in joke.content.lines() {
                    println!("    {}", line);
                }
            }
        }
        Command::Favorite { id } => {
            if service.toggle_favorite(id)? {
                println!("Added {} to favorites", id);
            } else {
                println!("Removed {} from favorites", id);
            }
        }
        Command::Share { id } => {
            println!("{}", service.share(id)?);
        }
        Command::Export { format, output } => {
            let (writer, target): (Box<dyn ArchiveWriter>, PathBuf) = match format {
                ExportFormat::Json => {
                    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now())));
                    (Box::new(JsonArchiveWriter::new(&path)), path)
                }
                ExportFormat::Markdown => {
                    let folder = output.unwrap_or_else(|| PathBuf::from("wordplay-markdown"));
                    (Box::new(MarkdownArchiveWriter::new(&folder)), folder)
                }
            };
            let snapshot = service.export(writer.as_ref()).context("export failed")?;
            println!("Exported {} jokes to {}", snapshot.meta.total_jokes, target.display());
        }
        Command::Authors => {
            for profile in &AUTHOR_PROFILES {
                println!(
                    "{:<18} {:<7} {:<22} {}",
                    profile.display_name,
                    profile.accent,
                    profile.avatar,
                    profile.name_fragments.join(", ")
                );
            }
        }
    }

    Ok(())
}
