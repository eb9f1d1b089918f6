use archive_core::domain::{ArchiveSnapshot, Author, JokeRecord};
use archive_core::favorites::Favorites;
use archive_core::ports::ArchiveWriter;
use archive_core::utils::{extract_year, sanitize_filename};
use archive_core::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Markdown writer adapter implementation.
/// Writes one file per author and year into the output folder.
pub struct MarkdownArchiveWriter {
    output_folder: PathBuf,
}

impl MarkdownArchiveWriter {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    /// Formats jokes into markdown for a single author-year group
    fn format_markdown(&self, author: Author, year: &str, jokes: &[&JokeRecord], favorites: &Favorites) -> String {
        let noun = if jokes.len() == 1 { "joke" } else { "jokes" };
        let mut output = String::new();
        output.push_str(&format!("# {} ({})\n\n", author, year));
        output.push_str(&format!("*{} {}*\n\n", jokes.len(), noun));
        output.push_str("---\n\n");

        for joke in jokes {
            let star = if favorites.contains(joke.id) { " ★" } else { "" };
            output.push_str(&format!("**{}**{}\n\n", joke.date, star));

            let content = joke.content.trim();
            if content.is_empty() {
                output.push_str("*[No content]*\n\n");
            } else {
                output.push_str(&format!("{}\n\n", content));
            }
            if let Some(context) = &joke.context {
                output.push_str(&format!("> {}\n\n", context));
            }

            output.push_str("---\n\n");
        }

        output
    }
}

impl ArchiveWriter for MarkdownArchiveWriter {
    fn write(&self, snapshot: &ArchiveSnapshot) -> Result<()> {
        if snapshot.jokes.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(&self.output_folder)?;

        // (author, year) -> jokes, in collection order within each group
        let mut grouped: BTreeMap<(Author, String), Vec<&JokeRecord>> = BTreeMap::new();
        for joke in &snapshot.jokes {
            let year = extract_year(&joke.date).unwrap_or_else(|| "unknown".to_string());
            grouped.entry((joke.author, year)).or_default().push(joke);
        }

        for ((author, year), jokes) in &grouped {
            let filename = format!(
                "{}-{}.md",
                sanitize_filename(&author.first_name().to_lowercase()),
                year
            );
            let markdown = self.format_markdown(*author, year, jokes, &snapshot.user_favorites);
            fs::write(self.output_folder.join(&filename), markdown)?;
            debug!(file = %filename, count = jokes.len(), "wrote markdown");
        }

        Ok(())
    }
}
