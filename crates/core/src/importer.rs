//! WhatsApp chat export importer.
//!
//! Turns pasted export text into joke records. Two header layouts are
//! recognized:
//!
//! - Android / Web: `12/05/2022, 10:30 - Amiram: Joke text`
//! - iOS: `[12/05/2022, 10:30:00] Amiram: Joke text`
//!
//! Any other non-empty line continues the most recent record.

use crate::domain::{Author, JokeRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

static INLINE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}),? [0-9]{1,2}:[0-9]{2}.*? - ([^:]+): (.+)$")
        .expect("inline header pattern is valid")
});

static BRACKETED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}),? [0-9]{1,2}:[0-9]{2}.*?\] ([^:]+): (.+)$")
        .expect("bracketed header pattern is valid")
});

/// Phrases WhatsApp puts in place of attachments.
const MEDIA_OMITTED_MARKERS: [&str; 2] = ["Media omitted", "image omitted"];

/// Invisible left-to-right / right-to-left marks sprinkled through RTL exports,
/// plus the byte-order mark Windows exports start with.
const INVISIBLE_MARKS: [char; 3] = ['\u{200e}', '\u{200f}', '\u{feff}'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    Inline,
    Bracketed,
}

/// The pieces of a message header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader<'a> {
    pub style: HeaderStyle,
    pub date: &'a str,
    pub speaker: &'a str,
    pub message: &'a str,
}

/// Tries both header layouts in order, inline first.
pub fn match_header(line: &str) -> Option<MessageHeader<'_>> {
    [
        (HeaderStyle::Inline, &*INLINE_HEADER),
        (HeaderStyle::Bracketed, &*BRACKETED_HEADER),
    ]
    .into_iter()
    .find_map(|(style, pattern)| {
        let caps = pattern.captures(line)?;
        Some(MessageHeader {
            style,
            date: caps.get(1)?.as_str(),
            speaker: caps.get(2)?.as_str(),
            message: caps.get(3)?.as_str(),
        })
    })
}

/// Expands a two-digit year into the 2000s: `12/05/22` -> `12/05/2022`.
/// Day and month are kept as written.
pub fn normalize_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('/').collect();
    match parts.as_slice() {
        [day, month, year] if year.len() == 2 => format!("{}/{}/20{}", day, month, year),
        _ => date.to_string(),
    }
}

fn clean_line(line: &str) -> String {
    line.replace(&INVISIBLE_MARKS[..], "").trim().to_string()
}

fn is_media_placeholder(message: &str) -> bool {
    MEDIA_OMITTED_MARKERS.iter().any(|marker| message.contains(marker))
}

/// Outcome of one import run.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub records: Vec<JokeRecord>,
    /// Header lines whose message was an attachment placeholder
    pub media_skipped: usize,
    /// Header lines from speakers outside the author table
    pub unknown_speakers: usize,
    /// Non-header lines seen before any record existed
    pub orphan_lines: usize,
}

/// Line-oriented parser for WhatsApp chat exports.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChatLogImporter;

impl ChatLogImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parses `raw` into joke records in source order. Never fails; text that
    /// does not look like a chat export yields no records.
    pub fn parse(&self, raw: &str) -> Vec<JokeRecord> {
        self.parse_with_report(raw).records
    }

    /// Like `parse`, but also counts what was skipped.
    pub fn parse_with_report(&self, raw: &str) -> ImportReport {
        let mut report = ImportReport::default();

        for (index, line) in raw.split('\n').enumerate() {
            let line = clean_line(line);

            let Some(header) = match_header(&line) else {
                if line.is_empty() {
                    continue;
                }
                match report.records.last_mut() {
                    Some(last) => {
                        last.content.push('\n');
                        last.content.push_str(&line);
                    }
                    None => report.orphan_lines += 1,
                }
                continue;
            };

            if is_media_placeholder(header.message) {
                debug!(line = index + 1, "skipping media placeholder");
                report.media_skipped += 1;
                continue;
            }

            // An unresolved speaker drops the line without ending the previous
            // record: following continuation lines still attach to it.
            let Some(author) = Author::resolve(header.speaker) else {
                debug!(line = index + 1, speaker = header.speaker, "skipping unknown speaker");
                report.unknown_speakers += 1;
                continue;
            };

            report.records.push(JokeRecord::new(
                normalize_date(header.date),
                author,
                header.message.trim(),
            ));
        }

        info!(
            records = report.records.len(),
            media_skipped = report.media_skipped,
            unknown_speakers = report.unknown_speakers,
            "parsed chat log"
        );
        report
    }
}

/// Convenience wrapper around `ChatLogImporter::parse`.
pub fn parse_chat_log(raw: &str) -> Vec<JokeRecord> {
    ChatLogImporter::new().parse(raw)
}
