use crate::domain::JokeRecord;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Parses a `dd/mm/yyyy` joke date. Out-of-range day and month values roll
/// over into the following month or year (`31/13/2023` is 31 January 2024).
pub fn parse_joke_date(date: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = date.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let day: i64 = parts[0].trim().parse().ok()?;
    let month: i32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;

    let month_index = month.checked_sub(1)?;
    let first_of_month = NaiveDate::from_ymd_opt(
        year.checked_add(month_index.div_euclid(12))?,
        u32::try_from(month_index.rem_euclid(12) + 1).ok()?,
        1,
    )?;
    first_of_month.checked_add_signed(Duration::try_days(day.checked_sub(1)?)?)
}

/// Extracts the four-digit year from a `dd/mm/yyyy` date.
pub fn extract_year(date: &str) -> Option<String> {
    let year = date.rsplit('/').next()?;
    if date.matches('/').count() == 2 && year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        return Some(year.to_string());
    }
    None
}

/// Text handed to a share sheet or clipboard for a single joke.
pub fn share_text(joke: &JokeRecord) -> String {
    format!("{}\n\n- {} ({})", joke.content, joke.author, joke.date)
}

/// Default file name for a JSON export taken at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("wordplay-archive-db-{}.json", now.format("%Y-%m-%d"))
}

/// Sanitizes a string for use in a filename
/// Replaces invalid filename characters with hyphens
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
