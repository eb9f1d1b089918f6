//! In-memory queries over the joke collection: search, author filter, sort.

use crate::domain::{Author, JokeRecord};
use crate::error::ArchiveError;
use crate::favorites::Favorites;
use crate::utils::parse_joke_date;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOption {
    #[default]
    Newest,
    Oldest,
    Az,
    Za,
}

impl FromStr for SortOption {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOption::Newest),
            "oldest" => Ok(SortOption::Oldest),
            "az" => Ok(SortOption::Az),
            "za" => Ok(SortOption::Za),
            other => Err(ArchiveError::InvalidArgument(format!(
                "unknown sort order '{}' (expected newest, oldest, az or za)",
                other
            ))),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOption::Newest => "newest",
            SortOption::Oldest => "oldest",
            SortOption::Az => "az",
            SortOption::Za => "za",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BrowseQuery {
    pub search: Option<String>,
    pub author: Option<Author>,
    pub favorites_only: bool,
    pub sort: SortOption,
}

#[derive(Debug)]
pub struct BrowsePage<'a> {
    pub jokes: Vec<&'a JokeRecord>,
    /// Jokes matching the search term, before the author filter
    pub total: usize,
    pub author_counts: BTreeMap<Author, usize>,
}

/// Case-insensitive content search. An empty term matches everything.
pub fn search<'a>(jokes: &'a [JokeRecord], term: &str) -> Vec<&'a JokeRecord> {
    if term.is_empty() {
        return jokes.iter().collect();
    }
    let term = term.to_lowercase();
    jokes
        .iter()
        .filter(|joke| joke.content.to_lowercase().contains(&term))
        .collect()
}

/// Per-author totals; every author is present, with zero if needed.
pub fn author_counts<'a, I>(jokes: I) -> BTreeMap<Author, usize>
where
    I: IntoIterator<Item = &'a JokeRecord>,
{
    let mut counts: BTreeMap<Author, usize> = Author::ALL.into_iter().map(|a| (a, 0)).collect();
    for joke in jokes {
        *counts.entry(joke.author).or_insert(0) += 1;
    }
    counts
}

/// Case-insensitive ordering; the raw text only breaks ties.
fn compare_content(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable sort in place. Unparseable dates sort as the earliest date;
/// out-of-range ones roll over (see `parse_joke_date`).
pub fn sort_jokes(jokes: &mut [&JokeRecord], order: SortOption) {
    match order {
        SortOption::Newest => jokes.sort_by(|a, b| parse_joke_date(&b.date).cmp(&parse_joke_date(&a.date))),
        SortOption::Oldest => jokes.sort_by(|a, b| parse_joke_date(&a.date).cmp(&parse_joke_date(&b.date))),
        SortOption::Az => jokes.sort_by(|a, b| compare_content(&a.content, &b.content)),
        SortOption::Za => jokes.sort_by(|a, b| compare_content(&b.content, &a.content)),
    }
}

pub fn browse<'a>(jokes: &'a [JokeRecord], query: &BrowseQuery, favorites: &Favorites) -> BrowsePage<'a> {
    let matches = search(jokes, query.search.as_deref().unwrap_or(""));
    let total = matches.len();
    let counts = author_counts(matches.iter().copied());

    let mut selected: Vec<&JokeRecord> = matches
        .into_iter()
        .filter(|joke| query.author.map_or(true, |author| joke.author == author))
        .filter(|joke| !query.favorites_only || favorites.contains(joke.id))
        .collect();
    sort_jokes(&mut selected, query.sort);

    BrowsePage {
        jokes: selected,
        total,
        author_counts: counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<JokeRecord> {
        vec![
            JokeRecord::new("12/05/2022", Author::Amiram, "Banana pun"),
            JokeRecord::new("01/01/2023", Author::David, "apple pun"),
            JokeRecord::new("30/12/2021", Author::Shoval, "Cherry joke"),
            JokeRecord::new("garbage", Author::David, "Date-less pun"),
        ]
    }

    fn contents(page: &BrowsePage<'_>) -> Vec<String> {
        page.jokes.iter().map(|j| j.content.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let jokes = sample();
        assert_eq!(search(&jokes, "PUN").len(), 3);
        assert_eq!(search(&jokes, "").len(), 4);
        assert!(search(&jokes, "zebra").is_empty());
    }

    #[test]
    fn test_author_counts_include_zero() {
        let jokes = vec![JokeRecord::new("01/01/2023", Author::David, "x")];
        let counts = author_counts(&jokes);
        assert_eq!(counts[&Author::David], 1);
        assert_eq!(counts[&Author::Amiram], 0);
        assert_eq!(counts[&Author::Shoval], 0);
    }

    #[test]
    fn test_newest_first_with_bad_dates_last() {
        let jokes = sample();
        let page = browse(&jokes, &BrowseQuery::default(), &Favorites::default());
        assert_eq!(
            contents(&page),
            vec!["apple pun", "Banana pun", "Cherry joke", "Date-less pun"]
        );
    }

    #[test]
    fn test_oldest_first() {
        let jokes = sample();
        let query = BrowseQuery { sort: SortOption::Oldest, ..Default::default() };
        let page = browse(&jokes, &query, &Favorites::default());
        assert_eq!(page.jokes[0].content, "Date-less pun");
        assert_eq!(page.jokes[1].content, "Cherry joke");
    }

    #[test]
    fn test_alphabetical_orders() {
        let jokes = sample();
        let query = BrowseQuery { sort: SortOption::Za, ..Default::default() };
        let page = browse(&jokes, &query, &Favorites::default());
        assert_eq!(
            contents(&page),
            vec!["Date-less pun", "Cherry joke", "Banana pun", "apple pun"]
        );
    }

    #[test]
    fn test_alphabetical_ignores_case() {
        let jokes: Vec<JokeRecord> = ["banana", "Apple", "cherry", "Zebra"]
            .into_iter()
            .map(|content| JokeRecord::new("01/01/2023", Author::David, content))
            .collect();
        let query = BrowseQuery { sort: SortOption::Az, ..Default::default() };
        let page = browse(&jokes, &query, &Favorites::default());
        assert_eq!(contents(&page), vec!["Apple", "banana", "cherry", "Zebra"]);
    }

    #[test]
    fn test_out_of_range_date_sorts_after_rollover() {
        let jokes = vec![
            JokeRecord::new("15/01/2024", Author::Amiram, "mid january"),
            JokeRecord::new("31/13/2023", Author::Shoval, "month thirteen"),
            JokeRecord::new("01/12/2023", Author::David, "december"),
        ];
        let query = BrowseQuery { sort: SortOption::Oldest, ..Default::default() };
        let page = browse(&jokes, &query, &Favorites::default());
        assert_eq!(contents(&page), vec!["december", "mid january", "month thirteen"]);
    }

    #[test]
    fn test_counts_follow_search_not_author_filter() {
        let jokes = sample();
        let query = BrowseQuery {
            search: Some("pun".to_string()),
            author: Some(Author::David),
            ..Default::default()
        };
        let page = browse(&jokes, &query, &Favorites::default());
        assert_eq!(page.jokes.len(), 2);
        assert_eq!(page.total, 3);
        assert_eq!(page.author_counts[&Author::Amiram], 1);
        assert_eq!(page.author_counts[&Author::David], 2);
        assert_eq!(page.author_counts[&Author::Shoval], 0);
    }

    #[test]
    fn test_favorites_only() {
        let jokes = sample();
        let favorites = Favorites::from_ids([jokes[2].id]);
        let query = BrowseQuery { favorites_only: true, ..Default::default() };
        let page = browse(&jokes, &query, &favorites);
        assert_eq!(contents(&page), vec!["Cherry joke"]);
    }

    #[test]
    fn test_sort_option_parsing() {
        assert_eq!("Oldest".parse::<SortOption>().unwrap(), SortOption::Oldest);
        assert_eq!(SortOption::Za.to_string(), "za");
        assert!("random".parse::<SortOption>().is_err());
    }
}
