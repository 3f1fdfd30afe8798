//! Core record types for the MovieLens CSV tables.
//!
//! Ids are kept as the strings found in the files. Nothing is coerced to a
//! number, so `"1"` and `"01"` are different movies.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a user, as written in the ratings and tags tables
pub type UserId = String;

/// Identifier of a movie, as written in every table
pub type MovieId = String;

// =============================================================================
// Table kinds
// =============================================================================

/// The four tables of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    Movies,
    Links,
    Ratings,
    Tags,
}

impl DataKind {
    /// File name of the table inside a MovieLens directory
    pub fn file_name(self) -> &'static str {
        match self {
            DataKind::Movies => "movies.csv",
            DataKind::Links => "links.csv",
            DataKind::Ratings => "ratings.csv",
            DataKind::Tags => "tags.csv",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::Movies => "movies",
            DataKind::Links => "links",
            DataKind::Ratings => "ratings",
            DataKind::Tags => "tags",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Records
// =============================================================================

/// A row of `movies.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre tokens in the order they appear in the pipe-separated field
    pub genres: Vec<String>,
    /// Year digits from the title as written, e.g. "1995" for
    /// "Toy Story (1995)"
    pub year: Option<String>,
}

impl Movie {
    /// The genres field as it was read, e.g. `"Adventure|Animation"`
    pub fn genre_string(&self) -> String {
        self.genres.join("|")
    }
}

/// A year taken from a title, ordered by numeric value.
///
/// Holds the digits without leading zeros and compares length first, so a
/// digit run of any size orders like the integer it spells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Year(String);

impl Year {
    /// `None` unless `digits` is non-empty and all ASCII digits
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        let value = if trimmed.is_empty() { "0" } else { trimmed };
        Some(Year(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for Year {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Year {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A row of `links.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub movie_id: MovieId,
    pub imdb_id: String,
    pub tmdb_id: String,
}

/// A row of `ratings.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
    /// Unix timestamp when the rating was made
    pub timestamp: i64,
}

/// A row of `tags.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub tag: String,
    pub timestamp: i64,
}
