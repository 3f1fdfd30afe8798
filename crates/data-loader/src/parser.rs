//! Parser for the MovieLens CSV tables.
//!
//! Formats (one header line, then one record per line):
//! - movies.csv: movieId,title,genres
//! - links.csv: movieId,imdbId,tmdbId
//! - ratings.csv: userId,movieId,rating,timestamp
//! - tags.csv: userId,movieId,tag,timestamp
//!
//! Fields are split on plain commas, no quoting. Row policy:
//! - fewer fields than the table needs: the row is skipped
//! - more fields (links, ratings, tags): the load fails
//! - a rating or timestamp that does not parse: the load fails
//!
//! The movies table is split on its first two commas only, so the genres
//! field may contain further commas.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::io::BufRead;
use tracing::debug;

/// Drive `on_row` over every data line of `reader`.
///
/// The header line is discarded without looking at it. Each data line is
/// trimmed and handed over with its line number (header = line 1).
pub(crate) fn for_each_row<R, F>(reader: R, kind: DataKind, mut on_row: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(usize, &str) -> Result<()>,
{
    let mut lines = reader.lines();

    match lines.next() {
        None => return Err(DataLoadError::MissingHeader { kind }),
        Some(header) => {
            header.map_err(|source| DataLoadError::Io { kind, source })?;
        }
    }

    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        let line = line.map_err(|source| DataLoadError::Io { kind, source })?;
        on_row(line_no, line.trim())?;
    }
    Ok(())
}

/// Split a row into exactly `expected` fields.
///
/// `Ok(None)` for short rows, an error for long ones.
fn split_exact<'a>(
    line: &'a str,
    expected: usize,
    kind: DataKind,
    line_no: usize,
) -> Result<Option<Vec<&'a str>>> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < expected {
        debug!(kind = %kind, line = line_no, fields = parts.len(), "skipping short row");
        return Ok(None);
    }
    if parts.len() > expected {
        return Err(DataLoadError::InvalidLine {
            kind,
            line: line_no,
            reason: format!("expected {} fields, found {}", expected, parts.len()),
        });
    }
    Ok(Some(parts))
}

/// Numeric fields may carry whitespace around the digits
fn parse_timestamp(value: &str, kind: DataKind, line_no: usize) -> Result<i64> {
    value.trim().parse().map_err(|e| DataLoadError::InvalidLine {
        kind,
        line: line_no,
        reason: format!("invalid timestamp {:?}: {}", value, e),
    })
}

/// Parse one data row of movies.csv
pub fn parse_movie(line_no: usize, line: &str) -> Result<Option<Movie>> {
    let parts: Vec<&str> = line.splitn(3, ',').collect();
    let [movie_id, title, genres] = parts[..] else {
        debug!(kind = "movies", line = line_no, "skipping short row");
        return Ok(None);
    };

    Ok(Some(Movie {
        id: movie_id.to_string(),
        title: title.to_string(),
        genres: genres.split('|').map(str::to_string).collect(),
        year: extract_year_from_title(title).map(str::to_string),
    }))
}

/// Parse one data row of links.csv
pub fn parse_link(line_no: usize, line: &str) -> Result<Option<Link>> {
    let Some(parts) = split_exact(line, 3, DataKind::Links, line_no)? else {
        return Ok(None);
    };

    Ok(Some(Link {
        movie_id: parts[0].to_string(),
        imdb_id: parts[1].to_string(),
        tmdb_id: parts[2].to_string(),
    }))
}

/// Parse one data row of ratings.csv
pub fn parse_rating(line_no: usize, line: &str) -> Result<Option<Rating>> {
    let kind = DataKind::Ratings;
    let Some(parts) = split_exact(line, 4, kind, line_no)? else {
        return Ok(None);
    };

    let rating = parts[2].trim().parse().map_err(|e| DataLoadError::InvalidLine {
        kind,
        line: line_no,
        reason: format!("invalid rating {:?}: {}", parts[2], e),
    })?;

    Ok(Some(Rating {
        user_id: parts[0].to_string(),
        movie_id: parts[1].to_string(),
        rating,
        timestamp: parse_timestamp(parts[3], kind, line_no)?,
    }))
}

/// Parse one data row of tags.csv
pub fn parse_tag(line_no: usize, line: &str) -> Result<Option<Tag>> {
    let kind = DataKind::Tags;
    let Some(parts) = split_exact(line, 4, kind, line_no)? else {
        return Ok(None);
    };

    Ok(Some(Tag {
        user_id: parts[0].to_string(),
        movie_id: parts[1].to_string(),
        tag: parts[2].to_string(),
        timestamp: parse_timestamp(parts[3], kind, line_no)?,
    }))
}

/// Extract year from movie title
///
/// Takes the text after the last `(` up to the next `)` and accepts it if
/// it is all ASCII digits. The digits are returned as written, with no
/// range check.
///
/// Example: "Toy Story (1995)" -> Some("1995")
///          "Movie Title" -> None
pub fn extract_year_from_title(title: &str) -> Option<&str> {
    if !title.contains(')') {
        return None;
    }
    let start = title.rfind('(')?;
    let inner = title[start + 1..].split(')').next()?;
    Year::from_digits(inner).map(|_| inner)
}
