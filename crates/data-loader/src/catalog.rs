//! The movies table.
//!
//! `MovieCatalog` owns every [`Movie`]; the other indexes hold an
//! `Arc<MovieCatalog>` and resolve movie ids and titles through it.

use crate::error::Result;
use crate::parser;
use crate::source::SearchPaths;
use crate::types::*;
use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Default)]
pub struct MovieCatalog {
    /// Movies in file order
    movies: Vec<Movie>,
    /// Position of the first movie with each id
    by_id: HashMap<MovieId, usize>,
    /// Every year found in a title, by numeric value
    years: BTreeSet<Year>,
}

impl MovieCatalog {
    /// Load `movies.csv` from `path`, falling back on `search` roots
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path, search: &SearchPaths) -> Result<Self> {
        let reader = search.open(path, DataKind::Movies)?;
        Self::from_reader(reader)
    }

    /// Load from an already open source
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut catalog = Self::default();
        parser::for_each_row(reader, DataKind::Movies, |line_no, line| {
            if let Some(movie) = parser::parse_movie(line_no, line)? {
                catalog.insert(movie);
            }
            Ok(())
        })?;

        info!(
            movies = catalog.movies.len(),
            genres = catalog.get_genres().len(),
            "loaded movie catalog"
        );
        Ok(catalog)
    }

    fn insert(&mut self, movie: Movie) {
        if let Some(year) = movie.year.as_deref().and_then(Year::from_digits) {
            self.years.insert(year);
        }
        self.by_id.entry(movie.id.clone()).or_insert(self.movies.len());
        self.movies.push(movie);
    }

    /// All movies, in file order
    pub fn get_movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Movie whose id equals `id` (first one if the file repeats an id)
    pub fn get_movie(&self, id: &str) -> Option<&Movie> {
        self.by_id.get(id).map(|&pos| &self.movies[pos])
    }

    /// First movie whose title equals `title`, ignoring case
    pub fn get_movie_by_title(&self, title: &str) -> Option<&Movie> {
        let folded = title.to_lowercase();
        self.movies.iter().find(|m| m.title.to_lowercase() == folded)
    }

    /// Whether the movie with this id exists and its title matches `folded`
    ///
    /// `folded` must already be lowercased.
    pub(crate) fn title_matches(&self, id: &str, folded: &str) -> bool {
        self.get_movie(id)
            .is_some_and(|m| m.title.to_lowercase() == folded)
    }

    /// Distinct genre tokens, sorted
    pub fn get_genres(&self) -> Vec<String> {
        let genres: BTreeSet<&str> = self
            .movies
            .iter()
            .flat_map(|m| m.genres.iter().map(String::as_str))
            .collect();
        genres.into_iter().map(str::to_string).collect()
    }

    /// Earliest and latest year found in any title, `(None, None)` if none
    pub fn get_year_range(&self) -> (Option<&Year>, Option<&Year>) {
        (self.years.first(), self.years.last())
    }

    /// Movies whose year digits are exactly `year`, in file order
    ///
    /// "0995" and "995" are different years here, as they are in the titles.
    pub fn get_movies_by_year<'a>(&'a self, year: &'a str) -> impl Iterator<Item = &'a Movie> {
        self.movies
            .iter()
            .filter(move |m| m.year.as_deref() == Some(year))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
