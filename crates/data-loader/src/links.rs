//! The links table: external ids for each movie.

use crate::catalog::MovieCatalog;
use crate::error::Result;
use crate::parser;
use crate::source::SearchPaths;
use crate::types::*;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

const IMDB_TITLE_URL: &str = "https://www.imdb.com/title/tt";

#[derive(Debug)]
pub struct LinkIndex {
    catalog: Arc<MovieCatalog>,
    links: Vec<Link>,
    /// Position of the last link for each movie id
    by_movie: HashMap<MovieId, usize>,
}

impl LinkIndex {
    /// Load `links.csv` from `path`, falling back on `search` roots
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(
        path: &Path,
        search: &SearchPaths,
        catalog: Arc<MovieCatalog>,
    ) -> Result<Self> {
        let reader = search.open(path, DataKind::Links)?;
        Self::from_reader(reader, catalog)
    }

    /// Load from an already open source
    pub fn from_reader<R: BufRead>(reader: R, catalog: Arc<MovieCatalog>) -> Result<Self> {
        let mut links = Vec::new();
        let mut by_movie = HashMap::new();

        parser::for_each_row(reader, DataKind::Links, |line_no, line| {
            if let Some(link) = parser::parse_link(line_no, line)? {
                by_movie.insert(link.movie_id.clone(), links.len());
                links.push(link);
            }
            Ok(())
        })?;

        info!(links = links.len(), "loaded link index");
        Ok(Self {
            catalog,
            links,
            by_movie,
        })
    }

    /// All links, in file order
    pub fn get_links(&self) -> &[Link] {
        &self.links
    }

    /// Link for a movie id; the last row wins if the file repeats an id
    pub fn get_movie_links(&self, movie_id: &str) -> Option<&Link> {
        self.by_movie.get(movie_id).map(|&pos| &self.links[pos])
    }

    /// Link for a movie title, ignoring case
    ///
    /// Only links whose movie id is in the catalog can match. When several
    /// linked movies share the title, the one listed last in the links file
    /// wins.
    pub fn get_link_by_title(&self, title: &str) -> Option<&Link> {
        let folded = title.to_lowercase();
        self.links
            .iter()
            .rev()
            .find(|link| self.catalog.title_matches(&link.movie_id, &folded))
    }

    /// IMDb page for a movie id, or an empty string when it has no link
    pub fn get_imdb_link(&self, movie_id: &str) -> String {
        self.get_movie_links(movie_id)
            .map(imdb_url)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// `https://www.imdb.com/title/tt<id>/` with the id left-padded to 7 digits
pub fn imdb_url(link: &Link) -> String {
    format!("{}{:0>7}/", IMDB_TITLE_URL, link.imdb_id)
}
