//! The tags table: free-text labels users attached to movies.

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

#[derive(Debug)]
pub struct TagIndex {
    catalog: Arc<MovieCatalog>,
    tags: Vec<Tag>,
    by_movie: HashMap<MovieId, Vec<usize>>,
}

impl TagIndex {
    /// Load `tags.csv` from `path`, falling back on `search` roots
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(
        path: &Path,
        search: &SearchPaths,
        catalog: Arc<MovieCatalog>,
    ) -> Result<Self> {
        let reader = search.open(path, DataKind::Tags)?;
        Self::from_reader(reader, catalog)
    }

    /// Load from an already open source
    pub fn from_reader<R: BufRead>(reader: R, catalog: Arc<MovieCatalog>) -> Result<Self> {
        let mut tags = Vec::new();
        let mut by_movie: HashMap<MovieId, Vec<usize>> = HashMap::new();

        parser::for_each_row(reader, DataKind::Tags, |line_no, line| {
            if let Some(tag) = parser::parse_tag(line_no, line)? {
                by_movie
                    .entry(tag.movie_id.clone())
                    .or_default()
                    .push(tags.len());
                tags.push(tag);
            }
            Ok(())
        })?;

        info!(tags = tags.len(), "loaded tag index");
        Ok(Self {
            catalog,
            tags,
            by_movie,
        })
    }

    /// All tags, in file order
    pub fn get_tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Tags of one movie, in file order; empty if it has none
    pub fn get_movie_tags(&self, movie_id: &str) -> Vec<&Tag> {
        self.by_movie
            .get(movie_id)
            .map(|positions| positions.iter().map(|&pos| &self.tags[pos]).collect())
            .unwrap_or_default()
    }

    /// Tags of every catalog movie whose title matches, ignoring case
    pub fn get_tags_by_title(&self, title: &str) -> Vec<&Tag> {
        let folded = title.to_lowercase();
        self.tags
            .iter()
            .filter(|t| self.catalog.title_matches(&t.movie_id, &folded))
            .collect()
    }

    /// Tags whose text contains `needle`, ignoring case
    pub fn search<'a>(&'a self, needle: &str) -> impl Iterator<Item = &'a Tag> {
        let needle = needle.to_lowercase();
        self.tags
            .iter()
            .filter(move |t| t.tag.to_lowercase().contains(&needle))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
