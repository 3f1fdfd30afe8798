//! Loading a whole MovieLens directory at once.

use crate::catalog::MovieCatalog;
use crate::error::Result;
use crate::links::LinkIndex;
use crate::ratings::RatingIndex;
use crate::source::SearchPaths;
use crate::tags::TagIndex;
use crate::types::DataKind;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// The four tables of one dataset, loaded and indexed
#[derive(Debug)]
pub struct Dataset {
    pub movies: Arc<MovieCatalog>,
    pub ratings: RatingIndex,
    pub tags: TagIndex,
    pub links: LinkIndex,
}

impl Dataset {
    /// Load `movies.csv`, `ratings.csv`, `tags.csv` and `links.csv` from
    /// `data_dir`.
    ///
    /// Each file is looked up as `data_dir/<file>` first and then under the
    /// `search` roots. The first failing table aborts the load.
    #[instrument(skip_all, fields(data_dir = %data_dir.display()))]
    pub fn load(data_dir: &Path, search: &SearchPaths) -> Result<Self> {
        let path = |kind: DataKind| data_dir.join(kind.file_name());

        let movies = Arc::new(MovieCatalog::from_path(&path(DataKind::Movies), search)?);
        let ratings = RatingIndex::from_path(&path(DataKind::Ratings), search, movies.clone())?;
        let tags = TagIndex::from_path(&path(DataKind::Tags), search, movies.clone())?;
        let links = LinkIndex::from_path(&path(DataKind::Links), search, movies.clone())?;

        let dataset = Self {
            movies,
            ratings,
            tags,
            links,
        };
        let (movies, ratings, tags, links) = dataset.counts();
        info!(movies, ratings, tags, links, "dataset loaded");
        Ok(dataset)
    }

    /// Build from already open sources, one per table
    pub fn from_readers<M, R, T, L>(movies: M, ratings: R, tags: T, links: L) -> Result<Self>
    where
        M: BufRead,
        R: BufRead,
        T: BufRead,
        L: BufRead,
    {
        let movies = Arc::new(MovieCatalog::from_reader(movies)?);
        Ok(Self {
            ratings: RatingIndex::from_reader(ratings, movies.clone())?,
            tags: TagIndex::from_reader(tags, movies.clone())?,
            links: LinkIndex::from_reader(links, movies.clone())?,
            movies,
        })
    }

    /// Record counts: (movies, ratings, tags, links)
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.movies.len(),
            self.ratings.len(),
            self.tags.len(),
            self.links.len(),
        )
    }
}
