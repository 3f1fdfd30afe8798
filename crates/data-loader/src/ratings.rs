//! The ratings table and the aggregations over it.
//!
//! Ratings are grouped per movie id in file order. Scores are computed on
//! demand from those groups:
//! - mean: arithmetic mean
//! - median: middle value of the sorted ratings, or the mean of the two
//!   middle values for an even count
//!
//! A movie without ratings scores 0.0 and never appears in a ranking.

use crate::catalog::MovieCatalog;
use crate::error::Result;
use crate::parser;
use crate::source::SearchPaths;
use crate::types::*;
use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// How a movie's ratings are summarised into one score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreMethod {
    Mean,
    Median,
}

impl ScoreMethod {
    /// Score a non-empty list of rating values
    pub fn score(self, values: &[f64]) -> f64 {
        match self {
            ScoreMethod::Mean => mean(values),
            ScoreMethod::Median => median(values),
        }
    }
}

impl fmt::Display for ScoreMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreMethod::Mean => f.write_str("mean"),
            ScoreMethod::Median => f.write_str("median"),
        }
    }
}

impl FromStr for ScoreMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mean" => Ok(ScoreMethod::Mean),
            "median" => Ok(ScoreMethod::Median),
            other => Err(format!("unknown score method {:?}", other)),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

#[derive(Debug)]
pub struct RatingIndex {
    catalog: Arc<MovieCatalog>,
    ratings: Vec<Rating>,
    /// Positions of each movie's ratings, in file order
    by_movie: HashMap<MovieId, Vec<usize>>,
}

impl RatingIndex {
    /// Load `ratings.csv` from `path`, falling back on `search` roots
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(
        path: &Path,
        search: &SearchPaths,
        catalog: Arc<MovieCatalog>,
    ) -> Result<Self> {
        let reader = search.open(path, DataKind::Ratings)?;
        Self::from_reader(reader, catalog)
    }

    /// Load from an already open source
    pub fn from_reader<R: BufRead>(reader: R, catalog: Arc<MovieCatalog>) -> Result<Self> {
        let mut ratings = Vec::new();
        let mut by_movie: HashMap<MovieId, Vec<usize>> = HashMap::new();

        parser::for_each_row(reader, DataKind::Ratings, |line_no, line| {
            if let Some(rating) = parser::parse_rating(line_no, line)? {
                by_movie
                    .entry(rating.movie_id.clone())
                    .or_default()
                    .push(ratings.len());
                ratings.push(rating);
            }
            Ok(())
        })?;

        info!(
            ratings = ratings.len(),
            rated_movies = by_movie.len(),
            "loaded rating index"
        );
        Ok(Self {
            catalog,
            ratings,
            by_movie,
        })
    }

    /// All ratings, in file order
    pub fn get_ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Ratings of one movie, in file order; empty if it has none
    pub fn get_movie_ratings(&self, movie_id: &str) -> Vec<&Rating> {
        self.by_movie
            .get(movie_id)
            .map(|positions| positions.iter().map(|&pos| &self.ratings[pos]).collect())
            .unwrap_or_default()
    }

    /// Ratings of every catalog movie whose title matches, ignoring case
    pub fn get_ratings_by_title(&self, title: &str) -> Vec<&Rating> {
        let folded = title.to_lowercase();
        self.ratings
            .iter()
            .filter(|r| self.catalog.title_matches(&r.movie_id, &folded))
            .collect()
    }

    /// Ratings of a user, in file order
    pub fn get_user_ratings<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Rating> {
        self.ratings.iter().filter(move |r| r.user_id == user_id)
    }

    fn values(&self, movie_id: &str) -> Vec<f64> {
        self.get_movie_ratings(movie_id)
            .into_iter()
            .map(|r| r.rating)
            .collect()
    }

    /// Mean rating of a movie, 0.0 if it has none
    pub fn get_average_rating(&self, movie_id: &str) -> f64 {
        mean(&self.values(movie_id))
    }

    /// Median rating of a movie, 0.0 if it has none
    pub fn get_median_rating(&self, movie_id: &str) -> f64 {
        median(&self.values(movie_id))
    }

    /// The `n` best scored movies, highest score first.
    ///
    /// `method` is `"mean"` or `"median"`; any other value scores nothing
    /// and the result is empty. Movies without ratings are left out. Equal
    /// scores keep catalog order.
    pub fn top_by_ratings(&self, n: usize, method: &str) -> Vec<(&Movie, f64)> {
        match method.parse::<ScoreMethod>() {
            Ok(method) => self.top_by(n, method),
            Err(reason) => {
                debug!(%reason, "no movie scored");
                Vec::new()
            }
        }
    }

    /// Same as [`top_by_ratings`](Self::top_by_ratings) with a parsed method
    pub fn top_by(&self, n: usize, method: ScoreMethod) -> Vec<(&Movie, f64)> {
        let mut scored: Vec<(&Movie, f64)> = self
            .catalog
            .get_movies()
            .iter()
            .filter_map(|movie| {
                let values = self.values(&movie.id);
                if values.is_empty() {
                    None
                } else {
                    Some((movie, method.score(&values)))
                }
            })
            .collect();

        // sort_by is stable: ties stay in catalog order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(n);
        scored
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES: &str = "movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
2,Jumanji (1995),Adventure|Children|Fantasy
3,Grumpier Old Men (1995),Comedy|Romance";

    const RATINGS: &str = "userId,movieId,rating,timestamp
1,1,4.5,1147880044
1,2,3.0,1147880044
2,1,5.0,1147880044";

    fn index(ratings: &str) -> RatingIndex {
        let catalog = Arc::new(MovieCatalog::from_reader(MOVIES.as_bytes()).unwrap());
        RatingIndex::from_reader(ratings.as_bytes(), catalog).unwrap()
    }

    #[test]
    fn test_load_fixture() {
        let index = index(RATINGS);
        assert_eq!(index.get_ratings().len(), 3);
        assert_eq!(index.get_movie_ratings("1").len(), 2);
        assert!(index.get_movie_ratings("invalid").is_empty());
    }

    #[test]
    fn test_average_rating() {
        let index = index(RATINGS);
        assert_eq!(index.get_average_rating("1"), 4.75);
        assert_eq!(index.get_average_rating("3"), 0.0);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[5.0, 3.0, 4.0]), 4.0);
        assert_eq!(median(&[4.0, 3.0]), 3.5);
        assert_eq!(median(&[]), 0.0);

        let index = index(RATINGS);
        assert_eq!(index.get_median_rating("1"), 4.75);
        assert_eq!(index.get_median_rating("2"), 3.0);
        assert_eq!(index.get_median_rating("3"), 0.0);
    }

    #[test]
    fn test_top_by_mean_skips_unrated() {
        let index = index(RATINGS);
        let top = index.top_by_ratings(10, "mean");

        let ids: Vec<&str> = top.iter().map(|(m, _)| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(top[0].1, 4.75);
    }

    #[test]
    fn test_top_truncates_to_n() {
        let index = index(RATINGS);
        let top = index.top_by_ratings(1, "median");
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].0.id, "1");
        assert!(index.top_by_ratings(0, "mean").is_empty());
    }

    #[test]
    fn test_top_unknown_method_is_empty() {
        let index = index(RATINGS);
        assert!(index.top_by_ratings(5, "mode").is_empty());
    }

    #[test]
    fn test_top_ties_keep_catalog_order() {
        let index = index(
            "userId,movieId,rating,timestamp
1,3,4.0,1
1,2,4.0,1
1,1,4.0,1",
        );
        let top = index.top_by(3, ScoreMethod::Mean);
        let ids: Vec<&str> = top.iter().map(|(m, _)| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_ratings_by_title_and_user() {
        let index = index(RATINGS);
        assert_eq!(index.get_ratings_by_title("TOY STORY (1995)").len(), 2);
        assert!(index.get_ratings_by_title("invalid").is_empty());
        assert_eq!(index.get_user_ratings("1").count(), 2);
    }

    #[test]
    fn test_bad_rating_aborts_load() {
        let catalog = Arc::new(MovieCatalog::default());
        let err = RatingIndex::from_reader(
            "userId,movieId,rating,timestamp\n1,1,4.0,1\n1,2,four,1".as_bytes(),
            catalog,
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.starts_with("Error loading ratings data"));
        assert!(msg.contains("line 3"));
    }

    #[test]
    fn test_short_rows_skipped() {
        let index = index("userId,movieId,rating,timestamp\n1,1,4.0\n\n1,2,3.5,1");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_padded_numbers_load() {
        let index = index("userId,movieId,rating,timestamp\n1,1, 4.5, 1147880044");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get_average_rating("1"), 4.5);
        assert_eq!(index.get_ratings()[0].timestamp, 1147880044);
    }

    #[test]
    fn test_score_method_parse() {
        assert_eq!("mean".parse::<ScoreMethod>(), Ok(ScoreMethod::Mean));
        assert_eq!("median".parse::<ScoreMethod>(), Ok(ScoreMethod::Median));
        assert!("Mean".parse::<ScoreMethod>().is_err());
        assert_eq!(ScoreMethod::Median.to_string(), "median");
    }
}
