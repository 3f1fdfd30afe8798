//! Integration tests for loading a dataset directory from disk.
//!
//! These write the small fixture tables into a temporary directory and
//! load them through the same path-based entry points the CLI uses.

use data_loader::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const MOVIES: &str = "movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
2,Jumanji (1995),Adventure|Children|Fantasy
3,Grumpier Old Men (1995),Comedy|Romance";

const RATINGS: &str = "userId,movieId,rating,timestamp
1,1,4.5,1147880044
1,2,3.0,1147880044
2,1,5.0,1147880044";

const TAGS: &str = "userId,movieId,tag,timestamp
1,1,pixar,1147880044
2,1,animation,1147880044
3,2,fantasy,1147880044";

const LINKS: &str = "movieId,imdbId,tmdbId
1,114709,862
2,113497,8844
3,113228,15602";

fn write_fixture(dir: &Path) {
    fs::write(dir.join("movies.csv"), MOVIES).unwrap();
    fs::write(dir.join("ratings.csv"), RATINGS).unwrap();
    fs::write(dir.join("tags.csv"), TAGS).unwrap();
    fs::write(dir.join("links.csv"), LINKS).unwrap();
}

fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    dir
}

#[test]
fn test_load_fixture_dataset() {
    let dir = fixture_dir();
    let data = Dataset::load(dir.path(), &SearchPaths::new()).unwrap();

    assert_eq!(data.counts(), (3, 3, 3, 3));
    assert_eq!(data.movies.get_movies().len(), 3);
    assert_eq!(data.ratings.get_ratings().len(), 3);
    assert_eq!(data.ratings.get_movie_ratings("1").len(), 2);
    assert_eq!(data.tags.get_movie_tags("1").len(), 2);
    assert_eq!(data.links.get_movie_links("1").unwrap().imdb_id, "114709");
}

#[test]
fn test_fixture_queries() {
    let dir = fixture_dir();
    let data = Dataset::load(dir.path(), &SearchPaths::new()).unwrap();

    assert_eq!(data.movies.get_movie("1").unwrap().title, "Toy Story (1995)");
    assert!(data.movies.get_genres().contains(&"Adventure".to_string()));
    let (min, max) = data.movies.get_year_range();
    assert_eq!(min.map(Year::as_str), Some("1995"));
    assert_eq!(max.map(Year::as_str), Some("1995"));
    assert_eq!(data.ratings.get_average_rating("1"), 4.75);
    assert_eq!(
        data.links.get_imdb_link("1"),
        "https://www.imdb.com/title/tt0114709/"
    );

    let top = data.ratings.top_by_ratings(5, "mean");
    assert_eq!(top.len(), 2);
    assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn test_lookups_on_invalid_id() {
    let dir = fixture_dir();
    let data = Dataset::load(dir.path(), &SearchPaths::new()).unwrap();

    assert!(data.movies.get_movie("invalid").is_none());
    assert!(data.ratings.get_movie_ratings("invalid").is_empty());
    assert!(data.tags.get_movie_tags("invalid").is_empty());
    assert!(data.links.get_movie_links("invalid").is_none());
    assert!(data.tags.get_tags_by_title("invalid").is_empty());
}

#[test]
fn test_file_found_under_search_root() {
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("ml")).unwrap();
    write_fixture(&root.path().join("ml"));

    // "ml" does not exist relative to the working directory of the test
    let search = SearchPaths::new().with_root("/nonexistent").with_root(root.path());
    let data = Dataset::load(Path::new("ml"), &search).unwrap();
    assert_eq!(data.counts(), (3, 3, 3, 3));
}

#[test]
fn test_missing_file_names_every_attempt() {
    let root = TempDir::new().unwrap();
    let search = SearchPaths::new().with_root(root.path());

    let err = MovieCatalog::from_path(Path::new("missing/movies.csv"), &search).unwrap_err();
    match &err {
        DataLoadError::NotFound { kind, tried, .. } => {
            assert_eq!(*kind, DataKind::Movies);
            assert_eq!(tried.len(), 2);
            assert_eq!(tried[1], root.path().join("missing/movies.csv"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(err.to_string().starts_with("Failed to load movies data"));
}

#[test]
fn test_missing_table_aborts_dataset_load() {
    let dir = fixture_dir();
    fs::remove_file(dir.path().join("tags.csv")).unwrap();

    let err = Dataset::load(dir.path(), &SearchPaths::new()).unwrap_err();
    assert_eq!(err.kind(), DataKind::Tags);
}

#[test]
fn test_bad_value_discards_whole_load() {
    let dir = fixture_dir();
    fs::write(
        dir.path().join("ratings.csv"),
        "userId,movieId,rating,timestamp\n1,1,4.5,1\n1,2,3.0,1\n1,3,x,1\n",
    )
    .unwrap();

    let search = SearchPaths::new();
    let movies = MovieCatalog::from_path(&dir.path().join("movies.csv"), &search).unwrap();
    let err = RatingIndex::from_path(&dir.path().join("ratings.csv"), &search, Arc::new(movies))
        .unwrap_err();

    assert!(matches!(
        err,
        DataLoadError::InvalidLine {
            kind: DataKind::Ratings,
            line: 4,
            ..
        }
    ));
}

#[test]
fn test_directory_in_place_of_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("links.csv")).unwrap();

    let catalog = Arc::new(MovieCatalog::default());
    let result = LinkIndex::from_path(&dir.path().join("links.csv"), &SearchPaths::new(), catalog);
    assert!(matches!(result, Err(DataLoadError::Io { kind: DataKind::Links, .. })));
}
