//! # Data Loader Crate
//!
//! Loads the MovieLens "latest" CSV tables into memory and answers lookup
//! and aggregation queries over them.
//!
//! ## Main Components
//!
//! - **catalog**: `MovieCatalog`, the movies table (genres, year range)
//! - **links**: `LinkIndex`, IMDb/TMDb ids and IMDb URLs
//! - **ratings**: `RatingIndex`, mean/median scores and top-N ranking
//! - **tags**: `TagIndex`, user tags per movie
//! - **source**: locating files under configurable search roots
//! - **parser**: row parsing for the four tables
//! - **dataset**: loading all four tables from one directory
//!
//! Every index is built once and is read-only afterwards. The link, rating
//! and tag indexes share the catalog through an `Arc` to resolve titles.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Dataset, SearchPaths};
//! use std::path::Path;
//!
//! let data = Dataset::load(Path::new("datasets/ml-latest-small"), &SearchPaths::new())?;
//!
//! for (movie, score) in data.ratings.top_by_ratings(5, "mean") {
//!     println!("{} - mean: {:.2}", movie.title, score);
//! }
//! println!("{}", data.links.get_imdb_link("1"));
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod source;
pub mod catalog;
pub mod links;
pub mod ratings;
pub mod tags;
pub mod dataset;

// Re-export commonly used types for convenience
pub use catalog::MovieCatalog;
pub use dataset::Dataset;
pub use error::{DataLoadError, Result};
pub use links::{LinkIndex, imdb_url};
pub use ratings::{RatingIndex, ScoreMethod};
pub use source::SearchPaths;
pub use tags::TagIndex;
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Records
    DataKind,
    Link,
    Movie,
    Rating,
    Tag,
    Year,
};
