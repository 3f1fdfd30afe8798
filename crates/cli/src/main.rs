use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use data_loader::{Dataset, ScoreMethod, SearchPaths, Year, imdb_url};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};

/// movielens - query a MovieLens "latest" dataset
#[derive(Parser)]
#[command(name = "movielens")]
#[command(about = "Look up movies, ratings, tags and links in a MovieLens dataset")]
#[command(long_about = None)]
struct Cli {
    /// Directory holding movies.csv, ratings.csv, tags.csv and links.csv
    #[arg(
        short,
        long,
        env = "MOVIELENS_DATA_DIR",
        default_value = "datasets/ml-latest-small"
    )]
    data_dir: PathBuf,

    /// Extra directory to look for the data files in (repeatable).
    /// Defaults to the parent of the working directory and the directory
    /// of this executable.
    #[arg(long = "search-root", value_name = "DIR")]
    search_roots: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Best rated movies
    Top {
        /// Number of movies to show
        #[arg(default_value_t = 5)]
        n: usize,

        /// Scoring method: mean or median
        #[arg(default_value = "mean")]
        method: String,
    },

    /// Details of one movie
    Movie {
        /// Movie id or exact title (case-insensitive)
        key: Option<String>,
    },

    /// Movies whose genres contain a string
    Genre { genre: Option<String> },

    /// Movies released in a year
    Year { year: Option<String> },

    /// Every rating a user gave
    User { user_id: Option<String> },

    /// Movies with a tag containing a string (case-insensitive)
    Tag { tag: Option<String> },

    /// IMDb page of a movie
    Imdb {
        /// Movie id or exact title (case-insensitive)
        key: Option<String>,
    },

    /// Table sizes and year range
    Stats,

    /// Year range of the catalog
    Years,

    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    let search = search_paths(cli.search_roots)?;
    let start = Instant::now();
    let data = Dataset::load(&cli.data_dir, &search).with_context(|| {
        format!("Failed to load MovieLens dataset from {}", cli.data_dir.display())
    })?;
    info!("Loaded dataset in {:?}", start.elapsed());

    // Dispatch to appropriate command handler
    let code = match command {
        Commands::Top { n, method } => handle_top(&data, n, &method),
        Commands::Movie { key } => with_arg(key, "Provide movie ID or title", |key| {
            handle_movie(&data, key)
        }),
        Commands::Genre { genre } => with_arg(genre, "Provide genre", |genre| {
            handle_genre(&data, genre)
        }),
        Commands::Year { year } => handle_year(&data, year.as_deref()),
        Commands::User { user_id } => with_arg(user_id, "Provide user ID", |user_id| {
            handle_user(&data, user_id)
        }),
        Commands::Tag { tag } => with_arg(tag, "Provide tag", |tag| handle_tag(&data, tag)),
        Commands::Imdb { key } => with_arg(key, "Provide IMDB id or movie title", |key| {
            handle_imdb(&data, key)
        }),
        Commands::Stats => handle_stats(&data),
        Commands::Years => handle_years(&data),
        Commands::Unknown(args) => handle_unknown(&args),
    };

    Ok(code)
}

/// Explicit roots from the command line, or the two default fallbacks
fn search_paths(roots: Vec<PathBuf>) -> Result<SearchPaths> {
    if !roots.is_empty() {
        return Ok(roots.into_iter().collect());
    }

    let mut search = SearchPaths::new().with_root("..");
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    if let Some(dir) = exe.parent() {
        search = search.with_root(dir);
    }
    Ok(search)
}

/// Run `handler` on a required argument, or print `usage` and fail
fn with_arg(arg: Option<String>, usage: &str, handler: impl FnOnce(&str) -> ExitCode) -> ExitCode {
    match arg {
        Some(arg) => handler(&arg),
        None => {
            println!("{}", usage);
            ExitCode::FAILURE
        }
    }
}

/// Handle the 'top' command
///
/// An unknown method scores no movie and prints nothing.
fn handle_top(data: &Dataset, n: usize, method: &str) -> ExitCode {
    let Ok(method) = method.parse::<ScoreMethod>() else {
        debug!(method, "unknown score method");
        return ExitCode::SUCCESS;
    };

    for (movie, score) in data.ratings.top_by(n, method) {
        println!("{} - {}: {:.2}", movie.title, method, score);
    }
    ExitCode::SUCCESS
}

/// Handle the 'movie' command
fn handle_movie(data: &Dataset, key: &str) -> ExitCode {
    let Some(movie) = data
        .movies
        .get_movie(key)
        .or_else(|| data.movies.get_movie_by_title(key))
    else {
        println!("{}", "Movie not found".red());
        return ExitCode::FAILURE;
    };

    let year = movie.year.as_deref().unwrap_or("unknown");
    let tags: Vec<&str> = data
        .tags
        .get_movie_tags(&movie.id)
        .iter()
        .map(|t| t.tag.as_str())
        .collect();

    println!("{} {}", "Title:".bold(), movie.title);
    println!("{} {}", "Genres:".bold(), movie.genre_string());
    println!("{} {}", "Year:".bold(), year);
    let average = data.ratings.get_average_rating(&movie.id);
    let median = data.ratings.get_median_rating(&movie.id);
    println!("{} {:.2}", "Average rating:".bold(), average);
    println!("{} {:.2}", "Median rating:".bold(), median);
    println!("{} {}", "IMDB:".bold(), data.links.get_imdb_link(&movie.id));
    println!("{} {:?}", "Tags:".bold(), tags);
    ExitCode::SUCCESS
}

/// Handle the 'genre' command
fn handle_genre(data: &Dataset, genre: &str) -> ExitCode {
    for movie in data.movies.get_movies() {
        if movie.genre_string().contains(genre) {
            println!("{}", movie.title);
        }
    }
    ExitCode::SUCCESS
}

/// Handle the 'year' command
///
/// Without a year, prints the valid range and fails.
fn handle_year(data: &Dataset, year: Option<&str>) -> ExitCode {
    let Some(year) = year else {
        let (min, max) = data.movies.get_year_range();
        println!("Provide year between {} and {}", fmt_year(min), fmt_year(max));
        return ExitCode::FAILURE;
    };

    let movies: Vec<_> = data.movies.get_movies_by_year(year).collect();

    for movie in &movies {
        println!("{}", movie.title);
    }
    if movies.is_empty() {
        println!("No movies for {}", year);
    } else {
        println!("Total movies for {}: {}", year, movies.len());
    }
    ExitCode::SUCCESS
}

/// Handle the 'user' command
fn handle_user(data: &Dataset, user_id: &str) -> ExitCode {
    for rating in data.ratings.get_user_ratings(user_id) {
        if let Some(movie) = data.movies.get_movie(&rating.movie_id) {
            println!("{}: {:?}", movie.title, rating.rating);
        }
    }
    ExitCode::SUCCESS
}

/// Handle the 'tag' command
fn handle_tag(data: &Dataset, tag: &str) -> ExitCode {
    for t in data.tags.search(tag) {
        if let Some(movie) = data.movies.get_movie(&t.movie_id) {
            println!("{}", movie.title);
        }
    }
    ExitCode::SUCCESS
}

/// Handle the 'imdb' command
fn handle_imdb(data: &Dataset, key: &str) -> ExitCode {
    let link = data
        .links
        .get_movie_links(key)
        .or_else(|| data.links.get_link_by_title(key));

    match link {
        Some(link) => println!("IMDB: {}", imdb_url(link)),
        None => println!("{}", "Not found".red()),
    }
    ExitCode::SUCCESS
}

/// Handle the 'stats' command
fn handle_stats(data: &Dataset) -> ExitCode {
    let (movies, ratings, tags, _) = data.counts();
    let (min, max) = data.movies.get_year_range();

    println!("Movies: {}", movies);
    println!("Ratings: {}", ratings);
    println!("Tags: {}", tags);
    println!("Years: {} - {}", fmt_year(min), fmt_year(max));
    ExitCode::SUCCESS
}

/// Handle the 'years' command
fn handle_years(data: &Dataset) -> ExitCode {
    let (min, max) = data.movies.get_year_range();
    println!("Years: {} - {}", fmt_year(min), fmt_year(max));
    ExitCode::SUCCESS
}

/// Handle an unrecognised command: report it, but do not fail
fn handle_unknown(args: &[String]) -> ExitCode {
    debug!(?args, "unknown command");
    println!("Unknown command");
    ExitCode::SUCCESS
}

fn fmt_year(year: Option<&Year>) -> &str {
    year.map(Year::as_str).unwrap_or("unknown")
}
