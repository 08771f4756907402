//! Phrase-to-playlist CLI library
//!
//! This library turns a phrase into a sequence of Spotify tracks whose titles,
//! read in order, spell the phrase out, and then saves those tracks to a new
//! public playlist.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback listener
//! - `cli` - The end-to-end pipeline driven by the binary
//! - `config` - Settings from environment variables and `.env` files
//! - `credentials` - The two-line client credential file
//! - `phrase` - Sanitizing raw input into word tokens
//! - `resolver` - Matching word windows to track titles
//! - `server` - Local HTTP listener for the OAuth redirect
//! - `spotify` - Spotify Web API client
//! - `types` - Data structures and wire schemas
//! - `utils` - Small helpers
//!
//! # Example
//!
//! ```
//! use phraselist::{phrase::Phrase, resolver};
//!
//! # async fn run(ctx: phraselist::spotify::SpotifyContext) -> phraselist::Res<()> {
//! let phrase = Phrase::sanitize("Good life!");
//! let resolution = resolver::resolve(&ctx, &phrase).await?;
//! println!("{} tracks", resolution.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod phrase;
pub mod resolver;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the top-level pipeline where errors from configuration, the
/// callback listener and the Spotify client meet. Module-level operations
/// return their own typed errors.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue circle indicator.
///
/// # Example
///
/// ```
/// info!("Searching for {} windows", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist created");
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates with exit code 1. Only the binary and the CLI pipeline use it;
/// library operations return errors instead.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
