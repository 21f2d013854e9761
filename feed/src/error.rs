//! Error types for gh-feed.
//!
//! Each module owns its error enum. [`FeedError`] wraps the ones that end a
//! run: cache, export and rendering problems are logged or reported on the
//! diagnostics sink instead and never reach it.

use thiserror::Error;

use crate::config::ConfigError;
use crate::github::GitHubError;
use crate::interactive::InteractiveError;

/// Errors that can occur during a gh-feed run.
///
/// # Examples
///
/// ```
/// use gh_feed::error::{FeedError, Result};
/// use gh_feed::config::ConfigError;
///
/// fn check() -> Result<()> {
///     Err(ConfigError::InvalidValue {
///         key: "GH_FEED_TIMEOUT_SECS".to_string(),
///         message: "value must be greater than 0".to_string(),
///     }
///     .into())
/// }
///
/// assert!(matches!(check(), Err(FeedError::Config(_))));
/// ```
#[derive(Error, Debug)]
pub enum FeedError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    /// Interactive prompt failed.
    #[error("interactive error: {0}")]
    Interactive(#[from] InteractiveError),
}

/// A specialized `Result` type for gh-feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
