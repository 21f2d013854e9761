//! One end-to-end run: load, render, summarize, export.
//!
//! Output goes to two sinks. `out` receives the feed itself plus the cache
//! and export notices; `diag` receives warnings and failures. The binary maps
//! them to stdout and stderr.

use std::io::{BufRead, Write};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::cache::FeedCache;
use crate::config::Config;
use crate::error::Result;
use crate::export::export_json;
use crate::feed::{FeedProcessor, FeedReport};
use crate::github::{GitHubClient, GitHubError};
use crate::interactive::prompt_session;
use crate::sink::{OutputLine, Sink};
use crate::source::{FeedOrigin, FeedSource};
use crate::theme::Theme;
use crate::types::decode_events;

/// Per-run options from flags or the interactive session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// GitHub username whose feed is shown.
    pub username: String,

    /// Event type filter (case-insensitive substring).
    pub filter: Option<String>,

    /// Write the JSON export after rendering.
    pub export: bool,

    /// Skip fresh cache entries and always hit the API.
    pub no_cache: bool,
}

/// Outcome of a run.
#[derive(Debug)]
pub struct RunReport {
    /// Where the events came from, `None` if loading failed.
    pub origin: Option<FeedOrigin>,

    /// The loading failure, if any.
    pub fetch_error: Option<GitHubError>,

    /// What the feed processor emitted.
    pub feed: FeedReport,

    /// Number of exported events, when an export was written.
    pub exported: Option<usize>,
}

/// Loads the configuration from the environment. A `token` given on the
/// command line replaces `GITHUB_TOKEN`.
///
/// # Errors
///
/// Returns [`FeedError::Config`](crate::error::FeedError::Config) if an
/// environment variable holds an invalid value.
pub fn load_config(token: Option<String>) -> Result<Config> {
    let mut config = Config::from_env()?;
    if token.is_some() {
        config.token = token;
    }
    Ok(config)
}

/// Asks for the run options interactively. A token answered in the session
/// replaces the configured one; a blank answer keeps it.
///
/// # Errors
///
/// Returns [`FeedError::Interactive`](crate::error::FeedError::Interactive)
/// on I/O failure, early end of input, or a blank username.
pub fn interactive_options<R: BufRead, W: Write>(
    config: &mut Config,
    input: &mut R,
    output: &mut W,
) -> Result<RunOptions> {
    let answers = prompt_session(input, output)?;
    if let Some(token) = answers.token.clone() {
        config.token = Some(token);
    }
    Ok(RunOptions::from(answers))
}

/// Runs the whole pipeline for `options.username`.
///
/// Fetch failures are reported on `diag` and yield an empty feed; they do not
/// make the run fail.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be constructed.
pub async fn run<O, D>(
    config: &Config,
    options: &RunOptions,
    theme: Theme,
    out: &mut O,
    diag: &mut D,
    now: DateTime<Utc>,
) -> Result<RunReport>
where
    O: Sink + ?Sized,
    D: Sink + ?Sized,
{
    let client = GitHubClient::new(config.api_url.clone(), config.token.clone(), config.timeout)?;
    let source = FeedSource::new(client)
        .with_cache(FeedCache::new(config.cache_dir.clone(), config.cache_ttl))
        .read_cache(!options.no_cache);

    let processor = FeedProcessor::new(now)
        .with_filter(options.filter.as_deref())
        .with_theme(theme);

    let loaded = match source.load(&options.username, now).await {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!(username = %options.username, error = %e, "Failed to load events");
            diag.emit(OutputLine::plain(e.user_message()));
            let feed = processor.process(&[], out);
            return Ok(RunReport {
                origin: None,
                fetch_error: Some(e),
                feed,
                exported: None,
            });
        }
    };

    if let Some(warning) = loaded.rate_limit_warning() {
        diag.emit(OutputLine::plain(warning));
    }
    if let FeedOrigin::OfflineCache { reason } = &loaded.origin {
        diag.emit(OutputLine::plain(reason.clone()));
    }
    if let Some(notice) = loaded.notice(&options.username) {
        out.emit(OutputLine::plain(notice));
    }

    let events = decode_events(&loaded.events);
    let feed = processor.process(&events, out);

    let exported = if options.export {
        match export_json(&loaded.events, &config.export_path) {
            Ok(count) => {
                out.emit(OutputLine::plain(format!(
                    "Exported events to {}",
                    config.export_path.display()
                )));
                Some(count)
            }
            Err(e) => {
                diag.emit(OutputLine::plain(format!("Error saving file: {e}")));
                None
            }
        }
    } else {
        None
    };

    info!(
        username = %options.username,
        origin = ?loaded.origin,
        emitted = feed.emitted,
        issues = feed.issues.len(),
        "Run complete"
    );

    Ok(RunReport {
        origin: Some(loaded.origin),
        fetch_error: None,
        feed,
        exported,
    })
}
