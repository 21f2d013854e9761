//! gh-feed - GitHub public activity in your terminal.
//!
//! Shows the most recent public events of a GitHub user as colored,
//! time-relative lines followed by a per-type summary.
//!
//! # Environment Variables
//!
//! See the [`config`](gh_feed::config) module for available configuration
//! options.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gh_feed::app::{self, RunOptions};
use gh_feed::sink::TerminalSink;
use gh_feed::theme::Theme;

/// gh-feed - GitHub public activity in your terminal.
///
/// Fetches a user's public events and prints the latest seven with a summary.
#[derive(Parser, Debug)]
#[command(name = "gh-feed")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    GITHUB_TOKEN            Token for authenticated requests
    GH_FEED_API_URL         API base URL (default: https://api.github.com)
    GH_FEED_CACHE_DIR       Cache directory (default: user cache dir)
    GH_FEED_CACHE_TTL_SECS  Cache freshness in seconds (default: 300)
    GH_FEED_EXPORT_PATH     Export file for --json (default: activity.json)
    GH_FEED_TIMEOUT_SECS    HTTP timeout in seconds (default: 30)
    NO_COLOR                Disable colored output

EXAMPLES:
    # Show recent activity
    gh-feed octocat

    # Only pushes, and save the raw events
    gh-feed octocat --filter push --json

    # Answer prompts instead of passing flags
    gh-feed --interactive
")]
struct Cli {
    /// GitHub username.
    #[arg(required_unless_present = "interactive")]
    username: Option<String>,

    /// Only show events whose type contains this text (case-insensitive).
    #[arg(short, long, value_name = "TYPE")]
    filter: Option<String>,

    /// Export the first seven raw events to a JSON file.
    #[arg(long)]
    json: bool,

    /// GitHub token (overrides GITHUB_TOKEN).
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Ignore fresh cache entries and always query the API.
    #[arg(long)]
    no_cache: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,

    /// Log debug diagnostics to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Prompt for all options.
    #[arg(short, long, conflicts_with_all = ["username", "filter", "json", "token"])]
    interactive: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = app::load_config(cli.token.clone()).context("Failed to load configuration")?;

    let options = if cli.interactive {
        RunOptions {
            no_cache: cli.no_cache,
            ..app::interactive_options(&mut config, &mut io::stdin().lock(), &mut io::stdout())
                .context("Interactive session failed")?
        }
    } else {
        RunOptions {
            username: cli.username.unwrap_or_default(),
            filter: cli.filter,
            export: cli.json,
            no_cache: cli.no_cache,
        }
    };

    let theme = if cli.no_color || !io::stdout().is_terminal() {
        Theme::monochrome()
    } else {
        Theme::from_env()
    };

    debug!(?options, colored = theme.is_colored(), "Starting run");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let mut out = TerminalSink::new(io::stdout().lock());
    let mut diag = TerminalSink::new(io::stderr());

    runtime
        .block_on(app::run(
            &config,
            &options,
            theme,
            &mut out,
            &mut diag,
            Utc::now(),
        ))
        .context("Run failed")?;

    out.finish().context("Failed to write output")?;
    diag.finish().context("Failed to write diagnostics")?;

    Ok(())
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_username_and_flags() {
        let cli = Cli::try_parse_from([
            "gh-feed", "octocat", "--filter", "push", "--json", "--token", "t", "--no-cache",
        ])
        .unwrap();

        assert_eq!(cli.username.as_deref(), Some("octocat"));
        assert_eq!(cli.filter.as_deref(), Some("push"));
        assert!(cli.json);
        assert_eq!(cli.token.as_deref(), Some("t"));
        assert!(cli.no_cache);
        assert!(!cli.interactive);
    }

    #[test]
    fn username_is_required_without_interactive() {
        assert!(Cli::try_parse_from(["gh-feed"]).is_err());
        assert!(Cli::try_parse_from(["gh-feed", "--interactive"]).is_ok());
    }

    #[test]
    fn interactive_conflicts_with_username() {
        assert!(Cli::try_parse_from(["gh-feed", "octocat", "--interactive"]).is_err());
    }
}
