//! gh-feed - GitHub public activity in your terminal.
//!
//! This crate fetches a user's public GitHub events and renders them as
//! short, colored, time-relative activity lines followed by a summary.
//!
//! # Overview
//!
//! The core pipeline is pure and synchronous: raw JSON records are decoded
//! into [`Event`]s, each event is classified by its type tag, rendered with
//! the matching template, and counted. The current time and the color policy
//! are passed in, so output is fully deterministic under test.
//!
//! Around the core sit the collaborators that produce and consume the raw
//! records: the GitHub API client, a per-user disk cache, and the JSON export.
//!
//! # Modules
//!
//! - [`types`]: Event records and tolerant decoding
//! - [`classify`]: Type tag to rendering rule lookup table
//! - [`render`]: Per-event line templates
//! - [`feed`]: Filter, cap, render, and summarize a feed
//! - [`summary`]: Per-type counters and the summary block
//! - [`theme`]: Color on/off policy
//! - [`sink`]: Output destinations for rendered lines
//! - [`github`]: HTTP client for the public events API
//! - [`cache`]: Per-user on-disk cache
//! - [`source`]: Cache / network / offline fallback orchestration
//! - [`export`]: JSON export of the raw feed
//! - [`interactive`]: Prompt session for interactive mode
//! - [`config`]: Configuration from environment variables
//! - [`app`]: End-to-end run used by the binary
//! - [`error`]: Error types
//! - [`utils`]: Shared helpers (relative time, capitalization)

pub mod app;
pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod feed;
pub mod github;
pub mod interactive;
pub mod render;
pub mod sink;
pub mod source;
pub mod summary;
pub mod theme;
pub mod types;
pub mod utils;

pub use app::{interactive_options, load_config, run, RunOptions, RunReport};
pub use cache::{CacheError, FeedCache};
pub use classify::{classify, EventKind, EventTypeRule};
pub use config::{Config, ConfigError};
pub use error::{FeedError, Result};
pub use export::{export_json, ExportError};
pub use feed::{FeedProcessor, FeedReport, DISPLAY_CAP, NO_ACTIVITY_NOTICE};
pub use github::{FetchedEvents, GitHubClient, GitHubError};
pub use render::{render_line, RenderError, RenderedLine};
pub use sink::{OutputLine, Sink, TerminalSink};
pub use source::{FeedOrigin, FeedSource, LoadedFeed};
pub use summary::{report_summary, SummaryCounters};
pub use theme::Theme;
pub use types::{decode_events, Event, Repo};
pub use utils::time_ago;
