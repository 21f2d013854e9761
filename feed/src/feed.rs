//! The feed processor.
//!
//! Walks an event sequence in order, applies the optional type filter, stops
//! after [`DISPLAY_CAP`] emitted lines, and sends every rendered line to a
//! [`Sink`] followed by the summary block.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use gh_feed::feed::FeedProcessor;
//! use gh_feed::sink::OutputLine;
//! use gh_feed::theme::Theme;
//! use gh_feed::types::decode_events;
//! use serde_json::json;
//!
//! let events = decode_events(&[
//!     json!({"type": "WatchEvent", "repo": {"name": "octocat/Hello-World"}}),
//! ]);
//!
//! let mut out: Vec<OutputLine> = Vec::new();
//! let report = FeedProcessor::new(Utc::now())
//!     .with_theme(Theme::monochrome())
//!     .process(&events, &mut out);
//!
//! assert_eq!(report.emitted, 1);
//! assert_eq!(out[0].text, "- Starred octocat/Hello-World");
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::classify::classify;
use crate::render::{render_line, RenderError};
use crate::sink::{OutputLine, Sink};
use crate::summary::{report_summary, SummaryCounters};
use crate::theme::Theme;
use crate::types::Event;

/// Maximum number of activity lines shown per run.
pub const DISPLAY_CAP: usize = 7;

/// Notice emitted when the input sequence is empty.
pub const NO_ACTIVITY_NOTICE: &str = "No recent public activity found.";

/// Result of one processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedReport {
    /// Number of activity lines emitted.
    pub emitted: usize,

    /// Statistics over the emitted events.
    pub counters: SummaryCounters,

    /// Per-event anomalies, in emission order.
    pub issues: Vec<RenderError>,
}

/// Renders an event sequence into activity lines and a summary.
#[derive(Debug, Clone)]
pub struct FeedProcessor {
    now: DateTime<Utc>,
    filter: Option<String>,
    theme: Theme,
}

impl FeedProcessor {
    /// Creates a processor that formats ages relative to `now`.
    ///
    /// No filter, default (colored) theme.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            filter: None,
            theme: Theme::default(),
        }
    }

    /// Keeps only events whose type contains `filter`, ignoring case.
    ///
    /// `None` and the empty string both disable filtering.
    #[must_use]
    pub fn with_filter<S: AsRef<str>>(mut self, filter: Option<S>) -> Self {
        self.filter = filter
            .map(|f| f.as_ref().to_lowercase())
            .filter(|f| !f.is_empty());
        self
    }

    /// Sets the color theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns `true` if `event` passes the filter.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        match &self.filter {
            Some(filter) => event.event_type.to_lowercase().contains(filter.as_str()),
            None => true,
        }
    }

    /// Processes `events`, sending every output line to `sink`.
    ///
    /// Empty input yields the [`NO_ACTIVITY_NOTICE`] and no summary. When a
    /// filter rejects every event nothing at all is emitted.
    pub fn process<S: Sink + ?Sized>(&self, events: &[Event], sink: &mut S) -> FeedReport {
        let mut report = FeedReport::default();

        if events.is_empty() {
            sink.emit(OutputLine::plain(NO_ACTIVITY_NOTICE));
            return report;
        }

        for event in events.iter().filter(|e| self.matches(e)).take(DISPLAY_CAP) {
            let rule = classify(&event.event_type);
            let line = render_line(event, rule, self.now);

            sink.emit(OutputLine::colored(line.text, self.theme.color_for(rule)));
            report.counters.record(event, rule);
            report.issues.extend(line.issues);
            report.emitted += 1;
        }

        debug!(
            input = events.len(),
            emitted = report.emitted,
            issues = report.issues.len(),
            "Processed feed"
        );

        if report.emitted > 0 {
            report_summary(&report.counters, sink);
        }

        report
    }
}
