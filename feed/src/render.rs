//! Line rendering for individual events.
//!
//! A line is built in two steps: the rule's template produces the body from
//! the event's payload, then the relative-age suffix is appended:
//!
//! ```text
//! - Pushed 3 commits to octocat/Hello-World (2h ago)
//! ```
//!
//! Rendering never fails. Missing payload fields are replaced with
//! [`PLACEHOLDER`] and a malformed timestamp drops the suffix; both are
//! recorded as [`RenderError`]s on the returned [`RenderedLine`] and logged.

use chrono::{DateTime, Utc};
use crossterm::style::Color;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::classify::{EventKind, EventTypeRule};
use crate::types::Event;
use crate::utils::time_ago;

/// Value substituted for a missing payload field.
pub const PLACEHOLDER: &str = "unknown";

/// Prefix of every activity line.
pub const LINE_PREFIX: &str = "- ";

/// Builds a line body from an event's fields.
pub type Template = fn(&mut Fields<'_>) -> String;

/// Per-event rendering anomalies. None of these abort processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// `created_at` could not be parsed as an ISO-8601 UTC timestamp.
    #[error("malformed timestamp '{value}': {source}")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A recognized event type lacks a payload field its template needs.
    #[error("{event_type} is missing required field '{field}'")]
    MissingRequiredField { event_type: String, field: String },
}

/// One rendered activity line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Kind of the source event.
    pub kind: EventKind,

    /// Display color from the event's rule.
    pub color: Color,

    /// Full line text including the `"- "` prefix, without color codes.
    pub text: String,

    /// Anomalies encountered while rendering this line.
    pub issues: Vec<RenderError>,
}

/// Read access to an event's fields for templates.
///
/// Every failed lookup is recorded so the renderer can report it.
#[derive(Debug)]
pub struct Fields<'a> {
    event: &'a Event,
    missing: Vec<String>,
}

impl<'a> Fields<'a> {
    fn new(event: &'a Event) -> Self {
        Self {
            event,
            missing: Vec::new(),
        }
    }

    /// The repository `owner/name`.
    #[must_use]
    pub fn repo(&self) -> &'a str {
        self.event.repo_name()
    }

    /// The raw event type tag.
    #[must_use]
    pub fn event_type(&self) -> &'a str {
        &self.event.event_type
    }

    /// Reads a string at `path` inside the payload, or [`PLACEHOLDER`].
    pub fn text(&mut self, path: &[&str]) -> &'a str {
        match self.lookup(path).and_then(Value::as_str) {
            Some(value) => value,
            None => {
                self.record_missing(path);
                PLACEHOLDER
            }
        }
    }

    /// Reads a non-empty string at `path`, else at `fallback`, else
    /// [`PLACEHOLDER`]. Only `path` is reported as missing.
    pub fn text_or(&mut self, path: &[&str], fallback: &[&str]) -> &'a str {
        let found = [path, fallback].into_iter().find_map(|p| {
            self.lookup(p)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        });

        match found {
            Some(value) => value,
            None => {
                self.record_missing(path);
                PLACEHOLDER
            }
        }
    }

    /// Number of commits in a push: `commits.len()`, else `size`.
    pub fn commit_count(&mut self) -> Option<usize> {
        if let Some(commits) = self.lookup(&["commits"]).and_then(Value::as_array) {
            return Some(commits.len());
        }
        if let Some(size) = self
            .lookup(&["size"])
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
        {
            return Some(size);
        }
        self.record_missing(&["commits"]);
        None
    }

    fn lookup(&self, path: &[&str]) -> Option<&'a Value> {
        let event: &'a Event = self.event;
        path.iter()
            .try_fold(&event.payload, |value, key| value.get(key))
    }

    fn record_missing(&mut self, path: &[&str]) {
        self.missing.push(format!("payload.{}", path.join(".")));
    }

    fn into_issues(self) -> Vec<RenderError> {
        let event_type = &self.event.event_type;
        self.missing
            .into_iter()
            .map(|field| RenderError::MissingRequiredField {
                event_type: event_type.clone(),
                field,
            })
            .collect()
    }
}

/// Renders one event with its rule.
///
/// `now` is the reference instant for the relative-age suffix.
pub fn render_line(event: &Event, rule: &EventTypeRule, now: DateTime<Utc>) -> RenderedLine {
    let mut fields = Fields::new(event);
    let body = (rule.template)(&mut fields);
    let mut issues = fields.into_issues();

    let age = event
        .timestamp()
        .and_then(|ts| match time_ago(ts, now) {
            Ok(age) => Some(age),
            Err(e) => {
                issues.push(e);
                None
            }
        });

    for issue in &issues {
        warn!(
            event_type = %event.event_type,
            repo = %event.repo_name(),
            issue = %issue,
            "Rendering anomaly"
        );
    }

    let text = match age {
        Some(age) => format!("{LINE_PREFIX}{body} ({age})"),
        None => format!("{LINE_PREFIX}{body}"),
    };

    RenderedLine {
        kind: rule.kind,
        color: rule.color,
        text,
        issues,
    }
}

/// Line body templates, one per rule.
pub(crate) mod templates {
    use super::Fields;
    use crate::utils::capitalize_first;

    pub(crate) fn push(f: &mut Fields<'_>) -> String {
        match f.commit_count() {
            Some(n) => format!(
                "Pushed {n} commit{} to {}",
                if n > 1 { "s" } else { "" },
                f.repo()
            ),
            None => format!("Pushed {} commits to {}", super::PLACEHOLDER, f.repo()),
        }
    }

    pub(crate) fn issues(f: &mut Fields<'_>) -> String {
        let action = capitalize_first(f.text(&["action"]));
        format!("{action} an issue in {}", f.repo())
    }

    pub(crate) fn watch(f: &mut Fields<'_>) -> String {
        format!("Starred {}", f.repo())
    }

    pub(crate) fn create(f: &mut Fields<'_>) -> String {
        let ref_type = f.text(&["ref_type"]);
        format!("Created a new {ref_type} in {}", f.repo())
    }

    pub(crate) fn fork(f: &mut Fields<'_>) -> String {
        let forkee = f.text(&["forkee", "full_name"]);
        format!("Forked {} to {forkee}", f.repo())
    }

    pub(crate) fn pull_request(f: &mut Fields<'_>) -> String {
        let action = capitalize_first(f.text(&["action"]));
        format!("{action} a pull request in {}", f.repo())
    }

    pub(crate) fn review_comment(f: &mut Fields<'_>) -> String {
        format!("Commented on a pull request in {}", f.repo())
    }

    pub(crate) fn delete(f: &mut Fields<'_>) -> String {
        let ref_type = f.text(&["ref_type"]);
        let git_ref = f.text(&["ref"]);
        format!("Deleted {ref_type} '{git_ref}' in {}", f.repo())
    }

    pub(crate) fn release(f: &mut Fields<'_>) -> String {
        let action = capitalize_first(f.text(&["action"]));
        let name = f.text_or(&["release", "name"], &["release", "tag_name"]);
        format!("{action} release '{name}' in {}", f.repo())
    }

    pub(crate) fn fallback(f: &mut Fields<'_>) -> String {
        format!("{} in {}", f.event_type(), f.repo())
    }
}
