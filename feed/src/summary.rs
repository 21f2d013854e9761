//! Summary statistics for a processed feed.
//!
//! [`SummaryCounters`] accumulates one record per emitted event; the
//! [`report_summary`] function renders the totals as the closing block:
//!
//! ```text
//!
//! Summary:
//! - push commit: 3
//! - repo starred: 1
//! - Activity in 2 repos
//! ```

use std::collections::HashSet;

use crate::classify::EventTypeRule;
use crate::sink::{OutputLine, Sink};
use crate::types::Event;

/// Header line of the summary block.
pub const SUMMARY_HEADER: &str = "Summary:";

/// Count for one event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    /// Raw event type tag.
    pub event_type: String,

    /// Label shown in the summary.
    pub label: String,

    /// Number of emitted events of this type.
    pub count: usize,
}

/// Per-type counts in first-seen order, plus distinct repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryCounters {
    counts: Vec<TypeCount>,
    repos: HashSet<String>,
}

impl SummaryCounters {
    /// Creates empty counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one emitted event.
    pub fn record(&mut self, event: &Event, rule: &EventTypeRule) {
        match self
            .counts
            .iter_mut()
            .find(|entry| entry.event_type == event.event_type)
        {
            Some(entry) => entry.count += 1,
            None => self.counts.push(TypeCount {
                event_type: event.event_type.clone(),
                label: rule.summary_label(&event.event_type).to_string(),
                count: 1,
            }),
        }

        if !self.repos.contains(event.repo_name()) {
            self.repos.insert(event.repo_name().to_string());
        }
    }

    /// Per-type counts, in the order the types were first seen.
    #[must_use]
    pub fn counts(&self) -> &[TypeCount] {
        &self.counts
    }

    /// Count for a single event type tag, zero if never seen.
    #[must_use]
    pub fn count_for(&self, event_type: &str) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.event_type == event_type)
            .map_or(0, |entry| entry.count)
    }

    /// Number of distinct repositories seen.
    #[must_use]
    pub fn repo_count(&self) -> usize {
        self.repos.len()
    }

    /// Total number of recorded events.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|entry| entry.count).sum()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Emits the summary block for `counters`.
///
/// Emits nothing when no events were recorded.
pub fn report_summary<S: Sink + ?Sized>(counters: &SummaryCounters, sink: &mut S) {
    if counters.is_empty() {
        return;
    }

    sink.emit(OutputLine::plain(""));
    sink.emit(OutputLine::plain(SUMMARY_HEADER));
    for entry in counters.counts() {
        sink.emit(OutputLine::plain(format!("- {}: {}", entry.label, entry.count)));
    }
    sink.emit(OutputLine::plain(format!(
        "- Activity in {} repos",
        counters.repo_count()
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use serde_json::json;

    fn event(event_type: &str, repo: &str) -> Event {
        Event::from_value(&json!({"type": event_type, "repo": {"name": repo}})).unwrap()
    }

    fn record_all(counters: &mut SummaryCounters, events: &[Event]) {
        for e in events {
            counters.record(e, classify(&e.event_type));
        }
    }

    fn texts(lines: &[OutputLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn counts_keep_first_seen_order() {
        let mut counters = SummaryCounters::new();
        record_all(
            &mut counters,
            &[
                event("WatchEvent", "a/one"),
                event("PushEvent", "a/one"),
                event("WatchEvent", "a/two"),
                event("GollumEvent", "a/two"),
            ],
        );

        let order: Vec<&str> = counters.counts().iter().map(|c| c.event_type.as_str()).collect();
        assert_eq!(order, ["WatchEvent", "PushEvent", "GollumEvent"]);
        assert_eq!(counters.count_for("WatchEvent"), 2);
        assert_eq!(counters.count_for("PushEvent"), 1);
        assert_eq!(counters.count_for("ForkEvent"), 0);
        assert_eq!(counters.total(), 4);
    }

    #[test]
    fn distinct_repos_are_counted_once() {
        let mut counters = SummaryCounters::new();
        record_all(
            &mut counters,
            &[
                event("PushEvent", "a/one"),
                event("PushEvent", "a/two"),
                event("WatchEvent", "a/one"),
            ],
        );

        assert_eq!(counters.repo_count(), 2);
    }

    #[test]
    fn report_lists_labels_and_repo_count() {
        let mut counters = SummaryCounters::new();
        record_all(
            &mut counters,
            &[event("PushEvent", "a/one"), event("GollumEvent", "a/two")],
        );

        let mut lines: Vec<OutputLine> = Vec::new();
        report_summary(&counters, &mut lines);

        assert_eq!(
            texts(&lines),
            [
                "",
                "Summary:",
                "- push commit: 1",
                "- GollumEvent: 1",
                "- Activity in 2 repos"
            ]
        );
        assert!(lines.iter().all(|l| l.color.is_none()));
    }

    #[test]
    fn empty_counters_report_nothing() {
        let mut lines: Vec<OutputLine> = Vec::new();
        report_summary(&SummaryCounters::new(), &mut lines);
        assert!(lines.is_empty());
    }
}
