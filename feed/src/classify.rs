//! Event classification.
//!
//! Maps an event type tag to its [`EventTypeRule`]: the line template, the
//! display color and the summary label. The taxonomy is a static table with a
//! total fallback, so adding a type means adding a row, not a branch.
//!
//! | Tag | Color | Summary label |
//! |-----|-------|---------------|
//! | `PushEvent` | green | push commit |
//! | `IssuesEvent` | blue | issue opened |
//! | `WatchEvent` | yellow | repo starred |
//! | `CreateEvent` | cyan | repo created |
//! | `ForkEvent` | magenta | repo forked |
//! | `PullRequestEvent` | red | pull request sent |
//! | `PullRequestReviewCommentEvent` | dark grey | PR comment |
//! | `DeleteEvent` | dark red | item deleted |
//! | `ReleaseEvent` | dark magenta | release published |
//! | anything else | reset | the raw tag |

use crossterm::style::Color;

use crate::render::{templates, Template};

/// Kind of event, one per row of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Push,
    Issues,
    Watch,
    Create,
    Fork,
    PullRequest,
    PullRequestReviewComment,
    Delete,
    Release,
    /// Any tag not in the table.
    Other,
}

/// Rendering rule for one event type.
#[derive(Debug, Clone, Copy)]
pub struct EventTypeRule {
    /// The GitHub type tag, `None` for the fallback rule.
    pub tag: Option<&'static str>,

    /// Which kind of event this rule handles.
    pub kind: EventKind,

    /// Display color for lines of this type.
    pub color: Color,

    /// Summary label, `None` for the fallback rule (which uses the raw tag).
    pub label: Option<&'static str>,

    /// Builds the line body from the event's fields.
    pub template: Template,
}

impl EventTypeRule {
    /// Returns `true` if this is the fallback rule.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.tag.is_none()
    }

    /// Returns the summary label, falling back to the raw event type tag.
    #[must_use]
    pub fn summary_label<'a>(&self, event_type: &'a str) -> &'a str {
        self.label.unwrap_or(event_type)
    }
}

/// The recognized event types.
pub static RULES: [EventTypeRule; 9] = [
    EventTypeRule {
        tag: Some("PushEvent"),
        kind: EventKind::Push,
        color: Color::Green,
        label: Some("push commit"),
        template: templates::push,
    },
    EventTypeRule {
        tag: Some("IssuesEvent"),
        kind: EventKind::Issues,
        color: Color::Blue,
        label: Some("issue opened"),
        template: templates::issues,
    },
    EventTypeRule {
        tag: Some("WatchEvent"),
        kind: EventKind::Watch,
        color: Color::Yellow,
        label: Some("repo starred"),
        template: templates::watch,
    },
    EventTypeRule {
        tag: Some("CreateEvent"),
        kind: EventKind::Create,
        color: Color::Cyan,
        label: Some("repo created"),
        template: templates::create,
    },
    EventTypeRule {
        tag: Some("ForkEvent"),
        kind: EventKind::Fork,
        color: Color::Magenta,
        label: Some("repo forked"),
        template: templates::fork,
    },
    EventTypeRule {
        tag: Some("PullRequestEvent"),
        kind: EventKind::PullRequest,
        color: Color::Red,
        label: Some("pull request sent"),
        template: templates::pull_request,
    },
    EventTypeRule {
        tag: Some("PullRequestReviewCommentEvent"),
        kind: EventKind::PullRequestReviewComment,
        color: Color::DarkGrey,
        label: Some("PR comment"),
        template: templates::review_comment,
    },
    EventTypeRule {
        tag: Some("DeleteEvent"),
        kind: EventKind::Delete,
        color: Color::DarkRed,
        label: Some("item deleted"),
        template: templates::delete,
    },
    EventTypeRule {
        tag: Some("ReleaseEvent"),
        kind: EventKind::Release,
        color: Color::DarkMagenta,
        label: Some("release published"),
        template: templates::release,
    },
];

/// Rule used for any unrecognized tag.
pub static FALLBACK_RULE: EventTypeRule = EventTypeRule {
    tag: None,
    kind: EventKind::Other,
    color: Color::Reset,
    label: None,
    template: templates::fallback,
};

/// Returns the rule for an event type tag.
///
/// Matching is exact. Never fails: unknown tags get [`FALLBACK_RULE`].
///
/// ```
/// use gh_feed::classify::{classify, EventKind};
///
/// assert_eq!(classify("WatchEvent").kind, EventKind::Watch);
/// assert!(classify("GollumEvent").is_fallback());
/// ```
#[must_use]
pub fn classify(event_type: &str) -> &'static EventTypeRule {
    RULES
        .iter()
        .find(|rule| rule.tag == Some(event_type))
        .unwrap_or(&FALLBACK_RULE)
}
