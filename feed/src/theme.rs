//! Color output policy.
//!
//! The colors themselves live in the rule table (see [`crate::classify`]);
//! a [`Theme`] decides whether they are emitted. It is injected into the feed
//! processor so tests and pipes get deterministic, colorless output.
//!
//! # NO_COLOR Support
//!
//! [`Theme::from_env()`] returns [`Theme::monochrome()`] whenever the
//! `NO_COLOR` environment variable is set, per <https://no-color.org/>.
//!
//! # Example
//!
//! ```
//! use crossterm::style::Color;
//! use gh_feed::classify::classify;
//! use gh_feed::theme::Theme;
//!
//! let rule = classify("WatchEvent");
//! assert_eq!(Theme::default().color_for(rule), Some(Color::Yellow));
//! assert_eq!(Theme::monochrome().color_for(rule), None);
//! ```

use crossterm::style::Color;

use crate::classify::EventTypeRule;

/// Whether event lines are colorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    colored: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self { colored: true }
    }
}

impl Theme {
    /// A theme that never emits color codes.
    #[must_use]
    pub fn monochrome() -> Self {
        Self { colored: false }
    }

    /// Colored unless `NO_COLOR` is set (to any value).
    #[must_use]
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::monochrome()
        } else {
            Self::default()
        }
    }

    /// Returns `true` if this theme emits colors.
    #[must_use]
    pub fn is_colored(&self) -> bool {
        self.colored
    }

    /// The color to paint a line produced by `rule`, if any.
    #[must_use]
    pub fn color_for(&self, rule: &EventTypeRule) -> Option<Color> {
        self.colored.then_some(rule.color)
    }
}
