//! Utility modules for gh-feed.
//!
//! # Modules
//!
//! - [`time_ago`]: Coarse relative-age formatting for event timestamps
//! - [`text`]: Small string helpers used by the line templates

pub mod text;
pub mod time_ago;

pub use text::capitalize_first;
pub use time_ago::{format_elapsed, parse_utc, time_ago};
