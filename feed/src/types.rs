//! Event records from the GitHub public events API.
//!
//! The API returns a JSON array of loosely-typed records. Only the fields the
//! renderer reads are modelled here; everything type-specific stays in the
//! untyped [`Event::payload`] so unknown or drifting payload shapes never fail
//! deserialization.
//!
//! # Example
//!
//! ```
//! use gh_feed::types::decode_events;
//! use serde_json::json;
//!
//! let raw = vec![
//!     json!({"type": "WatchEvent", "repo": {"name": "octocat/Hello-World"}}),
//!     json!({"repo": {"name": "no/type"}}),
//! ];
//!
//! let events = decode_events(&raw);
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].repo_name(), "octocat/Hello-World");
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Repository reference attached to every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// Full `owner/name` of the repository.
    pub name: String,
}

/// A single public GitHub event.
///
/// `type` and `repo.name` are required; records without them are rejected by
/// [`decode_events`]. `created_at` is kept as raw text so that a malformed
/// timestamp surfaces as a per-line rendering issue rather than a decode
/// failure; non-string values are stored as their JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event type tag (e.g. `PushEvent`, `WatchEvent`).
    #[serde(rename = "type")]
    pub event_type: String,

    /// Repository the event happened in.
    pub repo: Repo,

    /// ISO-8601 UTC creation time, if present.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<String>,

    /// Type-specific payload; `Null` when absent.
    #[serde(default)]
    pub payload: Value,
}

impl Event {
    /// Decodes a single event from a raw JSON value.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` when `type` or `repo.name` is missing or
    /// has the wrong JSON type.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Returns the `owner/name` of the repository.
    #[must_use]
    pub fn repo_name(&self) -> &str {
        &self.repo.name
    }

    /// Returns the creation timestamp, treating an empty string as absent.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref().filter(|ts| !ts.is_empty())
    }
}

/// Accepts any JSON value for `created_at`. `null` is absent; numbers,
/// booleans, arrays and objects keep their JSON text and fail to parse later.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(ts)) => Some(ts),
        Some(other) => Some(other.to_string()),
    })
}

/// Decodes a raw event array, skipping records that violate the data contract.
///
/// Order is preserved. Each skipped record is logged as a warning together
/// with its position in the input.
pub fn decode_events(raw: &[Value]) -> Vec<Event> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, value)| match Event::from_value(value) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed event record");
                None
            }
        })
        .collect()
}
