//! HTTP client for the GitHub public events API.
//!
//! One request per run, no retries:
//!
//! ```text
//! GET {api_url}/users/{username}/events
//! Accept: application/vnd.github+json
//! User-Agent: gh-feed/<version>
//! Authorization: token <token>        (only when a token is configured)
//! ```
//!
//! The body is returned as raw JSON values so the cache and the JSON export
//! can store exactly what the API sent.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use gh_feed::github::GitHubClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = GitHubClient::new(
//!         "https://api.github.com",
//!         None,
//!         Duration::from_secs(30),
//!     )
//!     .unwrap();
//!
//!     let fetched = client.fetch_events("octocat").await.unwrap();
//!     println!("{} events", fetched.events.len());
//! }
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Remaining-request count at or below which the user is warned.
pub const RATE_LIMIT_WARNING_THRESHOLD: u32 = 5;

/// Response header carrying the remaining request quota.
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Media type recommended by the GitHub REST API.
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Errors that can occur while fetching events.
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Transport-level failure (DNS, connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The user does not exist (404).
    #[error("user '{username}' not found")]
    UserNotFound { username: String },

    /// API rate limit exhausted (403).
    #[error("rate limit exceeded")]
    RateLimited,

    /// Any other non-success status.
    #[error("server error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The response body is not a JSON array of events.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The username cannot be used in a request path.
    #[error("invalid username '{0}'")]
    InvalidUsername(String),

    /// The token contains characters not allowed in a header.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl GitHubError {
    /// Returns `true` for failures that mean the API was unreachable.
    ///
    /// These are the cases where a stale cache is an acceptable answer.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }

    /// The message shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UserNotFound { username } => format!("Error: User '{username}' not found."),
            Self::RateLimited => "Error: Rate limit exceeded. Try again later.".to_string(),
            Self::Status { status, message } => format!("HTTP Error {status}: {message}"),
            Self::Http(e) if self.is_connection() => format!("Connection error: {e}"),
            other => format!("Error: {other}"),
        }
    }
}

/// A successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedEvents {
    /// Raw event records in API order.
    pub events: Vec<Value>,

    /// Value of `X-RateLimit-Remaining`, when present and numeric.
    pub rate_limit_remaining: Option<u32>,
}

impl FetchedEvents {
    /// Returns `true` if the remaining quota is at or below the warning threshold.
    #[must_use]
    pub fn nearing_rate_limit(&self) -> bool {
        self.rate_limit_remaining
            .is_some_and(|remaining| remaining <= RATE_LIMIT_WARNING_THRESHOLD)
    }
}

/// Client for the public events endpoint.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Creates a client for `api_url`.
    ///
    /// A trailing slash on `api_url` is ignored. A blank token is treated as
    /// no token.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Http`] if the underlying HTTP client cannot be
    /// built.
    pub fn new(
        api_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        let client = Client::builder().timeout(timeout).build()?;

        let api_url = api_url.into().trim_end_matches('/').to_string();
        let token = token.filter(|t| !t.trim().is_empty());

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// Returns `true` if requests carry an `Authorization` header.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// URL of the events endpoint for `username`.
    #[must_use]
    pub fn events_url(&self, username: &str) -> String {
        format!("{}/users/{username}/events", self.api_url)
    }

    /// Fetches the public events of `username`.
    ///
    /// # Errors
    ///
    /// - [`GitHubError::InvalidUsername`] before any request is made
    /// - [`GitHubError::UserNotFound`] on 404
    /// - [`GitHubError::RateLimited`] on 403
    /// - [`GitHubError::Status`] on any other non-success status
    /// - [`GitHubError::Http`] on transport failure
    /// - [`GitHubError::Json`] if the body is not a JSON array
    pub async fn fetch_events(&self, username: &str) -> Result<FetchedEvents, GitHubError> {
        validate_username(username)?;

        let url = self.events_url(username);
        let headers = self.headers()?;

        debug!(url = %url, authenticated = self.has_token(), "Fetching events");

        let response = self.client.get(&url).headers(headers).send().await?;
        let status = response.status();

        let rate_limit_remaining = response
            .headers()
            .get(RATE_LIMIT_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u32>().ok());

        match status {
            StatusCode::NOT_FOUND => {
                return Err(GitHubError::UserNotFound {
                    username: username.to_string(),
                })
            }
            StatusCode::FORBIDDEN => {
                warn!(?rate_limit_remaining, "Request forbidden by GitHub API");
                return Err(GitHubError::RateLimited);
            }
            _ if !status.is_success() => {
                let message = status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.as_str().to_string());
                return Err(GitHubError::Status {
                    status: status.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        let body = response.bytes().await?;
        let events: Vec<Value> = serde_json::from_slice(&body)?;

        info!(
            username,
            events = events.len(),
            ?rate_limit_remaining,
            "Fetched events"
        );

        Ok(FetchedEvents {
            events,
            rate_limit_remaining,
        })
    }

    fn headers(&self) -> Result<HeaderMap, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("gh-feed/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("token {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

/// Checks that `username` is a plausible GitHub login.
///
/// Logins are ASCII letters, digits and hyphens.
///
/// # Errors
///
/// Returns [`GitHubError::InvalidUsername`] otherwise.
pub fn validate_username(username: &str) -> Result<(), GitHubError> {
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(GitHubError::InvalidUsername(username.to_string()))
    }
}
