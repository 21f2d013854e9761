//! String helpers for line templates.

/// Uppercases the first character and leaves the rest untouched.
///
/// ```
/// use gh_feed::utils::capitalize_first;
///
/// assert_eq!(capitalize_first("opened"), "Opened");
/// assert_eq!(capitalize_first("reOpened"), "ReOpened");
/// assert_eq!(capitalize_first(""), "");
/// ```
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
