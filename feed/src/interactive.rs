//! Interactive prompt session.
//!
//! Asks for the same inputs the command-line flags provide:
//!
//! ```text
//! Welcome to Interactive Mode!
//! Enter GitHub username: octocat
//! Use GitHub token? (y/n): n
//! Filter by event type (leave blank for all): push
//! Export results to JSON? (y/n): y
//! ```
//!
//! Generic over [`BufRead`] / [`Write`] so sessions can be scripted in tests.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::app::RunOptions;

/// Greeting printed at the start of a session.
pub const WELCOME: &str = "Welcome to Interactive Mode!";

/// Errors that can occur during a prompt session.
#[derive(Error, Debug)]
pub enum InteractiveError {
    /// Reading input or writing a prompt failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input ended before every question was answered.
    #[error("input ended before '{prompt}' was answered")]
    EndOfInput { prompt: &'static str },

    /// The username answer was blank.
    #[error("username cannot be empty")]
    EmptyUsername,
}

/// Answers collected from one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractiveAnswers {
    /// GitHub username.
    pub username: String,

    /// Token typed at the prompt. `None` keeps the configured token.
    pub token: Option<String>,

    /// Event type filter, `None` for all.
    pub filter: Option<String>,

    /// Whether to export the feed as JSON.
    pub export: bool,
}

impl From<InteractiveAnswers> for RunOptions {
    fn from(answers: InteractiveAnswers) -> Self {
        RunOptions {
            username: answers.username,
            filter: answers.filter,
            export: answers.export,
            ..RunOptions::default()
        }
    }
}

/// Runs a prompt session.
///
/// # Errors
///
/// Returns [`InteractiveError`] on I/O failure, early end of input, or a
/// blank username.
pub fn prompt_session<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<InteractiveAnswers, InteractiveError> {
    writeln!(output, "{WELCOME}")?;

    let username = ask(input, output, "Enter GitHub username: ")?;
    if username.is_empty() {
        return Err(InteractiveError::EmptyUsername);
    }

    let mut token = None;
    if is_yes(&ask(input, output, "Use GitHub token? (y/n): ")?) {
        let typed = ask(
            input,
            output,
            "Enter GitHub token (leave blank to use $GITHUB_TOKEN): ",
        )?;
        token = Some(typed).filter(|t| !t.is_empty());
    }

    let filter = Some(ask(input, output, "Filter by event type (leave blank for all): ")?)
        .filter(|f| !f.is_empty());
    let export = is_yes(&ask(input, output, "Export results to JSON? (y/n): ")?);

    Ok(InteractiveAnswers {
        username,
        token,
        filter,
        export,
    })
}

/// Writes `prompt`, reads one line, and returns it trimmed.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &'static str,
) -> Result<String, InteractiveError> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(InteractiveError::EndOfInput { prompt });
    }
    Ok(line.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y")
}
