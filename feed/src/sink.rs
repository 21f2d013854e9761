//! Output sinks for rendered lines.
//!
//! The feed pipeline never prints directly. Every line (activity lines,
//! notices, the summary block) goes through a [`Sink`], so the caller decides
//! whether output lands on a terminal, in a file, or in a test buffer.
//!
//! Provided sinks:
//!
//! - [`TerminalSink`]: writes to any [`Write`], wrapping colored lines in
//!   ANSI color / reset sequences
//! - `Vec<OutputLine>`: captures lines as-is
//! - [`from_fn`]: adapts a closure

use std::io::{self, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::QueueableCommand;

/// A single line of output, optionally tagged with a display color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    /// Line text without color codes or trailing newline.
    pub text: String,

    /// Color to paint the line with, `None` for plain output.
    pub color: Option<Color>,
}

impl OutputLine {
    /// A line without color.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    /// A line with an optional color.
    pub fn colored(text: impl Into<String>, color: Option<Color>) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Consumer of output lines.
pub trait Sink {
    /// Accepts one line.
    fn emit(&mut self, line: OutputLine);
}

impl Sink for Vec<OutputLine> {
    fn emit(&mut self, line: OutputLine) {
        self.push(line);
    }
}

/// Sink that forwards every line to a closure.
pub struct FnSink<F>(F);

impl<F: FnMut(OutputLine)> Sink for FnSink<F> {
    fn emit(&mut self, line: OutputLine) {
        (self.0)(line);
    }
}

/// Wraps a closure as a [`Sink`].
///
/// ```
/// use gh_feed::sink::{from_fn, OutputLine, Sink};
///
/// let mut seen = Vec::new();
/// let mut sink = from_fn(|line: OutputLine| seen.push(line.text));
/// sink.emit(OutputLine::plain("hello"));
/// drop(sink);
/// assert_eq!(seen, ["hello"]);
/// ```
pub fn from_fn<F: FnMut(OutputLine)>(f: F) -> FnSink<F> {
    FnSink(f)
}

/// Writes lines to a terminal or any other writer.
///
/// Write errors don't interrupt the pipeline: the first one is kept, later
/// lines are dropped, and [`TerminalSink::finish`] reports it.
pub struct TerminalSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> TerminalSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flushes the writer and returns the first write error, if any.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error seen while emitting, or the flush error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_line(&mut self, line: &OutputLine) -> io::Result<()> {
        match line.color {
            Some(color) => {
                self.writer
                    .queue(SetForegroundColor(color))?
                    .queue(Print(&line.text))?
                    .queue(ResetColor)?;
                writeln!(self.writer)
            }
            None => writeln!(self.writer, "{}", line.text),
        }
    }
}

impl<W: Write> Sink for TerminalSink<W> {
    fn emit(&mut self, line: OutputLine) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_line(&line) {
            self.error = Some(e);
        }
    }
}
