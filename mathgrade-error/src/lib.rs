//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages about a submitted step.

use ariadne::{Color, Label, Report, ReportKind, Source};
use std::{fmt::Debug, io, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur while reading a step.
///
/// Implementors provide the message, the labels attached to each span (in order), and an optional
/// help line; the report itself is assembled by [`ErrorKind::build_report`].
pub trait ErrorKind: Debug + Send {
    /// A one-line, human-readable description of the error.
    fn message(&self) -> String;

    /// Messages for the labels attached to each span of the error, in order. Spans without a
    /// matching label are highlighted with an empty label.
    fn labels(&self) -> Vec<String> {
        vec![String::from("here")]
    }

    /// An optional hint on how to fix the error.
    fn help(&self) -> Option<String> {
        None
    }

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<'a, (&'a str, Range<usize>)> {
        let offset = spans.first().map_or(0, |span| span.start);
        let mut labels = self.labels().into_iter();
        let mut builder = Report::build(ReportKind::Error, src_id, offset)
            .with_message(self.message())
            .with_labels(spans.iter().map(|span| {
                Label::new((src_id, span.clone()))
                    .with_color(EXPR)
                    .with_message(labels.next().unwrap_or_default())
            }));

        if let Some(help) = self.help() {
            builder.set_help(help);
        }

        builder.finish()
    }
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,

    /// Whether the error is fatal. A fatal error stops any backtracking alternative from being
    /// tried.
    pub fatal: bool,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: false }
    }

    /// Creates a new fatal error with the given spans and kind.
    pub fn new_fatal(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: true }
    }

    /// Marks this error as fatal.
    pub fn into_fatal(self) -> Self {
        Self { fatal: true, ..self }
    }

    /// The one-line description of this error.
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<'a, (&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Renders the report for this error against the given source into a string.
    pub fn render(&self, src_id: &str, source: &str) -> io::Result<String> {
        let mut buf = Vec::new();
        self.build_report(src_id)
            .write((src_id, Source::from(source)), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Prints the report for this error against the given source to stderr.
    pub fn report_to_stderr(&self, src_id: &str, source: &str) -> io::Result<()> {
        self.build_report(src_id)
            .eprint((src_id, Source::from(source)))
    }
}
