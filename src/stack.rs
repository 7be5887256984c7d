//! Rendering a chain as a root-first list of `file:line: text` lines.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use crate::chained::{Chained, Link, Visited};
use crate::error::Error;
use crate::location::SourceRoot;

/// Render `err` as a multi-line trace, root first. `None` renders as `""`.
///
/// ```rust
/// let (err, line) = (errstack::new("first"), line!());
/// let err = errstack::annotate(err, "more");
/// let lines = errstack::error_stack(&err);
/// assert!(lines.starts_with(&format!("{}:{}: first\n", file!(), line)));
/// assert!(lines.ends_with(": more"));
/// ```
pub fn error_stack<'a>(err: impl Into<Option<&'a Error>>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write!(out, "{}", ErrorStack::new(err));
    out
}

/// A displayable trace of an error chain.
///
/// Walks from the outermost node toward the root. Each link contributes one
/// line: its location (when captured), then either its message (plus the
/// substituted cause, if any) for annotation layers, or its full text for
/// anything else, which also ends the walk.
#[derive(Clone, Copy)]
pub struct ErrorStack<'a> {
    err: Option<&'a Error>,
    root: Option<&'a SourceRoot>,
    compact: bool,
}

impl<'a> ErrorStack<'a> {
    /// A full trace of `err` with the paths captured at compile time.
    pub fn new(err: impl Into<Option<&'a Error>>) -> Self {
        Self {
            err: err.into(),
            root: None,
            compact: false,
        }
    }

    /// Re-trim file paths with `root` when printing.
    pub fn with_root(mut self, root: &'a SourceRoot) -> Self {
        self.root = Some(root);
        self
    }

    /// Leave out pure trace points: layers with neither a message nor a
    /// substituted cause.
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }

    /// The rendered lines, root first.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut visited = Visited::new();
        let mut next = self.err.map(Error::link);

        while let Some(link) = next.take() {
            if !visited.first_visit(link) {
                break;
            }
            let mut line = String::new();
            if let Some(loc) = link.location() {
                let _ = match self.root {
                    Some(root) => write!(line, "{}: ", loc.display_in(root)),
                    None => write!(line, "{loc}: "),
                };
            }
            match layer(link) {
                Some((node, message)) => {
                    line.push_str(message);
                    let substituted = substituted_cause(node);
                    if let Some(cause) = substituted {
                        if !message.is_empty() {
                            line.push_str(": ");
                        }
                        let _ = write!(line, "{cause}");
                    }
                    if !(self.compact && message.is_empty() && substituted.is_none()) {
                        lines.push(line);
                    }
                    next = node.underlying().map(Error::link);
                }
                None => {
                    let _ = write!(line, "{link}");
                    lines.push(line);
                }
            }
        }

        lines.reverse();
        lines
    }
}

impl fmt::Display for ErrorStack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines().iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ErrorStack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.lines()).finish()
    }
}

fn layer(link: Link<'_>) -> Option<(&dyn Chained, &str)> {
    let node = link.chained()?;
    node.message().map(|message| (node, message))
}

/// The cause to print after the message: set, and not the cause the
/// underlying error already reports.
fn substituted_cause(node: &dyn Chained) -> Option<&Error> {
    let cause = node.cause()?;
    match node.underlying() {
        Some(under) if under.cause() == cause => None,
        _ => Some(cause),
    }
}
