//! The chain node.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt;

use crate::chained::Chained;
use crate::error::{Error, IntoError};
use crate::kind::Kind;
use crate::location::Locus;

/// One layer of an error chain: a message, the location it was added at, the
/// wrapped predecessor, the semantic cause and an optional kind.
///
/// Nodes are normally built by the free functions ([`new`](crate::new),
/// [`annotate`](crate::annotate), ...). Build one directly to embed it in your
/// own error type and forward the [`Chained`] capabilities to it.
///
/// ## Display
///
/// The shown predecessor is `underlying`, unless a cause is set that differs
/// from the underlying error's own cause; then the cause is shown instead.
/// With nothing to show the text is the message; with an empty message it is
/// the shown error's text; otherwise `"<message>: <shown>"`.
///
/// ```rust
/// use errstack::Annotation;
///
/// let node = Annotation::new("reading config")
///     .with_underlying(errstack::new("permission denied"));
/// assert_eq!(node.to_string(), "reading config: permission denied");
/// ```
pub struct Annotation {
    message: Cow<'static, str>,
    location: Locus,
    underlying: Option<Error>,
    cause: Option<Error>,
    kind: Option<Kind>,
}

impl Annotation {
    /// A root node carrying `message`, located at the caller.
    #[track_caller]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::located(message.into(), Locus::caller(), None, None, None)
    }

    pub(crate) fn located(
        message: Cow<'static, str>,
        location: Locus,
        underlying: Option<Error>,
        cause: Option<Error>,
        kind: Option<Kind>,
    ) -> Self {
        Self {
            message,
            location,
            underlying,
            cause,
            kind,
        }
    }

    /// An unlocated node with no message or links.
    pub(crate) fn blank() -> Self {
        Self::located(Cow::Borrowed(""), Locus::UNSET, None, None, None)
    }

    /// Set the wrapped predecessor.
    pub fn with_underlying(mut self, err: impl IntoError) -> Self {
        self.underlying = Some(err.into_error());
        self
    }

    /// Set the cause. The cause of `err` is stored, so causes stay terminal.
    pub fn with_cause(mut self, err: impl IntoError) -> Self {
        self.cause = Some(err.into_error().cause().clone());
        self
    }

    /// Set the kind.
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Replace the captured location.
    pub fn with_location(mut self, location: Locus) -> Self {
        self.location = location;
        self
    }

    /// The message; empty for a pure trace point.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The captured location, unless the node was built without one.
    pub fn location(&self) -> Option<Locus> {
        Some(self.location).filter(Locus::is_set)
    }

    /// The wrapped predecessor.
    pub fn underlying(&self) -> Option<&Error> {
        self.underlying.as_ref()
    }

    /// The stored cause; `None` when the node is its own cause.
    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }

    /// The kind set on this node only.
    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    /// Whether the stored cause replaces the underlying error in the text.
    pub fn substitutes_cause(&self) -> bool {
        match (&self.cause, &self.underlying) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(cause), Some(under)) => cause != under.cause(),
        }
    }

    fn shown(&self) -> Option<&Error> {
        if self.substitutes_cause() {
            self.cause.as_ref()
        } else {
            self.underlying.as_ref()
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut node = self;
        loop {
            let Some(shown) = node.shown() else {
                return f.write_str(&node.message);
            };
            if !node.message.is_empty() {
                write!(f, "{}: ", node.message)?;
            }
            match shown.node() {
                Some(next) => node = next,
                None => return fmt::Display::fmt(shown, f),
            }
        }
    }
}

/// Drops iteratively: links of nodes held by no other handle move to a work
/// list instead of being dropped in place.
impl Drop for Annotation {
    fn drop(&mut self) {
        if self.underlying.is_none() && self.cause.is_none() {
            return;
        }
        let mut pending: Vec<Error> = Vec::new();
        pending.extend(self.underlying.take());
        pending.extend(self.cause.take());
        while let Some(mut err) = pending.pop() {
            if let Some(node) = err.unique_node_mut() {
                pending.extend(node.underlying.take());
                pending.extend(node.cause.take());
            }
        }
    }
}

impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Annotation");
        s.field("message", &self.message);
        if self.location.is_set() {
            s.field("location", &format_args!("{}", self.location));
        }
        if let Some(kind) = self.kind {
            s.field("kind", &kind);
        }
        if let Some(under) = &self.underlying {
            s.field("underlying", &format_args!("{under}"));
        }
        if let Some(cause) = &self.cause {
            s.field("cause", &format_args!("{cause}"));
        }
        s.finish()
    }
}

impl core::error::Error for Annotation {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.underlying
            .as_ref()
            .map(|e| e as &(dyn core::error::Error + 'static))
    }
}

impl Chained for Annotation {
    fn location(&self) -> Option<Locus> {
        Annotation::location(self)
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn underlying(&self) -> Option<&Error> {
        self.underlying.as_ref()
    }

    fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }

    fn kind(&self) -> Option<Kind> {
        self.kind
    }
}
