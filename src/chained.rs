//! The capability contract shared by chain nodes and foreign errors, and the
//! generic walk over a chain.
//!
//! [`Chained`] is the closed set of optional capabilities an error value can
//! expose. Traversal and rendering check each one independently, so a value
//! that implements none of them still works everywhere as an opaque leaf.

use core::any::Any;
use core::fmt;

use alloc::collections::BTreeSet;
#[cfg(not(feature = "smallvec"))]
use alloc::vec::Vec;

use crate::error::Error;
use crate::kind::Kind;
use crate::location::Locus;

/// A `core::error::Error` that can be shared across threads.
pub type DynError = dyn core::error::Error + Send + Sync + 'static;

// ============================================================================
// Chained - optional capabilities
// ============================================================================

/// Upcasts used by [`Chained`] trait objects.
///
/// Implemented automatically for every sized `core::error::Error + Send + Sync`.
pub trait AsDynError {
    /// View as a plain error.
    fn as_dyn_error(&self) -> &DynError;

    /// View as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// View as mutable `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: core::error::Error + Send + Sync + 'static> AsDynError for T {
    #[inline]
    fn as_dyn_error(&self) -> &DynError {
        self
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Optional capabilities an error can expose to take full part in chains.
///
/// Every method has a default meaning "capability absent". Implement the ones
/// your type supports and hand the value to [`Error::from_chained`].
///
/// ## Example: embedding a chain node in a custom error
///
/// ```rust
/// use errstack::{Annotation, Chained, Error, Locus};
/// use std::fmt;
///
/// #[derive(Debug)]
/// struct HttpError {
///     base: Annotation,
///     status: u16,
/// }
///
/// impl HttpError {
///     #[track_caller]
///     fn new(status: u16) -> Self {
///         Self { base: Annotation::new(format!("http status {status}")), status }
///     }
/// }
///
/// impl fmt::Display for HttpError {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         fmt::Display::fmt(&self.base, f)
///     }
/// }
///
/// impl std::error::Error for HttpError {}
///
/// impl Chained for HttpError {
///     fn location(&self) -> Option<Locus> { self.base.location() }
///     fn message(&self) -> Option<&str> { Some(self.base.message()) }
/// }
///
/// let err = Error::from_chained(HttpError::new(503));
/// assert_eq!(err.to_string(), "http status 503");
/// assert_eq!(err.downcast_ref::<HttpError>().map(|e| e.status), Some(503));
/// ```
pub trait Chained: AsDynError + Send + Sync + 'static {
    /// Where this link was created.
    fn location(&self) -> Option<Locus> {
        None
    }

    /// The text this link contributes.
    ///
    /// Returning `Some` (even an empty string) marks the link as an
    /// annotation layer: the stack renderer prints the message instead of the
    /// full display text and continues with [`underlying`](Self::underlying).
    fn message(&self) -> Option<&str> {
        None
    }

    /// The error this link wraps.
    fn underlying(&self) -> Option<&Error> {
        None
    }

    /// The error considered the reason for this link. `None` means the link
    /// is its own cause.
    fn cause(&self) -> Option<&Error> {
        None
    }

    /// The classification carried by this link.
    fn kind(&self) -> Option<Kind> {
        None
    }

    /// Custom equality used by [`is`](crate::is). `target` is the value
    /// passed to `is` (an [`Error`], a [`Kind`], or a user [`Target`](crate::Target)).
    fn matches(&self, target: &dyn Any) -> bool {
        let _ = target;
        false
    }

    /// Custom conversion used by [`as_type`](crate::as_type) and friends.
    ///
    /// `target` is an `&mut Option<T>` for the requested `T`. Downcast it,
    /// fill it and return `true` to report a match.
    fn convert_into(&self, target: &mut dyn Any) -> bool {
        let _ = target;
        false
    }

    /// The concrete value type-based lookups downcast. Wrappers that only
    /// adapt another value return that value.
    fn value(&self) -> &dyn Any {
        self.as_any()
    }
}

// ============================================================================
// Visited - revisit guard for walks
// ============================================================================

type ErrPtr = *const (dyn core::error::Error + 'static);

/// Links checked by a linear scan before the walk falls back to the set.
const INLINE: usize = 8;

#[cfg(feature = "smallvec")]
type SeenVec = smallvec::SmallVec<[ErrPtr; INLINE]>;

#[cfg(not(feature = "smallvec"))]
type SeenVec = Vec<ErrPtr>;

/// Links already seen during one walk.
///
/// Compares address and vtable: a wrapper and the field it returns from
/// `source()` can share an address but never a type. The first few links sit
/// in a short list; the rest go to an ordered set, so a walk stays
/// `O(n log n)` however long the chain.
#[derive(Default)]
pub(crate) struct Visited {
    first: SeenVec,
    rest: BTreeSet<ErrPtr>,
}

impl Visited {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `link`, returning `false` if it was already recorded.
    pub(crate) fn first_visit(&mut self, link: Link<'_>) -> bool {
        let ptr: ErrPtr = link.as_error();
        if self.first.iter().any(|seen| core::ptr::eq(*seen, ptr)) {
            return false;
        }
        if self.first.len() < INLINE {
            self.first.push(ptr);
            return true;
        }
        self.rest.insert(ptr)
    }

    #[cfg(test)]
    pub(crate) fn spilled(&self) -> bool {
        !self.rest.is_empty()
    }

    #[cfg(all(test, feature = "smallvec"))]
    pub(crate) fn inline(&self) -> bool {
        !self.first.spilled()
    }
}

// ============================================================================
// Link - one step of a walk
// ============================================================================

/// One step of a chain walk.
#[derive(Clone, Copy)]
pub enum Link<'a> {
    /// A value exposing [`Chained`] capabilities.
    Chained(&'a dyn Chained),
    /// A plain error reached through `core::error::Error::source`.
    Std(&'a (dyn core::error::Error + 'static)),
}

impl<'a> Link<'a> {
    /// Classify an error reached through `source()`.
    pub fn from_std(err: &'a (dyn core::error::Error + 'static)) -> Self {
        if let Some(handle) = err.downcast_ref::<Error>() {
            return Link::Chained(handle.chained());
        }
        if let Some(node) = err.downcast_ref::<crate::Annotation>() {
            return Link::Chained(node);
        }
        Link::Std(err)
    }

    /// The capabilities of this link, if it has any.
    #[inline]
    pub fn chained(self) -> Option<&'a dyn Chained> {
        match self {
            Link::Chained(c) => Some(c),
            Link::Std(_) => None,
        }
    }

    /// This link as a plain error.
    pub fn as_error(self) -> &'a (dyn core::error::Error + 'static) {
        match self {
            Link::Chained(c) => c.as_dyn_error(),
            Link::Std(e) => e,
        }
    }

    /// The location of this link, when captured.
    pub fn location(self) -> Option<Locus> {
        self.chained()
            .and_then(|c| c.location())
            .filter(Locus::is_set)
    }

    /// Downcast the concrete value of a chained link.
    ///
    /// Plain links reached through `source()` only downcast to error types;
    /// use [`downcast_error`](Self::downcast_error) for those.
    pub fn downcast_ref<T: 'static>(self) -> Option<&'a T> {
        match self {
            Link::Chained(c) => c.value().downcast_ref(),
            Link::Std(_) => None,
        }
    }

    /// Downcast this link to an error type, whichever kind of link it is.
    pub fn downcast_error<T: core::error::Error + 'static>(self) -> Option<&'a T> {
        match self {
            Link::Chained(c) => c.value().downcast_ref(),
            Link::Std(e) => e.downcast_ref(),
        }
    }

    /// Produce a `T` from this link: a clone of the value when it is a `T`,
    /// otherwise whatever [`Chained::convert_into`] yields.
    pub fn extract<T: Clone + 'static>(self) -> Option<T> {
        if let Some(value) = self.downcast_ref::<T>() {
            return Some(value.clone());
        }
        let mut slot: Option<T> = None;
        match self.chained() {
            Some(c) if c.convert_into(&mut slot) => slot,
            _ => None,
        }
    }

    /// Whether this link is, or converts into, a `T`.
    pub fn holds<T: 'static>(self) -> bool {
        if self.downcast_ref::<T>().is_some() {
            return true;
        }
        let mut slot: Option<T> = None;
        self.chained()
            .is_some_and(|c| c.convert_into(&mut slot) && slot.is_some())
    }

    /// The next link: the underlying error for chained links, falling back to
    /// `source()`.
    pub fn next(self) -> Option<Link<'a>> {
        match self {
            Link::Chained(c) => match c.underlying() {
                Some(under) => Some(Link::Chained(under.chained())),
                None => c.as_dyn_error().source().map(Link::from_std),
            },
            Link::Std(e) => e.source().map(Link::from_std),
        }
    }
}

impl fmt::Debug for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Chained(c) => f.debug_tuple("Chained").field(&c.as_dyn_error()).finish(),
            Link::Std(e) => f.debug_tuple("Std").field(e).finish(),
        }
    }
}

impl fmt::Display for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_error(), f)
    }
}

// ============================================================================
// Chain - iterator over links, outermost first
// ============================================================================

/// Iterator over the links of an error, outermost first.
///
/// Stops early if a link address repeats, so a foreign error whose `source()`
/// loops cannot hang a walk.
pub struct Chain<'a> {
    next: Option<Link<'a>>,
    visited: Visited,
}

impl<'a> Chain<'a> {
    /// Start a walk at `first`.
    pub fn new(first: Link<'a>) -> Self {
        Self {
            next: Some(first),
            visited: Visited::new(),
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = Link<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next.take()?;
        if !self.visited.first_visit(link) {
            return None;
        }
        self.next = link.next();
        Some(link)
    }
}
