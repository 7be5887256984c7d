//! Questions asked of an error chain.
//!
//! Every function accepts `&Error` or `Option<&Error>`; `None` answers `None`
//! or `false`. Walks go outermost first, follow `underlying` for chain nodes
//! and `source()` for everything else, and never visit a link twice.

use core::any::Any;
use core::ptr;

use crate::chained::Link;
use crate::error::Error;
use crate::kind::Kind;

// ============================================================================
// Target - what `is` compares against
// ============================================================================

/// A value [`is`] can look for.
pub trait Target {
    /// Whether `link` is (or claims to be) this target.
    fn matches(&self, link: Link<'_>) -> bool;
}

/// Matches the exact node this handle points at, or a link whose
/// [`Chained::matches`](crate::Chained::matches) accepts the handle.
impl Target for Error {
    fn matches(&self, link: Link<'_>) -> bool {
        match link.chained() {
            Some(c) => ptr::addr_eq(ptr::from_ref(c), ptr::from_ref(self.chained())) || c.matches(self),
            None => false,
        }
    }
}

impl Target for Kind {
    fn matches(&self, link: Link<'_>) -> bool {
        match link.chained() {
            Some(c) => c.kind() == Some(*self) || c.matches(self),
            None => false,
        }
    }
}

/// Matches a link whose concrete value is a `T` equal to the wrapped one.
///
/// Only chained links are compared; values reached solely through a foreign
/// `source()` are not.
///
/// ```rust
/// use errstack::Sentinel;
///
/// #[derive(Debug, PartialEq)]
/// struct Closed;
/// impl std::fmt::Display for Closed {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("closed")
///     }
/// }
/// impl std::error::Error for Closed {}
///
/// let err = errstack::annotate(Closed, "sending");
/// assert!(errstack::is(&err, &Sentinel(Closed)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinel<T>(pub T);

impl<T: PartialEq + 'static> Target for Sentinel<T> {
    fn matches(&self, link: Link<'_>) -> bool {
        if link.downcast_ref::<T>().is_some_and(|value| *value == self.0) {
            return true;
        }
        link.chained().is_some_and(|c| c.matches(self as &dyn Any))
    }
}

impl<T: Target + ?Sized> Target for &T {
    fn matches(&self, link: Link<'_>) -> bool {
        (**self).matches(link)
    }
}

// ============================================================================
// Traversals
// ============================================================================

/// The semantic reason for `err`: the cause its outermost node records, or
/// `err` itself when that node is its own cause.
///
/// ```rust
/// let base = errstack::new("disk full");
/// let err = errstack::annotate(errstack::trace(base.clone()), "saving");
/// assert_eq!(errstack::cause(&err), Some(&base));
/// assert_eq!(errstack::cause(None::<&errstack::Error>), None);
/// ```
pub fn cause<'a>(err: impl Into<Option<&'a Error>>) -> Option<&'a Error> {
    err.into().map(Error::cause)
}

/// Whether any link of `err` matches `target`.
pub fn is<'a, T: Target + ?Sized>(err: impl Into<Option<&'a Error>>, target: &T) -> bool {
    err.into()
        .is_some_and(|err| err.chain().any(|link| target.matches(link)))
}

/// Fill `target` from the first link, outer to inner, that is a `T` or
/// converts into one. Returns whether a link matched; `target` is untouched
/// otherwise.
pub fn as_target<'a, T: Clone + 'static>(
    err: impl Into<Option<&'a Error>>,
    target: &mut T,
) -> bool {
    match as_type::<T>(err) {
        Some(value) => {
            *target = value;
            true
        }
        None => false,
    }
}

/// Whether any link is a `T` or converts into one.
///
/// Type lookups see the values behind chain links and opaque leaves. Errors
/// reached only through a foreign `source()` need [`find_error`].
pub fn has_type<'a, T: 'static>(err: impl Into<Option<&'a Error>>) -> bool {
    err.into()
        .is_some_and(|err| err.chain().any(|link| link.holds::<T>()))
}

/// The first `T` found walking outer to inner, cloned or converted.
///
/// ```rust
/// #[derive(Debug, Clone, PartialEq)]
/// struct Status(u16);
/// impl std::fmt::Display for Status {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "status {}", self.0)
///     }
/// }
/// impl std::error::Error for Status {}
///
/// let err = errstack::annotate(Status(404), "fetching index");
/// assert_eq!(errstack::as_type::<Status>(&err), Some(Status(404)));
/// ```
pub fn as_type<'a, T: Clone + 'static>(err: impl Into<Option<&'a Error>>) -> Option<T> {
    err.into()?.chain().find_map(Link::extract::<T>)
}

/// Borrow the first `T` found walking outer to inner. Custom conversions are
/// not consulted.
pub fn find<'a, T: 'static>(err: impl Into<Option<&'a Error>>) -> Option<&'a T> {
    err.into()?.chain().find_map(Link::downcast_ref::<T>)
}

/// Borrow the first error of type `T`, including errors reached through a
/// foreign `source()` chain.
///
/// ```rust
/// use std::fmt;
///
/// #[derive(Debug)]
/// struct Io;
/// impl fmt::Display for Io {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("io")
///     }
/// }
/// impl std::error::Error for Io {}
///
/// #[derive(Debug)]
/// struct Parse(Io);
/// impl fmt::Display for Parse {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("parse")
///     }
/// }
/// impl std::error::Error for Parse {
///     fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
///         Some(&self.0)
///     }
/// }
///
/// let err = errstack::annotate(Parse(Io), "loading");
/// assert!(errstack::find_error::<Io>(&err).is_some());
/// assert!(errstack::find::<Io>(&err).is_none());
/// ```
pub fn find_error<'a, T: core::error::Error + 'static>(
    err: impl Into<Option<&'a Error>>,
) -> Option<&'a T> {
    err.into()?.chain().find_map(Link::downcast_error::<T>)
}

/// Apply `predicate` to the cause of `err`; `false` for `None`.
///
/// ```rust
/// let err = errstack::annotate(errstack::not_found("user"), "login");
/// assert!(errstack::check(&err, |cause| errstack::is_not_found(cause)));
/// ```
pub fn check<'a>(err: impl Into<Option<&'a Error>>, predicate: impl FnOnce(&Error) -> bool) -> bool {
    err.into().is_some_and(|err| predicate(err.cause()))
}
