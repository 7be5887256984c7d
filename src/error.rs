//! The shared error handle.
//!
//! [`Error`] is what every construction operation returns and what every
//! inspection operation reads. It is an `Arc` around a [`Chained`] value, so
//! cloning is a reference-count bump and the same base error can be wrapped
//! from several places at once.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::mem;

use crate::annotation::Annotation;
use crate::chained::{Chain, Chained, DynError, Link};
use crate::inspect::Target;
use crate::kind::Kind;
use crate::location::Locus;
use crate::stack::ErrorStack;

// ============================================================================
// Error - the handle
// ============================================================================

/// A shared, immutable error value.
///
/// Two handles are equal when they point at the same node; equal text is not
/// enough.
///
/// ## Example
///
/// ```rust
/// use errstack::Error;
///
/// let base = errstack::new("connection refused");
/// let traced = errstack::annotate(base.clone(), "dialing db");
///
/// assert_eq!(traced.to_string(), "dialing db: connection refused");
/// assert_eq!(traced.cause(), &base);
/// assert_ne!(errstack::new("connection refused"), base);
/// ```
#[derive(Clone)]
pub struct Error {
    inner: Arc<dyn Chained>,
}

impl Error {
    /// Convert any error into a handle.
    ///
    /// A handle passes through unchanged and an [`Annotation`] keeps its
    /// capabilities. Anything else becomes an opaque leaf: its text,
    /// `source()` and concrete type stay reachable, but it has no location,
    /// message or cause of its own.
    pub fn new<E: IntoError>(err: E) -> Self {
        err.into_error()
    }

    /// Wrap a value that exposes [`Chained`] capabilities.
    pub fn from_chained<C: Chained>(value: C) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Convert a boxed error, such as the output of `anyhow::Error::into`.
    pub fn from_boxed(err: Box<DynError>) -> Self {
        let err = match err.downcast::<Error>() {
            Ok(handle) => return *handle,
            Err(other) => other,
        };
        match err.downcast::<Annotation>() {
            Ok(node) => Self::from_chained(*node),
            Err(other) => Self::from_chained(Boxed(other)),
        }
    }

    /// The capabilities of the node this handle points at.
    #[inline]
    pub fn chained(&self) -> &dyn Chained {
        &*self.inner
    }

    /// This handle as the first link of a walk.
    #[inline]
    pub fn link(&self) -> Link<'_> {
        Link::Chained(self.chained())
    }

    /// The node as an [`Annotation`], when it is one.
    pub fn node(&self) -> Option<&Annotation> {
        self.inner.as_any().downcast_ref()
    }

    /// The node as a mutable [`Annotation`], when it is one and this is the
    /// last handle to it.
    pub(crate) fn unique_node_mut(&mut self) -> Option<&mut Annotation> {
        Arc::get_mut(&mut self.inner)?.as_any_mut().downcast_mut()
    }

    /// The semantic reason for this error: the node's cause, or the handle
    /// itself when the node is its own cause.
    pub fn cause(&self) -> &Error {
        self.inner.cause().unwrap_or(self)
    }

    /// Where this error was created, when captured.
    pub fn location(&self) -> Option<Locus> {
        self.inner.location().filter(Locus::is_set)
    }

    /// The text this node contributes, when it is an annotation layer.
    pub fn message(&self) -> Option<&str> {
        self.inner.message()
    }

    /// The wrapped predecessor.
    pub fn underlying(&self) -> Option<&Error> {
        self.inner.underlying()
    }

    /// The kind carried by this node. See [`is_kind`](crate::is_kind) to
    /// search the whole chain.
    pub fn kind(&self) -> Option<Kind> {
        self.inner.kind()
    }

    /// Walk the chain, this node first.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self.link())
    }

    /// Downcast the concrete value behind this handle. For opaque leaves this
    /// is the original foreign error.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.value().downcast_ref()
    }

    /// See [`crate::is`].
    pub fn is<T: Target + ?Sized>(&self, target: &T) -> bool {
        crate::inspect::is(self, target)
    }

    /// See [`crate::has_type`].
    pub fn has_type<T: 'static>(&self) -> bool {
        crate::inspect::has_type::<T>(self)
    }

    /// See [`crate::as_type`].
    pub fn as_type<T: Clone + 'static>(&self) -> Option<T> {
        crate::inspect::as_type(self)
    }

    /// See [`crate::find`].
    pub fn find<T: 'static>(&self) -> Option<&T> {
        crate::inspect::find(self)
    }

    /// See [`crate::find_error`].
    pub fn find_error<T: core::error::Error + 'static>(&self) -> Option<&T> {
        crate::inspect::find_error(self)
    }

    /// See [`crate::check`].
    pub fn check(&self, predicate: impl FnOnce(&Error) -> bool) -> bool {
        crate::inspect::check(self, predicate)
    }

    /// The rendered stack, root first.
    pub fn stack_trace(&self) -> Vec<String> {
        ErrorStack::new(self).lines()
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner.as_dyn_error(), f)
    }
}

/// The display text followed by the stack, one indented line per link.
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)?;
        for line in ErrorStack::new(self).lines() {
            write!(f, "\n    {line}")?;
        }
        Ok(())
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.inner.as_dyn_error().source()
    }
}

impl From<Annotation> for Error {
    fn from(node: Annotation) -> Self {
        Self::from_chained(node)
    }
}

impl From<&Error> for Error {
    fn from(err: &Error) -> Self {
        err.clone()
    }
}

// ============================================================================
// IntoError - accepted inputs
// ============================================================================

/// Values accepted wherever an error is wrapped.
///
/// Implemented for every `core::error::Error + Send + Sync + 'static`.
/// Handles pass through without a new layer; clone a borrowed handle to pass
/// it on.
pub trait IntoError {
    /// Produce a handle.
    fn into_error(self) -> Error;
}

impl<E: core::error::Error + Send + Sync + 'static> IntoError for E {
    fn into_error(mut self) -> Error {
        let any: &mut dyn Any = &mut self;
        if let Some(handle) = any.downcast_ref::<Error>() {
            return handle.clone();
        }
        if let Some(handle) = any.downcast_ref::<&'static Error>() {
            return Error::clone(handle);
        }
        if let Some(node) = any.downcast_mut::<Annotation>() {
            return Error::from_chained(mem::replace(node, Annotation::blank()));
        }
        Error::from_chained(Opaque(self))
    }
}

// ============================================================================
// Adapters for foreign values
// ============================================================================

/// A foreign error without capabilities.
struct Opaque<E>(E);

impl<E: fmt::Display> fmt::Display for Opaque<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<E: fmt::Debug> fmt::Debug for Opaque<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<E: core::error::Error> core::error::Error for Opaque<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.0.source()
    }
}

impl<E: core::error::Error + Send + Sync + 'static> Chained for Opaque<E> {
    fn value(&self) -> &dyn Any {
        &self.0
    }
}

/// A boxed foreign error. The box is reported as this link's source so its
/// concrete type stays reachable by walks.
struct Boxed(Box<DynError>);

impl fmt::Display for Boxed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for Boxed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl core::error::Error for Boxed {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&*self.0)
    }
}

impl Chained for Boxed {}
