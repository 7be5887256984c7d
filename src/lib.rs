//! # errstack - Annotated error chains
//!
//! Wrap failures with context as they travel up the stack, without losing the
//! original error or its type.
//!
//! ```text
//! src/store.rs:41: permission denied
//! src/config.rs:88: reading settings
//! src/main.rs:12: starting server
//! ```
//!
//! ## Try It Now
//!
//! Create errors with [`new()`] or [`errorf!`], add context with
//! [`annotate()`] or [`ResultExt`], and ask questions with [`cause()`],
//! [`is()`] and [`as_type()`]:
//!
//! ```rust
//! use errstack::{Error, ResultExt};
//!
//! fn read_settings() -> Result<String, Error> {
//!     Err(errstack::new("permission denied"))
//! }
//!
//! fn start() -> Result<(), Error> {
//!     let _settings = read_settings().annotate("reading settings")?;
//!     Ok(())
//! }
//!
//! let err = start().unwrap_err();
//! assert_eq!(err.to_string(), "reading settings: permission denied");
//! assert_eq!(err.cause().to_string(), "permission denied");
//! println!("{}", errstack::error_stack(&err));
//! ```
//!
//! ## Two chains in one
//!
//! Every layer links to the error it wraps (its *underlying* error) and to the
//! error that explains it (its *cause*). The underlying chain is what
//! [`error_stack`] prints; the cause is what [`cause()`] and [`check()`]
//! answer with.
//!
//! | Operation | Text | Cause |
//! |-----------|------|-------|
//! | [`trace`] | unchanged | unchanged |
//! | [`annotate`] / [`annotatef!`] | `"msg: <err>"` | unchanged |
//! | [`wrap`] / [`wrapf!`] | text of the new cause | the new cause |
//! | [`mask`] / [`maskf!`] | unchanged | the new layer |
//!
//! ## Kinds
//!
//! [`Kind`] tags errors with a classification that survives any amount of
//! wrapping: [`not_found`], [`new_not_found`] and [`is_not_found`], and the
//! same triple for every other kind.
//!
//! ## Foreign errors
//!
//! Any `core::error::Error + Send + Sync + 'static` can be wrapped. It becomes
//! an opaque leaf whose concrete type stays reachable through
//! [`as_type()`] and [`find()`], and whose `source()` chain is followed by
//! [`is()`] and [`find_error()`]. Types that want to take part fully implement [`Chained`] and
//! enter through [`Error::from_chained`].
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `smallvec` | Keep the walk's revisit guard inline for the first 8 links |
//! | `tracing` | Enable `new_logged`, which emits an error event on creation |
//!
//! ## Source paths
//!
//! Locations come from `#[track_caller]`. Paths under the Cargo registry or
//! git checkouts are shortened to `crate-1.2.3/src/...`. Set
//! `ERRSTACK_SOURCE_ROOT` at compile time to strip a prefix of your own, or
//! render with [`ErrorStack::with_root`].

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

mod aggregate;
mod annotation;
mod chained;
mod construct;
mod error;
mod ext;
mod inspect;
mod kind;
mod location;
pub mod prelude;
mod stack;

pub use aggregate::{BulkError, MultiError, is_bulk_error, is_multi_error};
pub use annotation::Annotation;
pub use chained::{AsDynError, Chain, Chained, DynError, Link};
#[cfg(feature = "tracing")]
pub use construct::new_logged;
pub use construct::{annotate, mask, mask_with, new, trace, wrap, wrap_with};
pub use error::{Error, IntoError};
pub use ext::ResultExt;
pub use inspect::{
    Sentinel, Target, as_target, as_type, cause, check, find, find_error, has_type, is,
};
pub use kind::*;
pub use location::{Locus, SourceRoot, SourceRootBuilder};
pub use stack::{ErrorStack, error_stack};

#[doc(hidden)]
pub mod __private {
    pub use alloc::format;
}

// ============================================================================
// Formatting macros
// ============================================================================

/// [`new`] with a formatted message.
///
/// ```rust
/// let err = errstack::errorf!("user {} has no quota", 42);
/// assert_eq!(err.to_string(), "user 42 has no quota");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::new($crate::__private::format!($($arg)+))
    };
}

/// [`annotate`] with a formatted message.
///
/// ```rust
/// let path = "/etc/app.toml";
/// let err = errstack::annotatef!(errstack::new("no such file"), "opening {path}");
/// assert_eq!(err.to_string(), "opening /etc/app.toml: no such file");
/// ```
#[macro_export]
macro_rules! annotatef {
    ($err:expr, $($arg:tt)+) => {
        $crate::annotate($err, $crate::__private::format!($($arg)+))
    };
}

/// [`wrap_with`] with a formatted message.
///
/// ```rust
/// let err = errstack::wrapf!(
///     errstack::new("eof"),
///     errstack::new("bad header"),
///     "parsing {}",
///     "index.db",
/// );
/// assert_eq!(err.to_string(), "parsing index.db: bad header");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $cause:expr, $($arg:tt)+) => {
        $crate::wrap_with($err, $cause, $crate::__private::format!($($arg)+))
    };
}

/// [`mask_with`] with a formatted message.
///
/// ```rust
/// let err = errstack::maskf!(errstack::new("secret detail"), "request {}", 7);
/// assert_eq!(err.to_string(), "request 7: secret detail");
/// assert_eq!(err.cause(), &err);
/// ```
#[macro_export]
macro_rules! maskf {
    ($err:expr, $($arg:tt)+) => {
        $crate::mask_with($err, $crate::__private::format!($($arg)+))
    };
}

#[cfg(test)]
mod tests;
