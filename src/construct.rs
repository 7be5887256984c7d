//! Building and extending chains.
//!
//! Every function records the caller's location. Functions that wrap accept
//! anything implementing [`IntoError`]: an [`Error`] handle is extended in
//! place (no double wrapping) and any other error becomes an opaque leaf.
//!
//! | function | message | cause |
//! |---|---|---|
//! | [`new`] | `message` | itself |
//! | [`trace`] | empty | cause of `err` |
//! | [`annotate`] | `message` | cause of `err` |
//! | [`wrap`] | empty | cause of `new_cause` |
//! | [`wrap_with`] | `message` | cause of `new_cause` |
//! | [`mask`] | empty | itself |
//! | [`mask_with`] | `message` | itself |

use alloc::borrow::Cow;

use crate::annotation::Annotation;
use crate::error::{Error, IntoError};
use crate::location::Locus;

#[track_caller]
fn layer(message: Cow<'static, str>, underlying: Error, cause: Option<Error>) -> Error {
    Error::from_chained(Annotation::located(
        message,
        Locus::caller(),
        Some(underlying),
        cause,
        None,
    ))
}

/// A new root error.
///
/// ```rust
/// let (err, line) = (errstack::new("validation failed"), line!());
/// assert_eq!(err.to_string(), "validation failed");
/// assert_eq!(err.location().map(|l| l.line()), Some(line));
/// ```
#[track_caller]
pub fn new(message: impl Into<Cow<'static, str>>) -> Error {
    Error::from_chained(Annotation::new(message))
}

/// Record the caller's location without changing the text or the cause.
#[track_caller]
pub fn trace(err: impl IntoError) -> Error {
    let err = err.into_error();
    let cause = err.cause().clone();
    layer(Cow::Borrowed(""), err, Some(cause))
}

/// Add context to `err`. The text becomes `"<message>: <err>"`; the cause is
/// unchanged.
#[track_caller]
pub fn annotate(err: impl IntoError, message: impl Into<Cow<'static, str>>) -> Error {
    let err = err.into_error();
    let cause = err.cause().clone();
    layer(message.into(), err, Some(cause))
}

/// Keep `err` as the predecessor but report `new_cause` as the reason.
///
/// The cause of `new_cause` is stored, not `new_cause` itself, so the text
/// becomes the text of that cause: context annotated onto `new_cause` is
/// dropped.
///
/// ```rust
/// let detail = errstack::new("detail");
/// let err = errstack::wrap(errstack::new("first"), detail.clone());
/// assert_eq!(err.to_string(), "detail");
/// assert_eq!(err.cause(), &detail);
///
/// let err = errstack::wrap(errstack::new("first"), errstack::annotate(detail, "ctx"));
/// assert_eq!(err.to_string(), "detail");
/// ```
#[track_caller]
pub fn wrap(err: impl IntoError, new_cause: impl IntoError) -> Error {
    let cause = new_cause.into_error().cause().clone();
    layer(Cow::Borrowed(""), err.into_error(), Some(cause))
}

/// [`wrap`] with a message: the text becomes `"<message>: <cause>"`, where
/// `<cause>` is the cause of `new_cause`.
#[track_caller]
pub fn wrap_with(
    err: impl IntoError,
    new_cause: impl IntoError,
    message: impl Into<Cow<'static, str>>,
) -> Error {
    let cause = new_cause.into_error().cause().clone();
    layer(message.into(), err.into_error(), Some(cause))
}

/// Hide the cause of `err`: the new layer becomes its own cause, so
/// [`cause`](crate::cause) and [`check`](crate::check) stop here.
/// Walks used by [`is`](crate::is) and [`as_type`](crate::as_type) still see
/// the whole chain.
#[track_caller]
pub fn mask(err: impl IntoError) -> Error {
    layer(Cow::Borrowed(""), err.into_error(), None)
}

/// [`mask`] with a message.
#[track_caller]
pub fn mask_with(err: impl IntoError, message: impl Into<Cow<'static, str>>) -> Error {
    layer(message.into(), err.into_error(), None)
}

/// [`new`], and emit an error-level `tracing` event carrying the message and
/// location.
#[cfg(feature = "tracing")]
#[track_caller]
pub fn new_logged(message: impl core::fmt::Display) -> Error {
    let err = new(alloc::format!("{message}"));
    match err.location() {
        Some(location) => tracing::error!(%location, "{}", err),
        None => tracing::error!("{}", err),
    }
    err
}
