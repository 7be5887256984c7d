//! Extension trait for extending chains directly on `Result`s.
//!
//! `Ok` values pass through untouched; only the error side gains a layer,
//! recorded at the caller of the method.

use alloc::borrow::Cow;

use crate::error::{Error, IntoError};

// ============================================================================
// ResultExt Trait - chain operations on Result<T, E>
// ============================================================================

/// Chain operations on `Result<T, E>` for any `E: IntoError`.
///
/// ```rust
/// use errstack::{Error, ResultExt};
///
/// fn open(name: &str) -> Result<(), Error> {
///     Err(errstack::not_found(format_args!("file {name:?}")))
/// }
///
/// fn load() -> Result<(), Error> {
///     open("app.toml").annotate("loading settings")?;
///     Ok(())
/// }
///
/// let err = load().unwrap_err();
/// assert_eq!(err.to_string(), "loading settings: file \"app.toml\" not found");
/// assert!(errstack::is_not_found(&err));
/// ```
pub trait ResultExt<T> {
    /// [`trace`](crate::trace) the error.
    #[track_caller]
    fn trace(self) -> Result<T, Error>;

    /// [`annotate`](crate::annotate) the error with `message`.
    #[track_caller]
    fn annotate(self, message: impl Into<Cow<'static, str>>) -> Result<T, Error>;

    /// Like [`annotate`](Self::annotate), building the message only on `Err`.
    #[track_caller]
    fn annotate_with<M, F>(self, f: F) -> Result<T, Error>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M;

    /// [`wrap`](crate::wrap) the error with `new_cause`.
    #[track_caller]
    fn wrap(self, new_cause: impl IntoError) -> Result<T, Error>;

    /// [`mask`](crate::mask) the error.
    #[track_caller]
    fn mask(self) -> Result<T, Error>;
}

impl<T, E: IntoError> ResultExt<T> for Result<T, E> {
    #[track_caller]
    #[inline]
    fn trace(self) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(crate::trace(e)),
        }
    }

    #[track_caller]
    #[inline]
    fn annotate(self, message: impl Into<Cow<'static, str>>) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(crate::annotate(e, message)),
        }
    }

    #[track_caller]
    #[inline]
    fn annotate_with<M, F>(self, f: F) -> Result<T, Error>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(crate::annotate(e, f())),
        }
    }

    #[track_caller]
    #[inline]
    fn wrap(self, new_cause: impl IntoError) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(crate::wrap(e, new_cause)),
        }
    }

    #[track_caller]
    #[inline]
    fn mask(self) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(crate::mask(e)),
        }
    }
}
