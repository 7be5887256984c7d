//! Semantic classification of errors.
//!
//! Every [`Kind`] comes with three functions: a constructor that appends the
//! kind's suffix to the message (`not_found("user 42")` reads
//! `"user 42 not found"`), a wrapping constructor that tags an existing error
//! (`new_not_found(err, "lookup")`), and a predicate that searches the whole
//! chain (`is_not_found(&err)`).

use alloc::borrow::Cow;
use alloc::format;
use core::fmt;

use crate::annotation::Annotation;
use crate::error::{Error, IntoError};
use crate::location::Locus;

macro_rules! kinds {
    ($(
        $(#[$meta:meta])*
        $variant:ident => $label:literal, $suffix:literal, $ctor:ident, $wrap:ident, $is:ident;
    )*) => {
        /// The closed set of error classifications.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Kind {
            $( $(#[$meta])* $variant, )*
        }

        impl Kind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [Kind] = &[$(Kind::$variant,)*];

            /// Human-readable name, used by `Display`.
            pub const fn label(self) -> &'static str {
                match self {
                    $(Kind::$variant => $label,)*
                }
            }

            /// Text appended to messages by the kind's constructor. Empty for
            /// kinds whose message is used as-is.
            pub const fn suffix(self) -> &'static str {
                match self {
                    $(Kind::$variant => $suffix,)*
                }
            }
        }

        $(
            #[doc = concat!("A new [`Kind::", stringify!($variant), "`] error; the message gets the suffix `\"", $suffix, "\"`.")]
            #[track_caller]
            pub fn $ctor(message: impl fmt::Display) -> Error {
                kind_error(Kind::$variant, message)
            }

            #[doc = concat!("Tag `err` as [`Kind::", stringify!($variant), "`], adding `message` as context.")]
            #[track_caller]
            pub fn $wrap(err: impl IntoError, message: impl Into<Cow<'static, str>>) -> Error {
                with_kind(err, Kind::$variant, message)
            }

            #[doc = concat!("Whether any link of `err` is a [`Kind::", stringify!($variant), "`] error.")]
            pub fn $is<'a>(err: impl Into<Option<&'a Error>>) -> bool {
                is_kind(err, Kind::$variant)
            }
        )*
    };
}

kinds! {
    /// An operation did not finish in time.
    Timeout => "timeout", " timeout", timeout, new_timeout, is_timeout;
    /// Something that was looked up does not exist.
    NotFound => "not found", " not found", not_found, new_not_found, is_not_found;
    /// A user account does not exist.
    UserNotFound => "user not found", " user not found", user_not_found, new_user_not_found, is_user_not_found;
    Unauthorized => "unauthorized", "", unauthorized, new_unauthorized, is_unauthorized;
    NotImplemented => "not implemented", " not implemented", not_implemented, new_not_implemented, is_not_implemented;
    AlreadyExists => "already exists", " already exists", already_exists, new_already_exists, is_already_exists;
    NotSupported => "not supported", " not supported", not_supported, new_not_supported, is_not_supported;
    /// Input failed validation.
    NotValid => "not valid", " not valid", not_valid, new_not_valid, is_not_valid;
    NotProvisioned => "not provisioned", " not provisioned", not_provisioned, new_not_provisioned, is_not_provisioned;
    NotAssigned => "not assigned", " not assigned", not_assigned, new_not_assigned, is_not_assigned;
    BadRequest => "bad request", "", bad_request, new_bad_request, is_bad_request;
    MethodNotAllowed => "method not allowed", "", method_not_allowed, new_method_not_allowed, is_method_not_allowed;
    Forbidden => "forbidden", "", forbidden, new_forbidden, is_forbidden;
    /// A quota or rate limit was hit.
    QuotaLimitExceeded => "quota limit exceeded", "", quota_limit_exceeded, new_quota_limit_exceeded, is_quota_limit_exceeded;
    /// The resource exists but cannot be used yet.
    NotYetAvailable => "not yet available", "", not_yet_available, new_not_yet_available, is_not_yet_available;
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A new error of a kind chosen at runtime. The kind's suffix is appended to
/// `message`.
///
/// ```rust
/// use errstack::Kind;
///
/// let err = errstack::kind_error(Kind::NotFound, format_args!("user {}", 42));
/// assert_eq!(err.to_string(), "user 42 not found");
/// assert!(errstack::is_not_found(&err));
/// ```
#[track_caller]
pub fn kind_error(kind: Kind, message: impl fmt::Display) -> Error {
    let message = format!("{message}{}", kind.suffix());
    Error::from_chained(Annotation::new(message).with_kind(kind))
}

/// Tag `err` with a kind chosen at runtime. The new layer is its own cause,
/// so [`cause`](crate::cause) stops here.
#[track_caller]
pub fn with_kind(err: impl IntoError, kind: Kind, message: impl Into<Cow<'static, str>>) -> Error {
    Error::from_chained(Annotation::located(
        message.into(),
        Locus::caller(),
        Some(err.into_error()),
        None,
        Some(kind),
    ))
}

/// Whether any link of `err` carries `kind` (or claims it through
/// [`Chained::matches`](crate::Chained::matches)).
pub fn is_kind<'a>(err: impl Into<Option<&'a Error>>, kind: Kind) -> bool {
    crate::inspect::is(err, &kind)
}
