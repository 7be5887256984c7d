//! A dependency crate for testing errors that cross crate boundaries.
//!
//! It exposes the three shapes a caller meets in practice: plain errstack
//! chains, a custom error type that embeds an [`Annotation`] and forwards its
//! capabilities, and an ordinary error whose `source()` is an errstack chain.

use std::any::Any;
use std::fmt;
use std::sync::LazyLock;

use errstack::{Annotation, Chained, Error, Kind, Locus, ResultExt};

/// Shared sentinel returned when the remote end hangs up.
pub static CONNECTION_CLOSED: LazyLock<Error> = LazyLock::new(|| errstack::new("connection closed"));

/// A status code other crates can extract with `errstack::as_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

// ============================================================================
// StoreError - custom type with forwarded capabilities
// ============================================================================

/// Failure talking to the store. Carries a status code and claims
/// [`Kind::NotFound`] for 404s.
#[derive(Debug)]
pub struct StoreError {
    base: Annotation,
    status: u16,
}

impl StoreError {
    #[track_caller]
    pub fn new(status: u16, key: &str) -> Self {
        Self {
            base: Annotation::new(format!("store returned {status} for {key:?}")),
            status,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.base, f)
    }
}

impl std::error::Error for StoreError {}

impl Chained for StoreError {
    fn location(&self) -> Option<Locus> {
        self.base.location()
    }

    fn message(&self) -> Option<&str> {
        Some(self.base.message())
    }

    fn matches(&self, target: &dyn Any) -> bool {
        target.downcast_ref::<Kind>() == Some(&Kind::NotFound) && self.status == 404
    }

    fn convert_into(&self, target: &mut dyn Any) -> bool {
        match target.downcast_mut::<Option<StatusCode>>() {
            Some(slot) => {
                *slot = Some(StatusCode(self.status));
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// ConfigError - plain error with an errstack source
// ============================================================================

/// An ordinary error type that knows nothing about errstack beyond holding a
/// chain as its source.
#[derive(Debug)]
pub struct ConfigError {
    pub path: String,
    source: Error,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid config {}", self.path)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// ============================================================================
// Operations
// ============================================================================

/// A not-found error created in this crate.
pub fn fetch(key: &str) -> Result<String, Error> {
    Err(errstack::not_found(format_args!("key {key:?}")))
}

/// [`fetch`] plus a layer of context.
pub fn fetch_with_context(key: &str) -> Result<String, Error> {
    fetch(key).annotate("fetching from remote")
}

/// A store lookup failing with `status`.
pub fn lookup(status: u16, key: &str) -> Result<(), Error> {
    Err(Error::from_chained(StoreError::new(status, key)))
}

/// A config error whose source is a traced chain ending in
/// [`CONNECTION_CLOSED`].
pub fn load_config(path: &str) -> Result<(), ConfigError> {
    let source = errstack::annotate(errstack::trace(CONNECTION_CLOSED.clone()), "downloading");
    Err(ConfigError {
        path: path.to_string(),
        source,
    })
}

/// Several layers deep within this crate.
pub fn deep_operation() -> Result<(), Error> {
    level_one().trace()
}

fn level_one() -> Result<(), Error> {
    level_two().annotate("in level_one")
}

fn level_two() -> Result<(), Error> {
    Err(errstack::wrap(errstack::new("socket reset"), CONNECTION_CLOSED.clone()))
}
