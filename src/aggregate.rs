//! Errors that collect the failures of several operations.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::Error;

// ============================================================================
// BulkError - one slot per request item
// ============================================================================

/// The outcome of a bulk request: one optional error per item id.
///
/// ```rust
/// use errstack::BulkError;
///
/// let mut bulk = BulkError::new(["a", "b", "c"]);
/// assert!(bulk.set("b", Some(errstack::new("boom"))));
/// assert!(!bulk.set("zzz", Some(errstack::new("ignored"))));
/// assert_eq!(bulk.to_string(), r#"1/3 items failed a bulk request: ("b") boom"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BulkError {
    ids: Vec<String>,
    errors: BTreeMap<String, Option<Error>>,
    failed: usize,
}

impl BulkError {
    /// A bulk error with an empty slot for each id.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        let errors = ids.iter().map(|id| (id.clone(), None)).collect();
        Self {
            ids,
            errors,
            failed: 0,
        }
    }

    /// Record the outcome for `id`. Returns `false` if `id` is unknown.
    pub fn set(&mut self, id: &str, err: Option<Error>) -> bool {
        let Some(slot) = self.errors.get_mut(id) else {
            return false;
        };
        match (slot.is_some(), err.is_some()) {
            (false, true) => self.failed += 1,
            (true, false) => self.failed -= 1,
            _ => {}
        }
        *slot = err;
        true
    }

    /// How many items currently hold an error.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// The ids, in the order given to [`new`](Self::new).
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The outcome for each id, in id order.
    pub fn enumerate(&self) -> Vec<Option<&Error>> {
        self.ids
            .iter()
            .map(|id| self.errors.get(id).and_then(Option::as_ref))
            .collect()
    }
}

impl fmt::Display for BulkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} items failed a bulk request",
            self.failed,
            self.ids.len()
        )?;
        if self.failed == 0 {
            return Ok(());
        }
        f.write_str(": ")?;
        let failures = self
            .ids
            .iter()
            .filter_map(|id| Some((id, self.errors.get(id)?.as_ref()?)));
        for (i, (id, err)) in failures.enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "({id:?}) {err}")?;
        }
        Ok(())
    }
}

impl core::error::Error for BulkError {}

// ============================================================================
// MultiError - ordered collection of errors
// ============================================================================

/// An ordered set of errors, each tagged with an id that need not be unique.
///
/// ```rust
/// use errstack::MultiError;
///
/// let mut multi = MultiError::new();
/// multi.push(errstack::new("disk full"), "vol-1");
/// multi.push(errstack::new("timeout"), "");
/// assert_eq!(multi.to_string(), r#"2 errors (for 2 IDs): ("vol-1") disk full,timeout"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MultiError {
    entries: Vec<(Error, String)>,
}

impl MultiError {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `err` under `id`. Use `""` for no id.
    pub fn push(&mut self, err: Error, id: impl Into<String>) {
        self.entries.push((err, id.into()));
    }

    /// The errors and their ids, in insertion order.
    pub fn errors(&self) -> impl Iterator<Item = (&Error, &str)> {
        self.entries.iter().map(|(err, id)| (err, id.as_str()))
    }

    /// Number of entries, counting repeated ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was pushed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors", self.entries.len())?;
        if self.entries.is_empty() {
            return Ok(());
        }
        let mut ids: Vec<&str> = self.entries.iter().map(|(_, id)| id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() > 1 {
            write!(f, " (for {} IDs)", ids.len())?;
        }
        f.write_str(": ")?;
        for (i, (err, id)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if id.is_empty() {
                write!(f, "{err}")?;
            } else {
                write!(f, "({id:?}) {err}")?;
            }
        }
        Ok(())
    }
}

impl core::error::Error for MultiError {}

// ============================================================================
// Predicates
// ============================================================================

/// Whether the cause of `err` is a [`BulkError`].
pub fn is_bulk_error<'a>(err: impl Into<Option<&'a Error>>) -> bool {
    crate::check(err, |cause| cause.downcast_ref::<BulkError>().is_some())
}

/// Whether the cause of `err` is a [`MultiError`].
pub fn is_multi_error<'a>(err: impl Into<Option<&'a Error>>) -> bool {
    crate::check(err, |cause| cause.downcast_ref::<MultiError>().is_some())
}
