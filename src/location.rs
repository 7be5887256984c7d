//! Call-site capture and display normalization of source paths.
//!
//! [`Locus`] is the `(file, line)` pair recorded by every constructor.
//! [`SourceRoot`] is the immutable configuration that decides which leading
//! path components are stripped so traces read the same on every build host.

use core::fmt;
use core::panic::Location;

// ============================================================================
// SourceRoot - path normalization config
// ============================================================================

/// Path markers Cargo uses for dependency sources. Everything up to and
/// including the marker plus the following directory is stripped.
const REGISTRY_MARKERS: &[&str] = &[
    "/registry/src/",
    "\\registry\\src\\",
    "/git/checkouts/",
    "\\git\\checkouts\\",
];

/// Immutable settings for normalizing captured file paths.
///
/// Build one with [`SourceRoot::builder()`]; every builder method is
/// `const fn`, so a custom root can live in a `static`.
///
/// ## Example
///
/// ```rust
/// use errstack::SourceRoot;
///
/// static ROOT: SourceRoot = SourceRoot::builder()
///     .prefix(Some("crates/storage/"))
///     .strip_registry(true)
///     .build();
///
/// assert_eq!(ROOT.trim("crates/storage/src/db.rs"), "src/db.rs");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRoot {
    prefix: Option<&'static str>,
    strip_registry: bool,
}

impl SourceRoot {
    /// The root used when constructors capture a location.
    ///
    /// Its prefix comes from the `ERRSTACK_SOURCE_ROOT` environment variable
    /// at compile time; Cargo registry and git checkout prefixes are always
    /// stripped.
    pub const DEFAULT: SourceRoot = SourceRoot::builder()
        .prefix(option_env!("ERRSTACK_SOURCE_ROOT"))
        .strip_registry(true)
        .build();

    /// Create a builder with no prefix and registry stripping disabled.
    pub const fn builder() -> SourceRootBuilder {
        SourceRootBuilder::new()
    }

    /// The configured prefix, if any.
    pub const fn prefix(&self) -> Option<&'static str> {
        self.prefix
    }

    /// Whether Cargo registry and git checkout prefixes are stripped.
    pub const fn strips_registry(&self) -> bool {
        self.strip_registry
    }

    /// Normalize `file` for display.
    pub fn trim<'f>(&self, file: &'f str) -> &'f str {
        let mut file = file;
        if self.strip_registry {
            file = strip_registry(file);
        }
        if let Some(prefix) = self.prefix.filter(|p| !p.is_empty()) {
            if let Some(rest) = file.strip_prefix(prefix) {
                file = rest.trim_start_matches(['/', '\\']);
            }
        }
        file
    }
}

impl Default for SourceRoot {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `~/.cargo/registry/src/index.crates.io-6f17/serde-1.0.0/src/de.rs`
/// becomes `serde-1.0.0/src/de.rs`.
fn strip_registry(file: &str) -> &str {
    for marker in REGISTRY_MARKERS {
        if let Some(idx) = file.find(marker) {
            let rest = &file[idx + marker.len()..];
            return rest.split_once(['/', '\\']).map_or(rest, |(_, tail)| tail);
        }
    }
    file
}

/// Builder for [`SourceRoot`].
#[derive(Debug, Clone, Copy)]
pub struct SourceRootBuilder {
    prefix: Option<&'static str>,
    strip_registry: bool,
}

impl SourceRootBuilder {
    /// Create a new builder with default values.
    pub const fn new() -> Self {
        Self {
            prefix: None,
            strip_registry: false,
        }
    }

    /// Set the prefix stripped from the front of every file path.
    pub const fn prefix(mut self, prefix: Option<&'static str>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Strip Cargo registry and git checkout prefixes.
    pub const fn strip_registry(mut self, strip: bool) -> Self {
        self.strip_registry = strip;
        self
    }

    /// Build the final `SourceRoot`.
    pub const fn build(self) -> SourceRoot {
        SourceRoot {
            prefix: self.prefix,
            strip_registry: self.strip_registry,
        }
    }
}

impl Default for SourceRootBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Locus - a captured call site
// ============================================================================

/// A source location: the file and line where an error was created or
/// annotated.
///
/// ```rust
/// use errstack::Locus;
///
/// let (here, line) = (Locus::caller(), line!());
/// assert_eq!(here.file(), file!());
/// assert_eq!(here.line(), line);
/// assert_eq!(here.to_string(), format!("{}:{}", file!(), line));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Locus {
    file: &'static str,
    line: u32,
}

impl Locus {
    /// The location of a node built without capture. Never rendered.
    pub const UNSET: Locus = Locus { file: "", line: 0 };

    /// Create a location from its parts.
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Capture the caller's location, normalized with [`SourceRoot::DEFAULT`].
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        Self::from_location(Location::caller(), &SourceRoot::DEFAULT)
    }

    /// Capture the caller's location, normalized with `root`.
    #[track_caller]
    #[inline]
    pub fn caller_in(root: &SourceRoot) -> Self {
        Self::from_location(Location::caller(), root)
    }

    /// Convert a `core::panic::Location`, normalizing its file with `root`.
    pub fn from_location(loc: &'static Location<'static>, root: &SourceRoot) -> Self {
        Self {
            file: root.trim(loc.file()),
            line: loc.line(),
        }
    }

    /// The (normalized) file path.
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// The line number.
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Whether this location was actually captured.
    pub const fn is_set(&self) -> bool {
        !self.file.is_empty()
    }

    /// Display this location with its file re-trimmed by `root`.
    pub fn display_in<'a>(&self, root: &'a SourceRoot) -> impl fmt::Display + 'a {
        LocusIn { locus: *self, root }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

struct LocusIn<'a> {
    locus: Locus,
    root: &'a SourceRoot,
}

impl fmt::Display for LocusIn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.root.trim(self.locus.file), self.locus.line)
    }
}
