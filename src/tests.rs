//! Unit tests for errstack.
//!
//! These tests are in a separate file for organization but remain in the `src/`
//! directory to retain access to `pub(crate)` items like `Visited`.

use crate::chained::{Link, Visited};
use crate::{Annotation, Error, ErrorStack, Kind, Locus, ResultExt, SourceRoot};
use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum TestError {
    NotFound,
    InvalidInput,
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::NotFound => write!(f, "not found"),
            TestError::InvalidInput => write!(f, "invalid input"),
        }
    }
}

impl core::error::Error for TestError {}

/// An error that reports itself as its own source.
#[derive(Debug)]
struct Loop;

impl fmt::Display for Loop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("loop")
    }
}

impl core::error::Error for Loop {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(self)
    }
}

// ============================================================================
// SourceRoot
// ============================================================================

#[test]
fn test_trim_registry_paths() {
    let root = SourceRoot::builder().strip_registry(true).build();
    assert_eq!(
        root.trim("/home/u/.cargo/registry/src/index.crates.io-6f17d22bba15001f/serde-1.0.200/src/de.rs"),
        "serde-1.0.200/src/de.rs"
    );
    assert_eq!(
        root.trim("C:\\Users\\u\\.cargo\\registry\\src\\index.crates.io-1949cf8c\\log-0.4.0\\src\\lib.rs"),
        "log-0.4.0\\src\\lib.rs"
    );
    assert_eq!(
        root.trim("/home/u/.cargo/git/checkouts/tokio-abc123/def456/tokio/src/lib.rs"),
        "def456/tokio/src/lib.rs"
    );
    assert_eq!(root.trim("src/lib.rs"), "src/lib.rs");
}

#[test]
fn test_trim_prefix() {
    let root = SourceRoot::builder().prefix(Some("/build/app")).build();
    assert_eq!(root.trim("/build/app/src/main.rs"), "src/main.rs");
    assert_eq!(root.trim("/other/src/main.rs"), "/other/src/main.rs");

    let registry_untouched = SourceRoot::builder().build();
    assert_eq!(
        registry_untouched.trim("/x/registry/src/idx/a-1.0/src/lib.rs"),
        "/x/registry/src/idx/a-1.0/src/lib.rs"
    );
}

#[test]
fn test_empty_prefix_is_ignored() {
    let root = SourceRoot::builder().prefix(Some("")).build();
    assert_eq!(root.trim("/abs/src/lib.rs"), "/abs/src/lib.rs");
}

#[test]
fn test_locus_display_in_root() {
    let locus = Locus::new("/build/app/src/db.rs", 42);
    let root = SourceRoot::builder().prefix(Some("/build/app/")).build();
    assert_eq!(alloc::format!("{}", locus), "/build/app/src/db.rs:42");
    assert_eq!(alloc::format!("{}", locus.display_in(&root)), "src/db.rs:42");
}

#[test]
fn test_caller_in_trims_with_given_root() {
    let root = SourceRoot::builder().prefix(Some("src/")).build();
    let (here, line) = (Locus::caller_in(&root), line!());
    assert_eq!(here.file(), file!().strip_prefix("src/").unwrap_or(file!()));
    assert_eq!(here.line(), line);
}

#[test]
fn test_unset_locus_is_not_rendered() {
    let node = Annotation::new("bare").with_location(Locus::UNSET);
    assert_eq!(node.location(), None);
    let err = Error::from(node);
    assert_eq!(err.location(), None);
    assert_eq!(err.stack_trace(), vec!["bare".to_string()]);
}

// ============================================================================
// IntoError
// ============================================================================

#[test]
fn test_handle_passes_through_into_error() {
    let err = crate::new("x");
    let same = Error::new(err.clone());
    assert_eq!(same, err);
}

#[test]
fn test_annotation_keeps_capabilities() {
    let inner = crate::new("inner");
    let (node, line) = (Annotation::new("direct"), line!());
    let err = Error::new(node.with_kind(Kind::Forbidden).with_underlying(inner.clone()));
    assert!(err.node().is_some());
    assert_eq!(err.kind(), Some(Kind::Forbidden));
    assert_eq!(err.location().map(|l| l.line()), Some(line));
    assert_eq!(err.underlying(), Some(&inner));
    assert_eq!(err.to_string(), "direct: inner");
}

#[test]
fn test_static_handle_passes_through_into_error() {
    let leaked: &'static Error = alloc::boxed::Box::leak(alloc::boxed::Box::new(crate::new("x")));
    assert_eq!(&Error::new(leaked), leaked);
    assert_eq!(crate::trace(leaked).underlying(), Some(leaked));
}

#[test]
fn test_foreign_error_is_opaque_leaf() {
    let err = Error::new(TestError::NotFound);
    assert_eq!(err.to_string(), "not found");
    assert_eq!(err.location(), None);
    assert_eq!(err.message(), None);
    assert_eq!(err.cause(), &err);
    assert_eq!(err.downcast_ref::<TestError>(), Some(&TestError::NotFound));
    assert!(err.node().is_none());
}

#[test]
fn test_from_boxed() {
    let boxed: alloc::boxed::Box<crate::DynError> = alloc::boxed::Box::new(TestError::InvalidInput);
    let err = Error::from_boxed(boxed);
    assert_eq!(err.to_string(), "invalid input");
    assert_eq!(err.find::<TestError>(), Some(&TestError::InvalidInput));

    let handle = crate::new("inner");
    let boxed: alloc::boxed::Box<crate::DynError> = alloc::boxed::Box::new(handle.clone());
    assert_eq!(Error::from_boxed(boxed), handle);
}

// ============================================================================
// Annotation display rules
// ============================================================================

#[test]
fn test_display_rules() {
    let base = crate::new("base");

    let plain = Annotation::located(Cow::Borrowed("msg"), Locus::UNSET, None, None, None);
    assert_eq!(plain.to_string(), "msg");

    let traced = Annotation::located(
        Cow::Borrowed(""),
        Locus::UNSET,
        Some(base.clone()),
        Some(base.clone()),
        None,
    );
    assert!(!traced.substitutes_cause());
    assert_eq!(traced.to_string(), "base");

    let annotated = Annotation::located(
        Cow::Borrowed("ctx"),
        Locus::UNSET,
        Some(base.clone()),
        Some(base.clone()),
        None,
    );
    assert_eq!(annotated.to_string(), "ctx: base");

    let other = crate::new("other");
    let substituted = Annotation::located(
        Cow::Borrowed("ctx"),
        Locus::UNSET,
        Some(base.clone()),
        Some(other),
        None,
    );
    assert!(substituted.substitutes_cause());
    assert_eq!(substituted.to_string(), "ctx: other");

    let cause_only = Annotation::located(
        Cow::Borrowed(""),
        Locus::UNSET,
        None,
        Some(base),
        None,
    );
    assert_eq!(cause_only.to_string(), "base");
}

#[test]
fn test_annotation_source_is_underlying() {
    use core::error::Error as _;

    let base = crate::new("base");
    let err = crate::annotate(base.clone(), "ctx");
    let source = err.source().and_then(|s| s.downcast_ref::<Error>());
    assert_eq!(source, Some(&base));
}

#[test]
fn test_with_cause_stores_terminal_cause() {
    let root = crate::new("root");
    let traced = crate::trace(root.clone());
    let node = Annotation::new("n").with_cause(traced);
    assert_eq!(node.cause(), Some(&root));
}

// ============================================================================
// Walks
// ============================================================================

#[test]
fn test_visited_guard() {
    let a = crate::new("a");
    let b = crate::new("b");
    let mut visited = Visited::new();
    assert!(visited.first_visit(a.link()));
    assert!(visited.first_visit(b.link()));
    assert!(!visited.first_visit(a.link()));
}

#[test]
fn test_visited_guard_spills_past_inline_links() {
    let errs: Vec<Error> = (0..20).map(|i| crate::new(alloc::format!("e{i}"))).collect();
    let mut visited = Visited::new();
    for err in &errs {
        assert!(visited.first_visit(err.link()));
    }
    assert!(visited.spilled());
    assert!(!visited.first_visit(errs[0].link()));
    assert!(!visited.first_visit(errs[19].link()));
}

#[cfg(feature = "smallvec")]
#[test]
fn test_visited_guard_stays_inline_for_short_walks() {
    let errs: Vec<Error> = (0..8).map(|i| crate::new(alloc::format!("e{i}"))).collect();
    let mut visited = Visited::new();
    for err in &errs {
        assert!(visited.first_visit(err.link()));
    }
    assert!(visited.inline());
    assert!(!visited.spilled());
    assert!(!visited.first_visit(errs[3].link()));
}

#[test]
fn test_self_sourcing_error_terminates() {
    let err = crate::annotate(Loop, "ctx");
    // annotation, opaque leaf, the leaf's source once
    assert_eq!(err.chain().count(), 3);
    assert!(!crate::is(&err, &crate::new("elsewhere")));
    assert!(crate::has_type::<Loop>(&err));
}

#[test]
fn test_chain_order_outer_first() {
    let err = crate::annotate(crate::trace(crate::new("root")), "outer");
    let texts: Vec<String> = err.chain().map(|link| link.to_string()).collect();
    assert_eq!(texts, vec!["outer: root", "root", "root"]);
    let messages: Vec<Option<&str>> = err
        .chain()
        .map(|link| link.chained().and_then(|c| c.message()))
        .collect();
    assert_eq!(messages, vec![Some("outer"), Some(""), Some("root")]);
}

#[test]
fn test_link_from_std_recognizes_handles() {
    let handle = crate::new("h");
    let as_std: &(dyn core::error::Error + 'static) = &handle;
    assert!(matches!(Link::from_std(as_std), Link::Chained(_)));

    let foreign = TestError::NotFound;
    let as_std: &(dyn core::error::Error + 'static) = &foreign;
    assert!(matches!(Link::from_std(as_std), Link::Std(_)));
}

#[test]
fn test_link_extract_clones() {
    let err = crate::trace(TestError::InvalidInput);
    let found = err.chain().find_map(Link::extract::<TestError>);
    assert_eq!(found, Some(TestError::InvalidInput));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_stack_lines_are_root_first() {
    let err = crate::annotate(crate::new("first"), "second");
    let lines = err.stack_trace();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(": first"));
    assert!(lines[1].ends_with(": second"));
}

#[test]
fn test_compact_drops_pure_trace_points() {
    let err = crate::annotate(crate::trace(crate::new("first")), "more");
    assert_eq!(ErrorStack::new(&err).lines().len(), 3);
    assert_eq!(ErrorStack::new(&err).compact().lines().len(), 2);
}

#[test]
fn test_debug_includes_stack() {
    let err = crate::annotate(crate::new("first"), "more");
    let debug = alloc::format!("{:?}", err);
    let mut lines = debug.lines();
    assert_eq!(lines.next(), Some("more: first"));
    assert!(lines.next().is_some_and(|l| l.starts_with("    ") && l.ends_with(": first")));
    assert!(lines.next().is_some_and(|l| l.ends_with(": more")));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_annotate_with_is_lazy() {
    let mut called = false;
    let ok: Result<u8, TestError> = Ok(1);
    let out = ok.annotate_with(|| {
        called = true;
        "never"
    });
    assert_eq!(out.ok(), Some(1));
    assert!(!called);
}
