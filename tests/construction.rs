//! Tests for the construction operations: text, cause and location of each
//! kind of layer.

use errstack::{Error, ResultExt, annotatef, errorf, maskf, wrapf};

#[derive(Debug, thiserror::Error)]
#[error("io failure on {path}")]
struct IoFailure {
    path: String,
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn new_displays_message() {
    assert_eq!(errstack::new("x").to_string(), "x");
    assert_eq!(errorf!("x {}", 1).to_string(), "x 1");
}

#[test]
fn annotate_prefixes_message() {
    let err = errstack::annotate(errstack::new("x"), "ctx");
    assert_eq!(err.to_string(), "ctx: x");

    let id = 7;
    let err = annotatef!(err, "request {id}");
    assert_eq!(err.to_string(), "request 7: ctx: x");
}

#[test]
fn trace_keeps_text() {
    let err = errstack::trace(errstack::trace(errstack::new("x")));
    assert_eq!(err.to_string(), "x");
    assert_eq!(err.message(), Some(""));
}

#[test]
fn wrap_shows_new_cause() {
    let detail = errstack::new("detail");
    let err = errstack::wrap(errstack::new("first"), detail.clone());
    assert_eq!(err.to_string(), "detail");
    assert_eq!(err.cause(), &detail);
    assert_eq!(err.underlying().map(|e| e.to_string()), Some("first".into()));
}

#[test]
fn wrap_drops_context_annotated_onto_new_cause() {
    let detail = errstack::new("x");
    let err = errstack::wrap(errstack::new("first"), errstack::annotate(detail.clone(), "ctx"));
    assert_eq!(err.to_string(), "x");
    assert_eq!(err.cause(), &detail);

    let err = errstack::wrap_with(errstack::new("first"), errstack::annotate(detail, "ctx"), "step");
    assert_eq!(err.to_string(), "step: x");
}

#[test]
fn wrapf_shows_message_and_new_cause() {
    let err = wrapf!(errstack::new("first"), errstack::new("detail"), "step {}", 2);
    assert_eq!(err.to_string(), "step 2: detail");
}

#[test]
fn mask_hides_cause_but_keeps_text() {
    let base = errstack::new("secret");
    let masked = errstack::mask(base.clone());
    assert_eq!(masked.to_string(), "secret");
    assert_eq!(masked.cause(), &masked);
    assert_ne!(masked.cause(), &base);

    let masked = maskf!(base, "public {}", "view");
    assert_eq!(masked.to_string(), "public view: secret");
    assert_eq!(masked.cause(), &masked);
}

#[test]
fn foreign_errors_become_leaves() {
    let err = errstack::annotate(IoFailure { path: "/tmp/a".into() }, "saving");
    assert_eq!(err.to_string(), "saving: io failure on /tmp/a");
    let cause = err.cause();
    assert_eq!(cause.to_string(), "io failure on /tmp/a");
    assert!(cause.downcast_ref::<IoFailure>().is_some());
}

#[test]
fn anyhow_errors_enter_through_from_boxed() {
    let any = anyhow::anyhow!("upstream exploded");
    let err = errstack::annotate(Error::from_boxed(any.into()), "calling upstream");
    assert_eq!(err.to_string(), "calling upstream: upstream exploded");
}

// ============================================================================
// Cause
// ============================================================================

#[test]
fn cause_is_idempotent() {
    let base = errstack::new("base");
    let candidates = [
        base.clone(),
        errstack::trace(base.clone()),
        errstack::annotate(errstack::trace(base.clone()), "a"),
        errstack::wrap(base.clone(), errstack::trace(errstack::new("other"))),
        errstack::mask(errstack::annotate(base.clone(), "m")),
        errstack::trace(errstack::mask(base.clone())),
        errstack::new_not_found(base.clone(), "nf"),
    ];
    for err in &candidates {
        let once = errstack::cause(err);
        let twice = errstack::cause(once);
        assert_eq!(once, twice, "cause not idempotent for {err}");
    }
}

#[test]
fn cause_passes_through_trace_and_annotate() {
    let base = errstack::new("base");
    let err = errstack::annotate(errstack::trace(errstack::trace(base.clone())), "ctx");
    assert_eq!(err.cause(), &base);
}

#[test]
fn wrap_with_traced_cause_stores_its_root() {
    let detail = errstack::new("detail");
    let err = errstack::wrap(errstack::new("first"), errstack::trace(detail.clone()));
    assert_eq!(err.cause(), &detail);
}

// ============================================================================
// Location
// ============================================================================

#[test]
fn every_constructor_records_its_call_site() {
    let (e1, l1) = (errstack::new("x"), line!());
    let (e2, l2) = (errstack::trace(e1.clone()), line!());
    let (e3, l3) = (errstack::annotate(e2.clone(), "a"), line!());
    let (e4, l4) = (errstack::wrap(e3.clone(), errstack::new("w")), line!());
    let (e5, l5) = (errstack::mask(e4.clone()), line!());
    let (e6, l6) = (errorf!("f {}", 1), line!());
    let (e7, l7) = (errstack::not_found("k"), line!());
    for (err, line) in [(&e1, l1), (&e2, l2), (&e3, l3), (&e4, l4), (&e5, l5), (&e6, l6), (&e7, l7)] {
        let loc = err.location().expect("location captured");
        assert_eq!(loc.file(), file!());
        assert_eq!(loc.line(), line, "wrong line for {err}");
    }
}

#[test]
fn result_ext_records_method_call_site() {
    fn failing() -> Result<(), Error> {
        Err(errstack::new("inner"))
    }
    let (res, line) = (failing().annotate("outer"), line!());
    let err = res.unwrap_err();
    assert_eq!(err.location().map(|l| l.line()), Some(line));
    assert_eq!(err.to_string(), "outer: inner");
}

// ============================================================================
// Ok passes through
// ============================================================================

#[test]
fn ok_passes_through_result_ext() {
    let ok: Result<u8, Error> = Ok(5);
    assert_eq!(ok.clone().trace().ok(), Some(5));
    assert_eq!(ok.clone().annotate("a").ok(), Some(5));
    assert_eq!(ok.clone().wrap(errstack::new("w")).ok(), Some(5));
    assert_eq!(ok.mask().ok(), Some(5));
}

#[test]
fn result_ext_accepts_foreign_errors() {
    let res: Result<(), IoFailure> = Err(IoFailure { path: "p".into() });
    let err = res.trace().unwrap_err();
    assert_eq!(err.to_string(), "io failure on p");
    assert!(err.has_type::<IoFailure>());
}

#[test]
fn branching_chains_share_base() {
    let base = errstack::new("base");
    let left = errstack::annotate(base.clone(), "left");
    let right = errstack::annotate(base.clone(), "right");
    assert_eq!(left.to_string(), "left: base");
    assert_eq!(right.to_string(), "right: base");
    assert_eq!(left.cause(), right.cause());
}

// ============================================================================
// Logging
// ============================================================================

#[cfg(feature = "tracing")]
#[test]
fn new_logged_records_text_and_call_site() {
    let (err, line) = (errstack::new_logged(format_args!("disk {} full", 3)), line!());
    assert_eq!(err.to_string(), "disk 3 full");
    assert_eq!(err.location().map(|l| l.line()), Some(line));
    assert_eq!(err.location().map(|l| l.file()), Some(file!()));
    assert_eq!(err.cause(), &err);
}
