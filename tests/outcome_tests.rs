//! Integration tests for `Outcome`.

use quarry::{ChainedError, Outcome, QueryError};
use rstest::rstest;
use std::cell::{Cell, RefCell};
use std::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum LookupError {
    #[error("missing key {0}")]
    Missing(&'static str),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("lookup failed")]
struct LookupFailed;

// =============================================================================
// Construction and inspection
// =============================================================================

#[rstest]
fn test_success_exposes_value_only() {
    let outcome: Outcome<i32, LookupError> = Outcome::success(42);
    assert!(outcome.is_successful());
    assert!(!outcome.is_failure());
    assert_eq!(outcome.value(), Some(&42));
    assert_eq!(outcome.error(), None);
}

#[rstest]
fn test_failure_exposes_error_only() {
    let outcome: Outcome<i32, LookupError> = Outcome::failure(LookupError::Missing("a"));
    assert!(outcome.is_failure());
    assert_eq!(outcome.value(), None);
    assert_eq!(outcome.error(), Some(&LookupError::Missing("a")));
}

// =============================================================================
// Projection
// =============================================================================

#[rstest]
fn test_map_success_on_success() {
    let outcome: Outcome<i32, LookupError> = Outcome::success(42);
    assert_eq!(outcome.map_success(|x| x + 3).get(), Ok(45));
}

#[rstest]
fn test_map_success_never_calls_mapper_on_failure() {
    let calls = Cell::new(0);
    let outcome: Outcome<i32, LookupError> = Outcome::failure(LookupError::Missing("b"));
    let mapped = outcome.map_success(|x| {
        calls.set(calls.get() + 1);
        x
    });
    assert!(mapped.is_empty());
    assert_eq!(calls.get(), 0);
}

#[rstest]
fn test_map_success_nullable_yields_empty_for_absent_result() {
    let outcome: Outcome<i32, LookupError> = Outcome::success(1);
    assert!(outcome.map_success_nullable(|_| None::<i32>).is_empty());
}

#[rstest]
fn test_map_failure_is_symmetric() {
    let failure: Outcome<i32, LookupError> = Outcome::failure(LookupError::Missing("c"));
    assert_eq!(
        failure.map_failure(|error| error.to_string()).get(),
        Ok("missing key c".to_string())
    );

    let success: Outcome<i32, LookupError> = Outcome::success(1);
    assert!(success.map_failure(|error| error.to_string()).is_empty());
}

#[rstest]
#[case(Outcome::success(2), "value 2")]
#[case(Outcome::failure(LookupError::Missing("d")), "missing key d")]
fn test_fold(#[case] outcome: Outcome<i32, LookupError>, #[case] expected: &str) {
    let rendered = outcome.fold(|value| format!("value {value}"), |error| error.to_string());
    assert_eq!(rendered, expected);
}

// =============================================================================
// Side effects
// =============================================================================

#[rstest]
fn test_handle_invokes_exactly_one_branch() {
    let log = RefCell::new(Vec::new());
    let success: Outcome<i32, LookupError> = Outcome::success(1);
    success.handle(
        |value| log.borrow_mut().push(format!("ok {value}")),
        |error| log.borrow_mut().push(format!("err {error}")),
    );
    let failure: Outcome<i32, LookupError> = Outcome::failure(LookupError::Missing("e"));
    failure.handle(
        |value| log.borrow_mut().push(format!("ok {value}")),
        |error| log.borrow_mut().push(format!("err {error}")),
    );
    assert_eq!(*log.borrow(), vec!["ok 1", "err missing key e"]);
}

#[rstest]
fn test_if_success_and_if_failure() {
    let seen = Cell::new(0);
    let success: Outcome<i32, LookupError> = Outcome::success(3);
    success.if_success(|value| seen.set(*value));
    success.if_failure(|_| seen.set(-1));
    assert_eq!(seen.get(), 3);
}

// =============================================================================
// Fallbacks
// =============================================================================

#[rstest]
fn test_or_else_and_or_else_get() {
    let failure: Outcome<i32, LookupError> = Outcome::failure(LookupError::Missing("f"));
    assert_eq!(failure.clone().or_else(0), 0);
    assert_eq!(failure.or_else_get(|| 9), 9);
}

#[rstest]
fn test_or_else_raise_returns_original_error() {
    let failure: Outcome<i32, LookupError> = Outcome::failure(LookupError::Missing("g"));
    assert_eq!(failure.or_else_raise(), Err(LookupError::Missing("g")));
}

#[rstest]
fn test_or_else_raise_with_chains_the_cause() {
    let failure: Outcome<i32, LookupError> = Outcome::failure(LookupError::Missing("h"));
    let chained: ChainedError<LookupFailed, LookupError> =
        failure.or_else_raise_with(|_| LookupFailed).unwrap_err();

    assert_eq!(chained.to_string(), "lookup failed");
    assert_eq!(chained.cause(), &LookupError::Missing("h"));
    assert_eq!(
        chained.source().map(ToString::to_string),
        Some("missing key h".to_string())
    );
}

#[rstest]
fn test_or_else_raise_with_passes_success_through() {
    let success: Outcome<i32, QueryError> = Outcome::success(5);
    assert_eq!(
        success
            .or_else_raise_with(|_| LookupFailed)
            .map_err(|chained| chained.into_parts().0),
        Ok(5)
    );
}

// =============================================================================
// Equality and conversions
// =============================================================================

#[rstest]
fn test_only_successes_compare_equal() {
    let first: Outcome<i32, &str> = Outcome::success(1);
    let failure: Outcome<i32, &str> = Outcome::failure("x");
    assert_eq!(first, Outcome::success(1));
    assert_ne!(first, Outcome::success(2));
    assert_ne!(first, failure);
    assert_ne!(failure, Outcome::failure("x"));
}

#[rstest]
fn test_result_round_trip() {
    let parsed: Outcome<i32, std::num::ParseIntError> = "12".parse::<i32>().into();
    assert_eq!(parsed.into_result().ok(), Some(12));

    let failed: Result<i32, &str> = Outcome::failure("bad").into();
    assert_eq!(failed, Err("bad"));
}
