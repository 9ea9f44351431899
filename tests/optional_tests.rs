//! Integration tests for `Optional`.

use quarry::{ErrorKind, Optional, QueryError};
use rstest::rstest;
use std::cell::Cell;

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_strict_construction_rejects_absent_value() {
    let error = Optional::try_of(None::<i32>).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NilInput);
    assert_eq!(error.to_string(), "Value cannot be None");
}

#[rstest]
fn test_strict_construction_accepts_present_value() {
    assert_eq!(Optional::try_of(Some(1)), Ok(Optional::of(1)));
}

#[rstest]
#[case(Some(7), true)]
#[case(None, false)]
fn test_nullable_construction(#[case] input: Option<i32>, #[case] present: bool) {
    let optional = Optional::of_nullable(input);
    assert_eq!(optional.is_present(), present);
    assert_eq!(optional.is_empty(), !present);
}

#[rstest]
fn test_default_is_empty() {
    assert!(Optional::<String>::default().is_empty());
}

// =============================================================================
// Access
// =============================================================================

#[rstest]
fn test_get_on_empty_fails() {
    let error = Optional::<i32>::empty().get().unwrap_err();
    assert_eq!(error, QueryError::EmptyValue);
    assert_eq!(error.to_string(), "Optional is empty");
}

#[rstest]
fn test_get_ref_borrows() {
    let optional = Optional::of(String::from("kept"));
    assert_eq!(optional.get_ref().map(String::as_str), Ok("kept"));
    assert!(optional.is_present());
}

#[rstest]
fn test_if_present_only_runs_when_present() {
    let calls = Cell::new(0);
    Optional::of(1).if_present(|_| calls.set(calls.get() + 1));
    Optional::<i32>::empty().if_present(|_| calls.set(calls.get() + 1));
    assert_eq!(calls.get(), 1);
}

#[rstest]
fn test_if_present_or_else_runs_exactly_one_branch() {
    let present = Cell::new(0);
    let absent = Cell::new(0);
    Optional::of(5).if_present_or_else(|value| present.set(*value), || absent.set(1));
    assert_eq!((present.get(), absent.get()), (5, 0));
}

// =============================================================================
// Transformation
// =============================================================================

#[rstest]
fn test_map_skips_function_when_empty() {
    let calls = Cell::new(0);
    let mapped = Optional::<i32>::empty().map(|x| {
        calls.set(calls.get() + 1);
        x + 1
    });
    assert!(mapped.is_empty());
    assert_eq!(calls.get(), 0);
}

#[rstest]
#[case(Optional::of(4), Optional::of(4))]
#[case(Optional::of(3), Optional::empty())]
#[case(Optional::empty(), Optional::empty())]
fn test_filter(#[case] input: Optional<i32>, #[case] expected: Optional<i32>) {
    assert_eq!(input.filter(|x| x % 2 == 0), expected);
}

#[rstest]
fn test_flat_map_chains() {
    let halve = |x: i32| if x % 2 == 0 { Optional::of(x / 2) } else { Optional::empty() };
    assert_eq!(Optional::of(8).flat_map(halve).flat_map(halve), Optional::of(2));
    assert!(Optional::of(6).flat_map(halve).flat_map(halve).is_empty());
}

// =============================================================================
// Fallbacks
// =============================================================================

#[rstest]
fn test_or_else_get_is_lazy() {
    let calls = Cell::new(0);
    let value = Optional::of(1).or_else_get(|| {
        calls.set(calls.get() + 1);
        0
    });
    assert_eq!(value, 1);
    assert_eq!(calls.get(), 0);
}

#[rstest]
fn test_or_prefers_self() {
    assert_eq!(Optional::of(1).or(Optional::of(2)), Optional::of(1));
    assert_eq!(Optional::empty().or(Optional::of(2)), Optional::of(2));
}

#[rstest]
fn test_or_else_raise() {
    assert_eq!(Optional::of(1).or_else_raise(), Ok(1));
    assert_eq!(
        Optional::<i32>::empty().or_else_raise(),
        Err(QueryError::EmptyValue)
    );
}

// =============================================================================
// Conversions
// =============================================================================

#[rstest]
fn test_option_round_trip() {
    let optional: Optional<i32> = Some(3).into();
    let option: Option<i32> = optional.into();
    assert_eq!(option, Some(3));
}

#[rstest]
fn test_into_iterator_yields_at_most_one() {
    assert_eq!(Optional::of('x').into_iter().collect::<Vec<_>>(), vec!['x']);
    assert_eq!(Optional::<char>::empty().into_iter().count(), 0);
}
