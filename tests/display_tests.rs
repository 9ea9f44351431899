//! Tests for the `Display` and `Debug` renderings of containers and queries.

use quarry::{DictItem, Optional, Outcome, Query};
use rstest::rstest;
use std::cell::Cell;

// =============================================================================
// Containers
// =============================================================================

#[rstest]
#[case(Optional::of(3), "Optional[3]")]
#[case(Optional::empty(), "Optional.empty")]
fn test_optional_display(#[case] optional: Optional<i32>, #[case] expected: &str) {
    assert_eq!(optional.to_string(), expected);
}

#[rstest]
fn test_optional_debug_quotes_strings() {
    assert_eq!(format!("{:?}", Optional::of("a")), "Optional[\"a\"]");
}

#[rstest]
#[case(Outcome::success(1), "Result[value=1, error=None]")]
#[case(Outcome::failure("boom"), "Result[value=None, error=boom]")]
fn test_outcome_display(#[case] outcome: Outcome<i32, &str>, #[case] expected: &str) {
    assert_eq!(outcome.to_string(), expected);
}

#[rstest]
fn test_outcome_debug() {
    let outcome: Outcome<i32, &str> = Outcome::failure("boom");
    assert_eq!(format!("{outcome:?}"), "Result[value=None, error=\"boom\"]");
}

#[rstest]
fn test_dict_item_renderings() {
    let item = DictItem::new("Name", "Freud");
    assert_eq!(item.to_string(), "DictItem(key=Name, value=Freud)");
    assert_eq!(format!("{item:?}"), "DictItem(key=\"Name\", value=\"Freud\")");
}

// =============================================================================
// Queries
// =============================================================================

#[rstest]
#[case(vec![], "Query.of()")]
#[case(vec![1], "Query.of(1)")]
#[case(vec![1, 2, 3], "Query.of(1, 2, 3)")]
fn test_query_display(#[case] elements: Vec<i32>, #[case] expected: &str) {
    assert_eq!(Query::new(elements).to_string(), expected);
}

#[rstest]
fn test_query_display_does_not_consume() {
    let query = Query::of(["a", "b"]).map(str::to_uppercase);
    assert_eq!(query.to_string(), "Query.of(\"A\", \"B\")");
    assert!(!query.is_consumed());
    assert_eq!(query.join(""), Ok("AB".to_string()));
}

#[rstest]
fn test_query_display_pulls_each_element_once() {
    let pulled = Cell::new(0);
    let query = Query::of([1, 2]).peek(|_| pulled.set(pulled.get() + 1));
    let _ = query.to_string();
    assert_eq!(query.count(), Ok(2));
    assert_eq!(pulled.get(), 2);
}

#[rstest]
fn test_query_debug_shows_consumption() {
    let query = Query::of([1]);
    assert_eq!(format!("{query:?}"), "Query { consumed: false, .. }");
    query.close();
    assert_eq!(format!("{query:?}"), "Query { consumed: true, .. }");
}
