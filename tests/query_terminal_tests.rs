//! Integration tests for terminal operations.

use indexmap::IndexMap;
use quarry::{DictItem, ErrorKind, Optional, Query, QueryError};
use rstest::rstest;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList};

// =============================================================================
// Materialization
// =============================================================================

#[rstest]
fn test_to_list_and_to_set() {
    assert_eq!(Query::of([1, 2, 2]).to_list(), Ok(vec![1, 2, 2]));
    assert_eq!(Query::of([1, 2, 2]).to_set(), Ok(HashSet::from([1, 2])));
}

#[rstest]
fn test_collect_into_sequences() {
    let list: LinkedList<i32> = Query::new(1..=3).collect().unwrap();
    assert_eq!(list.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);

    let ordered: BTreeSet<char> = Query::new("banana").collect().unwrap();
    assert_eq!(ordered.into_iter().collect::<String>(), "abn");
}

#[rstest]
fn test_collect_into_string_joins_with_comma() {
    let rendered: String = Query::of([1, 2, 3]).collect().unwrap();
    assert_eq!(rendered, "1, 2, 3");
}

#[rstest]
fn test_collect_into_maps_rejects_duplicates() {
    let result: Result<HashMap<&str, i32>, _> = Query::of([("a", 1), ("a", 2)]).collect();
    assert_eq!(result.unwrap_err().kind(), ErrorKind::IllegalState);

    let result: Result<BTreeMap<&str, i32>, _> = Query::of([("a", 1), ("a", 2)]).collect();
    assert_eq!(
        result,
        Err(QueryError::DuplicateKey {
            key: "\"a\"".to_string()
        })
    );
}

#[rstest]
#[case(vec![], "")]
#[case(vec!["solo"], "solo")]
#[case(vec!["a", "b", "c"], "a-b-c")]
fn test_join(#[case] words: Vec<&str>, #[case] expected: &str) {
    assert_eq!(Query::new(words).join("-"), Ok(expected.to_string()));
}

// =============================================================================
// Maps
// =============================================================================

#[rstest]
fn test_to_dict_keeps_insertion_order() {
    let map = Query::of([("z", 1), ("a", 2), ("m", 3)]).to_dict().unwrap();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["z", "a", "m"]);
}

#[rstest]
fn test_to_dict_by_duplicate_key_message() {
    let error = Query::of(["x", "y", "x"])
        .to_dict_by(|word| (word, word.len()))
        .unwrap_err();
    assert_eq!(error.to_string(), "Key \"x\" already exists");
}

#[rstest]
fn test_to_dict_merging_keeps_first_position() {
    let totals = Query::of([("b", 1), ("a", 2), ("b", 3)])
        .to_dict_merging(|pair| pair, |previous, incoming| previous + incoming)
        .unwrap();
    let expected: IndexMap<&str, i32> = IndexMap::from([("b", 4), ("a", 2)]);
    assert_eq!(totals, expected);
    assert_eq!(totals.get_index(0), Some((&"b", &4)));
}

#[rstest]
fn test_to_dict_accepts_dict_items() {
    let map = Query::new(BTreeMap::from([(1, "one"), (2, "two")]))
        .map(|item| DictItem::new(*item.value(), *item.key()))
        .to_dict()
        .unwrap();
    assert_eq!(map["two"], 2);
}

#[rstest]
fn test_group_by_collects_non_adjacent_keys() {
    let groups = Query::of(["apple", "bean", "avocado", "beet", "corn"])
        .group_by(|word| word.chars().next())
        .unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[&Some('a')], vec!["apple", "avocado"]);
    assert_eq!(groups[&Some('b')], vec!["bean", "beet"]);
    assert_eq!(groups.keys().next(), Some(&Some('a')));
}

#[rstest]
fn test_group_by_collecting() {
    let joined = Query::of(["apple", "bean", "avocado", "beet"])
        .group_by_collecting(|word| word.chars().next(), |letter, words| (letter, words.join("+")))
        .unwrap();
    assert_eq!(joined[&Some('a')], "apple+avocado");
    assert_eq!(joined[&Some('b')], "bean+beet");
}

// =============================================================================
// Folding and aggregation
// =============================================================================

#[rstest]
fn test_reduce() {
    assert_eq!(
        Query::new(1..=4).reduce(|x, y| x * y),
        Ok(Optional::of(24))
    );
    assert_eq!(
        Query::<i32>::empty().reduce(|x, y| x * y),
        Ok(Optional::empty())
    );
}

#[rstest]
fn test_reduce_from_always_has_a_value() {
    assert_eq!(
        Query::<i32>::empty().reduce_from(7, |x, y| x + y),
        Ok(Optional::of(7))
    );
    assert_eq!(
        Query::of([1, 2]).reduce_from(10, |x, y| x - y),
        Ok(Optional::of(7))
    );
}

#[rstest]
fn test_for_each() {
    let seen = RefCell::new(Vec::new());
    assert_eq!(
        Query::of(['a', 'b']).for_each(|c| seen.borrow_mut().push(c)),
        Ok(())
    );
    assert_eq!(*seen.borrow(), vec!['a', 'b']);
}

#[rstest]
fn test_sum_and_average() {
    assert_eq!(Query::new(1..=100).sum(), Ok(5050));
    assert_eq!(Query::<u8>::empty().sum(), Ok(0));
    assert_eq!(Query::of([0.5, 1.5]).sum(), Ok(2.0));
    assert_eq!(Query::of([1.0, 2.0, 4.5]).average(), Ok(2.5));
    assert_eq!(Query::<f64>::empty().average(), Ok(0.0));
}

#[rstest]
fn test_sum_overflow_reports_type_mismatch() {
    let error = Query::of([u8::MAX, 1]).sum().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TypeMismatch);
}

#[rstest]
fn test_quantify() {
    assert_eq!(Query::of([0, 1, 2, 0, 3]).quantify(), Ok(3));
    assert_eq!(Query::of(["", "x", ""]).quantify(), Ok(1));
    assert_eq!(Query::new(1..=10).quantify_by(|x| x % 4 == 0), Ok(2));
}

// =============================================================================
// Searching
// =============================================================================

#[rstest]
fn test_find_first_variants() {
    assert_eq!(Query::of([4, 5, 6]).find_first(), Ok(Optional::of(4)));
    assert_eq!(
        Query::of([4, 5, 6]).find_first_by(|x| x % 2 == 1),
        Ok(Optional::of(5))
    );
    assert_eq!(Query::of([4, 6]).find_any_by(|x| x % 2 == 1), Ok(Optional::empty()));
    assert_eq!(Query::<i32>::empty().find_any(), Ok(Optional::empty()));
}

#[rstest]
fn test_find_first_stops_pulling() {
    let pulled = RefCell::new(Vec::new());
    let found = Query::from_iterator(1..)
        .peek(|x| pulled.borrow_mut().push(*x))
        .find_first_by(|x| *x == 3);
    assert_eq!(found, Ok(Optional::of(3)));
    assert_eq!(*pulled.borrow(), vec![1, 2, 3]);
}

#[rstest]
#[case(vec![], false, true, true)]
#[case(vec![1, 2], true, true, false)]
#[case(vec![-1, 2], true, false, false)]
fn test_matching(
    #[case] elements: Vec<i32>,
    #[case] any_positive: bool,
    #[case] all_positive: bool,
    #[case] none_positive: bool,
) {
    let positive = |x: &i32| *x > 0;
    assert_eq!(Query::new(elements.clone()).any_match(positive), Ok(any_positive));
    assert_eq!(Query::new(elements.clone()).all_match(positive), Ok(all_positive));
    assert_eq!(Query::new(elements).none_match(positive), Ok(none_positive));
}

// =============================================================================
// Extremes and ends
// =============================================================================

#[rstest]
fn test_min_and_max() {
    assert_eq!(Query::of([3, 1, 2]).min(), Ok(Optional::of(1)));
    assert_eq!(Query::of([3, 1, 2]).max(), Ok(Optional::of(3)));
    assert_eq!(Query::<i32>::empty().max(), Ok(Optional::empty()));
}

#[rstest]
fn test_extremes_with_defaults() {
    assert_eq!(Query::<i32>::empty().min_or(9), Ok(Optional::of(9)));
    assert_eq!(Query::<i32>::empty().max_or(9), Ok(Optional::of(9)));
    assert_eq!(Query::of([1]).max_or(9), Ok(Optional::of(1)));
}

#[rstest]
#[case(vec![], "-", "-")]
#[case(vec!["pear", "fig", "apple"], "fig", "apple")]
fn test_extremes_by_key_with_defaults(
    #[case] words: Vec<&str>,
    #[case] shortest: &str,
    #[case] longest: &str,
) {
    let length = |word: &&str| word.len();
    assert_eq!(
        Query::new(words.clone()).min_by_key_or(length, "-"),
        Ok(Optional::of(shortest))
    );
    assert_eq!(
        Query::new(words).max_by_key_or(length, "-"),
        Ok(Optional::of(longest))
    );
}

#[rstest]
fn test_extremes_by_key_keep_first_on_ties() {
    let words = ["bb", "aa", "c", "dd"];
    assert_eq!(
        Query::of(words).max_by_key(|word| word.len()),
        Ok(Optional::of("bb"))
    );
    assert_eq!(
        Query::of(words).min_by_key(|word| word.len()),
        Ok(Optional::of("c"))
    );
}

#[rstest]
fn test_take_first_and_last() {
    assert_eq!(Query::new(1..=3).take_first(), Ok(Optional::of(1)));
    assert_eq!(Query::new(1..=3).take_last(), Ok(Optional::of(3)));
    assert_eq!(Query::<i32>::empty().take_first_or(0), Ok(Optional::of(0)));
    assert_eq!(Query::<i32>::empty().take_last_or(0), Ok(Optional::of(0)));
}

// =============================================================================
// Comparison
// =============================================================================

#[rstest]
#[case(vec![1, 2, 3], true)]
#[case(vec![1, 2], false)]
#[case(vec![1, 2, 3, 4], false)]
#[case(vec![1, 3, 2], false)]
fn test_compare_with(#[case] other: Vec<i32>, #[case] equal: bool) {
    assert_eq!(Query::new(1..=3).compare_with(other), Ok(equal));
}

#[rstest]
fn test_compare_with_by_across_types() {
    let names = Query::of(["1", "2"]);
    let result = names.compare_with_by(vec![1, 2], |text, number| {
        text.parse::<i32>().ok() == Some(*number)
    });
    assert_eq!(result, Ok(true));
}

#[rstest]
fn test_compare_with_consumed_query_fails() {
    let other = Query::of([1]);
    other.close();
    assert_eq!(
        Query::of([1]).compare_with(other),
        Err(QueryError::AlreadyConsumed)
    );
}

// =============================================================================
// Single consumption
// =============================================================================

#[rstest]
fn test_second_terminal_fails() {
    let query = Query::of([1, 2, 3]);
    assert_eq!(query.count(), Ok(3));
    let error = query.to_list().unwrap_err();
    assert_eq!(error, QueryError::AlreadyConsumed);
    assert_eq!(error.kind(), ErrorKind::IllegalState);
}

#[rstest]
fn test_error_terminal_still_consumes() {
    let query = Query::of([("k", 1), ("k", 2)]);
    assert!(query.to_dict().is_err());
    assert!(query.is_consumed());
    assert_eq!(query.count(), Err(QueryError::AlreadyConsumed));
}
