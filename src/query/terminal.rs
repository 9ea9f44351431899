//! Terminal operations.
//!
//! Each operation here checks that the lineage is still open, drives the
//! pipeline, consumes the lineage and runs its close callbacks, then returns
//! the first recorded fault or its own result.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

use super::collect::{collect_entries, join_displayed};
use super::{FromQuery, IntoEntry, Numeric, Query, Source, Truthy, absorb_source};
use crate::container::Optional;
use crate::error::QueryError;

/// Keeps the first element when two compare equal.
fn first_of_max<T, K: Ord>(best: (K, T), candidate: (K, T)) -> (K, T) {
    if candidate.0.cmp(&best.0) == Ordering::Greater {
        candidate
    } else {
        best
    }
}

impl<'a, T: 'a> Query<'a, T> {
    // =========================================================================
    // Materialization
    // =========================================================================

    /// Collects the elements into a `Vec`.
    ///
    /// # Errors
    ///
    /// Fails with [`QueryError::AlreadyConsumed`] if the lineage was consumed,
    /// or with the first fault recorded while building or pulling the chain.
    pub fn to_list(&self) -> Result<Vec<T>, QueryError> {
        self.terminate(Iterator::collect)
    }

    /// Collects the elements into a boxed slice.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn to_tuple(&self) -> Result<Box<[T]>, QueryError> {
        self.terminate(Iterator::collect)
    }

    /// Collects the elements into a `HashSet`.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn to_set(&self) -> Result<HashSet<T>, QueryError>
    where
        T: Eq + Hash,
    {
        self.terminate(Iterator::collect)
    }

    /// Collects the elements into any [`FromQuery`] target.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`Query::to_list`], map targets fail with
    /// [`QueryError::DuplicateKey`] when a key repeats.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    /// use std::collections::VecDeque;
    ///
    /// let deque: VecDeque<i32> = Query::new(1..=3).collect().unwrap();
    /// assert_eq!(deque, VecDeque::from([1, 2, 3]));
    /// ```
    pub fn collect<C>(&self) -> Result<C, QueryError>
    where
        C: FromQuery<T>,
    {
        self.try_terminate(|elements| C::from_elements(elements))
    }

    /// Joins the `Display` form of the elements with `delimiter`.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn join(&self, delimiter: &str) -> Result<String, QueryError>
    where
        T: fmt::Display,
    {
        self.terminate(|elements| join_displayed(elements, delimiter))
    }

    // =========================================================================
    // Maps
    // =========================================================================

    /// Builds a map from elements that already are key/value pairs.
    ///
    /// # Errors
    ///
    /// Fails with [`QueryError::DuplicateKey`] when a key repeats, besides the
    /// errors of [`Query::to_list`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let map = Query::of([("a", 1), ("b", 2)]).to_dict().unwrap();
    /// assert_eq!(map.get("b"), Some(&2));
    /// ```
    pub fn to_dict<K, V>(&self) -> Result<IndexMap<K, V>, QueryError>
    where
        T: IntoEntry<K, V>,
        K: Hash + Eq + fmt::Debug,
    {
        self.to_dict_by(|element| element)
    }

    /// Builds a map from the entries `collector` returns for each element.
    ///
    /// # Errors
    ///
    /// Fails with [`QueryError::DuplicateKey`] when a key repeats and with
    /// [`QueryError::UnsupportedShape`] when a dynamically typed entry is not
    /// a key/value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let lengths = Query::of(["fizz", "buzz"]).to_dict_by(|word| (word, word.len()));
    /// assert_eq!(lengths.unwrap().into_iter().collect::<Vec<_>>(), vec![("fizz", 4), ("buzz", 4)]);
    ///
    /// let clash = Query::of(["fizz", "fizz"]).to_dict_by(|word| (word, 0));
    /// assert_eq!(clash.unwrap_err().to_string(), "Key \"fizz\" already exists");
    /// ```
    pub fn to_dict_by<K, V, C, F>(&self, collector: F) -> Result<IndexMap<K, V>, QueryError>
    where
        K: Hash + Eq + fmt::Debug,
        C: IntoEntry<K, V>,
        F: FnMut(T) -> C,
    {
        self.try_terminate(|elements| collect_entries(elements.map(collector), None::<fn(V, V) -> V>))
    }

    /// Like [`Query::to_dict_by`], but resolves repeated keys with
    /// `merger(previous, incoming)`. The merged value keeps the position of
    /// the first occurrence.
    ///
    /// # Errors
    ///
    /// See [`Query::to_dict_by`]; duplicate keys are never an error here.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let first_wins = Query::of([("k", 1), ("k", 2)])
    ///     .to_dict_merging(|pair| pair, |previous, _| previous)
    ///     .unwrap();
    /// assert_eq!(first_wins["k"], 1);
    /// ```
    pub fn to_dict_merging<K, V, C, F, M>(
        &self,
        collector: F,
        merger: M,
    ) -> Result<IndexMap<K, V>, QueryError>
    where
        K: Hash + Eq + fmt::Debug,
        C: IntoEntry<K, V>,
        F: FnMut(T) -> C,
        M: FnMut(V, V) -> V,
    {
        self.try_terminate(|elements| collect_entries(elements.map(collector), Some(merger)))
    }

    /// Groups the elements by the key `classifier` returns, in first-seen key
    /// order. Elements with equal keys are grouped even when they are not
    /// adjacent.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let groups = Query::new(1..=6).group_by(|x| x % 3).unwrap();
    /// assert_eq!(groups.into_iter().collect::<Vec<_>>(), vec![
    ///     (1, vec![1, 4]),
    ///     (2, vec![2, 5]),
    ///     (0, vec![3, 6]),
    /// ]);
    /// ```
    pub fn group_by<K, F>(&self, mut classifier: F) -> Result<IndexMap<K, Vec<T>>, QueryError>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
    {
        self.terminate(|elements| {
            let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
            for element in elements {
                groups.entry(classifier(&element)).or_default().push(element);
            }
            groups
        })
    }

    /// Groups like [`Query::group_by`], then turns every group into an entry
    /// with `collector(key, group)`.
    ///
    /// # Errors
    ///
    /// Fails with [`QueryError::UnsupportedShape`] when a dynamically typed
    /// entry is not a key/value pair. Entries with repeated keys overwrite
    /// earlier ones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let sizes = Query::of(["a", "bb", "cc", "d"])
    ///     .group_by_collecting(|word| word.len(), |length, words| (length, words.len()))
    ///     .unwrap();
    /// assert_eq!(sizes[&1], 2);
    /// assert_eq!(sizes[&2], 2);
    /// ```
    pub fn group_by_collecting<K, K2, R, C, F, G>(
        &self,
        mut classifier: F,
        mut collector: G,
    ) -> Result<IndexMap<K2, R>, QueryError>
    where
        K: Hash + Eq,
        K2: Hash + Eq,
        C: IntoEntry<K2, R>,
        F: FnMut(&T) -> K,
        G: FnMut(K, Vec<T>) -> C,
    {
        self.try_terminate(|elements| {
            let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
            for element in elements {
                groups.entry(classifier(&element)).or_default().push(element);
            }
            let mut collected = IndexMap::with_capacity(groups.len());
            for (key, group) in groups {
                let (key, value) = collector(key, group).into_entry()?.into_pair();
                collected.insert(key, value);
            }
            Ok(collected)
        })
    }

    // =========================================================================
    // Folding
    // =========================================================================

    /// Combines the elements pairwise from the left, or returns an empty
    /// `Optional` when there are none.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// assert_eq!(Query::of([1, 2, 3]).reduce(|x, y| x + y).unwrap().get(), Ok(6));
    /// assert!(Query::<i32>::empty().reduce(|x, y| x + y).unwrap().is_empty());
    /// ```
    pub fn reduce<F>(&self, function: F) -> Result<Optional<T>, QueryError>
    where
        F: FnMut(T, T) -> T,
    {
        self.terminate(|elements| Optional::of_nullable(elements.reduce(function)))
    }

    /// Combines the elements from the left starting with `identity`. The
    /// result is always present.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn reduce_from<F>(&self, identity: T, function: F) -> Result<Optional<T>, QueryError>
    where
        F: FnMut(T, T) -> T,
    {
        self.terminate(|elements| Optional::of(elements.fold(identity, function)))
    }

    /// Calls `action` on every element.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn for_each<F>(&self, action: F) -> Result<(), QueryError>
    where
        F: FnMut(T),
    {
        self.terminate(|elements| elements.for_each(action))
    }

    // =========================================================================
    // Aggregation
    // =========================================================================

    /// Counts the elements.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn count(&self) -> Result<usize, QueryError> {
        self.terminate(Iterator::count)
    }

    /// Sums the elements; the sum of no elements is zero.
    ///
    /// # Errors
    ///
    /// Fails with [`QueryError::TypeMismatch`] when an element is not a
    /// number or the sum overflows.
    pub fn sum(&self) -> Result<T, QueryError>
    where
        T: Numeric,
    {
        self.try_terminate(|mut elements| {
            elements.try_fold(T::zero(), |total, element| {
                total.try_add(element).ok_or_else(QueryError::non_numeric)
            })
        })
    }

    /// Averages the elements as `f64`; the average of no elements is `0.0`.
    ///
    /// # Errors
    ///
    /// Fails with [`QueryError::TypeMismatch`] when an element is not a
    /// number.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// assert_eq!(Query::of([1, 2, 3, 4]).average(), Ok(2.5));
    /// assert_eq!(Query::<i32>::empty().average(), Ok(0.0));
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> Result<f64, QueryError>
    where
        T: Numeric,
    {
        self.try_terminate(|elements| {
            let mut total = 0.0;
            let mut count = 0_usize;
            for element in elements {
                total += element.to_f64().ok_or_else(QueryError::non_numeric)?;
                count += 1;
            }
            Ok(if count == 0 { 0.0 } else { total / count as f64 })
        })
    }

    /// Counts the truthy elements.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn quantify(&self) -> Result<usize, QueryError>
    where
        T: Truthy,
    {
        self.quantify_by(Truthy::is_truthy)
    }

    /// Counts the elements satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn quantify_by<P>(&self, predicate: P) -> Result<usize, QueryError>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminate(|elements| elements.filter(predicate).count())
    }

    // =========================================================================
    // Searching
    // =========================================================================

    /// Returns the first element.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn find_first(&self) -> Result<Optional<T>, QueryError> {
        self.terminate(|mut elements| Optional::of_nullable(elements.next()))
    }

    /// Returns the first element satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn find_first_by<P>(&self, predicate: P) -> Result<Optional<T>, QueryError>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminate(|mut elements| Optional::of_nullable(elements.find(predicate)))
    }

    /// Returns some element. Evaluation is sequential, so this is the first.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn find_any(&self) -> Result<Optional<T>, QueryError> {
        self.find_first()
    }

    /// Returns some element satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn find_any_by<P>(&self, predicate: P) -> Result<Optional<T>, QueryError>
    where
        P: FnMut(&T) -> bool,
    {
        self.find_first_by(predicate)
    }

    /// Returns `true` if any element satisfies `predicate`; `false` when
    /// there are no elements.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn any_match<P>(&self, mut predicate: P) -> Result<bool, QueryError>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminate(|mut elements| elements.any(|element| predicate(&element)))
    }

    /// Returns `true` if every element satisfies `predicate`; `true` when
    /// there are no elements.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn all_match<P>(&self, mut predicate: P) -> Result<bool, QueryError>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminate(|mut elements| elements.all(|element| predicate(&element)))
    }

    /// Returns `true` if no element satisfies `predicate`; `true` when there
    /// are no elements.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn none_match<P>(&self, mut predicate: P) -> Result<bool, QueryError>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminate(|mut elements| !elements.any(|element| predicate(&element)))
    }

    // =========================================================================
    // Extremes
    // =========================================================================

    /// Returns the smallest element; the first one on ties.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn min(&self) -> Result<Optional<T>, QueryError>
    where
        T: Ord,
    {
        self.terminate(|elements| Optional::of_nullable(elements.min()))
    }

    /// Returns the element with the smallest key; the first one on ties.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn min_by_key<K, F>(&self, key: F) -> Result<Optional<T>, QueryError>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.terminate(|elements| Optional::of_nullable(elements.min_by_key(key)))
    }

    /// Returns the smallest element, or `default` when there are none.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn min_or(&self, default: T) -> Result<Optional<T>, QueryError>
    where
        T: Ord,
    {
        self.terminate(|elements| Optional::of(elements.min().unwrap_or(default)))
    }

    /// Returns the element with the smallest key, or `default` when there
    /// are none.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::{Optional, Query};
    ///
    /// let shortest = Query::of(["kiwi", "fig"]).min_by_key_or(|word| word.len(), "none");
    /// assert_eq!(shortest, Ok(Optional::of("fig")));
    ///
    /// let fallback = Query::<&str>::empty().min_by_key_or(|word| word.len(), "none");
    /// assert_eq!(fallback, Ok(Optional::of("none")));
    /// ```
    pub fn min_by_key_or<K, F>(&self, key: F, default: T) -> Result<Optional<T>, QueryError>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.min_by_key(key)
            .map(|smallest| smallest.or(Optional::of(default)))
    }

    /// Returns the largest element; the first one on ties.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn max(&self) -> Result<Optional<T>, QueryError>
    where
        T: Ord,
    {
        self.terminate(|elements| {
            Optional::of_nullable(
                elements.reduce(|best, candidate| if candidate > best { candidate } else { best }),
            )
        })
    }

    /// Returns the element with the largest key; the first one on ties.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let longest = Query::of(["ab", "cd", "e"]).max_by_key(|word| word.len()).unwrap();
    /// assert_eq!(longest.get(), Ok("ab"));
    /// ```
    pub fn max_by_key<K, F>(&self, mut key: F) -> Result<Optional<T>, QueryError>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.terminate(|elements| {
            let largest = elements
                .map(|element| (key(&element), element))
                .reduce(first_of_max);
            Optional::of_nullable(largest.map(|(_, element)| element))
        })
    }

    /// Returns the largest element, or `default` when there are none.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn max_or(&self, default: T) -> Result<Optional<T>, QueryError>
    where
        T: Ord,
    {
        self.max().map(|largest| largest.or(Optional::of(default)))
    }

    /// Returns the element with the largest key, or `default` when there are
    /// none.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn max_by_key_or<K, F>(&self, key: F, default: T) -> Result<Optional<T>, QueryError>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.max_by_key(key)
            .map(|largest| largest.or(Optional::of(default)))
    }

    // =========================================================================
    // Ends
    // =========================================================================

    /// Returns the first element.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn take_first(&self) -> Result<Optional<T>, QueryError> {
        self.find_first()
    }

    /// Returns the first element, or `default` when there are none.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn take_first_or(&self, default: T) -> Result<Optional<T>, QueryError> {
        self.terminate(|mut elements| Optional::of(elements.next().unwrap_or(default)))
    }

    /// Returns the last element.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn take_last(&self) -> Result<Optional<T>, QueryError> {
        self.terminate(|elements| Optional::of_nullable(elements.last()))
    }

    /// Returns the last element, or `default` when there are none.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn take_last_or(&self, default: T) -> Result<Optional<T>, QueryError> {
        self.terminate(|elements| Optional::of(elements.last().unwrap_or(default)))
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Returns `true` if `other` yields equal elements in the same order and
    /// has the same length. A query passed as `other` is consumed.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// assert_eq!(Query::new(1..=3).compare_with(vec![1, 2, 3]), Ok(true));
    /// assert_eq!(Query::new(1..=3).compare_with(vec![1, 2]), Ok(false));
    /// ```
    pub fn compare_with<S>(&self, other: S) -> Result<bool, QueryError>
    where
        T: PartialEq,
        S: Source<'a, Item = T>,
    {
        self.compare_with_by(other, |left, right| left == right)
    }

    /// Like [`Query::compare_with`], but decides element equality with
    /// `comparator`.
    ///
    /// # Errors
    ///
    /// See [`Query::to_list`].
    pub fn compare_with_by<S, F>(&self, other: S, mut comparator: F) -> Result<bool, QueryError>
    where
        S: Source<'a>,
        F: FnMut(&T, &S::Item) -> bool,
    {
        self.try_terminate(|mut elements| {
            let mut others = absorb_source(&self.lineage, other);
            loop {
                match (elements.next(), others.next()) {
                    (Some(left), Some(right)) if comparator(&left, &right) => {}
                    (None, None) => return Ok(true),
                    _ => return Ok(false),
                }
            }
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Consumes the lineage without pulling and runs pending close
    /// callbacks. Closing twice is a no-op.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let query = Query::of([1, 2]);
    /// query.close();
    /// query.close();
    /// assert!(query.is_consumed());
    /// assert!(query.to_list().is_err());
    /// ```
    pub fn close(&self) {
        drop(self.take_elements());
        self.lineage.close();
    }
}
