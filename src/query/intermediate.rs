//! Lazy intermediate operations.
//!
//! Every operation here takes the query by value and returns the next query
//! of the same lineage. Nothing is pulled until a terminal operation runs;
//! buffering operations (`sort`, `reverse`, `tail`, `partition`) buffer on
//! the first pull.

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::iter;
use std::rc::Rc;

use super::lineage::Lineage;
use super::{Elements, Nested, Query, Source, Truthy, absorb_source};
use crate::error::QueryError;

/// Converts a caller-supplied count, recording a fault when it is negative.
fn checked_count<N>(lineage: &Lineage<'_>, count: N, operation: &'static str) -> Option<usize>
where
    N: TryInto<usize>,
{
    count
        .try_into()
        .map_err(|_| lineage.fail(QueryError::NegativeCount { operation }))
        .ok()
}

impl<'a, T: 'a> Query<'a, T> {
    // =========================================================================
    // Element-wise
    // =========================================================================

    /// Keeps the elements that satisfy `predicate`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let odd = Query::new(1..=5).filter(|x| x % 2 == 1).to_list();
    /// assert_eq!(odd, Ok(vec![1, 3, 5]));
    /// ```
    #[must_use]
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.derive(move |elements, _| elements.filter(predicate))
    }

    /// Transforms every element with `function`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::query;
    ///
    /// let rendered = query![1, 2, 3].map(|x| x.to_string()).to_list();
    /// assert_eq!(rendered, Ok(vec!["1".to_string(), "2".to_string(), "3".to_string()]));
    /// ```
    #[must_use]
    pub fn map<U, F>(self, function: F) -> Query<'a, U>
    where
        U: 'a,
        F: FnMut(T) -> U + 'a,
    {
        self.derive(move |elements, _| elements.map(function))
    }

    /// Transforms every element and drops the `None` results.
    #[must_use]
    pub fn filter_map<U, F>(self, function: F) -> Query<'a, U>
    where
        U: 'a,
        F: FnMut(T) -> Option<U> + 'a,
    {
        self.derive(move |elements, _| elements.filter_map(function))
    }

    /// Like [`Query::filter_map`], but also drops results that are falsy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let kept = Query::of([2, 3, 4])
    ///     .filter_map_truthy(|x| Some(x % 2))
    ///     .to_list();
    /// assert_eq!(kept, Ok(vec![1]));
    /// ```
    #[must_use]
    pub fn filter_map_truthy<U, F>(self, function: F) -> Query<'a, U>
    where
        U: Truthy + 'a,
        F: FnMut(T) -> Option<U> + 'a,
    {
        self.filter_map(function).filter(Truthy::is_truthy)
    }

    /// Calls `action` on every element as it flows past.
    #[must_use]
    pub fn peek<F>(self, action: F) -> Self
    where
        F: FnMut(&T) + 'a,
    {
        self.derive(move |elements, _| elements.inspect(action))
    }

    /// Pairs every element with its position.
    #[must_use]
    pub fn enumerate(self) -> Query<'a, (usize, T)> {
        self.enumerate_from(0)
    }

    /// Pairs every element with its position, counting from `start`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let numbered = Query::of(['a', 'b']).enumerate_from(1).to_list();
    /// assert_eq!(numbered, Ok(vec![(1, 'a'), (2, 'b')]));
    /// ```
    #[must_use]
    pub fn enumerate_from(self, start: usize) -> Query<'a, (usize, T)> {
        self.derive(move |elements, _| (start..).zip(elements))
    }

    // =========================================================================
    // Nesting
    // =========================================================================

    /// Replaces every element with the elements of the source `function`
    /// returns for it.
    ///
    /// Returned queries are absorbed: their close callbacks join this
    /// lineage, and their faults stop the pipeline.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let repeated = Query::of([1, 2, 3]).flat_map(|x| vec![x; x]).to_list();
    /// assert_eq!(repeated, Ok(vec![1, 2, 2, 3, 3, 3]));
    /// ```
    #[must_use]
    pub fn flat_map<S, F>(self, mut function: F) -> Query<'a, S::Item>
    where
        S: Source<'a>,
        F: FnMut(T) -> S + 'a,
    {
        self.derive(move |mut elements, lineage| {
            let lineage = Rc::clone(lineage);
            let mut current: Option<Elements<'a, S::Item>> = None;
            iter::from_fn(move || {
                loop {
                    if lineage.has_fault() {
                        return None;
                    }
                    if let Some(inner) = current.as_mut() {
                        if let Some(element) = inner.next() {
                            return Some(element);
                        }
                        current = None;
                        continue;
                    }
                    let element = elements.next()?;
                    current = Some(absorb_source(&lineage, function(element)));
                }
            })
        })
    }

    /// Flattens nested elements recursively to leaf depth.
    ///
    /// Strings and [`DictItem`](crate::DictItem)s are leaves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let flat = Query::of([vec![vec![1], vec![2, 3]], vec![vec![4]]]).flatten().to_list();
    /// assert_eq!(flat, Ok(vec![1, 2, 3, 4]));
    /// ```
    #[must_use]
    pub fn flatten(self) -> Query<'a, T::Leaf>
    where
        T: Nested,
        T::Leaf: 'a,
    {
        self.derive(move |elements, _| elements.flat_map(|element| element.leaves()))
    }

    // =========================================================================
    // Slicing
    // =========================================================================

    /// Drops the first `count` elements.
    ///
    /// A negative `count` is reported as [`QueryError::NegativeCount`] by the
    /// terminal operation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::{Query, QueryError};
    ///
    /// assert_eq!(Query::new(1..=10).skip(7).to_list(), Ok(vec![8, 9, 10]));
    ///
    /// let error = Query::new(1..=10).skip(-1).to_list().unwrap_err();
    /// assert_eq!(error, QueryError::NegativeCount { operation: "Skip" });
    /// ```
    #[must_use]
    pub fn skip<N: TryInto<usize>>(self, count: N) -> Self {
        self.derive(move |elements, lineage| -> Elements<'a, T> {
            match checked_count(lineage, count, "Skip") {
                Some(count) => Box::new(elements.skip(count)),
                None => Box::new(iter::empty()),
            }
        })
    }

    /// Keeps at most the first `count` elements.
    #[must_use]
    pub fn limit<N: TryInto<usize>>(self, count: N) -> Self {
        self.take_first_n(count, "Limit")
    }

    /// Keeps at most the first `count` elements.
    ///
    /// Identical to [`Query::limit`] apart from the operation name reported
    /// for a negative count.
    #[must_use]
    pub fn head<N: TryInto<usize>>(self, count: N) -> Self {
        self.take_first_n(count, "Head")
    }

    fn take_first_n<N: TryInto<usize>>(self, count: N, operation: &'static str) -> Self {
        self.derive(move |elements, lineage| -> Elements<'a, T> {
            match checked_count(lineage, count, operation) {
                Some(count) => Box::new(elements.take(count)),
                None => Box::new(iter::empty()),
            }
        })
    }

    /// Keeps at most the last `count` elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// assert_eq!(Query::new(1..=5).tail(2).to_list(), Ok(vec![4, 5]));
    /// assert_eq!(Query::new(1..=2).tail(9).to_list(), Ok(vec![1, 2]));
    /// ```
    #[must_use]
    pub fn tail<N: TryInto<usize>>(self, count: N) -> Self {
        self.derive(move |elements, lineage| -> Elements<'a, T> {
            let Some(count) = checked_count(lineage, count, "Tail") else {
                return Box::new(iter::empty());
            };
            Box::new(
                iter::once_with(move || {
                    let mut window = VecDeque::new();
                    for element in elements {
                        if count == 0 {
                            continue;
                        }
                        if window.len() == count {
                            window.pop_front();
                        }
                        window.push_back(element);
                    }
                    window
                })
                .flatten(),
            )
        })
    }

    /// Keeps elements while `predicate` holds, stopping at the first failure.
    #[must_use]
    pub fn take_while<P>(self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.derive(move |elements, _| elements.take_while(predicate))
    }

    /// Drops elements while `predicate` holds, then keeps the rest.
    #[must_use]
    pub fn drop_while<P>(self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.derive(move |elements, _| elements.skip_while(predicate))
    }

    // =========================================================================
    // Combination
    // =========================================================================

    /// Appends the elements of `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let all = Query::of([1, 2]).concat(vec![3]).concat(Query::of([4])).to_list();
    /// assert_eq!(all, Ok(vec![1, 2, 3, 4]));
    /// ```
    #[must_use]
    pub fn concat<S>(self, other: S) -> Self
    where
        S: Source<'a, Item = T>,
    {
        self.derive(move |elements, lineage| elements.chain(absorb_source(lineage, other)))
    }

    /// Puts the elements of `other` in front.
    #[must_use]
    pub fn prepend<S>(self, other: S) -> Self
    where
        S: Source<'a, Item = T>,
    {
        self.derive(move |elements, lineage| absorb_source(lineage, other).chain(elements))
    }

    /// Drops repeated elements, keeping first occurrences in order.
    #[must_use]
    pub fn distinct(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        self.derive(move |elements, _| {
            let mut seen = HashSet::new();
            elements.filter(move |element| seen.insert(element.clone()))
        })
    }

    // =========================================================================
    // Reordering
    // =========================================================================

    fn buffered<F>(self, arrange: F) -> Self
    where
        F: FnOnce(&mut Vec<T>) + 'a,
    {
        self.derive(move |elements, _| {
            iter::once_with(move || {
                let mut buffer: Vec<T> = elements.collect();
                arrange(&mut buffer);
                buffer
            })
            .flatten()
        })
    }

    /// Sorts the elements in ascending order. The sort is stable.
    #[must_use]
    pub fn sort(self) -> Self
    where
        T: Ord,
    {
        self.buffered(|buffer| buffer.sort())
    }

    /// Sorts the elements in descending order, keeping equal elements in
    /// their original order.
    #[must_use]
    pub fn sort_reversed(self) -> Self
    where
        T: Ord,
    {
        self.buffered(|buffer| buffer.sort_by(|left, right| right.cmp(left)))
    }

    /// Sorts by the key `key` extracts. The sort is stable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let by_length = Query::of(["ccc", "a", "bb", "d"]).sort_by_key(|word| word.len()).to_list();
    /// assert_eq!(by_length, Ok(vec!["a", "d", "bb", "ccc"]));
    /// ```
    #[must_use]
    pub fn sort_by_key<K, F>(self, key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K + 'a,
    {
        self.buffered(|buffer| buffer.sort_by_key(key))
    }

    /// Sorts by the key `key` extracts, descending. The sort is stable.
    #[must_use]
    pub fn sort_by_key_reversed<K, F>(self, mut key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K + 'a,
    {
        self.buffered(move |buffer| buffer.sort_by(|left, right| key(right).cmp(&key(left))))
    }

    /// Sorts with a comparator. The sort is stable.
    #[must_use]
    pub fn sort_by<F>(self, comparator: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering + 'a,
    {
        self.buffered(|buffer| buffer.sort_by(comparator))
    }

    /// Orders the elements from largest to smallest.
    ///
    /// This is a descending sort, not a flip of the arrival order. Equal
    /// elements keep their original order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let reversed = Query::of([3, 5, 2, 1]).map(|x| x * 10).reverse().to_list();
    /// assert_eq!(reversed, Ok(vec![50, 30, 20, 10]));
    /// ```
    #[must_use]
    pub fn reverse(self) -> Self
    where
        T: Ord,
    {
        self.sort_reversed()
    }

    /// Orders the elements by the key `key` extracts, largest first. Equal
    /// keys keep their original order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let pairs = Query::of([(3, 9), (1, 1), (2, 4)]).reverse_by_key(|pair| pair.1).to_list();
    /// assert_eq!(pairs, Ok(vec![(3, 9), (2, 4), (1, 1)]));
    /// ```
    #[must_use]
    pub fn reverse_by_key<K, F>(self, key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K + 'a,
    {
        self.sort_by_key_reversed(key)
    }

    /// Splits the elements into exactly two groups: those failing
    /// `predicate` first, those satisfying it second.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let groups = Query::new(1..=5).partition(|x| x % 2 == 0).to_list();
    /// assert_eq!(groups, Ok(vec![vec![1, 3, 5], vec![2, 4]]));
    /// ```
    #[must_use]
    pub fn partition<P>(self, predicate: P) -> Query<'a, Vec<T>>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.derive(move |elements, _| {
            iter::once_with(move || {
                let (matching, rest): (Vec<T>, Vec<T>) = elements.partition(predicate);
                [rest, matching]
            })
            .flatten()
        })
    }

    // =========================================================================
    // Resources
    // =========================================================================

    /// Registers `callback` to run once when the lineage is consumed or
    /// closed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    /// use std::cell::Cell;
    ///
    /// let closed = Cell::new(false);
    /// let total = Query::of([1, 2, 3]).on_close(|| closed.set(true)).sum();
    /// assert_eq!(total, Ok(6));
    /// assert!(closed.get());
    /// ```
    #[must_use]
    pub fn on_close<F>(self, callback: F) -> Self
    where
        F: FnOnce() + 'a,
    {
        self.lineage.register(Box::new(callback));
        self
    }
}
