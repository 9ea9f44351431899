//! Lazy, single-consumption query pipelines.
//!
//! A [`Query`] wraps a lazily evaluated stream of elements. Intermediate
//! operations (`filter`, `map`, `sort`, ...) return a new query without
//! pulling anything; terminal operations (`to_list`, `reduce`, `count`, ...)
//! drive the pipeline once and consume it.
//!
//! # Lineage
//!
//! All queries derived from one another share a single consumption state.
//! Running a terminal operation on any of them consumes the whole chain, and
//! every later terminal operation fails with
//! [`QueryError::AlreadyConsumed`]. Close callbacks registered with
//! [`Query::on_close`] run exactly once, in registration order, when the
//! chain is consumed or closed.
//!
//! # Deferred errors
//!
//! Intermediate operations never fail. Problems found while assembling or
//! pulling a chain (a negative count, a zero range step, a sub-query that
//! was already consumed) are recorded and reported by the terminal
//! operation.
//!
//! # Examples
//!
//! ```rust
//! use quarry::Query;
//!
//! let evens = Query::new(1..=10)
//!     .filter(|x| x % 2 == 0)
//!     .map(|x| x * x)
//!     .to_list();
//! assert_eq!(evens, Ok(vec![4, 16, 36, 64, 100]));
//! ```
//!
//! Reusing a consumed query is an error:
//!
//! ```rust
//! use quarry::{Query, QueryError};
//!
//! let query = Query::of([1, 2, 3]);
//! assert_eq!(query.count(), Ok(3));
//! assert_eq!(query.count(), Err(QueryError::AlreadyConsumed));
//! ```

mod collect;
mod intermediate;
#[cfg(feature = "json")]
mod json;
mod lineage;
mod nested;
mod numeric;
mod source;
mod terminal;

use std::cell::RefCell;
use std::fmt;
use std::iter;
use std::rc::Rc;

use tracing::trace;

use crate::error::QueryError;
use lineage::Lineage;

pub use collect::{FromQuery, IntoEntry};
pub use nested::{Leaves, Nest, Nested};
pub use numeric::{Numeric, Truthy};
pub use source::{Source, SourceShape};

pub(crate) type Elements<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// A lazy, chainable, single-consumption pipeline over a sequence of elements.
///
/// `Query` is deliberately `!Send` and `!Sync`: evaluation is single-threaded
/// and pull based.
///
/// # Examples
///
/// ```rust
/// use quarry::Query;
/// use std::collections::HashMap;
///
/// let ages = HashMap::from([("ada", 36), ("alan", 41), ("grace", 85)]);
/// let mut elders = Query::new(ages)
///     .filter(|item| *item.value() > 40)
///     .map(|item| item.into_key())
///     .to_list()
///     .unwrap();
/// elders.sort_unstable();
/// assert_eq!(elders, vec!["alan", "grace"]);
/// ```
pub struct Query<'a, T> {
    elements: RefCell<Elements<'a, T>>,
    lineage: Rc<Lineage<'a>>,
}

static_assertions::assert_not_impl_any!(Query<'static, i32>: Send, Sync);

impl<'a, T: 'a> Query<'a, T> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a query from any [`Source`].
    ///
    /// Mapping sources are normalized into [`DictItem`](crate::DictItem)s.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// assert_eq!(Query::new(vec![1, 2]).to_list(), Ok(vec![1, 2]));
    /// assert_eq!(Query::new(0..3).count(), Ok(3));
    /// ```
    pub fn new<S>(source: S) -> Self
    where
        S: Source<'a, Item = T>,
    {
        trace!(shape = ?S::SHAPE, "normalizing query source");
        source.into_query()
    }

    /// Creates a query from a source that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NilInput`] when `source` is `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::{Query, QueryError};
    ///
    /// let missing: Option<Vec<i32>> = None;
    /// let error = Query::try_new(missing).err();
    /// assert_eq!(error, Some(QueryError::NilInput("Cannot create Query from None")));
    /// ```
    pub fn try_new<S>(source: Option<S>) -> Result<Self, QueryError>
    where
        S: Source<'a, Item = T>,
    {
        source
            .map(Self::new)
            .ok_or(QueryError::NilInput("Cannot create Query from None"))
    }

    /// Creates a query from a source that may be absent, treating `None` as
    /// an empty source.
    pub fn of_nullable<S>(source: Option<S>) -> Self
    where
        S: Source<'a, Item = T>,
    {
        source.map_or_else(Self::empty, Self::new)
    }

    /// Creates a query over the given elements.
    ///
    /// The [`query!`](crate::query!) macro is the variadic form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// assert_eq!(Query::of(["a", "b"]).join("-"), Ok("a-b".to_string()));
    /// ```
    pub fn of<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::from_iterator(elements)
    }

    /// Creates a query with no elements.
    pub fn empty() -> Self {
        Self::from_iterator(iter::empty())
    }

    /// Creates a query that lazily pulls from an arbitrary iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let words = "one two three".split_whitespace();
    /// assert_eq!(Query::from_iterator(words).count(), Ok(3));
    /// ```
    pub fn from_iterator<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::from_parts(Box::new(elements.into_iter()), Lineage::new())
    }

    /// Creates an infinite query `seed, next(seed), next(next(seed)), ...`.
    ///
    /// Bound it with `limit` or `take_while` before running a terminal
    /// operation that needs every element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let powers = Query::iterate(1, |x| x * 2).limit(5).to_list();
    /// assert_eq!(powers, Ok(vec![1, 2, 4, 8, 16]));
    /// ```
    pub fn iterate<F>(seed: T, mut next: F) -> Self
    where
        F: FnMut(&T) -> T + 'a,
    {
        Self::from_iterator(iter::successors(Some(seed), move |current| {
            Some(next(current))
        }))
    }

    /// Like [`Query::iterate`], but stops the first time `predicate` rejects
    /// an element. The seed is checked too.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let small = Query::iterate_while(1, |x| x * 3, |x| *x < 100).to_list();
    /// assert_eq!(small, Ok(vec![1, 3, 9, 27, 81]));
    /// ```
    pub fn iterate_while<F, P>(seed: T, next: F, predicate: P) -> Self
    where
        F: FnMut(&T) -> T + 'a,
        P: FnMut(&T) -> bool + 'a,
    {
        Self::iterate(seed, next).take_while(predicate)
    }

    /// Creates an infinite query by calling `supplier` for every element.
    pub fn generate<F>(supplier: F) -> Self
    where
        F: FnMut() -> T + 'a,
    {
        Self::from_iterator(iter::repeat_with(supplier))
    }

    /// Creates an infinite query repeating `value`.
    pub fn constant(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_iterator(iter::repeat(value))
    }

    /// Concatenates any number of sources into one query.
    ///
    /// The lineages of query sources are absorbed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// let joined = Query::concat_all([vec![1, 2], vec![], vec![3]]).to_list();
    /// assert_eq!(joined, Ok(vec![1, 2, 3]));
    /// ```
    pub fn concat_all<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Source<'a, Item = T>,
    {
        sources.into_iter().fold(Self::empty(), Self::concat)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns `true` once any query of this lineage has been consumed or
    /// closed.
    pub fn is_consumed(&self) -> bool {
        self.lineage.is_consumed()
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    pub(crate) fn from_parts(elements: Elements<'a, T>, lineage: Rc<Lineage<'a>>) -> Self {
        Self {
            elements: RefCell::new(elements),
            lineage,
        }
    }

    /// Creates an empty query whose lineage already carries `fault`.
    pub(crate) fn faulted(fault: QueryError) -> Self {
        let query = Self::empty();
        query.lineage.fail(fault);
        query
    }

    pub(crate) fn into_parts(self) -> (Elements<'a, T>, Rc<Lineage<'a>>) {
        let Self { elements, lineage } = self;
        (elements.into_inner(), lineage)
    }

    /// Builds the next query of the lineage by adapting the element stream.
    ///
    /// The adapted stream stops at the first fault recorded on the lineage.
    pub(crate) fn derive<U, I, F>(self, adapt: F) -> Query<'a, U>
    where
        U: 'a,
        I: Iterator<Item = U> + 'a,
        F: FnOnce(Elements<'a, T>, &Rc<Lineage<'a>>) -> I,
    {
        let (elements, lineage) = self.into_parts();
        let guarded = Guarded {
            elements: adapt(elements, &lineage),
            lineage: Rc::clone(&lineage),
        };
        Query::from_parts(Box::new(guarded), lineage)
    }

    fn take_elements(&self) -> Elements<'a, T> {
        std::mem::replace(&mut *self.elements.borrow_mut(), Box::new(iter::empty()))
    }

    /// Runs a terminal operation that cannot fail on its own.
    pub(crate) fn terminate<R, F>(&self, operation: F) -> Result<R, QueryError>
    where
        F: FnOnce(Elements<'a, T>) -> R,
    {
        self.try_terminate(|elements| Ok(operation(elements)))
    }

    /// Runs a terminal operation: checks the lineage is open, drives the
    /// pipeline, closes the lineage and reports any recorded fault in
    /// preference to the operation's own result.
    ///
    /// A fault recorded while the chain was assembled skips the operation
    /// entirely, so nothing is pulled.
    pub(crate) fn try_terminate<R, F>(&self, operation: F) -> Result<R, QueryError>
    where
        F: FnOnce(Elements<'a, T>) -> Result<R, QueryError>,
    {
        self.lineage.ensure_open()?;
        if let Some(fault) = self.lineage.take_fault() {
            trace!(%fault, "skipping terminal operation of a faulted lineage");
            self.close();
            return Err(fault);
        }
        let result = operation(self.take_elements());
        self.lineage.close();
        match self.lineage.take_fault() {
            Some(fault) => Err(fault),
            None => result,
        }
    }
}

impl Query<'_, i64> {
    /// Creates a query over `start..stop` advancing by `step`.
    ///
    /// A negative `step` counts down, stopping before `stop`. A `step` of
    /// zero is reported as [`QueryError::ZeroStep`] by the terminal
    /// operation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::{Query, QueryError};
    ///
    /// assert_eq!(Query::from_range(0, 10, 3).to_list(), Ok(vec![0, 3, 6, 9]));
    /// assert_eq!(Query::from_range(5, 0, -2).to_list(), Ok(vec![5, 3, 1]));
    /// assert_eq!(Query::from_range(0, 5, 0).count(), Err(QueryError::ZeroStep));
    /// ```
    pub fn from_range(start: i64, stop: i64, step: i64) -> Self {
        if step == 0 {
            return Self::faulted(QueryError::ZeroStep);
        }
        let values = iter::successors(Some(start), move |current| current.checked_add(step))
            .take_while(move |value| if step > 0 { *value < stop } else { *value > stop });
        Self::from_iterator(values)
    }

    /// Creates a query over `0..stop`, counting up by one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::Query;
    ///
    /// assert_eq!(Query::from_range_to(4).to_list(), Ok(vec![0, 1, 2, 3]));
    /// assert_eq!(Query::from_range_to(-2).count(), Ok(0));
    /// ```
    pub fn from_range_to(stop: i64) -> Self {
        Self::from_range(0, stop, 1)
    }
}

/// Hands the lineage of `source` over to `lineage` and returns its elements.
///
/// Faults recorded on the absorbed query, now or while it is pulled, are
/// moved into `lineage`.
pub(crate) fn absorb_source<'a, S>(lineage: &Rc<Lineage<'a>>, source: S) -> Elements<'a, S::Item>
where
    S: Source<'a>,
{
    let (elements, absorbed) = source.into_query().into_parts();
    if !lineage.absorb(&absorbed) {
        return Box::new(iter::empty());
    }
    lineage.inherit_fault(&absorbed);
    Box::new(Absorbed {
        elements,
        absorbed,
        into: Rc::clone(lineage),
    })
}

/// Ends a stream once its lineage carries a fault.
struct Guarded<'a, I> {
    elements: I,
    lineage: Rc<Lineage<'a>>,
}

impl<I: Iterator> Iterator for Guarded<'_, I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.lineage.has_fault() {
            return None;
        }
        self.elements.next()
    }
}

struct Absorbed<'a, T> {
    elements: Elements<'a, T>,
    absorbed: Rc<Lineage<'a>>,
    into: Rc<Lineage<'a>>,
}

impl<T> Iterator for Absorbed<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let next = self.elements.next();
        if next.is_none() {
            self.into.inherit_fault(&self.absorbed);
        }
        next
    }
}

impl<'a, T: 'a> FromIterator<T> for Query<'a, T> {
    /// Collects the elements eagerly; use [`Query::from_iterator`] to stay lazy.
    fn from_iter<I: IntoIterator<Item = T>>(elements: I) -> Self {
        Self::of(elements.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T: 'a> Default for Query<'a, T> {
    fn default() -> Self {
        Self::from_parts(Box::new(iter::empty()), Lineage::new())
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Display for Query<'a, T> {
    /// Renders as `Query.of(e1, e2, ...)`.
    ///
    /// The remaining elements are buffered and put back, so rendering does not
    /// consume the query. Side effects of `peek` run during rendering.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut elements = self.elements.borrow_mut();
        let buffered: Vec<T> = elements.by_ref().collect();
        let rendered = render(formatter, &buffered);
        *elements = Box::new(buffered.into_iter());
        rendered
    }
}

fn render<T: fmt::Debug>(formatter: &mut fmt::Formatter<'_>, elements: &[T]) -> fmt::Result {
    formatter.write_str("Query.of(")?;
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            formatter.write_str(", ")?;
        }
        write!(formatter, "{element:?}")?;
    }
    formatter.write_str(")")
}

impl<T> fmt::Debug for Query<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Query")
            .field("consumed", &self.lineage.is_consumed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 5, 1, vec![0, 1, 2, 3, 4])]
    #[case(0, 5, 2, vec![0, 2, 4])]
    #[case(5, 0, -1, vec![5, 4, 3, 2, 1])]
    #[case(0, 0, 1, vec![])]
    #[case(3, 0, 1, vec![])]
    fn test_from_range(
        #[case] start: i64,
        #[case] stop: i64,
        #[case] step: i64,
        #[case] expected: Vec<i64>,
    ) {
        assert_eq!(Query::from_range(start, stop, step).to_list(), Ok(expected));
    }

    #[rstest]
    #[case(3, vec![0, 1, 2])]
    #[case(0, vec![])]
    #[case(-3, vec![])]
    fn test_from_range_to_starts_at_zero(#[case] stop: i64, #[case] expected: Vec<i64>) {
        assert_eq!(Query::from_range_to(stop).to_list(), Ok(expected));
    }

    #[rstest]
    fn test_from_range_stops_at_overflow() {
        let tail = Query::from_range(i64::MAX - 1, i64::MAX, 5).to_list();
        assert_eq!(tail, Ok(vec![i64::MAX - 1]));
    }

    #[rstest]
    fn test_display_does_not_consume() {
        let query = Query::of([1, 2, 3]);
        assert_eq!(query.to_string(), "Query.of(1, 2, 3)");
        assert_eq!(query.to_string(), "Query.of(1, 2, 3)");
        assert_eq!(query.to_list(), Ok(vec![1, 2, 3]));
    }

    #[rstest]
    fn test_debug_reports_consumption() {
        let query = Query::of([1]);
        assert_eq!(format!("{query:?}"), "Query { consumed: false, .. }");
        query.close();
        assert_eq!(format!("{query:?}"), "Query { consumed: true, .. }");
    }

    #[rstest]
    fn test_fault_is_reported_before_result() {
        let query = Query::<i64>::faulted(QueryError::ZeroStep);
        assert_eq!(query.to_list(), Err(QueryError::ZeroStep));
        assert!(query.is_consumed());
    }
}
