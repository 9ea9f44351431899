//! The `query!` macro for variadic query construction.

/// Builds a [`Query`](crate::Query) over the listed elements.
///
/// # Syntax
///
/// - `query![]` - An empty query
/// - `query![a, b, c]` - A query yielding `a`, `b`, `c` in order
/// - `query![value; n]` - A query yielding `value` `n` times
///
/// # Examples
///
/// ```
/// use quarry::{Query, query};
///
/// assert_eq!(query![1, 2, 3].sum(), Ok(6));
/// assert_eq!(query!["x"; 3].join(""), Ok("xxx".to_string()));
///
/// let nothing: Query<i32> = query![];
/// assert_eq!(nothing.count(), Ok(0));
/// ```
#[macro_export]
macro_rules! query {
    () => {
        $crate::Query::empty()
    };
    ($value:expr; $count:expr) => {
        $crate::Query::of(::std::vec![$value; $count])
    };
    ($($element:expr),+ $(,)?) => {
        $crate::Query::of([$($element),+])
    };
}
