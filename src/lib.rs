//! # quarry
//!
//! Lazy, single-consumption query pipelines and the value containers that go
//! with them.
//!
//! ## Overview
//!
//! - **Query**: a chainable pipeline over sequences, mappings and lazy
//!   producers, with intermediate operations (`filter`, `map`, `flat_map`,
//!   `sort`, ...) and terminal operations (`to_list`, `to_dict_by`,
//!   `group_by`, `reduce`, ...). A query and everything derived from it is
//!   consumed exactly once.
//! - **Containers**: [`Optional`] (zero or one value), [`Outcome`] (a
//!   success or a failure) and [`DictItem`] (an immutable key/value record
//!   that mapping entries flow through).
//! - **Adapters**: functions that wrap plain functions so they return
//!   containers.
//!
//! ## Feature Flags
//!
//! - `json`: queries over `serde_json::Value` (enabled by default)
//! - `serde`: `Serialize`/`Deserialize` for the containers
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use quarry::prelude::*;
//! use std::collections::BTreeMap;
//!
//! let stock = BTreeMap::from([("apples", 3), ("pears", 0), ("plums", 7)]);
//!
//! let in_stock = Query::new(stock)
//!     .filter(|item| *item.value() > 0)
//!     .map(DictItem::into_key)
//!     .join(", ");
//! assert_eq!(in_stock, Ok("apples, plums".to_string()));
//!
//! let first_even = query![1, 3, 4, 5].find_first_by(|x| x % 2 == 0).unwrap();
//! assert_eq!(first_even, Optional::of(4));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

mod macros;

/// Prelude module for convenient imports.
///
/// Re-exports the query type, the containers and the capability traits.
///
/// # Usage
///
/// ```rust
/// use quarry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::container::{DictItem, Optional, Outcome};
    pub use crate::error::{ErrorKind, QueryError};
    pub use crate::query;
    pub use crate::query::{FromQuery, IntoEntry, Nest, Nested, Numeric, Query, Source, Truthy};
}

pub mod container;
pub mod error;
pub mod query;

pub use container::{DictItem, Optional, Outcome, adapters};
pub use error::{ChainedError, ErrorKind, QueryError};
pub use query::{
    FromQuery, IntoEntry, Leaves, Nest, Nested, Numeric, Query, Source, SourceShape, Truthy,
};
