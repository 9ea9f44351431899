//! Value containers shared by the query engine and its callers.
//!
//! - [`Optional`]: zero or one value
//! - [`Outcome`]: a success value or a failure error
//! - [`DictItem`]: an immutable key/value record used to flow mapping
//!   entries through query pipelines
//!
//! The [`adapters`] module turns plain functions into functions that
//! return these containers.
//!
//! # Examples
//!
//! ```rust
//! use quarry::container::{DictItem, Optional, Outcome};
//!
//! let found = Optional::of(DictItem::new("Name", "Freud"));
//! let name = found.map(|item| *item.value());
//! assert_eq!(name.get(), Ok("Freud"));
//!
//! let parsed: Outcome<i32, String> = "21".parse::<i32>().map_err(|e| e.to_string()).into();
//! assert_eq!(parsed.map_success(|x| x * 2).get(), Ok(42));
//! ```

pub mod adapters;
mod dict_item;
mod optional;
mod outcome;

pub use dict_item::DictItem;
pub use optional::Optional;
pub use outcome::Outcome;

static_assertions::assert_impl_all!(Optional<String>: Send, Sync);
static_assertions::assert_impl_all!(Outcome<String, std::io::Error>: Send, Sync);
static_assertions::assert_impl_all!(DictItem<String, i64>: Send, Sync);
