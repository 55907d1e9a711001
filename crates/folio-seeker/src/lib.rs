//! Folio Seeker - property access, formatting and sorting for record collections.
//!
//! Seeker reads properties of in-memory records by dotted path and orders
//! collections by them. It provides:
//!
//! - The [`Record`] trait: named property access without reflection
//! - [`PropertyPath`] and [`PropertyResolver`]: dotted paths such as
//!   `category.name`, with a boolean-style `is_<name>` fallback per segment
//! - [`TypeFormatter`] and [`FormatterRegistry`]: locale-aware rendering of
//!   application types
//! - [`SortEngine`]: stable, nulls-first sorting by any property path
//!
//! # Quick Start
//!
//! ```rust
//! use folio_seeker::{
//!     AccessError, FormatterRegistry, Locale, PropertyPath, PropertyResolver, Record,
//!     SortEngine, SortState, Value,
//! };
//!
//! struct Task {
//!     name: String,
//!     priority: Option<i32>,
//! }
//!
//! impl Record for Task {
//!     fn property(&self, name: &str) -> Result<Value<'_>, AccessError> {
//!         match name {
//!             "name" => Ok(Value::from(&self.name)),
//!             "priority" => Ok(Value::from(self.priority)),
//!             _ => Err(AccessError::Unknown),
//!         }
//!     }
//! }
//!
//! let mut tasks = vec![
//!     Task { name: "Write docs".into(), priority: Some(3) },
//!     Task { name: "Triage".into(), priority: None },
//!     Task { name: "Fix bug".into(), priority: Some(5) },
//! ];
//!
//! let resolver = PropertyResolver::new();
//! let formatters = FormatterRegistry::new();
//! let engine = SortEngine::new(&resolver, &formatters, &Locale::default());
//!
//! let state = SortState::descending(PropertyPath::parse("priority").unwrap());
//! engine.apply_if_requested(&mut tasks, &state).unwrap();
//!
//! // Nulls come first regardless of direction
//! let names: Vec<_> = tasks.iter().map(|t| t.name.as_str()).collect();
//! assert_eq!(names, ["Triage", "Fix bug", "Write docs"]);
//! ```
//!
//! # Ordering Semantics
//!
//! Every value read from the sort field falls in exactly one class:
//!
//! | Class | Ordered by |
//! |-------|------------|
//! | Null | Always first, in both directions |
//! | String, Number, Timestamp, Enum, Bool | Intrinsic order |
//! | Type with a registered formatter | Collated formatted text |
//! | Anything else | Not comparable: sorting fails |
//!
//! Values of different classes (or different natural types) cannot be
//! compared with each other; sorting such a list fails with
//! [`SeekerError::NotComparable`] and leaves the list untouched.

mod error;
mod formatter;
mod locale;
mod ordering;
mod path;
mod sort;
mod traits;
mod value;

// Re-export public API
pub use error::{Result, SeekerError};
pub use formatter::{FnFormatter, FormatterRegistry, TypeFormatter};
pub use locale::{Collator, Locale, Strength};
pub use ordering::{classify, compare_values, Classification, Direction, SortState};
pub use path::{PropertyAccessor, PropertyPath, PropertyResolver};
pub use sort::SortEngine;
pub use traits::{AccessError, Record};
pub use value::{CustomType, Number, Opaque, Timestamp, Value, ValueType};
