//! Folio - request-scoped list view state for server-rendered pages.
//!
//! Folio slices a collection into pages, sorts it by a user-chosen property
//! path and prepares it for tabular export. It produces plain, serializable
//! view models; markup, message bundles and pdf/spreadsheet rendering stay
//! with the application.
//!
//! # Quick Start
//!
//! ```rust
//! use folio::{IterationSource, PagesConfig, PagesEngine, RequestScope, RequestUrl};
//! use folio_seeker::{AccessError, FormatterRegistry, Record, Value};
//!
//! #[derive(Clone)]
//! struct Product {
//!     name: &'static str,
//!     price: u32,
//! }
//!
//! impl Record for Product {
//!     fn property(&self, name: &str) -> Result<Value<'_>, AccessError> {
//!         match name {
//!             "name" => Ok(Value::from(self.name)),
//!             "price" => Ok(Value::from(self.price)),
//!             _ => Err(AccessError::Unknown),
//!         }
//!     }
//! }
//!
//! fn products() -> IterationSource<Product> {
//!     IterationSource::from(vec![
//!         Product { name: "Lamp", price: 40 },
//!         Product { name: "Desk", price: 250 },
//!         Product { name: "Chair", price: 90 },
//!     ])
//! }
//!
//! let engine = PagesEngine::new(PagesConfig::default(), FormatterRegistry::new()).unwrap();
//!
//! // One scope per request; every element of the view shares it.
//! let mut scope = RequestScope::new();
//! let url = RequestUrl::parse("/products?sort=price&sortType=desc");
//!
//! let link = engine.sort(&mut scope, "products", products, "price", &url).unwrap();
//! assert_eq!(link.href, "/products?sort=price&sortType=asc");
//!
//! let view = engine.paginate(&mut scope, "products", products, Some("2"), &url).unwrap();
//! let names: Vec<_> = view.items.iter().map(|p| p.name).collect();
//! assert_eq!(names, ["Desk", "Chair"]);
//! assert!(view.navigation.show_next);
//! ```
//!
//! # Request Parameters
//!
//! | Parameter | Default name | Value |
//! |-----------|--------------|-------|
//! | Page | `page` | 0-based page index |
//! | Sort field | `sort` | property path |
//! | Sort direction | `sortType` | `asc` or `desc` |
//! | Export | `export` | `pdf`, `excel` or `csv` |
//!
//! Every name is configurable through [`PagesConfig`]. Links built by the
//! engine keep all other query parameters as they are.
//!
//! # Evaluation Order
//!
//! Sorting reorders the cached list in place, so a view sorts before it
//! paginates or exports. Property access, formatters and collation come from
//! [`folio_seeker`].

mod config;
mod engine;
mod error;
pub mod export;
pub mod messages;
mod navigation;
mod paged;
mod scope;
mod separator;
mod sort_link;
mod url;

pub use config::{MessageKeys, PagesConfig, DEFAULT_PAGE_SIZE};
pub use engine::{ExportOutcome, ExportRequest, PagesEngine, PaginationView};
pub use error::{PagesError, Result};
pub use messages::{ExpressionEvaluator, LiteralEvaluator, MessageSource, NoMessages};
pub use navigation::{
    NavigationCalculator, NavigationLinkSet, NavigationTexts, PageLink, ResultCount, TargetUrls,
    DEFAULT_MAX_LINKED_PAGES,
};
pub use paged::{parse_page_index, parse_page_size, PageMetrics, PagedList};
pub use scope::{IterationSource, RequestScope};
pub use separator::Separator;
pub use sort_link::{requested_sort, SortLink};
pub use self::url::RequestUrl;
