//! Per-request cache of paged lists.
//!
//! A view evaluates several attributes (pagination, sort, export) against
//! the same iteration. [`RequestScope`] makes them share one [`PagedList`]:
//! the first evaluation materializes the source, later ones get the cached
//! list back, including any reordering a sort applied to it.
//!
//! A scope is created per request and dropped with it; it is never shared
//! between requests. It also carries the requesting user's locale, when the
//! application knows it.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

use folio_seeker::Locale;

use crate::error::{PagesError, Result};
use crate::paged::PagedList;

/// A source of records for an iteration.
pub enum IterationSource<R> {
    /// An owned list.
    List(Vec<R>),
    /// Any finite iterator, collected on materialization.
    Collection(Box<dyn Iterator<Item = R>>),
    /// A fixed-size array.
    Array(Box<[R]>),
    /// Something that cannot be iterated; carries a description for the error.
    Unsupported(&'static str),
}

impl<R> IterationSource<R> {
    /// Wraps any iterator.
    pub fn collection<I>(items: I) -> Self
    where
        I: IntoIterator<Item = R>,
        I::IntoIter: 'static,
    {
        IterationSource::Collection(Box::new(items.into_iter()))
    }

    /// Collects the source into a list.
    pub fn materialize(self) -> Result<Vec<R>> {
        match self {
            IterationSource::List(list) => Ok(list),
            IterationSource::Collection(iter) => Ok(iter.collect()),
            IterationSource::Array(array) => Ok(array.into_vec()),
            IterationSource::Unsupported(what) => Err(PagesError::IterationSource(what)),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            IterationSource::List(_) => "list",
            IterationSource::Collection(_) => "collection",
            IterationSource::Array(_) => "array",
            IterationSource::Unsupported(_) => "unsupported",
        }
    }
}

impl<R> fmt::Debug for IterationSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationSource::Unsupported(what) => {
                f.debug_tuple("Unsupported").field(what).finish()
            }
            other => f.write_str(other.kind()),
        }
    }
}

impl<R> From<Vec<R>> for IterationSource<R> {
    fn from(list: Vec<R>) -> Self {
        IterationSource::List(list)
    }
}

impl<R> From<Box<[R]>> for IterationSource<R> {
    fn from(array: Box<[R]>) -> Self {
        IterationSource::Array(array)
    }
}

impl<R, const N: usize> From<[R; N]> for IterationSource<R> {
    fn from(array: [R; N]) -> Self {
        IterationSource::Array(Box::new(array))
    }
}

/// Request-scoped store of paged lists keyed by iteration identifier.
#[derive(Default)]
pub struct RequestScope {
    lists: HashMap<String, Box<dyn Any>>,
    locale: Option<Locale>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the locale of the request. Formatting, collation and texts
    /// follow it instead of the configured locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// The request locale, if one was set.
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// Returns the list cached under `key`, creating it from `supplier` on
    /// first use.
    ///
    /// The supplier runs only on a cache miss. A key cached with a different
    /// record type fails with [`PagesError::ScopeTypeMismatch`].
    pub fn get_or_create<R, F>(&mut self, key: &str, supplier: F) -> Result<&mut PagedList<R>>
    where
        R: 'static,
        F: FnOnce() -> IterationSource<R>,
    {
        if !self.lists.contains_key(key) {
            let source = supplier();
            tracing::debug!(key, source = source.kind(), "materializing iteration list");
            let list = PagedList::new(source.materialize()?);
            self.lists.insert(key.to_string(), Box::new(list));
        } else {
            tracing::debug!(key, "reusing cached iteration list");
        }

        self.lists
            .get_mut(key)
            .and_then(|entry| entry.downcast_mut::<PagedList<R>>())
            .ok_or_else(|| PagesError::ScopeTypeMismatch {
                key: format!("{} as {}", key, type_name::<R>()),
            })
    }

    /// The list cached under `key`, if any and of record type `R`.
    pub fn get<R: 'static>(&self, key: &str) -> Option<&PagedList<R>> {
        self.lists.get(key)?.downcast_ref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lists.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

impl fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestScope")
            .field("keys", &self.lists.keys().collect::<Vec<_>>())
            .field("locale", &self.locale)
            .finish()
    }
}
