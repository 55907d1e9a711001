//! Dotted property paths and their resolution against records.
//!
//! A [`PropertyPath`] is parsed once (`"category.name"` → `["category", "name"]`)
//! and resolved many times by a [`PropertyResolver`]. For every segment the
//! resolver asks the current record for a property of that name and, failing
//! that, for the boolean-style `is_<name>` property. Which of the two answered
//! is remembered per record type so later lookups go straight to it.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{Result, SeekerError};
use crate::traits::{AccessError, Record};
use crate::value::{Value, ValueType};

static SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("segment pattern is valid"));

/// A non-empty, dot-separated sequence of identifiers.
///
/// ```
/// use folio_seeker::PropertyPath;
///
/// let path: PropertyPath = "category.name".parse().unwrap();
/// assert_eq!(path.segments(), ["category", "name"]);
/// assert!(PropertyPath::parse("category..name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<String>,
}

impl PropertyPath {
    /// Parses and validates a dotted path. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SeekerError::InvalidPropertyPath {
                path: raw.to_string(),
                reason: "path is empty",
            });
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| !SEGMENT.is_match(s)) {
            return Err(SeekerError::InvalidPropertyPath {
                path: raw.to_string(),
                reason: "every segment must be an identifier",
            });
        }
        Ok(PropertyPath {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The individual segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for PropertyPath {
    type Err = SeekerError;

    fn from_str(s: &str) -> Result<Self> {
        PropertyPath::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PropertyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Which accessor answered for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessor {
    /// The property named exactly like the segment.
    Plain,
    /// The boolean-style `is_<segment>` property.
    Boolean,
}

impl Accessor {
    fn name<'s>(self, segment: &'s str) -> Cow<'s, str> {
        match self {
            Accessor::Plain => Cow::Borrowed(segment),
            Accessor::Boolean => Cow::Owned(format!("is_{}", segment)),
        }
    }
}

/// Resolves [`PropertyPath`]s against records.
///
/// The resolver is cheap to share: its only state is the accessor cache,
/// keyed by `(record type, segment)`.
#[derive(Debug, Default)]
pub struct PropertyResolver {
    accessors: RwLock<HashMap<(&'static str, String), Accessor>>,
}

impl PropertyResolver {
    /// Creates a resolver with an empty accessor cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a path to this resolver.
    pub fn accessor<'p>(&'p self, path: &'p PropertyPath) -> PropertyAccessor<'p> {
        PropertyAccessor {
            resolver: self,
            path,
        }
    }

    /// Resolves `path` against `record`.
    ///
    /// A null value before the last segment yields `Value::Null`.
    pub fn resolve<'r>(&self, record: &'r dyn Record, path: &PropertyPath) -> Result<Value<'r>> {
        Ok(self
            .walk(record, path)?
            .map_or(Value::Null, |(_, value)| value))
    }

    /// Resolves the runtime type of `path` on `record`.
    ///
    /// Returns `None` when a link in the chain is null, or when the final
    /// value is null and the owning record declares no type for it.
    pub fn resolve_type(
        &self,
        record: &dyn Record,
        path: &PropertyPath,
    ) -> Result<Option<ValueType>> {
        let (owner, value) = match self.walk(record, path)? {
            Some(found) => found,
            None => return Ok(None),
        };
        Ok(value.value_type().or_else(|| {
            path.segments()
                .last()
                .and_then(|segment| owner.declared_type(segment))
        }))
    }

    /// Walks every segment, returning the record owning the last segment and
    /// its value. `None` means a non-terminal segment was null.
    fn walk<'r>(
        &self,
        record: &'r dyn Record,
        path: &PropertyPath,
    ) -> Result<Option<(&'r dyn Record, Value<'r>)>> {
        let segments = path.segments();
        let mut current = record;
        for (index, segment) in segments.iter().enumerate() {
            let value = self.read(current, segment, path)?;
            if index + 1 == segments.len() {
                return Ok(Some((current, value)));
            }
            match value {
                Value::Null => return Ok(None),
                Value::Record(next) => current = next,
                other => {
                    return Err(SeekerError::PropertyNotFound {
                        path: path.to_string(),
                        segment: segments[index + 1].clone(),
                        record_type: other.value_type().map_or("null", |t| t.name()),
                    })
                }
            }
        }
        Ok(None)
    }

    fn read<'r>(
        &self,
        record: &'r dyn Record,
        segment: &str,
        path: &PropertyPath,
    ) -> Result<Value<'r>> {
        let record_type = record.record_type();
        let order = match self.cached(record_type, segment) {
            Some(Accessor::Boolean) => [Accessor::Boolean, Accessor::Plain],
            _ => [Accessor::Plain, Accessor::Boolean],
        };

        for accessor in order {
            match record.property(&accessor.name(segment)) {
                Err(AccessError::Unknown) => continue,
                result => {
                    self.remember(record_type, segment, accessor);
                    return result.map_err(|err| access_error(err, path, segment, record_type));
                }
            }
        }

        Err(SeekerError::PropertyNotFound {
            path: path.to_string(),
            segment: segment.to_string(),
            record_type,
        })
    }

    fn cached(&self, record_type: &'static str, segment: &str) -> Option<Accessor> {
        let cache = self.accessors.read().ok()?;
        cache.get(&(record_type, segment.to_string())).copied()
    }

    fn remember(&self, record_type: &'static str, segment: &str, accessor: Accessor) {
        if self.cached(record_type, segment) == Some(accessor) {
            return;
        }
        if let Ok(mut cache) = self.accessors.write() {
            tracing::trace!(record_type, segment, ?accessor, "caching property accessor");
            cache.insert((record_type, segment.to_string()), accessor);
        }
    }
}

fn access_error(
    err: AccessError,
    path: &PropertyPath,
    segment: &str,
    record_type: &'static str,
) -> SeekerError {
    match err {
        AccessError::Unknown => SeekerError::PropertyNotFound {
            path: path.to_string(),
            segment: segment.to_string(),
            record_type,
        },
        AccessError::Restricted => SeekerError::PropertyNotAccessible {
            path: path.to_string(),
            segment: segment.to_string(),
            record_type,
        },
        AccessError::Failed(reason) => SeekerError::PropertyInvocation {
            path: path.to_string(),
            segment: segment.to_string(),
            reason,
        },
    }
}

/// A path bound to a resolver, ready to be applied to many records.
#[derive(Debug, Clone, Copy)]
pub struct PropertyAccessor<'p> {
    resolver: &'p PropertyResolver,
    path: &'p PropertyPath,
}

impl<'p> PropertyAccessor<'p> {
    /// Resolves the bound path against `record`.
    pub fn resolve<'r>(&self, record: &'r dyn Record) -> Result<Value<'r>> {
        self.resolver.resolve(record, self.path)
    }

    /// The bound path.
    pub fn path(&self) -> &'p PropertyPath {
        self.path
    }
}
